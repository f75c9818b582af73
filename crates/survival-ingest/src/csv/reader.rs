//! CSV file reading with every column kept as text.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use polars::prelude::*;
use tracing::debug;

use crate::error::{IngestError, Result};

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Detect encoding and validate it's supported (UTF-8 only).
///
/// Checks for UTF-16 BOM markers which are not supported.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = open(path)?;
    let mut buffer = [0u8; 4];
    let bytes_read = file.read(&mut buffer).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if bytes_read >= 2 {
        let encoding = match buffer[0..2] {
            [0xFF, 0xFE] => Some("UTF-16 LE"),
            [0xFE, 0xFF] => Some("UTF-16 BE"),
            _ => None,
        };
        if let Some(encoding) = encoding {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding,
            });
        }
    }
    Ok(())
}

/// Fails with [`IngestError::EmptyCsv`] when the first line holds no header.
fn ensure_header(path: &Path) -> Result<()> {
    let mut first = String::new();
    BufReader::new(open(path)?)
        .read_line(&mut first)
        .map_err(|e| IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
    let header = first.strip_prefix('\u{feff}').unwrap_or(&first);
    if header.trim().is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Reads a CSV file with a single header row into a DataFrame.
///
/// Schema inference is disabled, so every column comes back as `String`
/// and empty cells as nulls.
pub fn read_csv_frame(path: &Path) -> Result<DataFrame> {
    validate_encoding(path)?;
    ensure_header(path)?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded CSV"
    );
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_read_csv_frame_keeps_text() {
        let file = create_temp_csv(
            "NEWNHSNO,start_event,AGE\n0012,2021-01-01,54\n0013,2021-02-01,61\n",
        );
        let df = read_csv_frame(file.path()).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
        let ids = df.column("NEWNHSNO").unwrap().str().unwrap();
        assert_eq!(ids.get(0), Some("0012"));
        let ages = df.column("AGE").unwrap().str().unwrap();
        assert_eq!(ages.get(1), Some("61"));
    }

    #[test]
    fn test_read_csv_frame_empty_cells_are_null() {
        let file = create_temp_csv("NEWNHSNO,primary_event\n1,\n2,2021-05-01\n");
        let df = read_csv_frame(file.path()).unwrap();

        let events = df.column("primary_event").unwrap().str().unwrap();
        assert_eq!(events.get(0), None);
        assert_eq!(events.get(1), Some("2021-05-01"));
    }

    #[test]
    fn test_read_csv_frame_empty_file() {
        let file = create_temp_csv("");
        let result = read_csv_frame(file.path());

        assert!(matches!(result, Err(IngestError::EmptyCsv { .. })));
    }

    #[test]
    fn test_read_csv_frame_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_csv_frame(&dir.path().join("absent.csv"));

        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn test_validate_encoding_rejects_utf16() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xFF, 0xFE, b'A', 0x00]).unwrap();
        let result = validate_encoding(file.path());

        assert!(matches!(
            result,
            Err(IngestError::UnsupportedEncoding {
                encoding: "UTF-16 LE",
                ..
            })
        ));
    }
}

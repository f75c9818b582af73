//! CSV output.

use std::fs::{self, File};
use std::path::Path;

use polars::prelude::*;
use tracing::info;

use crate::error::{IngestError, Result};

/// Writes a DataFrame as CSV with a header row, creating parent directories
/// as needed. Nulls are written as empty cells.
pub fn write_csv_frame(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| IngestError::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let mut file = File::create(path).map_err(|e| IngestError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;

    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "wrote CSV"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::read_csv_frame;

    #[test]
    fn test_write_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("monthly.csv");
        let mut df = DataFrame::new(vec![
            Series::new("NEWNHSNO".into(), vec!["1", "1"]).into(),
            Series::new("month".into(), vec!["Jan-21", "Feb-21"]).into(),
            Series::new("time".into(), vec![17i64, 28]).into(),
            Series::new("COHORT".into(), vec![Some("RD"), None]).into(),
        ])
        .unwrap();

        write_csv_frame(&mut df, &path).unwrap();
        let back = read_csv_frame(&path).unwrap();

        assert_eq!(back.height(), 2);
        let time = back.column("time").unwrap().str().unwrap();
        assert_eq!(time.get(1), Some("28"));
        let cohort = back.column("COHORT").unwrap().str().unwrap();
        assert_eq!(cohort.get(1), None);
    }

    #[test]
    fn test_write_fails_on_directory_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut df = DataFrame::new(vec![Series::new("A".into(), vec![1i64]).into()]).unwrap();
        let result = write_csv_frame(&mut df, dir.path());

        assert!(matches!(result, Err(IngestError::Write { .. })));
    }
}

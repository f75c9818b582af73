//! CSV reading and writing.

mod reader;
mod writer;

pub use reader::{read_csv_frame, validate_encoding};
pub use writer::write_csv_frame;

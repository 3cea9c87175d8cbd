pub mod errors;
pub mod frame;
pub mod model;
mod reader;
pub mod timestamp;
mod writer;

pub use errors::SheetError;
pub use frame::{rename_column, rename_leading_columns, require_column};
pub use model::{header_names, Sheet};
pub use reader::read_sheet;
pub use timestamp::{
    format_timestamp_column, parse_timestamp, timestamps, MINUTE_FORMAT, STATUS_FORMAT,
};
pub use writer::write_frame;

//! Core D2V reader module

pub mod format;
pub mod reader;
pub mod types;
mod utils;

pub use reader::{
    parse_from_path, parse_from_path_with, parse_from_stream, parse_from_stream_with,
    parse_from_text, parse_from_text_with,
};
pub use types::error::{D2vError, FormatError, Result};
pub use types::models;
pub use types::options::{DecodeOptions, StreamTypeScope};

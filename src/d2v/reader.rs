//! Document assembly: runs the section parsers in file order.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use log::{debug, info};

use super::format;
use super::types::error::{D2vError, FormatError, Result};
use super::types::models::Document;
use super::types::options::DecodeOptions;
use super::utils::LineReader;

/// Decodes a D2V document from any buffered reader.
///
/// Reads header, settings, frame table and footer in a single forward pass.
/// The first error from any section is returned; nothing partial is kept.
pub fn parse_from_stream<R: BufRead>(input: R) -> Result<Document> {
    parse_from_stream_with(input, &DecodeOptions::default())
}

/// [`parse_from_stream`] with explicit decoder options.
pub fn parse_from_stream_with<R: BufRead>(input: R, options: &DecodeOptions) -> Result<Document> {
    let mut lines = LineReader::new(input);

    let header = format::header::parse(&mut lines)?;
    let settings = format::settings::parse(&mut lines, options.stream_type_scope)?;
    debug!("Settings block holds {} entries", settings.len());
    let frames = format::frames::parse(&mut lines)?;

    let data_type = match format::frames::parse_footer(&mut lines)? {
        Some(data_type) => data_type,
        None if options.require_footer => {
            return Err(lines.error(FormatError::UnexpectedEof { section: "footer" }));
        }
        None => {
            debug!("No footer line, leaving data type empty");
            String::new()
        }
    };

    Ok(Document {
        format_version: header.format_version,
        videos: header.videos,
        settings,
        frames,
        data_type,
    })
}

/// Decodes a D2V document held entirely in memory.
pub fn parse_from_text(blob: &str) -> Result<Document> {
    parse_from_text_with(blob, &DecodeOptions::default())
}

pub fn parse_from_text_with(blob: &str, options: &DecodeOptions) -> Result<Document> {
    parse_from_stream_with(blob.as_bytes(), options)
}

/// Opens and decodes a D2V file.
///
/// # Errors
/// Returns an error if:
/// - The path cannot be inspected or opened
/// - The path is not a regular file
/// - The contents do not follow the D2V grammar
pub fn parse_from_path(path: impl AsRef<Path>) -> Result<Document> {
    parse_from_path_with(path, &DecodeOptions::default())
}

pub fn parse_from_path_with(path: impl AsRef<Path>, options: &DecodeOptions) -> Result<Document> {
    let path = path.as_ref();
    info!("Opening D2V file: {}", path.display());
    if !path.metadata()?.is_file() {
        return Err(D2vError::NotAFile(path.to_path_buf()));
    }
    let file = File::open(path)?;
    let document = parse_from_stream_with(BufReader::new(file), options)?;
    info!(
        "D2V file decoded: version={}, {} video(s), {} frame record(s), data type '{}'",
        document.format_version,
        document.videos.len(),
        document.frames.len(),
        document.data_type
    );
    Ok(document)
}

impl FromStr for Document {
    type Err = D2vError;

    fn from_str(s: &str) -> Result<Self> {
        parse_from_text(s)
    }
}

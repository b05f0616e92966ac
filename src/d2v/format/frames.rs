//! Frame table parsing and the trailing footer line.
//!
//! # Record Layout
//! ```text
//! 900 5 0 2048 0 0 0 92 b2 a2 b2 a2 b2 a2 b2 a2 b2 a2 b2 ff
//! │   │ │ │    │ │ │ └─ picture flag bytes (hex), optional ff sentinel
//! │   │ │ │    │ │ └─── cell
//! │   │ │ │    │ └───── vob
//! │   │ │ │    └─────── skip
//! │   │ │ └──────────── position (byte offset in file)
//! │   │ └────────────── file index
//! │   └──────────────── matrix
//! └──────────────────── info byte (hex)
//! ```
//!
//! The table ends at a blank line. The line after it is the footer, e.g.
//! `FINISHED  100.00% VIDEO`, whose text from column 10 onward is the data type.

use std::io::BufRead;
use std::str::FromStr;
use log::{debug, trace};
use crate::d2v::types::error::{FormatError, Result};
use crate::d2v::types::models::{FrameRecord, GopInfo, PictureFlags};
use crate::d2v::utils::{self, LineReader};

/// Marks the end of the stream in the flag list; not picture data.
const END_OF_STREAM: &str = "ff";

/// Character column where the footer's data type label starts.
const FOOTER_LABEL_OFFSET: usize = 10;

/// Parses frame records up to and including the blank terminator line.
pub(crate) fn parse<R: BufRead>(lines: &mut LineReader<R>) -> Result<Vec<FrameRecord>> {
    let mut frames = Vec::new();
    loop {
        let line = lines.next_line_or_empty()?;
        if line.is_empty() {
            break;
        }
        let record = parse_record(&line).map_err(|e| lines.error(e))?;
        trace!(
            "Frame record: file={} position={} pictures={}",
            record.file,
            record.position,
            record.picture_flags.len()
        );
        frames.push(record);
    }
    debug!("Frame table holds {} record(s)", frames.len());
    Ok(frames)
}

/// Reads the footer line and returns its data type label.
///
/// A missing footer is `None`; a line shorter than the label offset gives an
/// empty label.
pub(crate) fn parse_footer<R: BufRead>(lines: &mut LineReader<R>) -> Result<Option<String>> {
    let Some(footer) = lines.next_line()? else {
        return Ok(None);
    };
    let data_type: String = footer.chars().skip(FOOTER_LABEL_OFFSET).collect();
    debug!("Footer '{}' gives data type '{}'", footer, data_type);
    Ok(Some(data_type))
}

fn parse_record(line: &str) -> std::result::Result<FrameRecord, FormatError> {
    let (head, flags) = split_fields(line);

    let [info, matrix, file, position, skip, vob, cell] = head;
    Ok(FrameRecord {
        info: GopInfo::from_value(utils::parse_hex_value(info)?),
        matrix: matrix.to_string(),
        file: parse_field("file", file)?,
        position: parse_field("position", position)?,
        skip: parse_field("skip", skip)?,
        vob: parse_field("vob", vob)?,
        cell: parse_field("cell", cell)?,
        picture_flags: parse_flags(flags)?,
    })
}

/// Splits a record into its seven leading tokens and the unsplit remainder.
///
/// Missing tokens come back empty so the field parsers can report them.
fn split_fields(line: &str) -> ([&str; 7], &str) {
    let mut head = [""; 7];
    let mut rest = line.trim_start();
    for slot in head.iter_mut() {
        let (token, tail) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        *slot = token;
        rest = tail.trim_start();
    }
    (head, rest)
}

fn parse_field<T: FromStr>(field: &'static str, value: &str) -> std::result::Result<T, FormatError> {
    value.parse().map_err(|_| FormatError::InvalidFrameField {
        field,
        value: value.to_string(),
    })
}

/// Decodes the flag byte list, dropping a trailing end-of-stream sentinel.
fn parse_flags(flags: &str) -> std::result::Result<Vec<PictureFlags>, FormatError> {
    let mut tokens: Vec<&str> = flags.split_whitespace().collect();
    if tokens
        .last()
        .is_some_and(|last| last.eq_ignore_ascii_case(END_OF_STREAM))
    {
        trace!("Dropping end-of-stream sentinel");
        tokens.pop();
    }
    tokens
        .into_iter()
        .map(|token| utils::parse_hex_byte(token).map(PictureFlags::from))
        .collect()
}

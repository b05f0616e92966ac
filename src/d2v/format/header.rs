//! D2V header parsing: version line and source video list.
//!
//! ```text
//! DGIndexProjectFile16      <- version line
//! 2                         <- number of video files
//! D:\vts_01_1.vob           <- one line per video
//! D:\vts_01_2.vob
//!                           <- blank separator
//! ```

use std::io::BufRead;
use log::{debug, trace};
use crate::d2v::types::error::{FormatError, Result};
use crate::d2v::utils::LineReader;

/// Literal that every D2V file starts with.
pub const VERSION_PREFIX: &str = "DGIndexProjectFile";

/// The header section of a D2V file.
#[derive(Debug)]
pub(crate) struct Header {
    pub format_version: u32,
    pub videos: Vec<String>,
}

/// Parses the header, consuming the blank separator line after it.
///
/// Reads nothing past the version line when it is not a D2V header.
pub(crate) fn parse<R: BufRead>(lines: &mut LineReader<R>) -> Result<Header> {
    let version_line = lines.next_line_or_empty()?;
    let format_version = parse_version(&version_line).map_err(|e| lines.error(e))?;
    debug!("D2V format version: {}", format_version);

    let count_line = lines
        .next_line()?
        .ok_or_else(|| lines.error(FormatError::UnexpectedEof { section: "video count" }))?;
    let count: usize = count_line
        .parse()
        .map_err(|_| lines.error(FormatError::InvalidVideoCount { line: count_line.clone() }))?;

    let mut videos = Vec::with_capacity(count);
    for _ in 0..count {
        let video = lines
            .next_line()?
            .ok_or_else(|| lines.error(FormatError::UnexpectedEof { section: "video list" }))?;
        trace!("Video file: {}", video);
        videos.push(video);
    }
    debug!("Header lists {} video file(s)", videos.len());

    let trailer = lines.next_line_or_empty()?;
    if !trailer.is_empty() {
        return Err(lines.error(FormatError::UnexpectedHeaderTrailer { line: trailer }));
    }

    Ok(Header {
        format_version,
        videos,
    })
}

fn parse_version(line: &str) -> std::result::Result<u32, FormatError> {
    let bad_header = || FormatError::BadVersionHeader {
        line: line.to_string(),
    };
    line.strip_prefix(VERSION_PREFIX)
        .ok_or_else(bad_header)?
        .trim()
        .parse()
        .map_err(|_| bad_header())
}

//! # d2v-reader
//!
//! A reader for DGIndex D2V project files.
//!
//! Decodes the header, the typed settings block and the per-GOP frame table
//! (including the packed info and picture flag bytes) into a [`Document`].
//!
//! ```no_run
//! let doc = d2v_reader::parse_from_path("movie.d2v")?;
//! println!("{} frame records", doc.frames.len());
//! # Ok::<(), d2v_reader::D2vError>(())
//! ```
pub mod d2v;

// Re-export the main types for convenience
pub use d2v::{
    parse_from_path, parse_from_path_with, parse_from_stream, parse_from_stream_with,
    parse_from_text, parse_from_text_with, D2vError, DecodeOptions, FormatError, Result,
    StreamTypeScope,
    models::{
        AspectRatio, AspectRatioEntry, Document, FrameRate, FrameRecord, GopInfo, Location,
        LuminanceFilter, PictureCodingType, PictureFlags, PictureSize, SettingValue, Settings,
        TransportPid,
    },
};

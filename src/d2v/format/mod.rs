//! Section parsers for D2V project files.
//!
//! Each parser consumes exactly the lines of its own section, including the
//! blank line that closes it, and leaves the reader at the next section.
//!
//! # Module Organization
//!
//! - [`header`]: version line and source video list
//! - [`settings`]: `Key=Value` block with typed conversion
//! - [`frames`]: per-GOP frame table and the footer line
//!
//! # Architecture
//!
//! ```text
//! File Structure:
//! ┌─────────────────┐
//! │  Header         │ ← header::parse()
//! ├─────────────────┤
//! │  Settings       │ ← settings::parse()
//! ├─────────────────┤
//! │  Frame Table    │ ← frames::parse()
//! ├─────────────────┤
//! │  Footer         │ ← frames::parse_footer()
//! └─────────────────┘
//! ```

pub mod frames;
pub mod header;
pub mod settings;

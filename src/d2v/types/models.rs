//! Core data structures for decoded D2V project files.
//!
//! This module defines the fundamental types produced by the decoder:
//! - The top-level [`Document`]
//! - The typed settings block
//! - Frame table records and their bit-level flags
//!
//! Every type serializes to a plain structural value (maps, lists and
//! primitives) so a consumer can render it without special cases.

use std::collections::BTreeMap;
use std::fmt;
use serde::Serialize;

/// Names of the settings the decoder knows how to convert.
pub mod keys {
    pub const STREAM_TYPE: &str = "Stream_Type";
    pub const MPEG_TYPE: &str = "MPEG_Type";
    pub const IDCT_ALGORITHM: &str = "iDCT_Algorithm";
    pub const YUVRGB_SCALE: &str = "YUVRGB_Scale";
    pub const FIELD_OPERATION: &str = "Field_Operation";
    pub const MPEG2_TRANSPORT_PID: &str = "MPEG2_Transport_PID";
    pub const TRANSPORT_PACKET_SIZE: &str = "Transport_Packet_Size";
    pub const LUMINANCE_FILTER: &str = "Luminance_Filter";
    pub const CLIPPING: &str = "Clipping";
    pub const ASPECT_RATIO: &str = "Aspect_Ratio";
    pub const PICTURE_SIZE: &str = "Picture_Size";
    pub const FRAME_RATE: &str = "Frame_Rate";
    pub const LOCATION: &str = "Location";

    /// Settings whose value is a single integer.
    pub const INTEGER_KEYS: [&str; 5] = [
        STREAM_TYPE,
        MPEG_TYPE,
        IDCT_ALGORITHM,
        YUVRGB_SCALE,
        FIELD_OPERATION,
    ];
}

/// `Stream_Type` value marking an MPEG-2 transport stream.
pub const TRANSPORT_STREAM: i64 = 2;

/// A fully decoded D2V project file.
///
/// Built once per parse; all fields are plain data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    /// Numeric suffix of the `DGIndexProjectFile` header line.
    pub format_version: u32,
    /// Source video files, in the order the indexer listed them.
    pub videos: Vec<String>,
    pub settings: Settings,
    /// Frame table records in decode order.
    pub frames: Vec<FrameRecord>,
    /// Label taken from the footer line (e.g. `VIDEO`).
    pub data_type: String,
}

impl Document {
    /// Total number of pictures described by the frame table.
    pub fn picture_count(&self) -> usize {
        self.frames.iter().map(|f| f.picture_flags.len()).sum()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<D2V version={}, data_type={}, videos={}, settings={}, frames={}>",
            self.format_version,
            self.data_type,
            self.videos.len(),
            self.settings.len(),
            self.frames.len()
        )
    }
}

/// The `key=value` settings block.
///
/// Keys map to a closed set of value shapes. Unknown keys are kept as
/// [`SettingValue::Raw`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Settings {
    entries: BTreeMap<String, SettingValue>,
}

impl Settings {
    pub(crate) fn from_entries(entries: BTreeMap<String, SettingValue>) -> Self {
        Self { entries }
    }

    /// Looks up a setting by its on-disk name.
    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates over all settings, sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn integer(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            SettingValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    fn integer_list(&self, key: &str) -> Option<&[i64]> {
        match self.get(key)? {
            SettingValue::IntegerList(v) => Some(v),
            _ => None,
        }
    }

    pub fn stream_type(&self) -> Option<i64> {
        self.integer(keys::STREAM_TYPE)
    }

    pub fn mpeg_type(&self) -> Option<i64> {
        self.integer(keys::MPEG_TYPE)
    }

    pub fn idct_algorithm(&self) -> Option<i64> {
        self.integer(keys::IDCT_ALGORITHM)
    }

    pub fn yuvrgb_scale(&self) -> Option<i64> {
        self.integer(keys::YUVRGB_SCALE)
    }

    pub fn field_operation(&self) -> Option<i64> {
        self.integer(keys::FIELD_OPERATION)
    }

    /// Only present for transport streams (`Stream_Type=2`).
    pub fn transport_pid(&self) -> Option<&TransportPid> {
        match self.get(keys::MPEG2_TRANSPORT_PID)? {
            SettingValue::TransportPid(v) => Some(v),
            _ => None,
        }
    }

    /// Only present for transport streams (`Stream_Type=2`).
    pub fn transport_packet_size(&self) -> Option<&[i64]> {
        self.integer_list(keys::TRANSPORT_PACKET_SIZE)
    }

    pub fn luminance_filter(&self) -> Option<&LuminanceFilter> {
        match self.get(keys::LUMINANCE_FILTER)? {
            SettingValue::LuminanceFilter(v) => Some(v),
            _ => None,
        }
    }

    pub fn clipping(&self) -> Option<&[i64]> {
        self.integer_list(keys::CLIPPING)
    }

    pub fn aspect_ratio(&self) -> Option<&AspectRatio> {
        match self.get(keys::ASPECT_RATIO)? {
            SettingValue::AspectRatio(v) => Some(v),
            _ => None,
        }
    }

    pub fn picture_size(&self) -> Option<&PictureSize> {
        match self.get(keys::PICTURE_SIZE)? {
            SettingValue::PictureSize(v) => Some(v),
            _ => None,
        }
    }

    pub fn frame_rate(&self) -> Option<&FrameRate> {
        match self.get(keys::FRAME_RATE)? {
            SettingValue::FrameRate(v) => Some(v),
            _ => None,
        }
    }

    pub fn location(&self) -> Option<&Location> {
        match self.get(keys::LOCATION)? {
            SettingValue::Location(v) => Some(v),
            _ => None,
        }
    }
}

/// The value shapes a setting can decode to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
    Integer(i64),
    IntegerList(Vec<i64>),
    TransportPid(TransportPid),
    LuminanceFilter(LuminanceFilter),
    AspectRatio(AspectRatio),
    PictureSize(PictureSize),
    FrameRate(FrameRate),
    Location(Location),
    /// Unknown keys, and conditional keys that did not qualify for conversion.
    Raw(String),
}

/// `MPEG2_Transport_PID=Video,Audio,PCR`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransportPid {
    #[serde(rename = "Video")]
    pub video: f64,
    #[serde(rename = "Audio")]
    pub audio: f64,
    #[serde(rename = "PCR")]
    pub pcr: f64,
}

/// `Luminance_Filter=Gamma,Offset`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LuminanceFilter {
    #[serde(rename = "Gamma")]
    pub gamma: f64,
    #[serde(rename = "Offset")]
    pub offset: f64,
}

/// `Aspect_Ratio` in one of its three on-disk forms.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AspectRatio {
    /// A plain number such as `1.0`.
    Numeric(f64),
    /// A ratio string such as `16:9`, kept unchanged.
    Ratio(String),
    /// A comma-separated mix, one entry per source.
    List(Vec<AspectRatioEntry>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AspectRatioEntry {
    Ratio(String),
    Numeric(f64),
}

/// `Picture_Size=WxH`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PictureSize {
    pub width: u32,
    pub height: u32,
}

/// `Frame_Rate=LABEL (N/D)`, e.g. `29970 (30000/1001)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameRate {
    pub label: String,
    /// `(numerator, denominator)`
    pub fraction: (i64, i64),
}

/// `Location=StartFile,StartOffset,EndFile,EndOffset`, kept as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    #[serde(rename = "StartFile")]
    pub start_file: String,
    #[serde(rename = "StartOffset")]
    pub start_offset: String,
    #[serde(rename = "EndFile")]
    pub end_file: String,
    #[serde(rename = "EndOffset")]
    pub end_offset: String,
}

/// One line of the frame table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRecord {
    pub info: GopInfo,
    /// Quantizer matrix token, passed through untouched.
    pub matrix: String,
    pub file: u32,
    /// Byte offset of the GOP within `file`.
    pub position: u64,
    pub skip: u32,
    pub vob: u32,
    pub cell: u32,
    /// One entry per picture covered by this record.
    pub picture_flags: Vec<PictureFlags>,
}

/// Decoded info field of a frame table record.
///
/// Usually one byte, though DGIndex also writes wider values such as `900`.
/// Bits are counted from the most significant end of the value's binary form,
/// padded to at least eight digits:
/// ```text
///  bit:  0   1   2   3   4 ..
///       DLS CG  PS  NG  reserved
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GopInfo {
    /// Raw bit, 0 or 1.
    pub data_line_signal: u8,
    pub part_of_closed_gop: bool,
    pub part_of_progressive_sequence: bool,
    pub first_picture_of_new_gop: bool,
    /// Everything after the first four bits, as binary digits.
    pub reserved: String,
}

impl GopInfo {
    /// Decodes an info value of any width.
    pub fn from_value(value: u32) -> Self {
        let width = (u32::BITS - value.leading_zeros()).max(8);
        let bit = |n: u32| (value >> (width - 1 - n)) & 1;
        let reserved_width = (width - 4) as usize;
        let reserved_mask = (1u32 << reserved_width) - 1;
        Self {
            data_line_signal: bit(0) as u8,
            part_of_closed_gop: bit(1) == 1,
            part_of_progressive_sequence: bit(2) == 1,
            first_picture_of_new_gop: bit(3) == 1,
            reserved: format!("{:0w$b}", value & reserved_mask, w = reserved_width),
        }
    }
}

impl From<u8> for GopInfo {
    fn from(byte: u8) -> Self {
        Self::from_value(u32::from(byte))
    }
}

/// MPEG picture coding type, from two bits of a flag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PictureCodingType {
    #[serde(rename = "reserved")]
    Reserved,
    I,
    P,
    B,
}

impl PictureCodingType {
    /// Maps the low two bits of `bits`: 00 reserved, 01 I, 10 P, 11 B.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b01 => Self::I,
            0b10 => Self::P,
            0b11 => Self::B,
            _ => Self::Reserved,
        }
    }
}

/// Decoded per-picture flag byte.
///
/// Bit 0 is the most significant bit:
/// ```text
///  bit:  0     1     2 3    4 5   6    7
///       !RPG  PROG  TYPE   rsvd  TFF  RFF
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PictureFlags {
    /// Set when bit 0 is clear.
    pub require_previous_gop: bool,
    pub progressive_frame: bool,
    pub picture_coding_type: PictureCodingType,
    /// Bits 4-5 as two binary digits.
    pub reserved_bits: String,
    pub tff: bool,
    pub rff: bool,
}

impl From<u8> for PictureFlags {
    fn from(byte: u8) -> Self {
        Self {
            require_previous_gop: byte & 0x80 == 0,
            progressive_frame: byte & 0x40 != 0,
            picture_coding_type: PictureCodingType::from_bits(byte >> 4),
            reserved_bits: format!("{:02b}", (byte >> 2) & 0b11),
            tff: byte & 0x02 != 0,
            rff: byte & 0x01 != 0,
        }
    }
}

//! Settings block parsing and typed value conversion.
//!
//! The block is a run of `Key=Value` lines closed by a blank line. Values are
//! converted according to their key; keys this module does not know are kept
//! verbatim.
//!
//! Conversion runs in two passes. The first collects raw pairs, the second
//! converts them once the block's `Stream_Type` is known, because the
//! transport-stream keys depend on it.

use std::collections::BTreeMap;
use std::io::BufRead;
use std::str::FromStr;
use log::{debug, trace, warn};
use crate::d2v::types::error::{D2vError, FormatError, Result};
use crate::d2v::types::models::{
    keys, AspectRatio, AspectRatioEntry, FrameRate, Location, LuminanceFilter, PictureSize,
    SettingValue, Settings, TransportPid, TRANSPORT_STREAM,
};
use crate::d2v::types::options::StreamTypeScope;
use crate::d2v::utils::LineReader;

/// A `Key=Value` line before conversion.
#[derive(Debug)]
struct RawSetting {
    key: String,
    value: String,
    line: usize,
}

type ConvertResult<T> = std::result::Result<T, FormatError>;

/// Parses the settings block, consuming its blank terminator line.
pub(crate) fn parse<R: BufRead>(
    lines: &mut LineReader<R>,
    scope: StreamTypeScope,
) -> Result<Settings> {
    let raw = collect(lines)?;
    debug!("Collected {} raw setting(s)", raw.len());
    convert_all(&raw, scope)
}

/// First pass: split lines into key/value pairs, in file order.
fn collect<R: BufRead>(lines: &mut LineReader<R>) -> Result<Vec<RawSetting>> {
    let mut raw = Vec::new();
    loop {
        let line = lines.next_line_or_empty()?;
        if line.is_empty() {
            break;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(lines.error(FormatError::MalformedSetting { line }));
        };
        trace!("Setting {} = {}", key, value);
        raw.push(RawSetting {
            key: key.to_string(),
            value: value.to_string(),
            line: lines.line_number(),
        });
    }
    Ok(raw)
}

/// Second pass: convert each value; the last occurrence of a key wins.
fn convert_all(raw: &[RawSetting], scope: StreamTypeScope) -> Result<Settings> {
    // In `Preceding` scope this tracks the latest Stream_Type seen so far.
    let mut stream_type = match scope {
        StreamTypeScope::WholeBlock => final_stream_type(raw)?,
        StreamTypeScope::Preceding => None,
    };

    let mut entries = BTreeMap::new();
    for setting in raw {
        let value = convert(&setting.key, &setting.value, stream_type).map_err(|source| {
            D2vError::Format {
                line: setting.line,
                source,
            }
        })?;
        if scope == StreamTypeScope::Preceding
            && setting.key == keys::STREAM_TYPE
            && let SettingValue::Integer(v) = &value
        {
            stream_type = Some(*v);
        }
        if entries.insert(setting.key.clone(), value).is_some() {
            debug!("Duplicate setting {} on line {}, keeping the later value", setting.key, setting.line);
        }
    }

    for key in [keys::MPEG2_TRANSPORT_PID, keys::TRANSPORT_PACKET_SIZE] {
        if let Some(SettingValue::Raw(_)) = entries.get(key) {
            warn!("{} kept unconverted: no Stream_Type={} applies to it", key, TRANSPORT_STREAM);
        }
    }

    Ok(Settings::from_entries(entries))
}

/// The value of the last `Stream_Type` line in the block, if any.
fn final_stream_type(raw: &[RawSetting]) -> Result<Option<i64>> {
    raw.iter()
        .rev()
        .find(|s| s.key == keys::STREAM_TYPE)
        .map(|s| {
            parse_number(&s.key, &s.value).map_err(|source| D2vError::Format {
                line: s.line,
                source,
            })
        })
        .transpose()
}

fn convert(key: &str, value: &str, stream_type: Option<i64>) -> ConvertResult<SettingValue> {
    let is_transport = stream_type == Some(TRANSPORT_STREAM);
    let converted = match key {
        _ if keys::INTEGER_KEYS.contains(&key) => SettingValue::Integer(parse_number(key, value)?),
        keys::MPEG2_TRANSPORT_PID if is_transport => {
            let [video, audio, pcr] = split_fields(key, value)?;
            SettingValue::TransportPid(TransportPid {
                video: parse_number(key, video)?,
                audio: parse_number(key, audio)?,
                pcr: parse_number(key, pcr)?,
            })
        }
        keys::TRANSPORT_PACKET_SIZE if is_transport => {
            SettingValue::IntegerList(parse_list(key, value)?)
        }
        keys::LUMINANCE_FILTER => {
            let [gamma, offset] = split_fields(key, value)?;
            SettingValue::LuminanceFilter(LuminanceFilter {
                gamma: parse_number(key, gamma)?,
                offset: parse_number(key, offset)?,
            })
        }
        keys::CLIPPING => {
            let [left, right, top, bottom] = split_fields(key, value)?;
            SettingValue::IntegerList(vec![
                parse_number(key, left)?,
                parse_number(key, right)?,
                parse_number(key, top)?,
                parse_number(key, bottom)?,
            ])
        }
        keys::ASPECT_RATIO => SettingValue::AspectRatio(parse_aspect_ratio(key, value)?),
        keys::PICTURE_SIZE => SettingValue::PictureSize(parse_picture_size(key, value)?),
        keys::FRAME_RATE => SettingValue::FrameRate(parse_frame_rate(key, value)?),
        keys::LOCATION => {
            let [start_file, start_offset, end_file, end_offset] = split_fields(key, value)?;
            SettingValue::Location(Location {
                start_file: start_file.to_string(),
                start_offset: start_offset.to_string(),
                end_file: end_file.to_string(),
                end_offset: end_offset.to_string(),
            })
        }
        _ => SettingValue::Raw(value.to_string()),
    };
    Ok(converted)
}

/// Comma present: list. No colon: number. Otherwise the ratio string as-is.
fn parse_aspect_ratio(key: &str, value: &str) -> ConvertResult<AspectRatio> {
    if value.contains(',') {
        let entries = value
            .split(',')
            .map(|item| {
                if item.contains(':') {
                    Ok(AspectRatioEntry::Ratio(item.to_string()))
                } else {
                    parse_number(key, item).map(AspectRatioEntry::Numeric)
                }
            })
            .collect::<ConvertResult<Vec<_>>>()?;
        Ok(AspectRatio::List(entries))
    } else if !value.contains(':') {
        Ok(AspectRatio::Numeric(parse_number(key, value)?))
    } else {
        Ok(AspectRatio::Ratio(value.to_string()))
    }
}

fn parse_picture_size(key: &str, value: &str) -> ConvertResult<PictureSize> {
    let lowered = value.to_ascii_lowercase();
    let (width, height) = lowered
        .split_once('x')
        .filter(|(_, h)| !h.contains('x'))
        .ok_or_else(|| invalid(key, value))?;
    Ok(PictureSize {
        width: parse_number(key, width)?,
        height: parse_number(key, height)?,
    })
}

/// `29970 (30000/1001)` -> label `29970`, fraction `(30000, 1001)`
fn parse_frame_rate(key: &str, value: &str) -> ConvertResult<FrameRate> {
    let (label, fraction) = value.split_once(' ').ok_or_else(|| invalid(key, value))?;
    let (num, den) = fraction
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .split_once('/')
        .ok_or_else(|| invalid(key, value))?;
    Ok(FrameRate {
        label: label.to_string(),
        fraction: (parse_number(key, num)?, parse_number(key, den)?),
    })
}

fn parse_list(key: &str, value: &str) -> ConvertResult<Vec<i64>> {
    value.split(',').map(|item| parse_number(key, item)).collect()
}

/// Splits a comma-separated value into exactly `N` fields.
fn split_fields<'a, const N: usize>(key: &str, value: &'a str) -> ConvertResult<[&'a str; N]> {
    value
        .split(',')
        .collect::<Vec<_>>()
        .try_into()
        .map_err(|_| invalid(key, value))
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> ConvertResult<T> {
    value.trim().parse().map_err(|_| invalid(key, value))
}

fn invalid(key: &str, value: &str) -> FormatError {
    FormatError::InvalidSettingValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

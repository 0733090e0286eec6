//! Text and clock payloads
//!
//! Strings travel as UTF-8 followed by a NUL terminator; the device may pad
//! with further NULs. The clock is an ISO-8601 string in the same framing.

use chrono::{DateTime, NaiveDateTime, Timelike};

use crate::error::{ProOsError, Result};

const ISO_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";
const ISO_MICROS: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Local timestamp layouts accepted on decode, tried in order
const LOCAL_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Decode a NUL-terminated string, dropping the terminator and padding
pub fn decode_text(payload: &[u8]) -> Result<String> {
    let text = std::str::from_utf8(payload)
        .map_err(|e| ProOsError::Payload(format!("text is not UTF-8: {}", e)))?;
    Ok(text.trim_end_matches('\0').to_string())
}

pub fn encode_text(text: &str) -> Vec<u8> {
    let mut payload = Vec::with_capacity(text.len() + 1);
    payload.extend_from_slice(text.as_bytes());
    payload.push(0);
    payload
}

/// Decode a device clock reading
///
/// Accepts a local timestamp (`2024-05-01T12:30:00`, optional fraction,
/// seconds may be omitted, `T` or space separator) or an RFC 3339 timestamp with offset, in which
/// case the wall-clock part is kept.
pub fn decode_time(payload: &[u8]) -> Result<NaiveDateTime> {
    let text = decode_text(payload)?;
    let text = text.trim();

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(text) {
        return Ok(with_offset.naive_local());
    }

    LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .ok_or_else(|| ProOsError::Payload(format!("invalid time '{}'", text)))
}

/// Encode a clock value, with microseconds only when nonzero
pub fn encode_time(time: &NaiveDateTime) -> Vec<u8> {
    let format = if time.nanosecond() / 1_000 == 0 {
        ISO_SECONDS
    } else {
        ISO_MICROS
    };
    encode_text(&time.format(format).to_string())
}

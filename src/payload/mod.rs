//! Payload Module
//!
//! Per-command payload layouts.
//!
//! | Command                    | Argument        | Result            |
//! |----------------------------|-----------------|-------------------|
//! | GET_PROTOCOL_VERSION       | -               | u32               |
//! | ECHO                       | bytes           | same bytes        |
//! | REBOOT, PUMP_START/STOP    | -               | -                 |
//! | GET_TELEMETRY              | -               | 36-byte record    |
//! | GET_TIME                   | -               | ISO-8601 text     |
//! | SET_TIME                   | ISO-8601 text   | -                 |
//! | GET_SOFTWARE_VERSION       | -               | text              |
//! | GET_(CPU_)SERIAL_NUMBER    | -               | text              |
//! | GET_NETWORK_CONFIGURATION  | -               | text              |
//! | SET_SETPOINT               | u32             | -                 |
//!
//! Integers are little-endian; text is UTF-8 with a NUL terminator.

mod telemetry;
mod text;

pub use telemetry::{Telemetry, TELEMETRY_SIZE};
pub use text::{decode_text, decode_time, encode_text, encode_time};

use crate::error::{ProOsError, Result};

/// Decode a leading little-endian u32; extra bytes are ignored
pub fn decode_u32(payload: &[u8]) -> Result<u32> {
    let Some(head) = payload.first_chunk::<4>() else {
        return Err(ProOsError::Payload(format!(
            "expected a 4-byte integer, got {} bytes",
            payload.len()
        )));
    };
    Ok(u32::from_le_bytes(*head))
}

pub fn encode_u32(value: u32) -> Vec<u8> {
    value.to_le_bytes().to_vec()
}

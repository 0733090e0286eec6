//! Status code definitions
//!
//! Result codes written by the device into the protocol header.

use std::fmt;

/// Device status codes (32-bit on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// Packet processed successfully
    Ok,
    /// Initial request status; written by the client into every request
    NotProcessed,
    InternalError,
    InternalNullPtr,
    InternalBadArg,
    InternalOverflow,
    InternalTimeout,
    /// To/From address was incorrectly set
    InvalidAddress,
    InvalidStatus,
    /// Command not found or not supported
    InvalidCommand,
    /// Device is configured read-only
    WriteProtected,
    CommandBadArg,
    /// Command called out of order (file get sequence)
    CommandNotInProgress,
    CommandWrongSequence,
    CommandCrcInvalid,
    /// Requested file does not exist or is empty
    CommandFileEmpty,
    Unknown(u32),
}

impl StatusCode {
    const NAMED: [StatusCode; 16] = [
        StatusCode::Ok,
        StatusCode::NotProcessed,
        StatusCode::InternalError,
        StatusCode::InternalNullPtr,
        StatusCode::InternalBadArg,
        StatusCode::InternalOverflow,
        StatusCode::InternalTimeout,
        StatusCode::InvalidAddress,
        StatusCode::InvalidStatus,
        StatusCode::InvalidCommand,
        StatusCode::WriteProtected,
        StatusCode::CommandBadArg,
        StatusCode::CommandNotInProgress,
        StatusCode::CommandWrongSequence,
        StatusCode::CommandCrcInvalid,
        StatusCode::CommandFileEmpty,
    ];

    pub fn as_u32(self) -> u32 {
        match self {
            StatusCode::Ok => 0x0000_0000,
            StatusCode::NotProcessed => 0x0FFF_FFFF,
            StatusCode::InternalError => 0xB000_0000,
            StatusCode::InternalNullPtr => 0xB000_0001,
            StatusCode::InternalBadArg => 0xB000_0002,
            StatusCode::InternalOverflow => 0xB000_0003,
            StatusCode::InternalTimeout => 0xB000_0004,
            StatusCode::InvalidAddress => 0xC000_0000,
            StatusCode::InvalidStatus => 0xC000_0001,
            StatusCode::InvalidCommand => 0xC000_0002,
            StatusCode::WriteProtected => 0xC000_0003,
            StatusCode::CommandBadArg => 0xE000_0000,
            StatusCode::CommandNotInProgress => 0xE000_0001,
            StatusCode::CommandWrongSequence => 0xE000_0002,
            StatusCode::CommandCrcInvalid => 0xE000_0003,
            StatusCode::CommandFileEmpty => 0xE000_0004,
            StatusCode::Unknown(raw) => raw,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NotProcessed => "NOT_PROCESSED",
            StatusCode::InternalError => "INTERNAL_ERROR",
            StatusCode::InternalNullPtr => "INTERNAL_NULL_PTR",
            StatusCode::InternalBadArg => "INTERNAL_BAD_ARG",
            StatusCode::InternalOverflow => "INTERNAL_OVERFLOW",
            StatusCode::InternalTimeout => "INTERNAL_TIMEOUT",
            StatusCode::InvalidAddress => "INVALID_ADDRESS",
            StatusCode::InvalidStatus => "INVALID_STATUS",
            StatusCode::InvalidCommand => "INVALID_COMMAND",
            StatusCode::WriteProtected => "WRITE_PROTECTED",
            StatusCode::CommandBadArg => "COMMAND_BAD_ARG",
            StatusCode::CommandNotInProgress => "COMMAND_NOT_IN_PROGRESS",
            StatusCode::CommandWrongSequence => "COMMAND_WRONG_SEQUENCE",
            StatusCode::CommandCrcInvalid => "COMMAND_CRC_INVALID",
            StatusCode::CommandFileEmpty => "COMMAND_FILE_EMPTY",
            StatusCode::Unknown(_) => "UNKNOWN",
        }
    }

    pub fn is_ok(self) -> bool {
        self == StatusCode::Ok
    }
}

impl From<u32> for StatusCode {
    fn from(raw: u32) -> Self {
        StatusCode::NAMED
            .iter()
            .copied()
            .find(|status| status.as_u32() == raw)
            .unwrap_or(StatusCode::Unknown(raw))
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusCode::Unknown(raw) => write!(f, "UNKNOWN(0x{:08x})", raw),
            named => f.write_str(named.name()),
        }
    }
}

//! Error types for pro-os-connect
//!
//! Provides a unified error type for all operations, plus the structural
//! frame validation failures reported by the codec.

use std::time::Duration;

use thiserror::Error;

use crate::protocol::{Command, StatusCode};

/// Result type alias using ProOsError
pub type Result<T> = std::result::Result<T, ProOsError>;

/// Unified error type for pro-os-connect operations
#[derive(Debug, Error)]
pub enum ProOsError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Transaction Errors
    // -------------------------------------------------------------------------
    #[error("Timeout waiting for response after {elapsed:?}")]
    Timeout { elapsed: Duration },

    #[error("Malformed frame: {0}")]
    Frame(#[from] FrameError),

    #[error("Device rejected {command}: {status}")]
    DeviceStatus { command: Command, status: StatusCode },

    // -------------------------------------------------------------------------
    // Payload Errors
    // -------------------------------------------------------------------------
    #[error("Payload error: {0}")]
    Payload(String),

    #[error("Echo payload mismatch: sent {sent} bytes, received {received} bytes")]
    EchoMismatch { sent: usize, received: usize },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ProOsError {
    /// The device status carried by a `DeviceStatus` error
    pub fn device_status(&self) -> Option<StatusCode> {
        match self {
            ProOsError::DeviceStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ProOsError::Timeout { .. })
    }
}

/// Structural frame validation failures, in the order they are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("framing phrase invalid: 0x{found:08x}")]
    Framing { found: u32 },

    #[error("header CRC mismatch: calculated=0x{expected:08x} received=0x{found:08x}")]
    HeaderChecksum { expected: u32, found: u32 },

    #[error("payload length mismatch: actual={actual} header={declared}")]
    LengthMismatch { declared: u32, actual: usize },

    #[error("protocol packet of {length} bytes is shorter than its header")]
    ShortPacket { length: u32 },

    #[error("payload CRC mismatch: calculated=0x{expected:08x} received=0x{found:08x}")]
    PayloadChecksum { expected: u32, found: u32 },
}


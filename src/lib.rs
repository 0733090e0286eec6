//! # pro-os-connect
//!
//! Client for the Pro OS binary command protocol:
//! - Framed request/response packets with CRC-32/MPEG-2 integrity checks
//! - Incremental frame recognition over arbitrary TCP chunk boundaries
//! - Deadline-bounded transactions, one in flight per connection
//! - Typed payloads for telemetry, clock, identity and control commands
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Client                                │
//! │              (typed per-command operations)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │              Connection + Transaction                        │
//! │        (locked stream, send, poll under deadline)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ Accumulator │─────────▶│ Frame Codec │
//!   │  (bytes in) │          │ (validate)  │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │  Checksum   │
//!                           │ (MPEG-2)    │
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod payload;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FrameError, ProOsError, Result};
pub use config::{Config, FramePolicy};
pub use client::Client;
pub use network::Connection;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of pro-os-connect
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

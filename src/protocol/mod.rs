//! Protocol Module
//!
//! Defines the Pro OS wire protocol.
//!
//! ## Frame Layout
//! ```text
//! ┌───────────────────────────┬───────────────────────────┬───────────────┐
//! │ Transport Header (16)     │ Protocol Header (12)      │ Payload       │
//! │ framing|len|pcrc|hcrc     │ cmd|status|from|to        │ (per command) │
//! └───────────────────────────┴───────────────────────────┴───────────────┘
//! ```
//!
//! ### Integrity
//! - Header CRC: CRC-32/MPEG-2 of the first 12 transport header bytes
//! - Packet CRC: CRC-32/MPEG-2 of protocol header + payload
//!
//! ### Nodes
//! - 0x0001: PRO_OS (the device)
//! - 0x0002: NETWORK_CARD
//! - 0x0003: CLIENT

mod checksum;
mod command;
mod status;
mod quirks;
mod codec;

pub use checksum::checksum;
pub use command::{Command, Node};
pub use status::StatusCode;
pub use quirks::CrcQuirks;
pub use codec::{
    decode, encode, Decoded, ParsedFrame, ProtocolHeader, Request, TransportHeader,
    FRAMING_PHRASE, PROTOCOL_HEADER_SIZE, TRANSPORT_HEADER_SIZE,
};

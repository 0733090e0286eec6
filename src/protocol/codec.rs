//! Frame codec
//!
//! Encoding of requests and validation/decoding of response frames.
//!
//! ## Wire Format (all fields little-endian)
//!
//! ### Transport Header
//! ```text
//! ┌──────────────┬──────────────┬──────────────┬──────────────┬──────────
//! │ Framing (4)  │ Length (4)   │ Packet CRC(4)│ Header CRC(4)│ Protocol
//! │ 0xB0FAB0FA   │              │              │ of bytes 0-11│ packet -->
//! └──────────────┴──────────────┴──────────────┴──────────────┴──────────
//! ```
//!
//! ### Protocol Packet
//! ```text
//! ┌──────────────┬──────────────┬────────┬────────┬──────────────────────
//! │ Command (4)  │ Status (4)   │From (2)│ To (2) │ Payload -->
//! └──────────────┴──────────────┴────────┴────────┴──────────────────────
//! ```

use crate::error::FrameError;
use super::checksum::checksum;
use super::{Command, CrcQuirks, Node, StatusCode};

/// Magic constant opening every transport frame
pub const FRAMING_PHRASE: u32 = 0xB0FA_B0FA;

/// Transport header size: framing (4) + length (4) + packet CRC (4) + header CRC (4)
pub const TRANSPORT_HEADER_SIZE: usize = 16;

/// Protocol header size: command (4) + status (4) + from (2) + to (2)
pub const PROTOCOL_HEADER_SIZE: usize = 12;

/// Bytes of the transport header covered by the header CRC
const HEADER_CRC_SPAN: usize = 12;

// =============================================================================
// Headers
// =============================================================================

/// The 16-byte envelope around a protocol packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportHeader {
    pub framing_phrase: u32,
    pub payload_length: u32,
    pub payload_crc: u32,
    pub header_crc: u32,
}

impl TransportHeader {
    /// Build a header for a protocol packet, computing both CRCs
    pub fn for_packet(packet: &[u8]) -> Self {
        let mut header = Self {
            framing_phrase: FRAMING_PHRASE,
            payload_length: packet.len() as u32,
            payload_crc: checksum(packet),
            header_crc: 0,
        };
        header.header_crc = checksum(&header.to_bytes()[..HEADER_CRC_SPAN]);
        header
    }

    pub fn to_bytes(&self) -> [u8; TRANSPORT_HEADER_SIZE] {
        let mut buf = [0u8; TRANSPORT_HEADER_SIZE];
        buf[0..4].copy_from_slice(&self.framing_phrase.to_le_bytes());
        buf[4..8].copy_from_slice(&self.payload_length.to_le_bytes());
        buf[8..12].copy_from_slice(&self.payload_crc.to_le_bytes());
        buf[12..16].copy_from_slice(&self.header_crc.to_le_bytes());
        buf
    }

    pub fn from_bytes(buf: &[u8; TRANSPORT_HEADER_SIZE]) -> Self {
        Self {
            framing_phrase: u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
            payload_length: u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
            payload_crc: u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]),
            header_crc: u32::from_le_bytes([buf[12], buf[13], buf[14], buf[15]]),
        }
    }
}

/// The 12-byte header at the start of every protocol packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolHeader {
    pub command: Command,
    pub status: StatusCode,
    pub from_addr: Node,
    pub to_addr: Node,
}

impl ProtocolHeader {
    pub fn to_bytes(&self) -> [u8; PROTOCOL_HEADER_SIZE] {
        let mut buf = [0u8; PROTOCOL_HEADER_SIZE];
        buf[0..4].copy_from_slice(&self.command.as_u32().to_le_bytes());
        buf[4..8].copy_from_slice(&self.status.as_u32().to_le_bytes());
        buf[8..10].copy_from_slice(&self.from_addr.as_u16().to_le_bytes());
        buf[10..12].copy_from_slice(&self.to_addr.as_u16().to_le_bytes());
        buf
    }

    pub fn from_bytes(buf: &[u8; PROTOCOL_HEADER_SIZE]) -> Self {
        Self {
            command: Command::from(u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]])),
            status: StatusCode::from(u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]])),
            from_addr: Node::from(u16::from_le_bytes([buf[8], buf[9]])),
            to_addr: Node::from(u16::from_le_bytes([buf[10], buf[11]])),
        }
    }
}

// =============================================================================
// Request Encoding
// =============================================================================

/// An outbound request. Serialized once, then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub command: Command,
    pub payload: Vec<u8>,
    pub to_addr: Node,
}

impl Request {
    /// A request with no payload, addressed to the device
    pub fn new(command: Command) -> Self {
        Self {
            command,
            payload: Vec::new(),
            to_addr: Node::ProOs,
        }
    }

    pub fn with_payload(command: Command, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            command,
            payload: payload.into(),
            to_addr: Node::ProOs,
        }
    }

    /// Address the request to a different node
    pub fn to(mut self, node: Node) -> Self {
        self.to_addr = node;
        self
    }

    pub fn encode(&self) -> Vec<u8> {
        encode(self.command, &self.payload, self.to_addr)
    }
}

/// Encode a request frame
///
/// The protocol header carries `status = NOT_PROCESSED` and `from = CLIENT`.
pub fn encode(command: Command, payload: &[u8], to_addr: Node) -> Vec<u8> {
    let header = ProtocolHeader {
        command,
        status: StatusCode::NotProcessed,
        from_addr: Node::Client,
        to_addr,
    };

    let mut packet = Vec::with_capacity(PROTOCOL_HEADER_SIZE + payload.len());
    packet.extend_from_slice(&header.to_bytes());
    packet.extend_from_slice(payload);

    let transport = TransportHeader::for_packet(&packet);

    let mut frame = Vec::with_capacity(TRANSPORT_HEADER_SIZE + packet.len());
    frame.extend_from_slice(&transport.to_bytes());
    frame.extend_from_slice(&packet);
    frame
}

// =============================================================================
// Frame Decoding
// =============================================================================

/// A validated inbound frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFrame {
    pub transport: TransportHeader,
    pub header: ProtocolHeader,
    pub payload: Vec<u8>,

    /// True if the payload CRC mismatched but the command is quirk-listed
    pub crc_quirk_applied: bool,
}

impl ParsedFrame {
    pub fn command(&self) -> Command {
        self.header.command
    }

    pub fn status(&self) -> StatusCode {
        self.header.status
    }

    /// Bytes this frame occupies on the wire
    pub fn wire_len(&self) -> usize {
        TRANSPORT_HEADER_SIZE + self.transport.payload_length as usize
    }
}

/// Outcome of a decode attempt that did not hit a structural error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Complete(ParsedFrame),
    /// More bytes are needed before the frame can be judged
    Incomplete,
}

impl Decoded {
    pub fn is_complete(&self) -> bool {
        matches!(self, Decoded::Complete(_))
    }
}

/// Validate and decode a response frame
///
/// Checks run in a fixed order:
/// 1. at least 16 bytes present (otherwise `Incomplete`)
/// 2. framing phrase
/// 3. header CRC over the first 12 header bytes
/// 4. packet length (short is `Incomplete`, long is an error)
/// 5. protocol header parse
/// 6. packet CRC, tolerated for quirk-listed commands
///
/// The packet CRC check needs the parsed command, so it is always last.
pub fn decode(buffer: &[u8], quirks: &CrcQuirks) -> Result<Decoded, FrameError> {
    let Some(header_bytes) = buffer.first_chunk::<TRANSPORT_HEADER_SIZE>() else {
        return Ok(Decoded::Incomplete);
    };
    let transport = TransportHeader::from_bytes(header_bytes);

    if transport.framing_phrase != FRAMING_PHRASE {
        return Err(FrameError::Framing {
            found: transport.framing_phrase,
        });
    }

    let calculated_header_crc = checksum(&header_bytes[..HEADER_CRC_SPAN]);
    if calculated_header_crc != transport.header_crc {
        return Err(FrameError::HeaderChecksum {
            expected: calculated_header_crc,
            found: transport.header_crc,
        });
    }

    let packet = &buffer[TRANSPORT_HEADER_SIZE..];
    let declared = transport.payload_length as usize;
    if packet.len() < declared {
        return Ok(Decoded::Incomplete);
    }
    if packet.len() > declared {
        return Err(FrameError::LengthMismatch {
            declared: transport.payload_length,
            actual: packet.len(),
        });
    }

    let Some(protocol_bytes) = packet.first_chunk::<PROTOCOL_HEADER_SIZE>() else {
        return Err(FrameError::ShortPacket {
            length: transport.payload_length,
        });
    };
    let header = ProtocolHeader::from_bytes(protocol_bytes);

    let calculated_payload_crc = checksum(packet);
    let mut crc_quirk_applied = false;
    if calculated_payload_crc != transport.payload_crc {
        if !quirks.contains(header.command) {
            return Err(FrameError::PayloadChecksum {
                expected: calculated_payload_crc,
                found: transport.payload_crc,
            });
        }
        tracing::warn!(
            "Response payload CRC mismatch for {}: calculated={:08x} received={:08x}",
            header.command,
            calculated_payload_crc,
            transport.payload_crc
        );
        crc_quirk_applied = true;
    }

    Ok(Decoded::Complete(ParsedFrame {
        transport,
        header,
        payload: packet[PROTOCOL_HEADER_SIZE..].to_vec(),
        crc_quirk_applied,
    }))
}

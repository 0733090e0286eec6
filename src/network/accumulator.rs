//! Stream accumulator
//!
//! Collects bytes from the transport, whatever the chunk boundaries, and
//! reports after each chunk whether a complete valid frame is present.
//!
//! The whole buffer is re-validated from scratch on every attempt, so
//! acceptance depends only on the bytes received so far. Once a frame is
//! recognized it is kept and never re-parsed.

use bytes::BytesMut;

use crate::error::FrameError;
use crate::protocol::{decode, CrcQuirks, Decoded, ParsedFrame};

/// Append-only receive buffer for a single response
pub struct StreamAccumulator {
    /// Every byte received for this response
    buffer: BytesMut,

    /// Payload CRC quirk list applied when decoding
    quirks: CrcQuirks,

    /// The recognized frame, once there is one
    frame: Option<ParsedFrame>,
}

impl StreamAccumulator {
    pub fn new(quirks: CrcQuirks) -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
            quirks,
            frame: None,
        }
    }

    /// Append a chunk received from the transport
    pub fn feed(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Decode the current buffer
    ///
    /// Safe to call after every chunk. After the first success the same
    /// frame is returned, even if more bytes have been fed since.
    pub fn try_complete(&mut self) -> Result<Decoded, FrameError> {
        if let Some(frame) = &self.frame {
            return Ok(Decoded::Complete(frame.clone()));
        }

        let decoded = decode(&self.buffer, &self.quirks)?;
        if let Decoded::Complete(frame) = &decoded {
            tracing::trace!(
                "Frame complete: {} bytes, command={}",
                frame.wire_len(),
                frame.command()
            );
            self.frame = Some(frame.clone());
        }
        Ok(decoded)
    }

    /// Take ownership of the recognized frame, if any
    pub fn into_frame(self) -> Option<ParsedFrame> {
        self.frame
    }

    /// Bytes received after the recognized frame ended
    pub fn trailing(&self) -> &[u8] {
        match &self.frame {
            Some(frame) => &self.buffer[frame.wire_len().min(self.buffer.len())..],
            None => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }
}

//! Transaction Engine
//!
//! One request/response exchange against a connected stream.
//!
//! ## State Machine
//! ```text
//! Idle ──send──▶ Sent ──▶ Accumulating ──valid frame──▶ Complete
//!   │                          │
//!   └──deadline during send────┼─────────────────────────▶ TimedOut
//!                              │
//!                              ├──deadline──────────────▶ TimedOut
//!                              └──I/O error / fail-fast──▶ Failed
//! ```
//!
//! A device-reported error status is still `Complete`: the exchange finished,
//! the device just said no.

use std::fmt::Write as _;
use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::time::{Duration, Instant};

use crate::config::{Config, FramePolicy};
use crate::error::{ProOsError, Result};
use crate::protocol::{CrcQuirks, Decoded, ParsedFrame, Request};
use super::StreamAccumulator;

/// Receive chunk size
const READ_CHUNK_SIZE: usize = 4096;

/// Shortest wait handed to the socket; a zero read timeout is rejected
const MIN_POLL_WAIT: Duration = Duration::from_millis(1);

/// Lifecycle of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Idle,
    Sent,
    Accumulating,
    Complete,
    TimedOut,
    Failed,
}

impl TransactionState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TransactionState::Complete | TransactionState::TimedOut | TransactionState::Failed
        )
    }
}

/// Drives one request/response exchange
pub struct Transaction {
    state: TransactionState,

    /// Overall deadline, covering the stale-byte drain, the send and the wait
    timeout: Duration,

    poll_interval: Duration,

    frame_policy: FramePolicy,

    quirks: CrcQuirks,
}

impl Transaction {
    pub fn new(config: &Config) -> Self {
        Self {
            state: TransactionState::Idle,
            timeout: config.timeout,
            poll_interval: config.poll_interval,
            frame_policy: config.frame_policy,
            quirks: config.crc_quirks.clone(),
        }
    }

    /// Override the configured deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Send `request` and wait for its validated response
    ///
    /// Returns the parsed frame when the device reports `OK`. Any other
    /// status becomes `ProOsError::DeviceStatus`.
    pub fn execute(&mut self, stream: &mut TcpStream, request: &Request) -> Result<ParsedFrame> {
        let result = self.run(stream, request);
        if result.is_err() && !self.state.is_terminal() {
            self.state = TransactionState::Failed;
        }
        result
    }

    fn run(&mut self, stream: &mut TcpStream, request: &Request) -> Result<ParsedFrame> {
        debug_assert_eq!(self.state, TransactionState::Idle, "transactions are single use");

        let packet = request.encode();
        let start = Instant::now();

        discard_stale_bytes(stream)?;

        tracing::debug!("Sending {} packet: {}", request.command, hex(&packet));
        self.send(stream, &packet, start)?;
        self.state = TransactionState::Sent;

        let frame = self.accumulate(stream, start)?;
        self.state = TransactionState::Complete;

        if frame.command() != request.command {
            tracing::debug!(
                "Response command {} differs from request command {}",
                frame.command(),
                request.command
            );
        }

        let status = frame.status();
        if !status.is_ok() {
            tracing::debug!("Response status: {}", status);
            return Err(ProOsError::DeviceStatus {
                command: request.command,
                status,
            });
        }

        Ok(frame)
    }

    /// Write the whole request, giving up when the deadline passes
    fn send(&mut self, stream: &mut TcpStream, packet: &[u8], start: Instant) -> Result<()> {
        let mut written = 0;

        while written < packet.len() {
            let remaining = self.remaining(start)?;
            stream.set_write_timeout(Some(remaining.max(MIN_POLL_WAIT)))?;

            match stream.write(&packet[written..]) {
                Ok(0) => return Err(io::Error::from(io::ErrorKind::WriteZero).into()),
                Ok(n) => written += n,
                Err(ref e)
                    if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) =>
                {
                    let elapsed = start.elapsed();
                    self.state = TransactionState::TimedOut;
                    tracing::debug!(
                        "Timed out after {:?} with {} of {} bytes sent",
                        elapsed,
                        written,
                        packet.len()
                    );
                    return Err(ProOsError::Timeout { elapsed });
                }
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }

        stream.flush()?;
        Ok(())
    }

    /// Time left before the deadline, or `Timeout` once it has passed
    fn remaining(&mut self, start: Instant) -> Result<Duration> {
        let elapsed = start.elapsed();
        if elapsed >= self.timeout {
            self.state = TransactionState::TimedOut;
            return Err(ProOsError::Timeout { elapsed });
        }
        Ok(self.timeout - elapsed)
    }

    /// Read until a valid frame is recognized or the deadline passes
    fn accumulate(&mut self, stream: &mut TcpStream, start: Instant) -> Result<ParsedFrame> {
        self.state = TransactionState::Accumulating;
        tracing::debug!("Waiting for response...");

        let mut accumulator = StreamAccumulator::new(self.quirks.clone());
        let mut chunk = [0u8; READ_CHUNK_SIZE];

        loop {
            let remaining = match self.remaining(start) {
                Ok(remaining) => remaining,
                Err(e) => {
                    tracing::debug!(
                        "Timed out after {:?} with {} bytes buffered",
                        start.elapsed(),
                        accumulator.len()
                    );
                    return Err(e);
                }
            };

            let wait = remaining.min(self.poll_interval).max(MIN_POLL_WAIT);
            stream.set_read_timeout(Some(wait))?;

            let n = match stream.read(&mut chunk) {
                Ok(0) => {
                    return Err(ProOsError::Io(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "device closed the connection",
                    )));
                }
                Ok(n) => n,
                Err(ref e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::WouldBlock
                            | io::ErrorKind::TimedOut
                            | io::ErrorKind::Interrupted
                    ) =>
                {
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            tracing::debug!("Received packet: {}", hex(&chunk[..n]));
            accumulator.feed(&chunk[..n]);

            match accumulator.try_complete() {
                Ok(Decoded::Complete(frame)) => return Ok(frame),
                Ok(Decoded::Incomplete) => {
                    tracing::trace!("Incomplete frame, {} bytes buffered", accumulator.len());
                }
                Err(e) => match self.frame_policy {
                    FramePolicy::FailFast => return Err(e.into()),
                    FramePolicy::WaitForDeadline => {
                        tracing::debug!("Invalid frame so far ({}), waiting for more", e);
                    }
                },
            }
        }
    }
}

/// Drop bytes left on the socket by an earlier, abandoned exchange
fn discard_stale_bytes(stream: &mut TcpStream) -> Result<()> {
    stream.set_nonblocking(true)?;
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    let mut discarded = 0usize;

    let outcome = loop {
        match stream.read(&mut chunk) {
            // Closed; the next read reports it
            Ok(0) => break Ok(()),
            Ok(n) => discarded += n,
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => break Ok(()),
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => break Err(e),
        }
    };

    stream.set_nonblocking(false)?;
    outcome?;

    if discarded > 0 {
        tracing::warn!("Discarded {} stale bytes from a previous exchange", discarded);
    }
    Ok(())
}

fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{:02x}", byte);
    }
    out
}

//! Device Connection
//!
//! Owns the TCP stream to one device for the caller's whole session.

use std::io;
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{ProOsError, Result};
use crate::protocol::{ParsedFrame, Request};
use super::Transaction;

/// A connected device session
///
/// The protocol carries no request identifier, so the stream sits behind a
/// mutex that every transaction holds from send until its response is
/// resolved. Concurrent callers are serialized here.
pub struct Connection {
    /// TCP stream, exclusively held by the running transaction
    stream: Mutex<TcpStream>,

    /// Settings for transactions on this connection
    config: Config,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Connect to the device described by `config`
    pub fn connect(config: Config) -> Result<Self> {
        let addr = config.addr();
        let stream = open_stream(&config.host, config.port, config.connect_timeout)
            .map_err(|source| ProOsError::Connect {
                addr: addr.clone(),
                source,
            })?;

        // Requests are small; send them immediately
        stream.set_nodelay(true)?;

        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or(addr);

        tracing::debug!("Connected to {}", peer_addr);

        Ok(Self {
            stream: Mutex::new(stream),
            config,
            peer_addr,
        })
    }

    /// Connect with default settings apart from address and deadline
    pub fn open(host: &str, port: u16, timeout: Duration) -> Result<Self> {
        let config = Config::builder()
            .host(host)
            .port(port)
            .timeout(timeout)
            .connect_timeout(timeout)
            .build();
        Self::connect(config)
    }

    /// Run one transaction with the configured deadline and return the payload
    pub fn execute(&self, request: &Request) -> Result<Vec<u8>> {
        self.execute_with_timeout(request, self.config.timeout)
    }

    /// Run one transaction with an explicit deadline and return the payload
    pub fn execute_with_timeout(&self, request: &Request, timeout: Duration) -> Result<Vec<u8>> {
        self.transact(request, timeout).map(|frame| frame.payload)
    }

    /// Run one transaction and return the whole validated frame
    pub fn transact(&self, request: &Request, timeout: Duration) -> Result<ParsedFrame> {
        let mut stream = self.stream.lock();
        let mut transaction = Transaction::new(&self.config).with_timeout(timeout);
        transaction.execute(&mut stream, request)
    }

    /// Close the connection
    pub fn disconnect(self) -> Result<()> {
        let stream = self.stream.into_inner();
        match stream.shutdown(Shutdown::Both) {
            Ok(()) => {}
            // Peer already gone
            Err(e) if e.kind() == io::ErrorKind::NotConnected => {}
            Err(e) => return Err(e.into()),
        }
        tracing::debug!("Disconnected from {}", self.peer_addr);
        Ok(())
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Try every resolved address in turn, keeping the last error
fn open_stream(host: &str, port: u16, timeout: Duration) -> io::Result<TcpStream> {
    let mut last_err = None;

    for addr in (host, port).to_socket_addrs()? {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }

    Err(last_err.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} did not resolve to any address", host),
        )
    }))
}

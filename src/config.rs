//! Configuration for pro-os-connect
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use crate::protocol::{CrcQuirks, Node};

/// Default device TCP port
pub const DEFAULT_PORT: u16 = 2345;

/// Main configuration for a device connection
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Device hostname or IP address
    pub host: String,

    /// Device TCP port
    pub port: u16,

    /// TCP connect timeout
    pub connect_timeout: Duration,

    // -------------------------------------------------------------------------
    // Transaction Configuration
    // -------------------------------------------------------------------------
    /// Overall deadline for one request/response exchange
    pub timeout: Duration,

    /// Upper bound on a single wait for readability
    pub poll_interval: Duration,

    /// Node requests are addressed to
    pub target: Node,

    /// What to do when received bytes fail structural validation
    pub frame_policy: FramePolicy,

    // -------------------------------------------------------------------------
    // Firmware Compatibility
    // -------------------------------------------------------------------------
    /// Commands whose payload CRC is not enforced
    pub crc_quirks: CrcQuirks,
}

/// Reaction to a structurally invalid frame during accumulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramePolicy {
    /// Keep reading until the deadline. The buffer is never rescanned for a
    /// later frame start, so a malformed frame surfaces as a timeout.
    #[default]
    WaitForDeadline,

    /// Abort the transaction with the frame error as soon as it is seen
    FailFast,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(100),
            target: Node::ProOs,
            frame_policy: FramePolicy::WaitForDeadline,
            crc_quirks: CrcQuirks::default(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// `host:port` string used for connecting and logging
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the device host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the device port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the overall transaction deadline
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Set the node requests are addressed to
    pub fn target(mut self, node: Node) -> Self {
        self.config.target = node;
        self
    }

    pub fn frame_policy(mut self, policy: FramePolicy) -> Self {
        self.config.frame_policy = policy;
        self
    }

    /// Replace the payload CRC quirk list
    pub fn crc_quirks(mut self, quirks: CrcQuirks) -> Self {
        self.config.crc_quirks = quirks;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

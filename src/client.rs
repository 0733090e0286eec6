//! Client Module
//!
//! Typed wrappers for the device operations.
//!
//! ## Failure Policy
//! Every operation returns `Result`. Connection, timeout, device status and
//! payload shape failures all surface as `ProOsError`; nothing is turned
//! into an absent value here. Callers that prefer "no result" can apply
//! `.ok()` themselves.

use chrono::NaiveDateTime;

use crate::config::Config;
use crate::error::{ProOsError, Result};
use crate::network::Connection;
use crate::payload::{self, Telemetry};
use crate::protocol::{Command, Request};

/// Payload sent by `echo_default`
pub const DEFAULT_ECHO_PAYLOAD: &[u8] = b"Test Echo Payload";

/// Typed client for one device
pub struct Client {
    connection: Connection,
}

impl Client {
    /// Connect to the device described by `config`
    pub fn connect(config: Config) -> Result<Self> {
        Ok(Self {
            connection: Connection::connect(config)?,
        })
    }

    pub fn from_connection(connection: Connection) -> Self {
        Self { connection }
    }

    /// Send a command with an arbitrary payload and return the raw result
    pub fn request(&self, command: Command, payload: &[u8]) -> Result<Vec<u8>> {
        let request = Request::with_payload(command, payload).to(self.connection.config().target);
        self.connection.execute(&request)
    }

    fn call(&self, command: Command) -> Result<Vec<u8>> {
        self.request(command, &[])
    }

    // =========================================================================
    // Device Information
    // =========================================================================

    pub fn get_protocol_version(&self) -> Result<u32> {
        payload::decode_u32(&self.call(Command::GetProtocolVersion)?)
    }

    pub fn get_software_version(&self) -> Result<String> {
        payload::decode_text(&self.call(Command::GetSoftwareVersion)?)
    }

    pub fn get_serial_number(&self) -> Result<String> {
        payload::decode_text(&self.call(Command::GetSerialNumber)?)
    }

    pub fn get_cpu_serial_number(&self) -> Result<String> {
        payload::decode_text(&self.call(Command::GetCpuSerialNumber)?)
    }

    pub fn get_network_configuration(&self) -> Result<String> {
        payload::decode_text(&self.call(Command::GetNetworkConfiguration)?)
    }

    /// Round-trip `data` through the device
    ///
    /// Fails with `EchoMismatch` if the device returns different bytes.
    pub fn echo(&self, data: &[u8]) -> Result<()> {
        let returned = self.request(Command::Echo, data)?;
        if returned != data {
            return Err(ProOsError::EchoMismatch {
                sent: data.len(),
                received: returned.len(),
            });
        }
        Ok(())
    }

    pub fn echo_default(&self) -> Result<()> {
        self.echo(DEFAULT_ECHO_PAYLOAD)
    }

    // =========================================================================
    // Telemetry
    // =========================================================================

    pub fn get_telemetry(&self) -> Result<Telemetry> {
        Telemetry::decode(&self.call(Command::GetTelemetry)?)
    }

    /// Seconds since the device booted
    pub fn get_uptime(&self) -> Result<u32> {
        Ok(self.get_telemetry()?.timestamp)
    }

    pub fn is_running(&self) -> Result<bool> {
        Ok(self.get_telemetry()?.running())
    }

    pub fn get_setpoint(&self) -> Result<u32> {
        Ok(self.get_telemetry()?.setpoint)
    }

    // =========================================================================
    // Control
    // =========================================================================

    pub fn set_setpoint(&self, setpoint: u32) -> Result<()> {
        self.request(Command::SetSetpoint, &payload::encode_u32(setpoint))?;
        Ok(())
    }

    pub fn pump_start(&self) -> Result<()> {
        self.call(Command::PumpStart)?;
        Ok(())
    }

    pub fn pump_stop(&self) -> Result<()> {
        self.call(Command::PumpStop)?;
        Ok(())
    }

    pub fn reboot(&self) -> Result<()> {
        self.call(Command::Reboot)?;
        Ok(())
    }

    // =========================================================================
    // Clock
    // =========================================================================

    pub fn get_time(&self) -> Result<NaiveDateTime> {
        payload::decode_time(&self.call(Command::GetTime)?)
    }

    pub fn set_time(&self, time: &NaiveDateTime) -> Result<()> {
        self.request(Command::SetTime, &payload::encode_time(time))?;
        Ok(())
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn disconnect(self) -> Result<()> {
        self.connection.disconnect()
    }
}

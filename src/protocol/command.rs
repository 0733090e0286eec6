//! Command and node definitions
//!
//! Opcodes and endpoint identifiers carried in the protocol header.
//! Values the client does not know decode to `Unknown(raw)` so newer
//! firmware never breaks header parsing.

use std::fmt;
use std::str::FromStr;

/// Endpoint identifiers (16-bit on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Node {
    /// The Pro OS device itself
    #[default]
    ProOs,
    NetworkCard,
    Client,
    Unknown(u16),
}

impl Node {
    pub fn as_u16(self) -> u16 {
        match self {
            Node::ProOs => 0x0001,
            Node::NetworkCard => 0x0002,
            Node::Client => 0x0003,
            Node::Unknown(raw) => raw,
        }
    }
}

impl From<u16> for Node {
    fn from(raw: u16) -> Self {
        match raw {
            0x0001 => Node::ProOs,
            0x0002 => Node::NetworkCard,
            0x0003 => Node::Client,
            other => Node::Unknown(other),
        }
    }
}

/// Device operation opcodes (32-bit on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    GetProtocolVersion,
    Echo,
    Reboot,
    GetTelemetry,
    GetTime,
    SetTime,
    SoftwareUpdateStart,
    SoftwareUpdateFlashPage,
    SoftwareUpdateFinish,
    FileGetStart,
    FileGetPage,
    FileGetFinish,
    PumpStart,
    PumpStop,
    GetSoftwareVersion,
    GetSerialNumber,
    GetCpuSerialNumber,
    GetNetworkConfiguration,
    /// Not intended for use by end client devices
    SetDisplayedIpAddress,
    SetClientTimeout,
    SetSetpoint,
    Unknown(u32),
}

impl Command {
    /// Every named opcode, in opcode order
    pub const ALL: [Command; 21] = [
        Command::GetProtocolVersion,
        Command::Echo,
        Command::Reboot,
        Command::GetTelemetry,
        Command::GetTime,
        Command::SetTime,
        Command::SoftwareUpdateStart,
        Command::SoftwareUpdateFlashPage,
        Command::SoftwareUpdateFinish,
        Command::FileGetStart,
        Command::FileGetPage,
        Command::FileGetFinish,
        Command::PumpStart,
        Command::PumpStop,
        Command::GetSoftwareVersion,
        Command::GetSerialNumber,
        Command::GetCpuSerialNumber,
        Command::GetNetworkConfiguration,
        Command::SetDisplayedIpAddress,
        Command::SetClientTimeout,
        Command::SetSetpoint,
    ];

    pub fn as_u32(self) -> u32 {
        match self {
            Command::GetProtocolVersion => 0x0001_0001,
            Command::Echo => 0x0001_0002,
            Command::Reboot => 0x0001_0003,
            Command::GetTelemetry => 0x0001_0004,
            Command::GetTime => 0x0001_0006,
            Command::SetTime => 0x0001_0007,
            Command::SoftwareUpdateStart => 0x0001_0008,
            Command::SoftwareUpdateFlashPage => 0x0001_0009,
            Command::SoftwareUpdateFinish => 0x0001_000A,
            Command::FileGetStart => 0x0001_000C,
            Command::FileGetPage => 0x0001_000D,
            Command::FileGetFinish => 0x0001_000E,
            Command::PumpStart => 0x0001_000F,
            Command::PumpStop => 0x0001_0010,
            Command::GetSoftwareVersion => 0x0001_0011,
            Command::GetSerialNumber => 0x0001_0012,
            Command::GetCpuSerialNumber => 0x0001_0013,
            Command::GetNetworkConfiguration => 0x0001_0014,
            Command::SetDisplayedIpAddress => 0x0001_0015,
            Command::SetClientTimeout => 0x0001_0016,
            Command::SetSetpoint => 0x0001_0017,
            Command::Unknown(raw) => raw,
        }
    }

    /// Symbolic protocol name, e.g. `GET_TELEMETRY`
    pub fn name(self) -> &'static str {
        match self {
            Command::GetProtocolVersion => "GET_PROTOCOL_VERSION",
            Command::Echo => "ECHO",
            Command::Reboot => "REBOOT",
            Command::GetTelemetry => "GET_TELEMETRY",
            Command::GetTime => "GET_TIME",
            Command::SetTime => "SET_TIME",
            Command::SoftwareUpdateStart => "SOFTWARE_UPDATE_START",
            Command::SoftwareUpdateFlashPage => "SOFTWARE_UPDATE_FLASH_PAGE",
            Command::SoftwareUpdateFinish => "SOFTWARE_UPDATE_FINISH",
            Command::FileGetStart => "FILE_GET_START",
            Command::FileGetPage => "FILE_GET_PAGE",
            Command::FileGetFinish => "FILE_GET_FINISH",
            Command::PumpStart => "PUMP_START",
            Command::PumpStop => "PUMP_STOP",
            Command::GetSoftwareVersion => "GET_SOFTWARE_VERSION",
            Command::GetSerialNumber => "GET_SERIAL_NUMBER",
            Command::GetCpuSerialNumber => "GET_CPU_SERIAL_NUMBER",
            Command::GetNetworkConfiguration => "GET_NETWORK_CONFIGURATION",
            Command::SetDisplayedIpAddress => "SET_DISPLAYED_IP_ADDRESS",
            Command::SetClientTimeout => "SET_CLIENT_TIMEOUT",
            Command::SetSetpoint => "SET_SETPOINT",
            Command::Unknown(_) => "UNKNOWN",
        }
    }
}

impl From<u32> for Command {
    fn from(raw: u32) -> Self {
        Command::ALL
            .iter()
            .copied()
            .find(|command| command.as_u32() == raw)
            .unwrap_or(Command::Unknown(raw))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Unknown(raw) => write!(f, "UNKNOWN(0x{:08x})", raw),
            named => f.write_str(named.name()),
        }
    }
}

/// Parses a symbolic name (case-insensitive, `-` or `_` separated) or a
/// hex opcode such as `0x00010012`.
impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(hex) = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            return u32::from_str_radix(hex, 16)
                .map(Command::from)
                .map_err(|e| format!("invalid opcode '{}': {}", trimmed, e));
        }

        let normalized = trimmed.replace('-', "_").to_ascii_uppercase();
        Command::ALL
            .iter()
            .copied()
            .find(|command| command.name() == normalized)
            .ok_or_else(|| format!("unknown command '{}'", trimmed))
    }
}

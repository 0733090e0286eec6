//! GET_TELEMETRY result layout
//!
//! ```text
//! bit   0                         31 32                       63
//!       +------+------+------+------+------+------+------+------+
//!       |         Timestamp         |          Alarms           |
//!       +------+------+------+------+------+------+------+------+
//!       |          Setpoint         |         Flow Rate         |
//!       +------+------+------+------+------+------+------+------+
//!       |     Combined Pressure     |       Pre Pressure        |
//!       +------+------+------+------+------+------+------+------+
//!       |       Inlet Pressure      |  Pump Level | RCB  | RPB  |
//!       +------+------+------+------+------+------+------+------+
//!       | RIB  | CCB  | CPB  | Run  |
//!       +------+------+------+------+
//! ```
//!
//! Little-endian, no padding. bincode's default fixed-width little-endian
//! encoding matches this layout field for field.

use serde::{Deserialize, Serialize};

use crate::error::{ProOsError, Result};

/// Encoded size of a telemetry record
pub const TELEMETRY_SIZE: usize = 36;

/// One telemetry snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Telemetry {
    /// Seconds since device boot
    pub timestamp: u32,
    pub alarms: u32,
    pub setpoint: u32,
    pub flow_rate: u32,
    pub combined_pressure: u32,
    pub pre_pressure: u32,
    pub inlet_pressure: u32,
    pub pump_level: u16,
    pub rcb: u8,
    pub rpb: u8,
    pub rib: u8,
    pub ccb: u8,
    pub cpb: u8,
    /// Signed on the wire; nonzero means the pump is running
    pub is_running: i8,
}

impl Telemetry {
    pub fn decode(payload: &[u8]) -> Result<Self> {
        if payload.len() != TELEMETRY_SIZE {
            return Err(ProOsError::Payload(format!(
                "telemetry: expected {} bytes, got {}",
                TELEMETRY_SIZE,
                payload.len()
            )));
        }
        bincode::deserialize(payload)
            .map_err(|e| ProOsError::Payload(format!("telemetry: {}", e)))
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| ProOsError::Payload(format!("telemetry: {}", e)))
    }

    pub fn running(&self) -> bool {
        self.is_running != 0
    }
}

//! Payload CRC quirk allow-list
//!
//! Some firmware releases compute a wrong payload CRC for a handful of
//! commands. Responses to commands in this list are accepted even when the
//! payload CRC does not match; the mismatch is only logged.
//!
//! ## File Format
//! ```text
//! # one command per line, by name or hex opcode
//! GET_SERIAL_NUMBER
//! 0x00010013
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ProOsError, Result};
use super::Command;

/// Set of commands whose payload CRC is not enforced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrcQuirks {
    commands: HashSet<Command>,
}

impl CrcQuirks {
    /// An empty list: every payload CRC is enforced
    pub fn none() -> Self {
        Self {
            commands: HashSet::new(),
        }
    }

    /// Load a quirk list from a file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        text.parse()
    }

    pub fn contains(&self, command: Command) -> bool {
        self.commands.contains(&command)
    }

    /// Add a command; returns false if it was already listed
    pub fn insert(&mut self, command: Command) -> bool {
        self.commands.insert(command)
    }

    pub fn remove(&mut self, command: Command) -> bool {
        self.commands.remove(&command)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Command> + '_ {
        self.commands.iter().copied()
    }
}

impl Default for CrcQuirks {
    /// Commands with known-bad payload CRCs on shipped firmware
    fn default() -> Self {
        [
            Command::GetCpuSerialNumber,
            Command::GetSerialNumber,
            Command::GetSoftwareVersion,
        ]
        .into_iter()
        .collect()
    }
}

impl FromIterator<Command> for CrcQuirks {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        Self {
            commands: iter.into_iter().collect(),
        }
    }
}

/// Entries are separated by newlines, commas or whitespace; `#` starts a
/// comment that runs to the end of the line.
impl FromStr for CrcQuirks {
    type Err = ProOsError;

    fn from_str(s: &str) -> Result<Self> {
        let mut quirks = CrcQuirks::none();

        for line in s.lines() {
            let content = line.split('#').next().unwrap_or("");
            for token in content
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|t| !t.is_empty())
            {
                let command = token
                    .parse::<Command>()
                    .map_err(|e| ProOsError::Config(format!("CRC quirk list: {}", e)))?;
                quirks.insert(command);
            }
        }

        Ok(quirks)
    }
}

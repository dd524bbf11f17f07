use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::edid::SERIAL_SIGIL;
use crate::edid::EdidIdentity;

/// A physical monitor, identified by its EDID
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Display {
    /// Hex-encoded EDID, empty when unknown
    pub edid: String,
    /// XRandR arguments applied to the output hosting this display
    #[serde(default)]
    pub args: Vec<String>,
}

impl Display {
    pub fn new(edid: impl Into<String>) -> Self {
        Self {
            edid: edid.into(),
            args: Vec::new(),
        }
    }

    fn identity(&self) -> EdidIdentity {
        EdidIdentity::resolve(&self.edid)
    }

    /// Model name from the EDID, or the serial when the EDID has no name
    pub fn name(&self) -> String {
        match self.identity().name {
            Some(name) if !name.is_empty() => name,
            _ => self.serial(),
        }
    }

    /// Serial identity prefixed with `#`; empty when the EDID is empty
    pub fn serial(&self) -> String {
        let serial = self.identity().serial;
        if serial.is_empty() {
            serial
        } else {
            format!("{SERIAL_SIGIL}{serial}")
        }
    }

    /// Identity used for matching: serial or name depending on policy
    pub fn identity_key(&self, by_serial: bool) -> String {
        if by_serial { self.serial() } else { self.name() }
    }
}

impl fmt::Display for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.serial())
    }
}

/// A connector on the display controller, as reported by xrandr
/// Built fresh on every discovery and never persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub name: String,
    pub connected: bool,
    pub display: Display,
}

impl Output {
    pub fn new(name: impl Into<String>, connected: bool, display: Display) -> Self {
        Self {
            name: name.into(),
            connected,
            display,
        }
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.connected {
            write!(f, "{} -> {}", self.name, self.display)
        } else {
            write!(f, "{} -> X", self.name)
        }
    }
}

//! Saved display-layout profiles
//!
//! A profile binds the displays seen at save time (keyed by the output label
//! they were plugged into) to the xrandr arguments that configure them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::display::{Display, Output};

/// Profile collection keyed by profile name
pub type Profiles = BTreeMap<String, Profile>;

/// Profile - a named monitor layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Identify displays by serial instead of model name
    #[serde(default)]
    pub serial: bool,

    /// Require every display to sit on the output it was saved on
    #[serde(default)]
    pub match_outputs: bool,

    /// Arguments given before the first `--output`
    #[serde(default)]
    pub global_args: Vec<String>,

    /// Saved output label → display seen there
    pub displays: BTreeMap<String, Display>,
}

impl Profile {
    /// Snapshot the connected outputs into a profile with no arguments yet
    pub fn from_outputs(outputs: &[Output], serial: bool, match_outputs: bool) -> Self {
        let displays = outputs
            .iter()
            .filter(|output| output.connected)
            .map(|output| (output.name.clone(), Display::new(output.display.edid.clone())))
            .collect();
        Self {
            serial,
            match_outputs,
            global_args: Vec::new(),
            displays,
        }
    }

    /// Identity of a display under this profile's policy
    pub fn identity_of(&self, display: &Display) -> String {
        display.identity_key(self.serial)
    }

    /// Multi-line description with every argument, for verbose listings
    pub fn pretty_print(&self) -> String {
        let mut text = format!(
            "serial={}, match_outputs={}, global_args={:?}",
            self.serial, self.match_outputs, self.global_args
        );
        for (output, display) in &self.displays {
            text.push_str(&format!("\n\t{output}: {display} ({:?})", display.args));
        }
        text
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let displays: Vec<String> = self
            .displays
            .iter()
            .map(|(output, display)| {
                let identity = self.identity_of(display);
                if self.match_outputs {
                    format!("{output}: {identity}")
                } else {
                    identity
                }
            })
            .collect();
        write!(f, "{}", displays.join(", "))
    }
}

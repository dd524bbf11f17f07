//! Output discovery from `xrandr --properties`
//!
//! The report is a block per connector:
//!
//! ```text
//! HDMI-1 connected 1920x1080+0+0 (normal left inverted right x axis y axis) 527mm x 296mm
//! 	EDID:
//! 		00ffffffffffff0010ac99404c4d5330
//! 		...
//! 	Broadcast RGB: Automatic
//! 		supported: Automatic, Full, Limited 16:235
//!    1920x1080     60.00*+  50.00
//! DP-1 disconnected (normal left inverted right x axis y axis)
//! ```
//!
//! Lines that are not recognised are skipped, so new properties or mode rows
//! never break discovery.

use anyhow::{bail, Context, Result};
use std::process::Command;
use tracing::{debug, warn};

use crate::constants::xrandr;
use crate::display::{Display, Output};

/// Run xrandr and parse the outputs it reports
pub fn load_outputs() -> Result<Vec<Output>> {
    let result = Command::new(xrandr::COMMAND)
        .arg(xrandr::PROPERTIES)
        .output()
        .context(format!("Failed to run {} {}", xrandr::COMMAND, xrandr::PROPERTIES))?;

    if !result.status.success() {
        bail!(
            "{} {} failed ({}): {}",
            xrandr::COMMAND,
            xrandr::PROPERTIES,
            result.status,
            String::from_utf8_lossy(&result.stderr).trim()
        );
    }

    let report = String::from_utf8_lossy(&result.stdout);
    Ok(parse_outputs(&report))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    SeekingConnector,
    InPropertyBlock,
    InEdidBlock,
}

/// Connector being assembled while its block is read
struct PendingOutput {
    name: String,
    connected: bool,
    edid: Option<String>,
}

impl PendingOutput {
    fn finish(self) -> Output {
        if !self.connected {
            return Output::new(self.name, false, Display::default());
        }
        let edid = match self.edid {
            Some(edid) if !edid.is_empty() => edid,
            _ => {
                warn!(output = %self.name, "Output {} is connected, but EDID is unknown", self.name);
                String::new()
            }
        };
        Output::new(self.name, true, Display::new(edid))
    }
}

/// Parse the text report of `xrandr --properties`, preserving report order
pub fn parse_outputs(report: &str) -> Vec<Output> {
    let mut outputs = Vec::new();
    let mut state = ParseState::SeekingConnector;
    let mut pending: Option<PendingOutput> = None;

    for line in report.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        let indented = line.starts_with(char::is_whitespace);
        if !indented {
            if let Some(done) = pending.take() {
                outputs.push(done.finish());
            }
            pending = parse_connector_line(line);
            state = if pending.is_some() {
                ParseState::InPropertyBlock
            } else {
                ParseState::SeekingConnector
            };
            continue;
        }

        let Some(current) = pending.as_mut() else {
            continue;
        };
        let content = line.trim();

        if state == ParseState::InEdidBlock {
            if is_hex(content) {
                current.edid.get_or_insert_with(String::new).push_str(content);
                continue;
            }
            state = ParseState::InPropertyBlock;
        }

        if let Some(rest) = content.strip_prefix("EDID:") {
            let inline = rest.trim();
            let edid = current.edid.insert(String::new());
            if is_hex(inline) {
                edid.push_str(inline);
            }
            state = ParseState::InEdidBlock;
        } else {
            debug!(output = %current.name, line = content, "skipping property line");
        }
    }

    if let Some(done) = pending.take() {
        outputs.push(done.finish());
    }
    outputs
}

fn parse_connector_line(line: &str) -> Option<PendingOutput> {
    let (name, rest) = line.split_once(char::is_whitespace)?;
    let rest = rest.trim_start();
    let connected = if starts_with_word(rest, "connected") {
        true
    } else if starts_with_word(rest, "disconnected") || starts_with_word(rest, "unknown connection") {
        false
    } else {
        return None;
    };
    Some(PendingOutput {
        name: name.to_string(),
        connected,
        edid: None,
    })
}

fn starts_with_word(text: &str, word: &str) -> bool {
    text.strip_prefix(word)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

fn is_hex(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_hexdigit())
}

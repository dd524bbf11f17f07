//! Translation between xrandr argument vectors and profiles
//!
//! Saving splits an argument vector into global and per-output arguments.
//! Applying rebuilds the vector for the outputs that host the saved displays
//! right now, which may not be the outputs they were saved on.

use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

use crate::config::Profile;
use crate::constants::xrandr;
use crate::display::{Display, Output};
use crate::error::{ProfileError, Result};

/// Distribute xrandr arguments over the profile's global and per-display lists
pub fn split_save_args(profile: &mut Profile, xrandr_args: &[String]) {
    let mut expecting_output = false;
    let mut selected: Option<&str> = None;

    for arg in xrandr_args {
        if expecting_output {
            selected = Some(arg.as_str());
            expecting_output = false;
        } else if arg == xrandr::OUTPUT {
            expecting_output = true;
        } else {
            match selected {
                None => profile.global_args.push(arg.clone()),
                Some(output) => match profile.displays.get_mut(output) {
                    Some(display) => display.args.push(arg.clone()),
                    None => warn!(output, "Ignored XRandr argument: {arg}"),
                },
            }
        }
    }

    if expecting_output {
        warn!("Ignored XRandr argument: {}", xrandr::OUTPUT);
    }
}

/// Unclaimed connected output whose `key` identity equals the saved display's,
/// preferring the output the display was saved on
fn find_output<'a>(
    outputs: &'a [Output],
    saved: &Display,
    saved_label: &str,
    claimed: &HashSet<&str>,
    key: fn(&Display) -> String,
) -> Option<&'a Output> {
    let wanted = key(saved);
    let mut candidates = outputs.iter().filter(|output| {
        output.connected
            && !claimed.contains(output.name.as_str())
            && key(&output.display) == wanted
    });
    let first = candidates.next()?;
    if first.name == saved_label {
        return Some(first);
    }
    Some(candidates.find(|output| output.name == saved_label).unwrap_or(first))
}

/// Build the xrandr arguments applying `profile` to the current outputs
///
/// Fails without producing any argument when a configured display is not
/// connected, so a layout is never half applied.
pub fn build_args(profile: &Profile, outputs: &[Output]) -> Result<Vec<String>> {
    let configured: Vec<(&str, &Display)> = profile
        .displays
        .iter()
        .filter(|(_, saved)| !saved.args.is_empty())
        .map(|(label, saved)| (label.as_str(), saved))
        .collect();

    // Every serial match is bound before any name fallback may take an output
    let mut resolved: BTreeMap<&str, &Output> = BTreeMap::new();
    let mut claimed: HashSet<&str> = HashSet::new();
    for key in [Display::serial as fn(&Display) -> String, Display::name] {
        for &(saved_label, saved) in &configured {
            if resolved.contains_key(saved_label) {
                continue;
            }
            if let Some(output) = find_output(outputs, saved, saved_label, &claimed, key) {
                claimed.insert(output.name.as_str());
                resolved.insert(saved_label, output);
            }
        }
    }

    let mut renamed: BTreeMap<&str, &str> = BTreeMap::new();
    let mut sections: Vec<(&str, &[String])> = Vec::new();
    for &(saved_label, saved) in &configured {
        let output = resolved
            .get(saved_label)
            .ok_or_else(|| ProfileError::MonitorNotConnected {
                display: saved.to_string(),
            })?;
        debug!(saved = %saved_label, live = %output.name, monitor = %saved, "resolved display");
        renamed.insert(saved_label, output.name.as_str());
        sections.push((output.name.as_str(), saved.args.as_slice()));
    }

    // Arguments may name other outputs ("--right-of HDMI-1"); follow the renames
    let rename = |arg: &String| -> String {
        renamed
            .get(arg.as_str())
            .map_or_else(|| arg.clone(), |live| (*live).to_string())
    };

    let mut args: Vec<String> = profile.global_args.iter().map(rename).collect();
    for (live, display_args) in sections {
        args.push(xrandr::OUTPUT.to_string());
        args.push(live.to_string());
        args.extend(display_args.iter().map(rename));
    }

    for output in outputs.iter().filter(|output| output.connected) {
        if !claimed.contains(output.name.as_str()) {
            args.extend([
                xrandr::OUTPUT.to_string(),
                output.name.clone(),
                xrandr::OFF.to_string(),
            ]);
        }
    }

    Ok(args)
}

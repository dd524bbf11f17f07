//! Subcommand implementations
//!
//! Each command works on the already loaded profile collection and the
//! outputs discovered for this run; persisting the collection is left to the
//! caller.

use anyhow::Result;
use std::path::Path;
use tracing::{info, warn};

use crate::arguments::{build_args, split_save_args};
use crate::config::{Profile, Profiles};
use crate::constants::xrandr;
use crate::display::Output;
use crate::error::ProfileError;
use crate::matching::{best, detect, MatchStrength};
use crate::runner::Runner;

/// One line per profile, marking detections
/// `*` best exact match, `~` best partial match, `-` other detected profiles
pub fn status_lines(profiles: &Profiles, outputs: &[Output], verbose: bool) -> Vec<String> {
    let detected = detect(profiles, outputs);
    let chosen = best(&detected).map(|(name, _)| name);

    profiles
        .iter()
        .map(|(name, profile)| {
            let mark = match detected.get(name) {
                Some(MatchStrength::Exact) if chosen == Some(name.as_str()) => '*',
                Some(MatchStrength::Partial) if chosen == Some(name.as_str()) => '~',
                Some(_) => '-',
                None => ' ',
            };
            if verbose {
                format!("{mark} {name} {}", profile.pretty_print())
            } else {
                format!("{mark} {name} {profile}")
            }
        })
        .collect()
}

pub fn status(profiles: &Profiles, outputs: &[Output], verbose: bool) {
    for line in status_lines(profiles, outputs, verbose) {
        println!("{line}");
    }
}

/// Create or overwrite profile `name` from the outputs and xrandr arguments
pub fn save(
    profiles: &mut Profiles,
    outputs: &[Output],
    name: &str,
    serial: bool,
    match_outputs: bool,
    xrandr_args: &[String],
) {
    let mut profile = Profile::from_outputs(outputs, serial, match_outputs);
    split_save_args(&mut profile, xrandr_args);

    if profiles.contains_key(name) {
        info!(profile = %name, "Overwriting existing profile");
    }
    println!("Created profile {name} {profile}");
    profiles.insert(name.to_string(), profile);
}

/// Profile name to apply and the xrandr arguments doing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetPlan {
    pub profile: Option<String>,
    pub args: Vec<String>,
}

/// Decide what `set` applies; an unknown name or a missing monitor aborts
pub fn plan_set(profiles: &Profiles, outputs: &[Output], name: Option<&str>) -> Result<SetPlan, ProfileError> {
    let chosen = match name {
        Some(name) => {
            if !profiles.contains_key(name) {
                return Err(ProfileError::ProfileNotFound { name: name.to_string() });
            }
            Some(name.to_string())
        }
        None => {
            let detected = detect(profiles, outputs);
            match best(&detected) {
                Some((name, MatchStrength::Partial)) => {
                    warn!(profile = %name, "Profile only partially matches the connected outputs");
                    Some(name.to_string())
                }
                Some((name, MatchStrength::Exact)) => Some(name.to_string()),
                None => None,
            }
        }
    };

    match chosen {
        Some(name) => {
            let args = build_args(&profiles[&name], outputs)?;
            Ok(SetPlan {
                profile: Some(name),
                args,
            })
        }
        None => Ok(SetPlan {
            profile: None,
            args: vec![xrandr::AUTO.to_string()],
        }),
    }
}

/// Apply a profile (named or detected), then run the post-set script
pub fn set(
    profiles: &Profiles,
    outputs: &[Output],
    name: Option<&str>,
    runner: &Runner,
    post_set: &Path,
) -> Result<()> {
    let plan = plan_set(profiles, outputs, name)?;
    match &plan.profile {
        Some(name) => println!("Setting profile {name}"),
        None => println!("No profile detected, using auto profile"),
    }
    runner.run_xrandr(&plan.args)?;
    runner.run_post_set(post_set)
}

/// Remove profile `name`
pub fn delete(profiles: &mut Profiles, name: &str) -> Result<Profile, ProfileError> {
    let profile = profiles
        .remove(name)
        .ok_or_else(|| ProfileError::ProfileNotFound { name: name.to_string() })?;
    println!("Deleted profile {name} {profile}");
    Ok(profile)
}

pub fn list_outputs(outputs: &[Output]) {
    for output in outputs {
        println!("{output}");
    }
}

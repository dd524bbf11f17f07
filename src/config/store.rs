//! JSON persistence of the profile collection
//!
//! The file is a single object keyed by profile name. Loading goes through an
//! explicit validation step so a malformed entry rejects the whole file instead
//! of yielding a partial collection.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::profile::{Profile, Profiles};
use crate::constants::config;
use crate::error::ProfileError;

fn app_dir() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(config::APP_DIR);
    path
}

/// `~/.xrpm/profiles.json`
pub fn default_config_path() -> PathBuf {
    app_dir().join(config::FILENAME)
}

/// `~/.xrpm/post`
pub fn default_post_set_path() -> PathBuf {
    app_dir().join(config::POST_SET)
}

/// Profile collection file on disk
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the collection; a missing file is an empty collection
    pub fn load(&self) -> Result<Profiles> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No profile file, starting empty");
                return Ok(Profiles::new());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read profiles from {:?}", self.path));
            }
        };

        let value: Value = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse JSON from {:?}", self.path))?;
        let profiles = validate_profiles(value)
            .with_context(|| format!("Failed to load profiles from {:?}", self.path))?;

        debug!(count = profiles.len(), path = %self.path.display(), "Loaded profiles");
        Ok(profiles)
    }

    /// Write the collection as 4-space indented JSON
    pub fn save(&self, profiles: &Profiles) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        profiles
            .serialize(&mut serializer)
            .context("Failed to serialize profiles to JSON")?;

        fs::write(&self.path, buffer)
            .with_context(|| format!("Failed to write profiles to {:?}", self.path))?;

        info!(count = profiles.len(), path = %self.path.display(), "Saved profiles");
        Ok(())
    }
}

/// Turn a parsed JSON document into typed profiles, rejecting any schema violation
pub fn validate_profiles(value: Value) -> Result<Profiles, ProfileError> {
    let Value::Object(entries) = value else {
        return Err(ProfileError::InvalidConfig {
            reason: "invalid root dict".to_string(),
        });
    };
    validate_entries(entries)
}

fn validate_entries(entries: Map<String, Value>) -> Result<Profiles, ProfileError> {
    let mut profiles = Profiles::new();
    for (name, data) in entries {
        if !data.is_object() {
            return Err(ProfileError::invalid_profile(&name, "expected an object"));
        }
        let profile: Profile = serde_json::from_value(data)
            .map_err(|e| ProfileError::invalid_profile(&name, e.to_string()))?;

        for (output, display) in &profile.displays {
            if !display.edid.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(ProfileError::invalid_profile(
                    &name,
                    format!("display on {output} has a non-hex EDID"),
                ));
            }
        }
        profiles.insert(name, profile);
    }
    Ok(profiles)
}

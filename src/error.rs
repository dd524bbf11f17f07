//! Error types for profile operations.

use thiserror::Error;

/// Failures the profile engine reports to the command layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("Profile {name} not found")]
    ProfileNotFound { name: String },

    /// A saved display has no connected counterpart; nothing may be applied
    #[error("Monitor {display} not connected")]
    MonitorNotConnected { display: String },

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Invalid config: profile '{profile}': {reason}")]
    InvalidProfile { profile: String, reason: String },
}

impl ProfileError {
    pub fn invalid_profile(profile: &str, reason: impl Into<String>) -> Self {
        Self::InvalidProfile {
            profile: profile.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for Results using ProfileError.
pub type Result<T> = std::result::Result<T, ProfileError>;

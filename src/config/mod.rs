//! Profile configuration for xrpm
//!
//! - **profile**: the Profile model and the collection type
//! - **store**: JSON load/validation/save of the collection

pub mod profile;
pub mod store;

// Re-export commonly used types
pub use profile::{Profile, Profiles};
pub use store::{default_config_path, default_post_set_path, ProfileStore};

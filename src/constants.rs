//! Application-wide constants
//!
//! This module contains all magic numbers and string literals used throughout
//! the application, providing a single source of truth for constant values.

/// XRandR command line vocabulary
pub mod xrandr {
    /// Executable name of the display-control tool
    pub const COMMAND: &str = "xrandr";

    /// Flag that makes xrandr report output properties (including EDID)
    pub const PROPERTIES: &str = "--properties";

    /// Output selector keyword, followed by a connector label
    pub const OUTPUT: &str = "--output";

    /// Turns the currently selected output off
    pub const OFF: &str = "--off";

    /// Fallback when no profile matches the connected monitors
    pub const AUTO: &str = "--auto";
}

/// Default file locations (relative to the home directory)
pub mod config {
    /// Directory holding profiles and the post-set script
    pub const APP_DIR: &str = ".xrpm";

    /// Profile collection file name
    pub const FILENAME: &str = "profiles.json";

    /// Post-set script file name
    pub const POST_SET: &str = "post";

    /// Environment variable overriding the profile collection path
    pub const CONFIG_ENV: &str = "XRPM_CONFIG";

    /// Environment variable overriding the post-set script path
    pub const POST_SET_ENV: &str = "XRPM_POST";

    /// Environment variable selecting the log level
    pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
}

/// EDID base block layout (VESA E-EDID 1.x)
pub mod edid {
    /// Size of the base block in bytes
    pub const BLOCK_SIZE: usize = 128;

    /// Fixed 8-byte header every base block starts with
    pub const HEADER: [u8; 8] = [0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00];

    /// Offset of the 32-bit little-endian serial number
    pub const SERIAL_OFFSET: usize = 12;

    /// Offsets of the four 18-byte descriptors
    pub const DESCRIPTOR_OFFSETS: [usize; 4] = [54, 72, 90, 108];

    /// Size of one descriptor
    pub const DESCRIPTOR_SIZE: usize = 18;

    /// Descriptor tag: monitor serial number string
    pub const TAG_SERIAL: u8 = 0xFF;

    /// Descriptor tag: monitor name string
    pub const TAG_NAME: u8 = 0xFC;

    /// Prefix distinguishing a serial identity from a model name
    pub const SERIAL_SIGIL: char = '#';

    /// Number of SHA-1 hex digits used to fingerprint an undecodable blob
    pub const FINGERPRINT_LEN: usize = 8;
}

//! Session configuration for a desktop store.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::DEFAULT_INITIAL_Z_INDEX;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Knobs applied when a [`crate::DesktopStore`] is constructed. Missing keys take defaults.
pub struct DesktopConfig {
    /// Stacking value given to the first opened window.
    pub initial_z_index: u64,
    /// Whether the file tree starts with the default folders and files.
    pub seed_file_system: bool,
    /// Navigation path the session starts on. Falls back to `/` when it is not a folder.
    pub initial_path: String,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            initial_z_index: DEFAULT_INITIAL_Z_INDEX,
            seed_file_system: true,
            initial_path: "/".to_string(),
        }
    }
}

#[derive(Debug, Error)]
/// Errors raised while loading a [`DesktopConfig`].
pub enum ConfigError {
    /// The TOML source could not be parsed into a config.
    #[error("invalid desktop config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl DesktopConfig {
    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML, wrong value types, or unknown keys.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }
}

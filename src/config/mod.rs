mod types;

pub use types::*;

use std::path::Path;

use crate::error::{NavError, Result};

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<NavConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| NavError::config(format!("Failed to read config file {:?}: {}", path, e)))?;

    toml::from_str(&content)
        .map_err(|e| NavError::config(format!("Failed to parse config file {:?}: {}", path, e)))
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<NavConfig> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./menunav.toml",
        "~/.config/menunav/config.toml",
        "/etc/menunav/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    tracing::debug!("No config file found, using defaults");
    Ok(NavConfig::default())
}

impl NavConfig {
    /// Check for settings that load fine but will not behave as intended.
    ///
    /// Returns one human-readable warning per problem.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.events.thread_name.trim().is_empty() {
            warnings.push("events.thread_name is empty".to_string());
        }

        if self.events.thread_name.contains('\0') {
            warnings.push("events.thread_name contains a NUL byte".to_string());
        }

        if self.highlight.placeholder_clut > 0x00FF_FFFF {
            warnings.push(format!(
                "highlight.placeholder_clut {:#010x} is wider than 24 bits; the top byte is ignored",
                self.highlight.placeholder_clut
            ));
        }

        if self.logging.filter.trim().is_empty() {
            warnings.push("logging.filter is empty".to_string());
        }

        warnings
    }
}

use serde::{Deserialize, Serialize};

use menunav_pci::PLACEHOLDER_CLUT_ENTRY;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NavConfig {
    #[serde(default)]
    pub events: EventsConfig,

    #[serde(default)]
    pub highlight: HighlightConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EventsConfig {
    /// Name given to the navigation worker thread
    #[serde(default = "default_thread_name")]
    pub thread_name: String,
}

fn default_thread_name() -> String {
    "menunav-events".to_string()
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            thread_name: default_thread_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HighlightConfig {
    /// `0x00YYCrCb` colour used for every palette slot until the demuxer
    /// provides a real colour lookup table
    #[serde(default = "default_placeholder_clut")]
    pub placeholder_clut: u32,
}

fn default_placeholder_clut() -> u32 {
    PLACEHOLDER_CLUT_ENTRY
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            placeholder_clut: default_placeholder_clut(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is not set
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "menunav=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

//! Error type for the navigation layer.
//!
//! Only lifecycle failures surface as errors. Stale or out-of-range
//! navigation input is dropped where it is found and never reaches callers.

use crate::host::{EsId, EsOutError};

/// Errors reported to the demuxer by the navigation layer.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// No navigation session is running, so the event was not queued.
    #[error("Navigation session is not running")]
    NotRunning,

    /// The output subsystem refused to deliver pointer events for a stream.
    #[error("Unable to subscribe to mouse events for stream {es}: {source}")]
    Subscribe {
        /// The stream that could not be subscribed.
        es: EsId,
        /// Why the output subsystem refused.
        #[source]
        source: EsOutError,
    },

    /// The event worker thread could not be started.
    #[error("Failed to spawn event thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// Configuration could not be read or parsed.
    #[error("Config error: {0}")]
    Config(String),
}

impl NavError {
    /// Convenience constructor for [`NavError::Config`].
    pub fn config(message: impl Into<String>) -> Self {
        NavError::Config(message.into())
    }
}

/// Result alias using [`NavError`].
pub type Result<T> = std::result::Result<T, NavError>;

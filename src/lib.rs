//! menunav - DVD menu navigation for demuxers
//!
//! Tracks the highlight buttons of the current menu from PCI packets and turns
//! key queries and pointer clicks into DVD command interpreter calls and
//! subpicture highlight updates.
//!
//! # Modules
//!
//! - `events` - Navigation session: event queue, worker thread and stream registry
//! - `host` - Interpreter and output contracts the demuxer implements
//! - `config` - TOML configuration
//! - `error` - Error type

pub mod config;
pub mod error;
pub mod events;
pub mod host;

pub use config::NavConfig;
pub use error::{NavError, Result};
pub use events::{EventThread, MouseSample, MouseSink, NavQuery, PciUpdate, StreamKey};
pub use host::{
    CommandInterpreter, DemuxContext, DemuxLock, EsCategory, EsId, EsOut, EsOutError,
    SPRM_SELECTED_BUTTON,
};

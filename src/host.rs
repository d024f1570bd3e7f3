//! Contracts with the demuxer-side collaborators of the navigation layer.
//!
//! The navigation layer does not own the DVD command interpreter or the
//! overlay output. It reaches the interpreter through [`DemuxContext`], which
//! lives behind the demuxer-wide lock, and the output through [`EsOut`].

use std::fmt;
use std::sync::Arc;

use menunav_pci::HighlightDescriptor;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::events::MouseSink;

/// System parameter register holding the highlighted button number.
pub const SPRM_SELECTED_BUTTON: u16 = 0x88;

/// Handle of an elementary stream, owned by the output subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EsId(pub u64);

impl fmt::Display for EsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "es#{}", self.0)
    }
}

/// Kind of elementary stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EsCategory {
    /// Video output; the source of pointer events.
    Video,
    Audio,
    /// Subpicture stream; the target of highlight updates.
    Subtitle,
    Unknown,
}

/// Failure reported by the output subsystem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct EsOutError {
    message: String,
}

impl EsOutError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The DVD virtual machine, as seen by menu navigation.
pub trait CommandInterpreter: Send {
    /// Read a system parameter register.
    fn get_sprm(&self, index: u16) -> u16;

    /// Write a system parameter register.
    fn set_sprm(&mut self, index: u16, value: u16);

    /// Execute one 8-byte navigation command.
    fn interpret(&mut self, commands: &[u8; 8]);
}

/// The output subsystem that owns elementary streams.
///
/// Implementations must be safe to share across threads (`Send + Sync`).
pub trait EsOut: Send + Sync {
    /// Start delivering pointer state changes of a video stream to `sink`.
    fn subscribe_mouse(&self, es: EsId, sink: MouseSink) -> Result<(), EsOutError>;

    /// Show a button highlight on a subpicture stream.
    fn set_highlight(&self, es: EsId, highlight: &HighlightDescriptor);
}

/// Demuxer state shared with the navigation worker under the demuxer-wide lock.
#[derive(Default)]
pub struct DemuxContext {
    interpreter: Option<Box<dyn CommandInterpreter>>,
}

impl DemuxContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with an interpreter already attached.
    pub fn with_interpreter(interpreter: impl CommandInterpreter + 'static) -> Self {
        Self {
            interpreter: Some(Box::new(interpreter)),
        }
    }

    /// Attach or detach the interpreter, e.g. when a chapter codec changes.
    pub fn set_interpreter(&mut self, interpreter: Option<Box<dyn CommandInterpreter>>) {
        self.interpreter = interpreter;
    }

    /// The interpreter, if the current title has one.
    pub fn interpreter(&mut self) -> Option<&mut (dyn CommandInterpreter + 'static)> {
        self.interpreter.as_deref_mut()
    }
}

impl fmt::Debug for DemuxContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DemuxContext")
            .field("has_interpreter", &self.interpreter.is_some())
            .finish()
    }
}

/// The demuxer-wide lock.
pub type DemuxLock = Arc<Mutex<DemuxContext>>;

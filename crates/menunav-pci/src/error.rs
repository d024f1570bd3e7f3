//! Error types for menunav-pci.

use thiserror::Error;

/// Result type for menunav-pci operations.
pub type Result<T> = std::result::Result<T, PciError>;

/// Error type for PCI packet decoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PciError {
    /// Packet shorter than the highlight information it must carry.
    #[error("Truncated PCI packet: need {need} bytes, have {have}")]
    Truncated { need: usize, have: usize },
}

//! menunav-pci: DVD-Video PCI highlight decoding for menu navigation.
//!
//! # Modules
//!
//! - `pci` - Wire decoding of the highlight part of a PCI packet into a
//!   host-order [`PciSnapshot`]
//! - `hit` - Nearest-centre button hit testing for pointer clicks
//! - `highlight` - Highlight region and palette for a selected button
//!
//! # Example
//!
//! ```no_run
//! use menunav_pci::{find_button, PciSnapshot};
//!
//! let packet = std::fs::read("menu.pci").unwrap();
//! let menu = PciSnapshot::parse(&packet).unwrap();
//!
//! if let Some(index) = find_button(&menu, 320, 240) {
//!     println!("pointer is over button {index}");
//! }
//! ```

pub mod error;
pub mod highlight;
pub mod hit;
pub mod pci;

pub use error::{PciError, Result};
pub use highlight::{
    compose, palette_word, ClutColors, ColorResolver, HighlightDescriptor, HighlightKind,
    PaletteEntry, PlaceholderColors, PLACEHOLDER_CLUT_ENTRY,
};
pub use hit::find_button;
pub use pci::{
    Button, ButtonGeometry, Direction, HighlightGeneral, PciSnapshot, MAX_BUTTONS, PCI_BYTES,
    PCI_MIN_LEN,
};

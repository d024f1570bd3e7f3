//! Highlight overlay descriptors for a selected button.
//!
//! A descriptor is the region of the button plus a 4-entry YUV/alpha palette.
//! Alpha comes straight from the PCI colour table; the colour of each palette
//! slot is a CLUT index that only the demuxer can resolve, so it goes through
//! a [`ColorResolver`].

use crate::pci::{Button, ButtonGeometry, PciSnapshot};

/// CLUT entry used when no colour table is available.
pub const PLACEHOLDER_CLUT_ENTRY: u32 = 0x0000_00FF;

/// Which column of the button colour table to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum HighlightKind {
    /// Button is selected but not activated.
    Selection,
    /// Button has been activated.
    Action,
}

impl HighlightKind {
    fn column(self) -> usize {
        match self {
            Self::Selection => 0,
            Self::Action => 1,
        }
    }
}

/// One palette slot of a highlight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct PaletteEntry {
    pub y: u8,
    pub u: u8,
    pub v: u8,
    pub alpha: u8,
}

/// What the overlay output needs to paint a button highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct HighlightDescriptor {
    pub region: ButtonGeometry,
    pub palette: [PaletteEntry; 4],
}

/// Maps a 4-bit CLUT index to a `0x00YYCrCb` colour.
pub trait ColorResolver: Send + Sync {
    fn resolve(&self, clut_index: u8) -> u32;
}

/// Resolves every index to the same entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderColors {
    entry: u32,
}

impl PlaceholderColors {
    pub fn new(entry: u32) -> Self {
        Self { entry }
    }
}

impl Default for PlaceholderColors {
    fn default() -> Self {
        Self::new(PLACEHOLDER_CLUT_ENTRY)
    }
}

impl ColorResolver for PlaceholderColors {
    fn resolve(&self, _clut_index: u8) -> u32 {
        self.entry
    }
}

/// Resolves through a 16-entry colour lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClutColors {
    table: [u32; 16],
}

impl ClutColors {
    pub fn new(table: [u32; 16]) -> Self {
        Self { table }
    }
}

impl ColorResolver for ClutColors {
    fn resolve(&self, clut_index: u8) -> u32 {
        self.table[usize::from(clut_index & 0x0F)]
    }
}

/// The 32-bit colour/contrast word for a button.
///
/// Colour group 0 means the button has no highlight colours and yields 0.
pub fn palette_word(button: &Button, snapshot: &PciSnapshot, kind: HighlightKind) -> u32 {
    match button.color_index {
        0 => 0,
        group => snapshot
            .color_table
            .get(usize::from(group) - 1)
            .map_or(0, |entry| entry[kind.column()]),
    }
}

/// Expand a 4-bit contrast nibble to an 8-bit alpha.
fn expand_alpha(nibble: u8) -> u8 {
    if nibble == 0x0F {
        0xFF
    } else {
        nibble << 4
    }
}

/// Build the highlight descriptor for a button.
pub fn compose(
    button: &Button,
    snapshot: &PciSnapshot,
    kind: HighlightKind,
    resolver: &dyn ColorResolver,
) -> HighlightDescriptor {
    let word = palette_word(button, snapshot, kind);

    let mut palette = [PaletteEntry::default(); 4];
    for (slot, entry) in palette.iter_mut().enumerate() {
        let shift = slot * 4;
        let clut_index = ((word >> (16 + shift)) & 0x0F) as u8;
        let yuv = resolver.resolve(clut_index);

        *entry = PaletteEntry {
            y: ((yuv >> 16) & 0xFF) as u8,
            u: (yuv & 0xFF) as u8,
            v: ((yuv >> 8) & 0xFF) as u8,
            alpha: expand_alpha(((word >> shift) & 0x0F) as u8),
        };
    }

    HighlightDescriptor {
        region: button.geometry,
        palette,
    }
}

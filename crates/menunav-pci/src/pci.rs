//! DVD-Video PCI (presentation control information) highlight decoding.
//!
//! Only the highlight information (`hli`) part of the packet is decoded. The
//! general information and angle tables that precede it are skipped; they
//! belong to the demuxer, not to menu navigation.
//!
//! All multi-byte fields are big-endian on the wire and are read through
//! [`bytes::Buf`], so every value in a [`PciSnapshot`] is already in host order.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{PciError, Result};

/// Nominal size of a PCI packet, including trailing padding.
pub const PCI_BYTES: usize = 980;

/// Maximum number of buttons a PCI packet can describe.
pub const MAX_BUTTONS: usize = 36;

/// Size of one packed button record (`btni_t`).
pub const BUTTON_RECORD_LEN: usize = 18;

/// Offset of the highlight general information (`hl_gi`).
const HLI_OFFSET: usize = 60 + 36;

/// Size of `hl_gi` followed by the button colour table.
const HLI_HEADER_LEN: usize = 22 + 24;

/// Smallest packet that still carries the whole button table.
pub const PCI_MIN_LEN: usize = HLI_OFFSET + HLI_HEADER_LEN + MAX_BUTTONS * BUTTON_RECORD_LEN;

/// Navigation direction between neighbouring buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Absolute, inclusive pixel box of a button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct ButtonGeometry {
    pub x_start: u16,
    pub x_end: u16,
    pub y_start: u16,
    pub y_end: u16,
}

impl ButtonGeometry {
    /// Unpack the 10-bit coordinates from the first six bytes of a button
    /// record. Colour and auto-action bits sharing those bytes are masked off.
    pub fn unpack(p: &[u8; 6]) -> Self {
        Self {
            x_start: (u16::from(p[0] & 0x3F) << 4) | u16::from(p[1] >> 4),
            x_end: (u16::from(p[1] & 0x03) << 8) | u16::from(p[2]),
            y_start: (u16::from(p[3] & 0x3F) << 4) | u16::from(p[4] >> 4),
            y_end: (u16::from(p[4] & 0x03) << 8) | u16::from(p[5]),
        }
    }

    /// Pack the coordinates back into six bytes, leaving the colour and
    /// auto-action bits zero.
    pub fn pack(&self) -> [u8; 6] {
        [
            ((self.x_start >> 4) & 0x3F) as u8,
            (((self.x_start & 0x0F) << 4) | ((self.x_end >> 8) & 0x03)) as u8,
            (self.x_end & 0xFF) as u8,
            ((self.y_start >> 4) & 0x3F) as u8,
            (((self.y_start & 0x0F) << 4) | ((self.y_end >> 8) & 0x03)) as u8,
            (self.y_end & 0xFF) as u8,
        ]
    }

    /// Whether the point lies inside the box, edges included.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= u32::from(self.x_start)
            && x <= u32::from(self.x_end)
            && y >= u32::from(self.y_start)
            && y <= u32::from(self.y_end)
    }

    /// Integer centre of the box.
    pub fn center(&self) -> (i32, i32) {
        (
            (i32::from(self.x_start) + i32::from(self.x_end)) / 2,
            (i32::from(self.y_start) + i32::from(self.y_end)) / 2,
        )
    }
}

/// A highlight button, decoded from one `btni_t` record.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Button {
    /// 1-based ordinal within the packet.
    pub index: u8,
    pub geometry: ButtonGeometry,
    pub up: u8,
    pub down: u8,
    pub left: u8,
    pub right: u8,
    /// Run the command as soon as the button becomes selected.
    pub auto_action: bool,
    /// Navigation command executed on activation.
    pub command: [u8; 8],
    /// Colour group (1..=3), 0 for none.
    pub color_index: u8,
}

impl Button {
    /// Decode a packed button record.
    pub fn unpack(index: u8, record: &[u8; BUTTON_RECORD_LEN]) -> Self {
        let mut coords = [0u8; 6];
        coords.copy_from_slice(&record[..6]);

        let mut command = [0u8; 8];
        command.copy_from_slice(&record[10..18]);

        Self {
            index,
            geometry: ButtonGeometry::unpack(&coords),
            up: record[6] & 0x3F,
            down: record[7] & 0x3F,
            left: record[8] & 0x3F,
            right: record[9] & 0x3F,
            auto_action: (record[3] >> 6) != 0,
            command,
            color_index: record[0] >> 6,
        }
    }

    /// Encode the button as a packed record.
    pub fn pack(&self) -> [u8; BUTTON_RECORD_LEN] {
        let mut record = [0u8; BUTTON_RECORD_LEN];
        record[..6].copy_from_slice(&self.geometry.pack());
        record[0] |= (self.color_index & 0x03) << 6;
        if self.auto_action {
            record[3] |= 1 << 6;
        }
        record[6] = self.up & 0x3F;
        record[7] = self.down & 0x3F;
        record[8] = self.left & 0x3F;
        record[9] = self.right & 0x3F;
        record[10..18].copy_from_slice(&self.command);
        record
    }

    /// Index of the neighbour in the given direction (0 when there is none).
    pub fn neighbor(&self, direction: Direction) -> u8 {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }
}

/// Highlight general information (`hl_gi`), minus the button count which is
/// implied by [`PciSnapshot::buttons`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct HighlightGeneral {
    /// Highlight status (`hli_ss`); 0 means no highlight information.
    pub status: u16,
    pub start_ptm: u32,
    pub end_ptm: u32,
    pub button_select_end_ptm: u32,
    /// Number of button groups (`btngr_ns`).
    pub button_groups: u8,
    pub button_offset: u8,
    pub numeric_select_count: u8,
    /// Forcedly selected button number, 0 for none.
    pub forced_select: u8,
    /// Forcedly activated button number, 0 for none.
    pub forced_action: u8,
}

/// A decoded PCI packet: the buttons and colours of the current menu.
///
/// Snapshots are never mutated after decoding; a newer packet replaces the
/// whole snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct PciSnapshot {
    pub general: HighlightGeneral,
    /// Button colour table: `[group][0]` selection, `[group][1]` action.
    pub color_table: [[u32; 2]; 3],
    /// Buttons in index order; `buttons[i].index == i + 1`.
    pub buttons: Vec<Button>,
}

impl PciSnapshot {
    /// Decode the highlight information of a raw PCI packet.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < PCI_MIN_LEN {
            return Err(PciError::Truncated {
                need: PCI_MIN_LEN,
                have: data.len(),
            });
        }

        let mut buf = &data[HLI_OFFSET..];

        let status = buf.get_u16();
        let start_ptm = buf.get_u32();
        let end_ptm = buf.get_u32();
        let button_select_end_ptm = buf.get_u32();
        let group_bits = buf.get_u16();
        let button_offset = buf.get_u8();
        let button_count = usize::from(buf.get_u8()).min(MAX_BUTTONS);
        let numeric_select_count = buf.get_u8();
        buf.advance(1);
        let forced_select = buf.get_u8();
        let forced_action = buf.get_u8();

        let mut color_table = [[0u32; 2]; 3];
        for group in color_table.iter_mut() {
            for entry in group.iter_mut() {
                *entry = buf.get_u32();
            }
        }

        let mut buttons = Vec::with_capacity(button_count);
        for index in 1..=button_count {
            let mut record = [0u8; BUTTON_RECORD_LEN];
            buf.copy_to_slice(&mut record);
            buttons.push(Button::unpack(index as u8, &record));
        }

        Ok(Self {
            general: HighlightGeneral {
                status,
                start_ptm,
                end_ptm,
                button_select_end_ptm,
                button_groups: ((group_bits >> 12) & 0x03) as u8,
                button_offset,
                numeric_select_count,
                forced_select,
                forced_action,
            },
            color_table,
            buttons,
        })
    }

    /// Encode the snapshot as a full-size PCI packet.
    ///
    /// The general information and angle tables are written as zeros, as are
    /// unused button slots. At most [`MAX_BUTTONS`] buttons are written.
    pub fn to_bytes(&self) -> Bytes {
        let count = self.buttons.len().min(MAX_BUTTONS);
        let general = &self.general;

        let mut out = BytesMut::with_capacity(PCI_BYTES);
        out.put_bytes(0, HLI_OFFSET);

        out.put_u16(general.status);
        out.put_u32(general.start_ptm);
        out.put_u32(general.end_ptm);
        out.put_u32(general.button_select_end_ptm);
        out.put_u16(u16::from(general.button_groups & 0x03) << 12);
        out.put_u8(general.button_offset);
        out.put_u8(count as u8);
        out.put_u8(general.numeric_select_count);
        out.put_u8(0);
        out.put_u8(general.forced_select);
        out.put_u8(general.forced_action);

        for group in &self.color_table {
            for entry in group {
                out.put_u32(*entry);
            }
        }

        for button in &self.buttons[..count] {
            out.put_slice(&button.pack());
        }
        out.put_bytes(0, (MAX_BUTTONS - count) * BUTTON_RECORD_LEN);
        out.put_bytes(0, PCI_BYTES - PCI_MIN_LEN);

        out.freeze()
    }

    /// Number of buttons in the menu.
    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    /// Look up a button by its 1-based index.
    ///
    /// Returns `None` for 0 and for indices past the button count, which is
    /// how stale selection registers are filtered out.
    pub fn button(&self, index: u16) -> Option<&Button> {
        let slot = usize::from(index).checked_sub(1)?;
        self.buttons.get(slot)
    }
}

//! Records carried by the navigation event queue.

use menunav_pci::Direction;

use super::registry::StreamKey;

/// A navigation request from the user interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavQuery {
    Up,
    Down,
    Left,
    Right,
    /// Run the command of the selected button.
    Activate,
}

impl NavQuery {
    /// The neighbour direction for directional queries.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Self::Up => Some(Direction::Up),
            Self::Down => Some(Direction::Down),
            Self::Left => Some(Direction::Left),
            Self::Right => Some(Direction::Right),
            Self::Activate => None,
        }
    }
}

bitflags::bitflags! {
    /// Pointer buttons held down in a [`MouseSample`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MouseButtons: u32 {
        const LEFT = 1 << 0;
        const MIDDLE = 1 << 1;
        const RIGHT = 1 << 2;
        const WHEEL_UP = 1 << 3;
        const WHEEL_DOWN = 1 << 4;
        const WHEEL_LEFT = 1 << 5;
        const WHEEL_RIGHT = 1 << 6;
    }
}

/// Pointer state at one instant, in video coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MouseSample {
    pub x: i32,
    pub y: i32,
    pub buttons: MouseButtons,
}

impl MouseSample {
    pub fn new(x: i32, y: i32, buttons: MouseButtons) -> Self {
        Self { x, y, buttons }
    }

    /// Whether `button` went down between `old` and this sample.
    pub fn pressed_since(&self, old: &MouseSample, button: MouseButtons) -> bool {
        self.buttons.contains(button) && !old.buttons.contains(button)
    }

    /// Whether the pointer position changed since `old`.
    pub fn moved_since(&self, old: &MouseSample) -> bool {
        self.x != old.x || self.y != old.y
    }
}

/// One pending navigation event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    /// A key/remote navigation query.
    Nav(NavQuery),
    /// A pointer state change on a video stream.
    Mouse {
        stream: StreamKey,
        old: MouseSample,
        new: MouseSample,
    },
}

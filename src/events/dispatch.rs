//! Turning navigation events into interpreter commands and highlights.
//!
//! [`navigate`] and [`click`] hold the per-event logic and only need the
//! interpreter and a snapshot. The worker-side [`Dispatcher`] wraps them with
//! the lock handling.

use std::sync::Arc;

use menunav_pci::{compose, find_button, ColorResolver, HighlightKind, PciSnapshot};
use parking_lot::MutexGuard;
use tracing::{debug, trace};

use crate::host::{CommandInterpreter, DemuxLock, EsId, EsOut, SPRM_SELECTED_BUTTON};

use super::queue::{MouseButtons, MouseSample, NavEvent, NavQuery};
use super::registry::StreamKey;
use super::Session;

/// Result of a key query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// No valid current button, or no neighbour in that direction.
    Ignored,
    /// A neighbour became the selected button; `executed` if its command ran.
    Selected { button: u8, executed: bool },
    /// The command of the current button ran.
    Activated { button: u8 },
}

/// A button hit by a pointer press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Click {
    pub button: u8,
    /// Selection register before the press.
    pub previous: u16,
}

impl Click {
    /// Whether the press moved the selection to a different button.
    pub fn changed(&self) -> bool {
        u16::from(self.button) != self.previous
    }
}

/// Apply a key query to the interpreter.
pub fn navigate(
    vm: &mut dyn CommandInterpreter,
    pci: &PciSnapshot,
    query: NavQuery,
) -> KeyOutcome {
    let current = vm.get_sprm(SPRM_SELECTED_BUTTON);
    let Some(button) = pci.button(current) else {
        debug!(current, "No valid selected button");
        return KeyOutcome::Ignored;
    };

    let Some(direction) = query.direction() else {
        vm.interpret(&button.command);
        return KeyOutcome::Activated {
            button: button.index,
        };
    };

    let Some(target) = pci.button(u16::from(button.neighbor(direction))) else {
        return KeyOutcome::Ignored;
    };

    vm.set_sprm(SPRM_SELECTED_BUTTON, u16::from(target.index));
    if target.auto_action {
        vm.interpret(&target.command);
    }

    KeyOutcome::Selected {
        button: target.index,
        executed: target.auto_action,
    }
}

/// Select and run the button under `(x, y)`, if any.
pub fn click(vm: &mut dyn CommandInterpreter, pci: &PciSnapshot, x: i32, y: i32) -> Option<Click> {
    let index = find_button(pci, x, y)?;
    let button = pci.button(u16::from(index))?;

    let previous = vm.get_sprm(SPRM_SELECTED_BUTTON);
    vm.set_sprm(SPRM_SELECTED_BUTTON, u16::from(index));
    vm.interpret(&button.command);

    Some(Click {
        button: index,
        previous,
    })
}

/// Worker-side event handler.
pub(crate) struct Dispatcher {
    demux: DemuxLock,
    es_out: Arc<dyn EsOut>,
    colors: Arc<dyn ColorResolver>,
}

impl Dispatcher {
    pub(crate) fn new(
        demux: DemuxLock,
        es_out: Arc<dyn EsOut>,
        colors: Arc<dyn ColorResolver>,
    ) -> Self {
        Self {
            demux,
            es_out,
            colors,
        }
    }

    pub(crate) fn with_colors(&self, colors: Arc<dyn ColorResolver>) -> Self {
        Self {
            demux: Arc::clone(&self.demux),
            es_out: Arc::clone(&self.es_out),
            colors,
        }
    }

    /// Handle one event. `session` is released while the demuxer lock is held.
    pub(crate) fn dispatch(&self, session: &mut MutexGuard<'_, Session>, event: NavEvent) {
        match event {
            NavEvent::Nav(query) => self.handle_key(session, query),
            NavEvent::Mouse { stream, old, new } => self.handle_mouse(session, stream, old, new),
        }
    }

    fn handle_key(&self, session: &mut MutexGuard<'_, Session>, query: NavQuery) {
        let Some(pci) = session.pci.clone() else {
            return;
        };

        MutexGuard::unlocked(session, || {
            let mut demux = self.demux.lock();
            let Some(vm) = demux.interpreter() else {
                debug!(?query, "No command interpreter, dropping key event");
                return;
            };

            let outcome = navigate(vm, &pci, query);
            debug!(?query, ?outcome, "Handled key event");
        });
    }

    fn handle_mouse(
        &self,
        session: &mut MutexGuard<'_, Session>,
        stream: StreamKey,
        old: MouseSample,
        new: MouseSample,
    ) {
        if !new.pressed_since(&old, MouseButtons::LEFT) {
            if new.moved_since(&old) {
                trace!(?stream, x = new.x, y = new.y, "Pointer moved");
            }
            return;
        }

        let Some(pci) = session.pci.clone() else {
            return;
        };
        let targets = session.streams.subtitle_streams();

        MutexGuard::unlocked(session, || {
            let mut demux = self.demux.lock();
            let Some(vm) = demux.interpreter() else {
                debug!("No command interpreter, dropping mouse click");
                return;
            };

            let Some(hit) = click(vm, &pci, new.x, new.y) else {
                trace!(x = new.x, y = new.y, "Click outside every button");
                return;
            };
            debug!(button = hit.button, previous = hit.previous, "Button clicked");

            if hit.changed() {
                self.show_highlight(&pci, hit.button, &targets);
            }
        });
    }

    fn show_highlight(&self, pci: &PciSnapshot, index: u8, targets: &[EsId]) {
        let Some(button) = pci.button(u16::from(index)) else {
            return;
        };

        let highlight = compose(button, pci, HighlightKind::Action, self.colors.as_ref());
        for es in targets {
            self.es_out.set_highlight(*es, &highlight);
        }
    }
}

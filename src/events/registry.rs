//! Registry of the elementary streams the navigation layer talks to.
//!
//! Entries live in a slot arena keyed by [`StreamKey`]. A key carries the
//! generation of its slot, so a pointer callback bound to a stream that has
//! since been removed (and whose slot was reused) resolves to nothing instead
//! of to the wrong stream.
//!
//! A slot can also be reserved without being live. Reserved entries are
//! skipped by every lookup and count until [`StreamRegistry::activate`] is
//! called, which lets a caller finish work outside the session lock before
//! the stream becomes visible.

use crate::host::{EsCategory, EsId};

use super::queue::MouseSample;

/// Stable handle to a registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamKey {
    slot: u32,
    generation: u32,
}

/// One active elementary stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRegistration {
    pub es: EsId,
    pub category: EsCategory,
    /// Last pointer state reported for this stream.
    pub mouse: MouseSample,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    entry: Option<StreamRegistration>,
    live: bool,
}

/// Slot arena of registered streams.
#[derive(Debug, Default)]
pub struct StreamRegistry {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl StreamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a live stream and return its key.
    pub fn insert(&mut self, es: EsId, category: EsCategory) -> StreamKey {
        self.len += 1;
        self.occupy(es, category, true)
    }

    /// Claim a slot for a stream that stays invisible until
    /// [`activate`](Self::activate)d.
    pub fn reserve(&mut self, es: EsId, category: EsCategory) -> StreamKey {
        self.occupy(es, category, false)
    }

    /// Make a reserved entry live. Returns `false` if `key` no longer
    /// resolves to a reserved entry.
    pub fn activate(&mut self, key: StreamKey) -> bool {
        let Some(slot) = self.slots.get_mut(key.slot as usize) else {
            return false;
        };
        if slot.generation != key.generation || slot.entry.is_none() || slot.live {
            return false;
        }

        slot.live = true;
        self.len += 1;
        true
    }

    fn occupy(&mut self, es: EsId, category: EsCategory, live: bool) -> StreamKey {
        let entry = StreamRegistration {
            es,
            category,
            mouse: MouseSample::default(),
        };

        if let Some(slot) = self.free.pop() {
            let target = &mut self.slots[slot as usize];
            target.entry = Some(entry);
            target.live = live;
            return StreamKey {
                slot,
                generation: target.generation,
            };
        }

        let slot = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            entry: Some(entry),
            live,
        });
        StreamKey {
            slot,
            generation: 0,
        }
    }

    /// Remove the entry behind `key`, live or reserved.
    pub fn remove(&mut self, key: StreamKey) -> Option<StreamRegistration> {
        let slot = self.slots.get_mut(key.slot as usize)?;
        if slot.generation != key.generation {
            return None;
        }

        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        if std::mem::take(&mut slot.live) {
            self.len -= 1;
        }
        self.free.push(key.slot);
        Some(entry)
    }

    /// Remove the first entry registered for `es`.
    pub fn remove_es(&mut self, es: EsId) -> Option<StreamRegistration> {
        let key = self
            .iter()
            .find(|(_, entry)| entry.es == es)
            .map(|(key, _)| key)?;
        self.remove(key)
    }

    pub fn get(&self, key: StreamKey) -> Option<&StreamRegistration> {
        self.slots
            .get(key.slot as usize)
            .filter(|slot| slot.live && slot.generation == key.generation)
            .and_then(|slot| slot.entry.as_ref())
    }

    pub fn get_mut(&mut self, key: StreamKey) -> Option<&mut StreamRegistration> {
        self.slots
            .get_mut(key.slot as usize)
            .filter(|slot| slot.live && slot.generation == key.generation)
            .and_then(|slot| slot.entry.as_mut())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Live entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (StreamKey, &StreamRegistration)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.live)
            .filter_map(|(slot, s)| {
                s.entry.as_ref().map(|entry| {
                    (
                        StreamKey {
                            slot: slot as u32,
                            generation: s.generation,
                        },
                        entry,
                    )
                })
            })
    }

    /// Handles of every subpicture stream, the targets of highlight updates.
    pub fn subtitle_streams(&self) -> Vec<EsId> {
        self.iter()
            .filter(|(_, entry)| entry.category == EsCategory::Subtitle)
            .map(|(_, entry)| entry.es)
            .collect()
    }

    /// Remove every entry, reserved ones included, invalidating all
    /// outstanding keys.
    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.entry.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                slot.live = false;
                self.free.push(index as u32);
            }
        }
        self.len = 0;
    }
}

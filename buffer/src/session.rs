//! The editing session: every open buffer plus which one is current.
//!
//! Callers hold a [`Session`] and pass it (or a buffer borrowed from it) to whatever
//! needs the current buffer, instead of reaching for process-wide state.

use crate::{buffer::Buffer, config::Config};
use quire_rblist::Sequence;
use slotmap::SlotMap;
use tracing::debug;

slotmap::new_key_type! {
    pub struct BufferId;
}

#[derive(Debug)]
struct Slot {
    name: String,
    buffer: Buffer,
}

#[derive(Debug, Default)]
pub struct Session {
    config: Config,
    buffers: SlotMap<BufferId, Slot>,
    current: Option<BufferId>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            buffers: SlotMap::with_key(),
            current: None,
        }
    }

    /// Open a buffer on `text` and make it current.
    pub fn open(&mut self, name: impl Into<String>, text: Sequence) -> BufferId {
        let name = name.into();
        let buffer = Buffer::with_config(text, &self.config);
        debug!(name = %name, len = buffer.len(), "Opened buffer");
        let id = self.buffers.insert(Slot { name, buffer });
        self.current = Some(id);
        id
    }

    pub fn current_id(&self) -> Option<BufferId> {
        self.current
    }

    pub fn current(&self) -> Option<&Buffer> {
        self.current.and_then(|id| self.get(id))
    }

    pub fn current_mut(&mut self) -> Option<&mut Buffer> {
        let id = self.current?;
        self.get_mut(id)
    }

    /// Returns `false`, leaving the current buffer alone, if `id` is not open.
    pub fn switch_to(&mut self, id: BufferId) -> bool {
        if !self.buffers.contains_key(id) {
            return false;
        }
        self.current = Some(id);
        true
    }

    pub fn get(&self, id: BufferId) -> Option<&Buffer> {
        self.buffers.get(id).map(|slot| &slot.buffer)
    }

    pub fn get_mut(&mut self, id: BufferId) -> Option<&mut Buffer> {
        self.buffers.get_mut(id).map(|slot| &mut slot.buffer)
    }

    pub fn name(&self, id: BufferId) -> Option<&str> {
        self.buffers.get(id).map(|slot| slot.name.as_str())
    }

    pub fn find_by_name(&self, name: &str) -> Option<BufferId> {
        self.buffers
            .iter()
            .find(|(_, slot)| slot.name == name)
            .map(|(id, _)| id)
    }

    /// Close a buffer and return it. Closing the current buffer makes another open
    /// buffer current, if any remain.
    pub fn close(&mut self, id: BufferId) -> Option<Buffer> {
        let slot = self.buffers.remove(id)?;
        if self.current == Some(id) {
            self.current = self.buffers.keys().next();
        }
        debug!(name = %slot.name, "Closed buffer");
        Some(slot.buffer)
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }
}

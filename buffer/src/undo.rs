//! Undo history.
//!
//! The log is an append-only list of [`UndoDelta`]s; the newest delta is the head. A
//! separate cursor, [`UndoLog::next_undo`], names the delta the next undo will revert.
//! The two only differ while a run of undos is in progress: reverting a delta records
//! its inverse as a new delta (so the undo is itself undoable, which is how redo works)
//! without moving the cursor, and the cursor then steps to the delta before the one
//! just reverted.
//!
//! Reverting deltas needs the buffer, so the revert walk lives in
//! [`crate::Buffer::undo`]; this module only keeps the records and the cursor.

use crate::point::Point;
use quire_rblist::Sequence;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoKind {
    /// `new_length` characters at the delta's point replaced `old_text`.
    ReplaceBlock {
        old_text: Sequence,
        new_length: usize,
    },
    StartSequence,
    EndSequence,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoDelta {
    pub kind: UndoKind,
    pub point: Point,
    /// The buffer matched its saved state when this delta was recorded, so reverting
    /// the delta makes it unmodified again.
    pub unchanged: bool,
}

#[derive(Debug, Clone)]
pub struct UndoLog {
    deltas: Vec<UndoDelta>,
    next_undo: Option<usize>,
    reverting: usize,
    enabled: bool,
}

impl Default for UndoLog {
    fn default() -> Self {
        Self::new(true)
    }
}

impl UndoLog {
    pub fn new(enabled: bool) -> Self {
        Self {
            deltas: Vec::new(),
            next_undo: None,
            reverting: 0,
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record a delta at the head of the log.
    ///
    /// Outside a revert the undo cursor moves to the new delta, which starts a fresh
    /// undo run.
    pub fn push(&mut self, delta: UndoDelta) {
        if !self.enabled {
            return;
        }
        self.deltas.push(delta);
        if self.reverting == 0 {
            self.next_undo = Some(self.deltas.len() - 1);
        }
    }

    /// Index of the delta the next undo reverts.
    pub fn next_undo(&self) -> Option<usize> {
        self.next_undo
    }

    pub(crate) fn set_next_undo(&mut self, next: Option<usize>) {
        self.next_undo = next;
    }

    /// Point the cursor back at the head so the next undo starts over.
    pub(crate) fn rewind(&mut self) {
        self.next_undo = self.deltas.len().checked_sub(1);
    }

    pub(crate) fn begin_revert(&mut self) {
        self.reverting += 1;
    }

    pub(crate) fn end_revert(&mut self) {
        self.reverting -= 1;
    }

    /// Drop every delta recorded at or after `len`, pulling the cursor back with them.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.deltas.truncate(len);
        if self.next_undo.is_some_and(|ix| ix >= len) {
            self.next_undo = len.checked_sub(1);
        }
    }

    pub fn get(&self, index: usize) -> Option<&UndoDelta> {
        self.deltas.get(index)
    }

    pub fn head(&self) -> Option<&UndoDelta> {
        self.deltas.last()
    }

    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Deltas from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &UndoDelta> {
        self.deltas.iter().rev()
    }

    /// Forget which deltas lead back to a saved state; called when the buffer is saved.
    pub fn clear_unchanged(&mut self) {
        for delta in &mut self.deltas {
            delta.unchanged = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(kind: UndoKind) -> UndoDelta {
        UndoDelta {
            kind,
            point: Point::zero(),
            unchanged: false,
        }
    }

    #[test]
    fn push_moves_cursor_to_head() {
        let mut log = UndoLog::default();
        assert_eq!(log.next_undo(), None);
        log.push(marker(UndoKind::StartSequence));
        log.push(marker(UndoKind::EndSequence));
        assert_eq!(log.next_undo(), Some(1));
        assert_eq!(log.head().map(|d| &d.kind), Some(&UndoKind::EndSequence));
    }

    #[test]
    fn push_during_revert_keeps_cursor() {
        let mut log = UndoLog::default();
        log.push(marker(UndoKind::StartSequence));
        log.begin_revert();
        log.push(marker(UndoKind::EndSequence));
        log.end_revert();
        assert_eq!(log.next_undo(), Some(0));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn disabled_log_records_nothing() {
        let mut log = UndoLog::new(false);
        log.push(marker(UndoKind::StartSequence));
        assert!(log.is_empty());
        assert_eq!(log.next_undo(), None);
    }

    #[test]
    fn rewind_and_iteration_order() {
        let mut log = UndoLog::default();
        log.push(marker(UndoKind::StartSequence));
        log.push(marker(UndoKind::EndSequence));
        log.set_next_undo(None);
        log.rewind();
        assert_eq!(log.next_undo(), Some(1));

        let kinds: Vec<_> = log.iter().map(|d| d.kind.clone()).collect();
        assert_eq!(kinds, vec![UndoKind::EndSequence, UndoKind::StartSequence]);
    }

    #[test]
    fn truncate_drops_newer_deltas() {
        let mut log = UndoLog::default();
        log.push(marker(UndoKind::StartSequence));
        log.begin_revert();
        log.push(marker(UndoKind::EndSequence));
        log.push(marker(UndoKind::EndSequence));
        log.end_revert();
        log.truncate(1);
        assert_eq!(log.len(), 1);
        assert_eq!(log.next_undo(), Some(0));

        log.push(marker(UndoKind::EndSequence));
        log.truncate(1);
        assert_eq!(log.next_undo(), Some(0));
    }

    #[test]
    fn clear_unchanged_resets_every_delta() {
        let mut log = UndoLog::default();
        log.push(UndoDelta {
            unchanged: true,
            ..marker(UndoKind::StartSequence)
        });
        log.clear_unchanged();
        assert!(log.iter().all(|d| !d.unchanged));
    }
}

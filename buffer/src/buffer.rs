//! The buffer and its mutation engine.
//!
//! [`Buffer::replace_range`] is the single place text changes. It validates the whole
//! request first, records the undo delta, splices the sequence, moves every marker and
//! advances the point, so callers never observe a partially applied edit.

use crate::{
    config::Config,
    error::{
        BeginningOfBufferSnafu, EditError, EndOfBufferSnafu, InvalidPointSnafu,
        NoFurtherUndoSnafu, ReadOnlySnafu, UndoDisabledSnafu,
    },
    marker::{MarkerId, Markers},
    point::{Extent, Point},
    undo::{UndoDelta, UndoKind, UndoLog},
};
use quire_rblist::{lines, Sequence};
use snafu::{ensure, OptionExt};
use tracing::{debug, trace};

#[derive(Debug, Clone)]
pub struct Buffer {
    text: Sequence,
    pt: Point,
    mark: Option<MarkerId>,
    markers: Markers,
    undo: UndoLog,
    modified: bool,
    read_only: bool,
    mark_anchored: bool,
    autofill: bool,
    tab_width: usize,
}

impl Buffer {
    /// Open a buffer on `text` with default settings, point at the start.
    pub fn open(text: Sequence) -> Self {
        Self::with_config(text, &Config::default())
    }

    pub fn with_config(text: Sequence, config: &Config) -> Self {
        Self {
            text,
            pt: Point::zero(),
            mark: None,
            markers: Markers::new(),
            undo: UndoLog::new(config.undo_enabled),
            modified: false,
            read_only: config.read_only,
            mark_anchored: false,
            autofill: false,
            tab_width: config.tab_width.max(1),
        }
    }

    pub fn text(&self) -> &Sequence {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    // Lines

    /// Number of newlines; the last line is `line_count()`.
    pub fn line_count(&self) -> usize {
        lines::line_count(&self.text)
    }

    pub fn line_length(&self, line: usize) -> Option<usize> {
        lines::line_length(&self.text, line)
    }

    pub fn line_text(&self, line: usize) -> Option<Sequence> {
        lines::line_text(&self.text, line)
    }

    /// Display width of a whole line.
    pub fn line_display_width(&self, line: usize) -> Option<usize> {
        let start = lines::line_to_start_offset(&self.text, line)?;
        let end = lines::line_to_end_offset(&self.text, line)?;
        Some(lines::range_display_width(&self.text, start, end, self.tab_width))
    }

    // Point

    pub fn point(&self) -> Point {
        self.pt
    }

    pub fn is_valid_point(&self, point: Point) -> bool {
        self.line_length(point.line).is_some_and(|len| point.offset <= len)
    }

    pub fn goto_point(&mut self, point: Point) -> Result<(), EditError> {
        ensure!(self.is_valid_point(point), InvalidPointSnafu { point });
        self.pt = point;
        Ok(())
    }

    /// Character index of the point in the text.
    pub fn point_offset(&self) -> usize {
        self.offset_of(self.pt)
    }

    fn offset_of(&self, point: Point) -> usize {
        let start = lines::line_to_start_offset(&self.text, point.line)
            .expect("buffer points stay within the text");
        start + point.offset
    }

    pub fn offset_to_point(&self, offset: usize) -> Option<Point> {
        if offset > self.text.len() {
            return None;
        }
        let line = lines::pos_to_line(&self.text, offset);
        let start = lines::line_to_start_offset(&self.text, line)?;
        Some(Point::new(line, offset - start))
    }

    pub fn goto_offset(&mut self, offset: usize) -> Result<(), EditError> {
        self.pt = self.offset_to_point(offset).context(EndOfBufferSnafu)?;
        Ok(())
    }

    /// Move `n` characters forward (or backward when negative), crossing lines.
    ///
    /// Fails without moving when the target lies outside the text.
    pub fn move_char(&mut self, n: isize) -> Result<(), EditError> {
        let offset = self.point_offset();
        let target = if n < 0 {
            offset
                .checked_sub(n.unsigned_abs())
                .context(BeginningOfBufferSnafu)?
        } else {
            offset
                .checked_add(n.unsigned_abs())
                .filter(|&target| target <= self.text.len())
                .context(EndOfBufferSnafu)?
        };
        self.goto_offset(target)
    }

    /// Display column of the point, the goal kept across vertical motion.
    pub fn goal_column(&self) -> usize {
        let end = self.point_offset();
        lines::range_display_width(&self.text, end - self.pt.offset, end, self.tab_width)
    }

    /// Move `n` lines down (up when negative), keeping the current goal column.
    pub fn move_line(&mut self, n: isize) -> Result<(), EditError> {
        let goal = self.goal_column();
        self.move_line_to_goal(n, goal)
    }

    /// Move `n` lines, landing as close to display column `goal` as the target line
    /// allows. Callers repeating vertical motion pass the goal of the first move.
    pub fn move_line_to_goal(&mut self, n: isize, goal: usize) -> Result<(), EditError> {
        let target = if n < 0 {
            self.pt
                .line
                .checked_sub(n.unsigned_abs())
                .context(BeginningOfBufferSnafu)?
        } else {
            self.pt
                .line
                .checked_add(n.unsigned_abs())
                .filter(|&line| line <= self.line_count())
                .context(EndOfBufferSnafu)?
        };
        let offset = lines::offset_for_goal_column(&self.text, target, goal, self.tab_width)
            .context(EndOfBufferSnafu)?;
        self.pt = Point::new(target, offset);
        Ok(())
    }

    // Characters around the point

    pub fn char_at(&self, point: Point) -> Option<char> {
        if !self.is_valid_point(point) {
            return None;
        }
        let offset = self.offset_of(point);
        (offset < self.text.len()).then(|| self.text.char_at(offset))
    }

    pub fn following_char(&self) -> Option<char> {
        self.char_at(self.pt)
    }

    pub fn preceding_char(&self) -> Option<char> {
        self.point_offset()
            .checked_sub(1)
            .map(|offset| self.text.char_at(offset))
    }

    pub fn bolp(&self) -> bool {
        self.pt.offset == 0
    }

    pub fn eolp(&self) -> bool {
        self.line_length(self.pt.line) == Some(self.pt.offset)
    }

    pub fn bobp(&self) -> bool {
        self.pt == Point::zero()
    }

    pub fn eobp(&self) -> bool {
        self.pt.line == self.line_count() && self.eolp()
    }

    // Flags

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn is_mark_anchored(&self) -> bool {
        self.mark_anchored
    }

    pub fn autofill(&self) -> bool {
        self.autofill
    }

    pub fn set_autofill(&mut self, autofill: bool) {
        self.autofill = autofill;
    }

    /// Record that the text now matches what is on disk.
    ///
    /// Only deltas recorded from here on can lead back to this state.
    pub fn mark_saved(&mut self) {
        self.modified = false;
        self.undo.clear_unchanged();
    }

    // Mutation

    /// Delete `delete_count` characters at the point, then insert `insert` there.
    ///
    /// Returns the deleted text. The point ends up after the inserted text. Fails with
    /// [`EditError::ReadOnly`] or [`EditError::EndOfBuffer`] before changing anything.
    pub fn replace_range(
        &mut self,
        delete_count: usize,
        insert: Option<Sequence>,
    ) -> Result<Sequence, EditError> {
        if self.read_only {
            debug!(point = ?self.pt, "Refused edit in read-only buffer");
            return ReadOnlySnafu.fail();
        }
        let start = self.point_offset();
        let Some(end) = start
            .checked_add(delete_count)
            .filter(|&end| end <= self.text.len())
        else {
            debug!(point = ?self.pt, delete_count, "Refused delete past end of buffer");
            return EndOfBufferSnafu.fail();
        };

        let insert = insert.unwrap_or_default();
        let deleted = self.text.substring(start, end);
        if deleted.is_empty() && insert.is_empty() {
            return Ok(deleted);
        }

        let at = self.pt;
        self.undo.push(UndoDelta {
            kind: UndoKind::ReplaceBlock {
                old_text: deleted.clone(),
                new_length: insert.len(),
            },
            point: at,
            unchanged: !self.modified,
        });

        let removed = Extent::of(&deleted);
        let inserted = Extent::of(&insert);
        self.text = self.text.splice(start, end, &insert);
        self.markers.adjust_for_delete(at, removed);
        self.markers.adjust_for_insert(at, inserted);
        self.pt = at.advance(inserted);
        self.modified = true;
        self.mark_anchored = false;

        trace!(
            point = ?at,
            deleted = removed.len,
            inserted = inserted.len,
            "Replaced text"
        );
        Ok(deleted)
    }

    pub fn insert_char(&mut self, ch: char) -> Result<(), EditError> {
        self.replace_range(0, Some(Sequence::singleton(ch))).map(drop)
    }

    pub fn insert_str(&mut self, text: &str) -> Result<(), EditError> {
        self.replace_range(0, Some(Sequence::from(text))).map(drop)
    }

    pub fn insert_newline(&mut self) -> Result<(), EditError> {
        self.insert_char('\n')
    }

    /// Delete the character after the point.
    pub fn delete_char(&mut self) -> Result<Sequence, EditError> {
        self.replace_range(1, None)
    }

    /// Delete the character before the point.
    pub fn backward_delete_char(&mut self) -> Result<Sequence, EditError> {
        ensure!(!self.read_only, ReadOnlySnafu);
        self.move_char(-1)?;
        self.replace_range(1, None)
    }

    // Markers

    pub fn marker_new(&mut self, point: Point) -> Result<MarkerId, EditError> {
        ensure!(self.is_valid_point(point), InvalidPointSnafu { point });
        Ok(self.markers.insert(point))
    }

    /// A new marker at the point.
    pub fn point_marker(&mut self) -> MarkerId {
        self.markers.insert(self.pt)
    }

    pub fn remove_marker(&mut self, id: MarkerId) -> bool {
        if self.mark == Some(id) {
            self.mark = None;
            self.mark_anchored = false;
        }
        self.markers.remove(id)
    }

    pub fn marker_point(&self, id: MarkerId) -> Option<Point> {
        self.markers.get(id)
    }

    /// Returns `false` if the marker was removed.
    pub fn move_marker(&mut self, id: MarkerId, point: Point) -> Result<bool, EditError> {
        ensure!(self.is_valid_point(point), InvalidPointSnafu { point });
        Ok(self.markers.set(id, point))
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    /// Put the mark at the point and anchor the selection.
    pub fn set_mark(&mut self) {
        let pt = self.pt;
        match self.mark {
            Some(id) if self.markers.set(id, pt) => {}
            _ => self.mark = Some(self.markers.insert(pt)),
        }
        self.mark_anchored = true;
    }

    pub fn mark(&self) -> Option<Point> {
        self.mark.and_then(|id| self.markers.get(id))
    }

    pub fn clear_mark(&mut self) {
        if let Some(id) = self.mark.take() {
            self.markers.remove(id);
        }
        self.mark_anchored = false;
    }

    // Undo

    pub fn undo_log(&self) -> &UndoLog {
        &self.undo
    }

    /// Open a group of edits that a single [`Buffer::undo`] reverts.
    pub fn undo_start_sequence(&mut self) {
        self.record(UndoKind::StartSequence, self.pt);
    }

    pub fn undo_end_sequence(&mut self) {
        self.record(UndoKind::EndSequence, self.pt);
    }

    fn record(&mut self, kind: UndoKind, point: Point) {
        self.undo.push(UndoDelta {
            kind,
            point,
            unchanged: !self.modified,
        });
    }

    /// Revert the next delta (or group of deltas) in the undo log.
    ///
    /// The revert is itself recorded, so undoing past the oldest delta with
    /// [`EditError::NoFurtherUndo`] and then undoing again redoes the reverted edits.
    pub fn undo(&mut self) -> Result<(), EditError> {
        ensure!(self.undo.is_enabled(), UndoDisabledSnafu);
        ensure!(!self.read_only, ReadOnlySnafu);

        let Some(index) = self.undo.next_undo() else {
            self.undo.rewind();
            debug!("No further undo information");
            return NoFurtherUndoSnafu.fail();
        };

        let logged = self.undo.len();
        let saved = (
            self.text.clone(),
            self.pt,
            self.markers.clone(),
            self.modified,
            self.mark_anchored,
        );

        self.undo.begin_revert();
        let result = self.revert(index);
        self.undo.end_revert();

        let next = match result {
            Ok(next) => next,
            Err(err) => {
                self.undo.truncate(logged);
                (
                    self.text,
                    self.pt,
                    self.markers,
                    self.modified,
                    self.mark_anchored,
                ) = saved;
                debug!(reverted = index, error = %err, "Undo failed, buffer restored");
                return Err(err);
            }
        };
        self.undo.set_next_undo(next);
        trace!(reverted = index, next = ?next, point = ?self.pt, "Undo");
        Ok(())
    }

    /// Revert the delta at `index`, returning the index of the delta to revert next.
    fn revert(&mut self, index: usize) -> Result<Option<usize>, EditError> {
        let Some(delta) = self.undo.get(index).cloned() else {
            return Ok(None);
        };

        match delta.kind {
            UndoKind::EndSequence => {
                self.record(UndoKind::StartSequence, delta.point);
                let mut cursor = index.checked_sub(1);
                while let Some(ix) = cursor {
                    let Some(inner) = self.undo.get(ix) else {
                        break;
                    };
                    if matches!(inner.kind, UndoKind::StartSequence) {
                        let start = inner.point;
                        self.record(UndoKind::EndSequence, start);
                        self.goto_point(start)?;
                        return Ok(ix.checked_sub(1));
                    }
                    cursor = self.revert(ix)?;
                }
                // No opening bracket: everything back to the oldest delta was reverted.
                self.record(UndoKind::EndSequence, self.pt);
                Ok(None)
            }
            UndoKind::ReplaceBlock {
                old_text,
                new_length,
            } => {
                self.goto_point(delta.point)?;
                self.replace_range(new_length, Some(old_text))?;
                self.pt = delta.point;
                if delta.unchanged {
                    self.modified = false;
                }
                Ok(index.checked_sub(1))
            }
            UndoKind::StartSequence => {
                self.goto_point(delta.point)?;
                Ok(index.checked_sub(1))
            }
        }
    }
}

//! Tracked positions that follow the text through edits.
//!
//! Markers live in a slot map keyed by [`MarkerId`]. Removing a marker invalidates its
//! id; a stale id is detected rather than aliasing a newer marker.
//!
//! Both adjustments run once per edit over every live marker and move markers in line
//! coordinates, so markers past an inserted or deleted newline change line as well as
//! offset.

use crate::point::{Extent, Point};
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Handle to a marker owned by a [`crate::Buffer`].
    pub struct MarkerId;
}

#[derive(Debug, Default, Clone)]
pub struct Markers {
    slots: SlotMap<MarkerId, Point>,
}

impl Markers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, point: Point) -> MarkerId {
        self.slots.insert(point)
    }

    /// Returns `false` if the marker was already removed.
    pub fn remove(&mut self, id: MarkerId) -> bool {
        self.slots.remove(id).is_some()
    }

    pub fn get(&self, id: MarkerId) -> Option<Point> {
        self.slots.get(id).copied()
    }

    pub fn set(&mut self, id: MarkerId, point: Point) -> bool {
        match self.slots.get_mut(id) {
            Some(slot) => {
                *slot = point;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MarkerId, Point)> + '_ {
        self.slots.iter().map(|(id, point)| (id, *point))
    }

    /// Shift markers for text of shape `inserted` placed at `at`.
    ///
    /// Markers at or after `at` on the same line are carried past the new text; markers
    /// on later lines move down by the inserted newline count.
    pub fn adjust_for_insert(&mut self, at: Point, inserted: Extent) {
        if inserted.is_empty() {
            return;
        }
        let end = at.advance(inserted);
        for point in self.slots.values_mut() {
            if point.line == at.line && point.offset >= at.offset {
                *point = Point::new(end.line, end.offset + (point.offset - at.offset));
            } else if point.line > at.line {
                point.line += inserted.newlines;
            }
        }
    }

    /// Shift markers for text of shape `deleted` removed from `at`.
    ///
    /// Markers inside the removed range collapse onto `at`.
    pub fn adjust_for_delete(&mut self, at: Point, deleted: Extent) {
        if deleted.is_empty() {
            return;
        }
        let end = at.advance(deleted);
        for point in self.slots.values_mut() {
            if *point <= at {
                continue;
            }
            if *point <= end {
                *point = at;
            } else if point.line == end.line {
                *point = Point::new(at.line, at.offset + (point.offset - end.offset));
            } else {
                point.line -= deleted.newlines;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_rblist::Sequence;

    fn extent(text: &str) -> Extent {
        Extent::of(&Sequence::from(text))
    }

    #[test]
    fn insert_before_marker_on_same_line() {
        let mut markers = Markers::new();
        let id = markers.insert(Point::new(0, 5));
        markers.adjust_for_insert(Point::new(0, 0), extent("X"));
        assert_eq!(markers.get(id), Some(Point::new(0, 6)));
    }

    #[test]
    fn insert_after_marker_leaves_it() {
        let mut markers = Markers::new();
        let id = markers.insert(Point::new(0, 2));
        markers.adjust_for_insert(Point::new(0, 3), extent("XYZ"));
        assert_eq!(markers.get(id), Some(Point::new(0, 2)));
    }

    #[test]
    fn insert_with_newlines_moves_lines() {
        let mut markers = Markers::new();
        let same_line = markers.insert(Point::new(1, 4));
        let later_line = markers.insert(Point::new(3, 1));
        let earlier_line = markers.insert(Point::new(0, 7));

        markers.adjust_for_insert(Point::new(1, 2), extent("ab\ncd\ne"));

        assert_eq!(markers.get(same_line), Some(Point::new(3, 3)));
        assert_eq!(markers.get(later_line), Some(Point::new(5, 1)));
        assert_eq!(markers.get(earlier_line), Some(Point::new(0, 7)));
    }

    #[test]
    fn delete_collapses_and_shifts() {
        let mut markers = Markers::new();
        let before = markers.insert(Point::new(0, 1));
        let at = markers.insert(Point::new(0, 2));
        let inside = markers.insert(Point::new(0, 3));
        let after = markers.insert(Point::new(0, 6));

        markers.adjust_for_delete(Point::new(0, 2), extent("abc"));

        assert_eq!(markers.get(before), Some(Point::new(0, 1)));
        assert_eq!(markers.get(at), Some(Point::new(0, 2)));
        assert_eq!(markers.get(inside), Some(Point::new(0, 2)));
        assert_eq!(markers.get(after), Some(Point::new(0, 3)));
    }

    #[test]
    fn delete_across_newline_joins_lines() {
        let mut markers = Markers::new();
        let inside = markers.insert(Point::new(1, 0));
        let joined = markers.insert(Point::new(1, 4));
        let below = markers.insert(Point::new(2, 3));

        // "xyz\nab" removed starting at (0, 5); the deleted range ends at (1, 2).
        markers.adjust_for_delete(Point::new(0, 5), extent("xyz\nab"));

        assert_eq!(markers.get(inside), Some(Point::new(0, 5)));
        assert_eq!(markers.get(joined), Some(Point::new(0, 7)));
        assert_eq!(markers.get(below), Some(Point::new(1, 3)));
    }

    #[test]
    fn removed_handles_are_stale() {
        let mut markers = Markers::new();
        let id = markers.insert(Point::zero());
        assert!(markers.remove(id));
        assert!(!markers.remove(id));
        assert_eq!(markers.get(id), None);
        assert!(!markers.set(id, Point::new(1, 1)));
        assert!(markers.is_empty());
    }
}

use quire_rblist::Sequence;

/// Logical cursor location: a line number and a character offset within that line.
///
/// A point is not an index into the text; [`crate::Buffer::point_offset`] translates it.
/// Points order by line, then offset, which matches text order.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub line: usize,
    pub offset: usize,
}

impl Point {
    pub const fn new(line: usize, offset: usize) -> Self {
        Self { line, offset }
    }

    pub const fn zero() -> Self {
        Self { line: 0, offset: 0 }
    }

    /// The point just past `extent` when it is laid down starting here.
    pub fn advance(self, extent: Extent) -> Point {
        if extent.newlines == 0 {
            Point::new(self.line, self.offset + extent.len)
        } else {
            Point::new(self.line + extent.newlines, extent.tail)
        }
    }
}

/// Shape of a run of text in line coordinates.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct Extent {
    pub len: usize,
    pub newlines: usize,
    /// Characters after the last newline, or `len` when there is none.
    pub tail: usize,
}

impl Extent {
    pub fn of(text: &Sequence) -> Self {
        let newlines = text.newlines();
        let tail = match newlines.checked_sub(1).and_then(|n| text.nth_newline(n)) {
            Some(last) => text.len() - last - 1,
            None => text.len(),
        };
        Self {
            len: text.len(),
            newlines,
            tail,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

//! Line-oriented queries over a [`Sequence`].
//!
//! Text is stored with embedded `'\n'` delimiters; line `n` is the run of characters
//! after the `n`th newline (line 0 starts at index 0) up to the next newline or the end
//! of the text. A sequence with `k` newlines therefore has lines `0..=k`.
//!
//! Display widths expand tabs to the next multiple of the tab width and render control
//! characters as two columns (`^X`).

use crate::Sequence;
use unicode_width::UnicodeWidthChar;

pub fn line_count(seq: &Sequence) -> usize {
    seq.newlines()
}

/// Index of the first character of line `line_no`, or `None` past the last line.
pub fn line_to_start_offset(seq: &Sequence, line_no: usize) -> Option<usize> {
    match line_no {
        0 => Some(0),
        n => seq.nth_newline(n - 1).map(|ix| ix + 1),
    }
}

/// Index of the newline ending `line_no`, or the text length for the last line.
pub fn line_to_end_offset(seq: &Sequence, line_no: usize) -> Option<usize> {
    match seq.nth_newline(line_no) {
        Some(ix) => Some(ix),
        None if line_no == seq.newlines() => Some(seq.len()),
        None => None,
    }
}

pub fn line_length(seq: &Sequence, line_no: usize) -> Option<usize> {
    let start = line_to_start_offset(seq, line_no)?;
    let end = line_to_end_offset(seq, line_no)?;
    Some(end - start)
}

/// Content of `line_no` without its trailing newline.
pub fn line_text(seq: &Sequence, line_no: usize) -> Option<Sequence> {
    let start = line_to_start_offset(seq, line_no)?;
    let end = line_to_end_offset(seq, line_no)?;
    Some(seq.substring(start, end))
}

/// Line containing character index `offset`.
///
/// # Panics
///
/// Panics if `offset > seq.len()`.
pub fn pos_to_line(seq: &Sequence, offset: usize) -> usize {
    seq.newlines_before(offset)
}

/// Column reached after drawing `ch` starting at column `col`.
pub fn advance_column(col: usize, ch: char, tab_width: usize) -> usize {
    match ch {
        '\t' => {
            let tab_width = tab_width.max(1);
            col + tab_width - col % tab_width
        }
        ch if ch.is_control() => col + 2,
        ch => col + ch.width().unwrap_or(0),
    }
}

/// On-screen width of `seq` drawn from column 0.
pub fn display_width(seq: &Sequence, tab_width: usize) -> usize {
    range_display_width(seq, 0, seq.len(), tab_width)
}

/// On-screen width of the characters in `from..to`, drawn from column 0.
///
/// # Panics
///
/// Panics if `from > to` or `to > seq.len()`.
pub fn range_display_width(seq: &Sequence, from: usize, to: usize, tab_width: usize) -> usize {
    assert!(
        from <= to && to <= seq.len(),
        "range {from}..{to} out of bounds for length {}",
        seq.len()
    );
    seq.chars_at(from)
        .take(to - from)
        .fold(0, |col, ch| advance_column(col, ch, tab_width))
}

/// Largest offset on `line_no` whose display column does not exceed `goal`.
///
/// This is the lookup used to keep the cursor in the same visual column while moving
/// between lines of different lengths or tab layouts.
pub fn offset_for_goal_column(
    seq: &Sequence,
    line_no: usize,
    goal: usize,
    tab_width: usize,
) -> Option<usize> {
    let start = line_to_start_offset(seq, line_no)?;
    let len = line_length(seq, line_no)?;

    let mut col = 0;
    let mut offset = 0;
    for ch in seq.chars_at(start).take(len) {
        let next = advance_column(col, ch, tab_width);
        if next > goal {
            break;
        }
        col = next;
        offset += 1;
    }
    Some(offset)
}

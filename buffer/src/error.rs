use crate::point::Point;
use snafu::Snafu;

/// Errors surfaced by buffer operations.
///
/// None of these leave a partial edit behind: every check runs before the text, point,
/// markers or undo log are touched.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum EditError {
    #[snafu(display("Buffer is read-only"))]
    ReadOnly,

    #[snafu(display("End of buffer"))]
    EndOfBuffer,

    #[snafu(display("Beginning of buffer"))]
    BeginningOfBuffer,

    #[snafu(display("No further undo information"))]
    NoFurtherUndo,

    #[snafu(display("Undo disabled in this buffer"))]
    UndoDisabled,

    /// The point does not name a position inside the buffer
    #[snafu(display("Invalid point: line {}, offset {}", point.line, point.offset))]
    InvalidPoint { point: Point },
}

impl EditError {
    /// Whether the error is a status report rather than a failed request.
    pub fn is_informational(&self) -> bool {
        matches!(self, EditError::NoFurtherUndo)
    }
}

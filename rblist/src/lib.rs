//! Persistent character sequences for quire buffers.
//!
//! A [`Sequence`] is an immutable binary tree of character leaves. Every edit produces a
//! new sequence that shares untouched subtrees with the old one, so snapshots (undo
//! records, killed text, other buffers) are cheap to keep around.
//!
//! Trees are balanced by randomised concatenation rather than by rotations: each merge
//! step flips a coin weighted by the lengths of the two operands, which keeps the
//! expected depth logarithmic no matter what order text is appended in.
//!
//! The [`lines`] module layers line-oriented queries on top of the sequence API.

mod iter;
pub mod lines;
mod sequence;

pub use iter::{Chars, Chunks};
pub use sequence::{Sequence, MIN_NODE_LENGTH};

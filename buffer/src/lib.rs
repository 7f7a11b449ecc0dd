//! Buffer engine for quire.
//!
//! A [`Buffer`] owns the text of one file as a [`Sequence`], a logical cursor
//! ([`Point`]), a set of [`MarkerId`]-addressed markers that follow the text as it
//! changes, and an [`UndoLog`] of reversible deltas. Every change goes through
//! [`Buffer::replace_range`], which keeps all three consistent.
//!
//! The key components are:
//! - [`buffer::Buffer`] - text, point, mark, flags and the mutation engine
//! - [`marker::Markers`] - tracked positions adjusted in bulk on every edit
//! - [`undo::UndoLog`] - grouped, redoable undo history
//! - [`session::Session`] - owns open buffers and tracks the current one
//! - [`config::Config`] - per-buffer defaults loaded from TOML

pub mod buffer;
pub mod config;
pub mod error;
pub mod marker;
pub mod point;
pub mod session;
pub mod undo;

pub use buffer::Buffer;
pub use config::Config;
pub use error::EditError;
pub use marker::{MarkerId, Markers};
pub use point::{Extent, Point};
pub use quire_rblist::Sequence;
pub use session::{BufferId, Session};
pub use undo::{UndoDelta, UndoKind, UndoLog};

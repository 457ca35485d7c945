//! Host editor boundary
//!
//! Live views never touch buffer internals. Everything they need from the
//! editor hosting them is expressed by the [`View`] and [`Host`] traits:
//! named region storage that survives edits, the selection, per-view
//! settings, the read-only/scratch flags and the basic text mutations.
//!
//! A `View` is a handle, like a window handle: cloning it does not copy the
//! buffer, and all methods take `&self`. The host owns the buffer state.

pub mod memory;

use crate::model::span::Span;
use crate::model::style::{NewFileFlags, RegionStyle};
use serde_json::Value;
use std::fmt;

/// Host-assigned view identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// Errors raised by host text mutations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    #[error("{0} is read-only")]
    ReadOnly(ViewId),

    #[error("offset {offset} is out of bounds for {view} (size {size})")]
    OutOfBounds {
        view: ViewId,
        offset: usize,
        size: usize,
    },
}

/// A handle to one buffer view in the host editor
pub trait View: Clone + 'static {
    fn id(&self) -> ViewId;

    fn name(&self) -> String;
    fn set_name(&self, name: &str);

    /// Number of characters in the buffer
    fn size(&self) -> usize;
    /// Text covered by `span`, clamped to the buffer
    fn substr(&self, span: Span) -> String;

    // Selection
    fn sel(&self) -> Vec<Span>;
    fn add_sel(&self, span: Span);
    fn clear_sel(&self);

    // Settings
    fn setting(&self, name: &str) -> Option<Value>;
    fn set_setting(&self, name: &str, value: Value);
    fn erase_setting(&self, name: &str);

    fn is_read_only(&self) -> bool;
    fn set_read_only(&self, read_only: bool);
    fn is_scratch(&self) -> bool;
    fn set_scratch(&self, scratch: bool);

    // Named region storage. Spans stored under a key are re-anchored by the
    // host whenever the text changes.
    fn add_regions(&self, key: &str, spans: &[Span], style: &RegionStyle);
    fn get_regions(&self, key: &str) -> Vec<Span>;
    fn erase_regions(&self, key: &str);

    // Text mutation
    fn insert(&self, point: usize, text: &str) -> Result<usize, ViewError>;
    fn erase(&self, span: Span) -> Result<(), ViewError>;
    fn replace(&self, span: Span, text: &str) -> Result<(), ViewError>;
}

/// The host editor, able to open new views in its active window
pub trait Host {
    type View: View;

    fn new_file(&self, flags: NewFileFlags, syntax: &str) -> Self::View;
}

//! Clickable, stateful regions in editor views.
//!
//! A [`live::LiveView`] wraps a host editor view and turns caret clicks into
//! calls to handlers attached to [`live::LiveRegion`]s: spans of text the host
//! keeps anchored as the buffer is edited. This is enough to build buttons,
//! links and expandable fields out of plain styled text.
//!
//! The host editor is reached only through the traits in [`host`]; an
//! in-memory implementation lives in [`host::memory`].

pub mod config;
pub mod host;
pub mod input;
pub mod live;
pub mod model;
pub mod services;

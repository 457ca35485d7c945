//! Live views and live regions
//!
//! A [`LiveView`] layers click handling on top of a host [`View`]. Callers
//! register [`LiveRegion`]s under group keys; each region is stored in the host
//! under its own unique key so the host keeps its span current across edits.
//! When the host reports a selection change that looks like a single click,
//! the view finds the first region under the caret and runs its handlers, or
//! its own fallback handlers when nothing matched.
//!
//! [`LiveViews`] is the registry mapping host views to their live view. It is
//! owned by whatever drives the host's event callbacks.

pub mod region;
pub mod registry;
pub mod view;

pub use region::LiveRegion;
pub use registry::LiveViews;
pub use view::{ApplySettings, LiveView, LiveViewOptions, ViewRegion};

use crate::host::View;
use crate::model::span::Span;
use std::fmt;
use std::rc::Rc;

/// Consistency errors between live regions and the host's stored regions.
///
/// These indicate a bug in the caller (e.g. a view wiped without erasing its
/// groups first) and are never recovered from.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LiveError {
    #[error("registered live region in group {group:?} has no storage key")]
    MissingStorageKey { group: String },

    #[error("no stored region found for live region key {key:?}")]
    RegionNotFound { key: String },

    #[error("live region key {key:?} resolved to {count} stored regions")]
    AmbiguousRegion { key: String, count: usize },
}

/// Handler run when a live region is clicked
pub type RegionHandler<V> = Rc<dyn Fn(&LiveRegion<V>, &mut LiveView<V>) -> anyhow::Result<()>>;

/// Handler run when a click in a live view hits no live region
pub type ViewHandler<V> = Rc<dyn Fn(&mut LiveView<V>) -> anyhow::Result<()>>;

/// Click handling stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    PreProcess,
    Process,
    PostProcess,
}

/// The three optional click handling stages, always run in
/// pre-process, process, post-process order
#[derive(Clone)]
pub struct Handlers<F> {
    pub pre_process: Option<F>,
    pub process: Option<F>,
    pub post_process: Option<F>,
}

impl<F> Handlers<F> {
    pub fn none() -> Self {
        Self {
            pre_process: None,
            process: None,
            post_process: None,
        }
    }

    /// Set stages in execution order
    pub fn iter(&self) -> impl Iterator<Item = (Stage, &F)> {
        [
            (Stage::PreProcess, self.pre_process.as_ref()),
            (Stage::Process, self.process.as_ref()),
            (Stage::PostProcess, self.post_process.as_ref()),
        ]
        .into_iter()
        .filter_map(|(stage, handler)| handler.map(|h| (stage, h)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl<F> Default for Handlers<F> {
    fn default() -> Self {
        Self::none()
    }
}

impl<F> fmt::Debug for Handlers<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("pre_process", &self.pre_process.is_some())
            .field("process", &self.process.is_some())
            .field("post_process", &self.post_process.is_some())
            .finish()
    }
}

/// Resolve a live region storage key to its single stored span
pub(crate) fn resolve_storage_key<V: View>(view: &V, storage_key: &str) -> Result<Span, LiveError> {
    let spans = view.get_regions(storage_key);
    match spans.as_slice() {
        [span] => Ok(*span),
        [] => Err(LiveError::RegionNotFound {
            key: storage_key.to_string(),
        }),
        _ => Err(LiveError::AmbiguousRegion {
            key: storage_key.to_string(),
            count: spans.len(),
        }),
    }
}

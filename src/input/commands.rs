//! Text commands run against host views by name

use crate::host::{View, ViewError};
use crate::model::span::Span;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("invalid arguments for {command}: {source}")]
    InvalidArguments {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    View(#[from] ViewError),
}

/// Insert, erase or replace text in a view, even a read-only one.
///
/// - `data` and a non-empty `start..end`: replace the range with `data`
/// - `start..end` without `data`: erase the range
/// - `data` without a range: insert `data` at `start`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateLiveView {
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub end: Option<usize>,
}

impl UpdateLiveView {
    pub const NAME: &'static str = "update_live_view";

    pub fn insert(start: usize, data: impl Into<String>) -> Self {
        Self {
            data: Some(data.into()),
            start,
            end: None,
        }
    }

    pub fn erase(start: usize, end: usize) -> Self {
        Self {
            data: None,
            start,
            end: Some(end),
        }
    }

    pub fn replace(start: usize, end: usize, data: impl Into<String>) -> Self {
        Self {
            data: Some(data.into()),
            start,
            end: Some(end),
        }
    }

    /// Apply the edit. Read-only protection is lifted for the edit and
    /// restored afterwards, whether or not the edit succeeded.
    pub fn run<V: View>(&self, view: &V) -> Result<(), CommandError> {
        let was_read_only = view.is_read_only();
        if was_read_only {
            view.set_read_only(false);
        }

        let result = self.apply(view);

        if was_read_only {
            view.set_read_only(true);
        }
        result.map_err(CommandError::from)
    }

    fn apply<V: View>(&self, view: &V) -> Result<(), ViewError> {
        match (self.end, &self.data) {
            (Some(end), Some(data)) if end != self.start => {
                view.replace(Span::new(self.start, end), data)
            }
            (Some(end), None) if end != self.start => view.erase(Span::new(self.start, end)),
            (_, Some(data)) => view.insert(self.start, data).map(|_| ()),
            _ => Ok(()),
        }
    }
}

/// Run a text command by name with JSON arguments
pub fn run_command<V: View>(view: &V, name: &str, args: Value) -> Result<(), CommandError> {
    match name {
        UpdateLiveView::NAME => {
            let command: UpdateLiveView =
                serde_json::from_value(args).map_err(|source| CommandError::InvalidArguments {
                    command: name.to_string(),
                    source,
                })?;
            tracing::trace!("{}: running {} {:?}", view.id(), name, command);
            command.run(view)
        }
        _ => Err(CommandError::UnknownCommand(name.to_string())),
    }
}

use super::view::{LiveView, LiveViewOptions};
use crate::config::LiveViewConfig;
use crate::host::{Host, View, ViewId};
use std::collections::HashMap;

/// Registry mapping host views to their live view.
///
/// Owned by the component receiving the host's event callbacks, which
/// forwards selection changes and view closes through
/// [`on_selection_modified`](Self::on_selection_modified) and
/// [`on_close`](Self::on_close).
pub struct LiveViews<H: Host> {
    host: H,
    config: LiveViewConfig,
    views: HashMap<ViewId, LiveView<H::View>>,
}

impl<H: Host> LiveViews<H> {
    pub fn new(host: H, config: LiveViewConfig) -> Self {
        Self {
            host,
            config,
            views: HashMap::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &LiveViewConfig {
        &self.config
    }

    /// Construction options seeded from the registry's config
    pub fn options(&self) -> LiveViewOptions<H::View> {
        LiveViewOptions::from_config(&self.config)
    }

    /// Whether `view` has a live view. Never creates one.
    pub fn has(&self, view: &H::View) -> bool {
        self.views.contains_key(&view.id())
    }

    pub fn get(&self, view: &H::View) -> Option<&LiveView<H::View>> {
        self.views.get(&view.id())
    }

    pub fn get_mut(&mut self, view: &H::View) -> Option<&mut LiveView<H::View>> {
        self.views.get_mut(&view.id())
    }

    /// Return the live view for `view`, creating it with `options` if needed.
    ///
    /// With no view, a new one is opened in the host's active window using
    /// `options.flags` and `options.syntax`. `options` is ignored when the
    /// view already has a live view.
    pub fn get_or_create(
        &mut self,
        view: Option<&H::View>,
        options: LiveViewOptions<H::View>,
    ) -> &mut LiveView<H::View> {
        let view = match view {
            Some(view) => view.clone(),
            None => self.host.new_file(options.flags, &options.syntax),
        };
        self.views.entry(view.id()).or_insert_with(|| {
            tracing::debug!("creating live view for {}", view.id());
            LiveView::new(view, options)
        })
    }

    /// Drop the live view for `view`, optionally reverting its settings first.
    /// Does nothing if the view has none.
    pub fn delete(&mut self, view: &H::View, revert: bool) {
        if let Some(mut live_view) = self.views.remove(&view.id()) {
            if revert {
                live_view.revert_settings();
            }
            tracing::debug!("removed live view for {}", view.id());
        }
    }

    /// Host callback: the selection in `view` changed
    pub fn on_selection_modified(&mut self, view: &H::View) -> anyhow::Result<()> {
        match self.views.get_mut(&view.id()) {
            Some(live_view) => live_view.clicked(),
            None => Ok(()),
        }
    }

    /// Host callback: `view` was closed
    pub fn on_close(&mut self, view: &H::View) {
        self.delete(view, true);
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

use super::{resolve_storage_key, Handlers, LiveError, LiveRegion, ViewHandler};
use crate::config::LiveViewConfig;
use crate::host::{View, ViewError, ViewId};
use crate::model::span::Span;
use crate::model::style::{NewFileFlags, RegionStyle};
use crate::services::time_source::{RealTimeSource, SharedTimeSource, TimeSource};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// A region as passed to or returned from [`LiveView`]'s region methods
#[derive(Debug, Clone)]
pub enum ViewRegion<V: View> {
    /// Stored by the host under the group key as-is
    Plain(Span),
    /// Stored individually and dispatched to on click
    Live(LiveRegion<V>),
}

impl<V: View> ViewRegion<V> {
    pub fn span(&self) -> Span {
        match self {
            ViewRegion::Plain(span) => *span,
            ViewRegion::Live(region) => region.span(),
        }
    }

    pub fn as_live(&self) -> Option<&LiveRegion<V>> {
        match self {
            ViewRegion::Live(region) => Some(region),
            ViewRegion::Plain(_) => None,
        }
    }
}

impl<V: View> From<Span> for ViewRegion<V> {
    fn from(span: Span) -> Self {
        ViewRegion::Plain(span)
    }
}

impl<V: View> From<LiveRegion<V>> for ViewRegion<V> {
    fn from(region: LiveRegion<V>) -> Self {
        ViewRegion::Live(region)
    }
}

/// Construction arguments for a [`LiveView`]
#[derive(Clone)]
pub struct LiveViewOptions<V: View> {
    /// Flags for a view opened by the registry when none is given
    pub flags: NewFileFlags,
    /// Syntax for a view opened by the registry when none is given
    pub syntax: String,
    pub name: Option<String>,
    /// Fallback handlers for clicks that hit no live region
    pub handlers: Handlers<ViewHandler<V>>,
    pub clear_selection: bool,
    pub debounce: Duration,
    pub default_settings: Map<String, Value>,
    pub use_default_settings: bool,
    pub time_source: SharedTimeSource,
}

impl<V: View> LiveViewOptions<V> {
    pub fn from_config(config: &LiveViewConfig) -> Self {
        Self {
            flags: NewFileFlags::empty(),
            syntax: String::new(),
            name: None,
            handlers: Handlers::none(),
            clear_selection: config.clear_selection,
            debounce: config.debounce(),
            default_settings: config.default_settings.clone(),
            use_default_settings: config.use_default_settings,
            time_source: RealTimeSource::shared(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_flags(mut self, flags: NewFileFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_syntax(mut self, syntax: impl Into<String>) -> Self {
        self.syntax = syntax.into();
        self
    }

    pub fn with_clear_selection(mut self, clear_selection: bool) -> Self {
        self.clear_selection = clear_selection;
        self
    }

    pub fn with_time_source(mut self, time_source: SharedTimeSource) -> Self {
        self.time_source = time_source;
        self
    }

    pub fn with_pre_process<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut LiveView<V>) -> anyhow::Result<()> + 'static,
    {
        self.handlers.pre_process = Some(Rc::new(handler));
        self
    }

    pub fn with_process<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut LiveView<V>) -> anyhow::Result<()> + 'static,
    {
        self.handlers.process = Some(Rc::new(handler));
        self
    }

    pub fn with_post_process<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut LiveView<V>) -> anyhow::Result<()> + 'static,
    {
        self.handlers.post_process = Some(Rc::new(handler));
        self
    }
}

impl<V: View> Default for LiveViewOptions<V> {
    fn default() -> Self {
        Self::from_config(&LiveViewConfig::default())
    }
}

/// Arguments for [`LiveView::apply_settings`]
#[derive(Debug, Clone)]
pub struct ApplySettings {
    /// Settings to apply. These win over the defaults.
    pub settings: Map<String, Value>,
    /// Layer the view's default settings underneath `settings`
    pub use_defaults: bool,
    pub read_only: Option<bool>,
    pub scratch: Option<bool>,
}

impl Default for ApplySettings {
    fn default() -> Self {
        Self {
            settings: Map::new(),
            use_defaults: true,
            read_only: None,
            scratch: None,
        }
    }
}

impl ApplySettings {
    pub fn with(mut self, name: &str, value: Value) -> Self {
        self.settings.insert(name.to_string(), value);
        self
    }
}

/// A host view with click handling and live region bookkeeping
pub struct LiveView<V: View> {
    view: V,
    /// Live regions by group key. Groups and regions keep insertion order,
    /// which is the order clicks are resolved in.
    live_regions: Vec<(String, Vec<LiveRegion<V>>)>,
    /// When false, selection events never dispatch
    pub clickable: bool,
    /// Clear the selection after every selection event
    pub clear_selection: bool,
    last_click_time: Option<Instant>,
    /// Values settings had before `apply_settings` first touched them.
    /// `None` means the setting was not set.
    org_view_settings: HashMap<String, Option<Value>>,
    org_read_only: Option<bool>,
    org_scratch: Option<bool>,
    handlers: Handlers<ViewHandler<V>>,
    debounce: Duration,
    default_settings: Map<String, Value>,
    time_source: SharedTimeSource,
}

impl<V: View> LiveView<V> {
    pub fn new(view: V, options: LiveViewOptions<V>) -> Self {
        if let Some(name) = &options.name {
            view.set_name(name);
        }
        let default_settings = if options.use_default_settings {
            options.default_settings
        } else {
            Map::new()
        };
        Self {
            view,
            live_regions: Vec::new(),
            clickable: true,
            clear_selection: options.clear_selection,
            last_click_time: None,
            org_view_settings: HashMap::new(),
            org_read_only: None,
            org_scratch: None,
            handlers: options.handlers,
            debounce: options.debounce,
            default_settings,
            time_source: options.time_source,
        }
    }

    /// The wrapped host view
    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn id(&self) -> ViewId {
        self.view.id()
    }

    pub fn handlers(&self) -> &Handlers<ViewHandler<V>> {
        &self.handlers
    }

    pub fn set_handlers(&mut self, handlers: Handlers<ViewHandler<V>>) {
        self.handlers = handlers;
    }

    pub fn last_click_time(&self) -> Option<Instant> {
        self.last_click_time
    }

    /// Forget the last click so the next selection event is never debounced.
    ///
    /// Call this after closing a dialog: focus returning to the view fires a
    /// selection event that should not count as a click.
    pub fn reset_click_time(&mut self) {
        self.last_click_time = None;
    }

    // ---------------------------------------------------------------------
    // Settings
    // ---------------------------------------------------------------------

    /// Apply settings to the view, remembering what they replaced.
    ///
    /// Only the first change to a given setting records its prior value, so
    /// [`revert_settings`](Self::revert_settings) always restores the state
    /// from before the live view touched it.
    pub fn apply_settings(&mut self, args: ApplySettings) {
        let mut settings = if args.use_defaults {
            self.default_settings.clone()
        } else {
            Map::new()
        };
        settings.extend(args.settings);

        if let Some(read_only) = args.read_only {
            if self.org_read_only.is_none() {
                self.org_read_only = Some(self.view.is_read_only());
            }
            self.view.set_read_only(read_only);
        }
        if let Some(scratch) = args.scratch {
            if self.org_scratch.is_none() {
                self.org_scratch = Some(self.view.is_scratch());
            }
            self.view.set_scratch(scratch);
        }

        for (name, value) in settings {
            if !self.org_view_settings.contains_key(&name) {
                let previous = self.view.setting(&name);
                self.org_view_settings.insert(name.clone(), previous);
            }
            self.view.set_setting(&name, value);
        }
        tracing::debug!(
            "{}: applied settings, {} original value(s) recorded",
            self.view.id(),
            self.org_view_settings.len()
        );
    }

    /// Restore every setting recorded by `apply_settings`
    pub fn revert_settings(&mut self) {
        if let Some(read_only) = self.org_read_only.take() {
            self.view.set_read_only(read_only);
        }
        if let Some(scratch) = self.org_scratch.take() {
            self.view.set_scratch(scratch);
        }
        for (name, value) in self.org_view_settings.drain() {
            match value {
                Some(value) => self.view.set_setting(&name, value),
                None => self.view.erase_setting(&name),
            }
        }
    }

    // ---------------------------------------------------------------------
    // Regions
    // ---------------------------------------------------------------------

    /// Store regions under `key`.
    ///
    /// Plain spans go to the host under `key` directly. Each live region gets
    /// its own storage key so the host tracks its drift independently.
    /// Adding a region that is already attached moves it: its old stored
    /// span and group entry are removed first.
    pub fn add_regions<I>(&mut self, key: &str, regions: I, style: &RegionStyle)
    where
        I: IntoIterator<Item = ViewRegion<V>>,
    {
        let mut plain = Vec::new();
        for region in regions {
            match region {
                ViewRegion::Plain(span) => plain.push(span),
                ViewRegion::Live(region) => self.add_live_region(key, region, style),
            }
        }
        if !plain.is_empty() {
            self.view.add_regions(key, &plain, style);
        }
    }

    fn add_live_region(&mut self, key: &str, region: LiveRegion<V>, style: &RegionStyle) {
        if let Some(old_key) = region.storage_key() {
            match region.view() {
                Some(old_view) => old_view.erase_regions(&old_key),
                None => self.view.erase_regions(&old_key),
            }
            self.forget_region(&region, key);
        }

        let storage_key = format!("{}--{}--{}", key, Uuid::new_v4(), region.id());
        tracing::trace!("{}: attaching live region {} as {}", self.view.id(), region, storage_key);
        self.view.add_regions(&storage_key, &[region.span()], style);
        region.attach(key, storage_key, self.view.clone());
        self.group_mut(key).push(region);
    }

    fn group_mut(&mut self, key: &str) -> &mut Vec<LiveRegion<V>> {
        let index = match self.live_regions.iter().position(|(k, _)| k == key) {
            Some(index) => index,
            None => {
                self.live_regions.push((key.to_string(), Vec::new()));
                self.live_regions.len() - 1
            }
        };
        &mut self.live_regions[index].1
    }

    /// Drop `region` from every group. Groups left empty are removed, except
    /// `keep`, which must hold its place in click priority order.
    fn forget_region(&mut self, region: &LiveRegion<V>, keep: &str) {
        for (_, regions) in self.live_regions.iter_mut() {
            regions.retain(|r| !r.ptr_eq(region));
        }
        self.live_regions
            .retain(|(k, regions)| k == keep || !regions.is_empty());
    }

    /// Regions stored under `key`: the host's plain spans followed by the
    /// group's live regions, refreshed from their stored spans
    pub fn get_regions(&self, key: &str) -> Result<Vec<ViewRegion<V>>, LiveError> {
        let mut regions: Vec<ViewRegion<V>> = self
            .view
            .get_regions(key)
            .into_iter()
            .map(ViewRegion::Plain)
            .collect();
        for region in self.regions_in(key) {
            let storage_key = region.storage_key().ok_or_else(|| LiveError::MissingStorageKey {
                group: key.to_string(),
            })?;
            let stored = resolve_storage_key(&self.view, &storage_key)?;
            region.update_bounds(stored);
            regions.push(ViewRegion::Live(region.clone()));
        }
        Ok(regions)
    }

    /// Erase everything stored under `key`, detaching its live regions.
    ///
    /// Call this for every group before wiping the view's contents, or the
    /// per-region stored spans are left behind in the host.
    pub fn erase_regions(&mut self, key: &str) {
        if let Some(index) = self.live_regions.iter().position(|(k, _)| k == key) {
            let (_, regions) = self.live_regions.remove(index);
            for region in &regions {
                if let Some(storage_key) = region.storage_key() {
                    self.view.erase_regions(&storage_key);
                }
                region.detach();
            }
            tracing::trace!("{}: erased {} live region(s) in {:?}", self.view.id(), regions.len(), key);
        }
        self.view.erase_regions(key);
    }

    /// Live regions registered under `key`, in click priority order
    pub fn regions_in(&self, key: &str) -> &[LiveRegion<V>] {
        self.live_regions
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, regions)| regions.as_slice())
            .unwrap_or(&[])
    }

    /// Group keys with live regions, in insertion order
    pub fn groups(&self) -> Vec<&str> {
        self.live_regions.iter().map(|(k, _)| k.as_str()).collect()
    }

    /// Wrap a host span as a detached live region
    pub fn live_region(&self, span: Span) -> LiveRegion<V> {
        LiveRegion::from_span(span)
    }

    /// Wrap host spans as detached live regions, e.g. the result of a search
    pub fn live_regions<I>(&self, spans: I) -> Vec<LiveRegion<V>>
    where
        I: IntoIterator<Item = Span>,
    {
        spans.into_iter().map(LiveRegion::from_span).collect()
    }

    /// First live region whose stored span contains a click at `point`.
    ///
    /// A click exactly on a region's end is outside it. Every region visited
    /// must resolve to exactly one stored span.
    pub fn region_at(&self, point: usize) -> Result<Option<LiveRegion<V>>, LiveError> {
        for (key, regions) in &self.live_regions {
            for region in regions {
                let storage_key = region
                    .storage_key()
                    .ok_or_else(|| LiveError::MissingStorageKey { group: key.clone() })?;
                let stored = resolve_storage_key(&self.view, &storage_key)?;
                if stored.contains_click(point) {
                    region.update_bounds(stored);
                    return Ok(Some(region.clone()));
                }
            }
        }
        Ok(None)
    }

    // ---------------------------------------------------------------------
    // Click dispatch
    // ---------------------------------------------------------------------

    /// Handle a selection change in the view.
    ///
    /// A single caret selection outside the debounce window is a click: it
    /// runs the handlers of the first live region under the caret, or the
    /// view's own handlers if none matched. The selection is cleared
    /// afterwards when `clear_selection` is set, click or not.
    ///
    /// Handler errors are returned as-is; the remaining stages and the
    /// selection clearing are skipped.
    pub fn clicked(&mut self) -> anyhow::Result<()> {
        if self.clickable {
            let now = self.time_source.now();
            let selection = self.view.sel();
            let caret = match selection.as_slice() {
                [caret] if caret.is_empty() => Some(*caret),
                _ => None,
            };
            let debounced = self
                .last_click_time
                .is_some_and(|last| now.saturating_duration_since(last) <= self.debounce);

            if let (Some(caret), false) = (caret, debounced) {
                self.last_click_time = Some(now);
                let point = caret.begin();
                match self.region_at(point)? {
                    Some(region) => {
                        tracing::debug!("{}: click at {} hit live region {}", self.view.id(), point, region);
                        if region.clickable() {
                            self.run_region_handlers(&region)?;
                        }
                    }
                    None => {
                        tracing::debug!("{}: click at {} hit no live region", self.view.id(), point);
                        self.run_view_handlers()?;
                    }
                }
            } else if debounced {
                tracing::trace!("{}: selection event within debounce window", self.view.id());
            }
        }

        if self.clear_selection {
            self.view.clear_sel();
        }
        Ok(())
    }

    fn run_region_handlers(&mut self, region: &LiveRegion<V>) -> anyhow::Result<()> {
        let handlers = region.handlers();
        for (stage, handler) in handlers.iter() {
            tracing::trace!("{}: running {:?} for {}", self.view.id(), stage, region);
            handler(region, self)?;
        }
        Ok(())
    }

    fn run_view_handlers(&mut self) -> anyhow::Result<()> {
        let handlers = self.handlers.clone();
        for (stage, handler) in handlers.iter() {
            tracing::trace!("{}: running view {:?}", self.view.id(), stage);
            handler(self)?;
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Host view forwarding
    // ---------------------------------------------------------------------

    pub fn name(&self) -> String {
        self.view.name()
    }

    pub fn set_name(&self, name: &str) {
        self.view.set_name(name);
    }

    pub fn size(&self) -> usize {
        self.view.size()
    }

    pub fn substr(&self, span: Span) -> String {
        self.view.substr(span)
    }

    pub fn sel(&self) -> Vec<Span> {
        self.view.sel()
    }

    pub fn add_sel(&self, span: Span) {
        self.view.add_sel(span);
    }

    pub fn clear_sel(&self) {
        self.view.clear_sel();
    }

    pub fn setting(&self, name: &str) -> Option<Value> {
        self.view.setting(name)
    }

    pub fn set_setting(&self, name: &str, value: Value) {
        self.view.set_setting(name, value);
    }

    pub fn is_read_only(&self) -> bool {
        self.view.is_read_only()
    }

    pub fn set_read_only(&self, read_only: bool) {
        self.view.set_read_only(read_only);
    }

    pub fn is_scratch(&self) -> bool {
        self.view.is_scratch()
    }

    pub fn set_scratch(&self, scratch: bool) {
        self.view.set_scratch(scratch);
    }

    pub fn insert(&self, point: usize, text: &str) -> Result<usize, ViewError> {
        self.view.insert(point, text)
    }

    pub fn erase(&self, span: Span) -> Result<(), ViewError> {
        self.view.erase(span)
    }

    pub fn replace(&self, span: Span, text: &str) -> Result<(), ViewError> {
        self.view.replace(span, text)
    }
}

impl<V: View> fmt::Debug for LiveView<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveView")
            .field("view", &self.view.id())
            .field("groups", &self.groups())
            .field("clickable", &self.clickable)
            .field("clear_selection", &self.clear_selection)
            .field("handlers", &self.handlers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::MemoryView;
    use crate::services::time_source::TestTimeSource;
    use serde_json::json;
    use std::cell::RefCell;
    use std::sync::Arc;

    fn live_view(text: &str) -> (LiveView<MemoryView>, Arc<TestTimeSource>) {
        let clock = TestTimeSource::shared();
        let options = LiveViewOptions::default().with_time_source(clock.clone());
        (LiveView::new(MemoryView::with_text(ViewId(1), text), options), clock)
    }

    fn recorder(
        log: &Rc<RefCell<Vec<String>>>,
        label: &str,
    ) -> impl Fn(&LiveRegion<MemoryView>, &mut LiveView<MemoryView>) -> anyhow::Result<()> {
        let log = Rc::clone(log);
        let label = label.to_string();
        move |_: &LiveRegion<MemoryView>, _: &mut LiveView<MemoryView>| -> anyhow::Result<()> {
            log.borrow_mut().push(label.clone());
            Ok(())
        }
    }

    #[test]
    fn test_add_regions_partitions_plain_and_live() {
        let (mut lv, _) = live_view("0123456789abcdef");
        let region = LiveRegion::new(2, 4);
        lv.add_regions(
            "links",
            vec![Span::new(8, 9).into(), region.clone().into()],
            &RegionStyle::new("comment"),
        );

        assert_eq!(lv.view().get_regions("links"), vec![Span::new(8, 9)]);
        let storage_key = region.storage_key().unwrap();
        assert!(storage_key.starts_with("links--"));
        assert!(storage_key.ends_with(&region.id()));
        assert_eq!(lv.view().get_regions(&storage_key), vec![Span::new(2, 4)]);
        assert_eq!(region.key().as_deref(), Some("links"));
        assert_eq!(lv.groups(), vec!["links"]);
    }

    #[test]
    fn test_get_regions_refreshes_live_regions() {
        let (mut lv, _) = live_view("0123456789");
        let region = LiveRegion::new(2, 4);
        lv.add_regions("g", vec![region.clone().into()], &RegionStyle::default());

        lv.insert(0, "xyz").unwrap();
        let regions = lv.get_regions("g").unwrap();
        assert_eq!(regions.len(), 1);
        assert!(regions[0].as_live().unwrap().ptr_eq(&region));
        assert_eq!(region.span(), Span::new(5, 7));
    }

    #[test]
    fn test_erase_regions_detaches() {
        let (mut lv, _) = live_view("0123456789");
        let region = LiveRegion::new(2, 4);
        lv.add_regions("g", vec![region.clone().into(), Span::new(0, 1).into()], &RegionStyle::default());
        let storage_key = region.storage_key().unwrap();

        lv.erase_regions("g");

        assert!(!region.is_attached());
        assert_eq!(region.key(), None);
        assert!(lv.view().get_regions(&storage_key).is_empty());
        assert!(lv.view().get_regions("g").is_empty());
        assert!(lv.groups().is_empty());
        assert_eq!(lv.view().marker_count(), 0);
    }

    #[test]
    fn test_region_moved_between_groups() {
        let (mut lv, _) = live_view("0123456789");
        let region = LiveRegion::new(2, 4);
        lv.add_regions("first", vec![region.clone().into()], &RegionStyle::default());
        let old_key = region.storage_key().unwrap();

        lv.add_regions("second", vec![region.clone().into()], &RegionStyle::default());

        assert!(lv.view().get_regions(&old_key).is_empty());
        assert_eq!(lv.groups(), vec!["second"]);
        assert_eq!(region.key().as_deref(), Some("second"));
    }

    #[test]
    fn test_unclickable_region_swallows_click() {
        let (mut lv, _) = live_view("0123456789");
        let log = Rc::new(RefCell::new(Vec::new()));
        let region = LiveRegion::new(2, 6).with_process(recorder(&log, "region")).with_clickable(false);
        lv.add_regions("g", vec![region.into()], &RegionStyle::default());
        let fallback_log = Rc::clone(&log);
        let fallback: ViewHandler<MemoryView> =
            Rc::new(move |_: &mut LiveView<MemoryView>| -> anyhow::Result<()> {
                fallback_log.borrow_mut().push("view".to_string());
                Ok(())
            });
        lv.set_handlers(Handlers {
            process: Some(fallback),
            ..Handlers::none()
        });

        lv.view().set_caret(3);
        lv.clicked().unwrap();

        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_not_clickable_view_still_clears_selection() {
        let (mut lv, _) = live_view("0123456789");
        let log = Rc::new(RefCell::new(Vec::new()));
        lv.add_regions(
            "g",
            vec![LiveRegion::new(0, 9).with_process(recorder(&log, "region")).into()],
            &RegionStyle::default(),
        );
        lv.clickable = false;

        lv.view().set_caret(3);
        lv.clicked().unwrap();

        assert!(log.borrow().is_empty());
        assert!(lv.sel().is_empty());
        assert_eq!(lv.last_click_time(), None);
    }

    #[test]
    fn test_selection_kept_when_clear_selection_disabled() {
        let (mut lv, _) = live_view("0123456789");
        lv.clear_selection = false;
        lv.view().set_caret(3);
        lv.clicked().unwrap();
        assert_eq!(lv.sel(), vec![Span::point(3)]);
    }

    #[test]
    fn test_missing_stored_span_is_fatal() {
        let (mut lv, _) = live_view("0123456789");
        let region = LiveRegion::new(2, 4);
        lv.add_regions("g", vec![region.clone().into()], &RegionStyle::default());
        lv.view().erase_regions(&region.storage_key().unwrap());

        lv.view().set_caret(3);
        let err = lv.clicked().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LiveError>(),
            Some(LiveError::RegionNotFound { .. })
        ));
    }

    #[test]
    fn test_handler_error_propagates_and_skips_rest() {
        let (mut lv, _) = live_view("0123456789");
        let log = Rc::new(RefCell::new(Vec::new()));
        let region = LiveRegion::new(0, 5)
            .with_pre_process(|_, _| anyhow::bail!("boom"))
            .with_process(recorder(&log, "process"));
        lv.add_regions("g", vec![region.into()], &RegionStyle::default());

        lv.view().set_caret(1);
        let err = lv.clicked().unwrap_err();

        assert_eq!(err.to_string(), "boom");
        assert!(log.borrow().is_empty());
        assert_eq!(lv.sel(), vec![Span::point(1)]);
    }

    #[test]
    fn test_region_handler_can_edit_view() {
        let (mut lv, _) = live_view("[+] item");
        let region = LiveRegion::new(0, 3).with_process(|region, live_view| {
            live_view.replace(region.span(), "[-]")?;
            Ok(())
        });
        lv.add_regions("toggle", vec![region.into()], &RegionStyle::default());

        lv.view().set_caret(1);
        lv.clicked().unwrap();

        assert_eq!(lv.view().text(), "[-] item");
    }

    #[test]
    fn test_apply_settings_without_defaults() {
        let (mut lv, _) = live_view("");
        lv.apply_settings(ApplySettings {
            use_defaults: false,
            ..ApplySettings::default()
        }
        .with("font_size", json!(12)));

        assert_eq!(lv.setting("font_size"), Some(json!(12)));
        assert_eq!(lv.setting("gutter"), None);

        lv.revert_settings();
        assert_eq!(lv.setting("font_size"), None);
    }

    #[test]
    fn test_apply_settings_records_first_value_only() {
        let (mut lv, _) = live_view("");
        lv.set_setting("gutter", json!(true));

        lv.apply_settings(ApplySettings::default());
        assert_eq!(lv.setting("gutter"), Some(json!(false)));
        assert_eq!(lv.setting("caret_style"), Some(json!("solid")));

        lv.apply_settings(ApplySettings::default().with("gutter", json!("wide")));
        assert_eq!(lv.setting("gutter"), Some(json!("wide")));

        lv.revert_settings();
        assert_eq!(lv.setting("gutter"), Some(json!(true)));
        assert_eq!(lv.setting("caret_style"), None);
    }

    #[test]
    fn test_reset_click_time() {
        let (mut lv, clock) = live_view("0123456789");
        lv.view().set_caret(3);
        lv.clicked().unwrap();
        assert_eq!(lv.last_click_time(), Some(clock.now()));

        lv.reset_click_time();
        assert_eq!(lv.last_click_time(), None);
    }
}

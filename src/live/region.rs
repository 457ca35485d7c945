use super::{resolve_storage_key, Handlers, LiveError, LiveView, RegionHandler};
use crate::host::{View, ViewId};
use crate::model::span::Span;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

struct RegionState<V: View> {
    span: Span,
    /// Group key the region was added under
    key: Option<String>,
    /// Unique key the region is stored under in the host
    storage_key: Option<String>,
    /// View the region was last attached to. Host handles do not own the buffer.
    view: Option<V>,
    clickable: bool,
    handlers: Handlers<RegionHandler<V>>,
}

/// A clickable span registered with a [`LiveView`].
///
/// `LiveRegion` is a shared handle: clones refer to the same region, so a
/// caller can keep one around after adding it to a view and observe the view
/// refreshing its bounds.
///
/// The bounds are only brought in line with the host after an explicit
/// [`refresh`](Self::refresh), a [`LiveView::get_regions`] call, or a click
/// on the region.
pub struct LiveRegion<V: View> {
    inner: Rc<RefCell<RegionState<V>>>,
}

impl<V: View> Clone for LiveRegion<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<V: View> LiveRegion<V> {
    pub fn new(a: usize, b: usize) -> Self {
        Self::from_span(Span::new(a, b))
    }

    pub fn from_span(span: Span) -> Self {
        let handlers = Handlers {
            pre_process: None,
            process: Some(Rc::new(log_click::<V>) as RegionHandler<V>),
            post_process: None,
        };
        Self {
            inner: Rc::new(RefCell::new(RegionState {
                span,
                key: None,
                storage_key: None,
                view: None,
                clickable: true,
                handlers,
            })),
        }
    }

    pub fn with_process<F>(self, handler: F) -> Self
    where
        F: Fn(&LiveRegion<V>, &mut LiveView<V>) -> anyhow::Result<()> + 'static,
    {
        self.inner.borrow_mut().handlers.process = Some(Rc::new(handler));
        self
    }

    pub fn with_pre_process<F>(self, handler: F) -> Self
    where
        F: Fn(&LiveRegion<V>, &mut LiveView<V>) -> anyhow::Result<()> + 'static,
    {
        self.inner.borrow_mut().handlers.pre_process = Some(Rc::new(handler));
        self
    }

    pub fn with_post_process<F>(self, handler: F) -> Self
    where
        F: Fn(&LiveRegion<V>, &mut LiveView<V>) -> anyhow::Result<()> + 'static,
    {
        self.inner.borrow_mut().handlers.post_process = Some(Rc::new(handler));
        self
    }

    pub fn with_clickable(self, clickable: bool) -> Self {
        self.set_clickable(clickable);
        self
    }

    pub fn handlers(&self) -> Handlers<RegionHandler<V>> {
        self.inner.borrow().handlers.clone()
    }

    pub fn set_handlers(&self, handlers: Handlers<RegionHandler<V>>) {
        self.inner.borrow_mut().handlers = handlers;
    }

    pub fn clickable(&self) -> bool {
        self.inner.borrow().clickable
    }

    pub fn set_clickable(&self, clickable: bool) {
        self.inner.borrow_mut().clickable = clickable;
    }

    /// Set the bounds in place. `b` defaults to `a`.
    pub fn set_span(&self, a: usize, b: Option<usize>, xpos: Option<f64>) -> Span {
        let mut state = self.inner.borrow_mut();
        state.span.a = a;
        state.span.b = b.unwrap_or(a);
        state.span.xpos = xpos;
        state.span
    }

    /// Adopt `span` wholesale
    pub fn set_region(&self, span: Span) -> Span {
        self.inner.borrow_mut().span = span;
        span
    }

    /// Identity string used to build unique storage keys. Not an equality key;
    /// use [`ptr_eq`](Self::ptr_eq) to compare regions.
    pub fn id(&self) -> String {
        format!("LiveRegion-{:p}", Rc::as_ptr(&self.inner))
    }

    pub fn ptr_eq(&self, other: &LiveRegion<V>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Re-read the bounds from the host.
    ///
    /// Does nothing for a detached region.
    pub fn refresh(&self) -> Result<Span, LiveError> {
        let (storage_key, view) = {
            let state = self.inner.borrow();
            match (&state.storage_key, &state.view) {
                (Some(key), Some(view)) => (key.clone(), view.clone()),
                _ => return Ok(state.span),
            }
        };
        let stored = resolve_storage_key(&view, &storage_key)?;
        Ok(self.update_bounds(stored))
    }

    /// Copy begin/end from a stored span, keeping the xpos hint
    pub(crate) fn update_bounds(&self, stored: Span) -> Span {
        let mut state = self.inner.borrow_mut();
        state.span.a = stored.begin();
        state.span.b = stored.end();
        state.span
    }

    pub(crate) fn attach(&self, key: &str, storage_key: String, view: V) {
        let mut state = self.inner.borrow_mut();
        state.key = Some(key.to_string());
        state.storage_key = Some(storage_key);
        state.view = Some(view);
    }

    pub(crate) fn detach(&self) {
        let mut state = self.inner.borrow_mut();
        state.key = None;
        state.storage_key = None;
    }

    /// Group key the region is attached under
    pub fn key(&self) -> Option<String> {
        self.inner.borrow().key.clone()
    }

    pub fn storage_key(&self) -> Option<String> {
        self.inner.borrow().storage_key.clone()
    }

    pub fn is_attached(&self) -> bool {
        self.inner.borrow().storage_key.is_some()
    }

    pub fn view(&self) -> Option<V> {
        self.inner.borrow().view.clone()
    }

    pub fn view_id(&self) -> Option<ViewId> {
        self.inner.borrow().view.as_ref().map(View::id)
    }

    pub fn span(&self) -> Span {
        self.inner.borrow().span
    }

    pub fn a(&self) -> usize {
        self.inner.borrow().span.a
    }

    pub fn set_a(&self, a: usize) {
        self.inner.borrow_mut().span.a = a;
    }

    pub fn b(&self) -> usize {
        self.inner.borrow().span.b
    }

    pub fn set_b(&self, b: usize) {
        self.inner.borrow_mut().span.b = b;
    }

    // Span queries

    pub fn xpos(&self) -> Option<f64> {
        self.inner.borrow().span.xpos
    }

    pub fn begin(&self) -> usize {
        self.span().begin()
    }

    pub fn end(&self) -> usize {
        self.span().end()
    }

    pub fn size(&self) -> usize {
        self.span().size()
    }

    pub fn is_empty(&self) -> bool {
        self.span().is_empty()
    }

    pub fn contains(&self, point: usize) -> bool {
        self.span().contains(point)
    }

    pub fn intersects(&self, other: &Span) -> bool {
        self.span().intersects(other)
    }
}

/// Default `process` handler: log what was clicked
fn log_click<V: View>(region: &LiveRegion<V>, live_view: &mut LiveView<V>) -> anyhow::Result<()> {
    let point = live_view.sel().first().map(Span::begin);
    let text = live_view.substr(region.span());
    tracing::info!("clicked live region {} at {:?}: {:?}", region, point, text);
    Ok(())
}

impl<V: View> fmt::Display for LiveRegion<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.span(), f)
    }
}

impl<V: View> fmt::Debug for LiveRegion<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("LiveRegion")
            .field("span", &state.span)
            .field("key", &state.key)
            .field("storage_key", &state.storage_key)
            .field("clickable", &state.clickable)
            .field("handlers", &state.handlers)
            .finish()
    }
}

impl<V: View> From<&LiveRegion<V>> for Span {
    fn from(region: &LiveRegion<V>) -> Self {
        region.span()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::MemoryView;
    use crate::model::style::RegionStyle;

    #[test]
    fn test_set_span_mutates_in_place() {
        let region: LiveRegion<MemoryView> = LiveRegion::new(1, 2);
        let alias = region.clone();

        region.set_span(4, Some(9), Some(3.0));
        assert_eq!(alias.span(), Span::new(4, 9).with_xpos(3.0));

        region.set_span(6, None, None);
        assert_eq!(alias.span(), Span::point(6));

        region.set_region(Span::new(0, 3));
        assert_eq!(alias.a(), 0);
        assert_eq!(alias.b(), 3);
    }

    #[test]
    fn test_accessors_proxy_to_span() {
        let region: LiveRegion<MemoryView> = LiveRegion::new(8, 3);
        assert_eq!(region.begin(), 3);
        assert_eq!(region.end(), 8);
        assert_eq!(region.size(), 5);
        assert!(region.contains(8));
        assert!(!region.is_empty());

        region.set_a(3);
        region.set_b(3);
        assert!(region.is_empty());
        assert_eq!(region.to_string(), "(3, 3)");
    }

    #[test]
    fn test_id_is_unique_per_region_not_per_handle() {
        let first: LiveRegion<MemoryView> = LiveRegion::new(0, 1);
        let second: LiveRegion<MemoryView> = LiveRegion::new(0, 1);
        assert_eq!(first.id(), first.clone().id());
        assert_ne!(first.id(), second.id());
        assert!(first.id().starts_with("LiveRegion-"));
        assert!(first.ptr_eq(&first.clone()));
        assert!(!first.ptr_eq(&second));
    }

    #[test]
    fn test_refresh_detached_is_noop() {
        let region: LiveRegion<MemoryView> = LiveRegion::new(2, 5);
        assert_eq!(region.refresh(), Ok(Span::new(2, 5)));
        assert!(!region.is_attached());
    }

    #[test]
    fn test_refresh_reads_stored_span() {
        let view = MemoryView::with_text(ViewId(1), "0123456789");
        let region: LiveRegion<MemoryView> = LiveRegion::new(2, 5);
        view.add_regions("g--x", &[region.span()], &RegionStyle::default());
        region.attach("g", "g--x".to_string(), view.clone());

        view.insert(0, "ab").unwrap();
        assert_eq!(region.span(), Span::new(2, 5));
        assert_eq!(region.refresh(), Ok(Span::new(4, 7)));
        assert_eq!(region.key().as_deref(), Some("g"));
        assert_eq!(region.view_id(), Some(ViewId(1)));
    }

    #[test]
    fn test_refresh_fails_when_stored_span_is_gone() {
        let view = MemoryView::with_text(ViewId(1), "0123456789");
        let region: LiveRegion<MemoryView> = LiveRegion::new(2, 5);
        region.attach("g", "g--gone".to_string(), view);

        assert_eq!(
            region.refresh(),
            Err(LiveError::RegionNotFound {
                key: "g--gone".to_string()
            })
        );
    }

    #[test]
    fn test_default_handlers_only_process() {
        let region: LiveRegion<MemoryView> = LiveRegion::new(0, 1);
        let handlers = region.handlers();
        assert!(handlers.pre_process.is_none());
        assert!(handlers.process.is_some());
        assert!(handlers.post_process.is_none());
    }
}

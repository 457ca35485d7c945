// LiveViewHarness - in-memory host, registry and manual clock for integration tests

use live_view::config::LiveViewConfig;
use live_view::host::memory::{MemoryHost, MemoryView};
use live_view::live::{LiveView, LiveViews};
use live_view::services::time_source::TestTimeSource;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

/// Shared log of handler invocations
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.0.borrow().iter().filter(|e| *e == entry).count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

pub struct LiveViewHarness {
    pub live_views: LiveViews<MemoryHost>,
    pub view: MemoryView,
    pub clock: Arc<TestTimeSource>,
    /// Records "view:pre", "view:process" and "view:post" for fallback handlers
    pub view_log: CallLog,
}

impl LiveViewHarness {
    pub fn new(text: &str) -> Self {
        Self::with_config(text, LiveViewConfig::default())
    }

    pub fn with_config(text: &str, config: LiveViewConfig) -> Self {
        let clock = TestTimeSource::shared();
        let mut live_views = LiveViews::new(MemoryHost::new(), config);
        let view = live_views.host().open_with_text(text);
        let view_log = CallLog::new();

        let (pre, process, post) = (view_log.clone(), view_log.clone(), view_log.clone());
        let options = live_views
            .options()
            .with_time_source(clock.clone())
            .with_pre_process(move |_| {
                pre.push("view:pre");
                Ok(())
            })
            .with_process(move |_| {
                process.push("view:process");
                Ok(())
            })
            .with_post_process(move |_| {
                post.push("view:post");
                Ok(())
            });
        live_views.get_or_create(Some(&view), options);

        Self {
            live_views,
            view,
            clock,
            view_log,
        }
    }

    pub fn live_view(&mut self) -> &mut LiveView<MemoryView> {
        self.live_views
            .get_mut(&self.view)
            .expect("harness view is registered")
    }

    /// Advance the clock past the debounce window, place a caret and fire a
    /// selection event
    pub fn click(&mut self, point: usize) -> anyhow::Result<()> {
        self.advance(Duration::from_millis(500));
        self.click_now(point)
    }

    /// Place a caret and fire a selection event without moving the clock
    pub fn click_now(&mut self, point: usize) -> anyhow::Result<()> {
        self.view.set_caret(point);
        self.live_views.on_selection_modified(&self.view)
    }

    pub fn advance(&self, by: Duration) {
        self.clock.advance(by);
    }
}

//! In-memory host
//!
//! A complete [`View`]/[`Host`] implementation over a `String` buffer. Stored
//! regions are anchored with markers so they drift with edits the way a real
//! editor's regions do: text inserted at a region's start lands before it,
//! text inserted at its end lands after it.

use super::{Host, View, ViewError, ViewId};
use crate::model::marker::{MarkerId, MarkerList};
use crate::model::span::Span;
use crate::model::style::{NewFileFlags, RegionStyle};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone)]
struct Anchor {
    start: MarkerId,
    end: MarkerId,
    xpos: Option<f64>,
}

#[derive(Debug, Clone)]
struct StoredRegions {
    style: RegionStyle,
    anchors: Vec<Anchor>,
}

#[derive(Debug, Default)]
struct ViewState {
    name: String,
    syntax: String,
    flags: NewFileFlags,
    text: String,
    selection: Vec<Span>,
    settings: HashMap<String, Value>,
    read_only: bool,
    scratch: bool,
    markers: MarkerList,
    regions: HashMap<String, StoredRegions>,
}

impl ViewState {
    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_offset(&self, point: usize) -> usize {
        self.text
            .char_indices()
            .nth(point)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn resolve(&self, anchor: &Anchor) -> Span {
        let start = self.markers.get_position(anchor.start).unwrap_or(0);
        let end = self.markers.get_position(anchor.end).unwrap_or(0);
        debug_assert!(start <= end, "inverted anchor: {start} > {end}");
        Span {
            a: start,
            b: end,
            xpos: anchor.xpos,
        }
    }

    /// A region erased down to nothing and then typed into at that spot has
    /// its right-affine start pushed past its left-affine end. Collapse such
    /// anchors onto their end so the region stays empty before the new text.
    fn collapse_inverted_anchors(&mut self) {
        let ViewState {
            markers, regions, ..
        } = self;
        for anchor in regions.values().flat_map(|stored| stored.anchors.iter()) {
            let start = markers.get_position(anchor.start);
            let end = markers.get_position(anchor.end);
            if let (Some(start), Some(end)) = (start, end) {
                if start > end {
                    markers.set_position(anchor.start, end);
                }
            }
        }
    }

    fn drop_regions(&mut self, key: &str) {
        if let Some(stored) = self.regions.remove(key) {
            for anchor in stored.anchors {
                self.markers.delete(anchor.start);
                self.markers.delete(anchor.end);
            }
        }
    }

    fn check_bounds(&self, id: ViewId, offset: usize) -> Result<(), ViewError> {
        let size = self.char_len();
        if offset > size {
            return Err(ViewError::OutOfBounds {
                view: id,
                offset,
                size,
            });
        }
        Ok(())
    }
}

/// Cheaply clonable handle to an in-memory buffer view
#[derive(Debug, Clone)]
pub struct MemoryView {
    id: ViewId,
    state: Rc<RefCell<ViewState>>,
}

impl MemoryView {
    pub fn new(id: ViewId) -> Self {
        Self {
            id,
            state: Rc::new(RefCell::new(ViewState::default())),
        }
    }

    pub fn with_text(id: ViewId, text: &str) -> Self {
        let view = Self::new(id);
        view.state.borrow_mut().text = text.to_string();
        view
    }

    /// Full buffer contents
    pub fn text(&self) -> String {
        self.state.borrow().text.clone()
    }

    pub fn syntax(&self) -> String {
        self.state.borrow().syntax.clone()
    }

    pub fn flags(&self) -> NewFileFlags {
        self.state.borrow().flags
    }

    /// Keys that currently have stored regions, sorted
    pub fn region_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.state.borrow().regions.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Style the regions under `key` were stored with
    pub fn region_style(&self, key: &str) -> Option<RegionStyle> {
        self.state
            .borrow()
            .regions
            .get(key)
            .map(|stored| stored.style.clone())
    }

    /// Number of live markers backing stored regions
    pub fn marker_count(&self) -> usize {
        self.state.borrow().markers.len()
    }

    /// Replace the selection with a single caret at `point`
    pub fn set_caret(&self, point: usize) {
        let mut state = self.state.borrow_mut();
        state.selection.clear();
        state.selection.push(Span::point(point));
    }
}

impl View for MemoryView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn name(&self) -> String {
        self.state.borrow().name.clone()
    }

    fn set_name(&self, name: &str) {
        self.state.borrow_mut().name = name.to_string();
    }

    fn size(&self) -> usize {
        self.state.borrow().char_len()
    }

    fn substr(&self, span: Span) -> String {
        let state = self.state.borrow();
        let size = state.char_len();
        let begin = span.begin().min(size);
        let end = span.end().min(size);
        state.text.chars().skip(begin).take(end - begin).collect()
    }

    fn sel(&self) -> Vec<Span> {
        self.state.borrow().selection.clone()
    }

    fn add_sel(&self, span: Span) {
        self.state.borrow_mut().selection.push(span);
    }

    fn clear_sel(&self) {
        self.state.borrow_mut().selection.clear();
    }

    fn setting(&self, name: &str) -> Option<Value> {
        self.state.borrow().settings.get(name).cloned()
    }

    fn set_setting(&self, name: &str, value: Value) {
        self.state
            .borrow_mut()
            .settings
            .insert(name.to_string(), value);
    }

    fn erase_setting(&self, name: &str) {
        self.state.borrow_mut().settings.remove(name);
    }

    fn is_read_only(&self) -> bool {
        self.state.borrow().read_only
    }

    fn set_read_only(&self, read_only: bool) {
        self.state.borrow_mut().read_only = read_only;
    }

    fn is_scratch(&self) -> bool {
        self.state.borrow().scratch
    }

    fn set_scratch(&self, scratch: bool) {
        self.state.borrow_mut().scratch = scratch;
    }

    fn add_regions(&self, key: &str, spans: &[Span], style: &RegionStyle) {
        let mut state = self.state.borrow_mut();
        state.drop_regions(key);
        if spans.is_empty() {
            return;
        }
        let anchors = spans
            .iter()
            .map(|span| {
                // Empty spans keep both markers together so they never invert
                let start_left = span.is_empty();
                Anchor {
                    start: state.markers.create(span.begin(), start_left),
                    end: state.markers.create(span.end(), true),
                    xpos: span.xpos,
                }
            })
            .collect();
        state.regions.insert(
            key.to_string(),
            StoredRegions {
                style: style.clone(),
                anchors,
            },
        );
        tracing::trace!("{}: stored {} region(s) under {:?}", self.id, spans.len(), key);
    }

    fn get_regions(&self, key: &str) -> Vec<Span> {
        let state = self.state.borrow();
        state
            .regions
            .get(key)
            .map(|stored| stored.anchors.iter().map(|a| state.resolve(a)).collect())
            .unwrap_or_default()
    }

    fn erase_regions(&self, key: &str) {
        self.state.borrow_mut().drop_regions(key);
    }

    fn insert(&self, point: usize, text: &str) -> Result<usize, ViewError> {
        let mut state = self.state.borrow_mut();
        if state.read_only {
            tracing::warn!("rejected insert into read-only {}", self.id);
            return Err(ViewError::ReadOnly(self.id));
        }
        state.check_bounds(self.id, point)?;
        let byte = state.byte_offset(point);
        state.text.insert_str(byte, text);
        let len = text.chars().count();
        state.markers.adjust_for_insert(point, len);
        state.collapse_inverted_anchors();
        Ok(len)
    }

    fn erase(&self, span: Span) -> Result<(), ViewError> {
        let mut state = self.state.borrow_mut();
        if state.read_only {
            tracing::warn!("rejected erase in read-only {}", self.id);
            return Err(ViewError::ReadOnly(self.id));
        }
        state.check_bounds(self.id, span.end())?;
        let start = state.byte_offset(span.begin());
        let end = state.byte_offset(span.end());
        state.text.replace_range(start..end, "");
        state.markers.adjust_for_delete(span.begin(), span.size());
        Ok(())
    }

    fn replace(&self, span: Span, text: &str) -> Result<(), ViewError> {
        let mut state = self.state.borrow_mut();
        if state.read_only {
            tracing::warn!("rejected replace in read-only {}", self.id);
            return Err(ViewError::ReadOnly(self.id));
        }
        state.check_bounds(self.id, span.end())?;
        let start = state.byte_offset(span.begin());
        let end = state.byte_offset(span.end());
        state.text.replace_range(start..end, text);
        state
            .markers
            .adjust_for_replace(span.begin(), span.size(), text.chars().count());
        state.collapse_inverted_anchors();
        Ok(())
    }
}

/// Host that opens [`MemoryView`]s with increasing ids
#[derive(Debug, Default)]
pub struct MemoryHost {
    next_id: Cell<u64>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(1),
        }
    }

    /// Open a new view already holding `text`
    pub fn open_with_text(&self, text: &str) -> MemoryView {
        let view = self.new_file(NewFileFlags::empty(), "");
        view.state.borrow_mut().text = text.to_string();
        view
    }
}

impl Host for MemoryHost {
    type View = MemoryView;

    fn new_file(&self, flags: NewFileFlags, syntax: &str) -> MemoryView {
        let id = self.next_id.get().max(1);
        self.next_id.set(id + 1);
        let view = MemoryView::new(ViewId(id));
        {
            let mut state = view.state.borrow_mut();
            state.flags = flags;
            state.syntax = syntax.to_string();
        }
        tracing::debug!("opened {} (syntax {:?})", view.id, syntax);
        view
    }
}

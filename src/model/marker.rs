//! Content-anchored positions
//!
//! A marker is a position that follows the text around it as the buffer is
//! edited. Each marker has an affinity deciding what happens when text is
//! inserted exactly at its position: a left-affine marker stays put (the new
//! text ends up after it), a right-affine marker moves past the new text.

use std::collections::HashMap;

/// Opaque marker handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

#[derive(Debug, Clone, Copy)]
struct Marker {
    position: usize,
    left_affinity: bool,
}

/// All markers of one buffer
#[derive(Debug, Clone, Default)]
pub struct MarkerList {
    markers: HashMap<MarkerId, Marker>,
    next_id: u64,
}

impl MarkerList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a marker at `position`
    pub fn create(&mut self, position: usize, left_affinity: bool) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        self.markers.insert(
            id,
            Marker {
                position,
                left_affinity,
            },
        );
        id
    }

    pub fn get_position(&self, id: MarkerId) -> Option<usize> {
        self.markers.get(&id).map(|m| m.position)
    }

    /// Remove a marker. Returns false if it did not exist.
    pub fn delete(&mut self, id: MarkerId) -> bool {
        self.markers.remove(&id).is_some()
    }

    /// Shift markers for `len` characters inserted at `position`
    pub fn adjust_for_insert(&mut self, position: usize, len: usize) {
        if len == 0 {
            return;
        }
        for marker in self.markers.values_mut() {
            let moves = marker.position > position
                || (marker.position == position && !marker.left_affinity);
            if moves {
                marker.position += len;
            }
        }
    }

    /// Shift markers for `len` characters deleted starting at `position`.
    ///
    /// Markers inside the deleted range collapse onto `position`.
    pub fn adjust_for_delete(&mut self, position: usize, len: usize) {
        if len == 0 {
            return;
        }
        let end = position + len;
        for marker in self.markers.values_mut() {
            if marker.position >= end {
                marker.position -= len;
            } else if marker.position > position {
                marker.position = position;
            }
        }
    }

    /// Shift markers for `old_len` characters at `position` replaced by
    /// `new_len` characters.
    ///
    /// Markers inside the replaced range land on the side of the new text
    /// their affinity points to: left-affine markers after it, right-affine
    /// markers before it. A span anchored right-affine at its start and
    /// left-affine at its end therefore covers the replacement text.
    pub fn adjust_for_replace(&mut self, position: usize, old_len: usize, new_len: usize) {
        if old_len == 0 {
            self.adjust_for_insert(position, new_len);
            return;
        }
        let end = position + old_len;
        for marker in self.markers.values_mut() {
            if marker.position >= end {
                marker.position = marker.position - old_len + new_len;
            } else if marker.position > position {
                marker.position = if marker.left_affinity {
                    position + new_len
                } else {
                    position
                };
            }
        }
    }

    /// Move a marker to `position`. Returns false if it did not exist.
    pub fn set_position(&mut self, id: MarkerId, position: usize) -> bool {
        match self.markers.get_mut(&id) {
            Some(marker) => {
                marker.position = position;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_respects_affinity() {
        let mut list = MarkerList::new();
        let left = list.create(5, true);
        let right = list.create(5, false);
        let before = list.create(2, true);

        list.adjust_for_insert(5, 3);

        assert_eq!(list.get_position(left), Some(5));
        assert_eq!(list.get_position(right), Some(8));
        assert_eq!(list.get_position(before), Some(2));
    }

    #[test]
    fn test_delete_collapses_markers_in_range() {
        let mut list = MarkerList::new();
        let inside = list.create(6, false);
        let after = list.create(12, false);
        let at_start = list.create(4, true);

        list.adjust_for_delete(4, 5);

        assert_eq!(list.get_position(inside), Some(4));
        assert_eq!(list.get_position(after), Some(7));
        assert_eq!(list.get_position(at_start), Some(4));
    }

    #[test]
    fn test_replace_keeps_span_around_new_text() {
        let mut list = MarkerList::new();
        let start = list.create(2, false);
        let end = list.create(5, true);
        let inside_right = list.create(3, false);
        let inside_left = list.create(4, true);
        let after = list.create(9, false);

        list.adjust_for_replace(2, 3, 5);

        assert_eq!(list.get_position(start), Some(2));
        assert_eq!(list.get_position(end), Some(7));
        assert_eq!(list.get_position(inside_right), Some(2));
        assert_eq!(list.get_position(inside_left), Some(7));
        assert_eq!(list.get_position(after), Some(11));
    }

    #[test]
    fn test_replace_of_empty_range_is_an_insert() {
        let mut list = MarkerList::new();
        let left = list.create(4, true);
        let right = list.create(4, false);

        list.adjust_for_replace(4, 0, 2);

        assert_eq!(list.get_position(left), Some(4));
        assert_eq!(list.get_position(right), Some(6));
    }

    #[test]
    fn test_set_position() {
        let mut list = MarkerList::new();
        let id = list.create(3, true);
        assert!(list.set_position(id, 1));
        assert_eq!(list.get_position(id), Some(1));
        list.delete(id);
        assert!(!list.set_position(id, 0));
    }

    #[test]
    fn test_delete_marker() {
        let mut list = MarkerList::new();
        let id = list.create(0, true);
        assert_eq!(list.len(), 1);
        assert!(list.delete(id));
        assert!(!list.delete(id));
        assert!(list.is_empty());
        assert_eq!(list.get_position(id), None);
    }
}

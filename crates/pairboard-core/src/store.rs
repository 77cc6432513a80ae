//! Element store and undo/redo history.
//!
//! The store owns the ordered element collection for one whiteboard
//! session. Callers never touch the underlying vector directly;
//! mutation goes through the operations here so history snapshots
//! cannot be bypassed. All operations are synchronous and infallible —
//! mutations against an unknown id are ignored rather than erroring,
//! which keeps stale remote references harmless.

use crate::elements::{Element, ElementId};
use kurbo::Point;

/// Maximum number of history snapshots to keep.
const MAX_HISTORY: usize = 50;

/// Ordered collection of elements plus linear undo/redo history.
///
/// History entries are full snapshots. In-progress gestures mutate
/// elements without touching history; the input state machine calls
/// [`ElementStore::commit`] once per finished gesture, coalescing the
/// intermediate updates into a single undo step.
#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    /// Elements in draw order (index order = z-order).
    elements: Vec<Element>,
    /// Snapshot stack.
    history: Vec<Vec<Element>>,
    /// History entry matching the live collection, or `None` when the
    /// canvas has been undone past the earliest entry.
    cursor: Option<usize>,
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elements in draw order (back to front).
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    /// Append a new element. Does not record history: the caller
    /// commits once the creating gesture finishes.
    pub fn add(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Mutate an element in place. Unknown ids are a silent no-op.
    pub fn update(&mut self, id: ElementId, mutate: impl FnOnce(&mut Element)) {
        if let Some(element) = self.elements.iter_mut().find(|e| e.id() == id) {
            mutate(element);
        }
    }

    /// Add-or-replace by id. A replaced element keeps its position in
    /// draw order; a new element is appended on top.
    pub fn upsert(&mut self, element: Element) {
        match self
            .elements
            .iter_mut()
            .find(|e| e.id() == element.id())
        {
            Some(existing) => *existing = element,
            None => self.elements.push(element),
        }
    }

    /// Topmost element under a world-space point, with the hit position.
    pub fn element_at(
        &self,
        point: Point,
    ) -> Option<(&Element, crate::geometry::HitPosition)> {
        crate::geometry::element_at_point(&self.elements, point)
    }

    /// Push the current collection onto the history stack, discarding
    /// any redo branch beyond the cursor.
    pub fn commit(&mut self) {
        match self.cursor {
            Some(i) => self.history.truncate(i + 1),
            None => self.history.clear(),
        }
        self.history.push(self.elements.clone());
        if self.history.len() > MAX_HISTORY {
            self.history.remove(0);
        }
        self.cursor = Some(self.history.len() - 1);
    }

    /// Step back one history entry. Undoing at the earliest entry
    /// clears the canvas instead of erroring.
    pub fn undo(&mut self) {
        match self.cursor {
            Some(i) if i > 0 => {
                self.cursor = Some(i - 1);
                self.elements = self.history[i - 1].clone();
            }
            Some(_) => {
                self.cursor = None;
                self.elements.clear();
            }
            None => {}
        }
    }

    /// Step forward one history entry, if an undone entry remains.
    pub fn redo(&mut self) {
        let next = self.cursor.map_or(0, |i| i + 1);
        if next < self.history.len() {
            self.elements = self.history[next].clone();
            self.cursor = Some(next);
        }
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.map_or(0, |i| i + 1) < self.history.len()
    }

    /// Empty the collection and commit the empty state as a history
    /// entry, so the clear itself is undoable.
    pub fn clear_all(&mut self) {
        self.elements.clear();
        self.commit();
    }

    /// Drop elements and history wholesale. Used when a remote peer
    /// clears the board: the local redo branch would resurrect
    /// elements the peer no longer has.
    pub fn reset(&mut self) {
        self.elements.clear();
        self.history.clear();
        self.cursor = None;
    }
}

//! Document - Element tree the sparkle effect decorates.
//!
//! A small arena of elements addressed by [`ElementId`]:
//! - Generational ids, so a stale id never resolves to a recycled slot
//! - Free slot pool for O(1) reuse
//! - Parent/children links in document order
//! - Class list and optional id for the selector contract
//!
//! Particles live in the tree like any other element (class
//! `sparkle-particle`, mounted inside a wrapper container) and carry their
//! [`Particle`] payload in place of inline style.

use std::fmt;

use crate::particle::Particle;
use crate::types::Rect;

// =============================================================================
// Selector Contract
// =============================================================================

/// Class marking an element for decoration.
pub const TARGET_CLASS: &str = "gold-sparkle";

/// Class of the wrapper inserted around each target.
pub const CONTAINER_CLASS: &str = "gold-sparkle-container";

/// Class of every particle element.
pub const PARTICLE_CLASS: &str = "sparkle-particle";

/// Id of the intro overlay whose presence delays the first burst.
pub const INTRO_OVERLAY_ID: &str = "wedding-overlay";

/// How long the intro overlay takes to open, in milliseconds.
pub const INTRO_DURATION_MS: u64 = 2000;

// =============================================================================
// ElementId
// =============================================================================

/// Handle to an element. Stays invalid once the element is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId {
    index: u32,
    generation: u32,
}

impl ElementId {
    /// Slot index (for diagnostics).
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

// =============================================================================
// Element
// =============================================================================

/// A node in the document.
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub text: Option<String>,
    /// Layout box in logical pixels.
    pub rect: Rect,
    /// Set on particle elements only.
    pub particle: Option<Particle>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }
}

struct Slot {
    generation: u32,
    element: Option<Element>,
}

// =============================================================================
// Document
// =============================================================================

/// Arena-backed element tree with a single root (`body`).
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: ElementId,
}

impl Document {
    /// Create a document holding only an empty `body`.
    pub fn new() -> Self {
        let mut doc = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: ElementId {
                index: 0,
                generation: 0,
            },
        };
        doc.root = doc.allocate(Element::new("body"));
        doc
    }

    /// The `body` element.
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Number of live elements, root included.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.element.is_some()).count()
    }

    /// Always false: the root is never removed.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `id` refers to a live element.
    pub fn exists(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Whether `id` is live and attached under the root.
    pub fn contains(&self, id: ElementId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == self.root {
                return true;
            }
            cursor = self.get(current).and_then(|e| e.parent);
        }
        false
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.element.as_ref()
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.element.as_mut()
    }

    // =========================================================================
    // Tree Mutation
    // =========================================================================

    /// Create a detached element.
    pub fn create_element(&mut self, element: Element) -> ElementId {
        let mut element = element;
        element.parent = None;
        element.children.clear();
        self.allocate(element)
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    ///
    /// Returns false if either id is stale or the move would create a cycle.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> bool {
        if !self.can_adopt(parent, child) {
            return false;
        }
        self.detach(child);
        if let Some(p) = self.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.get_mut(child) {
            c.parent = Some(parent);
        }
        true
    }

    /// Insert `child` right before `reference` under the reference's parent.
    pub fn insert_before(&mut self, reference: ElementId, child: ElementId) -> bool {
        let Some(parent) = self.get(reference).and_then(|e| e.parent) else {
            return false;
        };
        if !self.can_adopt(parent, child) || child == reference {
            return false;
        }
        self.detach(child);

        let Some(p) = self.get_mut(parent) else {
            return false;
        };
        let position = p
            .children
            .iter()
            .position(|&c| c == reference)
            .unwrap_or(p.children.len());
        p.children.insert(position, child);

        if let Some(c) = self.get_mut(child) {
            c.parent = Some(parent);
        }
        true
    }

    /// Detach `id` and free it with its whole subtree.
    ///
    /// Stale ids and the root are ignored. Returns true if anything was removed.
    pub fn remove(&mut self, id: ElementId) -> bool {
        if id == self.root || !self.exists(id) {
            return false;
        }
        self.detach(id);

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let slot = &mut self.slots[current.index as usize];
            if let Some(element) = slot.element.take() {
                stack.extend(element.children);
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index);
            }
        }
        true
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.get(id).and_then(|e| e.parent)
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.get(id).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.get(id).is_some_and(|e| e.has_class(class))
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if let Some(e) = self.get_mut(id) {
            if !e.has_class(class) {
                e.classes.push(class.to_string());
            }
        }
    }

    /// Layout box of `id`, or None for a stale id.
    pub fn bounding_rect(&self, id: ElementId) -> Option<Rect> {
        self.get(id).map(|e| e.rect)
    }

    pub fn set_rect(&mut self, id: ElementId, rect: Rect) {
        if let Some(e) = self.get_mut(id) {
            e.rect = rect;
        }
    }

    /// All attached elements carrying `class`, in document order.
    pub fn query_by_class(&self, class: &str) -> Vec<ElementId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&id| self.has_class(id, class))
            .collect()
    }

    /// Number of attached elements carrying `class`.
    pub fn count_by_class(&self, class: &str) -> usize {
        self.query_by_class(class).len()
    }

    /// First attached element whose id is `id`.
    pub fn get_element_by_id(&self, id: &str) -> Option<ElementId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&e| self.get(e).and_then(|el| el.id.as_deref()) == Some(id))
    }

    /// `start` and everything below it, depth-first pre-order.
    pub fn descendants(&self, start: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            let Some(element) = self.get(current) else {
                continue;
            };
            out.push(current);
            stack.extend(element.children.iter().rev().copied());
        }
        out
    }

    // =========================================================================
    // Wrapping
    // =========================================================================

    /// Put `target` inside a `span.gold-sparkle-container`.
    ///
    /// If the target's parent already is such a container, nothing changes
    /// and the existing container is returned. Returns None for a stale or
    /// detached target.
    pub fn wrap_element(&mut self, target: ElementId) -> Option<ElementId> {
        let parent = self.parent(target)?;
        if self.has_class(parent, CONTAINER_CLASS) {
            return Some(parent);
        }

        let rect = self.bounding_rect(target)?;
        let container = self.create_element(
            Element::new("span")
                .with_class(CONTAINER_CLASS)
                .with_rect(rect),
        );
        self.insert_before(target, container);
        self.append_child(container, target);
        Some(container)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn allocate(&mut self, element: Element) -> ElementId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.element = Some(element);
            return ElementId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            element: Some(element),
        });
        ElementId {
            index,
            generation: 0,
        }
    }

    fn detach(&mut self, id: ElementId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|&c| c != id);
        }
        if let Some(e) = self.get_mut(id) {
            e.parent = None;
        }
    }

    /// `parent` may take `child` if both are live and `child` is not an
    /// ancestor of (or equal to) `parent`.
    fn can_adopt(&self, parent: ElementId, child: ElementId) -> bool {
        if !self.exists(parent) || !self.exists(child) || child == self.root {
            return false;
        }
        let mut cursor = Some(parent);
        while let Some(current) = cursor {
            if current == child {
                return false;
            }
            cursor = self.parent(current);
        }
        true
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

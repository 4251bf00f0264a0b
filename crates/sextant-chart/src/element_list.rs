//! Z-ordered element storage.
//!
//! Elements are kept bottom-up by `(z, insertion sequence)`. Changing a z
//! position only marks the list unsorted; the next ordered traversal re-sorts.
//! Elements with equal z keep their insertion order, so the element added
//! last is painted last and hit first.

use crate::element::{Element, ElementId};

#[derive(Debug, Default)]
pub struct ElementList {
    elements: Vec<Element>,
    next_id: u32,
    next_sequence: u64,
    unsorted: bool,
}

impl ElementList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element and return its id.
    pub fn insert(&mut self, mut element: Element) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        element.set_id(id);
        element.sequence = self.next_sequence;
        self.next_sequence += 1;
        self.elements.push(element);
        self.unsorted = true;
        id
    }

    /// Remove and return an element.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let index = self.position(id)?;
        // `remove` keeps the relative order of the rest intact.
        Some(self.elements.remove(index))
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Change an element's z position. Returns `false` for unknown ids.
    pub fn set_z(&mut self, id: ElementId, z: i32) -> bool {
        match self.get_mut(id) {
            Some(element) => {
                if element.z() != z {
                    element.set_z(z);
                    self.unsorted = true;
                }
                true
            }
            None => false,
        }
    }

    /// Move an element above everything else.
    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        let top = self.elements.iter().map(Element::z).max().unwrap_or(0);
        let Some(element) = self.get(id) else {
            return false;
        };
        let is_alone_on_top = element.z() == top
            && self
                .elements
                .iter()
                .filter(|e| e.z() == top)
                .count()
                == 1;
        if is_alone_on_top {
            return true;
        }
        self.set_z(id, top.saturating_add(1))
    }

    /// Re-sort if any z position changed since the last sort.
    pub fn resort(&mut self) {
        if !self.unsorted {
            return;
        }
        self.elements.sort_by_key(|e| (e.z(), e.sequence));
        self.unsorted = false;
        tracing::debug!(count = self.elements.len(), "element list re-sorted");
    }

    /// Elements lowest z first (paint order).
    pub fn bottom_up(&mut self) -> impl DoubleEndedIterator<Item = &Element> {
        self.resort();
        self.elements.iter()
    }

    pub fn bottom_up_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut Element> {
        self.resort();
        self.elements.iter_mut()
    }

    /// Elements highest z first (hit-test order).
    pub fn top_down(&mut self) -> impl Iterator<Item = &Element> {
        self.bottom_up().rev()
    }

    pub fn top_down_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.bottom_up_mut().rev()
    }

    /// Ids in hit-test order, for callers that mutate while walking.
    pub fn ids_top_down(&mut self) -> Vec<ElementId> {
        self.top_down().map(Element::id).collect()
    }

    /// Storage order, no sorting.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.elements.iter_mut()
    }

    fn position(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;
    use crate::text::TextLabel;

    fn label(text: &str, z: i32) -> Element {
        Element::new(ElementKind::Text(TextLabel::new(text))).with_z(z)
    }

    #[test]
    fn test_sorted_by_z() {
        let mut list = ElementList::new();
        let high = list.insert(label("high", 5));
        let low = list.insert(label("low", -1));
        let mid = list.insert(label("mid", 2));
        assert_eq!(list.ids_top_down(), vec![high, mid, low]);
    }

    #[test]
    fn test_equal_z_uses_insertion_order() {
        let mut list = ElementList::new();
        let a = list.insert(label("a", 1));
        let b = list.insert(label("b", 1));
        let c = list.insert(label("c", 1));
        let bottom_up: Vec<_> = list.bottom_up().map(Element::id).collect();
        assert_eq!(bottom_up, vec![a, b, c]);

        // Re-sorting after an unrelated change keeps the tie-break.
        list.set_z(b, 0);
        list.set_z(b, 1);
        let bottom_up: Vec<_> = list.bottom_up().map(Element::id).collect();
        assert_eq!(bottom_up, vec![a, b, c]);
    }

    #[test]
    fn test_bring_to_front_and_remove() {
        let mut list = ElementList::new();
        let a = list.insert(label("a", 0));
        let b = list.insert(label("b", 0));
        assert!(list.bring_to_front(a));
        assert_eq!(list.ids_top_down(), vec![a, b]);

        let removed = list.remove(a).unwrap();
        assert_eq!(removed.id(), a);
        assert!(!list.contains(a));
        assert!(list.remove(a).is_none());
        assert!(!list.set_z(a, 3));
        assert_eq!(list.len(), 1);
    }
}

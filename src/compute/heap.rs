//! Indexed binary min-heap with O(log n) priority updates.
//!
//! [`IndexedMinHeap`] is an array-backed binary heap over `(item, priority)`
//! pairs. Alongside the array it keeps an `item -> slot` table so that
//! membership checks are O(1) and [`IndexedMinHeap::change_priority`] can find
//! an item without scanning. The table is updated on every swap; for every
//! item present, `slots[item]` is the array index currently holding it.
//!
//! Items with equal priority come out in unspecified order.
//!
//! ```rust
//! use geonav::compute::heap::IndexedMinHeap;
//!
//! let mut heap = IndexedMinHeap::new();
//! heap.add("a", 5.0)?;
//! heap.add("b", 1.0)?;
//! heap.add("c", 3.0)?;
//!
//! assert_eq!(heap.remove_min()?, "b");
//! assert_eq!(heap.remove_min()?, "c");
//! assert_eq!(heap.remove_min()?, "a");
//! # Ok::<(), geonav::GeoNavError>(())
//! ```

use crate::error::{GeoNavError, Result};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::hash::Hash;

#[derive(Debug, Clone)]
struct HeapEntry<T> {
    item: T,
    priority: f64,
}

/// Binary min-heap keyed by item with decrease/increase-key support.
#[derive(Debug, Clone)]
pub struct IndexedMinHeap<T> {
    entries: Vec<HeapEntry<T>>,
    slots: FxHashMap<T, usize>,
}

impl<T> IndexedMinHeap<T>
where
    T: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            slots: FxHashMap::default(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = FxHashMap::default();
        slots.reserve(capacity);
        Self {
            entries: Vec::with_capacity(capacity),
            slots,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn contains(&self, item: &T) -> bool {
        self.slots.contains_key(item)
    }

    /// Current priority of `item`, if present.
    pub fn priority(&self, item: &T) -> Option<f64> {
        self.slots.get(item).map(|&slot| self.entries[slot].priority)
    }

    /// Insert `item` with `priority`.
    ///
    /// # Errors
    ///
    /// [`GeoNavError::DuplicateItem`] if `item` is already in the heap.
    pub fn add(&mut self, item: T, priority: f64) -> Result<()> {
        if self.contains(&item) {
            return Err(GeoNavError::DuplicateItem);
        }

        let slot = self.entries.len();
        self.slots.insert(item.clone(), slot);
        self.entries.push(HeapEntry { item, priority });
        self.float_up(slot);
        Ok(())
    }

    /// The minimum-priority item, without removing it.
    ///
    /// # Errors
    ///
    /// [`GeoNavError::Empty`] if the heap has no items.
    pub fn peek_min(&self) -> Result<&T> {
        self.entries
            .first()
            .map(|entry| &entry.item)
            .ok_or(GeoNavError::Empty)
    }

    /// Remove and return the minimum-priority item.
    ///
    /// # Errors
    ///
    /// [`GeoNavError::Empty`] if the heap has no items.
    pub fn remove_min(&mut self) -> Result<T> {
        if self.entries.is_empty() {
            return Err(GeoNavError::Empty);
        }

        let last = self.entries.len() - 1;
        self.swap(0, last);
        let HeapEntry { item, .. } = self.entries.pop().ok_or(GeoNavError::Empty)?;
        self.slots.remove(&item);

        if !self.entries.is_empty() {
            self.sink_down(0);
        }

        Ok(item)
    }

    /// Set a new priority for `item` and restore heap order.
    ///
    /// # Errors
    ///
    /// [`GeoNavError::NotFound`] if `item` is not in the heap.
    pub fn change_priority(&mut self, item: &T, priority: f64) -> Result<()> {
        let slot = *self.slots.get(item).ok_or(GeoNavError::NotFound)?;
        let previous = std::mem::replace(&mut self.entries[slot].priority, priority);

        match priority.total_cmp(&previous) {
            Ordering::Less => self.float_up(slot),
            Ordering::Greater => self.sink_down(slot),
            Ordering::Equal => {}
        }
        Ok(())
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.slots.clear();
    }

    #[inline]
    fn less(&self, a: usize, b: usize) -> bool {
        self.entries[a]
            .priority
            .total_cmp(&self.entries[b].priority)
            .is_lt()
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.entries.swap(a, b);
        if let Some(slot) = self.slots.get_mut(&self.entries[a].item) {
            *slot = a;
        }
        if let Some(slot) = self.slots.get_mut(&self.entries[b].item) {
            *slot = b;
        }
    }

    fn float_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if !self.less(slot, parent) {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
    }

    fn sink_down(&mut self, mut slot: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * slot + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let smaller = if right < len && self.less(right, left) {
                right
            } else {
                left
            };

            if !self.less(smaller, slot) {
                break;
            }
            self.swap(slot, smaller);
            slot = smaller;
        }
    }

    /// Check the heap-order and slot-table invariants. Test helper.
    #[cfg(test)]
    fn assert_invariants(&self) {
        assert_eq!(self.entries.len(), self.slots.len());
        for (idx, entry) in self.entries.iter().enumerate() {
            assert_eq!(self.slots.get(&entry.item), Some(&idx));
            if idx > 0 {
                let parent = (idx - 1) / 2;
                assert!(self.entries[parent].priority <= entry.priority);
            }
        }
    }
}

impl<T> Default for IndexedMinHeap<T>
where
    T: Clone + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

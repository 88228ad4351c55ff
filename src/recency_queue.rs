//! A [RecencyQueue] orders items from least recently touched (the head) to most recently touched (the tail).
//!
//! This is implemented as a vec-backed linked list plus an auxiliary hash-based index from item to slot, so that an
//! arbitrary item can be unlinked without walking the list.  Freed slots are chained into a free list and reused
//! before the vec grows.
use std::collections::HashMap;
use std::hash::Hash;

use ahash::RandomState;

struct OccupiedSlot<T> {
    item: T,
    prev: Option<usize>,
    next: Option<usize>,
}

struct EmptySlot {
    next_empty: Option<usize>,
}

enum Slot<T> {
    /// This slot is empty, possibly with a pointer at the next empty slot.
    Empty(EmptySlot),
    /// This slot is occupied, and doubly linked to its older and newer neighbours.
    Occupied(OccupiedSlot<T>),
}

pub struct RecencyQueue<T: Hash + Eq> {
    slots: Vec<Slot<T>>,
    /// Points at the slot holding the item.
    index: HashMap<T, usize, RandomState>,
    /// Least recently touched.
    head: Option<usize>,
    /// Most recently touched.
    tail: Option<usize>,
    empty_head: Option<usize>,
}

impl<T: Hash + Eq> RecencyQueue<T> {
    /// The linked node at `index`, which must not be on the free list.
    fn node(&self, index: usize) -> &OccupiedSlot<T> {
        match &self.slots[index] {
            Slot::Occupied(node) => node,
            Slot::Empty(_) => unreachable!("slot {} is linked but on the free list", index),
        }
    }

    fn node_mut(&mut self, index: usize) -> &mut OccupiedSlot<T> {
        match &mut self.slots[index] {
            Slot::Occupied(node) => node,
            Slot::Empty(_) => unreachable!("slot {} is linked but on the free list", index),
        }
    }
}

impl<T: Hash + Eq + Clone> Default for RecencyQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Hash + Eq + Clone> RecencyQueue<T> {
    pub fn new() -> RecencyQueue<T> {
        RecencyQueue {
            slots: Default::default(),
            index: Default::default(),
            head: None,
            tail: None,
            empty_head: None,
        }
    }

    pub fn with_capacity(capacity: usize) -> RecencyQueue<T> {
        RecencyQueue {
            slots: Vec::with_capacity(capacity),
            index: HashMap::with_capacity_and_hasher(capacity, Default::default()),
            head: None,
            tail: None,
            empty_head: None,
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.index.contains_key(item)
    }

    /// Entirely unlink an occupied slot from the list, patching up the head and tail as needed.
    fn unlink_index(&mut self, index: usize) {
        let (prev, next) = {
            let slot = self.node_mut(index);
            let links = (slot.prev, slot.next);
            slot.prev = None;
            slot.next = None;
            links
        };

        match prev {
            Some(p) => self.node_mut(p).next = next,
            None => self.head = next,
        }

        match next {
            Some(n) => self.node_mut(n).prev = prev,
            None => self.tail = prev,
        }
    }

    /// Link an occupied, currently unlinked slot in as the most recent item.
    fn link_at_tail(&mut self, index: usize) {
        let old_tail = self.tail;
        self.node_mut(index).prev = old_tail;
        match old_tail {
            Some(t) => self.node_mut(t).next = Some(index),
            // The list was empty, so this is also the head.
            None => self.head = Some(index),
        }
        self.tail = Some(index);
    }

    /// Find an available empty slot, or make one if necessary.
    fn find_empty(&mut self) -> usize {
        if let Some(e) = self.empty_head {
            self.empty_head = match &self.slots[e] {
                Slot::Empty(empty) => empty.next_empty,
                Slot::Occupied(_) => unreachable!("slot {} is on the free list but linked", e),
            };
            return e;
        }

        self.slots.push(Slot::Empty(EmptySlot { next_empty: None }));
        self.slots.len() - 1
    }

    /// Make a specific slot become empty, returning the item it held.  The caller owns the index entry.
    fn become_empty(&mut self, index: usize) -> T {
        self.unlink_index(index);
        let freed = Slot::Empty(EmptySlot {
            next_empty: self.empty_head.replace(index),
        });
        match std::mem::replace(&mut self.slots[index], freed) {
            Slot::Occupied(node) => node.item,
            Slot::Empty(_) => unreachable!("slot {} was freed twice", index),
        }
    }

    /// Append an item as the most recently touched.  Returns `false` without changing anything if it is already
    /// queued.
    pub fn push_tail(&mut self, item: T) -> bool {
        if self.index.contains_key(&item) {
            return false;
        }

        let ind = self.find_empty();
        self.slots[ind] = Slot::Occupied(OccupiedSlot {
            item: item.clone(),
            prev: None,
            next: None,
        });
        self.index.insert(item, ind);
        self.link_at_tail(ind);
        true
    }

    /// Remove and return the least recently touched item.
    pub fn pop_head(&mut self) -> Option<T> {
        let head = self.head?;
        let item = self.become_empty(head);
        self.index.remove(&item);
        Some(item)
    }

    /// Remove an arbitrary item, leaving the relative order of the rest alone.
    pub fn remove(&mut self, item: &T) -> bool {
        match self.index.remove(item) {
            Some(ind) => {
                self.become_empty(ind);
                true
            }
            None => false,
        }
    }

    /// Make an already queued item the most recently touched one.
    pub fn move_to_tail(&mut self, item: &T) -> bool {
        let ind = match self.index.get(item) {
            Some(&i) => i,
            None => return false,
        };

        if self.tail != Some(ind) {
            self.unlink_index(ind);
            self.link_at_tail(ind);
        }
        true
    }

    pub fn peek_head(&self) -> Option<&T> {
        self.head.map(|h| &self.node(h).item)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
        self.head = None;
        self.tail = None;
        self.empty_head = None;
    }

    /// Iterator visiting items from least to most recently touched.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let mut ind = self.head;
        std::iter::from_fn(move || {
            let next = ind?;
            let ret = self.node(next);
            ind = ret.next;
            Some(&ret.item)
        })
    }
}

impl<T: Hash + Eq + std::fmt::Debug> std::fmt::Debug for RecencyQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Walk the links directly; `iter` needs the `Clone` bound of the main impl block.
        let mut list = f.debug_list();
        let mut ind = self.head;
        while let Some(i) = ind {
            let slot = self.node(i);
            list.entry(&slot.item);
            ind = slot.next;
        }
        list.finish()
    }
}

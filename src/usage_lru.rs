//! A [UsageLru] tracks externally owned resources and releases the least recently used ones once it grows past its
//! configured minimum size.
//!
//! The cache never looks at the items themselves.  Callers add an item together with a callback that frees whatever
//! the item stands for, call [UsageLru::mark_used] on everything they touch during a work cycle, and then run an
//! eviction pass, usually through [UsageLru::schedule_unload] so that many marks in one cycle share a single pass.
//!
//! Eviction trusts the recency order rather than checking each popped item against the used set: items are moved to
//! the tail when marked, so the head of the order is where the unused items live.
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use ahash::RandomState;
use log::debug;

use crate::*;

/// Called exactly once with the item when it leaves the cache, either by [UsageLru::remove] or by eviction.
pub type ReleaseCallback<T> = Box<dyn FnMut(&T)>;

pub struct UsageLru<T: Hash + Eq + Clone> {
    config: CacheConfig,
    /// Every tracked item, and the callback that releases it.
    callbacks: HashMap<T, ReleaseCallback<T>, RandomState>,
    /// Items marked since the last [UsageLru::mark_all_unused].  Always a subset of `callbacks`.
    used: HashSet<T, RandomState>,
    order: RecencyQueue<T>,
    pub(crate) pending_unload: Option<PendingUnload>,
}

impl<T: Hash + Eq + Clone> UsageLru<T> {
    pub fn new(config: CacheConfig) -> Result<UsageLru<T>, ConfigError> {
        config.validate()?;
        Ok(UsageLru {
            config,
            callbacks: Default::default(),
            used: Default::default(),
            order: RecencyQueue::new(),
            pending_unload: None,
        })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.callbacks.contains_key(item)
    }

    pub fn is_used(&self, item: &T) -> bool {
        self.used.contains(item)
    }

    pub fn used_len(&self) -> usize {
        self.used.len()
    }

    pub fn unused_len(&self) -> usize {
        self.callbacks.len() - self.used.len()
    }

    /// Returns whether or not the cache has reached the maximum size.
    pub fn is_full(&self) -> bool {
        self.callbacks.len() >= self.config.max_size
    }

    /// Start tracking an item as the most recently used one.
    ///
    /// Returns `false` without touching anything if the item is already tracked or the cache is full.  The callback
    /// is dropped unused in that case.
    pub fn add<F>(&mut self, item: T, on_release: F) -> bool
    where
        F: FnMut(&T) + 'static,
    {
        if self.callbacks.contains_key(&item) || self.is_full() {
            return false;
        }

        self.order.push_tail(item.clone());
        self.used.insert(item.clone());
        self.callbacks.insert(item, Box::new(on_release));
        true
    }

    /// Release and stop tracking an item.  Returns `false` if the item wasn't tracked.
    ///
    /// The callback runs before anything is unlinked, so if it panics the item is still fully tracked.
    pub fn remove(&mut self, item: &T) -> bool {
        match self.callbacks.get_mut(item) {
            Some(cb) => cb(item),
            None => return false,
        }

        self.order.remove(item);
        self.used.remove(item);
        self.callbacks.remove(item);
        true
    }

    /// Mark an item as used in this cycle, making it the most recent item.
    ///
    /// Does nothing for untracked items or items already marked this cycle; the latter keep their position.
    pub fn mark_used(&mut self, item: &T) {
        if self.callbacks.contains_key(item) && !self.used.contains(item) {
            self.order.move_to_tail(item);
            self.used.insert(item.clone());
        }
    }

    /// Forget every used mark.  The recency order is left alone.
    pub fn mark_all_unused(&mut self) {
        self.used.clear();
    }

    /// How many items [UsageLru::unload_unused_content] would evict right now.
    pub fn eviction_count(&self) -> usize {
        self.config.eviction_count(self.len(), self.unused_len())
    }

    /// Run one eviction pass, releasing items from the least recently used end.  Returns how many were evicted.
    ///
    /// Nothing happens unless the cache is above `min_size` and at least one item is unmarked.  The number evicted is
    /// capped by the number of unmarked items, but the items themselves are taken from the head of the recency order
    /// without checking their marks.
    pub fn unload_unused_content(&mut self) -> usize {
        let tracked = self.len();
        let unused = self.unused_len();
        let to_evict = self.config.eviction_count(tracked, unused);
        if to_evict == 0 {
            return 0;
        }

        let mut evicted = 0;
        while evicted < to_evict && self.release_head() {
            evicted += 1;
        }

        debug!(
            "Evicted {} of {} tracked items ({} unused, min size {})",
            evicted, tracked, unused, self.config.min_size
        );
        evicted
    }

    /// Release every item, least recently used first, and drop any scheduled pass.
    pub fn clear(&mut self) {
        while self.release_head() {}

        self.used.clear();
        self.pending_unload = None;
    }

    /// Release the least recently used item and stop tracking it.  Returns `false` if the cache is empty.
    ///
    /// Like [UsageLru::remove], nothing is unlinked until the callback returns.
    fn release_head(&mut self) -> bool {
        let item = match self.order.peek_head() {
            Some(x) => x.clone(),
            None => return false,
        };

        if let Some(cb) = self.callbacks.get_mut(&item) {
            cb(&item);
        }
        self.order.pop_head();
        self.callbacks.remove(&item);
        self.used.remove(&item);
        true
    }

    /// Iterator visiting tracked items from least to most recently used.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.order.iter()
    }
}

impl<T: Hash + Eq + Clone> std::fmt::Debug for UsageLru<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsageLru")
            .field("config", &self.config)
            .field("len", &self.len())
            .field("used", &self.used_len())
            .field("pending_unload", &self.pending_unload)
            .finish()
    }
}

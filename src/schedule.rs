//! Deferred, coalesced eviction passes.
//!
//! A host typically marks items from many places during one turn of its run loop.  Instead of evicting inline, each
//! of those places may call [UsageLru::schedule_unload]; only the first call in a turn records a pass, and the host
//! runs it once with [UsageLru::run_scheduled_unload] when the turn's synchronous work is done.  That way the pass sees
//! every mark made during the turn.
//!
//! There is no way to cancel a scheduled pass short of [UsageLru::clear].
use std::hash::Hash;

use log::trace;

use crate::*;

/// A pass recorded by [UsageLru::schedule_unload] and not yet run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingUnload {
    /// Whether to call [UsageLru::mark_all_unused] after evicting.
    pub reset_used_after: bool,
}

impl<T: Hash + Eq + Clone> UsageLru<T> {
    /// Request an eviction pass at the end of the current turn.
    ///
    /// Returns `false` if a pass is already pending, in which case this request is absorbed into it and the pending
    /// pass keeps its own `reset_used_after`.
    pub fn schedule_unload(&mut self, reset_used_after: bool) -> bool {
        if let Some(pending) = self.pending_unload {
            trace!("Unload already scheduled, coalescing ({:?})", pending);
            return false;
        }

        trace!("Scheduling unload, reset_used_after = {}", reset_used_after);
        self.pending_unload = Some(PendingUnload { reset_used_after });
        true
    }

    pub fn is_unload_scheduled(&self) -> bool {
        self.pending_unload.is_some()
    }

    pub fn pending_unload(&self) -> Option<PendingUnload> {
        self.pending_unload
    }

    /// Run the pending pass, if any.  Call this at the end of each turn of the host's run loop.
    ///
    /// Evicts using this turn's marks and only then clears them if the pass asked for it; clearing first would leave
    /// nothing protected.  Returns the number of items evicted, or `None` if no pass was pending.
    pub fn run_scheduled_unload(&mut self) -> Option<usize> {
        let pending = self.pending_unload.take()?;
        let evicted = self.unload_unused_content();
        if pending.reset_used_after {
            self.mark_all_unused();
        }
        Some(evicted)
    }
}

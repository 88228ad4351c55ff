//! A recency-aware cache for bookkeeping externally owned resources.
//!
//! Sometimes the expensive thing isn't the lookup but the resource behind it: a decoded texture, a parsed map chunk,
//! a tile held in GPU memory.  The host already knows how to load and free these; what it needs is something to tell
//! it which ones haven't been needed lately once there are too many of them.  That's what this crate does.
//!
//! [UsageLru] holds opaque item keys, each registered with a release callback.  During each work cycle the host calls
//! [UsageLru::mark_used] on the items it touched, which moves them to the most recent end of a [RecencyQueue].  At the
//! end of the cycle an eviction pass pops items off the least recent end, firing their callbacks, until the cache is
//! trimmed by a fraction of its excess over [CacheConfig::min_size].  Passes are normally requested with
//! [UsageLru::schedule_unload], which coalesces any number of requests into one pass run at the end of the host's turn.
//!
//! The cache is single-threaded and does no I/O.  Callbacks are opaque; if one panics, the panic propagates and the
//! item it was releasing remains tracked.
mod config;
mod error;
mod recency_queue;
mod schedule;
mod usage_lru;

pub use config::*;
pub use error::*;
pub use recency_queue::*;
pub use schedule::*;
pub use usage_lru::*;

//! Size policy for a [crate::UsageLru].
//!
//! Build one with [CacheConfigBuilder]; any field left unset takes the same value as [CacheConfig::default].
use crate::ConfigError;

pub const DEFAULT_MAX_SIZE: usize = 800;
pub const DEFAULT_MIN_SIZE: usize = 600;
pub const DEFAULT_UNLOAD_FRACTION: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, derive_builder::Builder)]
pub struct CacheConfig {
    /// Number of items at which [crate::UsageLru::add] stops admitting new items.
    #[builder(default = "DEFAULT_MAX_SIZE")]
    pub max_size: usize,
    /// Size the cache is trimmed towards.  An eviction pass does nothing unless the cache is strictly larger.
    #[builder(default = "DEFAULT_MIN_SIZE")]
    pub min_size: usize,
    /// Fraction of the excess over `min_size` to evict in one pass.
    #[builder(default = "DEFAULT_UNLOAD_FRACTION")]
    pub unload_fraction: f64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            max_size: DEFAULT_MAX_SIZE,
            min_size: DEFAULT_MIN_SIZE,
            unload_fraction: DEFAULT_UNLOAD_FRACTION,
        }
    }
}

impl CacheConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_size == 0 {
            return Err(ConfigError::ZeroMaxSize);
        }

        if self.min_size > self.max_size {
            return Err(ConfigError::MinSizeExceedsMax {
                min_size: self.min_size,
                max_size: self.max_size,
            });
        }

        // Written so that NaN fails too.
        if !(self.unload_fraction > 0.0 && self.unload_fraction <= 1.0) {
            return Err(ConfigError::UnloadFractionOutOfRange(self.unload_fraction));
        }

        Ok(())
    }

    /// How many items one pass evicts from a cache holding `len` items of which `unused` are not marked used.
    ///
    /// The excess over `min_size` is floored at `min_size` itself, so a cache just over the threshold still evicts a
    /// batch proportional to `min_size` rather than a handful of items.
    pub fn eviction_count(&self, len: usize, unused: usize) -> usize {
        if len <= self.min_size || unused == 0 {
            return 0;
        }

        let excess = (len - self.min_size).max(self.min_size);
        let wanted = (excess as f64 * self.unload_fraction).ceil() as usize;
        wanted.min(unused)
    }
}

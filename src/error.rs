//! Errors produced when validating a [crate::CacheConfig].
//!
//! Nothing at runtime fails with an error: admission and removal report a `bool`, and everything else degrades to a
//! no-op.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("max_size must be greater than zero")]
    ZeroMaxSize,
    #[error("min_size ({min_size}) must not exceed max_size ({max_size})")]
    MinSizeExceedsMax { min_size: usize, max_size: usize },
    #[error("unload_fraction must be in (0, 1], got {0}")]
    UnloadFractionOutOfRange(f64),
}

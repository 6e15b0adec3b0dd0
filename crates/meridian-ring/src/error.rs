//! Error types for ring operations and configuration loading.

/// Errors returned by ring operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RingError {
    /// A lookup was made on a ring with no virtual positions.
    ///
    /// Recoverable: retry once nodes have been added.
    #[error("ring has no nodes")]
    Empty,

    /// The node to remove is not registered (never added, or already removed).
    #[error("node not found: {0}")]
    NotFound(String),
}

/// Errors that can occur while loading a [`RingConfig`](crate::RingConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The TOML input could not be parsed.
    #[error("invalid ring config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The input parsed but holds an unusable value.
    #[error("invalid ring config: {0}")]
    Invalid(String),
}

//! Ring configuration, embeddable in a caller's TOML config file.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What happens when a virtual-node label digests to a position already
/// owned by a different node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Last writer wins: the newly added node takes over the position.
    #[default]
    Overwrite,
    /// First writer wins: the existing owner keeps the position.
    KeepExisting,
}

/// Tunables for a [`Ring`](crate::Ring).
///
/// ```toml
/// default_replicas = 160
/// collision_policy = "keep_existing"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Virtual nodes per node for [`Ring::add_default`](crate::Ring::add_default).
    pub default_replicas: usize,
    /// Resolution of cross-node position collisions.
    pub collision_policy: CollisionPolicy,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            default_replicas: 160,
            collision_policy: CollisionPolicy::Overwrite,
        }
    }
}

impl RingConfig {
    /// Parse and validate a config from a TOML string.
    ///
    /// Missing fields take their defaults.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let config: RingConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_replicas == 0 {
            return Err(ConfigError::Invalid(
                "default_replicas must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

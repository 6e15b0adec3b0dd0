//! Consistent hashing ring for spreading string keys over a changing set of
//! named nodes.
//!
//! Each node is placed on a 32-bit ring at several virtual positions, the
//! CRC-32 digests of `"{node}-{i}"`. A key is owned by the node at the first
//! position strictly after the key's own digest, wrapping around past the
//! largest position. Adding or removing a node only moves the keys adjacent
//! to its virtual positions.
//!
//! ```
//! use meridian_ring::{Ring, RingError};
//!
//! let ring = Ring::new();
//! ring.add("cache-a", 160);
//! ring.add("cache-b", 160);
//!
//! let owner = ring.get("user:42")?;
//! assert!(owner == "cache-a" || owner == "cache-b");
//!
//! ring.remove("cache-a")?;
//! assert_eq!(ring.get("user:42")?, "cache-b");
//! # Ok::<(), RingError>(())
//! ```

mod config;
mod error;
pub mod hash;
mod ring;

pub use config::{CollisionPolicy, RingConfig};
pub use error::{ConfigError, RingError};
pub use hash::Position;
pub use ring::Ring;

//! Consistent hashing ring implementation.

use std::collections::{BTreeMap, HashMap};
use std::ops::Bound::{Excluded, Unbounded};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use crate::config::{CollisionPolicy, RingConfig};
use crate::error::RingError;
use crate::hash::{self, Position};

/// Consistent hashing ring mapping string keys to named nodes.
///
/// Each node is placed on a u32 ring at `replicas` virtual positions, the
/// CRC-32 digests of `"{node}-{i}"`. A key belongs to the node owning the
/// first position strictly greater than the key's digest, wrapping past the
/// largest position back to the smallest.
///
/// The ring is shared between threads behind a reader/writer lock: lookups
/// run concurrently, `add` and `remove` are exclusive. Wrap it in an `Arc`
/// to share it.
#[derive(Debug, Default)]
pub struct Ring {
    state: RwLock<RingState>,
    config: RingConfig,
}

/// Everything guarded by the ring lock.
#[derive(Debug, Default)]
struct RingState {
    /// Virtual node positions: ring position -> node name. Key order is the
    /// search index.
    vnodes: BTreeMap<Position, String>,
    /// Replica count each node was last added with.
    replicas: HashMap<String, usize>,
}

impl RingState {
    /// Insert the virtual nodes of `node` and record its replica count.
    fn place(&mut self, node: &str, replicas: usize, policy: CollisionPolicy) {
        for i in 0..replicas {
            let pos = hash::vnode_position(node, i);
            if let Some(owner) = self.vnodes.get(&pos) {
                if owner != node {
                    warn!(
                        position = pos,
                        existing = %owner,
                        node,
                        ?policy,
                        "virtual node collision"
                    );
                    if policy == CollisionPolicy::KeepExisting {
                        continue;
                    }
                }
            }
            self.vnodes.insert(pos, node.to_string());
        }
        self.replicas.insert(node.to_string(), replicas);
    }

    /// Delete every virtual node `node` still owns and forget it.
    ///
    /// Returns the replica count it was registered with, or `None` if the
    /// node is unknown. Positions taken over by another node are left alone.
    fn unplace(&mut self, node: &str) -> Option<usize> {
        let replicas = self.replicas.remove(node)?;
        for i in 0..replicas {
            let pos = hash::vnode_position(node, i);
            if self.vnodes.get(&pos).is_some_and(|owner| owner == node) {
                self.vnodes.remove(&pos);
            }
        }
        Some(replicas)
    }

    /// First virtual node strictly after `hash`, wrapping to the first one.
    ///
    /// A position equal to `hash` does not own it: ties go to the next
    /// position up.
    fn successor(&self, hash: Position) -> Option<(&Position, &String)> {
        self.vnodes
            .range((Excluded(hash), Unbounded))
            .next()
            .or_else(|| self.vnodes.first_key_value())
    }

    /// Up to `n` distinct nodes, walking clockwise from the successor of `hash`.
    fn walk(&self, hash: Position, n: usize) -> Vec<String> {
        let want = n.min(self.replicas.len());
        let mut owners: Vec<String> = Vec::with_capacity(want);

        let after = self.vnodes.range((Excluded(hash), Unbounded));
        let before = self.vnodes.range(..=hash);

        for (_, node) in after.chain(before) {
            if owners.len() == want {
                break;
            }
            if !owners.iter().any(|o| o == node) {
                owners.push(node.clone());
            }
        }

        owners
    }
}

impl Ring {
    /// Create an empty ring with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty ring with the given configuration.
    pub fn with_config(config: RingConfig) -> Self {
        Self {
            state: RwLock::new(RingState::default()),
            config,
        }
    }

    /// The configuration this ring was built with.
    pub fn config(&self) -> &RingConfig {
        &self.config
    }

    /// Add `node` with `replicas` virtual nodes.
    ///
    /// A replica count of zero is treated as one. Re-adding a registered node
    /// first removes all of its previous virtual nodes, so the node ends up
    /// with exactly the new footprint.
    pub fn add(&self, node: &str, replicas: usize) {
        let replicas = replicas.max(1);
        let mut state = self.write();

        if let Some(previous) = state.unplace(node) {
            debug!(node, previous, replicas, "replacing node footprint");
        }
        state.place(node, replicas, self.config.collision_policy);

        debug!(
            node,
            replicas,
            positions = state.vnodes.len(),
            "added node to ring"
        );
    }

    /// Add `node` with the configured default replica count.
    pub fn add_default(&self, node: &str) {
        self.add(node, self.config.default_replicas);
    }

    /// Remove `node` and all of its virtual nodes.
    ///
    /// Fails with [`RingError::NotFound`] and changes nothing if the node is
    /// not registered.
    pub fn remove(&self, node: &str) -> Result<(), RingError> {
        let mut state = self.write();
        let replicas = state
            .unplace(node)
            .ok_or_else(|| RingError::NotFound(node.to_string()))?;

        debug!(
            node,
            replicas,
            positions = state.vnodes.len(),
            "removed node from ring"
        );
        Ok(())
    }

    /// Resolve `key` to the node that owns it.
    pub fn get(&self, key: &str) -> Result<String, RingError> {
        let state = self.read();
        state
            .successor(hash::position(key.as_bytes()))
            .map(|(_, node)| node.clone())
            .ok_or(RingError::Empty)
    }

    /// Resolve `key` to up to `n` distinct nodes, in clockwise ring order.
    ///
    /// The first entry is always the node [`Ring::get`] returns. Fewer than
    /// `n` entries come back when fewer nodes own positions.
    pub fn get_n(&self, key: &str, n: usize) -> Result<Vec<String>, RingError> {
        let state = self.read();
        if state.vnodes.is_empty() {
            return Err(RingError::Empty);
        }
        Ok(state.walk(hash::position(key.as_bytes()), n))
    }

    /// Count how many of `keys` land on each registered node.
    ///
    /// Every registered node appears, with zero if it received no keys.
    pub fn distribution<I>(&self, keys: I) -> BTreeMap<String, usize>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let state = self.read();
        let mut counts: BTreeMap<String, usize> =
            state.replicas.keys().map(|n| (n.clone(), 0)).collect();

        for key in keys {
            if let Some((_, node)) = state.successor(hash::position(key.as_ref().as_bytes())) {
                *counts.entry(node.clone()).or_default() += 1;
            }
        }

        counts
    }

    /// Return the total number of virtual nodes on the ring.
    pub fn position_count(&self) -> usize {
        self.read().vnodes.len()
    }

    /// Return the number of registered nodes.
    pub fn node_count(&self) -> usize {
        self.read().replicas.len()
    }

    /// True when the ring holds no virtual nodes.
    pub fn is_empty(&self) -> bool {
        self.read().vnodes.is_empty()
    }

    /// True when `node` is registered.
    pub fn contains(&self, node: &str) -> bool {
        self.read().replicas.contains_key(node)
    }

    /// Replica count `node` was last added with, if registered.
    pub fn replicas(&self, node: &str) -> Option<usize> {
        self.read().replicas.get(node).copied()
    }

    /// Registered node names, sorted.
    pub fn nodes(&self) -> Vec<String> {
        let mut nodes: Vec<String> = self.read().replicas.keys().cloned().collect();
        nodes.sort();
        nodes
    }

    /// Snapshot of every virtual node in ascending position order.
    pub fn positions(&self) -> Vec<(Position, String)> {
        self.read()
            .vnodes
            .iter()
            .map(|(pos, node)| (*pos, node.clone()))
            .collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, RingState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RingState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

//! Ring positions: CRC-32 digests of virtual-node labels and lookup keys.
//!
//! The digest must be identical on every call and in every process, since
//! `Ring::remove` re-derives the positions that `Ring::add` placed.

/// A point on the ring, in `[0, 2^32)`.
pub type Position = u32;

/// Digest arbitrary bytes to a ring position (CRC-32, IEEE polynomial).
pub fn position(bytes: &[u8]) -> Position {
    crc32fast::hash(bytes)
}

/// Build the label of a node's `index`-th virtual node: `"{node}-{index}"`.
pub fn vnode_label(node: &str, index: usize) -> String {
    format!("{node}-{index}")
}

/// Ring position of a node's `index`-th virtual node.
pub fn vnode_position(node: &str, index: usize) -> Position {
    position(vnode_label(node, index).as_bytes())
}

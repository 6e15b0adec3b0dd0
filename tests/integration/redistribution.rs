//! Integration test: key movement when membership changes.
//!
//! The point of the ring: adding or removing one node moves only the keys
//! that node gains or loses.

use meridian_integration_tests::{init_tracing, keys, moved, owners};
use meridian_ring::Ring;

const TOTAL: usize = 10_000;

fn ring_with(nodes: &[&str], replicas: usize) -> Ring {
    let ring = Ring::new();
    for node in nodes {
        ring.add(node, replicas);
    }
    ring
}

/// Adding a third node moves roughly a third of the keys, all onto it.
#[test]
fn test_add_node_only_fraction_moves() {
    init_tracing();
    let ring = ring_with(&["n1", "n2"], 160);
    let keys = keys(TOTAL);
    let before = owners(&ring, &keys);

    ring.add("n3", 160);
    let after = owners(&ring, &keys);

    let moved_count = moved(&before, &after);
    let ratio = moved_count as f64 / TOTAL as f64;
    assert!(
        (0.1..=0.6).contains(&ratio),
        "too many or too few keys moved: {moved_count}/{TOTAL} ({ratio:.2})"
    );

    for (b, a) in before.iter().zip(&after) {
        if b != a {
            assert_eq!(a, "n3", "key moved from {b} to {a}, not to the new node");
        }
    }
}

/// Removing a node only moves the keys it owned.
#[test]
fn test_remove_node_only_its_keys_move() {
    init_tracing();
    let ring = ring_with(&["n1", "n2", "n3"], 160);
    let keys = keys(TOTAL);
    let before = owners(&ring, &keys);

    ring.remove("n2").unwrap();
    let after = owners(&ring, &keys);

    for (i, (b, a)) in before.iter().zip(&after).enumerate() {
        if b != "n2" {
            assert_eq!(b, a, "key {i} was on {b} (not the removed node) but moved to {a}");
        }
    }
}

/// Removing and re-adding a node restores the exact previous assignment.
#[test]
fn test_remove_then_readd_restores_mapping() {
    init_tracing();
    let ring = ring_with(&["n1", "n2", "n3"], 100);
    let keys = keys(TOTAL);
    let before = owners(&ring, &keys);

    ring.remove("n1").unwrap();
    ring.add("n1", 100);

    assert_eq!(owners(&ring, &keys), before);
}

/// Two rings built in different orders agree on every key.
#[test]
fn test_placement_independent_of_insert_order() {
    init_tracing();
    let forward = ring_with(&["a", "b", "c", "d"], 64);
    let reverse = ring_with(&["d", "c", "b", "a"], 64);

    let keys = keys(TOTAL);
    assert_eq!(owners(&forward, &keys), owners(&reverse, &keys));
}

/// A node with twice the replicas receives roughly twice the keys.
#[test]
fn test_replica_count_scales_share() {
    init_tracing();
    let ring = Ring::new();
    ring.add("small", 160);
    ring.add("large", 320);

    let counts = ring.distribution(keys(TOTAL));
    let ratio = counts["large"] as f64 / counts["small"] as f64;
    assert!(
        (1.3..=3.5).contains(&ratio),
        "weighted distribution off: {counts:?} (ratio {ratio:.2})"
    );
}

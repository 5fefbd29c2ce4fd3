//! Convex hull by Graham scan.
//!
//! ## Algorithm
//!
//! 1. Pick the lowest node (minimum y, then minimum x) as the pivot
//! 2. Stable-sort every other node by polar angle around the pivot
//! 3. Walk the sorted nodes with a stack, popping while the last turn is not
//!    a strict left turn
//!
//! Collinear boundary nodes are dropped: a zero turn counts as "not left".
//! The ring comes out counter-clockwise (y-up) starting at the pivot.
//!
//! Nodes sharing exact coordinates are collapsed to the one with the lowest
//! id before the scan. A zero-length step from a copy would otherwise pop a
//! real corner off the stack.

use std::collections::HashMap;

use crate::error::HullError;
use crate::geometry::{Node, Segment};
use log::warn;

/// Cross product of `(q - p) x (r - p)`. Positive for a left turn.
#[inline]
fn turn(p: &Node, q: &Node, r: &Node) -> f64 {
    (q.x - p.x) * (r.y - p.y) - (r.x - p.x) * (q.y - p.y)
}

#[inline]
fn angle_from(origin: &Node, target: &Node) -> f64 {
    (target.y - origin.y).atan2(target.x - origin.x)
}

fn lowest_node(nodes: &[Node]) -> Node {
    let mut lowest = nodes[0];
    for n in nodes {
        if n.y < lowest.y || (n.y == lowest.y && n.x < lowest.x) {
            lowest = *n;
        }
    }
    lowest
}

/// Drop nodes whose coordinates repeat an earlier-kept node, keeping the
/// lowest id of each coordinate. Input order is preserved otherwise.
pub fn distinct_nodes(nodes: &[Node]) -> Vec<Node> {
    // `+ 0.0` folds -0.0 into 0.0 so both hash the same
    let key = |n: &Node| ((n.x + 0.0).to_bits(), (n.y + 0.0).to_bits());

    let mut lowest: HashMap<(u64, u64), usize> = HashMap::with_capacity(nodes.len());
    for n in nodes {
        lowest
            .entry(key(n))
            .and_modify(|id| *id = (*id).min(n.id))
            .or_insert(n.id);
    }

    nodes.iter().filter(|n| lowest.get(&key(n)) == Some(&n.id)).copied().collect()
}

/// Push `node` onto the hull stack, first popping every vertex that would
/// not make a strict left turn.
fn keep_left(hull: &mut Vec<Node>, node: Node) {
    while hull.len() > 1 && turn(&hull[hull.len() - 2], &hull[hull.len() - 1], &node) <= 0.0 {
        hull.pop();
    }

    if hull.last() != Some(&node) {
        hull.push(node);
    }
}

/// Compute the convex hull ring of `nodes`.
///
/// Returns the hull vertices in order, first element = pivot. Fails with
/// [`HullError::InvalidInput`] for fewer than 3 nodes. Coordinate duplicates
/// are represented by their lowest id (see [`distinct_nodes`]).
pub fn convex_hull(nodes: &[Node]) -> Result<Vec<Node>, HullError> {
    if nodes.len() < 3 {
        return Err(HullError::InvalidInput { count: nodes.len() });
    }

    let distinct = distinct_nodes(nodes);
    let pivot = lowest_node(&distinct);

    let mut sorted: Vec<Node> = distinct.iter().filter(|n| **n != pivot).copied().collect();
    // `sort_by` is stable, so equal angles keep input order
    sorted.sort_by(|a, b| angle_from(&pivot, a).total_cmp(&angle_from(&pivot, b)));

    let mut hull = Vec::with_capacity(sorted.len() + 1);
    hull.push(pivot);
    for node in sorted {
        keep_left(&mut hull, node);
    }

    if hull.len() < 3 {
        warn!(
            "convex hull of {} points collapsed to {} vertices (collinear input)",
            nodes.len(),
            hull.len()
        );
    }

    Ok(hull)
}

/// Close a hull ring into a loop of segments, wrapping last -> first.
pub fn ring_to_segments(ring: &[Node]) -> Vec<Segment> {
    let n = ring.len();
    if n < 2 {
        return Vec::new();
    }
    (0..n).map(|i| Segment::new(ring[i], ring[(i + 1) % n])).collect()
}

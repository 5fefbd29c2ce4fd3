//! Concave refinement of a single boundary edge.
//!
//! An edge `a`–`b` is split at an unused node `o` into `a`–`o` and `o`–`b`
//! when:
//! - `o` lies inside the search ellipse around the edge (see
//!   [`nearby_points`]),
//! - the angle `a`-`o`-`b` is sharp enough (its cosine is below the
//!   concavity threshold),
//! - neither new edge crosses the rest of the boundary.
//!
//! Among the valid nodes the one with the lowest cosine wins. Nothing in
//! here mutates the boundary; [`crate::hull::HullEngine`] applies the split.

use crate::geometry::{Node, Segment};
use crate::intersect::segments_intersect;
use log::trace;

/// Unused nodes inside the ellipse with foci at the segment endpoints.
///
/// A node `n` is kept when `|n - a| + |n - b| <= 2 * len / sqrt(2) * scale_factor`.
/// Larger `scale_factor` admits nodes farther from the edge.
pub fn nearby_points(segment: &Segment, unused: &[Node], scale_factor: f64) -> Vec<Node> {
    let max_focus_sum = 2.0 * segment.length() / std::f64::consts::SQRT_2 * scale_factor;

    unused
        .iter()
        .filter(|n| n.distance(&segment.a) + n.distance(&segment.b) <= max_focus_sum)
        .copied()
        .collect()
}

/// Cosine of the angle at `o` in the triangle `a`-`o`-`b`.
///
/// Rounded to 4 decimals (ties to even) so near-equal angles compare equal.
/// A zero-length side has no defined angle; it reports `1.0`, which never
/// passes a concavity threshold.
pub fn angle_cosine(a: &Node, b: &Node, o: &Node) -> f64 {
    let a2 = (a.x - o.x).powi(2) + (a.y - o.y).powi(2);
    let b2 = (b.x - o.x).powi(2) + (b.y - o.y).powi(2);
    let c2 = (a.x - b.x).powi(2) + (a.y - b.y).powi(2);

    let denominator = 2.0 * (a2 * b2).sqrt();
    if denominator == 0.0 {
        return 1.0;
    }

    ((a2 + b2 - c2) / denominator * 10_000.0).round_ties_even() / 10_000.0
}

/// True if `segment` crosses any boundary edge it does not share a node with.
pub fn collides_with_boundary(segment: &Segment, boundary: &[Segment]) -> bool {
    boundary
        .iter()
        .any(|edge| !segment.shares_node(edge) && segments_intersect(segment, edge))
}

/// Try to split `segment` at the best of `candidates`.
///
/// Returns the two replacement edges `(a, o)` and `(o, b)`, or `None` when
/// no candidate passes the concavity and intersection tests. Equal cosines
/// keep the first candidate seen.
pub fn divide_segment(
    segment: &Segment,
    candidates: &[Node],
    boundary: &[Segment],
    concavity: f64,
) -> Option<(Segment, Segment)> {
    let mut best: Option<(Node, f64)> = None;

    for &candidate in candidates {
        let cos = angle_cosine(&segment.a, &segment.b, &candidate);
        // Written as a negation so NaN is rejected too
        if !(cos < concavity) {
            continue;
        }

        let first = Segment::new(segment.a, candidate);
        let second = Segment::new(candidate, segment.b);
        if collides_with_boundary(&first, boundary) || collides_with_boundary(&second, boundary) {
            trace!("node {} rejected for edge {}-{}: crosses boundary", candidate.id, segment.a.id, segment.b.id);
            continue;
        }

        if best.is_none_or(|(_, best_cos)| cos < best_cos) {
            best = Some((candidate, cos));
        }
    }

    best.map(|(node, _)| (Segment::new(segment.a, node), Segment::new(node, segment.b)))
}

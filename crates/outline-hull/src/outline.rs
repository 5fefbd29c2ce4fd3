//! Outline reconstruction - walk an unordered edge set into one polyline.
//!
//! The concave hull comes out as a bag of edges sorted by length. This
//! module chains them back into an ordered, closed point sequence and can
//! optionally resample that ring with a Catmull-Rom spline.
//!
//! ## Closing convention
//!
//! A closed ring of N edges yields N + 1 points: the first point is
//! repeated at the end. [`Outline::open_ring`] drops the duplicate.

use std::collections::HashMap;

use log::warn;

use crate::error::HullError;
use crate::geometry::{Point, Segment};

/// Configuration for outline reconstruction.
#[derive(Debug, Clone)]
pub struct OutlineConfig {
    /// Maximum distance between endpoints to consider them connected.
    /// Default: 0.001
    pub tolerance: f64,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self { tolerance: 1e-3 }
    }
}

impl OutlineConfig {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// An ordered outline.
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    pub points: Vec<Point>,
    /// False when the walk stopped before every edge was used, i.e. the
    /// input was disconnected or branched.
    pub complete: bool,
    /// Edges left over when the walk stopped.
    pub unconsumed: usize,
}

impl Outline {
    /// True when the last point repeats the first.
    ///
    /// The closing point is copied from the same node as the first one, so
    /// exact comparison is enough.
    pub fn is_closed(&self) -> bool {
        self.points.len() > 2 && self.points.first() == self.points.last()
    }

    /// Wrap a ring whose points are already in order, skipping the hull.
    ///
    /// The ring is closed by repeating its first point unless it already
    /// ends on it. Fewer than 3 ring points is an error.
    pub fn from_ring(points: &[Point]) -> Result<Self, HullError> {
        let closed = points.len() > 2 && points.first() == points.last();
        let ring = if closed { &points[..points.len() - 1] } else { points };
        if ring.len() < 3 {
            return Err(HullError::RingTooShort { count: ring.len() });
        }

        let mut points = ring.to_vec();
        points.push(ring[0]);
        Ok(Self {
            points,
            complete: true,
            unconsumed: 0,
        })
    }

    /// The ring without its closing duplicate.
    pub fn open_ring(&self) -> &[Point] {
        if self.is_closed() {
            &self.points[..self.points.len() - 1]
        } else {
            &self.points
        }
    }
}

/// Chain `edges` into an ordered outline.
///
/// Starts from the first edge, then repeatedly takes the first remaining
/// edge (by input order) with an endpoint within `config.tolerance` of the
/// last emitted point and emits its other endpoint. Stops when nothing
/// matches; leftover edges mark the outline incomplete.
///
/// # Performance
///
/// Endpoints are bucketed in a grid of `tolerance`-sized cells, so each
/// lookup only checks the 3x3 neighbourhood of the current point.
pub fn build_outline(edges: &[Segment], config: &OutlineConfig) -> Outline {
    if edges.is_empty() {
        return Outline {
            points: Vec::new(),
            complete: true,
            unconsumed: 0,
        };
    }

    let tolerance = config.tolerance;
    let grid_size = tolerance.max(1e-9); // Avoid division by zero

    let mut grid: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (i, edge) in edges.iter().enumerate() {
        grid.entry(point_to_cell(edge.a.point(), grid_size)).or_default().push(i);
        grid.entry(point_to_cell(edge.b.point(), grid_size)).or_default().push(i);
    }

    let mut used = vec![false; edges.len()];
    used[0] = true;
    let mut remaining = edges.len() - 1;
    let mut points = vec![edges[0].a.point(), edges[0].b.point()];

    while remaining > 0 {
        let last = points[points.len() - 1];
        let Some(next_idx) = find_connecting_edge(last, edges, &grid, &used, grid_size, tolerance) else {
            break;
        };

        used[next_idx] = true;
        remaining -= 1;

        let edge = &edges[next_idx];
        let next = if edge.a.point().distance(last) < tolerance {
            edge.b.point()
        } else {
            edge.a.point()
        };
        points.push(next);
    }

    if remaining > 0 {
        warn!(
            "outline stopped after {} points, {} of {} edges not connected",
            points.len(),
            remaining,
            edges.len()
        );
    }

    Outline {
        points,
        complete: remaining == 0,
        unconsumed: remaining,
    }
}

#[inline]
fn point_to_cell(p: Point, grid_size: f64) -> (i64, i64) {
    ((p.x / grid_size).floor() as i64, (p.y / grid_size).floor() as i64)
}

/// Lowest-index unused edge with an endpoint strictly within `tolerance`.
fn find_connecting_edge(
    at: Point,
    edges: &[Segment],
    grid: &HashMap<(i64, i64), Vec<usize>>,
    used: &[bool],
    grid_size: f64,
    tolerance: f64,
) -> Option<usize> {
    let cell = point_to_cell(at, grid_size);
    let mut best: Option<usize> = None;

    // Check this cell and all 8 neighbors (endpoints might be in adjacent cells)
    for dx in -1..=1 {
        for dy in -1..=1 {
            let Some(candidates) = grid.get(&(cell.0 + dx, cell.1 + dy)) else {
                continue;
            };
            for &idx in candidates {
                if used[idx] || best.is_some_and(|b| b <= idx) {
                    continue;
                }
                let edge = &edges[idx];
                if edge.a.point().distance(at) < tolerance || edge.b.point().distance(at) < tolerance {
                    best = Some(idx);
                }
            }
        }
    }

    best
}

/// Resample a ring with a uniform Catmull-Rom spline.
///
/// The ring is treated cyclically. Each span `p[i] -> p[i+1]` contributes
/// `segments_per_curve` samples at `t = j / segments_per_curve` for
/// `j = 0..segments_per_curve`; the span's end is the next span's start.
/// A closed input (first point repeated at the end) is re-closed on output.
///
/// `segments_per_curve <= 1` and rings with fewer than 3 points are
/// returned unchanged.
pub fn smooth_outline(points: &[Point], segments_per_curve: u32) -> Vec<Point> {
    let closed = points.len() > 2 && points.first() == points.last();
    let ring = if closed { &points[..points.len() - 1] } else { points };

    if segments_per_curve <= 1 || ring.len() < 3 {
        return points.to_vec();
    }

    let count = ring.len();
    let steps = segments_per_curve as usize;
    let mut result = Vec::with_capacity(count * steps + 1);

    for i in 0..count {
        let p0 = ring[(i + count - 1) % count];
        let p1 = ring[i];
        let p2 = ring[(i + 1) % count];
        let p3 = ring[(i + 2) % count];

        for j in 0..steps {
            let t = j as f64 / steps as f64;
            result.push(Point::new(
                catmull_rom(p0.x, p1.x, p2.x, p3.x, t),
                catmull_rom(p0.y, p1.y, p2.y, p3.y, t),
            ));
        }
    }

    if closed {
        result.push(result[0]);
    }
    result
}

#[inline]
fn catmull_rom(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * (2.0 * p1
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

/// Summary numbers for an outline.
#[derive(Debug, Clone)]
pub struct OutlineStats {
    /// Number of input edges
    pub input_edges: usize,
    /// Number of output points (closing point included)
    pub points: usize,
    /// Sum of segment lengths along the outline
    pub perimeter: f64,
    /// Enclosed area (absolute shoelace value)
    pub area: f64,
}

impl OutlineStats {
    pub fn from_outline(input_edges: usize, outline: &Outline) -> Self {
        let perimeter = outline.points.windows(2).map(|w| w[0].distance(w[1])).sum();

        Self {
            input_edges,
            points: outline.points.len(),
            perimeter,
            area: crate::geometry::signed_area_of_points(outline.open_ring()).abs(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Node;

    fn ring_edges(coords: &[(f64, f64)]) -> Vec<Segment> {
        let nodes: Vec<Node> = coords.iter().enumerate().map(|(i, &(x, y))| Node::new(i, x, y)).collect();
        let n = nodes.len();
        (0..n).map(|i| Segment::new(nodes[i], nodes[(i + 1) % n])).collect()
    }

    fn square_points() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]
    }

    #[test]
    fn empty_edges_give_empty_outline() {
        let outline = build_outline(&[], &OutlineConfig::default());
        assert!(outline.points.is_empty());
        assert!(outline.complete);
    }

    #[test]
    fn closed_ring_gives_n_plus_one_points() {
        let edges = ring_edges(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (5.0, 4.0), (0.0, 10.0)]);
        let outline = build_outline(&edges, &OutlineConfig::default());

        assert_eq!(outline.points.len(), edges.len() + 1);
        assert_eq!(outline.points.first(), outline.points.last());
        assert!(outline.complete);
        assert!(outline.is_closed());
        assert_eq!(outline.open_ring().len(), edges.len());
    }

    #[test]
    fn shuffled_and_flipped_edges_still_chain() {
        let mut edges = ring_edges(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (5.0, 4.0), (0.0, 10.0)]);
        edges.swap(1, 3);
        edges.reverse();
        edges[2] = Segment::new(edges[2].b, edges[2].a);

        let outline = build_outline(&edges, &OutlineConfig::default());
        assert!(outline.complete);
        assert!(outline.is_closed());

        // Consecutive points must be joined by one of the input edges
        for w in outline.points.windows(2) {
            assert!(edges.iter().any(|e| {
                (e.a.point() == w[0] && e.b.point() == w[1]) || (e.a.point() == w[1] && e.b.point() == w[0])
            }));
        }
    }

    #[test]
    fn disconnected_edges_are_flagged_incomplete() {
        let mut edges = ring_edges(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        edges.push(Segment::new(Node::new(10, 50.0, 50.0), Node::new(11, 60.0, 50.0)));

        let outline = build_outline(&edges, &OutlineConfig::default());
        assert!(!outline.complete);
        assert_eq!(outline.unconsumed, 1);
        assert_eq!(outline.points.len(), 4);
    }

    #[test]
    fn respects_tolerance() {
        let a = Node::new(0, 0.0, 0.0);
        let b = Node::new(1, 10.0, 0.0);
        let b_near = Node::new(2, 10.0005, 0.0);
        let c = Node::new(3, 10.0, 10.0);
        let edges = vec![Segment::new(a, b), Segment::new(b_near, c)];

        let outline = build_outline(&edges, &OutlineConfig::default().with_tolerance(1e-3));
        assert!(outline.complete);
        assert_eq!(outline.points.len(), 3);

        let outline = build_outline(&edges, &OutlineConfig::default().with_tolerance(1e-4));
        assert!(!outline.complete);
    }

    #[test]
    fn smoothing_with_one_segment_is_identity() {
        let open = square_points();
        assert_eq!(smooth_outline(&open, 1), open);

        let mut closed = open.clone();
        closed.push(open[0]);
        assert_eq!(smooth_outline(&closed, 1), closed);
    }

    #[test]
    fn smoothing_closed_ring_counts_and_interpolates() {
        let mut closed = square_points();
        closed.push(closed[0]);

        let smooth = smooth_outline(&closed, 4);
        assert_eq!(smooth.len(), 4 * 4 + 1);
        assert_eq!(smooth.first(), smooth.last());

        // Every original vertex is a sample (t = 0 of its span)
        for (i, p) in square_points().iter().enumerate() {
            let s = smooth[i * 4];
            assert!(s.distance(*p) < 1e-12, "vertex {} moved to {:?}", i, s);
        }
    }

    #[test]
    fn smoothing_open_ring_is_not_closed() {
        let smooth = smooth_outline(&square_points(), 3);
        assert_eq!(smooth.len(), 12);
        assert_ne!(smooth.first(), smooth.last());
    }

    #[test]
    fn smoothing_midpoint_of_square_bulges_outward() {
        // Uniform Catmull-Rom at t = 0.5 on the bottom edge of a square
        // overshoots below y = 0 by 1/8 of the side.
        let smooth = smooth_outline(&square_points(), 2);
        let mid_bottom = smooth[1];
        assert!((mid_bottom.x - 5.0).abs() < 1e-12);
        assert!((mid_bottom.y + 1.25).abs() < 1e-12);
    }

    #[test]
    fn tiny_rings_are_left_alone() {
        let two = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        assert_eq!(smooth_outline(&two, 5), two);
    }

    #[test]
    fn from_ring_closes_open_input() {
        let outline = Outline::from_ring(&square_points()).unwrap();
        assert_eq!(outline.points.len(), 5);
        assert_eq!(outline.points[4], Point::new(0.0, 0.0));
        assert!(outline.is_closed());
        assert!(outline.complete);
        // Order is kept as given
        assert_eq!(outline.open_ring(), square_points().as_slice());
    }

    #[test]
    fn from_ring_keeps_closed_input() {
        let mut closed = square_points();
        closed.push(closed[0]);
        assert_eq!(Outline::from_ring(&closed).unwrap().points, closed);
    }

    #[test]
    fn from_ring_rejects_short_rings() {
        let two = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        assert_eq!(Outline::from_ring(&two), Err(HullError::RingTooShort { count: 2 }));

        // Closing duplicate does not count
        let closed_pair = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(0.0, 0.0)];
        assert_eq!(Outline::from_ring(&closed_pair), Err(HullError::RingTooShort { count: 2 }));
    }

    #[test]
    fn tolerance_builder() {
        let config = OutlineConfig::default().with_tolerance(0.25);
        assert_eq!(config.tolerance, 0.25);
        assert_eq!(OutlineConfig::default().tolerance, 1e-3);
    }

    #[test]
    fn stats_of_square() {
        let edges = ring_edges(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let outline = build_outline(&edges, &OutlineConfig::default());
        let stats = OutlineStats::from_outline(edges.len(), &outline);

        assert_eq!(stats.input_edges, 4);
        assert_eq!(stats.points, 5);
        assert!((stats.perimeter - 40.0).abs() < 1e-10);
        assert!((stats.area - 100.0).abs() < 1e-10);
    }
}

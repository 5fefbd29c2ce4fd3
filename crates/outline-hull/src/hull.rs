//! The hull engine: convex construction followed by concave refinement.
//!
//! A [`HullEngine`] owns all working state for one computation. Nothing is
//! global, so separate engines can run on separate threads.
//!
//! ```text
//! Empty --set_convex_hull--> ConvexBuilt --set_concave_hull--> Stable
//!   ^                                                            |
//!   +------------------------- clean_up ------------------------+
//! ```

use std::collections::HashSet;

use log::debug;

use crate::convex::{convex_hull, distinct_nodes, ring_to_segments};
use crate::error::HullError;
use crate::geometry::{Node, Point, Segment};
use crate::refine::{divide_segment, nearby_points};

/// Parameters for the concave pass.
#[derive(Debug, Clone, PartialEq)]
pub struct HullConfig {
    /// Cosine threshold, nominally -1..1. A candidate node is only used if
    /// the cosine of its angle is below this. Higher = more detail.
    /// Default: 0.5
    pub concavity: f64,
    /// Scales the search ellipse around each edge. Default: 1.0
    pub scale_factor: f64,
}

impl Default for HullConfig {
    fn default() -> Self {
        Self {
            concavity: 0.5,
            scale_factor: 1.0,
        }
    }
}

impl HullConfig {
    pub fn with_concavity(mut self, concavity: f64) -> Self {
        self.concavity = concavity;
        self
    }

    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }
}

/// Where an engine is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HullState {
    #[default]
    Empty,
    ConvexBuilt,
    Stable,
}

/// Owns the unused node pool and the convex and concave edge sets.
#[derive(Debug, Clone, Default)]
pub struct HullEngine {
    state: HullState,
    /// Unused pool right after convex construction; each concave run starts here.
    convex_unused: Vec<Node>,
    unused: Vec<Node>,
    convex: Vec<Segment>,
    concave: Vec<Segment>,
}

impl HullEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> HullState {
        self.state
    }

    /// The convex ring, in hull order.
    pub fn convex_edges(&self) -> &[Segment] {
        &self.convex
    }

    /// The concave edge set, sorted by length (longest first) once stable.
    pub fn concave_edges(&self) -> &[Segment] {
        &self.concave
    }

    /// Nodes not part of any edge.
    pub fn unused_nodes(&self) -> &[Node] {
        &self.unused
    }

    /// Reset to [`HullState::Empty`].
    pub fn clean_up(&mut self) {
        self.state = HullState::Empty;
        self.convex_unused.clear();
        self.unused.clear();
        self.convex.clear();
        self.concave.clear();
    }

    /// Build the convex ring of `nodes` and mark every other node unused.
    ///
    /// Nodes repeating the coordinates of a lower id are dropped, so they are
    /// neither on the ring nor in the unused pool. Clears any previous state
    /// first. On error the engine is left empty.
    pub fn set_convex_hull(&mut self, nodes: &[Node]) -> Result<(), HullError> {
        self.clean_up();

        let ring = convex_hull(nodes)?;
        let on_ring: HashSet<usize> = ring.iter().map(|n| n.id).collect();

        self.convex = ring_to_segments(&ring);
        self.convex_unused = distinct_nodes(nodes)
            .into_iter()
            .filter(|n| !on_ring.contains(&n.id))
            .collect();
        self.unused = self.convex_unused.clone();
        self.state = HullState::ConvexBuilt;

        debug!(
            "convex hull: {} vertices, {} of {} nodes unused",
            ring.len(),
            self.unused.len(),
            nodes.len()
        );
        Ok(())
    }

    /// Refine the convex ring into a concave one and return its edges.
    ///
    /// Each pass splits the first edge (in current order) that can be split,
    /// then re-sorts the edges longest first. The loop ends after a pass
    /// without a split. Every split consumes one unused node, so the number
    /// of passes is bounded by the unused pool.
    pub fn set_concave_hull(&mut self, concavity: f64, scale_factor: f64) -> Result<&[Segment], HullError> {
        if self.state == HullState::Empty {
            return Err(HullError::ConvexHullMissing);
        }

        self.unused = self.convex_unused.clone();
        self.concave = self.convex.clone();

        let mut divisions = 0usize;
        loop {
            let divided = self.divide_first_edge(concavity, scale_factor);
            self.concave.sort_by(|a, b| b.length().total_cmp(&a.length()));

            if !divided {
                break;
            }
            divisions += 1;
        }

        self.state = HullState::Stable;
        debug!(
            "concave hull: {} edges after {} divisions ({} nodes left unused)",
            self.concave.len(),
            divisions,
            self.unused.len()
        );
        Ok(&self.concave)
    }

    /// Split the first edge that accepts a node. Returns whether one was split.
    fn divide_first_edge(&mut self, concavity: f64, scale_factor: f64) -> bool {
        for i in 0..self.concave.len() {
            let edge = self.concave[i];
            let candidates = nearby_points(&edge, &self.unused, scale_factor);
            if candidates.is_empty() {
                continue;
            }

            if let Some((first, second)) = divide_segment(&edge, &candidates, &self.concave, concavity) {
                let inserted = first.b;
                self.unused.retain(|n| *n != inserted);
                self.concave.remove(i);
                self.concave.push(first);
                self.concave.push(second);

                debug!("split edge {}-{} at node {}", edge.a.id, edge.b.id, inserted.id);
                return true;
            }
        }
        false
    }
}

/// Run a whole hull computation on an owned engine.
///
/// Ids are assigned by input index.
pub fn compute_concave_hull(points: &[Point], config: &HullConfig) -> Result<Vec<Segment>, HullError> {
    let nodes = Node::from_points(points);

    let mut engine = HullEngine::new();
    engine.set_convex_hull(&nodes)?;
    let edges = engine.set_concave_hull(config.concavity, config.scale_factor)?;
    Ok(edges.to_vec())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::signed_area_of_points;
    use crate::intersect::segments_intersect;
    use crate::outline::{build_outline, OutlineConfig};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashMap;

    fn square_with_notch() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(5.0, 1.0), // pulls the bottom edge in
        ]
    }

    fn edge_ids(edges: &[Segment]) -> HashSet<(usize, usize)> {
        edges.iter().map(|e| (e.a.id.min(e.b.id), e.a.id.max(e.b.id))).collect()
    }

    fn random_cloud(seed: u64, count: usize) -> Vec<Node> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count)
            .map(|i| Node::new(i, rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
            .collect()
    }

    #[test]
    fn notch_is_cut_into_square() {
        let config = HullConfig::default().with_concavity(0.9).with_scale_factor(2.0);
        let edges = compute_concave_hull(&square_with_notch(), &config).unwrap();

        assert_eq!(edges.len(), 5);
        assert!(edges.iter().any(|e| e.touches(&Node::new(4, 5.0, 1.0))));

        let outline = build_outline(&edges, &OutlineConfig::default());
        let area = signed_area_of_points(&outline.points).abs();
        assert!(area < 100.0, "notched square should lose area, got {}", area);
    }

    #[test]
    fn minus_one_concavity_keeps_convex_square() {
        let config = HullConfig::default().with_concavity(-1.0).with_scale_factor(2.0);
        let edges = compute_concave_hull(&square_with_notch(), &config).unwrap();

        assert_eq!(edges.len(), 4);
        assert_eq!(edge_ids(&edges), HashSet::from([(0, 1), (1, 2), (2, 3), (0, 3)]));
    }

    #[test]
    fn duplicated_pivot_keeps_full_square() {
        let points = vec![
            Point::new(10.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(0.0, 0.0),
        ];
        let config = HullConfig::default().with_concavity(-0.5);
        let edges = compute_concave_hull(&points, &config).unwrap();

        assert_eq!(edge_ids(&edges), HashSet::from([(0, 1), (0, 2), (2, 3), (1, 3)]));
        let outline = build_outline(&edges, &OutlineConfig::default());
        assert_eq!(signed_area_of_points(outline.open_ring()).abs(), 100.0);
    }

    #[test]
    fn duplicates_stay_out_of_the_unused_pool() {
        let mut points = square_with_notch();
        points.push(Point::new(5.0, 1.0));
        points.push(Point::new(10.0, 10.0));

        let mut engine = HullEngine::new();
        engine.set_convex_hull(&Node::from_points(&points)).unwrap();
        let unused: Vec<usize> = engine.unused_nodes().iter().map(|n| n.id).collect();
        assert_eq!(unused, vec![4]);

        let edges = engine.set_concave_hull(0.9, 2.0).unwrap();
        assert_eq!(edges.len(), 5);
    }

    #[test]
    fn pass_splits_longest_splittable_edge_first() {
        // Node 4 is a candidate for both the bottom edge (12 long) and the
        // right edge (8 long). The right edge gives it the lower cosine, but
        // the bottom edge comes first and takes it.
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(12.0, 0.0),
            Point::new(12.0, 8.0),
            Point::new(0.0, 8.0),
            Point::new(11.0, 2.0),
        ];
        let candidate = Node::new(4, 11.0, 2.0);
        let bottom = Segment::new(Node::new(0, 0.0, 0.0), Node::new(1, 12.0, 0.0));
        let right = Segment::new(Node::new(1, 12.0, 0.0), Node::new(2, 12.0, 8.0));
        let cos_bottom = crate::refine::angle_cosine(&bottom.a, &bottom.b, &candidate);
        let cos_right = crate::refine::angle_cosine(&right.a, &right.b, &candidate);
        assert!(cos_right < cos_bottom && cos_bottom < 0.5);

        let edges = compute_concave_hull(&points, &HullConfig::default()).unwrap();
        assert_eq!(edge_ids(&edges), HashSet::from([(0, 4), (1, 4), (1, 2), (2, 3), (0, 3)]));
    }

    #[test]
    fn convex_ring_without_candidates_is_unchanged() {
        let nodes = Node::from_points(&[
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
        ]);
        let mut engine = HullEngine::new();
        engine.set_convex_hull(&nodes).unwrap();
        let convex = engine.convex_edges().to_vec();

        let concave = engine.set_concave_hull(1.0, 10.0).unwrap();
        assert_eq!(concave, convex.as_slice());
        assert_eq!(engine.state(), HullState::Stable);
    }

    #[test]
    fn concave_before_convex_is_rejected() {
        let mut engine = HullEngine::new();
        assert_eq!(engine.set_concave_hull(0.5, 1.0).unwrap_err(), HullError::ConvexHullMissing);

        engine.set_convex_hull(&random_cloud(1, 10)).unwrap();
        engine.clean_up();
        assert_eq!(engine.state(), HullState::Empty);
        assert_eq!(engine.set_concave_hull(0.5, 1.0).unwrap_err(), HullError::ConvexHullMissing);
    }

    #[test]
    fn invalid_input_leaves_engine_empty() {
        let mut engine = HullEngine::new();
        engine.set_convex_hull(&random_cloud(3, 12)).unwrap();

        let err = engine.set_convex_hull(&random_cloud(3, 2)).unwrap_err();
        assert_eq!(err, HullError::InvalidInput { count: 2 });
        assert_eq!(engine.state(), HullState::Empty);
        assert!(engine.convex_edges().is_empty());
        assert!(engine.unused_nodes().is_empty());
    }

    #[test]
    fn convex_nodes_are_not_unused() {
        let nodes = random_cloud(5, 60);
        let mut engine = HullEngine::new();
        engine.set_convex_hull(&nodes).unwrap();

        for edge in engine.convex_edges() {
            assert!(!engine.unused_nodes().contains(&edge.a));
            assert!(!engine.unused_nodes().contains(&edge.b));
        }
        assert_eq!(engine.unused_nodes().len() + engine.convex_edges().len(), nodes.len());
    }

    #[test]
    fn random_clouds_refine_to_simple_polygons() {
        for seed in 0..25 {
            let nodes = random_cloud(seed, 80);
            let mut engine = HullEngine::new();
            engine.set_convex_hull(&nodes).unwrap();
            let convex_len = engine.convex_edges().len();
            let unused_before = engine.unused_nodes().len();

            let edges = engine.set_concave_hull(0.6, 1.5).unwrap().to_vec();
            let consumed = unused_before - engine.unused_nodes().len();

            // One edge in, two out, per consumed node
            assert_eq!(edges.len(), convex_len + consumed);

            // Closed ring: every node has exactly two incident edges
            let mut degree: HashMap<usize, usize> = HashMap::new();
            for e in &edges {
                *degree.entry(e.a.id).or_default() += 1;
                *degree.entry(e.b.id).or_default() += 1;
            }
            assert!(degree.values().all(|&d| d == 2), "seed {}: open ring", seed);

            for (i, e1) in edges.iter().enumerate() {
                for e2 in &edges[i + 1..] {
                    if !e1.shares_node(e2) {
                        assert!(!segments_intersect(e1, e2), "seed {}: {:?} crosses {:?}", seed, e1, e2);
                    }
                }
            }

            for e in &edges {
                assert!(e.a.id < nodes.len() && e.b.id < nodes.len());
                assert!(!engine.unused_nodes().contains(&e.a));
                assert!(!engine.unused_nodes().contains(&e.b));
            }
        }
    }

    #[test]
    fn edges_sorted_longest_first() {
        let mut engine = HullEngine::new();
        engine.set_convex_hull(&random_cloud(11, 50)).unwrap();
        let edges = engine.set_concave_hull(0.3, 1.0).unwrap();

        for pair in edges.windows(2) {
            assert!(pair[0].length() >= pair[1].length());
        }
    }

    #[test]
    fn rerun_restarts_from_convex_ring() {
        let mut engine = HullEngine::new();
        engine.set_convex_hull(&random_cloud(9, 70)).unwrap();

        let detailed = engine.set_concave_hull(0.8, 2.0).unwrap().to_vec();
        let coarse = engine.set_concave_hull(-1.0, 2.0).unwrap().to_vec();
        let detailed_again = engine.set_concave_hull(0.8, 2.0).unwrap().to_vec();

        assert_eq!(coarse.len(), engine.convex_edges().len());
        assert_eq!(detailed, detailed_again);
        assert!(detailed.len() >= coarse.len());
    }
}

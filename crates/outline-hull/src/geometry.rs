//! Core geometry types for outline-hull.
//!
//! ## Rust Lesson #3: Identity vs. Value
//!
//! `Point` is a plain value: two points with the same coordinates are equal.
//! `Node` carries an `id` and equality looks ONLY at that id, which is what
//! the hull logic needs when it removes edges or asks "do these two edges
//! share a node?". We get that by writing `PartialEq`/`Hash` by hand instead
//! of deriving them.

use std::hash::{Hash, Hasher};

/// A 2D point with x,y coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A 3D vertex, y-up. Only used as input to the height filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A point with a stable identity, as consumed by the hull engine.
///
/// `id` is assigned once (usually the input index) and is the sole identity
/// key.
#[derive(Debug, Clone, Copy)]
pub struct Node {
    pub id: usize,
    pub x: f64,
    pub y: f64,
}

/// An edge between two nodes. Stored directed, compared by node identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub a: Node,
    pub b: Node,
}

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Point3 {
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl Node {
    #[inline]
    pub fn new(id: usize, x: f64, y: f64) -> Self {
        Self { id, x, y }
    }

    /// Coordinates of this node without its identity.
    #[inline]
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn distance(&self, other: &Node) -> f64 {
        self.point().distance(other.point())
    }

    /// Assign ids by input index.
    pub fn from_points(points: &[Point]) -> Vec<Node> {
        points
            .iter()
            .enumerate()
            .map(|(id, p)| Node::new(id, p.x, p.y))
            .collect()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Segment {
    #[inline]
    pub fn new(a: Node, b: Node) -> Self {
        Self { a, b }
    }

    /// Length of the segment.
    #[inline]
    pub fn length(&self) -> f64 {
        self.a.distance(&self.b)
    }

    /// True when any endpoint of `self` is the same node as any endpoint
    /// of `other`.
    #[inline]
    pub fn shares_node(&self, other: &Segment) -> bool {
        self.a == other.a || self.a == other.b || self.b == other.a || self.b == other.b
    }

    /// True when `node` is one of the endpoints.
    #[inline]
    pub fn touches(&self, node: &Node) -> bool {
        self.a == *node || self.b == *node
    }
}

/// Calculate signed area of a point sequence using the shoelace formula.
///
/// Returns:
/// - Positive value for counter-clockwise winding
/// - Negative value for clockwise winding
///
/// A closing duplicate point contributes nothing, so open and closed rings
/// give the same result.
pub fn signed_area_of_points(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x * points[j].y;
        area -= points[j].x * points[i].y;
    }
    area / 2.0
}

// ============================================================================
// TESTS
// ============================================================================

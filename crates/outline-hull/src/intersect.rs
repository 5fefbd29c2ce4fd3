//! Segment intersection using orientation tests.
//!
//! Shared endpoints are NOT special-cased here: two segments meeting at a
//! node intersect. Callers that want to ignore adjacent edges filter them by
//! node identity first (see [`Segment::shares_node`]).

use crate::geometry::{Point, Segment};

/// Cross products with a magnitude below this are treated as collinear.
const COLLINEAR_EPSILON: f64 = 1e-9;

/// Turn direction of an ordered triple of points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Collinear,
    Clockwise,
    CounterClockwise,
}

/// Orientation of the ordered triple `(p, q, r)`.
#[inline]
pub fn orientation(p: Point, q: Point, r: Point) -> Orientation {
    let val = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);

    if val.abs() < COLLINEAR_EPSILON {
        Orientation::Collinear
    } else if val > 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    }
}

/// Whether `q` lies in the bounding box of `p`–`r`. Only meaningful when the
/// three points are collinear.
#[inline]
pub fn on_segment(p: Point, q: Point, r: Point) -> bool {
    q.x >= p.x.min(r.x) && q.x <= p.x.max(r.x) && q.y >= p.y.min(r.y) && q.y <= p.y.max(r.y)
}

/// True if segments `p1`–`q1` and `p2`–`q2` intersect, touching included.
pub fn points_intersect(p1: Point, q1: Point, p2: Point, q2: Point) -> bool {
    let o1 = orientation(p1, q1, p2);
    let o2 = orientation(p1, q1, q2);
    let o3 = orientation(p2, q2, p1);
    let o4 = orientation(p2, q2, q1);

    // General case
    if o1 != o2 && o3 != o4 {
        return true;
    }

    // Collinear cases: the odd point has to sit on the other segment
    (o1 == Orientation::Collinear && on_segment(p1, p2, q1))
        || (o2 == Orientation::Collinear && on_segment(p1, q2, q1))
        || (o3 == Orientation::Collinear && on_segment(p2, p1, q2))
        || (o4 == Orientation::Collinear && on_segment(p2, q1, q2))
}

/// True if the two segments intersect.
#[inline]
pub fn segments_intersect(s1: &Segment, s2: &Segment) -> bool {
    points_intersect(s1.a.point(), s1.b.point(), s2.a.point(), s2.b.point())
}

//! Point cloud preparation for 3D vertex input.
//!
//! Vertices sampled from a 3D model include the whole body; the outline
//! usually only wants the top slice. [`filter_top_points`] keeps the
//! vertices near the top and flattens them onto the ground plane.

use crate::geometry::{Point, Point3};

/// Keep vertices whose height is within the top `threshold_percent` of the
/// height range and project them to `(x, z)`.
///
/// `threshold_percent` is clamped to `0..=1`: `0` keeps only the highest
/// vertices, `1` keeps everything.
pub fn filter_top_points(points: &[Point3], threshold_percent: f64) -> Vec<Point> {
    if points.is_empty() {
        return Vec::new();
    }

    let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
    let t = threshold_percent.clamp(0.0, 1.0);
    let threshold_y = max_y + (min_y - max_y) * t;

    points
        .iter()
        .filter(|p| p.y >= threshold_y)
        .map(|p| Point::new(p.x, p.z))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column() -> Vec<Point3> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 2.5, 1.0),
            Point3::new(2.0, 5.0, 2.0),
            Point3::new(3.0, 9.6, 3.0),
            Point3::new(4.0, 10.0, 4.0),
        ]
    }

    #[test]
    fn zero_threshold_keeps_only_the_top() {
        let top = filter_top_points(&column(), 0.0);
        assert_eq!(top, vec![Point::new(4.0, 4.0)]);
    }

    #[test]
    fn full_threshold_keeps_everything() {
        assert_eq!(filter_top_points(&column(), 1.0).len(), 5);
        // Out-of-range values clamp
        assert_eq!(filter_top_points(&column(), 3.0).len(), 5);
    }

    #[test]
    fn partial_threshold_keeps_top_slice() {
        // threshold y = 10 - 10 * 0.05 = 9.5
        let top = filter_top_points(&column(), 0.05);
        assert_eq!(top, vec![Point::new(3.0, 3.0), Point::new(4.0, 4.0)]);
    }

    #[test]
    fn projects_onto_ground_plane() {
        let pts = [Point3::new(7.0, 1.0, -3.0)];
        assert_eq!(filter_top_points(&pts, 0.0), vec![Point::new(7.0, -3.0)]);
    }

    #[test]
    fn empty_input() {
        assert!(filter_top_points(&[], 0.5).is_empty());
    }
}

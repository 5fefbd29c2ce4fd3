//! SVG input - collect every path vertex of a drawing as a point cloud.
//!
//! Uses usvg for complete SVG resolution (CSS, transforms, shapes converted
//! to paths) then walks the tree and gathers the vertices of all paths.
//!
//! ## Curve Flattening
//!
//! Bézier segments are flattened with lyon_geom so that curved outlines
//! contribute points along the curve, not just their endpoints.

use crate::geometry::Point;
use lyon_geom::{CubicBezierSegment, QuadraticBezierSegment, point};
use usvg::tiny_skia_path::PathSegment;

/// Error type for SVG input.
#[derive(thiserror::Error, Debug)]
pub enum SvgError {
    #[error("SVG parse error: {0}")]
    Parse(String),
    #[error("No path vertices found in SVG")]
    NoPoints,
}

/// Tolerance for curve flattening.
/// Lower = more points along curves.
const CURVE_TOLERANCE: f32 = 0.1;

/// Collect the vertices of every path in an SVG document.
///
/// Coordinates are in the SVG user space with all transforms applied.
/// Consecutive duplicates (closing points, flattening artifacts) are removed.
pub fn collect_points_from_svg(svg_content: &str) -> Result<Vec<Point>, SvgError> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg_content, &options).map_err(|e| SvgError::Parse(e.to_string()))?;

    let mut points = Vec::new();
    collect_from_group(tree.root(), &mut points);

    if points.is_empty() {
        Err(SvgError::NoPoints)
    } else {
        Ok(points)
    }
}

fn collect_from_group(group: &usvg::Group, points: &mut Vec<Point>) {
    for child in group.children() {
        match child {
            usvg::Node::Group(group) => collect_from_group(group, points),
            usvg::Node::Path(path) => collect_path_points(path, points),
            // Ignore text, images, etc.
            _ => {}
        }
    }
}

fn collect_path_points(path: &usvg::Path, out: &mut Vec<Point>) {
    // usvg paths are in local coordinates; bake the element transform in
    let transform = path.abs_transform();
    let mut local: Vec<(f32, f32)> = Vec::new();
    let mut subpath_start: usize = 0;
    let mut last: Option<(f32, f32)> = None;

    for segment in path.data().segments() {
        match segment {
            PathSegment::MoveTo(p) => {
                subpath_start = local.len();
                local.push((p.x, p.y));
                last = Some((p.x, p.y));
            }
            PathSegment::LineTo(p) => {
                local.push((p.x, p.y));
                last = Some((p.x, p.y));
            }
            PathSegment::QuadTo(ctrl, p) => {
                if let Some((lx, ly)) = last {
                    let curve = QuadraticBezierSegment {
                        from: point(lx, ly),
                        ctrl: point(ctrl.x, ctrl.y),
                        to: point(p.x, p.y),
                    };
                    curve.for_each_flattened(CURVE_TOLERANCE, &mut |line| {
                        local.push((line.to.x, line.to.y));
                    });
                } else {
                    local.push((p.x, p.y));
                }
                last = Some((p.x, p.y));
            }
            PathSegment::CubicTo(ctrl1, ctrl2, p) => {
                if let Some((lx, ly)) = last {
                    let curve = CubicBezierSegment {
                        from: point(lx, ly),
                        ctrl1: point(ctrl1.x, ctrl1.y),
                        ctrl2: point(ctrl2.x, ctrl2.y),
                        to: point(p.x, p.y),
                    };
                    curve.for_each_flattened(CURVE_TOLERANCE, &mut |line| {
                        local.push((line.to.x, line.to.y));
                    });
                } else {
                    local.push((p.x, p.y));
                }
                last = Some((p.x, p.y));
            }
            PathSegment::Close => {
                // Drop an explicit closing vertex that repeats the subpath start
                if let (Some(&first), Some(&end)) = (local.get(subpath_start), local.last()) {
                    if local.len() > subpath_start + 1 && same_vertex(&first, &end) {
                        local.pop();
                    }
                }
                last = local.get(subpath_start).copied();
            }
        }
    }

    local.dedup_by(|a, b| same_vertex(a, b));

    let mut mapped: Vec<usvg::tiny_skia_path::Point> = local
        .into_iter()
        .map(|(x, y)| usvg::tiny_skia_path::Point::from_xy(x, y))
        .collect();
    transform.map_points(&mut mapped);

    out.extend(mapped.into_iter().map(|p| Point::new(p.x as f64, p.y as f64)));
}

#[inline]
fn same_vertex(a: &(f32, f32), b: &(f32, f32)) -> bool {
    (a.0 - b.0).abs() < 1e-4 && (a.1 - b.1).abs() < 1e-4
}

// ============================================================================
// TESTS
// ============================================================================

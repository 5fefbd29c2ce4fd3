//! # outline-hull
//!
//! Concave outline generation for 2D point clouds.
//!
//! The pipeline:
//!
//! ```text
//! points -> convex_hull -> HullEngine (concave refinement) -> build_outline -> smooth_outline
//! ```
//!
//! ```
//! use outline_hull::{compute_concave_hull, build_outline, HullConfig, OutlineConfig, Point};
//!
//! let points = vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(10.0, 0.0),
//!     Point::new(10.0, 10.0),
//!     Point::new(0.0, 10.0),
//!     Point::new(5.0, 1.0),
//! ];
//! let config = HullConfig::default().with_concavity(0.9).with_scale_factor(2.0);
//! let edges = compute_concave_hull(&points, &config).unwrap();
//! let outline = build_outline(&edges, &OutlineConfig::default());
//!
//! assert_eq!(edges.len(), 5);
//! assert!(outline.is_closed());
//! ```
//!
//! ## Rust Lesson #7: Modules
//!
//! Every module is declared explicitly with `mod`. `pub use` re-exports the
//! common types at the crate root so callers can write
//! `outline_hull::Point` instead of `outline_hull::geometry::Point`.

pub mod convex;
pub mod error;
pub mod extrude;
pub mod filter;
pub mod geometry;
pub mod hull;
pub mod intersect;
pub mod outline;
pub mod refine;
pub mod svg;

// Re-export common types at crate root for convenience.
pub use convex::{convex_hull, distinct_nodes, ring_to_segments};
pub use error::HullError;
pub use extrude::{extrude_outline, ExtrusionConfig, WallMesh};
pub use filter::filter_top_points;
pub use geometry::{signed_area_of_points, Node, Point, Point3, Segment};
pub use hull::{compute_concave_hull, HullConfig, HullEngine, HullState};
pub use intersect::{orientation, points_intersect, segments_intersect, Orientation};
pub use outline::{build_outline, smooth_outline, Outline, OutlineConfig, OutlineStats};
pub use refine::{angle_cosine, collides_with_boundary, divide_segment, nearby_points};
pub use svg::{collect_points_from_svg, SvgError};

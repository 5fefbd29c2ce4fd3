//! Error types for hull construction.

/// Errors raised while building a hull.
///
/// Degenerate geometry inside the refinement step and disconnected edge sets
/// during outline reconstruction are not errors: the first yields a neutral
/// cosine, the second an [`Outline`](crate::outline::Outline) flagged as
/// incomplete.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HullError {
    /// Fewer than three points cannot form a polygon.
    #[error("at least 3 points are required to compute a hull, got {count}")]
    InvalidInput { count: usize },

    /// An ordered ring given directly needs three distinct vertices.
    #[error("an ordered ring needs at least 3 points, got {count}")]
    RingTooShort { count: usize },

    /// The concave pass was requested before a convex hull was built.
    #[error("concave refinement requires a convex hull; call set_convex_hull first")]
    ConvexHullMissing,
}

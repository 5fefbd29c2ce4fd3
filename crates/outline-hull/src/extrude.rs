//! Flat wall extrusion of an outline.
//!
//! Turns a ring of 2D points into a vertical strip of quads, two triangles
//! per outline edge. Vertices are lifted to `(x, height, y)` with y up, the
//! usual convention for collider meshes. No caps, no shared vertices.

use crate::geometry::Point;

/// Extrusion parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtrusionConfig {
    /// Height of the top edge. Default: 0.1
    pub top_offset: f64,
    /// Wall height below the top edge. Default: 1.0
    pub thickness: f64,
    /// Reverse triangle winding (faces point the other way).
    pub flip_faces: bool,
}

impl Default for ExtrusionConfig {
    fn default() -> Self {
        Self {
            top_offset: 0.1,
            thickness: 1.0,
            flip_faces: false,
        }
    }
}

impl ExtrusionConfig {
    pub fn with_top_offset(mut self, top_offset: f64) -> Self {
        self.top_offset = top_offset;
        self
    }

    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn with_flip_faces(mut self, flip_faces: bool) -> Self {
        self.flip_faces = flip_faces;
        self
    }
}

/// Triangle soup for the wall strip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WallMesh {
    pub vertices: Vec<[f64; 3]>,
    pub triangles: Vec<[u32; 3]>,
}

/// Extrude a ring into a wall strip.
///
/// `outline` is treated as cyclic: the last point connects back to the
/// first. Pass an open ring ([`Outline::open_ring`](crate::outline::Outline::open_ring))
/// to avoid a zero-width quad at the seam.
pub fn extrude_outline(outline: &[Point], config: &ExtrusionConfig) -> WallMesh {
    let n = outline.len();
    if n < 2 {
        return WallMesh::default();
    }

    let top = config.top_offset;
    let bottom = config.top_offset - config.thickness;

    let mut mesh = WallMesh {
        vertices: Vec::with_capacity(n * 4),
        triangles: Vec::with_capacity(n * 2),
    };

    for i in 0..n {
        let a = outline[i];
        let b = outline[(i + 1) % n];

        let start = mesh.vertices.len() as u32;
        mesh.vertices.push([a.x, top, a.y]);
        mesh.vertices.push([b.x, top, b.y]);
        mesh.vertices.push([a.x, bottom, a.y]);
        mesh.vertices.push([b.x, bottom, b.y]);

        if config.flip_faces {
            mesh.triangles.push([start, start + 1, start + 2]);
            mesh.triangles.push([start + 1, start + 3, start + 2]);
        } else {
            mesh.triangles.push([start + 2, start + 1, start]);
            mesh.triangles.push([start + 2, start + 3, start + 1]);
        }
    }

    mesh
}

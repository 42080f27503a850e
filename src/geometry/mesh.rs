// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Half-edge mesh records
//!
//! All records live in flat arenas owned by [`Mesh`]; cross-references are
//! indices into those arenas. A `Mesh` can only be obtained from the builder,
//! so every instance satisfies the half-edge invariants.

use nalgebra::Point3;
use serde::Serialize;

/// Mesh vertex
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Vertex {
    /// Position (finite coordinates)
    pub position: Point3<f64>,
    /// 0-based index, matches input order
    pub index: usize,
    /// One outgoing half-edge. `None` only for vertices no triangle references.
    pub halfedge: Option<usize>,
}

impl Vertex {
    pub fn new(position: Point3<f64>, index: usize) -> Self {
        Self {
            position,
            index,
            halfedge: None,
        }
    }
}

/// Triangle face, represented by one half-edge on its loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Face {
    pub halfedge: usize,
}

/// Directed half of an undirected edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HalfEdge {
    /// Vertex this half-edge leaves; the destination is `next.origin`
    pub origin: usize,
    /// Oppositely directed half-edge on the same edge
    pub twin: usize,
    /// Next half-edge around the face or boundary loop
    pub next: usize,
    /// Previous half-edge around the face or boundary loop
    pub prev: usize,
    /// Bounded face, `None` for boundary half-edges
    pub face: Option<usize>,
}

impl HalfEdge {
    pub fn is_boundary(&self) -> bool {
        self.face.is_none()
    }
}

/// Anything that names a vertex of a mesh: an index or the record itself
pub trait VertexRef {
    fn vertex_index(&self) -> usize;
}

impl VertexRef for usize {
    fn vertex_index(&self) -> usize {
        *self
    }
}

impl VertexRef for Vertex {
    fn vertex_index(&self) -> usize {
        self.index
    }
}

impl VertexRef for &Vertex {
    fn vertex_index(&self) -> usize {
        self.index
    }
}

/// Half-edge triangle mesh.
///
/// Interior half-edges of face `f` occupy indices `3f..3f+3`; synthesized
/// boundary half-edges follow after all interior ones.
#[derive(Debug, Clone, Serialize)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    halfedges: Vec<HalfEdge>,
    faces: Vec<Face>,
}

impl Mesh {
    /// Assemble a mesh from fully linked arenas. Only the builder calls this.
    pub(crate) fn from_parts(
        vertices: Vec<Vertex>,
        halfedges: Vec<HalfEdge>,
        faces: Vec<Face>,
    ) -> Self {
        Self {
            vertices,
            halfedges,
            faces,
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn halfedges(&self) -> &[HalfEdge] {
        &self.halfedges
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn vertex(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    pub fn halfedge(&self, index: usize) -> Option<&HalfEdge> {
        self.halfedges.get(index)
    }

    pub fn face(&self, index: usize) -> Option<&Face> {
        self.faces.get(index)
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get half-edge count (interior and boundary)
    pub fn halfedge_count(&self) -> usize {
        self.halfedges.len()
    }

    /// Get face count
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Vertex positions in index order
    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.vertices.iter().map(|v| v.position).collect()
    }

    /// Upper bound on loop iterations for traversal guards
    pub(crate) fn traversal_budget(&self) -> usize {
        self.halfedges.len() * 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_ref_accepts_index_and_record() {
        let v = Vertex::new(Point3::new(1.0, 2.0, 3.0), 7);
        assert_eq!(7usize.vertex_index(), 7);
        assert_eq!(v.vertex_index(), 7);
        assert_eq!((&v).vertex_index(), 7);
        assert!(v.halfedge.is_none());
    }

    #[test]
    fn test_boundary_flag() {
        let he = HalfEdge {
            origin: 0,
            twin: 1,
            next: 2,
            prev: 3,
            face: None,
        };
        assert!(he.is_boundary());
        assert!(!HalfEdge { face: Some(0), ..he }.is_boundary());
    }
}

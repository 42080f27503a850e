// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Read-only traversal queries over a built mesh
//!
//! Loop guards in this module only trip on a structure that violates the
//! half-edge invariants; they log a warning and return what was collected.

use super::mesh::{Mesh, Vertex, VertexRef};

impl Mesh {
    /// Destination vertex of a half-edge (`next.origin`)
    pub fn halfedge_destination(&self, halfedge: usize) -> usize {
        let he = &self.halfedges()[halfedge];
        self.halfedges()[he.next].origin
    }

    /// Half-edges of a face in loop order, starting at its representative
    pub fn face_halfedges(&self, face: usize) -> Vec<usize> {
        let start = self.faces()[face].halfedge;
        let budget = self.traversal_budget();
        let mut out = Vec::with_capacity(3);
        let mut he = start;

        loop {
            out.push(he);
            he = self.halfedges()[he].next;
            if he == start {
                break;
            }
            if out.len() > budget {
                log::warn!("face {} loop does not close", face);
                break;
            }
        }
        out
    }

    /// Vertices of a face in loop order. Always three on a built mesh.
    ///
    /// # Panics
    /// Panics if `face` is out of range.
    pub fn face_vertices(&self, face: usize) -> Vec<&Vertex> {
        self.face_halfedges(face)
            .into_iter()
            .map(|he| &self.vertices()[self.halfedges()[he].origin])
            .collect()
    }

    /// Vertex index triple of every face, in face creation order
    pub fn to_face_indices(&self) -> Vec<[usize; 3]> {
        self.faces()
            .iter()
            .map(|face| {
                let he = &self.halfedges()[face.halfedge];
                let next = &self.halfedges()[he.next];
                let last = &self.halfedges()[next.next];
                [he.origin, next.origin, last.origin]
            })
            .collect()
    }

    /// Neighbors of a vertex, found by rotating around it (`he = he.twin.next`)
    /// from its representative outgoing half-edge.
    ///
    /// For a manifold vertex this is every adjacent vertex in rotation order.
    /// A vertex where several fans meet only reports the fan containing its
    /// representative half-edge. Isolated vertices have no neighbors.
    ///
    /// # Panics
    /// Panics if the vertex index is out of range.
    pub fn vertex_neighbors(&self, vertex: impl VertexRef) -> Vec<&Vertex> {
        let index = vertex.vertex_index();
        let Some(start) = self.vertices()[index].halfedge else {
            return Vec::new();
        };

        let budget = self.traversal_budget();
        let mut out = Vec::new();
        let mut he = start;
        let mut steps = 0usize;

        loop {
            out.push(&self.vertices()[self.halfedge_destination(he)]);
            he = self.halfedges()[self.halfedges()[he].twin].next;
            steps += 1;
            if he == start {
                break;
            }
            if steps > budget {
                log::warn!("rotation around vertex {} does not close", index);
                break;
            }
        }
        out
    }

    /// True if the half-edge or its twin lies on the boundary
    pub fn is_boundary_edge(&self, halfedge: usize) -> bool {
        let he = &self.halfedges()[halfedge];
        he.face.is_none() || self.halfedges()[he.twin].face.is_none()
    }

    /// True if a boundary half-edge leaves the vertex. Rotates around the
    /// vertex like [`Mesh::vertex_neighbors`]; isolated vertices are not
    /// boundary vertices.
    pub fn is_boundary_vertex(&self, vertex: impl VertexRef) -> bool {
        let index = vertex.vertex_index();
        let Some(start) = self.vertices()[index].halfedge else {
            return false;
        };

        let budget = self.traversal_budget();
        let mut he = start;
        let mut steps = 0usize;

        loop {
            if self.halfedges()[he].face.is_none() {
                return true;
            }
            he = self.halfedges()[self.halfedges()[he].twin].next;
            steps += 1;
            if he == start {
                return false;
            }
            if steps > budget {
                log::warn!("rotation around vertex {} does not close", index);
                return false;
            }
        }
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.halfedge_count() / 2
    }

    /// Number of undirected edges on the boundary
    pub fn boundary_edge_count(&self) -> usize {
        self.halfedges().iter().filter(|he| he.face.is_none()).count()
    }

    /// V - E + F
    pub fn euler_characteristic(&self) -> i64 {
        self.vertex_count() as i64 - self.edge_count() as i64 + self.face_count() as i64
    }

    /// Boundary loops, each as the ordered boundary half-edges along `next`
    pub fn boundary_loops(&self) -> Vec<Vec<usize>> {
        let mut visited = vec![false; self.halfedge_count()];
        let mut loops = Vec::new();

        for (start, he) in self.halfedges().iter().enumerate() {
            if he.face.is_some() || visited[start] {
                continue;
            }

            let mut boundary_loop = Vec::new();
            let mut cur = start;
            while !visited[cur] {
                visited[cur] = true;
                boundary_loop.push(cur);
                cur = self.halfedges()[cur].next;
            }
            if cur != start {
                log::warn!("boundary loop from half-edge {} does not close", start);
            }
            loops.push(boundary_loop);
        }

        log::debug!("found {} boundary loops", loops.len());
        loops
    }
}

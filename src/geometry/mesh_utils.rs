// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh validation utilities
//!
//! Soup checks run on raw triangle lists before building; [`audit`] re-checks
//! the half-edge invariants of a built mesh.

use super::Mesh;
use ahash::AHashMap;
use serde::Serialize;
use std::fmt;

/// Edge representation for connectivity checking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Edge {
    v0: usize,
    v1: usize,
}

impl Edge {
    fn new(v0: usize, v1: usize) -> Self {
        // Smaller index first for consistent hashing
        if v0 < v1 {
            Self { v0, v1 }
        } else {
            Self { v0: v1, v1: v0 }
        }
    }
}

fn triangle_edges(t: &[usize; 3]) -> [(usize, usize); 3] {
    [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])]
}

fn edge_counts(triangles: &[[usize; 3]]) -> AHashMap<Edge, u32> {
    let mut counts: AHashMap<Edge, u32> = AHashMap::new();
    for triangle in triangles {
        for (a, b) in triangle_edges(triangle) {
            *counts.entry(Edge::new(a, b)).or_insert(0) += 1;
        }
    }
    counts
}

/// Check if a triangle soup is edge-manifold (each edge shared by at most 2 triangles)
pub fn is_manifold(triangles: &[[usize; 3]]) -> bool {
    edge_counts(triangles).values().all(|&count| count <= 2)
}

/// Check if a triangle soup is closed (each edge shared by exactly 2 triangles)
pub fn is_closed(triangles: &[[usize; 3]]) -> bool {
    !triangles.is_empty() && edge_counts(triangles).values().all(|&count| count == 2)
}

/// Check that no directed edge is used twice, i.e. triangles sharing an edge
/// traverse it in opposite directions.
pub fn is_consistently_oriented(triangles: &[[usize; 3]]) -> bool {
    let mut seen: AHashMap<(usize, usize), usize> = AHashMap::new();
    for triangle in triangles {
        for directed in triangle_edges(triangle) {
            let count = seen.entry(directed).or_insert(0);
            *count += 1;
            if *count > 1 {
                return false;
            }
        }
    }
    true
}

/// A violated half-edge invariant found by [`audit`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TopologyIssue {
    /// `h.twin.twin != h`
    TwinAsymmetry { halfedge: usize },
    /// Twin does not run in the opposite direction
    TwinNotOpposite { halfedge: usize },
    /// `h.next.prev != h` or `h.prev.next != h`
    BrokenLoop { halfedge: usize },
    /// Interior loop is not a triangle
    NonTriangularFace { face: usize },
    /// Face representative does not bound the face
    FaceMismatch { face: usize },
    /// Vertex representative does not leave the vertex
    VertexMismatch { vertex: usize },
}

impl fmt::Display for TopologyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TwinAsymmetry { halfedge } => {
                write!(f, "half-edge {} is not its twin's twin", halfedge)
            }
            Self::TwinNotOpposite { halfedge } => {
                write!(f, "half-edge {} and its twin run the same way", halfedge)
            }
            Self::BrokenLoop { halfedge } => {
                write!(f, "next/prev links around half-edge {} disagree", halfedge)
            }
            Self::NonTriangularFace { face } => write!(f, "face {} is not a triangle", face),
            Self::FaceMismatch { face } => {
                write!(f, "face {} representative belongs to another face", face)
            }
            Self::VertexMismatch { vertex } => {
                write!(f, "vertex {} representative does not leave it", vertex)
            }
        }
    }
}

/// Re-verify the structural invariants of a built mesh
pub fn audit(mesh: &Mesh) -> Vec<TopologyIssue> {
    let hes = mesh.halfedges();
    let mut issues = Vec::new();

    for (index, he) in hes.iter().enumerate() {
        if hes[he.twin].twin != index {
            issues.push(TopologyIssue::TwinAsymmetry { halfedge: index });
        }
        if hes[he.twin].origin != hes[he.next].origin {
            issues.push(TopologyIssue::TwinNotOpposite { halfedge: index });
        }
        if hes[he.next].prev != index || hes[he.prev].next != index {
            issues.push(TopologyIssue::BrokenLoop { halfedge: index });
        }
    }

    for (index, face) in mesh.faces().iter().enumerate() {
        let start = face.halfedge;
        if hes[start].face != Some(index) {
            issues.push(TopologyIssue::FaceMismatch { face: index });
        }
        let third = hes[hes[start].next].next;
        let closes = hes[third].next == start;
        let same_face = [hes[start].next, third]
            .iter()
            .all(|&he| hes[he].face == Some(index));
        if !closes || !same_face {
            issues.push(TopologyIssue::NonTriangularFace { face: index });
        }
    }

    for vertex in mesh.vertices() {
        if let Some(he) = vertex.halfedge {
            if hes[he].origin != vertex.index {
                issues.push(TopologyIssue::VertexMismatch {
                    vertex: vertex.index,
                });
            }
        }
    }

    issues
}

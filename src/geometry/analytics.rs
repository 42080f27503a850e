// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Topology statistics

use super::Mesh;
use serde::{Deserialize, Serialize};

/// Counts and summary figures for a built mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshStats {
    pub vertex_count: usize,
    pub face_count: usize,
    pub halfedge_count: usize,
    /// Undirected edges
    pub edge_count: usize,
    pub boundary_edge_count: usize,
    pub boundary_loop_count: usize,
    /// Vertices no face references
    pub isolated_vertex_count: usize,
    /// V - E + F
    pub euler_characteristic: i64,
    /// No boundary edges and at least one face
    pub is_closed: bool,
    /// Bounding box [min_x, min_y, min_z, max_x, max_y, max_z]
    pub bbox: [f64; 6],
}

impl MeshStats {
    /// Pretty print statistics
    pub fn print(&self) {
        println!("╔══════════════════════════════════════════════╗");
        println!("║              MESH TOPOLOGY                   ║");
        println!("╠══════════════════════════════════════════════╣");
        println!("║ Vertices:          {:>10}                ║", self.vertex_count);
        println!("║ Faces:             {:>10}                ║", self.face_count);
        println!("║ Edges:             {:>10}                ║", self.edge_count);
        println!("║ Half-edges:        {:>10}                ║", self.halfedge_count);
        println!("║ Boundary edges:    {:>10}                ║", self.boundary_edge_count);
        println!("║ Boundary loops:    {:>10}                ║", self.boundary_loop_count);
        println!("║ Isolated vertices: {:>10}                ║", self.isolated_vertex_count);
        println!("║ Euler (V-E+F):     {:>10}                ║", self.euler_characteristic);
        println!(
            "║ Closed:            {:>10}                ║",
            if self.is_closed { "yes" } else { "no" }
        );
        println!("║                                              ║");
        println!(
            "║ BBox min: ({:>8.3}, {:>8.3}, {:>8.3})       ║",
            self.bbox[0], self.bbox[1], self.bbox[2]
        );
        println!(
            "║ BBox max: ({:>8.3}, {:>8.3}, {:>8.3})       ║",
            self.bbox[3], self.bbox[4], self.bbox[5]
        );
        println!("╚══════════════════════════════════════════════╝");
    }
}

fn bounding_box(mesh: &Mesh) -> [f64; 6] {
    if mesh.vertices().is_empty() {
        return [0.0; 6];
    }

    let mut bbox = [
        f64::INFINITY,
        f64::INFINITY,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::NEG_INFINITY,
        f64::NEG_INFINITY,
    ];
    for vertex in mesh.vertices() {
        for axis in 0..3 {
            bbox[axis] = bbox[axis].min(vertex.position[axis]);
            bbox[axis + 3] = bbox[axis + 3].max(vertex.position[axis]);
        }
    }
    bbox
}

/// Compute statistics for a mesh
pub fn analyze(mesh: &Mesh) -> MeshStats {
    let boundary_edge_count = mesh.boundary_edge_count();

    MeshStats {
        vertex_count: mesh.vertex_count(),
        face_count: mesh.face_count(),
        halfedge_count: mesh.halfedge_count(),
        edge_count: mesh.edge_count(),
        boundary_edge_count,
        boundary_loop_count: mesh.boundary_loops().len(),
        isolated_vertex_count: mesh
            .vertices()
            .iter()
            .filter(|v| v.halfedge.is_none())
            .count(),
        euler_characteristic: mesh.euler_characteristic(),
        is_closed: boundary_edge_count == 0 && !mesh.is_empty(),
        bbox: bounding_box(mesh),
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - half-edge mesh representation and queries

mod analytics;
mod halfedge;
mod mesh;
mod mesh_utils;
mod traversal;

pub use analytics::{analyze, MeshStats};
pub use halfedge::build;
pub use mesh::{Face, HalfEdge, Mesh, Vertex, VertexRef};
pub use mesh_utils::{audit, is_closed, is_consistently_oriented, is_manifold, TopologyIssue};

// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geomod half-edge kernel
//!
//! Reconstructs half-edge adjacency from triangle soups and OBJ files and
//! provides read-only traversal over the result.

pub mod config;
pub mod error;
pub mod geometry;
pub mod io;

pub use error::{Error, ParseError, Result, TopologyError};
pub use geometry::{analyze, build, Face, HalfEdge, Mesh, MeshStats, Vertex, VertexRef};
pub use io::{import_obj_file, load_obj, load_obj_str, parse_obj, ObjData};

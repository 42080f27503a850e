// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for ingestion and topology construction

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading the OBJ text format.
/// Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: invalid number `{token}`")]
    InvalidNumber { line: usize, token: String },

    #[error("line {line}: position record needs 3 coordinates, found {found}")]
    MissingCoordinates { line: usize, found: usize },

    #[error("line {line}: coordinate `{token}` is not finite")]
    NonFiniteCoordinate { line: usize, token: String },

    #[error("line {line}: invalid vertex reference `{token}`")]
    InvalidVertexReference { line: usize, token: String },

    #[error("line {line}: vertex reference {reference} out of range ({available} positions)")]
    ReferenceOutOfRange {
        line: usize,
        reference: i64,
        available: usize,
    },

    #[error("line {line}: polygon needs at least 3 vertices, found {found}")]
    TooFewVertices { line: usize, found: usize },

    #[error("malformed OBJ source: {0}")]
    Syntax(#[from] Box<pest::error::Error<crate::io::Rule>>),
}

/// Errors raised by the topology builder. Any of these aborts the whole build.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopologyError {
    #[error("face {face} has {count} vertex indices, expected 3")]
    Arity { face: usize, count: usize },

    #[error("face {face} references vertex {vertex}, but only {vertex_count} vertices exist")]
    VertexIndexOutOfRange {
        face: usize,
        vertex: usize,
        vertex_count: usize,
    },

    #[error("face {face} repeats a vertex: {indices:?}")]
    DegenerateTriangle { face: usize, indices: [usize; 3] },

    #[error("vertex {vertex} has a non-finite position")]
    NonFinitePosition { vertex: usize },

    #[error("non-manifold edge ({}, {}) is shared by {count} triangles", key.0, key.1)]
    NonManifoldEdge { key: (usize, usize), count: usize },

    #[error("boundary linking failed at half-edge {halfedge}: {reason}")]
    BoundaryLink { halfedge: usize, reason: String },
}

/// Top-level library error
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Topology(#[from] TopologyError),
}

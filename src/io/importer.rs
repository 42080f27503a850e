// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! OBJ file importer

use super::parser::{parse_obj, ObjData};
use crate::error::{Error, Result};
use crate::geometry::Mesh;
use std::fs;
use std::path::Path;

/// Read an OBJ file into positions and triangles without building topology
pub fn import_obj_file(path: impl AsRef<Path>) -> Result<ObjData> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!("read {} bytes from {}", source.len(), path.display());
    Ok(parse_obj(&source)?)
}

/// Parse OBJ source and build a half-edge mesh from it
pub fn load_obj_str(source: &str) -> Result<Mesh> {
    let data = parse_obj(source)?;
    Ok(Mesh::build(&data.positions, &data.triangles)?)
}

/// Load an OBJ file and build a half-edge mesh from it
pub fn load_obj(path: impl AsRef<Path>) -> Result<Mesh> {
    let data = import_obj_file(path)?;
    Ok(Mesh::build(&data.positions, &data.triangles)?)
}

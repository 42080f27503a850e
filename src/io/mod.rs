// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - OBJ parsing and importing

mod importer;
mod parser;

pub use importer::{import_obj_file, load_obj, load_obj_str};
pub use parser::{parse_obj, resolve_reference, triangulate_fan, ObjData, Rule};

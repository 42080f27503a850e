// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Wavefront OBJ parser using pest
//!
//! Only `v` (position) and `f` (polygon) records are interpreted; every other
//! record kind is skipped. Polygons are fan-triangulated.

use crate::error::ParseError;
use nalgebra::Point3;
use pest::Parser;
use pest_derive::Parser;
use serde::Serialize;

#[derive(Parser)]
#[grammar = "io/obj.pest"]
struct ObjParser;

/// Positions and triangles read from OBJ source, indices 0-based
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ObjData {
    pub positions: Vec<Point3<f64>>,
    pub triangles: Vec<[usize; 3]>,
    /// Polygon records read, before triangulation
    pub polygon_count: usize,
}

/// Parse OBJ source into positions and fan-triangulated faces
pub fn parse_obj(source: &str) -> Result<ObjData, ParseError> {
    let mut pairs = ObjParser::parse(Rule::obj, source).map_err(Box::new)?;
    let mut data = ObjData::default();

    let Some(obj) = pairs.next() else {
        return Ok(data);
    };

    for record in obj.into_inner() {
        if record.as_rule() != Rule::record {
            continue;
        }

        // Pair::line_col uses the parser's line index, Position::line_col rescans
        let line = record.line_col().0;
        let mut tokens = record.into_inner().map(|pair| pair.as_str());

        match tokens.next() {
            Some("v") => {
                let position = parse_position(line, tokens)?;
                data.positions.push(position);
            }
            Some("f") => {
                let polygon = parse_polygon(line, tokens, data.positions.len())?;
                triangulate_fan(&polygon, &mut data.triangles);
                data.polygon_count += 1;
            }
            Some(other) => log::trace!("line {}: skipping `{}` record", line, other),
            None => {}
        }
    }

    log::debug!(
        "parsed {} positions, {} polygons ({} triangles)",
        data.positions.len(),
        data.polygon_count,
        data.triangles.len()
    );
    Ok(data)
}

fn parse_position<'a>(
    line: usize,
    fields: impl Iterator<Item = &'a str>,
) -> Result<Point3<f64>, ParseError> {
    // Trailing fields (the optional `w`, vertex colors) are ignored
    let fields: Vec<&str> = fields.collect();
    if fields.len() < 3 {
        return Err(ParseError::MissingCoordinates {
            line,
            found: fields.len(),
        });
    }

    let mut coords = [0.0f64; 3];
    for (slot, token) in coords.iter_mut().zip(&fields) {
        let value: f64 = token.parse().map_err(|_| ParseError::InvalidNumber {
            line,
            token: token.to_string(),
        })?;
        if !value.is_finite() {
            return Err(ParseError::NonFiniteCoordinate {
                line,
                token: token.to_string(),
            });
        }
        *slot = value;
    }

    Ok(Point3::new(coords[0], coords[1], coords[2]))
}

fn parse_polygon<'a>(
    line: usize,
    fields: impl Iterator<Item = &'a str>,
    available: usize,
) -> Result<Vec<usize>, ParseError> {
    let polygon = fields
        .map(|token| parse_vertex_reference(line, token, available))
        .collect::<Result<Vec<_>, _>>()?;

    if polygon.len() < 3 {
        return Err(ParseError::TooFewVertices {
            line,
            found: polygon.len(),
        });
    }
    Ok(polygon)
}

/// Parse one `v/vt/vn` token; only the position reference is kept
fn parse_vertex_reference(line: usize, token: &str, available: usize) -> Result<usize, ParseError> {
    let head = token.split('/').next().unwrap_or(token);
    let reference: i64 = head
        .parse()
        .map_err(|_| ParseError::InvalidVertexReference {
            line,
            token: token.to_string(),
        })?;

    resolve_reference(reference, available).ok_or(ParseError::ReferenceOutOfRange {
        line,
        reference,
        available,
    })
}

/// Convert a 1-based or negative (relative to the end) reference to a 0-based
/// index. Positive references are not range-checked here, the builder does that.
pub fn resolve_reference(reference: i64, available: usize) -> Option<usize> {
    match reference {
        0 => None,
        r if r > 0 => usize::try_from(r - 1).ok(),
        r => usize::try_from(available as i64 + r).ok(),
    }
}

/// Split a polygon into triangles `(v0, vi, vi+1)`, keeping the original winding
pub fn triangulate_fan(polygon: &[usize], out: &mut Vec<[usize; 3]>) {
    if polygon.len() < 3 {
        return;
    }
    let first = polygon[0];
    for pair in polygon[1..].windows(2) {
        out.push([first, pair[0], pair[1]]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_triangle() {
        let data = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        assert_eq!(data.positions.len(), 3);
        assert_eq!(data.positions[1], Point3::new(1.0, 0.0, 0.0));
        assert_eq!(data.triangles, vec![[0, 1, 2]]);
        assert_eq!(data.polygon_count, 1);
    }

    #[test]
    fn test_quad_fan_triangulation() {
        let mut out = Vec::new();
        triangulate_fan(&[0, 1, 2, 3], &mut out);
        assert_eq!(out, vec![[0, 1, 2], [0, 2, 3]]);

        let mut pentagon = Vec::new();
        triangulate_fan(&[4, 3, 2, 1, 0], &mut pentagon);
        assert_eq!(pentagon, vec![[4, 3, 2], [4, 2, 1], [4, 1, 0]]);
    }

    #[test]
    fn test_negative_reference() {
        assert_eq!(resolve_reference(-1, 5), Some(4));
        assert_eq!(resolve_reference(-5, 5), Some(0));
        assert_eq!(resolve_reference(-6, 5), None);
        assert_eq!(resolve_reference(1, 5), Some(0));
        assert_eq!(resolve_reference(0, 5), None);
    }

    #[test]
    fn test_slash_attributes_comments_and_unknown_records() {
        let source = "# header\r\n\
                      mtllib scene.mtl\r\n\
                      v 0 0 0\r\n\
                      v 1 0 0 1.0\r\n\
                      \r\n\
                      v 0 1 0 # apex\r\n\
                      vt 0.5 0.5\r\n\
                      vn 0 0 1\r\n\
                      f 1/1/1 2//1 -1/1\r\n";
        let data = parse_obj(source).unwrap();
        assert_eq!(data.positions.len(), 3);
        assert_eq!(data.triangles, vec![[0, 1, 2]]);
    }

    #[test]
    fn test_leading_whitespace_and_missing_final_newline() {
        let data = parse_obj("  v 0 0 0\n\tv 1 0 0\nv 0 1 0\nf 1 2 3").unwrap();
        assert_eq!(data.triangles, vec![[0, 1, 2]]);
    }

    #[test]
    fn test_empty_source() {
        let data = parse_obj("").unwrap();
        assert!(data.positions.is_empty());
        assert!(data.triangles.is_empty());
    }

    #[test]
    fn test_malformed_number_reports_line() {
        let err = parse_obj("v 0 0 0\nv 1 abc 0\n").unwrap_err();
        match err {
            ParseError::InvalidNumber { line, token } => {
                assert_eq!(line, 2);
                assert_eq!(token, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_coordinates() {
        let err = parse_obj("v 1 2\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingCoordinates { line: 1, found: 2 }));
    }

    #[test]
    fn test_non_finite_coordinate() {
        let err = parse_obj("v 1 inf 0\n").unwrap_err();
        assert!(matches!(err, ParseError::NonFiniteCoordinate { line: 1, .. }));
    }

    #[test]
    fn test_bad_references() {
        let source = "v 0 0 0\nv 1 0 0\nv 0 1 0\n";
        assert!(matches!(
            parse_obj(&format!("{source}f 1 x 3\n")).unwrap_err(),
            ParseError::InvalidVertexReference { line: 4, .. }
        ));
        assert!(matches!(
            parse_obj(&format!("{source}f 0 1 2\n")).unwrap_err(),
            ParseError::ReferenceOutOfRange { line: 4, reference: 0, available: 3 }
        ));
        assert!(matches!(
            parse_obj(&format!("{source}f -4 1 2\n")).unwrap_err(),
            ParseError::ReferenceOutOfRange { reference: -4, .. }
        ));
    }

    fn grid_source(n: usize) -> String {
        let mut source = String::new();
        for j in 0..=n {
            for i in 0..=n {
                source.push_str(&format!("v {} {} 0\n", i, j));
            }
        }
        for j in 0..n {
            for i in 0..n {
                let a = j * (n + 1) + i + 1;
                source.push_str(&format!("f {} {} {} {}\n", a, a + 1, a + n + 2, a + n + 1));
            }
        }
        source
    }

    #[test]
    fn test_error_line_deep_in_file() {
        let mut source = grid_source(40);
        let lines = source.lines().count();
        source.push_str("v 1 2 oops\n");
        let err = parse_obj(&source).unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { line, .. } if line == lines + 1));
    }

    #[test]
    fn test_parse_time_scales_linearly() {
        fn fastest(source: &str) -> std::time::Duration {
            (0..3)
                .map(|_| {
                    let start = std::time::Instant::now();
                    parse_obj(source).unwrap();
                    start.elapsed()
                })
                .min()
                .unwrap()
        }

        // 3281 and 12961 lines; a quadratic parser takes ~16x longer on the second
        let small = fastest(&grid_source(40));
        let large = fastest(&grid_source(80));
        let ratio = large.as_secs_f64() / small.as_secs_f64().max(1e-6);
        assert!(ratio < 10.0, "4x input took {:.1}x longer", ratio);
    }

    #[test]
    fn test_too_few_vertices() {
        let err = parse_obj("v 0 0 0\nv 1 0 0\nf 1 2\n").unwrap_err();
        assert!(matches!(err, ParseError::TooFewVertices { line: 3, found: 2 }));
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Half-edge topology builder
//!
//! Reconstructs full adjacency from a triangle soup: one half-edge loop per
//! triangle, twins matched through an undirected edge index, boundary
//! half-edges synthesized for unmatched edges and stitched into loops.
//!
//! Input triangles must be consistently wound. Twins are paired by undirected
//! key only, so inconsistently oriented input is not rejected here; use
//! [`super::is_consistently_oriented`] beforehand when the source is untrusted.

use super::mesh::{Face, HalfEdge, Mesh, Vertex};
use crate::error::TopologyError;
use ahash::AHashMap;
use nalgebra::Point3;
use std::collections::hash_map::Entry;

/// Half-edge under construction; links stay optional until `finish`
#[derive(Debug, Clone, Copy)]
struct DraftHalfEdge {
    origin: usize,
    twin: Option<usize>,
    next: Option<usize>,
    prev: Option<usize>,
    face: Option<usize>,
}

/// Canonical undirected edge key
fn edge_key(a: usize, b: usize) -> (usize, usize) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Successor of an interior half-edge; interior half-edges are allocated in
/// consecutive triples per triangle.
fn interior_next(he: usize) -> usize {
    he - he % 3 + (he + 1) % 3
}

fn link_error(halfedge: usize, reason: impl Into<String>) -> TopologyError {
    TopologyError::BoundaryLink {
        halfedge,
        reason: reason.into(),
    }
}

struct TopologyBuilder {
    vertices: Vec<Vertex>,
    halfedges: Vec<DraftHalfEdge>,
    faces: Vec<Face>,
    boundary: Vec<usize>,
}

impl TopologyBuilder {
    fn new(positions: &[Point3<f64>], triangle_count: usize) -> Result<Self, TopologyError> {
        let vertices = positions
            .iter()
            .enumerate()
            .map(|(index, position)| {
                if position.coords.iter().all(|c| c.is_finite()) {
                    Ok(Vertex::new(*position, index))
                } else {
                    Err(TopologyError::NonFinitePosition { vertex: index })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            vertices,
            halfedges: Vec::with_capacity(triangle_count * 4),
            faces: Vec::with_capacity(triangle_count),
            boundary: Vec::new(),
        })
    }

    /// Allocate the three half-edges and the face of one triangle
    fn add_triangle(&mut self, indices: &[usize]) -> Result<(), TopologyError> {
        let face = self.faces.len();
        let [a, b, c] = match *indices {
            [a, b, c] => [a, b, c],
            _ => {
                return Err(TopologyError::Arity {
                    face,
                    count: indices.len(),
                })
            }
        };

        for vertex in [a, b, c] {
            if vertex >= self.vertices.len() {
                return Err(TopologyError::VertexIndexOutOfRange {
                    face,
                    vertex,
                    vertex_count: self.vertices.len(),
                });
            }
        }
        if a == b || b == c || c == a {
            return Err(TopologyError::DegenerateTriangle {
                face,
                indices: [a, b, c],
            });
        }

        let ab = self.halfedges.len();
        let bc = ab + 1;
        let ca = ab + 2;

        for (he, origin, next, prev) in [(ab, a, bc, ca), (bc, b, ca, ab), (ca, c, ab, bc)] {
            self.halfedges.push(DraftHalfEdge {
                origin,
                twin: None,
                next: Some(next),
                prev: Some(prev),
                face: Some(face),
            });

            // First outgoing half-edge wins
            let vertex = &mut self.vertices[origin];
            if vertex.halfedge.is_none() {
                vertex.halfedge = Some(he);
            }
        }

        self.faces.push(Face { halfedge: ab });
        Ok(())
    }

    /// Group interior half-edges by undirected edge, pair twins and
    /// synthesize boundary half-edges for edges used by one triangle.
    fn match_twins(&mut self) -> Result<(), TopologyError> {
        let interior_count = self.halfedges.len();

        // Groups are kept in first-seen order so boundary indices are stable
        let mut slots: AHashMap<(usize, usize), usize> = AHashMap::with_capacity(interior_count);
        let mut groups: Vec<((usize, usize), Vec<usize>)> = Vec::new();

        for he in 0..interior_count {
            let from = self.halfedges[he].origin;
            let to = self.halfedges[interior_next(he)].origin;
            let key = edge_key(from, to);

            match slots.entry(key) {
                Entry::Occupied(slot) => groups[*slot.get()].1.push(he),
                Entry::Vacant(slot) => {
                    slot.insert(groups.len());
                    groups.push((key, vec![he]));
                }
            }
        }

        let mut twin_pairs = 0usize;
        for (key, group) in &groups {
            match group.as_slice() {
                [first, second] => {
                    self.halfedges[*first].twin = Some(*second);
                    self.halfedges[*second].twin = Some(*first);
                    twin_pairs += 1;
                }
                [interior] => self.add_boundary(*interior),
                _ => {
                    return Err(TopologyError::NonManifoldEdge {
                        key: *key,
                        count: group.len(),
                    })
                }
            }
        }

        log::debug!(
            "matched {} twin pairs, synthesized {} boundary half-edges",
            twin_pairs,
            self.boundary.len()
        );
        Ok(())
    }

    /// Create the boundary twin of a lone interior half-edge
    fn add_boundary(&mut self, interior: usize) {
        // Points opposite to the interior half-edge
        let origin = self.halfedges[interior_next(interior)].origin;
        let boundary = self.halfedges.len();

        self.halfedges.push(DraftHalfEdge {
            origin,
            twin: Some(interior),
            next: None,
            prev: None,
            face: None,
        });
        self.halfedges[interior].twin = Some(boundary);

        let vertex = &mut self.vertices[origin];
        if vertex.halfedge.is_none() {
            vertex.halfedge = Some(boundary);
        }
        self.boundary.push(boundary);
    }

    /// Stitch boundary half-edges into closed loops.
    ///
    /// The successor of boundary half-edge `h` leaves `h`'s destination. It is
    /// found by rotating around that vertex through the triangle fan
    /// (`cur = cur.prev.twin`), starting from `h.twin`, until the rotation
    /// steps off the surface onto a boundary half-edge.
    fn link_boundary(&mut self) -> Result<(), TopologyError> {
        let budget = self.halfedges.len() * 2;

        for i in 0..self.boundary.len() {
            let h = self.boundary[i];
            let mut cur = self.halfedges[h]
                .twin
                .ok_or_else(|| link_error(h, "boundary half-edge has no twin"))?;

            let mut steps = 0usize;
            loop {
                let prev = self.halfedges[cur]
                    .prev
                    .ok_or_else(|| link_error(h, format!("half-edge {} has no predecessor", cur)))?;
                cur = self.halfedges[prev]
                    .twin
                    .ok_or_else(|| link_error(h, format!("half-edge {} has no twin", prev)))?;

                if self.halfedges[cur].face.is_none() {
                    break;
                }

                steps += 1;
                if steps > budget {
                    return Err(link_error(
                        h,
                        format!("vertex fan did not reach the boundary within {} steps", budget),
                    ));
                }
            }

            if let Some(existing) = self.halfedges[cur].prev {
                return Err(link_error(
                    h,
                    format!("boundary half-edge {} already follows {}", cur, existing),
                ));
            }

            self.halfedges[h].next = Some(cur);
            self.halfedges[cur].prev = Some(h);
        }

        Ok(())
    }

    fn finish(self) -> Result<Mesh, TopologyError> {
        let halfedges = self
            .halfedges
            .iter()
            .enumerate()
            .map(|(index, he)| match (he.twin, he.next, he.prev) {
                (Some(twin), Some(next), Some(prev)) => Ok(HalfEdge {
                    origin: he.origin,
                    twin,
                    next,
                    prev,
                    face: he.face,
                }),
                _ => Err(link_error(index, "half-edge left unlinked after stitching")),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Mesh::from_parts(self.vertices, halfedges, self.faces))
    }
}

/// Build a half-edge mesh from positions and triangles (0-based indices).
///
/// Polygons must be triangulated beforehand; any face without exactly three
/// indices fails with [`TopologyError::Arity`]. Nothing is returned unless
/// every step succeeds.
pub fn build<T: AsRef<[usize]>>(
    positions: &[Point3<f64>],
    triangles: &[T],
) -> Result<Mesh, TopologyError> {
    let mut builder = TopologyBuilder::new(positions, triangles.len())?;

    for triangle in triangles {
        builder.add_triangle(triangle.as_ref())?;
    }
    log::debug!(
        "allocated {} faces over {} vertices",
        builder.faces.len(),
        builder.vertices.len()
    );

    builder.match_twins()?;
    builder.link_boundary()?;
    builder.finish()
}

impl Mesh {
    /// Build a half-edge mesh, see [`build`]
    pub fn build<T: AsRef<[usize]>>(
        positions: &[Point3<f64>],
        triangles: &[T],
    ) -> Result<Self, TopologyError> {
        build(positions, triangles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(n: usize) -> Vec<Point3<f64>> {
        (0..n).map(|i| Point3::new(i as f64, (i * i) as f64, 0.0)).collect()
    }

    #[test]
    fn test_interior_next_cycles_within_triangle() {
        assert_eq!(interior_next(0), 1);
        assert_eq!(interior_next(1), 2);
        assert_eq!(interior_next(2), 0);
        assert_eq!(interior_next(5), 3);
    }

    #[test]
    fn test_single_triangle_layout() {
        let mesh = build(&points(3), &[[0, 1, 2]]).unwrap();

        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.halfedge_count(), 6);
        assert_eq!(mesh.faces()[0].halfedge, 0);

        // Interior loop a->b->c
        let he = mesh.halfedges();
        assert_eq!([he[0].origin, he[1].origin, he[2].origin], [0, 1, 2]);
        assert_eq!([he[0].next, he[1].next, he[2].next], [1, 2, 0]);

        // Boundary twins point the other way
        for interior in 0..3 {
            let boundary = he[interior].twin;
            assert!(boundary >= 3);
            assert!(he[boundary].face.is_none());
            assert_eq!(he[boundary].origin, he[he[interior].next].origin);
        }
    }

    #[test]
    fn test_vertex_keeps_first_outgoing_halfedge() {
        let mesh = build(&points(4), &[[0, 1, 2], [0, 2, 3]]).unwrap();
        assert_eq!(mesh.vertices()[0].halfedge, Some(0));
        assert_eq!(mesh.vertices()[2].halfedge, Some(2));
        assert_eq!(mesh.vertices()[3].halfedge, Some(5));
    }

    #[test]
    fn test_isolated_vertex_has_no_halfedge() {
        let mesh = build(&points(4), &[[0, 1, 2]]).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert!(mesh.vertices()[3].halfedge.is_none());
    }

    #[test]
    fn test_empty_input_builds_empty_mesh() {
        let mesh = build::<[usize; 3]>(&[], &[]).unwrap();
        assert!(mesh.is_empty());
        assert_eq!(mesh.halfedge_count(), 0);
    }

    #[test]
    fn test_arity_error() {
        let triangles: Vec<Vec<usize>> = vec![vec![0, 1, 2], vec![0, 1, 2, 3]];
        let err = build(&points(4), &triangles).unwrap_err();
        assert_eq!(err, TopologyError::Arity { face: 1, count: 4 });
    }

    #[test]
    fn test_out_of_range_index() {
        let err = build(&points(3), &[[0, 1, 5]]).unwrap_err();
        assert_eq!(
            err,
            TopologyError::VertexIndexOutOfRange {
                face: 0,
                vertex: 5,
                vertex_count: 3
            }
        );
    }

    #[test]
    fn test_degenerate_triangle() {
        let err = build(&points(3), &[[0, 1, 1]]).unwrap_err();
        assert_eq!(
            err,
            TopologyError::DegenerateTriangle {
                face: 0,
                indices: [0, 1, 1]
            }
        );
    }

    #[test]
    fn test_non_finite_position() {
        let mut positions = points(3);
        positions[1].y = f64::NAN;
        let err = build(&positions, &[[0, 1, 2]]).unwrap_err();
        assert_eq!(err, TopologyError::NonFinitePosition { vertex: 1 });
    }

    #[test]
    fn test_non_manifold_edge() {
        let err = build(&points(5), &[[0, 1, 2], [1, 0, 3], [0, 1, 4]]).unwrap_err();
        assert_eq!(
            err,
            TopologyError::NonManifoldEdge {
                key: (0, 1),
                count: 3
            }
        );
    }

    #[test]
    fn test_build_is_deterministic() {
        let triangles = [[0, 1, 2], [1, 3, 2], [2, 3, 4]];
        let a = build(&points(5), &triangles).unwrap();
        let b = build(&points(5), &triangles).unwrap();
        assert_eq!(a.halfedges(), b.halfedges());
    }

    /// Builder for one triangle with twins matched but boundary not stitched.
    /// Interior 0: 0->1, 1: 1->2, 2: 2->0; boundary 3, 4, 5 are their twins.
    fn drafted_triangle() -> TopologyBuilder {
        let mut builder = TopologyBuilder::new(&points(3), 1).unwrap();
        builder.add_triangle(&[0, 1, 2]).unwrap();
        builder.match_twins().unwrap();
        assert_eq!(builder.boundary, vec![3, 4, 5]);
        builder
    }

    fn assert_link_error(result: Result<(), TopologyError>, halfedge: usize, reason: &str) {
        match result {
            Err(TopologyError::BoundaryLink {
                halfedge: at,
                reason: why,
            }) => {
                assert_eq!(at, halfedge);
                assert!(why.contains(reason), "unexpected reason: {}", why);
            }
            other => panic!("expected boundary link error, got {:?}", other),
        }
    }

    #[test]
    fn test_link_missing_predecessor() {
        let mut builder = drafted_triangle();
        builder.halfedges[0].prev = None;
        assert_link_error(builder.link_boundary(), 3, "no predecessor");
    }

    #[test]
    fn test_link_missing_twin() {
        let mut builder = drafted_triangle();
        builder.halfedges[3].twin = None;
        assert_link_error(builder.link_boundary(), 3, "no twin");
    }

    #[test]
    fn test_link_second_predecessor() {
        let mut builder = drafted_triangle();
        // Boundary 5 is the successor of 3; give it a predecessor up front
        builder.halfedges[5].prev = Some(4);
        assert_link_error(builder.link_boundary(), 3, "already follows");
    }

    #[test]
    fn test_link_fan_without_exit_hits_budget() {
        let mut builder = drafted_triangle();
        // 0.prev = 2 and 2.twin = 0 make the rotation spin on interior edges
        builder.halfedges[2].twin = Some(0);
        assert_link_error(builder.link_boundary(), 3, "within");
    }

    #[test]
    fn test_finish_rejects_unstitched_boundary() {
        let builder = drafted_triangle();
        let err = builder.finish().unwrap_err();
        assert!(matches!(err, TopologyError::BoundaryLink { halfedge: 3, .. }));
    }

    #[test]
    fn test_stitched_draft_finishes() {
        let mut builder = drafted_triangle();
        builder.link_boundary().unwrap();
        assert_eq!(builder.halfedges[3].next, Some(5));
        assert_eq!(builder.halfedges[5].next, Some(4));
        assert_eq!(builder.halfedges[4].next, Some(3));
        assert!(builder.finish().is_ok());
    }
}

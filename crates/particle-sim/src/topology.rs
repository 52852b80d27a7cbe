//! Edge extraction and normal recomputation for triangle and quad meshes.

use std::collections::HashSet;

use glam::Vec3;

use crate::math::{quad_normal, triangle_normal};

/// Collects undirected edges, smallest index first, in order of first use.
#[derive(Default)]
struct EdgeSet {
    seen: HashSet<[u32; 2]>,
    edges: Vec<[u32; 2]>,
}

impl EdgeSet {
    fn insert(&mut self, a: u32, b: u32) {
        let key = if a < b { [a, b] } else { [b, a] };
        if self.seen.insert(key) {
            self.edges.push(key);
        }
    }
}

/// Unique edges of a triangle mesh.
pub fn triangle_edges(triangles: &[[u32; 3]]) -> Vec<[u32; 2]> {
    let mut set = EdgeSet::default();
    for &[a, b, c] in triangles {
        set.insert(a, b);
        set.insert(b, c);
        set.insert(c, a);
    }
    set.edges
}

/// Unique edges of a quad mesh. Degenerate quads (`z == w`) are triangles.
pub fn quad_edges(quads: &[[u32; 4]]) -> Vec<[u32; 2]> {
    let mut set = EdgeSet::default();
    for &[a, b, c, d] in quads {
        set.insert(a, b);
        set.insert(b, c);
        if c != d {
            set.insert(c, d);
        }
        set.insert(d, a);
    }
    set.edges
}

/// Per-vertex normals as the normalized sum of incident unit triangle
/// normals. Faces are not weighted by area.
pub fn triangle_vertex_normals(triangles: &[[u32; 3]], positions: &[Vec3]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for &[a, b, c] in triangles {
        let (a, b, c) = (a as usize, b as usize, c as usize);
        let n = triangle_normal(positions[a], positions[b], positions[c]);
        normals[a] += n;
        normals[b] += n;
        normals[c] += n;
    }
    for n in normals.iter_mut() {
        *n = n.normalize_or_zero();
    }
    normals
}

/// Per-vertex normals as the normalized sum of incident unit quad normals.
pub fn quad_vertex_normals(quads: &[[u32; 4]], positions: &[Vec3]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for &[a, b, c, d] in quads {
        let (a, b, c, d) = (a as usize, b as usize, c as usize, d as usize);
        let n = if c == d {
            triangle_normal(positions[a], positions[b], positions[c])
        } else {
            quad_normal(positions[a], positions[b], positions[c], positions[d])
        };
        normals[a] += n;
        normals[b] += n;
        normals[c] += n;
        if c != d {
            normals[d] += n;
        }
    }
    for n in normals.iter_mut() {
        *n = n.normalize_or_zero();
    }
    normals
}

use glam::Vec3;

use crate::topology::{quad_edges, triangle_edges};

/// Distance constraint between two vertices of one shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
    /// Vertex index A.
    pub vert0: u32,
    /// Vertex index B.
    pub vert1: u32,
    /// Distance between the two vertices when the spring was built.
    pub rest: f32,
    /// Stiffness coefficient. Mass-spring forces scale with `1 / coeff`,
    /// PBD corrections with `1 - coeff`.
    pub coeff: f32,
}

impl Spring {
    pub fn new(vert0: u32, vert1: u32, rest: f32, coeff: f32) -> Self {
        Self {
            vert0,
            vert1,
            rest,
            coeff,
        }
    }

    /// Spring between two vertices at their current distance.
    pub fn at_rest(vert0: u32, vert1: u32, positions: &[Vec3], coeff: f32) -> Self {
        let rest = positions[vert0 as usize].distance(positions[vert1 as usize]);
        Self::new(vert0, vert1, rest, coeff)
    }
}

/// Springs for a quad mesh: one per unique edge, then both diagonals of
/// every quad.
pub fn quad_springs(quads: &[[u32; 4]], positions: &[Vec3], coeff: f32) -> Vec<Spring> {
    let mut springs: Vec<Spring> = quad_edges(quads)
        .into_iter()
        .map(|[a, b]| Spring::at_rest(a, b, positions, coeff))
        .collect();
    for &[x, y, z, w] in quads {
        springs.push(Spring::at_rest(x, z, positions, coeff));
        springs.push(Spring::at_rest(y, w, positions, coeff));
    }
    springs
}

/// Springs for a triangle mesh: one per unique edge.
pub fn triangle_springs(triangles: &[[u32; 3]], positions: &[Vec3], coeff: f32) -> Vec<Spring> {
    triangle_edges(triangles)
        .into_iter()
        .map(|[a, b]| Spring::at_rest(a, b, positions, coeff))
        .collect()
}

/// Accumulate spring forces for the mass-spring integrator.
///
/// For each spring with combined inverse mass `w`:
/// 1. Elastic term `dir * (len / rest - 1) / (coeff * w)`
/// 2. Damping term `dot((v1 - v0) / rest, dir) * dir / (coeff * 1000 * w)`
/// 3. Add to vertex A, subtract from vertex B
///
/// Springs between two pinned vertices, of zero length, or with zero rest
/// length are skipped.
pub fn accumulate_spring_forces(
    springs: &[Spring],
    positions: &[Vec3],
    velocities: &[Vec3],
    invmass: &[f32],
    forces: &mut [Vec3],
) {
    for s in springs {
        let i = s.vert0 as usize;
        let j = s.vert1 as usize;

        let w_sum = invmass[i] + invmass[j];
        if w_sum == 0.0 || s.rest == 0.0 {
            continue;
        }

        let delta = positions[j] - positions[i];
        let len = delta.length();
        if len == 0.0 {
            continue;
        }
        let dir = delta / len;

        let mut force = dir * (len / s.rest - 1.0) / (s.coeff * w_sum);
        let delta_vel = velocities[j] - velocities[i];
        force += dir * (delta_vel / s.rest).dot(dir) / (s.coeff * 1000.0 * w_sum);

        forces[i] += force;
        forces[j] -= force;
    }
}

/// Project positions onto the spring constraints (one Gauss-Seidel sweep).
///
/// `lambda = (1 - coeff) * (len - rest) / w`; each endpoint moves along the
/// spring by its own inverse mass times `lambda`, so pinned endpoints stay.
pub fn project_springs(springs: &[Spring], positions: &mut [Vec3], invmass: &[f32]) {
    for s in springs {
        let i = s.vert0 as usize;
        let j = s.vert1 as usize;

        let w_i = invmass[i];
        let w_j = invmass[j];
        let w_sum = w_i + w_j;
        if w_sum == 0.0 {
            continue;
        }

        let delta = positions[j] - positions[i];
        let len = delta.length();
        if len == 0.0 {
            continue;
        }
        let dir = delta / len;

        let lambda = (1.0 - s.coeff) * (len - s.rest) / w_sum;
        positions[i] += dir * (w_i * lambda);
        positions[j] -= dir * (w_j * lambda);
    }
}

//! Per-frame integrators and the finalization pass they share.

pub mod mass_spring;
pub mod pbd;

use glam::Vec3;

use crate::config::SimulationParams;
use crate::scene::ParticleShape;
use crate::topology::{quad_vertex_normals, triangle_vertex_normals};

/// End-of-frame pass shared by every solver.
///
/// Damps velocities exponentially, zeroes those slower than
/// `params.minvelocity`, and recomputes normals from the shape topology.
pub fn finalize_shape(shape: &mut ParticleShape, params: &SimulationParams) {
    let damping = 1.0 - params.damping * params.deltat;
    for (v, &w) in shape.velocities.iter_mut().zip(&shape.invmass) {
        if w == 0.0 {
            continue;
        }
        *v *= damping;
        if v.length() < params.minvelocity {
            *v = Vec3::ZERO;
        }
    }

    if !shape.quads.is_empty() {
        shape.normals = quad_vertex_normals(&shape.quads, &shape.positions);
    } else if !shape.triangles.is_empty() {
        shape.normals = triangle_vertex_normals(&shape.triangles, &shape.positions);
    }
}

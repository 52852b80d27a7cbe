use glam::{Vec2, Vec3};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SimulationParams;
use crate::constraints::spring::{quad_springs, triangle_springs};
use crate::math::sample_sphere;
use crate::scene::{ParticleShape, Scene};

/// Reset the scene to its initial configuration.
///
/// Shapes are restored from their snapshots, pinned vertices get zero
/// inverse mass, non-pinned velocities get a random perturbation seeded
/// from `params.seed`,
/// springs are rebuilt from topology, and collider indices are built.
/// Calling this twice leaves the same state as calling it once.
pub fn init_simulation(scene: &mut Scene, params: &SimulationParams) {
    let mut rng = StdRng::seed_from_u64(params.seed);

    for shape in scene.shapes.iter_mut() {
        init_shape(shape, &mut rng);
    }

    for collider in scene.colliders.iter_mut() {
        collider.build_bvh();
    }

    debug!(
        "initialized {} shapes ({} springs), {} colliders",
        scene.shapes.len(),
        scene.shapes.iter().map(|s| s.springs.len()).sum::<usize>(),
        scene.colliders.len()
    );
}

fn init_shape(shape: &mut ParticleShape, rng: &mut StdRng) {
    let initial = &shape.initial;
    shape.positions.clone_from(&initial.positions);
    shape.normals.clone_from(&initial.normals);
    shape.radius.clone_from(&initial.radius);
    shape.velocities.clone_from(&initial.velocities);
    shape.invmass.clone_from(&initial.invmass);
    shape.forces.clear();
    shape.forces.resize(shape.positions.len(), Vec3::ZERO);
    shape.old_positions.clear();
    shape.collisions.clear();
    shape.springs.clear();

    for &v in &initial.pinned {
        shape.invmass[v as usize] = 0.0;
    }

    for (v, &w) in shape.velocities.iter_mut().zip(&shape.invmass) {
        if w == 0.0 {
            continue;
        }
        let magnitude: f32 = rng.random();
        let direction = sample_sphere(Vec2::new(rng.random(), rng.random()));
        *v += magnitude * shape.emit_rngscale * direction;
    }

    if shape.spring_coeff > 0.0 {
        if !shape.quads.is_empty() {
            shape.springs = quad_springs(&shape.quads, &shape.positions, shape.spring_coeff);
        } else if !shape.triangles.is_empty() {
            shape.springs =
                triangle_springs(&shape.triangles, &shape.positions, shape.spring_coeff);
        }
    }
}

use glam::Vec3;

use crate::config::SimulationParams;
use crate::constraints::contact::{detect_collisions, solve_collisions};
use crate::constraints::spring::project_springs;
use crate::scene::{ParticleCollider, ParticleShape, Scene};
use crate::solvers::finalize_shape;

/// Advance every shape by one frame with position-based dynamics.
pub fn simulate_pbd(scene: &mut Scene, params: &SimulationParams) {
    let Scene { shapes, colliders } = scene;
    for shape in shapes.iter_mut() {
        step_shape(shape, colliders, params);
    }
}

/// One PBD frame for one shape:
/// 1. Predict positions under gravity
/// 2. Gather collisions against the predicted positions
/// 3. `pdbsteps` sweeps of spring and collision projection
/// 4. Velocities from the position change, then finalize
pub fn step_shape(
    shape: &mut ParticleShape,
    colliders: &[ParticleCollider],
    params: &SimulationParams,
) {
    let dt = params.deltat;
    shape.old_positions.clone_from(&shape.positions);

    let gravity = Vec3::new(0.0, -params.gravity, 0.0);
    for i in 0..shape.positions.len() {
        if shape.is_pinned(i) {
            continue;
        }
        shape.velocities[i] += gravity * dt;
        shape.positions[i] += shape.velocities[i] * dt;
    }

    shape.collisions = detect_collisions(&shape.positions, &shape.invmass, colliders);

    for _ in 0..params.pdbsteps {
        project_springs(&shape.springs, &mut shape.positions, &shape.invmass);
        solve_collisions(&shape.collisions, &mut shape.positions, &shape.invmass);
    }

    for i in 0..shape.positions.len() {
        if shape.is_pinned(i) {
            continue;
        }
        shape.velocities[i] = (shape.positions[i] - shape.old_positions[i]) / dt;
    }

    finalize_shape(shape, params);
}

use glam::{Vec2, Vec3};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::collision::first_contact;
use crate::config::SimulationParams;
use crate::constraints::contact::respond;
use crate::constraints::spring::accumulate_spring_forces;
use crate::forces::ForceField;
use crate::scene::{ParticleCollider, ParticleShape, Scene};
use crate::solvers::finalize_shape;

/// Advance every shape by one frame with the given force field.
pub fn simulate_mass_spring(scene: &mut Scene, params: &SimulationParams, field: ForceField) {
    let Scene { shapes, colliders } = scene;
    for shape in shapes.iter_mut() {
        step_shape(shape, colliders, params, field);
    }
}

/// One frame for one shape:
/// 1. `mssteps` sub-steps of force field, springs, and semi-implicit Euler
/// 2. Collision snap and velocity response against the colliders
/// 3. Damping, sleeping, and normal recompute
pub fn step_shape(
    shape: &mut ParticleShape,
    colliders: &[ParticleCollider],
    params: &SimulationParams,
    field: ForceField,
) {
    shape.old_positions.clone_from(&shape.positions);
    shape.forces.resize(shape.positions.len(), Vec3::ZERO);

    let sub_dt = params.deltat / params.mssteps as f32;
    for _ in 0..params.mssteps {
        field.apply(
            &mut shape.positions,
            &mut shape.forces,
            &shape.invmass,
            params.gravity,
        );

        if field.uses_springs() {
            accumulate_spring_forces(
                &shape.springs,
                &shape.positions,
                &shape.velocities,
                &shape.invmass,
                &mut shape.forces,
            );
        }

        integrate(
            &mut shape.positions,
            &mut shape.velocities,
            &shape.forces,
            &shape.invmass,
            sub_dt,
        );
    }

    handle_collisions(
        &mut shape.positions,
        &mut shape.velocities,
        &shape.invmass,
        colliders,
        field.collision_bias(),
        params.bounce,
    );

    finalize_shape(shape, params);
}

/// Semi-implicit Euler: velocity first, then position with the new velocity.
fn integrate(
    positions: &mut [Vec3],
    velocities: &mut [Vec3],
    forces: &[Vec3],
    invmass: &[f32],
    dt: f32,
) {
    for i in 0..positions.len() {
        let w = invmass[i];
        if w == 0.0 {
            continue;
        }
        velocities[i] += dt * forces[i] * w;
        positions[i] += dt * velocities[i];
    }
}

#[inline]
fn resolve_vertex(
    position: &mut Vec3,
    velocity: &mut Vec3,
    colliders: &[ParticleCollider],
    bias: f32,
    bounce: Vec2,
) {
    if let Some(contact) = first_contact(colliders, *position) {
        respond(&contact, bias, bounce, position, velocity);
    }
}

#[cfg(not(feature = "parallel"))]
fn handle_collisions(
    positions: &mut [Vec3],
    velocities: &mut [Vec3],
    invmass: &[f32],
    colliders: &[ParticleCollider],
    bias: f32,
    bounce: Vec2,
) {
    if colliders.is_empty() {
        return;
    }
    for ((p, v), &w) in positions.iter_mut().zip(velocities.iter_mut()).zip(invmass) {
        if w == 0.0 {
            continue;
        }
        resolve_vertex(p, v, colliders, bias, bounce);
    }
}

/// Vertices are independent here, so the pass splits across threads.
#[cfg(feature = "parallel")]
fn handle_collisions(
    positions: &mut [Vec3],
    velocities: &mut [Vec3],
    invmass: &[f32],
    colliders: &[ParticleCollider],
    bias: f32,
    bounce: Vec2,
) {
    if colliders.is_empty() {
        return;
    }
    positions
        .par_iter_mut()
        .zip(velocities.par_iter_mut())
        .zip(invmass.par_iter())
        .for_each(|((p, v), &w)| {
            if w != 0.0 {
                resolve_vertex(p, v, colliders, bias, bounce);
            }
        });
}

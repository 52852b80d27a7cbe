use glam::Vec3;
use particle_sim::constraints::spring::{accumulate_spring_forces, Spring};

fn spring_forces(
    springs: &[Spring],
    positions: &[Vec3],
    velocities: &[Vec3],
    invmass: &[f32],
) -> Vec<Vec3> {
    let mut forces = vec![Vec3::ZERO; positions.len()];
    accumulate_spring_forces(springs, positions, velocities, invmass, &mut forces);
    forces
}

#[test]
fn test_stretched_spring_elastic_and_damping_terms() {
    // len = 2, rest = 1, w = 2, coeff = 0.25:
    // elastic (2/1 - 1) / (0.25 * 2) = 2
    // damping (4/1) / (0.25 * 1000 * 2) = 0.008
    let forces = spring_forces(
        &[Spring::new(0, 1, 1.0, 0.25)],
        &[Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0)],
        &[Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0)],
        &[1.0, 1.0],
    );

    assert!(
        (forces[0] - Vec3::new(2.008, 0.0, 0.0)).length() < 1e-5,
        "vertex A is pulled toward B, got {:?}",
        forces[0]
    );
    assert_eq!(forces[1], -forces[0], "forces must be equal and opposite");
}

#[test]
fn test_compressed_spring_pushes_apart() {
    // len = 0.5, rest = 1, w = 1, coeff = 0.5: (0.5 - 1) / 0.5 = -1
    let forces = spring_forces(
        &[Spring::new(0, 1, 1.0, 0.5)],
        &[Vec3::ZERO, Vec3::new(0.0, 0.5, 0.0)],
        &[Vec3::ZERO; 2],
        &[0.5, 0.5],
    );

    assert!(
        (forces[0] - Vec3::new(0.0, -1.0, 0.0)).length() < 1e-6,
        "vertex A is pushed away from B, got {:?}",
        forces[0]
    );
    assert_eq!(forces[1], -forces[0]);
}

#[test]
fn test_spring_at_rest_without_motion_is_force_free() {
    let forces = spring_forces(
        &[Spring::new(0, 1, 1.0, 0.25)],
        &[Vec3::ZERO, Vec3::X],
        &[Vec3::new(0.0, 3.0, 0.0); 2],
        &[1.0, 1.0],
    );
    assert!(forces.iter().all(|f| f.length() < 1e-6), "got {forces:?}");
}

#[test]
fn test_forces_accumulate_over_shared_vertices() {
    let positions = [Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), Vec3::new(-2.0, 0.0, 0.0)];
    let springs = [Spring::new(0, 1, 1.0, 0.5), Spring::new(0, 2, 1.0, 0.5)];

    let forces = spring_forces(&springs, &positions, &[Vec3::ZERO; 3], &[1.0; 3]);

    assert!(forces[0].length() < 1e-6, "symmetric pulls cancel, got {:?}", forces[0]);
    assert!((forces[1] - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-6);
    assert!((forces[2] - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-6);
}

#[test]
fn test_degenerate_springs_are_skipped() {
    let springs = [
        // both ends pinned
        Spring::new(0, 1, 1.0, 0.5),
        // zero rest length
        Spring::new(2, 3, 0.0, 0.5),
        // coincident endpoints
        Spring::new(4, 5, 1.0, 0.5),
    ];
    let positions = [
        Vec3::ZERO,
        Vec3::new(3.0, 0.0, 0.0),
        Vec3::ZERO,
        Vec3::X,
        Vec3::ONE,
        Vec3::ONE,
    ];
    let invmass = [0.0, 0.0, 1.0, 1.0, 1.0, 1.0];

    let forces = spring_forces(&springs, &positions, &[Vec3::ZERO; 6], &invmass);

    assert!(forces.iter().all(|f| *f == Vec3::ZERO), "got {forces:?}");
}

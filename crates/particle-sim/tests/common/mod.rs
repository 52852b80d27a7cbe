#![allow(dead_code)]

use glam::Vec3;
use particle_sim::{ColliderId, Scene, SimulationParams};

/// Square grid of `n x n` vertices in the XZ plane at height `y`, spanning
/// `[-half, half]`, with quads wound so that their normals point up.
pub fn grid(n: usize, half: f32, y: f32) -> (Vec<[u32; 4]>, Vec<Vec3>) {
    let mut positions = Vec::with_capacity(n * n);
    for j in 0..n {
        for i in 0..n {
            let x = -half + 2.0 * half * i as f32 / (n - 1) as f32;
            let z = -half + 2.0 * half * j as f32 / (n - 1) as f32;
            positions.push(Vec3::new(x, y, z));
        }
    }
    let mut quads = Vec::new();
    for j in 0..n - 1 {
        for i in 0..n - 1 {
            let v = (j * n + i) as u32;
            let n = n as u32;
            quads.push([v, v + n, v + n + 1, v + 1]);
        }
    }
    (quads, positions)
}

/// Single up-facing quad collider spanning `[-half, half]^2` at height `y`.
pub fn add_floor(scene: &mut Scene, half: f32, y: f32) -> ColliderId {
    let positions = [
        Vec3::new(-half, y, -half),
        Vec3::new(-half, y, half),
        Vec3::new(half, y, half),
        Vec3::new(half, y, -half),
    ];
    scene
        .add_collider(&[], &[[0, 1, 2, 3]], &positions, &[Vec3::Y; 4], &[0.0; 4])
        .expect("valid floor")
}

/// Parameters with damping and sleeping disabled.
pub fn undamped_params() -> SimulationParams {
    SimulationParams {
        damping: 0.0,
        minvelocity: 0.0,
        ..Default::default()
    }
}

pub fn assert_vec3_near(actual: Vec3, expected: Vec3, tolerance: f32, what: &str) {
    assert!(
        (actual - expected).abs().max_element() <= tolerance,
        "{what}: expected {expected:?}, got {actual:?}"
    );
}

mod common;

use glam::Vec3;
use particle_sim::{
    init_simulation, simulate_frame, simulate_frames, BodyHandle, BodyKind, BodyMesh, Scene,
    SimulationParams, SolverKind,
};

fn single_particle(position: Vec3) -> Scene {
    let mut scene = Scene::new();
    scene
        .add_particles(&[0], &[position], &[0.05], 1.0, 0.0)
        .expect("valid particle");
    scene
}

fn cloth_over_floor(n: usize) -> Scene {
    let (quads, positions) = common::grid(n, 0.5, 0.5);
    let count = positions.len();
    let mesh = BodyMesh {
        quads,
        positions,
        normals: vec![Vec3::Y; count],
        radius: vec![0.01; count],
        ..Default::default()
    };
    let mut scene = Scene::new();
    scene.add_body(BodyKind::Cloth, &mesh).expect("valid cloth");
    common::add_floor(&mut scene, 2.0, 0.0);
    scene
}

#[test]
fn test_mass_spring_free_fall() {
    let deltat = 1.0 / 120.0;
    let mut scene = single_particle(Vec3::new(0.0, 1.0, 0.0));
    let params = SimulationParams {
        solver: SolverKind::MassSpring,
        gravity: 9.8,
        deltat,
        mssteps: 1,
        frames: 1,
        ..common::undamped_params()
    };

    simulate_frames(&mut scene, &params, None).expect("valid params");

    let velocity = scene.shapes[0].velocities[0];
    let expected_velocity = Vec3::new(0.0, -9.8 * deltat, 0.0);
    common::assert_vec3_near(velocity, expected_velocity, 1e-6, "velocity after one frame");
    common::assert_vec3_near(
        scene.shapes[0].positions[0],
        Vec3::new(0.0, 1.0, 0.0) + expected_velocity * deltat,
        1e-6,
        "position after one frame",
    );
}

#[test]
fn test_pinned_vertices_never_move() {
    for solver in SolverKind::ALL {
        let mut scene = cloth_over_floor(4);
        let params = SimulationParams {
            solver,
            mssteps: 20,
            pdbsteps: 10,
            frames: 5,
            ..Default::default()
        };
        let initial = scene.shapes[0].positions.clone();

        simulate_frames(&mut scene, &params, None).expect("valid params");

        let shape = &scene.shapes[0];
        assert_eq!(shape.pinned(), &[15, 12]);
        for &v in shape.pinned() {
            let v = v as usize;
            assert_eq!(shape.invmass[v], 0.0, "{solver}: pinned vertex has mass");
            assert_eq!(
                shape.positions[v], initial[v],
                "{solver}: pinned vertex {v} moved"
            );
            assert_eq!(
                shape.velocities[v],
                Vec3::ZERO,
                "{solver}: pinned vertex {v} has velocity"
            );
        }
    }
}

#[test]
fn test_sleep_threshold_zeroes_slow_vertices() {
    for solver in [SolverKind::MassSpring, SolverKind::PositionBased] {
        let (_, positions) = common::grid(6, 1.0, 2.0);
        let points: Vec<u32> = (0..positions.len() as u32).collect();
        let mut scene = Scene::new();
        scene
            .add_particles(&points, &positions, &vec![0.01; positions.len()], 1.0, 0.2)
            .expect("valid particles");
        let params = SimulationParams {
            solver,
            gravity: 0.0,
            mssteps: 4,
            frames: 3,
            damping: 20.0,
            minvelocity: 0.05,
            ..Default::default()
        };

        simulate_frames(&mut scene, &params, None).expect("valid params");

        for (i, v) in scene.shapes[0].velocities.iter().enumerate() {
            assert!(
                *v == Vec3::ZERO || v.length() >= params.minvelocity,
                "{solver}: vertex {i} kept a sub-threshold velocity {v:?}"
            );
        }
    }
}

#[test]
fn test_collision_snaps_vertex_above_floor() {
    let mut scene = single_particle(Vec3::new(0.2, -0.05, 0.1));
    common::add_floor(&mut scene, 1.0, 0.0);
    let params = SimulationParams {
        solver: SolverKind::MassSpring,
        mssteps: 4,
        frames: 1,
        ..common::undamped_params()
    };

    simulate_frames(&mut scene, &params, None).expect("valid params");

    let shape = &scene.shapes[0];
    common::assert_vec3_near(
        shape.positions[0],
        Vec3::new(0.2, 0.005, 0.1),
        1e-5,
        "vertex should rest just above the floor",
    );
    assert!(
        shape.velocities[0].y.abs() < 1e-6,
        "normal velocity should be absorbed, got {:?}",
        shape.velocities[0]
    );
}

#[test]
fn test_collision_keeps_damped_tangential_velocity() {
    let mut scene = single_particle(Vec3::new(0.0, -0.05, 0.0));
    common::add_floor(&mut scene, 1.0, 0.0);
    let params = SimulationParams {
        gravity: 0.0,
        mssteps: 1,
        ..common::undamped_params()
    };
    init_simulation(&mut scene, &params);
    scene.shapes[0].velocities[0] = Vec3::new(1.0, -1.0, 0.0);

    simulate_frame(&mut scene, &params).expect("valid params");

    let v = scene.shapes[0].velocities[0];
    common::assert_vec3_near(
        v,
        Vec3::new(1.0 - params.bounce.x, 0.0, 0.0),
        1e-6,
        "tangential part scaled by 1 - bounce.x",
    );
}

#[test]
fn test_identical_runs_are_identical() {
    for solver in SolverKind::ALL {
        let run = || {
            let mut scene = cloth_over_floor(5);
            let (_, positions) = common::grid(3, 0.3, 1.0);
            let points: Vec<u32> = (0..positions.len() as u32).collect();
            scene
                .add_particles(&points, &positions, &vec![0.01; positions.len()], 1.0, 1.0)
                .expect("valid particles");
            let params = SimulationParams {
                solver,
                mssteps: 10,
                pdbsteps: 10,
                frames: 4,
                ..Default::default()
            };
            simulate_frames(&mut scene, &params, None).expect("valid params");
            scene
        };

        let a = run();
        let b = run();
        for (sa, sb) in a.shapes.iter().zip(&b.shapes) {
            assert_eq!(sa.positions, sb.positions, "{solver}: positions diverged");
            assert_eq!(sa.velocities, sb.velocities, "{solver}: velocities diverged");
            assert_eq!(sa.normals, sb.normals, "{solver}: normals diverged");
        }
    }
}

#[test]
fn test_mass_spring_cloth_drapes_without_nan() {
    let mut scene = cloth_over_floor(5);
    let params = SimulationParams {
        solver: SolverKind::MassSpring,
        frames: 10,
        ..Default::default()
    };
    let center_before = scene.shapes[0].positions[12].y;

    simulate_frames(&mut scene, &params, None).expect("valid params");

    let shape = &scene.shapes[0];
    assert!(
        shape.positions[12].y < center_before,
        "center should sag: before {center_before}, after {}",
        shape.positions[12].y
    );
    for (i, p) in shape.positions.iter().enumerate() {
        assert!(p.is_finite(), "vertex {i} is not finite: {p:?}");
    }
    for (i, n) in shape.normals.iter().enumerate() {
        assert!((n.length() - 1.0).abs() < 1e-4, "normal {i} not unit: {n:?}");
    }
}

#[test]
fn test_pbd_cloth_stays_above_floor() {
    let mut scene = cloth_over_floor(5);
    let params = SimulationParams {
        solver: SolverKind::PositionBased,
        frames: 60,
        pdbsteps: 20,
        ..Default::default()
    };

    simulate_frames(&mut scene, &params, None).expect("valid params");

    for (i, p) in scene.shapes[0].positions.iter().enumerate() {
        assert!(p.is_finite(), "vertex {i} is not finite: {p:?}");
        assert!(p.y > -0.05, "vertex {i} sank through the floor: {p:?}");
    }
}

#[test]
fn test_slide_pushes_along_negative_x() {
    let deltat = 1.0 / 120.0;
    let mut scene = single_particle(Vec3::new(0.0, 5.0, 0.0));
    let params = SimulationParams {
        solver: SolverKind::Slide,
        deltat,
        mssteps: 1,
        frames: 1,
        ..common::undamped_params()
    };

    simulate_frames(&mut scene, &params, None).expect("valid params");

    let g = params.gravity;
    common::assert_vec3_near(
        scene.shapes[0].velocities[0],
        Vec3::new(-3.0 * g * deltat, -g * deltat, 0.0),
        1e-5,
        "slide velocity",
    );
}

#[test]
fn test_quadrants_pull_toward_axis() {
    let mut scene = Scene::new();
    let positions = [
        Vec3::new(1.0, 3.0, 1.0),
        Vec3::new(-1.0, 3.0, 1.0),
        Vec3::new(1.0, 3.0, -1.0),
        Vec3::new(-1.0, 3.0, -1.0),
    ];
    scene
        .add_particles(&[0, 1, 2, 3], &positions, &[0.01; 4], 1.0, 0.0)
        .expect("valid particles");
    let params = SimulationParams {
        solver: SolverKind::Quadrants,
        mssteps: 2,
        frames: 1,
        ..common::undamped_params()
    };

    simulate_frames(&mut scene, &params, None).expect("valid params");

    let shape = &scene.shapes[0];
    for (i, (p, v)) in shape.positions.iter().zip(&shape.velocities).enumerate() {
        let start = positions[i];
        assert!(v.x * start.x < 0.0, "vertex {i}: x velocity {v:?} not toward axis");
        assert!(v.z * start.z < 0.0, "vertex {i}: z velocity {v:?} not toward axis");
        assert!(p.y < 0.0 && p.y > -0.01, "vertex {i} should hug the ground, got {p:?}");
    }
}

#[test]
fn test_swirl_lifts_to_twice_horizontal_extent() {
    let mut scene = single_particle(Vec3::new(1.0, 0.0, 0.0));
    let params = SimulationParams {
        solver: SolverKind::Swirl,
        mssteps: 1,
        frames: 1,
        ..common::undamped_params()
    };

    simulate_frames(&mut scene, &params, None).expect("valid params");

    let p = scene.shapes[0].positions[0];
    assert!((p.y - 2.0).abs() < 1e-3, "height should be 2 * max(|x|, |z|), got {p:?}");
    assert!(p.z > 0.0, "vertex should have turned toward +z, got {p:?}");
}

#[test]
fn test_flat_swirl_flattens_onto_ground() {
    let mut scene = single_particle(Vec3::new(0.5, 4.0, -0.5));
    let params = SimulationParams {
        solver: SolverKind::FlatSwirl,
        mssteps: 3,
        frames: 2,
        ..common::undamped_params()
    };

    simulate_frames(&mut scene, &params, None).expect("valid params");

    assert_eq!(scene.shapes[0].positions[0].y, 0.0);
}

#[test]
fn test_simulate_frame_continues_from_current_state() {
    let mut scene = single_particle(Vec3::new(0.0, 1.0, 0.0));
    let params = SimulationParams {
        mssteps: 1,
        frames: 0,
        ..common::undamped_params()
    };
    init_simulation(&mut scene, &params);
    simulate_frame(&mut scene, &params).expect("valid params");
    let after_one = scene.shapes[0].velocities[0].y;
    simulate_frame(&mut scene, &params).expect("valid params");
    let after_two = scene.shapes[0].velocities[0].y;

    assert!(
        (after_two - 2.0 * after_one).abs() < 1e-6,
        "velocity should keep accumulating: {after_one} then {after_two}"
    );
}

#[test]
fn test_add_body_particles_get_random_velocity() {
    let mesh = BodyMesh {
        points: vec![0, 1],
        positions: vec![Vec3::ZERO, Vec3::X],
        radius: vec![0.1; 2],
        ..Default::default()
    };
    let mut scene = Scene::new();
    let handle = scene.add_body(BodyKind::Particles, &mesh).expect("valid mesh");
    let BodyHandle::Shape(id) = handle else {
        panic!("particles should become a shape, got {handle:?}");
    };

    init_simulation(&mut scene, &SimulationParams::default());

    for v in scene.shape(id).velocities() {
        assert!(v.length() <= 1.0, "random velocity is bounded by its scale: {v:?}");
    }
    assert_ne!(scene.shape(id).velocities()[0], Vec3::ZERO);
}

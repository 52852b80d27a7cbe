use log::{info, trace};

use crate::config::{SimulationParams, SolverKind};
use crate::error::SimResult;
use crate::forces::ForceField;
use crate::init::init_simulation;
use crate::scene::Scene;
use crate::solvers::mass_spring::simulate_mass_spring;
use crate::solvers::pbd::simulate_pbd;

/// Progress sink: `(stage, current, total)`.
pub type ProgressCallback<'a> = &'a mut dyn FnMut(&str, usize, usize);

/// Advance the scene by one frame with the solver selected in `params`.
///
/// The scene must have been initialized with [`init_simulation`]. Invalid
/// parameters are rejected before the scene is touched.
pub fn simulate_frame(scene: &mut Scene, params: &SimulationParams) -> SimResult<()> {
    params.validate()?;
    step_frame(scene, params);
    Ok(())
}

fn step_frame(scene: &mut Scene, params: &SimulationParams) {
    match params.solver {
        SolverKind::PositionBased => simulate_pbd(scene, params),
        SolverKind::MassSpring => simulate_mass_spring(scene, params, ForceField::Gravity),
        SolverKind::Swirl => simulate_mass_spring(scene, params, ForceField::Swirl),
        SolverKind::Slide => simulate_mass_spring(scene, params, ForceField::Slide),
        SolverKind::FlatSwirl => simulate_mass_spring(scene, params, ForceField::FlatSwirl),
        SolverKind::Quadrants => simulate_mass_spring(scene, params, ForceField::Quadrants),
    }
}

/// Initialize the scene once, then simulate `params.frames` frames.
///
/// Progress is reported before initialization, before each frame, and once
/// at the end, out of `frames + 1` units. Invalid parameters are rejected
/// before the scene is touched.
pub fn simulate_frames(
    scene: &mut Scene,
    params: &SimulationParams,
    mut progress: Option<ProgressCallback<'_>>,
) -> SimResult<()> {
    params.validate()?;

    let frames = params.frames as usize;
    let total = frames + 1;
    let mut report = |stage: &str, current: usize| {
        if let Some(cb) = progress.as_deref_mut() {
            cb(stage, current, total);
        }
    };

    info!(
        "simulating {} frames with {} ({} shapes, {} colliders)",
        frames,
        params.solver,
        scene.shapes.len(),
        scene.colliders.len()
    );

    report("init simulation", 0);
    init_simulation(scene, params);

    for frame in 0..frames {
        report("simulate frames", frame + 1);
        trace!("frame {}/{}", frame + 1, frames);
        step_frame(scene, params);
    }

    report("simulate frames", total);
    info!("simulation finished");
    Ok(())
}

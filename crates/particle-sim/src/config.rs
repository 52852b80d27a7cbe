use std::fmt;
use std::str::FromStr;

use glam::Vec2;

use crate::error::{SimError, SimResult};

/// Selects the per-frame integrator.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SolverKind {
    /// Sub-stepped mass-spring with gravity.
    #[default]
    MassSpring,
    /// Position-based dynamics.
    PositionBased,
    /// Kinematic yaw rotation with the height lifted to the XZ extent.
    Swirl,
    /// Constant sideways force plus gravity, no springs.
    Slide,
    /// Kinematic yaw rotation on the ground plane.
    FlatSwirl,
    /// Quadrant dependent force pulling vertices toward the vertical axis.
    Quadrants,
}

impl SolverKind {
    pub const ALL: [SolverKind; 6] = [
        SolverKind::MassSpring,
        SolverKind::PositionBased,
        SolverKind::Swirl,
        SolverKind::Slide,
        SolverKind::FlatSwirl,
        SolverKind::Quadrants,
    ];

    /// Canonical snake_case name, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            SolverKind::MassSpring => "mass_spring",
            SolverKind::PositionBased => "position_based",
            SolverKind::Swirl => "swirl",
            SolverKind::Slide => "slide",
            SolverKind::FlatSwirl => "flat_swirl",
            SolverKind::Quadrants => "quadrants",
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SolverKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SolverKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| SimError::UnknownSolver(s.to_string()))
    }
}

/// Per-run simulation parameters. Immutable for the duration of a run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationParams {
    pub solver: SolverKind,
    /// Gravity magnitude along -Y.
    pub gravity: f32,
    /// Frame time step in seconds.
    pub deltat: f32,
    /// Mass-spring sub-steps per frame.
    pub mssteps: u32,
    /// PBD relaxation iterations per frame.
    pub pdbsteps: u32,
    pub frames: u32,
    /// Exponential velocity damping rate.
    pub damping: f32,
    /// Speeds below this are zeroed after damping.
    pub minvelocity: f32,
    /// Tangential (x) and normal (y) velocity loss on contact.
    pub bounce: Vec2,
    /// Seed for the initial velocity perturbation.
    pub seed: u64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            solver: SolverKind::MassSpring,
            gravity: 9.8,
            deltat: 0.5 * 1.0 / 60.0,
            mssteps: 200,
            pdbsteps: 100,
            frames: 120,
            damping: 2.0,
            minvelocity: 0.01,
            bounce: Vec2::new(0.05, 1.0),
            seed: 987121,
        }
    }
}

impl SimulationParams {
    /// Check parameter ranges. Called by the frame driver before any work.
    pub fn validate(&self) -> SimResult<()> {
        if !(self.deltat.is_finite() && self.deltat > 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "deltat must be positive and finite, got {}",
                self.deltat
            )));
        }
        if self.mssteps == 0 {
            return Err(SimError::InvalidConfig("mssteps must be at least 1".into()));
        }
        if self.pdbsteps == 0 {
            return Err(SimError::InvalidConfig("pdbsteps must be at least 1".into()));
        }
        if !self.gravity.is_finite() {
            return Err(SimError::InvalidConfig("gravity must be finite".into()));
        }
        if !self.damping.is_finite() {
            return Err(SimError::InvalidConfig("damping must be finite".into()));
        }
        if !(self.minvelocity.is_finite() && self.minvelocity >= 0.0) {
            return Err(SimError::InvalidConfig(
                "minvelocity must be non-negative".into(),
            ));
        }
        if !self.bounce.is_finite() {
            return Err(SimError::InvalidConfig("bounce must be finite".into()));
        }
        Ok(())
    }
}

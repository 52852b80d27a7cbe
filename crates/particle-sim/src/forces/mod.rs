//! Per-sub-step force fields of the mass-spring solver family.
//!
//! Every field runs on the same skeleton (sub-stepped semi-implicit Euler,
//! collision response, damping). Fields differ in what they write before
//! integration: a force per vertex, a kinematic adjustment of positions, or
//! both.

pub mod kinematic;
pub mod uniform;

use glam::Vec3;

/// Offset along the contact normal after a collision snap.
pub const COLLISION_BIAS: f32 = 0.005;

/// Force field strategy of a mass-spring family solver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForceField {
    /// Gravity plus spring forces.
    Gravity,
    /// Tiny yaw rotation, height lifted to twice the XZ extent. No forces.
    Swirl,
    /// Gravity plus a constant push along -X three times as strong.
    Slide,
    /// Flattened onto `y = 0` and rotated like [`ForceField::Swirl`].
    FlatSwirl,
    /// Flattened onto `y = 0`, then pushed toward the Y axis per quadrant.
    Quadrants,
}

impl ForceField {
    pub fn uses_springs(self) -> bool {
        matches!(self, ForceField::Gravity)
    }

    /// Distance kept between a snapped vertex and the collider surface.
    pub fn collision_bias(self) -> f32 {
        match self {
            ForceField::Gravity | ForceField::Slide => COLLISION_BIAS,
            ForceField::Swirl | ForceField::FlatSwirl | ForceField::Quadrants => 0.0,
        }
    }

    /// Run the field for one sub-step. Pinned vertices are left untouched.
    pub fn apply(self, positions: &mut [Vec3], forces: &mut [Vec3], invmass: &[f32], gravity: f32) {
        match self {
            ForceField::Gravity => {
                uniform::apply_acceleration(forces, invmass, Vec3::new(0.0, -gravity, 0.0));
            }
            ForceField::Swirl => {
                kinematic::rotate_yaw(positions, invmass);
                kinematic::lift_to_extent(positions, invmass);
            }
            ForceField::Slide => {
                uniform::apply_acceleration(
                    forces,
                    invmass,
                    Vec3::new(-gravity * 3.0, -gravity, 0.0),
                );
            }
            ForceField::FlatSwirl => {
                kinematic::flatten(positions, invmass);
                kinematic::rotate_yaw(positions, invmass);
            }
            ForceField::Quadrants => {
                kinematic::flatten(positions, invmass);
                uniform::apply_quadrant_field(positions, forces, invmass, gravity);
            }
        }
    }
}

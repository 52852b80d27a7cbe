use glam::Vec3;

/// Horizontal pull of the quadrant field.
pub const QUADRANT_PULL: f32 = 1.8;

/// Overwrite forces of non-pinned vertices with `acceleration / invmass`.
pub fn apply_acceleration(forces: &mut [Vec3], invmass: &[f32], acceleration: Vec3) {
    for (f, &w) in forces.iter_mut().zip(invmass) {
        if w == 0.0 {
            continue;
        }
        *f = acceleration / w;
    }
}

/// Overwrite forces with gravity plus a horizontal pull toward the Y axis
/// whose direction depends on the XZ quadrant of each vertex.
pub fn apply_quadrant_field(positions: &[Vec3], forces: &mut [Vec3], invmass: &[f32], gravity: f32) {
    for ((f, p), &w) in forces.iter_mut().zip(positions).zip(invmass) {
        if w == 0.0 {
            continue;
        }
        let x = if p.x >= 0.0 { -QUADRANT_PULL } else { QUADRANT_PULL };
        let z = if p.z >= 0.0 { -QUADRANT_PULL } else { QUADRANT_PULL };
        *f = Vec3::new(x, -gravity, z) / w;
    }
}

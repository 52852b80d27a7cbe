use glam::Vec3;

/// Yaw step per sub-step, in radians.
pub const YAW_STEP: f32 = 0.0001;

/// Rotate non-pinned vertices about the Y axis by [`YAW_STEP`].
///
/// `z` is computed from the already rotated `x`, so the map is slightly
/// non-orthogonal.
pub fn rotate_yaw(positions: &mut [Vec3], invmass: &[f32]) {
    let (sin, cos) = YAW_STEP.sin_cos();
    for (p, &w) in positions.iter_mut().zip(invmass) {
        if w == 0.0 {
            continue;
        }
        p.x = p.x * cos - p.z * sin;
        p.z = p.x * sin + p.z * cos;
    }
}

/// Set the height of non-pinned vertices to `2 * max(|x|, |z|)`.
pub fn lift_to_extent(positions: &mut [Vec3], invmass: &[f32]) {
    for (p, &w) in positions.iter_mut().zip(invmass) {
        if w == 0.0 {
            continue;
        }
        p.y = p.x.abs().max(p.z.abs()) * 2.0;
    }
}

/// Project non-pinned vertices onto the ground plane `y = 0`.
pub fn flatten(positions: &mut [Vec3], invmass: &[f32]) {
    for (p, &w) in positions.iter_mut().zip(invmass) {
        if w != 0.0 {
            p.y = 0.0;
        }
    }
}

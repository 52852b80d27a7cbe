use glam::{Vec2, Vec3};

/// Barycentric interpolation: `p0 (1 - u - v) + p1 u + p2 v`.
#[inline]
pub fn interpolate_triangle(p0: Vec3, p1: Vec3, p2: Vec3, uv: Vec2) -> Vec3 {
    p0 * (1.0 - uv.x - uv.y) + p1 * uv.x + p2 * uv.y
}

/// Interpolate over a quad split into triangles `(p0, p1, p3)` and `(p2, p3, p1)`.
///
/// Matches the uv convention of [`crate::bvh::intersect_quad`]: the lower
/// triangle covers `u + v <= 1`, the upper one is addressed with `1 - uv`.
#[inline]
pub fn interpolate_quad(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, uv: Vec2) -> Vec3 {
    if uv.x + uv.y <= 1.0 {
        interpolate_triangle(p0, p1, p3, uv)
    } else {
        interpolate_triangle(p2, p3, p1, Vec2::ONE - uv)
    }
}

/// Unit normal of a counter-clockwise triangle. Zero for degenerate input.
#[inline]
pub fn triangle_normal(p0: Vec3, p1: Vec3, p2: Vec3) -> Vec3 {
    (p1 - p0).cross(p2 - p0).normalize_or_zero()
}

/// Unit normal of a quad, averaged over its two split triangles.
#[inline]
pub fn quad_normal(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> Vec3 {
    (triangle_normal(p0, p1, p3) + triangle_normal(p2, p3, p1)).normalize_or_zero()
}

/// Map a uniform sample in `[0,1)^2` to a point on the unit sphere.
pub fn sample_sphere(ruv: Vec2) -> Vec3 {
    let z = 2.0 * ruv.y - 1.0;
    let r = (1.0 - z * z).clamp(0.0, 1.0).sqrt();
    let phi = std::f32::consts::TAU * ruv.x;
    Vec3::new(r * phi.cos(), r * phi.sin(), z)
}

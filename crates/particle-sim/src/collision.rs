//! Point-versus-collider probing.
//!
//! A point is inside a collider when a ray cast straight up from it hits a
//! surface whose interpolated normal also points up. This one-sided test can
//! misclassify thin or concave geometry.

use glam::Vec3;

use crate::bvh::Ray;
use crate::math::{interpolate_quad, interpolate_triangle};
use crate::scene::ParticleCollider;

/// Probe direction.
pub const PROBE_DIR: Vec3 = Vec3::Y;

/// Surface point and unit normal where a penetrating point should be
/// pushed out to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    pub position: Vec3,
    pub normal: Vec3,
}

/// A contact gathered by the position-based solver for one vertex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionRecord {
    pub vert: u32,
    pub position: Vec3,
    pub normal: Vec3,
}

/// Report a contact if `point` lies inside `collider`.
///
/// Colliders whose spatial index has not been built report nothing.
pub fn collide_collider(collider: &ParticleCollider, point: Vec3) -> Option<Contact> {
    let bvh = collider.bvh()?;
    let ray = Ray::new(point, PROBE_DIR);
    let p = &collider.positions;
    let n = &collider.normals;

    let contact = if !collider.quads.is_empty() {
        let hit = bvh.intersect_quads(&collider.quads, p, &ray)?;
        let [a, b, c, d] = collider.quads[hit.element].map(|v| v as usize);
        Contact {
            position: interpolate_quad(p[a], p[b], p[c], p[d], hit.uv),
            normal: interpolate_quad(n[a], n[b], n[c], n[d], hit.uv).normalize_or_zero(),
        }
    } else {
        let hit = bvh.intersect_triangles(&collider.triangles, p, &ray)?;
        let [a, b, c] = collider.triangles[hit.element].map(|v| v as usize);
        Contact {
            position: interpolate_triangle(p[a], p[b], p[c], hit.uv),
            normal: interpolate_triangle(n[a], n[b], n[c], hit.uv).normalize_or_zero(),
        }
    };

    (contact.normal.dot(ray.dir) > 0.0).then_some(contact)
}

/// Probe colliders in scene order and return the first contact found.
///
/// The first collider that reports a hit wins, even if a later collider has
/// a closer surface.
pub fn first_contact(colliders: &[ParticleCollider], point: Vec3) -> Option<Contact> {
    colliders
        .iter()
        .find_map(|collider| collide_collider(collider, point))
}

use glam::Vec3;

use crate::collision::{first_contact, CollisionRecord, Contact};
use crate::scene::ParticleCollider;

/// Gather contacts for every non-pinned vertex before any correction.
pub fn detect_collisions(
    positions: &[Vec3],
    invmass: &[f32],
    colliders: &[ParticleCollider],
) -> Vec<CollisionRecord> {
    let mut records = Vec::new();
    for (i, &p) in positions.iter().enumerate() {
        if invmass[i] == 0.0 {
            continue;
        }
        if let Some(Contact { position, normal }) = first_contact(colliders, p) {
            records.push(CollisionRecord {
                vert: i as u32,
                position,
                normal,
            });
        }
    }
    records
}

/// Push vertices that sit below their recorded contact plane back onto it.
///
/// Penetration is `dot(p - contact, normal)`; a negative value moves the
/// vertex by exactly that depth along the normal.
pub fn solve_collisions(records: &[CollisionRecord], positions: &mut [Vec3], invmass: &[f32]) {
    for record in records {
        let i = record.vert as usize;
        if invmass[i] == 0.0 {
            continue;
        }
        let depth = (positions[i] - record.position).dot(record.normal);
        if depth >= 0.0 {
            continue;
        }
        positions[i] += -depth * record.normal;
    }
}

/// Snap a penetrating vertex onto the contact, offset by `bias` along the
/// normal, and split its velocity into damped tangential and reflected
/// normal parts.
///
/// `bounce.x` scales away tangential speed, `bounce.y` normal speed.
#[inline]
pub fn respond(
    contact: &Contact,
    bias: f32,
    bounce: glam::Vec2,
    position: &mut Vec3,
    velocity: &mut Vec3,
) {
    *position = contact.position + contact.normal * bias;
    let projection = velocity.dot(contact.normal);
    let normal_part = contact.normal * projection;
    *velocity = (*velocity - normal_part) * (1.0 - bounce.x) - normal_part * (1.0 - bounce.y);
}

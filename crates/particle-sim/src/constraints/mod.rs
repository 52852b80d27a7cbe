//! Spring and collider constraints.

pub mod contact;
pub mod spring;

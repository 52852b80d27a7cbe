//! Particle and cloth simulation against static mesh colliders.
//!
//! A [`Scene`] owns simulated shapes (particle clouds, cloths) and static
//! colliders. [`simulate_frames`] initializes it once and advances it frame
//! by frame with one of the solvers named by [`SolverKind`]: sub-stepped
//! mass-spring, position-based dynamics, or one of the kinematic variants.
//! Collisions are found by casting a ray up from each vertex through a
//! per-collider [`bvh::Bvh`].

pub mod bvh;
pub mod collision;
pub mod config;
pub mod constraints;
pub mod driver;
pub mod error;
pub mod forces;
pub mod init;
pub mod math;
pub mod scene;
pub mod solvers;
pub mod topology;

pub use config::{SimulationParams, SolverKind};
pub use driver::{simulate_frame, simulate_frames, ProgressCallback};
pub use error::{SimError, SimResult};
pub use init::init_simulation;
pub use scene::{
    BodyHandle, BodyKind, BodyMesh, ColliderId, ParticleCollider, ParticleShape, Scene, ShapeId,
};

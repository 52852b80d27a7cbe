//! Simulated shapes, static colliders, and the scene that owns them.

use glam::Vec3;

use crate::bvh::Bvh;
use crate::collision::CollisionRecord;
use crate::constraints::spring::Spring;
use crate::error::{SimError, SimResult};

/// Handle to a shape, valid for the scene that returned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeId(pub u32);

/// Handle to a collider, valid for the scene that returned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderId(pub u32);

impl ShapeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl ColliderId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Snapshot restored by every call to [`crate::init::init_simulation`].
#[derive(Clone, Debug, Default)]
pub(crate) struct InitialState {
    pub(crate) positions: Vec<Vec3>,
    pub(crate) normals: Vec<Vec3>,
    pub(crate) velocities: Vec<Vec3>,
    pub(crate) invmass: Vec<f32>,
    pub(crate) radius: Vec<f32>,
    pub(crate) pinned: Vec<u32>,
}

/// A simulated body: a particle cloud or a cloth mesh.
///
/// Per-vertex state is stored as parallel arrays of equal length. A vertex
/// is pinned iff its inverse mass is zero; solvers never move pinned
/// vertices.
#[derive(Clone, Debug)]
pub struct ParticleShape {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub radius: Vec<f32>,
    pub invmass: Vec<f32>,
    pub velocities: Vec<Vec3>,

    /// Force accumulator of the mass-spring family.
    pub forces: Vec<Vec3>,
    /// Positions at the start of the current frame.
    pub old_positions: Vec<Vec3>,
    /// Distance constraints, built by the initializer.
    pub springs: Vec<Spring>,
    /// Contacts gathered by the position-based solver for the current step.
    pub collisions: Vec<CollisionRecord>,

    pub points: Vec<u32>,
    pub triangles: Vec<[u32; 3]>,
    pub quads: Vec<[u32; 4]>,

    /// Springs are built only when this is positive.
    pub spring_coeff: f32,
    /// Emitter velocity recorded by [`ParticleShape::set_velocities`]. Not
    /// applied by the initializer.
    pub emit_velocity: Vec3,
    /// Scale of the random initial velocity perturbation.
    pub emit_rngscale: f32,

    pub(crate) initial: InitialState,
}

impl ParticleShape {
    fn new(initial: InitialState) -> Self {
        let count = initial.positions.len();
        Self {
            positions: initial.positions.clone(),
            normals: initial.normals.clone(),
            radius: initial.radius.clone(),
            invmass: initial.invmass.clone(),
            velocities: initial.velocities.clone(),
            forces: vec![Vec3::ZERO; count],
            old_positions: Vec::new(),
            springs: Vec::new(),
            collisions: Vec::new(),
            points: Vec::new(),
            triangles: Vec::new(),
            quads: Vec::new(),
            spring_coeff: 0.0,
            emit_velocity: Vec3::ZERO,
            emit_rngscale: 0.0,
            initial,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_pinned(&self, vertex: usize) -> bool {
        self.invmass[vertex] == 0.0
    }

    /// Vertex indices pinned at initialization.
    pub fn pinned(&self) -> &[u32] {
        &self.initial.pinned
    }

    /// Record the emitter velocity and the random perturbation scale.
    /// The scale takes effect at the next initialization.
    pub fn set_velocities(&mut self, velocity: Vec3, random_scale: f32) {
        self.emit_velocity = velocity;
        self.emit_rngscale = random_scale;
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    pub fn invmass(&self) -> &[f32] {
        &self.invmass
    }

    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    /// Positions as packed `xyz` floats, ready for a vertex buffer upload.
    pub fn position_data(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Normals as packed `xyz` floats.
    pub fn normal_data(&self) -> &[f32] {
        bytemuck::cast_slice(&self.normals)
    }
}

/// A static obstacle. Geometry is fixed once the simulation is initialized.
#[derive(Clone, Debug)]
pub struct ParticleCollider {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub radius: Vec<f32>,
    pub triangles: Vec<[u32; 3]>,
    pub quads: Vec<[u32; 4]>,
    pub(crate) bvh: Option<Bvh>,
}

impl ParticleCollider {
    /// Spatial index, present after initialization.
    pub fn bvh(&self) -> Option<&Bvh> {
        self.bvh.as_ref()
    }

    /// Build the spatial index from quads if present, triangles otherwise.
    pub fn build_bvh(&mut self) {
        let bvh = if !self.quads.is_empty() {
            Bvh::from_quads(&self.quads, &self.positions)
        } else {
            Bvh::from_triangles(&self.triangles, &self.positions)
        };
        self.bvh = Some(bvh);
    }
}

/// How an externally loaded body takes part in the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    /// Free particle cloud with a random initial velocity.
    Particles,
    /// Spring-connected cloth pinned at two corners.
    Cloth,
    /// Static obstacle.
    Collider,
    /// Static ground; behaves like a collider.
    Floor,
}

/// Mesh data handed over by the scene loader.
#[derive(Clone, Debug, Default)]
pub struct BodyMesh {
    pub points: Vec<u32>,
    pub triangles: Vec<[u32; 3]>,
    pub quads: Vec<[u32; 4]>,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub radius: Vec<f32>,
}

/// Result of [`Scene::add_body`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyHandle {
    Shape(ShapeId),
    Collider(ColliderId),
}

/// Mass of a whole particle cloud created through [`Scene::add_body`].
pub const PARTICLES_MASS: f32 = 1.0;
/// Random velocity factor of particle clouds created through [`Scene::add_body`].
pub const PARTICLES_RANDOM_VELOCITY: f32 = 1.0;
/// Mass of a whole cloth created through [`Scene::add_body`].
pub const CLOTH_MASS: f32 = 0.5;
/// Spring coefficient of cloths created through [`Scene::add_body`].
pub const CLOTH_SPRING_COEFF: f32 = 1.0 / 8000.0;

/// Owns every shape and collider. Insertion order is simulation order.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub shapes: Vec<ParticleShape>,
    pub colliders: Vec<ParticleCollider>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shape(&self, id: ShapeId) -> &ParticleShape {
        &self.shapes[id.index()]
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> &mut ParticleShape {
        &mut self.shapes[id.index()]
    }

    pub fn collider(&self, id: ColliderId) -> &ParticleCollider {
        &self.colliders[id.index()]
    }

    /// Add a particle cloud. Each vertex gets `1 / (mass * n)` inverse mass.
    pub fn add_particles(
        &mut self,
        points: &[u32],
        positions: &[Vec3],
        radius: &[f32],
        mass: f32,
        random_velocity: f32,
    ) -> SimResult<ShapeId> {
        let count = positions.len();
        check_len("radius", count, radius.len())?;
        check_indices("points", points.iter().copied(), count)?;
        let invmass = uniform_invmass(mass, count)?;

        let mut shape = ParticleShape::new(InitialState {
            positions: positions.to_vec(),
            normals: vec![Vec3::Z; count],
            velocities: vec![Vec3::ZERO; count],
            invmass,
            radius: radius.to_vec(),
            pinned: Vec::new(),
        });
        shape.points = points.to_vec();
        shape.emit_rngscale = random_velocity;
        Ok(self.push_shape(shape))
    }

    /// Add a quad cloth. Springs with coefficient `coeff` are built at
    /// initialization; `pinned` vertices get zero inverse mass.
    #[allow(clippy::too_many_arguments)]
    pub fn add_cloth(
        &mut self,
        quads: &[[u32; 4]],
        positions: &[Vec3],
        normals: &[Vec3],
        radius: &[f32],
        mass: f32,
        coeff: f32,
        pinned: &[u32],
    ) -> SimResult<ShapeId> {
        check_indices("quads", quads.iter().flatten().copied(), positions.len())?;
        let mut shape = cloth_shape(positions, normals, radius, mass, coeff, pinned)?;
        shape.quads = quads.to_vec();
        Ok(self.push_shape(shape))
    }

    /// Add a static collider from triangles or quads.
    pub fn add_collider(
        &mut self,
        triangles: &[[u32; 3]],
        quads: &[[u32; 4]],
        positions: &[Vec3],
        normals: &[Vec3],
        radius: &[f32],
    ) -> SimResult<ColliderId> {
        let count = positions.len();
        check_len("normals", count, normals.len())?;
        check_len("radius", count, radius.len())?;
        if triangles.is_empty() && quads.is_empty() {
            return Err(SimError::InvalidCollider(
                "collider needs triangles or quads".into(),
            ));
        }
        check_indices("triangles", triangles.iter().flatten().copied(), count)?;
        check_indices("quads", quads.iter().flatten().copied(), count)?;

        let id = ColliderId(self.colliders.len() as u32);
        self.colliders.push(ParticleCollider {
            positions: positions.to_vec(),
            normals: normals.to_vec(),
            radius: radius.to_vec(),
            triangles: triangles.to_vec(),
            quads: quads.to_vec(),
            bvh: None,
        });
        Ok(id)
    }

    /// Convert a loaded body according to its classification.
    ///
    /// Cloths are pinned at the last vertex and at `n - floor(sqrt(n))`,
    /// the two top corners of a square grid laid out row by row.
    pub fn add_body(&mut self, kind: BodyKind, mesh: &BodyMesh) -> SimResult<BodyHandle> {
        match kind {
            BodyKind::Particles => self
                .add_particles(
                    &mesh.points,
                    &mesh.positions,
                    &mesh.radius,
                    PARTICLES_MASS,
                    PARTICLES_RANDOM_VELOCITY,
                )
                .map(BodyHandle::Shape),
            BodyKind::Cloth => {
                let count = mesh.positions.len();
                let pinned = if count == 0 {
                    Vec::new()
                } else {
                    let side = (count as f32).sqrt() as usize;
                    vec![(count - 1) as u32, (count - side) as u32]
                };
                if !mesh.quads.is_empty() || mesh.triangles.is_empty() {
                    return self
                        .add_cloth(
                            &mesh.quads,
                            &mesh.positions,
                            &mesh.normals,
                            &mesh.radius,
                            CLOTH_MASS,
                            CLOTH_SPRING_COEFF,
                            &pinned,
                        )
                        .map(BodyHandle::Shape);
                }
                check_indices("triangles", mesh.triangles.iter().flatten().copied(), count)?;
                let mut shape = cloth_shape(
                    &mesh.positions,
                    &mesh.normals,
                    &mesh.radius,
                    CLOTH_MASS,
                    CLOTH_SPRING_COEFF,
                    &pinned,
                )?;
                shape.triangles = mesh.triangles.clone();
                Ok(BodyHandle::Shape(self.push_shape(shape)))
            }
            BodyKind::Collider | BodyKind::Floor => self
                .add_collider(
                    &mesh.triangles,
                    &mesh.quads,
                    &mesh.positions,
                    &mesh.normals,
                    &mesh.radius,
                )
                .map(BodyHandle::Collider),
        }
    }

    fn push_shape(&mut self, shape: ParticleShape) -> ShapeId {
        let id = ShapeId(self.shapes.len() as u32);
        self.shapes.push(shape);
        id
    }
}

fn cloth_shape(
    positions: &[Vec3],
    normals: &[Vec3],
    radius: &[f32],
    mass: f32,
    coeff: f32,
    pinned: &[u32],
) -> SimResult<ParticleShape> {
    let count = positions.len();
    check_len("normals", count, normals.len())?;
    check_len("radius", count, radius.len())?;
    check_indices("pinned", pinned.iter().copied(), count)?;
    let invmass = uniform_invmass(mass, count)?;

    let mut shape = ParticleShape::new(InitialState {
        positions: positions.to_vec(),
        normals: normals.to_vec(),
        velocities: vec![Vec3::ZERO; count],
        invmass,
        radius: radius.to_vec(),
        pinned: pinned.to_vec(),
    });
    shape.spring_coeff = coeff;
    Ok(shape)
}

fn uniform_invmass(mass: f32, count: usize) -> SimResult<Vec<f32>> {
    if !(mass.is_finite() && mass > 0.0) {
        return Err(SimError::InvalidConfig(format!(
            "mass must be positive and finite, got {mass}"
        )));
    }
    Ok(vec![1.0 / (mass * count as f32); count])
}

fn check_len(field: &'static str, expected: usize, actual: usize) -> SimResult<()> {
    if expected != actual {
        return Err(SimError::InvalidShape {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}

fn check_indices(
    field: &'static str,
    indices: impl IntoIterator<Item = u32>,
    count: usize,
) -> SimResult<()> {
    match indices.into_iter().find(|&i| i as usize >= count) {
        Some(index) => Err(SimError::IndexOutOfBounds {
            field,
            index: index as usize,
            count,
        }),
        None => Ok(()),
    }
}

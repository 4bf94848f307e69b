//! The particle system: particle arena, meshes, forces, constraints and
//! the per-frame predict-then-relax loop.

use std::time::Instant;

use velum_contact::{potential_vertex_contacts, CollisionOracle, MeshCollider, VertexContact};
use velum_math::geometry::point_line_distance;
use velum_math::Vec3;
use velum_mesh::{normals, Mesh, MeshDescription, Particle};
use velum_types::{MeshId, ParticleId, Scalar, VelumError, VelumResult};

use crate::bending::BendConstraint;
use crate::collision::CollisionConstraint;
use crate::config::SimulationConfig;
use crate::constraint::{Constraint, Force};
use crate::damping::damp_velocities;
use crate::gravity::Gravity;
use crate::pressure::PressureConstraint;
use crate::report::FrameReport;
use crate::stretch::StretchConstraint;

/// Owns every particle and mesh and advances them in time.
///
/// ```text
/// system.add_force(Force::Gravity(..));
/// let cloth = system.add_mesh(&desc, density)?;
/// system.add_mesh_constraints(cloth)?;
/// loop {
///     system.advance_time(dt)?;
/// }
/// ```
pub struct ParticleSystem {
    config: SimulationConfig,
    particles: Vec<Particle>,
    meshes: Vec<Mesh>,
    colliders: Vec<Box<dyn CollisionOracle>>,
    forces: Vec<Force>,
    constraints: Vec<Constraint>,
    time: Scalar,
    frame: u64,
}

impl ParticleSystem {
    /// Creates an empty system after validating `config`.
    pub fn new(config: SimulationConfig) -> VelumResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            particles: Vec::new(),
            meshes: Vec::new(),
            colliders: Vec::new(),
            forces: Vec::new(),
            constraints: Vec::new(),
            time: 0.0,
            frame: 0,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Simulation time (seconds).
    pub fn time(&self) -> Scalar {
        self.time
    }

    /// Number of frames advanced since creation or the last reset.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Overwrites the simulation clock, e.g. when resuming from a snapshot.
    pub fn set_clock(&mut self, time: Scalar, frame: u64) {
        self.time = time;
        self.frame = frame;
    }

    // ─── Particles ────────────────────────────────────────────

    /// All particles, indexed by [`ParticleId`].
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Looks up one particle.
    pub fn particle(&self, id: ParticleId) -> VelumResult<&Particle> {
        self.particles
            .get(id.index())
            .ok_or(VelumError::UnknownParticle(id.0))
    }

    /// Mutable access to one particle, e.g. for dragging it with the mouse.
    pub fn particle_mut(&mut self, id: ParticleId) -> VelumResult<&mut Particle> {
        self.particles
            .get_mut(id.index())
            .ok_or(VelumError::UnknownParticle(id.0))
    }

    /// Creates a free particle with the configured particle mass.
    pub fn create_particle(&mut self, x0: Vec3) -> ParticleId {
        let mass = self.config.particle_mass;
        self.create_particle_with_mass(x0, mass)
    }

    /// Creates a free particle with an explicit mass.
    pub fn create_particle_with_mass(&mut self, x0: Vec3, mass: Scalar) -> ParticleId {
        let id = ParticleId(self.particles.len() as u32);
        self.particles.push(Particle::new(id, x0, mass));
        id
    }

    /// Pins or releases a particle.
    pub fn set_pinned(&mut self, id: ParticleId, pinned: bool) -> VelumResult<()> {
        self.particle_mut(id)?.pinned = pinned;
        Ok(())
    }

    // ─── Meshes ───────────────────────────────────────────────

    /// All meshes, indexed by [`MeshId`].
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Looks up one mesh.
    pub fn mesh(&self, id: MeshId) -> VelumResult<&Mesh> {
        self.meshes.get(id.index()).ok_or(VelumError::UnknownMesh(id.0))
    }

    /// Adds a deformable mesh: one particle per vertex, edges with rest
    /// lengths and triangles. Constraints are added separately with
    /// [`add_mesh_constraints`](Self::add_mesh_constraints).
    pub fn add_mesh(&mut self, desc: &MeshDescription, density: Scalar) -> VelumResult<MeshId> {
        if !(density.is_finite() && density > 0.0) {
            return Err(VelumError::InvalidConfig(format!(
                "mesh density must be positive, got {density}"
            )));
        }
        let mesh = self.build_mesh(desc, density)?;
        mesh.update_mass(&mut self.particles);
        Ok(self.push_mesh(mesh))
    }

    /// Adds a collision-only mesh. Its vertices are pinned and a collider
    /// is built for it.
    pub fn add_static_mesh(&mut self, desc: &MeshDescription) -> VelumResult<MeshId> {
        let density = self.config.cloth_density;
        let mut mesh = self.build_mesh(desc, density)?;
        mesh.is_static = true;
        for &id in &mesh.vertices {
            self.particles[id.index()].pinned = true;
        }
        self.colliders
            .push(Box::new(MeshCollider::new(&mesh, &self.particles)));
        Ok(self.push_mesh(mesh))
    }

    fn build_mesh(&mut self, desc: &MeshDescription, density: Scalar) -> VelumResult<Mesh> {
        desc.validate()?;
        let first = self.particles.len();
        let ids: Vec<ParticleId> = desc
            .positions
            .iter()
            .map(|&p| self.create_particle(p))
            .collect();
        match Mesh::from_description(desc, &ids, density) {
            Ok(mesh) => Ok(mesh),
            Err(e) => {
                self.particles.truncate(first);
                Err(e)
            }
        }
    }

    fn push_mesh(&mut self, mesh: Mesh) -> MeshId {
        let id = MeshId(self.meshes.len() as u32);
        tracing::debug!(
            mesh = id.0,
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            is_static = mesh.is_static,
            "mesh added"
        );
        self.meshes.push(mesh);
        id
    }

    /// Adds stretch constraints on every edge, bend constraints on every
    /// interior edge and, for closed meshes, a pressure constraint.
    pub fn add_mesh_constraints(&mut self, id: MeshId) -> VelumResult<()> {
        let mesh = self.mesh(id)?;
        let n = self.config.solver_iterations;

        let mut added: Vec<Constraint> = mesh
            .edges
            .iter()
            .map(|e| {
                StretchConstraint::new(e.v[0], e.v[1], e.rest_length, self.config.stretch_stiffness, n)
                    .into()
            })
            .collect();
        added.extend(
            mesh.hinges()
                .iter()
                .map(|&h| BendConstraint::new(h, self.config.bend_stiffness, n).into()),
        );
        if mesh.is_closed() {
            added.push(PressureConstraint::new(mesh, self.config.pressure_coeff).into());
        } else {
            tracing::debug!(mesh = id.0, "open mesh, no pressure constraint");
        }

        tracing::debug!(mesh = id.0, constraints = added.len(), "mesh constraints added");
        self.constraints.extend(added);
        Ok(())
    }

    /// Adds a pressure constraint with an explicit coefficient.
    pub fn add_pressure_constraint(&mut self, id: MeshId, coeff: Scalar) -> VelumResult<()> {
        let mesh = self.mesh(id)?;
        if !mesh.is_closed() {
            tracing::warn!(mesh = id.0, "pressure constraint on an open mesh");
        }
        let c = PressureConstraint::new(mesh, coeff);
        self.constraints.push(c.into());
        Ok(())
    }

    /// Links two particles with a stretch constraint whose rest length is
    /// the configured `stretch_distance`.
    pub fn add_distance_constraint(&mut self, a: ParticleId, b: ParticleId) -> VelumResult<()> {
        self.particle(a)?;
        self.particle(b)?;
        let c = StretchConstraint::new(
            a,
            b,
            self.config.stretch_distance,
            self.config.stretch_stiffness,
            self.config.solver_iterations,
        );
        self.constraints.push(c.into());
        Ok(())
    }

    // ─── Forces & constraints ─────────────────────────────────

    /// Registered forces.
    pub fn forces(&self) -> &[Force] {
        &self.forces
    }

    /// Registers a force until removed.
    pub fn add_force(&mut self, force: Force) {
        self.forces.push(force);
    }

    /// Registers gravity from the configured gravity vector.
    pub fn add_gravity(&mut self) {
        let g = Gravity::new(self.config.gravity_vector());
        self.add_force(g.into());
    }

    /// Removes the first force equal to `force`. Returns true if one was removed.
    pub fn remove_force(&mut self, force: &Force) -> bool {
        match self.forces.iter().position(|f| f == force) {
            Some(i) => {
                self.forces.remove(i);
                true
            }
            None => false,
        }
    }

    /// Persistent constraints in application order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Registers a persistent constraint, applied after those already present.
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Registers an additional collision oracle for static scenery.
    pub fn add_collider(&mut self, collider: Box<dyn CollisionOracle>) {
        self.colliders.push(collider);
    }

    /// Rebuilds every collider from current positions.
    ///
    /// Needed after moving the vertices of a static mesh by hand.
    pub fn update_colliders(&mut self) {
        for c in &mut self.colliders {
            c.update(&self.particles);
        }
    }

    // ─── Time integration ─────────────────────────────────────

    /// Advances by the configured `dt`.
    pub fn step(&mut self) -> VelumResult<FrameReport> {
        let dt = self.config.dt;
        self.advance_time(dt)
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Forces, explicit prediction, `solver_iterations` relaxation sweeps
    /// with fresh collision probes, then velocity reconstruction.
    pub fn advance_time(&mut self, dt: Scalar) -> VelumResult<FrameReport> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(VelumError::InvalidConfig(format!(
                "timestep must be positive, got {dt}"
            )));
        }
        let start = Instant::now();

        for mesh in self.meshes.iter().filter(|m| !m.is_static) {
            mesh.update_mass(&mut self.particles);
        }

        for p in &mut self.particles {
            p.f = Vec3::ZERO;
            p.x_prev = p.x;
        }

        for force in &self.forces {
            force.apply(&mut self.particles);
        }

        for p in &mut self.particles {
            p.apply_changes();
            if !p.pinned && p.m > 0.0 {
                p.v += p.f * (dt / p.m);
                p.x += p.v * dt;
            }
        }

        let mut collisions = self.resolve_collisions();

        let iterations = self.config.solver_iterations;
        for sweep in 0..iterations {
            for c in &self.constraints {
                c.apply(&mut self.particles);
            }
            let resolved = self.resolve_collisions();
            collisions += resolved;
            tracing::trace!(frame = self.frame, sweep, resolved, "relaxation sweep");
        }

        let retention = self.config.velocity_retention;
        for p in &mut self.particles {
            p.v = (p.x - p.x_prev) * (retention / dt);
        }

        if self.config.global_damping > 0.0 {
            let coeff = self.config.global_damping;
            for mesh in self.meshes.iter().filter(|m| !m.is_static) {
                damp_velocities(coeff, &mesh.vertices, &mut self.particles);
            }
        }

        self.time += dt;
        let report = FrameReport {
            frame: self.frame,
            time: self.time,
            iterations,
            collisions,
            wall_time: start.elapsed().as_secs_f64(),
        };
        self.frame += 1;

        tracing::debug!(
            frame = report.frame,
            time = report.time,
            collisions,
            wall_ms = report.wall_time * 1000.0,
            "frame advanced"
        );
        Ok(report)
    }

    /// Probes every moving particle path against the static colliders.
    pub fn probe_collisions(&self) -> Vec<CollisionConstraint> {
        if self.colliders.is_empty() {
            return Vec::new();
        }
        let mut found = Vec::new();
        for p in self.particles.iter().filter(|p| !p.pinned) {
            for collider in &self.colliders {
                if let Some(hit) = collider.probe_segment(p.x_prev, p.x) {
                    found.push(CollisionConstraint::from_hit(p.id, &hit));
                }
            }
        }
        found
    }

    fn resolve_collisions(&mut self) -> usize {
        let fresh = self.probe_collisions();
        fresh
            .iter()
            .filter(|c| c.apply(&mut self.particles))
            .count()
    }

    /// Returns every particle to its rest position with zero velocity and
    /// force, clears pins and sets time back to zero.
    ///
    /// Vertices of static meshes stay pinned.
    pub fn reset(&mut self) {
        for p in &mut self.particles {
            p.reset();
        }
        for mesh in self.meshes.iter().filter(|m| m.is_static) {
            for &id in &mesh.vertices {
                self.particles[id.index()].pinned = true;
            }
        }
        self.update_colliders();
        self.time = 0.0;
        self.frame = 0;
        tracing::debug!("particle system reset");
    }

    /// Damps the velocities of `mesh` toward its rigid-body motion.
    pub fn global_velocity_damping(&mut self, coeff: Scalar, mesh: MeshId) -> VelumResult<()> {
        let mesh = self
            .meshes
            .get(mesh.index())
            .ok_or(VelumError::UnknownMesh(mesh.0))?;
        damp_velocities(coeff, &mesh.vertices, &mut self.particles);
        Ok(())
    }

    // ─── Queries ──────────────────────────────────────────────

    /// Particle closest to `point`, or `None` if there are no particles.
    pub fn nearest_particle(&self, point: Vec3) -> Option<ParticleId> {
        self.particles
            .iter()
            .map(|p| (p.id, p.x.distance_squared(point)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    /// Particle closest to the infinite line through `a` and `b`.
    pub fn nearest_particle_to_line(&self, a: Vec3, b: Vec3) -> Option<ParticleId> {
        self.particles
            .iter()
            .map(|p| (p.id, point_line_distance(p.x, a, b)))
            .min_by(|x, y| x.1.total_cmp(&y.1))
            .map(|(id, _)| id)
    }

    /// Current unit normal of every triangle of `mesh`.
    pub fn triangle_normals(&self, mesh: MeshId) -> VelumResult<Vec<Vec3>> {
        let mesh = self.mesh(mesh)?;
        Ok(mesh
            .triangles
            .iter()
            .map(|t| t.normal(&self.particles))
            .collect())
    }

    /// Area-weighted vertex normals of `mesh`.
    pub fn vertex_normals(&self, mesh: MeshId) -> VelumResult<Vec<Vec3>> {
        let mesh = self.mesh(mesh)?;
        Ok(normals::vertex_normals(mesh, &self.particles))
    }

    /// Vertices of `mesh` whose triangles currently intersect static
    /// scenery, each paired with the static triangle it touches.
    pub fn potential_contacts(&self, mesh: MeshId) -> VelumResult<Vec<VertexContact>> {
        let mesh = self.mesh(mesh)?;
        let moving = MeshCollider::new(mesh, &self.particles);
        Ok(self
            .colliders
            .iter()
            .flat_map(|c| potential_vertex_contacts(c.as_ref(), &moving))
            .collect())
    }

    /// Total kinetic energy of unpinned particles.
    pub fn kinetic_energy(&self) -> Scalar {
        self.particles.iter().map(Particle::kinetic_energy).sum()
    }

    /// Gravitational potential energy of registered gravity forces.
    pub fn potential_energy(&self) -> Scalar {
        self.forces
            .iter()
            .map(|f| match f {
                Force::Gravity(g) => g.potential_energy(&self.particles),
            })
            .sum()
    }
}

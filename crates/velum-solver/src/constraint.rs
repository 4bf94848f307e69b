//! Closed sets of forces and constraints driven by the particle system.
//!
//! Forces add to force accumulators once per frame. Constraints move
//! positions directly and run once per relaxation sweep, in registration
//! order.

use serde::{Deserialize, Serialize};
use velum_mesh::Particle;

use crate::bending::BendConstraint;
use crate::collision::CollisionConstraint;
use crate::gravity::Gravity;
use crate::pressure::PressureConstraint;
use crate::stretch::StretchConstraint;

/// A force contributing to the force accumulators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Force {
    /// Uniform gravity.
    Gravity(Gravity),
}

impl Force {
    /// Adds this force to the pending force deltas.
    pub fn apply(&self, particles: &mut [Particle]) {
        match self {
            Force::Gravity(g) => g.apply(particles),
        }
    }

    /// Returns the force kind name.
    pub fn name(&self) -> &'static str {
        match self {
            Force::Gravity(_) => "gravity",
        }
    }
}

/// A position constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Constraint {
    /// Edge length.
    Stretch(StretchConstraint),
    /// Dihedral angle across an interior edge.
    Bend(BendConstraint),
    /// Enclosed volume of a closed mesh.
    Pressure(PressureConstraint),
    /// Non-penetration against a static triangle.
    Collision(CollisionConstraint),
}

impl Constraint {
    /// Projects the constrained particles.
    pub fn apply(&self, particles: &mut [Particle]) {
        match self {
            Constraint::Stretch(c) => c.apply(particles),
            Constraint::Bend(c) => c.apply(particles),
            Constraint::Pressure(c) => c.apply(particles),
            Constraint::Collision(c) => {
                c.apply(particles);
            }
        }
    }

    /// Returns the constraint kind name.
    pub fn name(&self) -> &'static str {
        match self {
            Constraint::Stretch(_) => "stretch",
            Constraint::Bend(_) => "bend",
            Constraint::Pressure(_) => "pressure",
            Constraint::Collision(_) => "collision",
        }
    }
}

impl From<Gravity> for Force {
    fn from(g: Gravity) -> Self {
        Force::Gravity(g)
    }
}

impl From<StretchConstraint> for Constraint {
    fn from(c: StretchConstraint) -> Self {
        Constraint::Stretch(c)
    }
}

impl From<BendConstraint> for Constraint {
    fn from(c: BendConstraint) -> Self {
        Constraint::Bend(c)
    }
}

impl From<PressureConstraint> for Constraint {
    fn from(c: PressureConstraint) -> Self {
        Constraint::Pressure(c)
    }
}

impl From<CollisionConstraint> for Constraint {
    fn from(c: CollisionConstraint) -> Self {
        Constraint::Collision(c)
    }
}

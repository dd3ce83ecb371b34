//! Example physical models for the odeflow engine.
//!
//! Each model is a stateless [`VectorField`](odeflow_core::VectorField) that
//! reads its constants from [`Parameters`](odeflow_core::Parameters) by name,
//! and ships a [`Scenario`] with the initial state, span, and parameter values
//! of a classic textbook setup.

pub mod cooling;
pub mod falling_body;
pub mod predator_prey;
pub mod projectile;
pub mod rlc;
pub mod sir;

mod scenario;

use odeflow_core::Predicate;
use odeflow_solvers::events::EventQuery;

pub use cooling::NewtonCooling;
pub use falling_body::{FallingBody, FallingBodyWithPosition};
pub use predator_prey::PredatorPrey;
pub use projectile::Projectile;
pub use rlc::RlcCircuit;
pub use scenario::Scenario;
pub use sir::Sir;

/// First time state component `component` drops to zero or below.
///
/// Populations in [`PredatorPrey`] and [`Sir`] only approach zero
/// asymptotically, so for positive initial states this query finds nothing.
#[must_use]
pub fn extinction(name: &str, component: usize) -> EventQuery {
    let died_out = Predicate::new(move |_, y| y.get(component).is_some_and(|v| *v <= 0.0));
    EventQuery::predicate(name, died_out).first()
}

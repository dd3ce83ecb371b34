//! Adaptive ODE integration, dense output, and event location.
//!
//! - [`dopri5`]: Dormand-Prince 5(4) integrator producing a [`dopri5::Trajectory`]
//! - [`events`]: threshold, extremum, and predicate queries on a trajectory
//! - [`simulation`]: one-call runs combining integration, sampling, and events
//! - [`equation`]: scalar root finding used by the above

pub mod dopri5;
pub mod equation;
pub mod events;
pub mod simulation;

pub use simulation::{Simulation, SimulationBuilder, linspace};

//! Root finding for scalar equations `g(x) = 0`.
//!
//! # Solvers
//!
//! - [`bisection`]: guaranteed convergence on a sign-changing bracket
//! - [`transition`]: locates where a boolean condition switches on

pub mod bisection;
pub mod transition;

//! Core traits and types for odeflow.
//!
//! This crate defines the shared abstractions that solvers and models build on:
//!
//! - [`VectorField`]: the right-hand side `f(t, y, params)` of an ODE system
//! - [`Parameters`]: immutable named constants and forcing functions
//! - [`Predicate`]: a pure boolean condition on `(t, state)`
//! - [`Observer`]: receives solver events and optionally returns control actions

mod field;
mod observer;
mod parameters;
mod predicate;

pub use field::{FnField, VectorField, field_fn};
pub use observer::Observer;
pub use parameters::{Forcing, Parameter, ParameterError, Parameters};
pub use predicate::Predicate;

//! Numeric kernels for rheoflow.
//!
//! This crate provides the three contracts the flow solvers are built on:
//! - a bracketed scalar root finder (Brent) that fails when the bracket has
//!   no sign change
//! - adaptive Gauss-Kronrod quadrature returning a value and an error estimate
//! - a Newton solver for square nonlinear systems with line search, a bounded
//!   iteration budget and a finite-difference Jacobian
//!
//! Every kernel is generic over the caller's error type (`E: From<SolverError>`)
//! so fallible integrands and residuals can propagate their own errors.

pub mod bracket;
pub mod error;
pub mod jacobian;
pub mod newton;
pub mod quadrature;

pub use bracket::{BracketConfig, brent};
pub use error::{SolverError, SolverResult};
pub use jacobian::finite_difference_jacobian;
pub use newton::{NewtonConfig, NewtonResult, newton_solve};
pub use quadrature::{Quadrature, QuadratureConfig, integrate};

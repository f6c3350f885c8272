//! rf-rheology: viscosity models for rheoflow.
//!
//! Provides:
//! - The `ViscosityModel` trait, the single evaluation contract the flow
//!   solvers consume (`viscosity(rate) -> Pa·s`)
//! - Closed-form generalized Newtonian models (Newtonian, power-law, Carreau,
//!   Herschel-Bulkley, three-component yield model, bi-power-law)
//! - `Viscosity`, a tagged enum over all closed-form models
//! - Flow curve sampling for external plotting layers
//!
//! Any `Fn(f64) -> f64` closure is also a viscosity model, which keeps ad hoc
//! fits and test fixtures cheap to write.
//!
//! # Example
//!
//! ```
//! use rf_rheology::{PowerLaw, ViscosityModel};
//!
//! let model = PowerLaw::new(0.5, 0.6).unwrap();
//! let eta = model.viscosity(100.0);
//! let tau = model.stress(100.0);
//! assert!((tau - 100.0 * eta).abs() < 1e-12);
//! ```

pub mod bi_power_law;
pub mod carreau;
pub mod curve;
pub mod error;
pub mod herschel_bulkley;
pub mod model;
pub mod newtonian;
pub mod power_law;
pub mod three_component;
pub mod viscosity;

// Re-exports for ergonomics
pub use bi_power_law::BiPowerLaw;
pub use carreau::Carreau;
pub use curve::{FlowCurvePoint, flow_curve};
pub use error::{RheologyError, RheologyResult};
pub use herschel_bulkley::{HerschelBulkley, Regularization};
pub use model::{RATE_EPSILON, ViscosityModel};
pub use newtonian::Newtonian;
pub use power_law::PowerLaw;
pub use three_component::ThreeComponent;
pub use viscosity::Viscosity;

//! rf-flow: steady, fully developed flow of generalized Newtonian fluids.
//!
//! Provides:
//! - `LaminarFlow`: laminar pipe and slit flow by nested quadrature of the
//!   inverted shear-rate profile, solved in either direction
//!   (pressure drop to flow rate, or flow rate / velocity to pressure drop)
//! - `PipeFlow`: laminar and turbulent pipe flow, coupling the Dodge-Metzner
//!   friction correlation to the viscosity model through a Newton solve
//! - Profile samplers and parallel pressure-drop sweeps for plotting layers
//! - `Settings`, every solver knob in one YAML document
//!
//! Solvers hold one driver at a time and commit an immutable snapshot per
//! successful solve; dependent quantities are errors until a driver is set.
//!
//! # Example
//!
//! ```
//! use rf_core::units::{kg_per_m3, m, mps, pa_s};
//! use rf_flow::{ConjugateFlow, FlowRegime, PipeFlow};
//! use rf_rheology::Newtonian;
//!
//! let mu = Newtonian::new(pa_s(0.01)).unwrap();
//! let mut pipe = PipeFlow::new(m(0.02), m(1.0), kg_per_m3(1000.0), mu).unwrap();
//! pipe.set_velocity(mps(0.5)).unwrap();
//!
//! assert_eq!(pipe.regime().unwrap(), FlowRegime::Laminar);
//! assert!((pipe.pressure_drop().unwrap() - 400.0).abs() < 1e-6);
//! assert!(pipe.solution().is_ok());
//! ```

pub mod common;
pub mod error;
pub mod friction;
pub mod geometry;
pub mod laminar;
pub mod pipe_flow;
pub mod profile;
pub mod settings;
pub mod shear;
pub mod state;
pub mod sweep;
pub mod traits;

// Re-exports
pub use error::{FlowError, FlowResult};
pub use friction::{
    DodgeMetzner, FlowRegime, FrictionConfig, FrictionCorrelation, generalized_index,
    laminar_fanning,
};
pub use geometry::Geometry;
pub use laminar::{LaminarConfig, LaminarFlow, LaminarSolution};
pub use pipe_flow::{
    PipeFlow, PipeFlowConfig, PipeProperties, PipeSolution, PipeSolveMethod, PressureSeed,
    VelocitySeed, pressure_seed, velocity_seed,
};
pub use profile::{
    DEFAULT_PROFILE_POINTS, IntegratorConfig, ProfilePoint, axial_velocity, flow_rate,
    local_shear_rate, shear_rate_profile, velocity_profile,
};
pub use settings::{Settings, SettingsError, SettingsResult};
pub use shear::invert_shear_rate;
pub use state::{Driver, FlowState};
pub use sweep::{Sweep, SweepConfig, pressure_drop_sweep, sweep};
pub use traits::{ConjugateFlow, FlowSolution};

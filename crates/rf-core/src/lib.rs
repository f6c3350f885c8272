//! rf-core: stable foundation for rheoflow.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + float helpers + sample spacing)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{RfError, RfResult};
pub use numeric::*;
pub use units::*;

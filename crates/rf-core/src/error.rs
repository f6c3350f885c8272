//! Foundation error every rheoflow crate converts into.

use thiserror::Error;

pub type RfResult<T> = Result<T, RfError>;

#[derive(Error, Debug)]
pub enum RfError {
    #[error("Non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// A physical or state precondition does not hold (e.g. reading a
    /// quantity before any solve).
    #[error("Precondition violated: {what}")]
    Invariant { what: &'static str },

    /// Root finding, quadrature or Newton failure, with its formatted context.
    #[error("Numeric failure: {what}")]
    Numeric { what: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let err = RfError::Numeric {
            what: "no pressure drop in [1, 2]".into(),
        };
        assert_eq!(err.to_string(), "Numeric failure: no pressure drop in [1, 2]");
        let err = RfError::Invariant { what: "flow rate" };
        assert!(err.to_string().contains("flow rate"));
    }
}

use crate::kernel::{ConfigError, ExecInvariantViolation};
use core::{error, fmt};

/// Errors raised whilst running wavespec.
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// A parameter lies outside the domain of the requested waveform.
    #[cfg(feature = "alloc")]
    InvalidArg {
        /// The invalid arg
        arg: alloc::string::String,
        /// Explaining why arg is invalid.
        reason: alloc::string::String,
    },
    /// A parameter lies outside the domain of the requested waveform.
    #[cfg(not(feature = "alloc"))]
    InvalidArg {
        /// The invalid arg
        arg: &'static str,
    },
    /// Execution was attempted with a violated kernel invariant.
    #[cfg(feature = "alloc")]
    ExecInvariantViolation {
        /// Why execution could not proceed.
        reason: alloc::string::String,
    },
    /// Execution was attempted with a violated kernel invariant.
    #[cfg(not(feature = "alloc"))]
    ExecInvariantViolation,
}

impl Error {
    /// Whether this error reports a rejected parameter value.
    pub fn is_invalid_arg(&self) -> bool {
        matches!(self, Error::InvalidArg { .. })
    }
}

impl From<ConfigError> for Error {
    #[cfg(feature = "alloc")]
    fn from(value: ConfigError) -> Self {
        use alloc::string::ToString;

        Error::InvalidArg {
            arg: value.arg().to_string(),
            reason: value.reason().to_string(),
        }
    }

    #[cfg(not(feature = "alloc"))]
    fn from(value: ConfigError) -> Self {
        Error::InvalidArg { arg: value.arg() }
    }
}

impl From<ExecInvariantViolation> for Error {
    #[cfg(feature = "alloc")]
    fn from(value: ExecInvariantViolation) -> Self {
        use alloc::string::ToString;

        match value {
            ExecInvariantViolation::Config(err @ ConfigError::InvalidArgument { .. })
            | ExecInvariantViolation::Config(err @ ConfigError::NonFinite { .. }) => err.into(),
            other => Error::ExecInvariantViolation {
                reason: other.to_string(),
            },
        }
    }

    #[cfg(not(feature = "alloc"))]
    fn from(value: ExecInvariantViolation) -> Self {
        match value {
            ExecInvariantViolation::Config(err @ ConfigError::InvalidArgument { .. })
            | ExecInvariantViolation::Config(err @ ConfigError::NonFinite { .. }) => err.into(),
            _ => Error::ExecInvariantViolation,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "alloc")]
            Error::InvalidArg { arg, reason } => {
                write!(f, "Invalid argument `{arg}`: {reason}")
            }
            #[cfg(not(feature = "alloc"))]
            Error::InvalidArg { arg } => write!(f, "Invalid argument `{arg}`."),
            #[cfg(feature = "alloc")]
            Error::ExecInvariantViolation { reason } => {
                write!(f, "Execution invariant violation: {reason}")
            }
            #[cfg(not(feature = "alloc"))]
            Error::ExecInvariantViolation => write!(f, "Execution invariant violation."),
        }
    }
}

impl error::Error for Error {}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn config_errors_become_invalid_arg() {
        let err: Error = ConfigError::InvalidArgument {
            arg: "width",
            reason: "width must lie strictly between 0 and 1",
        }
        .into();
        assert!(err.is_invalid_arg());
        assert_eq!(
            err.to_string(),
            "Invalid argument `width`: width must lie strictly between 0 and 1"
        );

        let err: Error = ConfigError::NonFinite { arg: "phase" }.into();
        assert_eq!(
            err,
            Error::InvalidArg {
                arg: "phase".to_string(),
                reason: "value must be finite".to_string(),
            }
        );
    }

    #[test]
    fn length_mismatch_is_an_execution_violation() {
        let err: Error = ExecInvariantViolation::LengthMismatch {
            arg: "out",
            expected: 8,
            got: 7,
        }
        .into();
        assert!(!err.is_invalid_arg());
        assert_eq!(
            err.to_string(),
            "Execution invariant violation: Execution length mismatch on `out`. Expected 8, got 7."
        );
    }
}

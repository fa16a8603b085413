use core::fmt;

/// Validation errors raised at kernel construction or adapter binding time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A configuration argument value lies outside its domain.
    InvalidArgument {
        /// Name of the argument.
        arg: &'static str,
        /// Human readable reason.
        reason: &'static str,
    },
    /// A configuration argument was NaN or infinite.
    NonFinite {
        /// Name of the argument.
        arg: &'static str,
    },
    /// A contiguous 1D slice view could not be obtained.
    NonContiguous {
        /// Name of the argument that is non-contiguous.
        arg: &'static str,
    },
}

impl ConfigError {
    /// Name of the argument the error refers to.
    pub fn arg(&self) -> &'static str {
        match self {
            ConfigError::InvalidArgument { arg, .. }
            | ConfigError::NonFinite { arg }
            | ConfigError::NonContiguous { arg } => arg,
        }
    }

    /// Why the argument was rejected.
    pub fn reason(&self) -> &'static str {
        match self {
            ConfigError::InvalidArgument { reason, .. } => reason,
            ConfigError::NonFinite { .. } => "value must be finite",
            ConfigError::NonContiguous { .. } => "argument is not contiguous in memory",
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidArgument { arg, reason } => {
                write!(f, "Invalid argument `{arg}`: {reason}")
            }
            ConfigError::NonFinite { arg } => {
                write!(f, "Invalid argument `{arg}`: value must be finite")
            }
            ConfigError::NonContiguous { arg } => {
                write!(f, "Argument `{arg}` is not contiguous in memory.")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Runtime execution invariant violations for checked kernel entrypoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecInvariantViolation {
    /// Output length mismatched the expected runtime shape.
    LengthMismatch {
        /// Name of the argument.
        arg: &'static str,
        /// Required length.
        expected: usize,
        /// Received length.
        got: usize,
    },
    /// Adapter binding/configuration failure.
    Config(ConfigError),
}

impl From<ConfigError> for ExecInvariantViolation {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl fmt::Display for ExecInvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecInvariantViolation::LengthMismatch { arg, expected, got } => {
                write!(
                    f,
                    "Execution length mismatch on `{arg}`. Expected {expected}, got {got}."
                )
            }
            ExecInvariantViolation::Config(err) => write!(f, "{err}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ExecInvariantViolation {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExecInvariantViolation::Config(err) => Some(err),
            ExecInvariantViolation::LengthMismatch { .. } => None,
        }
    }
}

/// Reject NaN and infinite configuration values.
pub(crate) fn ensure_finite<F>(arg: &'static str, value: F) -> Result<F, ConfigError>
where
    F: nalgebra::RealField + Copy,
{
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite { arg })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_values_pass_through() {
        assert_eq!(ensure_finite("amplitude", 2.5f64), Ok(2.5));
        assert_eq!(
            ensure_finite("amplitude", f64::NAN),
            Err(ConfigError::NonFinite { arg: "amplitude" })
        );
        assert_eq!(
            ensure_finite("phase", f32::NEG_INFINITY),
            Err(ConfigError::NonFinite { arg: "phase" })
        );
    }

    #[cfg(feature = "std")]
    #[test]
    fn exec_violation_displays_wrapped_config_error() {
        let err = ExecInvariantViolation::from(ConfigError::InvalidArgument {
            arg: "width",
            reason: "width must lie strictly between 0 and 1",
        });
        assert_eq!(
            err.to_string(),
            "Invalid argument `width`: width must lie strictly between 0 and 1"
        );
        assert_eq!(
            ConfigError::NonFinite { arg: "duration" }.to_string(),
            "Invalid argument `duration`: value must be finite"
        );
    }
}

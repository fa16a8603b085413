use super::ConfigError;

/// Constructor validation lifecycle shared by kernel structs.
///
/// A kernel that exists has a configuration that passed validation, so its
/// run methods never re-check parameter domains.
pub trait KernelLifecycle: Sized {
    /// Kernel config type.
    type Config;

    /// Construct a validated kernel from config.
    fn try_new(config: Self::Config) -> Result<Self, ConfigError>;
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, KernelLifecycle};

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct GainConfig {
        gain: f64,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct GainKernel {
        gain: f64,
    }

    impl KernelLifecycle for GainKernel {
        type Config = GainConfig;

        fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
            if !config.gain.is_finite() {
                return Err(ConfigError::NonFinite { arg: "gain" });
            }
            if config.gain <= 0.0 {
                return Err(ConfigError::InvalidArgument {
                    arg: "gain",
                    reason: "gain must be > 0",
                });
            }
            Ok(Self { gain: config.gain })
        }
    }

    #[test]
    fn lifecycle_constructor_accepts_valid_config() {
        let kernel = GainKernel::try_new(GainConfig { gain: 0.5 }).expect("valid config");
        assert_eq!(kernel.gain, 0.5);
    }

    #[test]
    fn lifecycle_constructor_rejects_invalid_config() {
        let err = GainKernel::try_new(GainConfig { gain: 0.0 }).expect_err("invalid config");
        assert_eq!(
            err,
            ConfigError::InvalidArgument {
                arg: "gain",
                reason: "gain must be > 0",
            }
        );
        let err = GainKernel::try_new(GainConfig { gain: f64::NAN }).expect_err("nan gain");
        assert_eq!(err.arg(), "gain");
    }
}

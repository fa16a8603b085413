//! Shared trait-first kernel substrate.
//!
//! Constructor validation, 1D buffer adapters and the error types shared by
//! the waveform and spectrum kernels.

mod errors;
mod io;
mod lifecycle;

pub(crate) use errors::ensure_finite;
pub use errors::{ConfigError, ExecInvariantViolation};
pub use io::*;
pub use lifecycle::*;

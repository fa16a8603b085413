use super::{ConfigError, ExecInvariantViolation};

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

#[cfg(feature = "alloc")]
use ndarray::{Array1, ArrayView1, ArrayViewMut1};

/// Adapter trait for reading contiguous 1D input.
pub trait Read1D<T> {
    /// Borrow the underlying input as a contiguous slice.
    fn read_slice(&self) -> Result<&[T], ConfigError>;
}

/// Adapter trait for writing contiguous 1D output.
pub trait Write1D<T> {
    /// Borrow the underlying output as a mutable contiguous slice.
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError>;
}

impl<T> Read1D<T> for [T] {
    fn read_slice(&self) -> Result<&[T], ConfigError> {
        Ok(self)
    }
}

impl<T> Write1D<T> for [T] {
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError> {
        Ok(self)
    }
}

impl<T, const N: usize> Read1D<T> for [T; N] {
    fn read_slice(&self) -> Result<&[T], ConfigError> {
        Ok(self)
    }
}

impl<T, const N: usize> Write1D<T> for [T; N] {
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError> {
        Ok(self)
    }
}

#[cfg(feature = "alloc")]
impl<T> Read1D<T> for Vec<T> {
    fn read_slice(&self) -> Result<&[T], ConfigError> {
        Ok(self.as_slice())
    }
}

#[cfg(feature = "alloc")]
impl<T> Write1D<T> for Vec<T> {
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError> {
        Ok(self.as_mut_slice())
    }
}

#[cfg(feature = "alloc")]
impl<T> Read1D<T> for Array1<T> {
    fn read_slice(&self) -> Result<&[T], ConfigError> {
        self.as_slice()
            .ok_or(ConfigError::NonContiguous { arg: "array" })
    }
}

#[cfg(feature = "alloc")]
impl<T> Write1D<T> for Array1<T> {
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError> {
        self.as_slice_mut()
            .ok_or(ConfigError::NonContiguous { arg: "array" })
    }
}

#[cfg(feature = "alloc")]
impl<'a, T> Read1D<T> for ArrayView1<'a, T> {
    fn read_slice(&self) -> Result<&[T], ConfigError> {
        self.as_slice()
            .ok_or(ConfigError::NonContiguous { arg: "array_view" })
    }
}

#[cfg(feature = "alloc")]
impl<'a, T> Write1D<T> for ArrayViewMut1<'a, T> {
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError> {
        self.as_slice_mut().ok_or(ConfigError::NonContiguous {
            arg: "array_view_mut",
        })
    }
}

/// Borrow an output buffer and require it to hold exactly `expected` elements.
pub fn bind_output<'a, T, O>(
    arg: &'static str,
    out: &'a mut O,
    expected: usize,
) -> Result<&'a mut [T], ExecInvariantViolation>
where
    O: Write1D<T> + ?Sized,
{
    let out = out
        .write_slice_mut()
        .map_err(ExecInvariantViolation::from)?;
    if out.len() != expected {
        return Err(ExecInvariantViolation::LengthMismatch {
            arg,
            expected,
            got: out.len(),
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{bind_output, ExecInvariantViolation, Read1D, Write1D};

    #[test]
    fn slice_and_array_adapters() {
        let times = [0.0f32, 0.25, 0.5];
        assert_eq!(times.read_slice().expect("array adapter").len(), 3);

        let s: &[f32] = &times;
        assert_eq!(s.read_slice().expect("slice adapter")[1], 0.25);
    }

    #[test]
    fn bind_output_checks_length() {
        let mut samples = [0.0f64; 4];
        let bound = bind_output("samples", &mut samples, 4).expect("matching length");
        bound.copy_from_slice(&[1.0, -1.0, 1.0, -1.0]);
        assert_eq!(samples, [1.0, -1.0, 1.0, -1.0]);

        let mut short = [0.0f64; 3];
        let err = bind_output("samples", &mut short, 4).expect_err("short buffer");
        assert_eq!(
            err,
            ExecInvariantViolation::LengthMismatch {
                arg: "samples",
                expected: 4,
                got: 3,
            }
        );
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn ndarray_adapters() {
        use ndarray::{s, Array1};

        let arr = Array1::from(vec![0.0f64, 0.01, 0.02]);
        assert_eq!(arr.read_slice().expect("array1 read")[2], 0.02);

        let mut out = Array1::from(vec![0.0f64, 0.0, 0.0]);
        out.write_slice_mut()
            .expect("array1 write")
            .copy_from_slice(&[1.0, 0.0, -1.0]);
        assert_eq!(out.as_slice().expect("slice"), &[1.0, 0.0, -1.0]);

        let strided = Array1::from(vec![0.0f64, 1.0, 2.0, 3.0]);
        let view = strided.slice(s![..;2]);
        assert!(view.read_slice().is_err());
    }
}

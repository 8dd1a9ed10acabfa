use super::ConfigError;
use crate::segment::AudioSegment;
use ndarray::{Array1, ArrayView1, ArrayViewMut1};

/// Borrow a 1D input as one contiguous run of samples.
pub trait Read1D<T> {
    /// The samples, or [`ConfigError::NonContiguous`] for strided storage.
    fn read_slice(&self) -> Result<&[T], ConfigError>;
}

/// Borrow a 1D output buffer as one contiguous run of samples.
pub trait Write1D<T> {
    /// The writable samples, or [`ConfigError::NonContiguous`].
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError>;
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

impl<T> Read1D<T> for Vec<T> {
    fn read_slice(&self) -> Result<&[T], ConfigError> {
        Ok(self)
    }
}

impl<T> Write1D<T> for Vec<T> {
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError> {
        Ok(self)
    }
}

impl Read1D<f64> for AudioSegment {
    fn read_slice(&self) -> Result<&[f64], ConfigError> {
        Ok(self.samples())
    }
}

fn strided(arg: &'static str) -> ConfigError {
    ConfigError::NonContiguous { arg }
}

impl<T> Read1D<T> for Array1<T> {
    fn read_slice(&self) -> Result<&[T], ConfigError> {
        self.as_slice().ok_or_else(|| strided("array"))
    }
}

impl<T> Write1D<T> for Array1<T> {
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError> {
        self.as_slice_mut().ok_or_else(|| strided("array"))
    }
}

impl<T> Read1D<T> for ArrayView1<'_, T> {
    fn read_slice(&self) -> Result<&[T], ConfigError> {
        self.to_slice().ok_or_else(|| strided("array_view"))
    }
}

impl<T> Write1D<T> for ArrayViewMut1<'_, T> {
    fn write_slice_mut(&mut self) -> Result<&mut [T], ConfigError> {
        self.as_slice_mut().ok_or_else(|| strided("array_view_mut"))
    }
}

#[cfg(test)]
mod tests {
    use super::{Read1D, Write1D};
    use crate::kernel::ConfigError;
    use crate::segment::AudioSegment;
    use ndarray::{s, Array1};

    #[test]
    fn plain_buffers() {
        let fixed = [0.25f64, -0.5, 1.0];
        assert_eq!(fixed.read_slice().unwrap(), &[0.25, -0.5, 1.0]);
        let borrowed: &[f64] = &fixed[1..];
        assert_eq!(borrowed.read_slice().unwrap()[0], -0.5);

        let mut out = vec![0.0f64; 3];
        out.write_slice_mut().unwrap().copy_from_slice(&fixed);
        assert_eq!(out, fixed.to_vec());
    }

    #[test]
    fn segments_read_as_samples() {
        let segment = AudioSegment::new(vec![0.1, 0.2], 8000.0).unwrap();
        assert_eq!(segment.read_slice().unwrap(), &[0.1, 0.2]);
    }

    #[test]
    fn ndarray_buffers() {
        let mut out = Array1::<f64>::zeros(2);
        out.write_slice_mut().unwrap().copy_from_slice(&[4.0, 5.0]);
        assert_eq!(out.read_slice().unwrap(), &[4.0, 5.0]);
        assert_eq!(out.view().read_slice().unwrap(), &[4.0, 5.0]);
    }

    #[test]
    fn strided_views_are_rejected() {
        let signal = Array1::linspace(0.0, 1.0, 8);
        assert_eq!(
            signal.slice(s![..;2]).read_slice(),
            Err(ConfigError::NonContiguous { arg: "array_view" })
        );
    }
}

use crate::kernel::{ConfigError, ExecInvariantViolation, KernelLifecycle, Read1D, Write1D};
use crate::signal::traits::Resample1D;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use tonescope_core::Error;

/// Constructor config for [`ResampleKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResampleConfig {
    /// Target number of output samples.
    pub target_len: usize,
}

/// Trait-first 1D Fourier resampling kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResampleKernel {
    target_len: usize,
}

impl ResampleKernel {
    /// Return configured target output length.
    pub fn target_len(&self) -> usize {
        self.target_len
    }
}

impl KernelLifecycle for ResampleKernel {
    type Config = ResampleConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if config.target_len == 0 {
            return Err(ConfigError::InvalidArgument {
                arg: "target_len",
                reason: "target length must be > 0",
            });
        }
        Ok(Self {
            target_len: config.target_len,
        })
    }
}

impl Resample1D<f64> for ResampleKernel {
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<f64> + ?Sized,
        O: Write1D<f64> + ?Sized,
    {
        let input = input.read_slice()?;
        if input.is_empty() {
            return Err(ConfigError::EmptyInput { arg: "x" }.into());
        }
        let out_slice = out.write_slice_mut()?;
        if out_slice.len() != self.target_len {
            return Err(ExecInvariantViolation::LengthMismatch {
                arg: "out",
                expected: self.target_len,
                got: out_slice.len(),
            });
        }
        out_slice.copy_from_slice(&resample_impl(input, self.target_len));
        Ok(())
    }

    fn run_alloc<I>(&self, input: &I) -> Result<Vec<f64>, ExecInvariantViolation>
    where
        I: Read1D<f64> + ?Sized,
    {
        let input = input.read_slice()?;
        if input.is_empty() {
            return Err(ConfigError::EmptyInput { arg: "x" }.into());
        }
        Ok(resample_impl(input, self.target_len))
    }
}

fn resample_impl(x: &[f64], num: usize) -> Vec<f64> {
    let nx = x.len();
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(nx);
    let ifft = planner.plan_fft_inverse(num);

    let mut spectrum: Vec<Complex<f64>> = x.iter().map(|v| Complex::new(*v, 0.0)).collect();
    fft.process(&mut spectrum);

    // Keep the lowest `n` bins: DC and positive frequencies at the front,
    // negative frequencies at the back.
    let n = nx.min(num);
    let nyq = n / 2 + 1;
    let mut y = vec![Complex::new(0.0, 0.0); num];
    y[..nyq].copy_from_slice(&spectrum[..nyq]);
    for i in 1..=n.saturating_sub(nyq) {
        y[num - i] = spectrum[nx - i];
    }

    // An even-length band has a shared Nyquist bin; fold or split it so
    // the result stays real.
    if n % 2 == 0 {
        let half = n / 2;
        if num < nx {
            y[half] += spectrum[nx - half];
        } else if nx < num {
            y[half] *= 0.5;
            y[num - half] = y[half];
        }
    }

    ifft.process(&mut y);
    let scale = 1.0 / nx as f64;
    y.iter().map(|v| v.re * scale).collect()
}

/// Resample `x` to `target_len` samples with the Fourier method.
///
/// The signal is treated as periodic: its spectrum is truncated (down) or
/// zero-padded (up) and transformed back, matching
/// `scipy.signal.resample` without a window.
///
/// # Errors
/// An empty input or a zero target length is an invalid configuration.
pub fn resample(x: &[f64], target_len: usize) -> Result<Vec<f64>, Error> {
    let kernel = ResampleKernel::try_new(ResampleConfig { target_len })?;
    Ok(kernel.run_alloc(x)?)
}

/// Output length when converting `len` samples from `from_rate` to `to_rate`.
pub fn resampled_len(len: usize, from_rate: f64, to_rate: f64) -> usize {
    (len as f64 * to_rate / from_rate).round() as usize
}

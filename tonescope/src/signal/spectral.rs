//! Welch power spectral density estimation and interference peak detection.

use crate::kernel::{ConfigError, ExecInvariantViolation, KernelLifecycle, Read1D, Write1D};
use crate::signal::traits::WelchPsd1D;
use crate::signal::traits::WindowGenerate;
use crate::signal::windows::{WindowConfig, WindowKernel, WindowType};
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use serde::Serialize;
use tonescope_core::{Error, Warning};

/// Offset added before converting peak power to dB.
pub const PEAK_DB_FLOOR: f64 = 1e-12;

fn rfft_real(fft: &dyn Fft<f64>, x: &[f64], buf: &mut [Complex<f64>]) {
    buf.fill(Complex::new(0.0, 0.0));
    for (dst, src) in buf.iter_mut().zip(x.iter().copied()) {
        *dst = Complex::new(src, 0.0);
    }
    fft.process(buf);
}

fn onesided_freqs(nfft: usize, fs: f64) -> Vec<f64> {
    let n_freq = nfft / 2 + 1;
    (0..n_freq).map(|k| k as f64 * fs / nfft as f64).collect()
}

fn onesided_psd(spec: &[Complex<f64>], fs: f64, norm: f64) -> Vec<f64> {
    let nfft = spec.len();
    let n_freq = nfft / 2 + 1;
    let mut pxx = vec![0.0; n_freq];
    for k in 0..n_freq {
        let mut v = spec[k].norm_sqr() / (fs * norm);
        if k != 0 && !(nfft % 2 == 0 && k == nfft / 2) {
            v *= 2.0;
        }
        pxx[k] = v;
    }
    pxx
}

/// Start offsets of every full segment; trailing partial segments are
/// dropped.
fn segment_starts(len: usize, nperseg: usize, noverlap: usize) -> Vec<usize> {
    let hop = nperseg - noverlap;
    let mut starts = Vec::new();
    let mut start = 0usize;
    while start + nperseg <= len {
        starts.push(start);
        start += hop;
    }
    starts
}

fn welch_impl(
    x: &[f64],
    kernel: &WelchKernel,
) -> Result<(Vec<f64>, Vec<f64>), ExecInvariantViolation> {
    let WelchKernel {
        sample_rate,
        window_size,
        fft_size,
        overlap,
        ..
    } = *kernel;
    let starts = segment_starts(x.len(), window_size, overlap);
    let window = kernel.taper.run_alloc()?;
    let win_norm = window.iter().map(|v| v * v).sum::<f64>();
    let mut accum = vec![0.0; fft_size / 2 + 1];

    let fft = FftPlanner::<f64>::new().plan_fft_forward(fft_size);
    let mut spec = vec![Complex::new(0.0, 0.0); fft_size];
    let mut segment = vec![0.0; window_size];
    for &start in &starts {
        let raw = &x[start..start + window_size];
        let mean = raw.iter().sum::<f64>() / window_size as f64;
        for ((dst, src), w) in segment.iter_mut().zip(raw).zip(&window) {
            *dst = (src - mean) * w;
        }
        rfft_real(fft.as_ref(), &segment, &mut spec);
        let psd = onesided_psd(&spec, sample_rate, win_norm);
        for (a, p) in accum.iter_mut().zip(psd.iter()) {
            *a += *p;
        }
    }

    let inv = 1.0 / starts.len() as f64;
    for v in &mut accum {
        *v *= inv;
    }
    tracing::debug!(
        segments = starts.len(),
        window_size,
        fft_size,
        overlap,
        "welch estimate"
    );
    Ok((onesided_freqs(fft_size, sample_rate), accum))
}

/// Constructor config for [`WelchKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WelchConfig {
    /// Sampling frequency in Hz.
    pub sample_rate: f64,
    /// Segment length.
    pub window_size: usize,
    /// Transform length; segments are zero-padded up to it.
    pub fft_size: usize,
    /// Samples shared by consecutive segments.
    pub overlap: usize,
    /// Taper applied to every segment (symmetric form).
    pub window: WindowType,
}

/// Trait-first Welch PSD kernel.
///
/// Each full segment is mean-detrended, tapered, zero-padded to `fft_size`
/// and transformed. Periodograms use density scaling `|X|^2 / (fs sum w^2)`
/// and are doubled off DC and Nyquist before averaging.
#[derive(Debug, Clone, PartialEq)]
pub struct WelchKernel {
    sample_rate: f64,
    window_size: usize,
    fft_size: usize,
    overlap: usize,
    window: WindowType,
    taper: WindowKernel,
}

impl WelchKernel {
    /// Number of one-sided bins, `fft_size / 2 + 1`.
    pub fn expected_len(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Window the kernel tapers segments with.
    pub fn window(&self) -> WindowType {
        self.window
    }

    fn check_input(&self, input: &[f64]) -> Result<(), ExecInvariantViolation> {
        if input.len() < self.window_size {
            return Err(ExecInvariantViolation::InsufficientData {
                arg: "window_size",
                required: self.window_size,
                got: input.len(),
            });
        }
        Ok(())
    }
}

impl KernelLifecycle for WelchKernel {
    type Config = WelchConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if !config.sample_rate.is_finite() || config.sample_rate <= 0.0 {
            return Err(ConfigError::InvalidArgument {
                arg: "sample_rate",
                reason: "sample_rate must be finite and > 0",
            });
        }
        if config.window_size < 2 {
            return Err(ConfigError::InvalidArgument {
                arg: "window_size",
                reason: "window_size must be at least 2",
            });
        }
        if config.fft_size < config.window_size {
            return Err(ConfigError::InvalidArgument {
                arg: "fft_size",
                reason: "fft_size must be >= window_size",
            });
        }
        if config.overlap >= config.window_size {
            return Err(ConfigError::InvalidArgument {
                arg: "overlap_percent",
                reason: "overlap must be smaller than window_size",
            });
        }
        Ok(Self {
            sample_rate: config.sample_rate,
            window_size: config.window_size,
            fft_size: config.fft_size,
            overlap: config.overlap,
            window: config.window,
            taper: WindowKernel::try_new(WindowConfig {
                window: config.window,
                nx: config.window_size,
                sym: true,
            })?,
        })
    }
}

impl WelchPsd1D for WelchKernel {
    fn run_into<I, OF, OP>(
        &self,
        input: &I,
        freqs: &mut OF,
        pxx: &mut OP,
    ) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<f64> + ?Sized,
        OF: Write1D<f64> + ?Sized,
        OP: Write1D<f64> + ?Sized,
    {
        let input = input.read_slice()?;
        self.check_input(input)?;

        let expected = self.expected_len();
        let f_out = freqs.write_slice_mut()?;
        if f_out.len() != expected {
            return Err(ExecInvariantViolation::LengthMismatch {
                arg: "freqs",
                expected,
                got: f_out.len(),
            });
        }
        let p_out = pxx.write_slice_mut()?;
        if p_out.len() != expected {
            return Err(ExecInvariantViolation::LengthMismatch {
                arg: "pxx",
                expected,
                got: p_out.len(),
            });
        }

        let (f, p) = welch_impl(input, self)?;
        f_out.copy_from_slice(&f);
        p_out.copy_from_slice(&p);
        Ok(())
    }

    fn run_alloc<I>(&self, input: &I) -> Result<(Vec<f64>, Vec<f64>), ExecInvariantViolation>
    where
        I: Read1D<f64> + ?Sized,
    {
        let input = input.read_slice()?;
        self.check_input(input)?;
        welch_impl(input, self)
    }
}

/// One-sided PSD with its dominant peak.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpectralEstimate {
    /// Bin frequencies in Hz, strictly increasing over `[0, Nyquist]`.
    pub frequencies: Vec<f64>,
    /// Power spectral density per bin.
    pub psd: Vec<f64>,
    /// First bin holding the maximum density.
    pub peak_index: usize,
    /// Frequency of `peak_index`.
    pub peak_frequency: f64,
    /// Linear density at the peak.
    pub peak_power: f64,
    /// `10 log10(peak_power + 1e-12)`.
    pub peak_power_db: f64,
    /// Window actually used.
    pub window: WindowType,
    /// Recoverable degradations, e.g. an unknown window name.
    pub warnings: Vec<Warning>,
}

impl SpectralEstimate {
    /// Width of one frequency bin in Hz.
    pub fn bin_width(&self) -> f64 {
        self.frequencies.get(1).copied().unwrap_or(0.0)
    }
}

/// Overlap in samples for a percentage of `window_size`, rounded to nearest.
pub fn overlap_samples(window_size: usize, overlap_percent: f64) -> Result<usize, Error> {
    if !overlap_percent.is_finite() || !(0.0..100.0).contains(&overlap_percent) {
        return Err(Error::invalid_config(
            "overlap_percent",
            format!("must lie in [0, 100), got {overlap_percent}"),
        ));
    }
    Ok((window_size as f64 * overlap_percent / 100.0).round() as usize)
}

/// Estimate the PSD of `signal` with Welch's method and locate its peak.
///
/// An unknown `window_type` falls back to Hann and records a
/// [`Warning::UnknownWindow`] instead of failing.
///
/// # Errors
/// `InvalidConfig` for a bad rate, `window_size < 2`, `fft_size <
/// window_size` or an overlap outside `[0, 100)` percent;
/// `InsufficientData` when `window_size` exceeds the signal length.
pub fn estimate(
    signal: &[f64],
    sample_rate: f64,
    fft_size: usize,
    window_size: usize,
    window_type: &str,
    overlap_percent: f64,
) -> Result<SpectralEstimate, Error> {
    let overlap = overlap_samples(window_size, overlap_percent)?;
    let (window, warning) = WindowType::resolve(window_type);
    let kernel = WelchKernel::try_new(WelchConfig {
        sample_rate,
        window_size,
        fft_size,
        overlap,
        window,
    })?;
    let (frequencies, psd) = kernel.run_alloc(signal)?;

    let (peak_index, peak_power) = psd
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(bi, bp), (i, p)| {
            if p > bp {
                (i, p)
            } else {
                (bi, bp)
            }
        });
    let peak_frequency = frequencies[peak_index];

    Ok(SpectralEstimate {
        frequencies,
        psd,
        peak_index,
        peak_frequency,
        peak_power,
        peak_power_db: 10.0 * (peak_power + PEAK_DB_FLOOR).log10(),
        window,
        warnings: warning.into_iter().collect(),
    })
}

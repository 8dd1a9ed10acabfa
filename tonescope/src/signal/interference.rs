//! Synthetic tonal interference.

use crate::kernel::{ConfigError, ExecInvariantViolation, KernelLifecycle, Read1D, Write1D};
use crate::segment::{AudioSegment, InterferenceSpec};
use crate::signal::traits::ToneInject1D;
use core::f64::consts::PI;

/// Constructor config for [`InjectKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InjectConfig {
    /// Tone to superimpose.
    pub spec: InterferenceSpec,
    /// Sample rate of the signals the kernel runs on.
    pub sample_rate: f64,
}

/// Trait-first tone-injection kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InjectKernel {
    spec: InterferenceSpec,
    sample_rate: f64,
}

impl KernelLifecycle for InjectKernel {
    type Config = InjectConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if !config.sample_rate.is_finite() || config.sample_rate <= 0.0 {
            return Err(ConfigError::InvalidArgument {
                arg: "sample_rate",
                reason: "sample_rate must be finite and > 0",
            });
        }
        Ok(Self {
            spec: config.spec,
            sample_rate: config.sample_rate,
        })
    }
}

impl InjectKernel {
    /// The tone alone, `len` samples long.
    pub fn tone(&self, len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| tone_sample(&self.spec, self.sample_rate, i))
            .collect()
    }
}

impl ToneInject1D<f64> for InjectKernel {
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<f64> + ?Sized,
        O: Write1D<f64> + ?Sized,
    {
        let input = input.read_slice()?;
        let out_slice = out.write_slice_mut()?;
        if out_slice.len() != input.len() {
            return Err(ExecInvariantViolation::LengthMismatch {
                arg: "out",
                expected: input.len(),
                got: out_slice.len(),
            });
        }
        for (i, (y, x)) in out_slice.iter_mut().zip(input).enumerate() {
            *y = x + tone_sample(&self.spec, self.sample_rate, i);
        }
        Ok(())
    }

    fn run_alloc<I>(&self, input: &I) -> Result<Vec<f64>, ExecInvariantViolation>
    where
        I: Read1D<f64> + ?Sized,
    {
        let input = input.read_slice()?;
        Ok(input
            .iter()
            .enumerate()
            .map(|(i, x)| x + tone_sample(&self.spec, self.sample_rate, i))
            .collect())
    }
}

#[inline]
fn tone_sample(spec: &InterferenceSpec, sample_rate: f64, i: usize) -> f64 {
    let t = i as f64 / sample_rate;
    spec.amplitude * (2.0 * PI * spec.frequency_hz * t).sin()
}

/// `noisy[i] = segment[i] + amplitude * sin(2 pi f i / sample_rate)`.
///
/// Pure and infallible: the segment already carries a valid rate, and the
/// tone parameters are unconstrained.
pub fn inject(segment: &AudioSegment, spec: &InterferenceSpec) -> AudioSegment {
    let rate = segment.sample_rate();
    let noisy = segment
        .samples()
        .iter()
        .enumerate()
        .map(|(i, x)| x + tone_sample(spec, rate, i))
        .collect();
    segment.with_samples(noisy)
}

/// The interference tone alone, `len` samples at `sample_rate`.
pub fn tone(len: usize, sample_rate: f64, spec: &InterferenceSpec) -> Vec<f64> {
    (0..len).map(|i| tone_sample(spec, sample_rate, i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const SPEC: InterferenceSpec = InterferenceSpec {
        frequency_hz: 15_200.0,
        amplitude: 1.8,
    };

    #[test]
    fn inject_on_silence_is_the_tone() {
        let silence = AudioSegment::new(vec![0.0; 1000], 44_100.0).unwrap();
        let noisy = inject(&silence, &SPEC);
        let expected = tone(1000, 44_100.0, &SPEC);
        assert_eq!(noisy.samples(), expected.as_slice());
        assert_eq!(noisy.sample_rate(), 44_100.0);
        let peak = noisy.samples().iter().fold(0.0f64, |m, x| m.max(x.abs()));
        assert!(peak <= 1.8 + 1e-12 && peak > 1.7);
    }

    #[test]
    fn inject_adds_to_existing_samples() {
        let base: Vec<f64> = (0..64).map(|i| i as f64 * 0.01).collect();
        let seg = AudioSegment::new(base.clone(), 8000.0).unwrap();
        let spec = InterferenceSpec {
            frequency_hz: 1000.0,
            amplitude: -0.5,
        };
        let noisy = inject(&seg, &spec);
        for (i, (y, x)) in noisy.samples().iter().zip(base).enumerate() {
            let t = i as f64 / 8000.0;
            assert_abs_diff_eq!(*y, x - 0.5 * (2.0 * PI * 1000.0 * t).sin(), epsilon = 1e-12);
        }
    }

    #[test]
    fn frequency_above_nyquist_aliases_without_error() {
        let seg = AudioSegment::new(vec![0.0; 16], 1000.0).unwrap();
        // 1100 Hz at 1 kHz aliases onto 100 Hz
        let aliased = inject(
            &seg,
            &InterferenceSpec {
                frequency_hz: 1100.0,
                amplitude: 1.0,
            },
        );
        let direct = tone(
            16,
            1000.0,
            &InterferenceSpec {
                frequency_hz: 100.0,
                amplitude: 1.0,
            },
        );
        for (a, b) in aliased.samples().iter().zip(direct) {
            assert_abs_diff_eq!(*a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn kernel_matches_free_function() {
        let kernel = InjectKernel::try_new(InjectConfig {
            spec: SPEC,
            sample_rate: 44_100.0,
        })
        .expect("kernel should initialize");
        let x = vec![0.25f64; 32];
        let alloc = kernel.run_alloc(&x).expect("run_alloc");
        let mut into = vec![0.0f64; 32];
        kernel.run_into(&x, &mut into).expect("run_into");
        assert_eq!(alloc, into);

        let seg = AudioSegment::new(x, 44_100.0).unwrap();
        assert_eq!(inject(&seg, &SPEC).samples(), alloc.as_slice());
        assert_eq!(kernel.run_alloc(&seg).unwrap(), alloc);
        assert_eq!(kernel.tone(4), tone(4, 44_100.0, &SPEC));

        let mut short = vec![0.0f64; 31];
        assert!(matches!(
            kernel.run_into(&vec![0.0f64; 32], &mut short),
            Err(ExecInvariantViolation::LengthMismatch { .. })
        ));
    }

    #[test]
    fn kernel_rejects_non_positive_rate() {
        assert!(InjectKernel::try_new(InjectConfig {
            spec: SPEC,
            sample_rate: 0.0,
        })
        .is_err());
    }
}

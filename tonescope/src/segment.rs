//! Mono audio segments and interference tone descriptions.

use serde::{Deserialize, Serialize};
use tonescope_core::{Error, Result};

/// Ordered real samples plus their sample rate.
///
/// Always single-channel: interleaved multi-channel input is downmixed by
/// [`AudioSegment::from_interleaved`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioSegment {
    samples: Vec<f64>,
    sample_rate: f64,
}

impl AudioSegment {
    /// Wrap `samples` recorded at `sample_rate` Hz.
    ///
    /// # Errors
    /// `InvalidConfig` when the rate is not finite and positive,
    /// `InsufficientData` when `samples` is empty.
    pub fn new(samples: Vec<f64>, sample_rate: f64) -> Result<Self> {
        validate_sample_rate(sample_rate)?;
        if samples.is_empty() {
            return Err(Error::insufficient_data("samples", 1, 0));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Downmix an interleaved buffer with `channels` channels to mono by
    /// averaging each frame. A trailing partial frame is dropped.
    pub fn from_interleaved(samples: &[f64], channels: usize, sample_rate: f64) -> Result<Self> {
        if channels == 0 {
            return Err(Error::invalid_config("channels", "must be at least 1"));
        }
        let scale = 1.0 / channels as f64;
        let mono = samples
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f64>() * scale)
            .collect();
        Self::new(mono, sample_rate)
    }

    /// A segment at the same sample rate holding `samples`.
    pub(crate) fn with_samples(&self, samples: Vec<f64>) -> Self {
        Self {
            samples,
            sample_rate: self.sample_rate,
        }
    }

    /// Sample values.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Consume the segment, returning its samples.
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Half the sample rate.
    pub fn nyquist(&self) -> f64 {
        self.sample_rate / 2.0
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Never true for a constructed segment; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Length in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate
    }
}

/// A sinusoidal interferer `amplitude * sin(2 pi frequency_hz t)`.
///
/// Both fields are unconstrained; frequencies at or above Nyquist alias.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterferenceSpec {
    /// Tone frequency in Hz.
    pub frequency_hz: f64,
    /// Peak amplitude.
    pub amplitude: f64,
}

pub(crate) fn validate_sample_rate(sample_rate: f64) -> Result<()> {
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(Error::invalid_config(
            "sample_rate",
            format!("must be finite and > 0, got {sample_rate}"),
        ));
    }
    Ok(())
}

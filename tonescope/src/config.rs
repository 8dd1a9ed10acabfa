//! Pipeline configuration, loadable from TOML.

use crate::segment::InterferenceSpec;
use crate::signal::filter::design::{FilterFamily, FilterSpec};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tonescope_core::{Error, Result};

/// Every knob of one pipeline run. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Sample rate of the analysed segment, Hz.
    pub sample_rate: f64,
    /// Injected tone frequency, Hz.
    pub interference_frequency: f64,
    /// Injected tone amplitude.
    pub interference_amplitude: f64,
    /// FFT length per Welch segment.
    pub fft_size: usize,
    /// Welch segment length.
    pub window_size: usize,
    /// Window name; unknown names fall back to Hann with a warning.
    pub window_type: String,
    /// Segment overlap in percent of `window_size`.
    pub overlap_percent: f64,
    /// Filter family name (`butter`, `cheby1`, `cheby2`, `ellip`, `fir`).
    pub filter_type: String,
    /// Filter order.
    pub order: usize,
    /// Low-pass cutoff, Hz.
    pub cutoff: f64,
    /// Passband ripple, dB.
    pub ripple: f64,
    /// Stopband attenuation, dB.
    pub attenuation: f64,
    /// Length of the segment a host should extract, seconds.
    pub segment_seconds: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100.0,
            interference_frequency: 15_200.0,
            interference_amplitude: 1.8,
            fft_size: 2048,
            window_size: 2048,
            window_type: "hann".to_owned(),
            overlap_percent: 50.0,
            filter_type: "butter".to_owned(),
            order: 8,
            cutoff: 5000.0,
            ripple: 1.0,
            attenuation: 40.0,
            segment_seconds: 3.0,
        }
    }
}

impl PipelineConfig {
    /// Parse a TOML document; absent keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::invalid_config("config", e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::invalid_config("config", format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Reject non-finite numbers and a non-positive sample rate or segment
    /// length. Stage-specific ranges are checked by the stages themselves.
    pub fn validate(&self) -> Result<()> {
        let reals = [
            ("sample_rate", self.sample_rate),
            ("interference_frequency", self.interference_frequency),
            ("interference_amplitude", self.interference_amplitude),
            ("overlap_percent", self.overlap_percent),
            ("cutoff", self.cutoff),
            ("ripple", self.ripple),
            ("attenuation", self.attenuation),
            ("segment_seconds", self.segment_seconds),
        ];
        if let Some((arg, value)) = reals.iter().find(|(_, v)| !v.is_finite()) {
            return Err(Error::invalid_config(*arg, format!("must be finite, got {value}")));
        }
        if self.sample_rate <= 0.0 {
            return Err(Error::invalid_config("sample_rate", "must be > 0"));
        }
        if self.segment_seconds <= 0.0 {
            return Err(Error::invalid_config("segment_seconds", "must be > 0"));
        }
        Ok(())
    }

    /// The tone injected into the segment.
    pub fn interference(&self) -> InterferenceSpec {
        InterferenceSpec {
            frequency_hz: self.interference_frequency,
            amplitude: self.interference_amplitude,
        }
    }

    /// The filter request, failing on an unknown family name.
    pub fn filter_spec(&self) -> Result<FilterSpec> {
        Ok(FilterSpec {
            family: self.filter_type.parse::<FilterFamily>()?,
            order: self.order,
            cutoff_hz: self.cutoff,
            ripple_db: self.ripple,
            attenuation_db: self.attenuation,
            sample_rate: self.sample_rate,
        })
    }

    /// Segment length in samples at the configured rate.
    pub fn segment_len(&self) -> usize {
        (self.segment_seconds * self.sample_rate).round() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tonescope_core::ErrorKind;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = PipelineConfig::from_toml_str(
            r#"
            filter_type = "ellip"
            order = 6
            ripple = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(config.order, 6);
        assert_eq!(config.filter_type, "ellip");
        assert_eq!(config.sample_rate, 44_100.0);
        assert_eq!(config.window_type, "hann");
        let spec = config.filter_spec().unwrap();
        assert_eq!(spec.family, FilterFamily::Elliptic);
        assert_eq!(spec.ripple_db, 0.5);
    }

    #[test]
    fn malformed_toml_is_invalid_config() {
        let err = PipelineConfig::from_toml_str("order = \"eight\"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "cutoff = 3000.0\nwindow_type = \"blackman\"").unwrap();
        let config = PipelineConfig::load(file.path()).unwrap();
        assert_eq!(config.cutoff, 3000.0);
        assert_eq!(config.window_type, "blackman");
        assert!(PipelineConfig::load(file.path().with_extension("missing")).is_err());
    }

    #[test]
    fn validation() {
        assert!(PipelineConfig::default().validate().is_ok());
        let config = PipelineConfig {
            cutoff: f64::NAN,
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err().kind(), ErrorKind::InvalidConfig);
        let config = PipelineConfig {
            sample_rate: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        let config = PipelineConfig {
            filter_type: "kalman".to_owned(),
            ..Default::default()
        };
        assert_eq!(config.filter_spec().unwrap_err().kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn segment_len_rounds() {
        assert_eq!(PipelineConfig::default().segment_len(), 132_300);
    }
}

pub mod analyze;
pub mod design;

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;
use tonescope::PipelineConfig;

/// Configuration file plus per-field overrides shared by every subcommand.
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// TOML configuration file; missing keys take their defaults
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Sample rate the input is resampled to (Hz)
    #[arg(long)]
    sample_rate: Option<f64>,

    /// Injected tone frequency (Hz)
    #[arg(long)]
    interference_frequency: Option<f64>,

    /// Injected tone amplitude
    #[arg(long)]
    interference_amplitude: Option<f64>,

    /// FFT length per Welch segment
    #[arg(long)]
    fft_size: Option<usize>,

    /// Welch segment length
    #[arg(long)]
    window_size: Option<usize>,

    /// Window function (hann, hamming, blackman, rectangular)
    #[arg(long)]
    window_type: Option<String>,

    /// Segment overlap in percent
    #[arg(long)]
    overlap_percent: Option<f64>,

    /// Filter family (butter, cheby1, cheby2, ellip, fir)
    #[arg(long)]
    filter_type: Option<String>,

    /// Filter order
    #[arg(long)]
    order: Option<usize>,

    /// Cutoff frequency (Hz)
    #[arg(long)]
    cutoff: Option<f64>,

    /// Passband ripple (dB)
    #[arg(long)]
    ripple: Option<f64>,

    /// Stopband attenuation (dB)
    #[arg(long)]
    attenuation: Option<f64>,

    /// Length of the analysed segment (seconds)
    #[arg(long)]
    segment_seconds: Option<f64>,
}

impl ConfigArgs {
    /// Load the configuration file (or defaults) and apply the overrides.
    pub fn resolve(self) -> anyhow::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => PipelineConfig::default(),
        };

        macro_rules! apply {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = self.$field {
                    config.$field = value;
                })*
            };
        }
        apply!(
            sample_rate,
            interference_frequency,
            interference_amplitude,
            fft_size,
            window_size,
            window_type,
            overlap_percent,
            filter_type,
            order,
            cutoff,
            ripple,
            attenuation,
            segment_seconds,
        );

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn overrides_win_over_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "order = 4\ncutoff = 3000.0").unwrap();
        let args = ConfigArgs {
            config: Some(file.path().to_path_buf()),
            cutoff: Some(2500.0),
            filter_type: Some("cheby2".to_owned()),
            ..Default::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.order, 4);
        assert_eq!(config.cutoff, 2500.0);
        assert_eq!(config.filter_type, "cheby2");
        assert_eq!(config.fft_size, 2048);
    }

    #[test]
    fn non_finite_override_is_rejected() {
        let args = ConfigArgs {
            ripple: Some(f64::NAN),
            ..Default::default()
        };
        assert!(args.resolve().is_err());
    }
}

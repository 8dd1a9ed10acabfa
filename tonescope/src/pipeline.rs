//! One end-to-end run: inject, estimate, design, filter, score.

use crate::config::PipelineConfig;
use crate::metrics::{score, FilterMetrics};
use crate::segment::AudioSegment;
use crate::signal::filter::apply;
use crate::signal::filter::design::{design, FilterDesign};
use crate::signal::interference::{inject, tone};
use crate::signal::spectral::{estimate, SpectralEstimate};
use tonescope_core::{Result, Warning};

/// Everything one run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    /// The clean input segment.
    pub original: AudioSegment,
    /// The injected tone on its own.
    pub interference: AudioSegment,
    /// `original + interference`.
    pub noisy: AudioSegment,
    /// `noisy` after zero-phase filtering.
    pub filtered: AudioSegment,
    /// PSD of `noisy` with its detected peak.
    pub estimate: SpectralEstimate,
    /// The designed filter and its response.
    pub design: FilterDesign,
    /// Scores against the detected peak frequency.
    pub metrics: FilterMetrics,
    /// Degradations collected from every stage, in stage order.
    pub warnings: Vec<Warning>,
}

/// Run the full chain on `segment`.
///
/// The segment's own sample rate drives every stage; `config.sample_rate`
/// is only the rate a host resamples to before calling this. The filter
/// family is resolved before any signal work, so an unknown family fails
/// without side effects. Metrics are scored against the *detected* peak,
/// not the configured tone.
pub fn run(segment: &AudioSegment, config: &PipelineConfig) -> Result<PipelineReport> {
    config.validate()?;
    let mut spec = config.filter_spec()?;
    spec.sample_rate = segment.sample_rate();
    spec.validate()?;

    let interference_spec = config.interference();
    let noisy = inject(segment, &interference_spec);
    let interference = AudioSegment::new(
        tone(segment.len(), segment.sample_rate(), &interference_spec),
        segment.sample_rate(),
    )?;

    let estimate = estimate(
        noisy.samples(),
        noisy.sample_rate(),
        config.fft_size,
        config.window_size,
        &config.window_type,
        config.overlap_percent,
    )?;
    tracing::debug!(
        peak_hz = estimate.peak_frequency,
        peak_db = estimate.peak_power_db,
        "interference located"
    );

    let design = design(&spec)?;
    let filtered = noisy.with_samples(apply(&design.coefficients, noisy.samples())?);
    let metrics = score(&design, estimate.peak_frequency);

    let warnings = estimate
        .warnings
        .iter()
        .chain(design.warnings.iter())
        .cloned()
        .collect();

    Ok(PipelineReport {
        original: segment.clone(),
        interference,
        noisy,
        filtered,
        estimate,
        design,
        metrics,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use tonescope_core::ErrorKind;

    fn silence(seconds: f64) -> AudioSegment {
        AudioSegment::new(vec![0.0; (44_100.0 * seconds) as usize], 44_100.0).unwrap()
    }

    fn unknown_windows(warnings: &[Warning]) -> usize {
        warnings
            .iter()
            .filter(|w| matches!(w, Warning::UnknownWindow { .. }))
            .count()
    }

    #[test]
    fn default_run_finds_and_removes_the_tone() {
        let report = run(&silence(0.5), &PipelineConfig::default()).unwrap();
        assert!((report.estimate.peak_frequency - 15_200.0).abs() <= report.estimate.bin_width());
        assert_eq!(report.filtered.len(), report.original.len());
        assert_eq!(unknown_windows(&report.warnings), 0);
        assert_eq!(report.warnings, report.design.warnings);
        assert!(report.design.is_stable());
        assert_eq!(report.metrics.num_coefficients, 17);
        for (n, i) in report.noisy.samples().iter().zip(report.interference.samples()) {
            assert_abs_diff_eq!(*n, *i);
        }
        let mid = report.filtered.len() / 2;
        let residual = report.filtered.samples()[mid - 500..mid + 500]
            .iter()
            .fold(0.0f64, |m, x| m.max(x.abs()));
        assert!(residual < 1e-4, "residual {residual}");
    }

    #[test]
    fn unknown_family_fails_first() {
        let config = PipelineConfig {
            filter_type: "kalman".to_owned(),
            window_size: 1 << 20,
            ..Default::default()
        };
        let err = run(&silence(0.1), &config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn window_fallback_is_reported() {
        let config = PipelineConfig {
            window_type: "foo".to_owned(),
            ..Default::default()
        };
        let report = run(&silence(0.2), &config).unwrap();
        assert_eq!(unknown_windows(&report.warnings), 1);
        assert!(matches!(report.warnings[0], Warning::UnknownWindow { .. }));
        assert_eq!(report.warnings[1..], report.design.warnings[..]);
    }

    #[test]
    fn zeros_at_nyquist_surface_as_singular_delay() {
        // Order-8 Butterworth puts an 8-fold zero at z = -1.
        let report = run(&silence(0.2), &PipelineConfig::default()).unwrap();
        let singular: Vec<usize> = report
            .warnings
            .iter()
            .filter_map(|w| match w {
                Warning::SingularGroupDelay { points } => Some(*points),
                _ => None,
            })
            .collect();
        assert_eq!(singular.len(), 1);
        assert!(singular[0] > 0);
        let last = *report.design.group_delay.samples.last().unwrap();
        assert_eq!(last, 0.0);
    }

    #[test]
    fn runs_are_independent() {
        let config = PipelineConfig::default();
        let first = run(&silence(0.2), &config).unwrap();
        let second = run(&silence(0.2), &config).unwrap();
        assert_eq!(first, second);
    }
}

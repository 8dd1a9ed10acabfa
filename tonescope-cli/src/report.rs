//! JSON views of pipeline results.

use serde::Serialize;
use tonescope::signal::filter::design::{FilterCoefficients, FilterDesign, FilterSpec};
use tonescope::signal::response::GroupDelay;
use tonescope::signal::spectral::SpectralEstimate;
use tonescope::{FilterMetrics, PipelineReport, Warning};

/// Magnitude and phase of a frequency response.
#[derive(Debug, Serialize)]
pub struct ResponseCurve {
    pub frequencies_hz: Vec<f64>,
    pub magnitude_db: Vec<f64>,
    pub phase_rad: Vec<f64>,
}

impl ResponseCurve {
    fn from_design(design: &FilterDesign) -> Self {
        let response = &design.response;
        Self {
            frequencies_hz: response.frequencies_hz.clone(),
            magnitude_db: response.magnitude_db.clone(),
            phase_rad: response.response.iter().map(|h| h.arg()).collect(),
        }
    }
}

/// A designed filter with its scores and curves.
#[derive(Debug, Serialize)]
pub struct DesignReport<'a> {
    pub spec: &'a FilterSpec,
    pub stable: bool,
    pub coefficients: &'a FilterCoefficients,
    pub metrics: FilterMetrics,
    pub response: ResponseCurve,
    pub group_delay: &'a GroupDelay,
    pub warnings: Vec<String>,
}

impl<'a> DesignReport<'a> {
    pub fn new(design: &'a FilterDesign, metrics: FilterMetrics) -> Self {
        Self {
            spec: &design.spec,
            stable: design.is_stable(),
            coefficients: &design.coefficients,
            metrics,
            response: ResponseCurve::from_design(design),
            group_delay: &design.group_delay,
            warnings: messages(&design.warnings),
        }
    }
}

/// Everything `analyze` writes to `report.json`.
#[derive(Debug, Serialize)]
pub struct AnalysisReport<'a> {
    pub sample_rate: f64,
    pub segment_seconds: f64,
    pub interference_frequency: f64,
    pub detected_interference: f64,
    pub peak_power_db: f64,
    pub spectrum: &'a SpectralEstimate,
    pub filter: DesignReport<'a>,
    pub warnings: Vec<String>,
}

impl<'a> AnalysisReport<'a> {
    pub fn new(report: &'a PipelineReport, interference_frequency: f64) -> Self {
        Self {
            sample_rate: report.original.sample_rate(),
            segment_seconds: report.original.duration_secs(),
            interference_frequency,
            detected_interference: report.estimate.peak_frequency,
            peak_power_db: report.estimate.peak_power_db,
            spectrum: &report.estimate,
            filter: DesignReport::new(&report.design, report.metrics),
            warnings: messages(&report.warnings),
        }
    }
}

fn messages(warnings: &[Warning]) -> Vec<String> {
    warnings.iter().map(ToString::to_string).collect()
}

//! Quality metrics of a designed filter.

use crate::signal::filter::design::FilterDesign;
use crate::signal::response::FrequencyResponse;
use serde::{Deserialize, Serialize};

/// Read-only scores derived from a [`FilterDesign`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterMetrics {
    /// Mean group delay over the response grid, in samples.
    pub avg_group_delay_samples: f64,
    /// Mean group delay in milliseconds.
    pub avg_group_delay_ms: f64,
    /// Largest `|magnitude_db|` below the cutoff.
    pub passband_deviation_db: f64,
    /// `-min(magnitude_db)` above the interference frequency, or 0 when the
    /// grid has no such point.
    pub stopband_rejection_db: f64,
    /// `-min(magnitude_db)` above the designed cutoff.
    pub cutoff_rejection_db: f64,
    /// `-magnitude_db` at the grid point nearest the interference
    /// frequency; 0 when that frequency is at or above Nyquist.
    pub rejection_at_interference_db: f64,
    /// `len(b) + len(a) - 1`.
    pub num_coefficients: usize,
}

/// Largest absolute gain in dB over grid points strictly below `cutoff_hz`.
pub fn passband_deviation_db(response: &FrequencyResponse, cutoff_hz: f64) -> f64 {
    response
        .frequencies_hz
        .iter()
        .zip(response.magnitude_db.iter())
        .filter(|(f, _)| **f < cutoff_hz)
        .map(|(_, db)| db.abs())
        .fold(0.0, f64::max)
}

/// Rejection in dB over grid points strictly above `edge_hz`: the negated
/// minimum gain, or 0 when no grid point lies above the edge.
pub fn rejection_above_db(response: &FrequencyResponse, edge_hz: f64) -> f64 {
    response
        .frequencies_hz
        .iter()
        .zip(response.magnitude_db.iter())
        .filter(|(f, _)| **f > edge_hz)
        .map(|(_, db)| *db)
        .reduce(f64::min)
        .map_or(0.0, |min_db| -min_db)
}

/// Score `design` against an interference tone at `interference_frequency`
/// Hz (normally the detected spectral peak).
pub fn score(design: &FilterDesign, interference_frequency: f64) -> FilterMetrics {
    let response = &design.response;
    let nyquist = 0.5 * design.spec.sample_rate;
    let avg_group_delay_samples = design.group_delay.average_samples();

    let rejection_at_interference_db =
        if interference_frequency >= 0.0 && interference_frequency < nyquist {
            response
                .nearest_index(interference_frequency)
                .map_or(0.0, |i| -response.magnitude_db[i])
        } else {
            0.0
        };

    FilterMetrics {
        avg_group_delay_samples,
        avg_group_delay_ms: avg_group_delay_samples / design.spec.sample_rate * 1000.0,
        passband_deviation_db: passband_deviation_db(response, design.spec.cutoff_hz),
        stopband_rejection_db: rejection_above_db(response, interference_frequency),
        cutoff_rejection_db: rejection_above_db(response, design.spec.cutoff_hz),
        rejection_at_interference_db,
        num_coefficients: design.coefficients.num_coefficients(),
    }
}

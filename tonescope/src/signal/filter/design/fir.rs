use crate::signal::windows::WindowType;
use core::f64::consts::PI;

fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}

/// Windowed-sinc low-pass taps with a symmetric Hamming window, scaled to
/// unit gain at DC.
///
/// `wn` is the cutoff as a fraction of Nyquist.
pub(crate) fn firwin(numtaps: usize, wn: f64) -> Vec<f64> {
    let alpha = 0.5 * (numtaps as f64 - 1.0);
    let window = WindowType::Hamming.samples(numtaps, true);
    let taps: Vec<f64> = window
        .iter()
        .enumerate()
        .map(|(i, w)| w * wn * sinc(wn * (i as f64 - alpha)))
        .collect();
    let dc: f64 = taps.iter().sum();
    taps.into_iter().map(|h| h / dc).collect()
}

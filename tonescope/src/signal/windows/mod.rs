//! Tapering windows for spectral estimation and FIR design.

use core::f64::consts::PI;
use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use tonescope_core::{Error, Warning};

mod kernels;

pub use kernels::*;

/// Closed set of windows accepted by the estimator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowType {
    /// Raised cosine, `0.5 - 0.5 cos`.
    #[default]
    Hann,
    /// `0.54 - 0.46 cos`.
    Hamming,
    /// Three-term Blackman.
    Blackman,
    /// All ones.
    Rectangular,
}

impl WindowType {
    /// Lower-case canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            WindowType::Hann => "hann",
            WindowType::Hamming => "hamming",
            WindowType::Blackman => "blackman",
            WindowType::Rectangular => "rectangular",
        }
    }

    /// Lenient lookup used by the estimator: unknown names resolve to
    /// [`WindowType::Hann`] together with a [`Warning::UnknownWindow`].
    pub fn resolve(name: &str) -> (Self, Option<Warning>) {
        match name.parse::<WindowType>() {
            Ok(window) => (window, None),
            Err(_) => {
                let fallback = WindowType::default();
                tracing::warn!(
                    requested = name,
                    fallback = fallback.name(),
                    "window type not recognized, falling back"
                );
                (
                    fallback,
                    Some(Warning::UnknownWindow {
                        requested: name.to_owned(),
                        fallback: fallback.name().to_owned(),
                    }),
                )
            }
        }
    }

    /// Window samples of length `nx`.
    ///
    /// `sym = true` gives the symmetric form (as `np.hanning` and friends,
    /// used for filter design and here for Welch segments); `sym = false`
    /// gives the periodic form with denominator `nx`.
    pub fn samples(&self, nx: usize, sym: bool) -> Vec<f64> {
        match nx {
            0 => return Vec::new(),
            1 => return vec![1.0],
            _ => {}
        }
        let denom = (if sym { nx - 1 } else { nx }) as f64;
        (0..nx)
            .map(|i| {
                let x = 2.0 * PI * i as f64 / denom;
                match self {
                    WindowType::Hann => 0.5 - 0.5 * x.cos(),
                    WindowType::Hamming => 0.54 - 0.46 * x.cos(),
                    WindowType::Blackman => 0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos(),
                    WindowType::Rectangular => 1.0,
                }
            })
            .collect()
    }
}

impl fmt::Display for WindowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WindowType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hann" | "hanning" => Ok(WindowType::Hann),
            "hamming" => Ok(WindowType::Hamming),
            "blackman" => Ok(WindowType::Blackman),
            "rectangular" | "rect" | "boxcar" => Ok(WindowType::Rectangular),
            _ => Err(Error::invalid_config(
                "window_type",
                format!("unknown window `{s}`"),
            )),
        }
    }
}

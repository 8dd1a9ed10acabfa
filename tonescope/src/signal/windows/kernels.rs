//! Trait-first window generation kernels.

use super::WindowType;
use crate::kernel::{ConfigError, ExecInvariantViolation, KernelLifecycle, Write1D};
use crate::signal::traits::WindowGenerate;

/// Constructor config for [`WindowKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    /// Window family.
    pub window: WindowType,
    /// Output length.
    pub nx: usize,
    /// Symmetric (`true`) or periodic (`false`) form.
    pub sym: bool,
}

/// Trait-first window generation kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowKernel {
    window: WindowType,
    nx: usize,
    sym: bool,
}

impl KernelLifecycle for WindowKernel {
    type Config = WindowConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        if config.nx <= 1 {
            return Err(ConfigError::InvalidArgument {
                arg: "nx",
                reason: "window length must be greater than 1",
            });
        }
        Ok(Self {
            window: config.window,
            nx: config.nx,
            sym: config.sym,
        })
    }
}

impl WindowGenerate<f64> for WindowKernel {
    fn run_into<O>(&self, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        O: Write1D<f64> + ?Sized,
    {
        let out_slice = out.write_slice_mut()?;
        if out_slice.len() != self.nx {
            return Err(ExecInvariantViolation::LengthMismatch {
                arg: "out",
                expected: self.nx,
                got: out_slice.len(),
            });
        }
        out_slice.copy_from_slice(&self.window.samples(self.nx, self.sym));
        Ok(())
    }

    fn run_alloc(&self) -> Result<Vec<f64>, ExecInvariantViolation> {
        Ok(self.window.samples(self.nx, self.sym))
    }
}

//! Trait interfaces for signal-processing capabilities.
//!
//! Kernels implement one capability each; `run_into` writes into a
//! caller-provided buffer and `run_alloc` returns a fresh one.

use crate::kernel::{ExecInvariantViolation, Read1D, Write1D};
use nalgebra::Complex;

/// Window generation capability.
pub trait WindowGenerate<T> {
    /// Run window generation into a caller-provided output buffer.
    fn run_into<O>(&self, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        O: Write1D<T> + ?Sized;

    /// Run window generation and allocate output samples.
    fn run_alloc(&self) -> Result<Vec<T>, ExecInvariantViolation>;
}

/// 1D tone-injection capability.
pub trait ToneInject1D<T> {
    /// Superimpose the tone on `input` into a caller-provided output buffer.
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized,
        O: Write1D<T> + ?Sized;

    /// Superimpose the tone on `input` and allocate output.
    fn run_alloc<I>(&self, input: &I) -> Result<Vec<T>, ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized;
}

/// Welch PSD capability.
pub trait WelchPsd1D {
    /// Estimate PSD into caller-provided frequency and density buffers.
    fn run_into<I, OF, OP>(
        &self,
        input: &I,
        freqs: &mut OF,
        pxx: &mut OP,
    ) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<f64> + ?Sized,
        OF: Write1D<f64> + ?Sized,
        OP: Write1D<f64> + ?Sized;

    /// Estimate PSD and allocate `(frequencies, density)`.
    fn run_alloc<I>(&self, input: &I) -> Result<(Vec<f64>, Vec<f64>), ExecInvariantViolation>
    where
        I: Read1D<f64> + ?Sized;
}

/// Digital frequency response capability.
pub trait Freqz1D {
    /// Evaluate `H(e^jw)` into caller-provided buffers.
    fn run_into<I1, I2, OW, OH>(
        &self,
        b: &I1,
        a: &I2,
        w: &mut OW,
        h: &mut OH,
    ) -> Result<(), ExecInvariantViolation>
    where
        I1: Read1D<f64> + ?Sized,
        I2: Read1D<f64> + ?Sized,
        OW: Write1D<f64> + ?Sized,
        OH: Write1D<Complex<f64>> + ?Sized;

    /// Evaluate `H(e^jw)` and allocate `(w, h)`.
    fn run_alloc<I1, I2>(
        &self,
        b: &I1,
        a: &I2,
    ) -> Result<(Vec<f64>, Vec<Complex<f64>>), ExecInvariantViolation>
    where
        I1: Read1D<f64> + ?Sized,
        I2: Read1D<f64> + ?Sized;
}

/// Group delay capability.
pub trait GroupDelay1D {
    /// Output representation produced by the kernel.
    type Output;

    /// Evaluate the group delay of `b / a`.
    fn run_alloc<I1, I2>(&self, b: &I1, a: &I2) -> Result<Self::Output, ExecInvariantViolation>
    where
        I1: Read1D<f64> + ?Sized,
        I2: Read1D<f64> + ?Sized;
}

/// Low-pass filter design capability.
pub trait FilterDesign1D {
    /// Output representation produced by the design kernel.
    type Output;

    /// Run the design and allocate its output representation.
    fn run_alloc(&self) -> Result<Self::Output, ExecInvariantViolation>;
}

/// 1D `lfilter` capability.
pub trait LFilter1D<T> {
    /// Run filtering into a caller-provided output buffer.
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized,
        O: Write1D<T> + ?Sized;

    /// Run filtering and allocate output.
    fn run_alloc<I>(&self, input: &I) -> Result<Vec<T>, ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized;
}

/// 1D `filtfilt` capability.
pub trait FiltFilt1D<T> {
    /// Run zero-phase filtering into a caller-provided output buffer.
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized,
        O: Write1D<T> + ?Sized;

    /// Run zero-phase filtering and allocate output.
    fn run_alloc<I>(&self, input: &I) -> Result<Vec<T>, ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized;
}

/// `lfilter_zi` design capability.
pub trait LFilterZiDesign1D<T> {
    /// Compute initial state into a caller-provided output buffer.
    fn run_into<O>(&self, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        O: Write1D<T> + ?Sized;

    /// Compute initial state and allocate output.
    fn run_alloc(&self) -> Result<Vec<T>, ExecInvariantViolation>;
}

/// 1D resampling capability.
pub trait Resample1D<T> {
    /// Run resampling into a caller-provided output buffer.
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<(), ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized,
        O: Write1D<T> + ?Sized;

    /// Run resampling and allocate output.
    fn run_alloc<I>(&self, input: &I) -> Result<Vec<T>, ExecInvariantViolation>
    where
        I: Read1D<T> + ?Sized;
}

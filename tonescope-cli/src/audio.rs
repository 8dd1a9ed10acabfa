//! WAV loading, segment extraction and export.

use anyhow::{bail, Context};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::ops::Range;
use std::path::Path;
use tonescope::signal::resample::{resample, resampled_len};
use tonescope::AudioSegment;

/// Read a WAV file as a mono segment: channels averaged, samples scaled to
/// `[-1, 1)`.
pub fn read_wav(path: &Path) -> anyhow::Result<AudioSegment> {
    let reader = WavReader::open(path).with_context(|| format!("opening {}", path.display()))?;
    let spec = reader.spec();

    let samples: Vec<f64> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| f64::from(v) / max_val))
                .collect::<Result<_, _>>()?
        }
    };
    if samples.is_empty() {
        bail!("{} holds no audio", path.display());
    }

    tracing::info!(
        path = %path.display(),
        channels = spec.channels,
        sample_rate = spec.sample_rate,
        frames = samples.len() / usize::from(spec.channels.max(1)),
        "loaded audio"
    );
    Ok(AudioSegment::from_interleaved(
        &samples,
        usize::from(spec.channels),
        f64::from(spec.sample_rate),
    )?)
}

/// Bring `segment` to `sample_rate` with Fourier resampling; a no-op when
/// the rates already match.
pub fn conform_rate(segment: AudioSegment, sample_rate: f64) -> anyhow::Result<AudioSegment> {
    if segment.sample_rate() == sample_rate {
        return Ok(segment);
    }
    let target = resampled_len(segment.len(), segment.sample_rate(), sample_rate).max(1);
    tracing::info!(
        from = segment.sample_rate(),
        to = sample_rate,
        samples = target,
        "resampling"
    );
    let samples = resample(segment.samples(), target)?;
    Ok(AudioSegment::new(samples, sample_rate)?)
}

/// `want` samples centred on the middle of a `len` sample buffer, shifted
/// back from the end when they would overrun it and cut at the start when
/// the buffer is shorter than `want`.
pub fn centered_window(len: usize, want: usize) -> Range<usize> {
    let start = (len / 2).saturating_sub(want / 2);
    let end = start.saturating_add(want);
    if end > len {
        len.saturating_sub(want)..len
    } else {
        start..end
    }
}

/// Cut the centred analysis window of `seconds` out of `segment`.
pub fn extract_segment(segment: &AudioSegment, seconds: f64) -> anyhow::Result<AudioSegment> {
    let want = (seconds * segment.sample_rate()).round() as usize;
    let range = centered_window(segment.len(), want);
    tracing::debug!(start = range.start, end = range.end, "segment window");
    Ok(AudioSegment::new(
        segment.samples()[range].to_vec(),
        segment.sample_rate(),
    )?)
}

/// Write `samples` as mono 32-bit float WAV.
pub fn write_wav(path: &Path, samples: &[f64], sample_rate: f64) -> anyhow::Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: sample_rate.round() as u32,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer =
        WavWriter::create(path, spec).with_context(|| format!("creating {}", path.display()))?;
    for &sample in samples {
        writer.write_sample(sample as f32)?;
    }
    writer.finalize()?;
    Ok(())
}

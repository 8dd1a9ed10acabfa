//! Full pipeline over a WAV file.

use super::ConfigArgs;
use crate::audio::{conform_rate, extract_segment, read_wav, write_wav};
use crate::report::AnalysisReport;
use anyhow::Context;
use clap::Args;
use std::fs;
use std::path::PathBuf;
use tonescope::pipeline;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    #[command(flatten)]
    config: ConfigArgs,

    /// Directory receiving the WAV outputs and report.json
    #[arg(short, long, default_value = "tonescope-out")]
    out_dir: PathBuf,
}

pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let config = args.config.resolve()?;

    let audio = conform_rate(read_wav(&args.input)?, config.sample_rate)?;
    let segment = extract_segment(&audio, config.segment_seconds)?;
    let report = pipeline::run(&segment, &config)?;

    for warning in &report.warnings {
        tracing::warn!("{warning}");
    }
    tracing::info!(
        injected_hz = config.interference_frequency,
        detected_hz = report.estimate.peak_frequency,
        stopband_rejection_db = report.metrics.stopband_rejection_db,
        passband_deviation_db = report.metrics.passband_deviation_db,
        "analysis complete"
    );

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;
    let rate = segment.sample_rate();
    for (name, samples) in [
        ("original.wav", report.original.samples()),
        ("interference.wav", report.interference.samples()),
        ("noisy.wav", report.noisy.samples()),
        ("filtered.wav", report.filtered.samples()),
    ] {
        write_wav(&args.out_dir.join(name), samples, rate)?;
    }

    let json = serde_json::to_string_pretty(&AnalysisReport::new(
        &report,
        config.interference_frequency,
    ))?;
    let report_path = args.out_dir.join("report.json");
    fs::write(&report_path, json).with_context(|| format!("writing {}", report_path.display()))?;
    tracing::info!(dir = %args.out_dir.display(), "outputs written");
    Ok(())
}

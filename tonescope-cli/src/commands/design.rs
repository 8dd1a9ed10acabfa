//! Filter design without any audio.

use super::ConfigArgs;
use crate::report::DesignReport;
use clap::Args;
use tonescope::metrics::score;
use tonescope::signal::filter::design::design;

#[derive(Args)]
pub struct DesignArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Leave the response curves out of the output
    #[arg(long)]
    brief: bool,
}

pub fn run(args: DesignArgs) -> anyhow::Result<()> {
    let config = args.config.resolve()?;
    let spec = config.filter_spec()?;
    let design = design(&spec)?;
    let metrics = score(&design, config.interference_frequency);
    tracing::info!(
        family = %spec.family,
        order = spec.order,
        stable = design.is_stable(),
        rejection_db = metrics.rejection_at_interference_db,
        "designed filter"
    );

    let output = if args.brief {
        serde_json::json!({
            "spec": spec,
            "coefficients": design.coefficients,
            "metrics": metrics,
        })
    } else {
        serde_json::to_value(DesignReport::new(&design, metrics))?
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

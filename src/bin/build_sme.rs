use anyhow::Result;
use chrono::Local;
use clap::Parser;
use tracing::info;

use bytemind_indices::cli::CommonArgs;
use bytemind_indices::indices::sme;

/// Rebuild the NZ SME Resilience Index metrics and score
#[derive(Parser)]
#[command(name = "build_sme", version)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    args.common.init_logging();

    let config = args.common.config()?;
    info!("🧮 NZ SME Resilience Index");

    let report = sme::run(&config, Local::now().date_naive()).await?;
    for metric in &report.metrics {
        info!("   {:<32} {:>6.2}%  {:?}  [{}]", metric.metric, metric.value, metric.impact, metric.source);
    }
    info!("🏁 Calculated resilience score: {}/100", report.resilience_score);
    Ok(())
}

use anyhow::Result;
use chrono::Local;
use clap::{Parser, ValueEnum};
use tracing::info;

use bytemind_indices::cli::CommonArgs;
use bytemind_indices::indices::{sme, tefi};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Index {
    /// Tech Export Friction Index
    Tefi,
    /// NZ SME Resilience Index
    Sme,
    /// Both indices
    All,
}

#[derive(Parser)]
#[command(
    name = "build-indices",
    version,
    about = "📈 ByteMind index builder",
    long_about = "Regenerates the CSV files behind the website's index charts: the Tech Export Friction Index (tefi_raw.csv) and the NZ SME Resilience Index (nz_sme_resilience.csv, nz_sme_score.txt)."
)]
struct Cli {
    /// Which index to rebuild
    #[arg(value_enum, default_value_t = Index::All)]
    index: Index,

    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.common.init_logging();

    let config = cli.common.config()?;
    let today = Local::now().date_naive();

    info!("🚀 Building indices for {}", today.format("%Y-%m-%d"));
    info!("📁 Output directory: {}", config.output_dir.display());

    if matches!(cli.index, Index::Tefi | Index::All) {
        tefi::run(&config, today).await?;
    }

    if matches!(cli.index, Index::Sme | Index::All) {
        let report = sme::run(&config, today).await?;
        info!("🏁 SME resilience score: {}/100", report.resilience_score);
    }

    info!("✅ Done");
    Ok(())
}

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use tracing::info;

use bytemind_indices::cli::CommonArgs;
use bytemind_indices::indices::tefi;

/// Rebuild the Tech Export Friction Index table
#[derive(Parser)]
#[command(name = "build_tefi", version)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    args.common.init_logging();

    let config = args.common.config()?;
    info!("🧮 Tech Export Friction Index");

    tefi::run(&config, Local::now().date_naive()).await?;
    Ok(())
}

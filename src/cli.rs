//! Arguments and setup shared by the index builder binaries

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::models::Config;

#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Directory the CSV and score files are written to (overrides INDICES_OUTPUT_DIR)
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,

    /// Skip all network calls and use the verified reference figures
    #[arg(long)]
    pub offline: bool,

    /// Show debug-level progress information
    #[arg(long, short)]
    pub verbose: bool,
}

impl CommonArgs {
    /// Environment configuration with command line overrides applied
    pub fn config(&self) -> Result<Config> {
        let mut config = Config::from_env()?;
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if self.offline {
            config.offline = true;
        }
        Ok(config)
    }

    /// Install the global tracing subscriber. `RUST_LOG` wins when set.
    pub fn init_logging(&self) {
        let default_level = if self.verbose { "bytemind_indices=debug,info" } else { "info" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    }
}

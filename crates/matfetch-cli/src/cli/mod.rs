//! CLI for the matfetch asset installer.

mod commands;

use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand};
use matfetch_core::config::{self, RESOLUTIONS};
use std::path::PathBuf;

use commands::{run_clean, run_install, run_list};

/// Top-level CLI for matfetch.
#[derive(Debug, Parser)]
#[command(name = "matfetch")]
#[command(about = "matfetch: parallel installer for MatCap texture sets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Which resolution set and where it lives on disk.
#[derive(Debug, Clone, Args)]
pub struct TargetArgs {
    /// Resolution set to use.
    #[arg(long, default_value = "512", value_parser = PossibleValuesParser::new(RESOLUTIONS.iter().copied()))]
    pub res: String,
    /// Root directory for asset sets (default from config); files go to <DIR>/<res>/.
    #[arg(long, value_name = "DIR")]
    pub dest: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download the assets of one resolution set that are not present yet.
    Install {
        #[command(flatten)]
        target: TargetArgs,
        /// Re-download files even if they already exist.
        #[arg(long)]
        overwrite: bool,
        /// Number of parallel downloads (default: min(cap from config, CPU count)).
        #[arg(long, value_name = "N")]
        workers: Option<usize>,
    },

    /// Print the assets the listing offers, without downloading.
    List {
        /// Resolution set to list.
        #[arg(long, default_value = "512", value_parser = PossibleValuesParser::new(RESOLUTIONS.iter().copied()))]
        res: String,
    },

    /// Remove `.part` files left behind by interrupted runs.
    Clean {
        #[command(flatten)]
        target: TargetArgs,
    },
}

impl CliCommand {
    /// Parses arguments, runs the command and returns the process exit code.
    pub async fn run_from_args() -> Result<i32> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Install {
                target,
                overwrite,
                workers,
            } => run_install(&cfg, &target, overwrite, workers).await,
            CliCommand::List { res } => {
                run_list(&cfg, &res).await?;
                Ok(0)
            }
            CliCommand::Clean { target } => {
                run_clean(&cfg, &target)?;
                Ok(0)
            }
        }
    }
}

impl TargetArgs {
    /// `<dest or config target_root>/<res>`.
    pub fn target_dir(&self, cfg: &config::MatfetchConfig) -> PathBuf {
        match &self.dest {
            Some(root) => root.join(&self.res),
            None => cfg.target_dir(&self.res),
        }
    }
}

#[cfg(test)]
mod tests;

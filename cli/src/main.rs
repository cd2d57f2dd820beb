//! gbt: administration tool for the gold-backed token ledger.

mod replay;

use anyhow::Context;
use clap::Parser;
use gbt_ledger::{GenesisConfig, Ledger};
use gbt_types::{Address, LedgerVariant};
use gbt_utils::LogFormat;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gbt", about = "Gold-backed token ledger administration")]
struct Cli {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, default_value = "info", env = "GBT_LOG_LEVEL")]
    log_level: String,

    /// Log output format: "human" or "json".
    #[arg(long, global = true, default_value = "human", env = "GBT_LOG_FORMAT")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print a genesis config with default fees and all roles held by the owner.
    InitConfig {
        /// Ledger variant: "immediate_fee" (A) or "lock_then_release" (B).
        #[arg(long, default_value = "lock_then_release", env = "GBT_VARIANT")]
        variant: LedgerVariant,

        /// Deployer address; receives every role and both fee wallets.
        #[arg(long, env = "GBT_OWNER")]
        owner: Address,
    },

    /// Build the ledger from a genesis config and print its summary.
    Summary {
        /// Path to the genesis TOML file.
        #[arg(long, env = "GBT_CONFIG")]
        config: PathBuf,

        /// Emit JSON instead of the human-readable block.
        #[arg(long)]
        json: bool,
    },

    /// Replay a JSON array of calls against a fresh ledger and print the report.
    Replay {
        /// Path to the genesis TOML file.
        #[arg(long, env = "GBT_CONFIG")]
        config: PathBuf,

        /// Path to the JSON call script.
        #[arg(long)]
        calls: PathBuf,

        /// Abort on the first rejected call.
        #[arg(long)]
        fail_fast: bool,
    },
}

fn load_ledger(path: &Path) -> anyhow::Result<Ledger> {
    let config = GenesisConfig::from_toml_file(path)
        .with_context(|| format!("failed to load genesis config {}", path.display()))?;
    tracing::info!(config = %path.display(), variant = %config.variant, "loaded genesis config");
    Ok(Ledger::from_genesis(&config)?)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    gbt_utils::init_logging(cli.log_format, &cli.log_level);

    match cli.command {
        Command::InitConfig { variant, owner } => {
            let config = GenesisConfig::new(variant, owner);
            config.validate()?;
            print!("{}", config.to_toml_string()?);
        }
        Command::Summary { config, json } => {
            let ledger = load_ledger(&config)?;
            let summary = ledger.summary();
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{summary}");
            }
        }
        Command::Replay {
            config,
            calls,
            fail_fast,
        } => {
            let mut ledger = load_ledger(&config)?;
            let steps = replay::load_steps(&calls)?;
            tracing::info!(steps = steps.len(), fail_fast, "replaying calls");
            let report = replay::replay(&mut ledger, &steps, fail_fast)?;
            tracing::info!(
                applied = report.applied,
                rejected = report.rejected,
                "replay finished"
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd_apply;
mod cmd_check;
mod cmd_export;
mod cmd_info;
mod common;

#[derive(Parser, Debug)]
#[command(name = "echoctl", version, about = "Echo panel configuration CLI")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Output JSON where applicable
    #[arg(long, global = true)]
    json: bool,
    /// JSON file overriding sheet and column labels
    #[arg(long, global = true)]
    labels: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Show panel type, name and entity counts
    Info { config: PathBuf },
    /// Write the Levels/Times spreadsheet of a panel file
    Export { config: PathBuf, sheet: PathBuf },
    /// Import a spreadsheet and rewrite a copy of the panel file
    Apply {
        config: PathBuf,
        sheet: PathBuf,
        out: PathBuf,
    },
    /// Report levels and fade times naming missing circuits or spaces
    Check {
        config: PathBuf,
        /// Import this spreadsheet before checking
        #[arg(long)]
        sheet: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let Cli {
        verbose,
        json,
        labels,
        cmd,
    } = Cli::parse();

    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| level.into()),
        ))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let labels = common::load_labels(labels.as_deref())?;
    match cmd {
        Cmd::Info { config } => cmd_info::run(&config, json)?,
        Cmd::Export { config, sheet } => cmd_export::run(&config, &sheet, &labels)?,
        Cmd::Apply { config, sheet, out } => cmd_apply::run(&config, &sheet, &out, &labels, json)?,
        Cmd::Check { config, sheet } => cmd_check::run(&config, sheet.as_deref(), &labels, json)?,
    }

    Ok(())
}

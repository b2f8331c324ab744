// CLI definitions using clap

use clap::{Parser, Subcommand};
use spike_clicker::config::MAX_THRESHOLD;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "spike-clicker")]
#[command(author, version, about = "Use a LEGO Spike Prime force sensor as a mouse button")]
pub struct Cli {
    /// Config file path (default: <config dir>/spike-clicker/spike_config.json)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Serial device to open, skipping device selection
    #[arg(short, long)]
    pub port: Option<String>,

    /// Trigger threshold in newtons (1 = instant press), skipping the prompt
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=MAX_THRESHOLD as i64))]
    pub threshold: Option<u8>,

    /// Reuse the saved device without asking
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Run without the live status panel
    #[arg(long)]
    pub headless: bool,

    /// Log clicks instead of injecting them
    #[arg(long)]
    pub dry_run: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Monitor the force sensor and click (default)
    Run,

    /// List available serial devices
    #[command(visible_alias = "ls")]
    List,
}

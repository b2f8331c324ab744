//! Spike Prime force-sensor clicker CLI

use clap::Parser;
use crossterm::style::Stylize;
use spike_clicker::config::SpikeConfig;
use spike_clicker::display::print_endpoint_table;
use spike_clicker::session::{self, SessionOptions};

mod cli;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::List) => list(),
        Some(Commands::Run) | None => {
            let options = SessionOptions {
                config_path: cli.config.unwrap_or_else(SpikeConfig::default_path),
                port: cli.port,
                threshold: cli.threshold,
                assume_yes: cli.yes,
                headless: cli.headless,
                dry_run: cli.dry_run,
            };
            session::run(&options)
        }
    }
}

fn list() -> anyhow::Result<()> {
    let endpoints = spike_transport::list_endpoints()?;
    if endpoints.is_empty() {
        println!("{}", "No serial devices found.".red());
        return Ok(());
    }
    print_endpoint_table(&mut std::io::stdout(), &endpoints)?;
    Ok(())
}

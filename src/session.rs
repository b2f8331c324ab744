//! One interactive session: pick a device, set the threshold, monitor.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use crossterm::style::Stylize;
use spike_transport::{list_endpoints, protocol, SerialEndpoint, SerialLink};
use tracing::{info, warn};

use crate::clicker::{Clicker, LoggingClicker, VirtualMouse, DEVICE_NAME};
use crate::config::SpikeConfig;
use crate::display::{HeadlessStatus, LivePanel};
use crate::edge::TriggerMode;
use crate::monitor::{run_monitor, MonitorState, MonitorSummary, StopReason};
use crate::prompt::Prompter;
use crate::selector::{endpoint_for_path, resolve_device};

/// Options for a session, usually from the command line
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Config file location
    pub config_path: PathBuf,
    /// Device path that bypasses selection
    pub port: Option<String>,
    /// Threshold that bypasses the prompt
    pub threshold: Option<u8>,
    /// Reuse the saved device without asking
    pub assume_yes: bool,
    /// Log instead of drawing the live panel
    pub headless: bool,
    /// Log clicks instead of injecting them
    pub dry_run: bool,
}

/// Run a full session
///
/// Returns `Ok` for the graceful endings (no device, interrupt, disconnect).
pub fn run(options: &SessionOptions) -> anyhow::Result<()> {
    println!("{}", "LEGO Spike Prime Mouse Controller".blue().bold());

    info!("Loading config from {:?}", options.config_path);
    let config = SpikeConfig::load_or_default(&options.config_path);

    let mut prompter = Prompter::stdio();

    let endpoint = match &options.port {
        Some(path) => endpoint_for_path(path, &list_endpoints().unwrap_or_default()),
        None => {
            let selected =
                resolve_device(&mut prompter, &config, options.assume_yes, list_endpoints)?;
            match selected {
                Some(ep) => ep,
                None => return Ok(()),
            }
        }
    };

    let threshold = match options.threshold {
        Some(t) => t,
        None => prompter.ask_threshold(config.trigger_threshold)?,
    };

    let saved = save_config(&options.config_path, &endpoint, threshold)?;

    monitor_device(&endpoint, saved.trigger_mode(), options)
}

/// Persist the chosen device and threshold
///
/// The record always reflects this session: a device without a serial
/// number replaces any previously remembered one.
fn save_config(
    path: &Path,
    endpoint: &SerialEndpoint,
    threshold: u8,
) -> anyhow::Result<SpikeConfig> {
    if endpoint.serial_number.is_none() {
        warn!(
            "{} reports no serial number; it will not be remembered",
            endpoint.device_path
        );
    }

    let config = SpikeConfig::new(endpoint.serial_number.clone(), threshold);
    config.save(path).context("saving configuration")?;
    println!(
        "{}",
        format!("Configuration saved to {}", path.display()).green()
    );
    Ok(config)
}

/// Open the hub and run the monitoring loop until interrupt or disconnect
fn monitor_device(
    endpoint: &SerialEndpoint,
    mode: TriggerMode,
    options: &SessionOptions,
) -> anyhow::Result<()> {
    println!(
        "{}",
        format!("Connecting to {}...", endpoint.device_path).green().bold()
    );

    let mut link = SerialLink::open(&endpoint.device_path)?;
    println!(
        "{}",
        format!("Successfully connected to {}!", link.path()).green().bold()
    );

    let mut clicker = create_clicker(options.dry_run)?;

    let running = setup_interrupt_handler();
    println!("Press {} to exit.", "CTRL+C".bold());
    std::thread::sleep(protocol::SETTLE_DELAY);

    let mut state = MonitorState::new(mode);
    let panel = if options.headless {
        None
    } else {
        LivePanel::new()
            .map_err(|e| warn!("Live display unavailable, continuing headless: {}", e))
            .ok()
    };
    let summary = match panel {
        Some(mut panel) => {
            let summary = run_monitor(&mut link, &mut state, &mut clicker, &mut panel, &running);
            if let Err(e) = panel.finish() {
                warn!("Failed to close live display: {}", e);
            }
            summary
        }
        None => run_monitor(
            &mut link,
            &mut state,
            &mut clicker,
            &mut HeadlessStatus,
            &running,
        ),
    };

    drop(link);
    report(&summary);
    Ok(())
}

fn create_clicker(dry_run: bool) -> anyhow::Result<Box<dyn Clicker>> {
    if dry_run {
        return Ok(Box::new(LoggingClicker::new()));
    }

    let mut mouse = VirtualMouse::new(DEVICE_NAME)
        .context("creating virtual mouse (is /dev/uinput writable?)")?;
    if let Some(path) = mouse.device_path() {
        info!("Virtual mouse at {}", path.display());
    }
    Ok(Box::new(mouse))
}

/// Set up a Ctrl-C handler that clears the returned flag when triggered
fn setup_interrupt_handler() -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    if let Err(e) = ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    }) {
        warn!("Could not set Ctrl+C handler: {}", e);
    }

    running
}

fn report(summary: &MonitorSummary) {
    match &summary.stop {
        StopReason::Interrupted => println!("{}", "Exiting program.".yellow().bold()),
        StopReason::Disconnected(e) => {
            println!("{}", "Error: Serial device disconnected.".red().bold());
            println!("{}", e.to_string().dim());
        }
    }
    println!(
        "{} clicks from {} sensor readings",
        summary.clicks, summary.readings
    );
}

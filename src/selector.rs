//! Choosing which serial device to monitor

use std::io::{BufRead, Write};

use crossterm::style::Stylize;
use spike_transport::{find_by_serial, SerialEndpoint, TransportError};
use tracing::debug;

use crate::config::SpikeConfig;
use crate::display::print_endpoint_table;
use crate::prompt::Prompter;

/// Resolve the device to use, preferring the saved serial number
///
/// `enumerate` is called once, after the reuse question has been answered,
/// so a hub plugged in while the prompt was waiting is still found.
/// Returns `None` when there is nothing to select.
pub fn resolve_device<R, W, E>(
    prompter: &mut Prompter<R, W>,
    config: &SpikeConfig,
    assume_yes: bool,
    enumerate: E,
) -> anyhow::Result<Option<SerialEndpoint>>
where
    R: BufRead,
    W: Write,
    E: FnOnce() -> Result<Vec<SerialEndpoint>, TransportError>,
{
    let Some(serial) = config.saved_serial() else {
        return select_device(prompter, &enumerate()?);
    };

    let reuse = assume_yes
        || prompter.confirm(&format!(
            "Found saved serial number {}. Use this device?",
            serial.yellow()
        ))?;

    let endpoints = enumerate()?;
    if reuse {
        if let Some(ep) = find_by_serial(&endpoints, serial) {
            writeln!(
                prompter.output(),
                "{}",
                format!("Found saved Spike Prime at: {}", ep.device_path).green()
            )?;
            return Ok(Some(ep.clone()));
        }
        writeln!(
            prompter.output(),
            "{}",
            "Saved device not found. Please select a new one.".red().bold()
        )?;
    }

    select_device(prompter, &endpoints)
}

/// Show the endpoint table and ask for an index
pub fn select_device<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    endpoints: &[SerialEndpoint],
) -> anyhow::Result<Option<SerialEndpoint>> {
    writeln!(
        prompter.output(),
        "{}",
        "Scanning for connected serial devices...".cyan().bold()
    )?;

    if endpoints.is_empty() {
        writeln!(
            prompter.output(),
            "{}",
            "No serial devices found. Please ensure your Spike Prime is connected."
                .red()
                .bold()
        )?;
        return Ok(None);
    }

    print_endpoint_table(prompter.output(), endpoints)?;

    let index = prompter.ask_index(
        "Enter the index number of your LEGO Spike Prime",
        endpoints.len(),
    )?;
    let selected = endpoints[index].clone();
    writeln!(
        prompter.output(),
        "You selected: {} with serial {}",
        selected.device_path.as_str().cyan(),
        selected.serial_display().yellow()
    )?;
    Ok(Some(selected))
}

/// Endpoint for a device path given on the command line
///
/// Uses the enumerated entry when the path is known so its serial number
/// can be saved.
pub fn endpoint_for_path(path: &str, endpoints: &[SerialEndpoint]) -> SerialEndpoint {
    endpoints
        .iter()
        .find(|ep| ep.device_path == path)
        .cloned()
        .unwrap_or_else(|| {
            debug!("{} not in enumeration, using it as given", path);
            SerialEndpoint {
                device_path: path.to_string(),
                serial_number: None,
                description: "Manually specified".to_string(),
            }
        })
}

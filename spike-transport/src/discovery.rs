//! Serial endpoint discovery

use serialport::{SerialPortInfo, SerialPortType};
use tracing::debug;

use crate::error::TransportError;
use crate::types::SerialEndpoint;

/// List every serial port the OS currently exposes
pub fn list_endpoints() -> Result<Vec<SerialEndpoint>, TransportError> {
    let ports = serialport::available_ports().map_err(TransportError::Enumerate)?;
    debug!("Found {} serial ports", ports.len());
    Ok(ports.into_iter().map(endpoint_from_info).collect())
}

/// Find the endpoint reporting the given USB serial number
pub fn find_by_serial<'a>(
    endpoints: &'a [SerialEndpoint],
    serial_number: &str,
) -> Option<&'a SerialEndpoint> {
    endpoints
        .iter()
        .find(|ep| ep.serial_number.as_deref() == Some(serial_number))
}

fn endpoint_from_info(info: SerialPortInfo) -> SerialEndpoint {
    let (serial_number, description) = match &info.port_type {
        SerialPortType::UsbPort(usb) => {
            let description = usb
                .product
                .clone()
                .or_else(|| usb.manufacturer.clone())
                .unwrap_or_else(|| format!("USB {:04x}:{:04x}", usb.vid, usb.pid));
            (usb.serial_number.clone(), description)
        }
        other => (None, port_type_name(other).to_string()),
    };

    SerialEndpoint {
        device_path: info.port_name,
        serial_number,
        description,
    }
}

fn port_type_name(port_type: &SerialPortType) -> &'static str {
    match port_type {
        SerialPortType::UsbPort(_) => "USB",
        SerialPortType::BluetoothPort => "Bluetooth",
        SerialPortType::PciPort => "PCI",
        SerialPortType::Unknown => "Unknown",
    }
}

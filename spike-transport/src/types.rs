//! Common types for the transport layer

/// A serial endpoint found during discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialEndpoint {
    /// Device path (e.g. `/dev/ttyACM0`, `COM3`)
    pub device_path: String,
    /// USB serial number if the port reports one
    pub serial_number: Option<String>,
    /// Human-readable description
    pub description: String,
}

impl SerialEndpoint {
    /// Serial number for display, `N/A` when absent
    pub fn serial_display(&self) -> &str {
        self.serial_number.as_deref().unwrap_or("N/A")
    }
}

/// One decoded force-sensor sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceReading {
    /// Force in newtons (the sensor reports 0-10)
    pub force: f64,
    /// Whether the sensor's touch contact is closed
    pub touched: bool,
}

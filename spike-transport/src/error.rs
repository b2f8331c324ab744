//! Transport error types

use thiserror::Error;

/// Errors that can occur while talking to the hub
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Failed to enumerate serial ports: {0}")]
    Enumerate(#[source] serialport::Error),

    #[error("Could not open serial port '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: serialport::Error,
    },

    #[error("Serial device disconnected: {0}")]
    Disconnected(#[source] std::io::Error),
}

impl TransportError {
    /// Whether this error means the link is gone for good
    pub fn is_disconnect(&self) -> bool {
        matches!(self, Self::Disconnected(_))
    }
}

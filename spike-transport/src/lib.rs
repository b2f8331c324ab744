//! Serial transport for LEGO Spike Prime hubs
//!
//! This crate owns everything between the USB serial device and a typed
//! force reading:
//!
//! - Discovery of serial endpoints (device path, serial number, description)
//! - Opening the link at the hub's fixed line settings
//! - Splitting the raw byte stream into carriage-return delimited lines
//! - Decoding telemetry lines into force-sensor readings

pub mod error;
pub mod framer;
pub mod protocol;
pub mod telemetry;
pub mod types;

mod discovery;
mod link;

pub use discovery::{find_by_serial, list_endpoints};
pub use error::TransportError;
pub use framer::LineFramer;
pub use link::{read_chunk, SerialLink};
pub use telemetry::{decode_force_reading, TelemetryFilter};
pub use types::{ForceReading, SerialEndpoint};

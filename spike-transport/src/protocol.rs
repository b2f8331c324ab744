//! Spike Prime serial protocol constants
//!
//! The hub runs a program that streams JSON telemetry lines of the shape
//! `{"m": <kind>, "p": [[<port>, [<force>, <touched>]], ...]}`, each
//! terminated by a carriage return.

use std::time::Duration;

/// Fixed line speed of the hub's USB serial interface
pub const BAUD_RATE: u32 = 115_200;

/// Read timeout; a timeout yields an empty chunk, not an error
pub const READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Delay after opening the port before the stream is trusted
pub const SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Line delimiter
pub const LINE_DELIMITER: u8 = b'\r';

/// Message kinds (`m` field)
pub mod message {
    /// Periodic sensor update
    pub const SENSOR_UPDATE: i64 = 0;
}

/// Port indices inside a sensor update payload
pub mod port {
    /// Force sensor (port F)
    pub const FORCE_SENSOR: i64 = 63;
}

/// Value of the second reading element when the sensor is touched
pub const TOUCHED: i64 = 1;

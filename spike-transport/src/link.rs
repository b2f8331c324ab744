//! Serial link to the hub

use std::io::{self, Read};

use serialport::SerialPort;
use tracing::{info, trace};

use crate::error::TransportError;
use crate::protocol::{BAUD_RATE, READ_TIMEOUT};

/// An open serial connection to the hub
///
/// The port is closed when the link is dropped.
pub struct SerialLink {
    port: Box<dyn SerialPort>,
    path: String,
}

impl SerialLink {
    /// Open `path` at the hub's line settings
    pub fn open(path: &str) -> Result<Self, TransportError> {
        let port = serialport::new(path, BAUD_RATE)
            .timeout(READ_TIMEOUT)
            .flow_control(serialport::FlowControl::None)
            .open()
            .map_err(|source| TransportError::Open {
                path: path.to_string(),
                source,
            })?;

        info!("Opened {} at {} baud", path, BAUD_RATE);

        Ok(Self {
            port,
            path: path.to_string(),
        })
    }

    /// Device path this link was opened on
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Read for SerialLink {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.port.read(buf)
    }
}

/// Read whatever bytes are available from `reader` into `buf`
///
/// A read timeout yields `Ok(0)`. Any other I/O error means the device is
/// gone and is returned as [`TransportError::Disconnected`].
pub fn read_chunk<R: Read + ?Sized>(
    reader: &mut R,
    buf: &mut [u8],
) -> Result<usize, TransportError> {
    match reader.read(buf) {
        Ok(n) => Ok(n),
        Err(e) if is_transient(&e) => {
            trace!("Serial read timed out");
            Ok(0)
        }
        Err(e) => Err(TransportError::Disconnected(e)),
    }
}

/// Errors that only mean "nothing arrived this time"
fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

//! Sensor monitoring loop
//!
//! One thread, one iteration per serial read:
//! read -> frame -> decode -> edge-detect -> click -> display.
//! A read timeout is an empty chunk; the running flag is checked once per
//! iteration so an interrupt is noticed within one read timeout.

use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};

use spike_transport::{read_chunk, ForceReading, LineFramer, TelemetryFilter, TransportError};
use tracing::{debug, info};

use crate::clicker::Clicker;
use crate::display::StatusDisplay;
use crate::edge::{Edge, EdgeDetector, TriggerMode};

/// Bytes requested per serial read
const READ_CHUNK: usize = 256;

/// Why monitoring stopped
#[derive(Debug)]
pub enum StopReason {
    /// The running flag was cleared (Ctrl+C)
    Interrupted,
    /// The serial link failed
    Disconnected(TransportError),
}

/// What happened during a monitoring session
#[derive(Debug)]
pub struct MonitorSummary {
    pub stop: StopReason,
    /// Complete lines framed
    pub lines: u64,
    /// Lines that decoded to a force reading
    pub readings: u64,
    /// Clicks fired
    pub clicks: u64,
}

/// Mutable state owned by the loop
#[derive(Debug, Clone)]
pub struct MonitorState {
    framer: LineFramer,
    filter: TelemetryFilter,
    detector: EdgeDetector,
}

impl MonitorState {
    pub fn new(mode: TriggerMode) -> Self {
        Self::with_filter(mode, TelemetryFilter::default())
    }

    pub fn with_filter(mode: TriggerMode, filter: TelemetryFilter) -> Self {
        Self {
            framer: LineFramer::new(),
            filter,
            detector: EdgeDetector::new(mode),
        }
    }

    pub fn mode(&self) -> TriggerMode {
        self.detector.mode()
    }

    pub fn is_pressed(&self) -> bool {
        self.detector.is_pressed()
    }

    /// Frame and decode a chunk
    ///
    /// Every reading is run through the edge detector in arrival order.
    pub fn process_chunk(&mut self, chunk: &[u8]) -> ChunkOutcome {
        let lines = self.framer.feed(chunk);
        let readings = lines
            .iter()
            .filter_map(|line| self.filter.decode(line))
            .map(|reading| {
                let edge = self.detector.update(&reading);
                (reading, edge)
            })
            .collect();
        ChunkOutcome {
            lines: lines.len(),
            readings,
        }
    }
}

/// Result of processing one chunk
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkOutcome {
    /// Complete non-empty lines framed
    pub lines: usize,
    /// Decoded readings and the edge each one caused
    pub readings: Vec<(ForceReading, Option<Edge>)>,
}

/// Run until `running` is cleared or the reader fails
pub fn run_monitor<R, C, D>(
    reader: &mut R,
    state: &mut MonitorState,
    clicker: &mut C,
    display: &mut D,
    running: &AtomicBool,
) -> MonitorSummary
where
    R: Read + ?Sized,
    C: Clicker + ?Sized,
    D: StatusDisplay + ?Sized,
{
    let mut buf = [0u8; READ_CHUNK];
    let mut summary = MonitorSummary {
        stop: StopReason::Interrupted,
        lines: 0,
        readings: 0,
        clicks: 0,
    };

    info!("Monitoring force sensor ({})", state.mode());

    while running.load(Ordering::SeqCst) {
        let n = match read_chunk(reader, &mut buf) {
            Ok(n) => n,
            Err(e) => {
                summary.stop = StopReason::Disconnected(e);
                break;
            }
        };

        let outcome = state.process_chunk(&buf[..n]);
        summary.lines += outcome.lines as u64;
        summary.readings += outcome.readings.len() as u64;

        for (reading, edge) in &outcome.readings {
            if *edge == Some(Edge::Pressed) {
                match clicker.click() {
                    Ok(()) => {
                        summary.clicks += 1;
                        if let Err(e) = display.clicked(state.mode()) {
                            debug!("Display error: {}", e);
                        }
                    }
                    Err(e) => {
                        if let Err(e) = display.notice(&format!("Click failed: {}", e)) {
                            debug!("Display error: {}", e);
                        }
                    }
                }
            }

            if let Err(e) = display.update(reading) {
                debug!("Display error: {}", e);
            }
        }
    }

    info!(
        "Monitoring stopped: {} lines, {} readings, {} clicks",
        summary.lines, summary.readings, summary.clicks
    );
    summary
}

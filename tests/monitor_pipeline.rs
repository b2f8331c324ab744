//! Integration tests for the monitoring pipeline.
//!
//! These drive `run_monitor` with scripted serial input, exercising the
//! boundary between framing, telemetry decoding, edge detection and the
//! click/display sinks.

use std::collections::VecDeque;
use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use spike_clicker::clicker::{ClickError, Clicker};
use spike_clicker::display::StatusDisplay;
use spike_clicker::edge::TriggerMode;
use spike_clicker::monitor::{run_monitor, MonitorState, StopReason};
use spike_transport::ForceReading;

/// Serial stand-in: yields scripted results, then reports the device gone
struct ScriptedSerial {
    script: VecDeque<io::Result<Vec<u8>>>,
    /// Cleared when the script runs out, instead of failing
    stop_at_end: Option<Arc<AtomicBool>>,
}

impl ScriptedSerial {
    fn new(chunks: Vec<io::Result<Vec<u8>>>) -> Self {
        Self {
            script: chunks.into(),
            stop_at_end: None,
        }
    }

    fn interrupt_at_end(mut self, running: Arc<AtomicBool>) -> Self {
        self.stop_at_end = Some(running);
        self
    }
}

impl Read for ScriptedSerial {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.script.pop_front() {
            Some(Ok(bytes)) => {
                assert!(bytes.len() <= buf.len(), "chunk larger than read buffer");
                buf[..bytes.len()].copy_from_slice(&bytes);
                Ok(bytes.len())
            }
            Some(Err(e)) => Err(e),
            None => match &self.stop_at_end {
                Some(running) => {
                    running.store(false, Ordering::SeqCst);
                    Err(io::Error::from(io::ErrorKind::TimedOut))
                }
                None => Err(io::Error::new(io::ErrorKind::BrokenPipe, "unplugged")),
            },
        }
    }
}

#[derive(Default)]
struct RecordingClicker {
    clicks: usize,
    fail_next: bool,
}

impl Clicker for RecordingClicker {
    fn click(&mut self) -> Result<(), ClickError> {
        if std::mem::take(&mut self.fail_next) {
            return Err(ClickError::EmitEvent(io::Error::from(
                io::ErrorKind::PermissionDenied,
            )));
        }
        self.clicks += 1;
        Ok(())
    }
}

#[derive(Default)]
struct RecordingDisplay {
    readings: Vec<ForceReading>,
    clicks: Vec<TriggerMode>,
    notices: Vec<String>,
}

impl StatusDisplay for RecordingDisplay {
    fn update(&mut self, reading: &ForceReading) -> io::Result<()> {
        self.readings.push(*reading);
        Ok(())
    }

    fn clicked(&mut self, mode: TriggerMode) -> io::Result<()> {
        self.clicks.push(mode);
        Ok(())
    }

    fn notice(&mut self, message: &str) -> io::Result<()> {
        self.notices.push(message.to_string());
        Ok(())
    }
}

fn force_line(force: f64, touched: bool) -> Vec<u8> {
    format!(
        "{{\"m\":0,\"p\":[[63,[{},{}]]]}}\r",
        force,
        if touched { 1 } else { 0 }
    )
    .into_bytes()
}

fn run(
    mode: TriggerMode,
    chunks: Vec<io::Result<Vec<u8>>>,
) -> (
    spike_clicker::monitor::MonitorSummary,
    RecordingClicker,
    RecordingDisplay,
) {
    let running = AtomicBool::new(true);
    let mut serial = ScriptedSerial::new(chunks);
    let mut state = MonitorState::new(mode);
    let mut clicker = RecordingClicker::default();
    let mut display = RecordingDisplay::default();
    let summary = run_monitor(&mut serial, &mut state, &mut clicker, &mut display, &running);
    (summary, clicker, display)
}

// ── Edge detection through the full pipeline ──

#[test]
fn instant_mode_clicks_on_each_touch() {
    let chunks = [false, true, true, false, true]
        .into_iter()
        .map(|t| Ok(force_line(0.0, t)))
        .collect();
    let (summary, clicker, display) = run(TriggerMode::Instant, chunks);

    assert_eq!(clicker.clicks, 2);
    assert_eq!(summary.clicks, 2);
    assert_eq!(summary.readings, 5);
    assert_eq!(display.readings.len(), 5);
    assert_eq!(display.clicks, vec![TriggerMode::Instant; 2]);
}

#[test]
fn threshold_mode_inclusive_boundary() {
    let chunks = [3.0, 5.0, 6.0, 4.0, 5.0]
        .into_iter()
        .map(|f| Ok(force_line(f, false)))
        .collect();
    let (summary, clicker, _) = run(TriggerMode::Threshold(5), chunks);

    assert_eq!(clicker.clicks, 2);
    assert_eq!(summary.clicks, 2);
}

#[test]
fn holding_press_clicks_once() {
    let chunks = (0..50).map(|_| Ok(force_line(9.5, true))).collect();
    let (summary, clicker, display) = run(TriggerMode::Threshold(3), chunks);

    assert_eq!(clicker.clicks, 1);
    assert_eq!(summary.readings, 50);
    assert_eq!(display.readings.len(), 50);
}

// ── Framing across reads ──

#[test]
fn lines_split_across_reads() {
    let mut stream = Vec::new();
    for (f, t) in [(0.0, false), (7.0, true), (0.5, false), (8.0, true)] {
        stream.extend(force_line(f, t));
    }
    // Feed in awkward 7-byte pieces
    let chunks = stream.chunks(7).map(|c| Ok(c.to_vec())).collect();
    let (summary, clicker, display) = run(TriggerMode::Threshold(6), chunks);

    assert_eq!(summary.lines, 4);
    assert_eq!(summary.readings, 4);
    assert_eq!(clicker.clicks, 2);
    let forces: Vec<f64> = display.readings.iter().map(|r| r.force).collect();
    assert_eq!(forces, vec![0.0, 7.0, 0.5, 8.0]);
}

#[test]
fn several_lines_in_one_read() {
    let mut chunk = Vec::new();
    chunk.extend(force_line(0.0, true));
    chunk.extend(b"\r\r");
    chunk.extend(force_line(0.0, false));
    chunk.extend(force_line(0.0, true));
    let (summary, clicker, _) = run(TriggerMode::Instant, vec![Ok(chunk)]);

    assert_eq!(summary.lines, 3);
    assert_eq!(clicker.clicks, 2);
}

// ── Noise and transport failures ──

#[test]
fn noise_does_not_disturb_state() {
    let chunks = vec![
        Ok(force_line(6.0, true)),
        Ok(b"\xff\xfe garbage\r".to_vec()),
        Ok(b"{\"m\":0,\"p\":[[63,[\"oops\"]]]}\r".to_vec()),
        Ok(b"{\"m\":3,\"p\":[[63,[0,0]]]}\r".to_vec()),
        Ok(b"{\"m\":0,\"p\":[[12,[0,0]]]}\r".to_vec()),
        Ok(force_line(6.0, true)),
    ];
    let (summary, clicker, _) = run(TriggerMode::Threshold(5), chunks);

    // Still pressed across the noise: one click only
    assert_eq!(clicker.clicks, 1);
    assert_eq!(summary.lines, 6);
    assert_eq!(summary.readings, 2);
}

#[test]
fn timeouts_are_empty_reads() {
    let chunks = vec![
        Err(io::Error::from(io::ErrorKind::TimedOut)),
        Ok(b"{\"m\":0,\"p\":".to_vec()),
        Err(io::Error::from(io::ErrorKind::TimedOut)),
        Ok(Vec::new()),
        Ok(b"[[63,[0,1]]]}\r".to_vec()),
    ];
    let (summary, clicker, _) = run(TriggerMode::Instant, chunks);

    assert_eq!(clicker.clicks, 1);
    assert!(matches!(summary.stop, StopReason::Disconnected(_)));
}

#[test]
fn disconnect_ends_monitoring() {
    let chunks = vec![
        Ok(force_line(0.0, true)),
        Err(io::Error::new(io::ErrorKind::Other, "Input/output error")),
        Ok(force_line(0.0, false)),
        Ok(force_line(0.0, true)),
    ];
    let (summary, clicker, _) = run(TriggerMode::Instant, chunks);

    assert_eq!(clicker.clicks, 1);
    assert_eq!(summary.readings, 1);
    match summary.stop {
        StopReason::Disconnected(e) => assert!(e.is_disconnect()),
        other => panic!("expected disconnect, got {:?}", other),
    }
}

#[test]
fn failed_click_keeps_running() {
    let running = AtomicBool::new(true);
    let mut serial = ScriptedSerial::new(vec![
        Ok(force_line(0.0, true)),
        Ok(force_line(0.0, false)),
        Ok(force_line(0.0, true)),
    ]);
    let mut state = MonitorState::new(TriggerMode::Instant);
    let mut clicker = RecordingClicker {
        clicks: 0,
        fail_next: true,
    };
    let mut display = RecordingDisplay::default();

    let summary = run_monitor(&mut serial, &mut state, &mut clicker, &mut display, &running);

    // First press fails to inject, second one lands
    assert_eq!(clicker.clicks, 1);
    assert_eq!(summary.clicks, 1);
    assert_eq!(display.clicks.len(), 1);
    assert_eq!(summary.readings, 3);
    // The failure goes to the display, not straight to the log
    assert_eq!(display.notices.len(), 1);
    assert!(display.notices[0].starts_with("Click failed"));
}

// ── Interrupt ──

#[test]
fn interrupt_stops_cleanly() {
    let running = Arc::new(AtomicBool::new(true));
    let mut serial = ScriptedSerial::new(vec![Ok(force_line(0.0, true))])
        .interrupt_at_end(Arc::clone(&running));
    let mut state = MonitorState::new(TriggerMode::Instant);
    let mut clicker = RecordingClicker::default();
    let mut display = RecordingDisplay::default();

    let summary = run_monitor(&mut serial, &mut state, &mut clicker, &mut display, &running);

    assert!(matches!(summary.stop, StopReason::Interrupted));
    assert_eq!(clicker.clicks, 1);
    assert!(state.is_pressed());
}

#[test]
fn already_interrupted_reads_nothing() {
    let running = AtomicBool::new(false);
    let mut serial = ScriptedSerial::new(vec![Ok(force_line(0.0, true))]);
    let mut state = MonitorState::new(TriggerMode::Instant);
    let mut clicker = RecordingClicker::default();
    let mut display = RecordingDisplay::default();

    let summary = run_monitor(&mut serial, &mut state, &mut clicker, &mut display, &running);

    assert!(matches!(summary.stop, StopReason::Interrupted));
    assert_eq!(summary.lines, 0);
    assert_eq!(serial.script.len(), 1);
}

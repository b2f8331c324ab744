//! LEGO Spike Prime force-sensor mouse button
//!
//! Reads force-sensor telemetry from a Spike Prime hub over USB serial and
//! injects a left click each time the sensor is pressed.

pub mod clicker;
pub mod config;
pub mod display;
pub mod edge;
pub mod monitor;
pub mod prompt;
pub mod selector;
pub mod session;

pub use clicker::{ClickError, Clicker, LoggingClicker, VirtualMouse};
pub use config::SpikeConfig;
pub use display::{HeadlessStatus, LivePanel, StatusDisplay};
pub use edge::{Edge, EdgeDetector, TriggerMode};
pub use monitor::{run_monitor, ChunkOutcome, MonitorState, MonitorSummary, StopReason};
pub use session::SessionOptions;

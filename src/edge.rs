//! Press/release edge detection over force readings
//!
//! Only the released-to-pressed transition produces a click. Holding the
//! sensor past the threshold keeps the detector pressed without further
//! clicks until a release is seen.

use spike_transport::ForceReading;
use std::fmt;

/// Threshold value that selects instant-touch mode
pub const INSTANT_THRESHOLD: u8 = 1;

/// How a reading is judged pressed or released
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerMode {
    /// Follow the sensor's touch contact, ignoring force
    Instant,
    /// Pressed while force >= threshold (newtons)
    Threshold(u8),
}

impl TriggerMode {
    /// Map a configured threshold to a mode (1 means instant)
    pub fn from_threshold(threshold: u8) -> Self {
        if threshold == INSTANT_THRESHOLD {
            TriggerMode::Instant
        } else {
            TriggerMode::Threshold(threshold)
        }
    }

    /// Whether a reading counts as pressed under this mode
    ///
    /// No hysteresis: a force sitting exactly at the threshold is pressed.
    pub fn is_pressed(&self, reading: &ForceReading) -> bool {
        match self {
            TriggerMode::Instant => reading.touched,
            TriggerMode::Threshold(threshold) => reading.force >= f64::from(*threshold),
        }
    }
}

impl fmt::Display for TriggerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerMode::Instant => write!(f, "Instant Press"),
            TriggerMode::Threshold(t) => write!(f, "Threshold: {}N", t),
        }
    }
}

/// A state change reported by the detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Released -> pressed; fire a click
    Pressed,
    /// Pressed -> released
    Released,
}

/// Two-state press detector
#[derive(Debug, Clone)]
pub struct EdgeDetector {
    mode: TriggerMode,
    is_pressed: bool,
}

impl EdgeDetector {
    /// Create a detector in the released state
    pub fn new(mode: TriggerMode) -> Self {
        Self {
            mode,
            is_pressed: false,
        }
    }

    /// Feed one reading; returns the transition it caused, if any
    pub fn update(&mut self, reading: &ForceReading) -> Option<Edge> {
        let pressed = self.mode.is_pressed(reading);
        match (self.is_pressed, pressed) {
            (false, true) => {
                self.is_pressed = true;
                Some(Edge::Pressed)
            }
            (true, false) => {
                self.is_pressed = false;
                Some(Edge::Released)
            }
            _ => None,
        }
    }

    /// Current state
    pub fn is_pressed(&self) -> bool {
        self.is_pressed
    }

    /// Active trigger mode
    pub fn mode(&self) -> TriggerMode {
        self.mode
    }
}

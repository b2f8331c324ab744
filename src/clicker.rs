//! Synthetic pointer clicks
//!
//! `VirtualMouse` creates a uinput pointer device and clicks its left
//! button. No motion events are sent, so the click lands wherever the cursor
//! already is.

use evdev::{
    uinput::{VirtualDevice, VirtualDeviceBuilder},
    AttributeSet, EventType, InputEvent, Key, RelativeAxisType,
};
use thiserror::Error;
use tracing::info;

/// Name shown in `evtest` and desktop input settings
pub const DEVICE_NAME: &str = "Spike Prime Force Clicker";

/// Errors from click injection
#[derive(Debug, Error)]
pub enum ClickError {
    #[error("Failed to create virtual mouse: {0}")]
    CreateDevice(#[source] std::io::Error),
    #[error("Failed to emit click: {0}")]
    EmitEvent(#[source] std::io::Error),
}

/// Something that can perform a left click
pub trait Clicker {
    /// Press and release the left button once
    fn click(&mut self) -> Result<(), ClickError>;
}

/// Virtual mouse backed by uinput
pub struct VirtualMouse {
    device: VirtualDevice,
}

impl VirtualMouse {
    /// Create the virtual device
    ///
    /// Requires write access to `/dev/uinput`.
    pub fn new(name: &str) -> Result<Self, ClickError> {
        let mut keys = AttributeSet::<Key>::new();
        keys.insert(Key::BTN_LEFT);
        keys.insert(Key::BTN_RIGHT);

        // Relative axes make desktops classify the device as a mouse
        let mut axes = AttributeSet::<RelativeAxisType>::new();
        axes.insert(RelativeAxisType::REL_X);
        axes.insert(RelativeAxisType::REL_Y);

        let device = VirtualDeviceBuilder::new()
            .map_err(ClickError::CreateDevice)?
            .name(name)
            .with_keys(&keys)
            .map_err(ClickError::CreateDevice)?
            .with_relative_axes(&axes)
            .map_err(ClickError::CreateDevice)?
            .build()
            .map_err(ClickError::CreateDevice)?;

        Ok(Self { device })
    }

    /// Get the device path (e.g., /dev/input/eventX)
    pub fn device_path(&mut self) -> Option<std::path::PathBuf> {
        self.device
            .enumerate_dev_nodes_blocking()
            .ok()?
            .next()?
            .ok()
    }
}

impl Clicker for VirtualMouse {
    fn click(&mut self) -> Result<(), ClickError> {
        // Separate reports so the press and release are two input frames
        for value in [1, 0] {
            let event = InputEvent::new(EventType::KEY, Key::BTN_LEFT.code(), value);
            self.device
                .emit(&[event])
                .map_err(ClickError::EmitEvent)?;
        }
        Ok(())
    }
}

/// Clicker that only logs, for running without uinput access
#[derive(Debug, Default)]
pub struct LoggingClicker {
    clicks: u64,
}

impl LoggingClicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clicks that would have been injected
    pub fn clicks(&self) -> u64 {
        self.clicks
    }
}

impl Clicker for LoggingClicker {
    fn click(&mut self) -> Result<(), ClickError> {
        self.clicks += 1;
        info!("Dry run: click #{} not injected", self.clicks);
        Ok(())
    }
}

impl<C: Clicker + ?Sized> Clicker for Box<C> {
    fn click(&mut self) -> Result<(), ClickError> {
        (**self).click()
    }
}

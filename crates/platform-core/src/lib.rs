//! HandMouse platform core contracts.
//!
//! This crate contains cross-platform display data structures used by the
//! tracking and dispatch crates without coupling to a concrete OS backend.

use serde::{Deserialize, Serialize};

/// Screen size used when monitor detection fails.
pub const FALLBACK_SCREEN: (u32, u32) = (1920, 1080);

/// Information about a connected monitor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonitorInfo {
    /// Monitor name/identifier.
    pub name: String,
    /// Resolution in physical pixels.
    pub width: u32,
    pub height: u32,
    /// Position in the virtual desktop (pixels).
    pub x: i32,
    pub y: i32,
    /// Scale factor (for example 1.0, 1.25, 2.0).
    pub scale_factor: f64,
    /// Refresh rate in Hz.
    pub refresh_rate_hz: u32,
    /// Whether this monitor is primary.
    pub primary: bool,
}

impl MonitorInfo {
    /// Logical resolution (physical / scale).
    pub fn logical_width(&self) -> u32 {
        (self.width as f64 / self.scale_factor) as u32
    }

    /// Logical resolution (physical / scale).
    pub fn logical_height(&self) -> u32 {
        (self.height as f64 / self.scale_factor) as u32
    }

    /// A primary monitor at the origin with the fallback resolution.
    pub fn fallback() -> Self {
        Self {
            name: "default".to_string(),
            width: FALLBACK_SCREEN.0,
            height: FALLBACK_SCREEN.1,
            x: 0,
            y: 0,
            scale_factor: 1.0,
            refresh_rate_hz: 60,
            primary: true,
        }
    }
}

/// Display server / platform family used for input injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DisplayServer {
    Wayland,
    X11,
    #[default]
    Unknown,
}

/// Pick the monitor the cursor is mapped onto: the primary one, else the first.
pub fn primary_monitor(monitors: &[MonitorInfo]) -> Option<&MonitorInfo> {
    monitors
        .iter()
        .find(|m| m.primary)
        .or_else(|| monitors.first())
}

//! HandMouse Linux Platform Integration
//!
//! Platform-specific implementations for Linux:
//! - **Display Detection:** Monitor enumeration via `xrandr` and display server detection
//! - **Permissions:** Capability detection and user guidance

pub mod display;
pub mod permissions;

pub use display::*;

//! Clock and timing utilities for the tracking loop.
//!
//! Frame timestamps are anchored to a monotonic epoch captured when the
//! loop starts. This module provides utilities for:
//! - Capturing the epoch
//! - Converting between nanoseconds and seconds
//! - Throttling periodic work (statistics logging) to a fixed rate

use std::time::Instant;

/// A monotonic clock anchored to the moment the tracking loop started.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// The instant tracking started.
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339 string).
    epoch_wall: String,
}

impl FrameClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Get nanoseconds elapsed since the epoch.
    pub fn elapsed_ns(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }

    /// Get seconds elapsed since the epoch.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Wall-clock time at the epoch.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// Convert an elapsed nanosecond value to seconds.
    pub fn ns_to_secs(ns: u64) -> f64 {
        ns as f64 / 1_000_000_000.0
    }

    /// Convert seconds to nanoseconds.
    pub fn secs_to_ns(secs: f64) -> u64 {
        (secs * 1_000_000_000.0) as u64
    }

    /// Average frames per second over `elapsed_ns`.
    pub fn fps(frames: u64, elapsed_ns: u64) -> f64 {
        if elapsed_ns == 0 {
            return 0.0;
        }
        frames as f64 / Self::ns_to_secs(elapsed_ns)
    }
}

/// Rate controller for periodic work inside the frame loop.
#[derive(Debug)]
pub struct RateController {
    target_interval_ns: u64,
    last_tick_ns: Option<u64>,
}

impl RateController {
    /// Create a controller targeting the given Hz rate.
    pub fn new(target_hz: u32) -> Self {
        Self {
            target_interval_ns: 1_000_000_000 / target_hz.max(1) as u64,
            last_tick_ns: None,
        }
    }

    /// Check if enough time has passed for the next tick.
    /// Returns true and updates internal state if ready.
    /// The first call always returns true.
    pub fn should_tick(&mut self, current_ns: u64) -> bool {
        match self.last_tick_ns {
            None => {
                self.last_tick_ns = Some(current_ns);
                true
            }
            Some(last) if current_ns >= last + self.target_interval_ns => {
                self.last_tick_ns = Some(current_ns);
                true
            }
            _ => false,
        }
    }

    /// Target interval in nanoseconds.
    pub fn interval_ns(&self) -> u64 {
        self.target_interval_ns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_elapsed() {
        let clock = FrameClock::start();
        assert!(clock.elapsed_ns() < 1_000_000_000);
        assert!(!clock.epoch_wall().is_empty());
    }

    #[test]
    fn test_ns_to_secs_conversion() {
        assert!((FrameClock::ns_to_secs(1_500_000_000) - 1.5).abs() < 1e-9);
        assert_eq!(FrameClock::secs_to_ns(2.0), 2_000_000_000);
    }

    #[test]
    fn test_fps() {
        assert!((FrameClock::fps(60, 2_000_000_000) - 30.0).abs() < 1e-9);
        assert_eq!(FrameClock::fps(10, 0), 0.0);
    }

    #[test]
    fn test_rate_controller() {
        let mut ctrl = RateController::new(1);
        assert!(ctrl.should_tick(0)); // first tick always fires
        assert!(!ctrl.should_tick(500_000_000));
        assert!(ctrl.should_tick(1_000_000_000));
        assert_eq!(ctrl.interval_ns(), 1_000_000_000);
    }

    #[test]
    fn test_rate_controller_zero_hz_does_not_divide_by_zero() {
        let ctrl = RateController::new(0);
        assert_eq!(ctrl.interval_ns(), 1_000_000_000);
    }
}

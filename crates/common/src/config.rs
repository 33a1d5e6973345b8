//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::HandmouseResult;

/// Global application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Camera capture settings.
    pub camera: CameraConfig,

    /// Landmark detector process settings.
    pub detector: DetectorConfig,

    /// Gesture classification settings.
    pub gesture: GestureConfig,

    /// Cursor mapping settings.
    pub cursor: CursorConfig,

    /// Debug overlay settings.
    pub overlay: OverlayConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Camera capture parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Video device index (`/dev/video{index}`).
    pub device_index: u32,

    /// Requested frame width in pixels.
    pub width: u32,

    /// Requested frame height in pixels.
    pub height: u32,

    /// Flip frames horizontally before detection.
    pub mirror: bool,
}

/// External landmark detector process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Executable to spawn (e.g. a python interpreter).
    pub command: String,

    /// Arguments passed to the executable.
    pub args: Vec<String>,

    /// Hands reported below this score are ignored.
    pub min_confidence: f32,
}

/// Gesture thresholds and hand selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Threshold mode: "pixel" or "hand_scaled".
    pub threshold_mode: String,

    /// Thumb-index distance below which a left click fires (pixels).
    pub pinch_px: f64,

    /// Thumb-index distance above which a right click may fire (pixels).
    pub spread_px: f64,

    /// Index-middle distance below which a right click fires (pixels).
    pub touch_px: f64,

    /// Pinch threshold as a fraction of hand span.
    pub pinch_ratio: f64,

    /// Spread threshold as a fraction of hand span.
    pub spread_ratio: f64,

    /// Touch threshold as a fraction of hand span.
    pub touch_ratio: f64,

    /// Wheel clicks issued per scroll action.
    pub scroll_amount: u32,

    /// Which detected hands drive the cursor: "first", "most_confident" or "all".
    pub hand_policy: String,
}

/// Cursor mapping parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    /// EMA smoothing strength in [0.0, 1.0]; 0 disables smoothing.
    pub smoothing: f64,

    /// Clamp mapped positions to the screen.
    pub clamp: bool,

    /// Override the detected screen width.
    pub screen_width: Option<u32>,

    /// Override the detected screen height.
    pub screen_height: Option<u32>,
}

/// Debug overlay parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Directory for annotated PNG snapshots. Disabled when unset.
    pub snapshot_dir: Option<PathBuf>,

    /// Write one snapshot every N frames.
    pub snapshot_every: u32,

    /// Key code that terminates the loop (27 = Esc).
    pub exit_key: u8,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "handmouse_tracking=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device_index: 0,
            width: 640,
            height: 480,
            mirror: true,
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            command: "python3".to_string(),
            args: vec!["hand_detect.py".to_string()],
            min_confidence: 0.5,
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            threshold_mode: "pixel".to_string(),
            pinch_px: 50.0,
            spread_px: 150.0,
            touch_px: 50.0,
            pinch_ratio: 0.25,
            spread_ratio: 0.75,
            touch_ratio: 0.25,
            scroll_amount: 10,
            hand_policy: "first".to_string(),
        }
    }
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.0,
            clamp: false,
            screen_width: None,
            screen_height: None,
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: None,
            snapshot_every: 30,
            exit_key: 27,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> HandmouseResult<PathBuf> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, config_path: &Path) -> HandmouseResult<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, json)?;
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("handmouse").join("config.json")
}

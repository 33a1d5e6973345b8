//! HandMouse CLI: control the mouse pointer with hand gestures.
//!
//! Usage:
//!   handmouse run [OPTIONS]          Track the webcam and drive the pointer
//!   handmouse replay <PATH>          Replay a landmark recording
//!   handmouse classify <POINTS>...   Classify five fingertip points
//!   handmouse check                  Check system capabilities
//!   handmouse init-config            Write the default configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use handmouse_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "handmouse",
    about = "Hands-free pointer control from a webcam",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// Configuration file (defaults to $XDG_CONFIG_HOME/handmouse/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Gesture and cursor options shared by `run` and `replay`.
#[derive(Args, Debug, Clone, Default)]
pub struct TuningArgs {
    /// Threshold mode: pixel|hand_scaled
    #[arg(long)]
    threshold_mode: Option<String>,

    /// Hands that drive the pointer: first|most_confident|all
    #[arg(long)]
    hand_policy: Option<String>,

    /// Cursor smoothing strength [0.0, 1.0]
    #[arg(long)]
    smoothing: Option<f64>,

    /// Keep the cursor on screen
    #[arg(long)]
    clamp: bool,

    /// Wheel clicks per scroll gesture
    #[arg(long)]
    scroll_amount: Option<u32>,

    /// Screen size override, e.g. 2560x1440
    #[arg(long, value_parser = commands::parse_size)]
    screen: Option<(u32, u32)>,

    /// Print actions instead of injecting them
    #[arg(long)]
    dry_run: bool,

    /// Write dispatched commands to a JSONL file (implies --dry-run)
    #[arg(long)]
    action_log: Option<PathBuf>,
}

impl TuningArgs {
    /// Apply command-line overrides on top of the loaded config.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(ref mode) = self.threshold_mode {
            config.gesture.threshold_mode = mode.clone();
        }
        if let Some(ref policy) = self.hand_policy {
            config.gesture.hand_policy = policy.clone();
        }
        if let Some(smoothing) = self.smoothing {
            config.cursor.smoothing = smoothing;
        }
        if self.clamp {
            config.cursor.clamp = true;
        }
        if let Some(amount) = self.scroll_amount {
            config.gesture.scroll_amount = amount;
        }
        if let Some((width, height)) = self.screen {
            config.cursor.screen_width = Some(width);
            config.cursor.screen_height = Some(height);
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Track hands from the webcam and drive the pointer
    Run {
        /// Camera device index (/dev/videoN)
        #[arg(long)]
        camera: Option<u32>,

        /// Capture width
        #[arg(long)]
        width: Option<u32>,

        /// Capture height
        #[arg(long)]
        height: Option<u32>,

        /// Do not mirror frames horizontally
        #[arg(long)]
        no_mirror: bool,

        /// Detector executable
        #[arg(long)]
        detector: Option<String>,

        /// Detector argument (repeatable; replaces configured arguments)
        #[arg(long = "detector-arg")]
        detector_args: Vec<String>,

        /// Record detected landmarks to a JSONL file
        #[arg(long)]
        record: Option<PathBuf>,

        /// Write annotated PNG snapshots to this directory
        #[arg(long)]
        snapshot_dir: Option<PathBuf>,

        /// Snapshot every N frames
        #[arg(long)]
        snapshot_every: Option<u32>,

        /// Do not read the exit key from the terminal
        #[arg(long)]
        no_keys: bool,

        #[command(flatten)]
        tuning: TuningArgs,
    },

    /// Feed a landmark recording through the tracking loop
    Replay {
        /// Path to a landmarks.jsonl recording
        path: PathBuf,

        /// Pace frames by their recorded timestamps
        #[arg(long)]
        realtime: bool,

        #[command(flatten)]
        tuning: TuningArgs,
    },

    /// Classify five fingertip points (thumb, index, middle, ring, pinky)
    Classify {
        /// Pixel points as x,y
        #[arg(value_parser = commands::parse_point, num_args = 5, required = true)]
        points: Vec<(f64, f64)>,

        /// Hand span in pixels (used in hand_scaled mode)
        #[arg(long)]
        hand_span: Option<f64>,

        /// Threshold mode: pixel|hand_scaled
        #[arg(long)]
        threshold_mode: Option<String>,

        /// Print the decision as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check system capabilities
    Check,

    /// Write the default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(handmouse_common::config::config_file_path);
    let mut config = AppConfig::load_from(&config_path);

    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    if cli.json_logs {
        config.logging.json = true;
    }
    handmouse_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Run {
            camera,
            width,
            height,
            no_mirror,
            detector,
            detector_args,
            record,
            snapshot_dir,
            snapshot_every,
            no_keys,
            tuning,
        } => {
            if let Some(index) = camera {
                config.camera.device_index = index;
            }
            if let Some(width) = width {
                config.camera.width = width;
            }
            if let Some(height) = height {
                config.camera.height = height;
            }
            if no_mirror {
                config.camera.mirror = false;
            }
            if let Some(command) = detector {
                config.detector.command = command;
            }
            if !detector_args.is_empty() {
                config.detector.args = detector_args;
            }
            if snapshot_dir.is_some() {
                config.overlay.snapshot_dir = snapshot_dir;
            }
            if let Some(every) = snapshot_every {
                config.overlay.snapshot_every = every;
            }
            tuning.apply(&mut config);
            commands::run::run(config, tuning, record, !no_keys).await
        }
        Commands::Replay {
            path,
            realtime,
            tuning,
        } => {
            tuning.apply(&mut config);
            commands::replay::run(config, tuning, path, realtime).await
        }
        Commands::Classify {
            points,
            hand_span,
            threshold_mode,
            json,
        } => {
            if let Some(mode) = threshold_mode {
                config.gesture.threshold_mode = mode;
            }
            commands::classify::run(&config, &points, hand_span, json)
        }
        Commands::Check => commands::check::run(&config),
        Commands::InitConfig { force } => commands::init::run(&config_path, force),
    }
}

//! Track the webcam and drive the pointer.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Context;

use handmouse_common::clock::FrameClock;
use handmouse_common::config::AppConfig;
use handmouse_tracking::{
    classifier_from_config, mapper_from_config, FfmpegCamera, FrameLoop, KeyboardOverlay,
    LandmarkRecorder, LoopSettings, NullOverlay, Overlay, SnapshotOverlay, SubprocessDetector,
    TerminalKeys,
};

use crate::TuningArgs;

pub async fn run(
    config: AppConfig,
    tuning: TuningArgs,
    record: Option<PathBuf>,
    keys: bool,
) -> anyhow::Result<()> {
    let screen = super::resolve_screen(&config.cursor);
    let classifier = classifier_from_config(&config.gesture)?;
    let settings = LoopSettings::from_config(&config.gesture, &config.overlay)?;

    println!("Starting hand tracking");
    println!(
        "  Camera: /dev/video{} ({}x{}{})",
        config.camera.device_index,
        config.camera.width,
        config.camera.height,
        if config.camera.mirror { ", mirrored" } else { "" }
    );
    println!(
        "  Detector: {} {}",
        config.detector.command,
        config.detector.args.join(" ")
    );
    println!("  Screen: {}x{}", screen.0, screen.1);
    println!("  Thresholds: {:?}", classifier.mode());
    println!("  Hand policy: {:?}", settings.policy);
    println!();

    let camera = FfmpegCamera::open(&config.camera).context("Failed to open camera")?;
    let detector =
        SubprocessDetector::spawn(&config.detector).context("Failed to start detector")?;
    let dispatcher = super::build_dispatcher(
        tuning.dry_run || tuning.action_log.is_some(),
        tuning.action_log.as_deref(),
    )?;

    let mut frame_loop = FrameLoop::new(
        Box::new(camera),
        Box::new(detector),
        dispatcher,
        mapper_from_config(&config.cursor, screen),
    )
    .with_classifier(classifier)
    .with_settings(settings);

    let mut overlay: Box<dyn Overlay> = Box::new(NullOverlay);
    if let Some(ref dir) = config.overlay.snapshot_dir {
        let snapshots = SnapshotOverlay::new(dir, config.overlay.snapshot_every)
            .with_context(|| format!("Failed to create snapshot dir {}", dir.display()))?;
        println!("Writing snapshots to {}", dir.display());
        overlay = Box::new(snapshots);
    }

    if let Some(path) = record {
        let clock = FrameClock::start();
        let header = LandmarkRecorder::header(
            clock.epoch_wall(),
            config.camera.width,
            config.camera.height,
            config.camera.mirror,
        );
        let recorder = LandmarkRecorder::create(&path, header)
            .with_context(|| format!("Failed to create recording {}", path.display()))?;
        println!("Recording landmarks to {}", path.display());
        frame_loop = frame_loop.with_recorder(recorder);
    }

    if keys && std::io::stdin().is_terminal() {
        println!("Press Esc or Ctrl+C to stop...");
        match TerminalKeys::enable() {
            Ok(terminal) => {
                overlay = Box::new(
                    KeyboardOverlay::new(overlay, Box::new(terminal))
                        .with_interrupt(frame_loop.stop_handle()),
                );
            }
            Err(e) => tracing::warn!(error = %e, "Exit key unavailable"),
        }
    } else {
        println!("Press Ctrl+C to stop...");
    }
    frame_loop = frame_loop.with_overlay(overlay);

    let summary = super::run_until_interrupted(frame_loop).await?;
    super::report(&summary)
}

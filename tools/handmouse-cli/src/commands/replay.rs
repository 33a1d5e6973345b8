//! Replay a landmark recording through the tracking loop.

use std::path::PathBuf;

use anyhow::Context;

use handmouse_common::config::AppConfig;
use handmouse_tracking::{
    classifier_from_config, load_recording, mapper_from_config, replay, FrameLoop, LoopSettings,
};

use crate::TuningArgs;

pub async fn run(
    config: AppConfig,
    tuning: TuningArgs,
    path: PathBuf,
    realtime: bool,
) -> anyhow::Result<()> {
    let recording = load_recording(&path)
        .with_context(|| format!("Failed to load recording {}", path.display()))?;

    println!("Replaying {}", path.display());
    if let Some(ref header) = recording.header {
        println!(
            "  Recorded: {} ({}x{})",
            header.epoch_wall, header.frame_width, header.frame_height
        );
    }
    println!("  Frames: {}", recording.frames.len());

    let screen = super::resolve_screen(&config.cursor);
    println!("  Screen: {}x{}", screen.0, screen.1);
    println!();

    let (source, detector) = replay(recording);
    let dispatcher = super::build_dispatcher(
        tuning.dry_run || tuning.action_log.is_some(),
        tuning.action_log.as_deref(),
    )?;

    let frame_loop = FrameLoop::new(
        Box::new(source.with_realtime(realtime)),
        Box::new(detector),
        dispatcher,
        mapper_from_config(&config.cursor, screen),
    )
    .with_classifier(classifier_from_config(&config.gesture)?)
    .with_settings(LoopSettings::from_config(&config.gesture, &config.overlay)?);

    let summary = super::run_until_interrupted(frame_loop).await?;
    super::report(&summary)
}

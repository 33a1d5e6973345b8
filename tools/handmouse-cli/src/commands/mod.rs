pub mod check;
pub mod classify;
pub mod init;
pub mod replay;
pub mod run;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;

use handmouse_common::config::CursorConfig;
use handmouse_input_dispatch::backends::{detect_best_dispatcher, DryRunDispatcher};
use handmouse_input_dispatch::writer::CommandWriter;
use handmouse_input_dispatch::ActionDispatcher;
use handmouse_platform_core::{primary_monitor, FALLBACK_SCREEN};
use handmouse_tracking::{FrameLoop, LoopSummary, StopReason};

/// Parse `WIDTHxHEIGHT`.
pub fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(&['x', 'X'][..])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let width: u32 = w.trim().parse().map_err(|e| format!("bad width '{w}': {e}"))?;
    let height: u32 = h.trim().parse().map_err(|e| format!("bad height '{h}': {e}"))?;
    if width == 0 || height == 0 {
        return Err(format!("size must be non-zero, got '{s}'"));
    }
    Ok((width, height))
}

/// Parse `x,y`.
pub fn parse_point(s: &str) -> Result<(f64, f64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y, got '{s}'"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x '{x}': {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y '{y}': {e}"))?;
    Ok((x, y))
}

/// Screen size for cursor mapping: config override, else the primary monitor.
pub fn resolve_screen(config: &CursorConfig) -> (u32, u32) {
    if let (Some(width), Some(height)) = (config.screen_width, config.screen_height) {
        return (width, height);
    }

    let monitors = handmouse_platform_linux::detect_monitors_or_default();
    primary_monitor(&monitors)
        .map(|m| (m.width, m.height))
        .unwrap_or(FALLBACK_SCREEN)
}

/// Pick the dispatcher for the requested mode.
pub fn build_dispatcher(
    dry_run: bool,
    action_log: Option<&Path>,
) -> anyhow::Result<Box<dyn ActionDispatcher>> {
    if let Some(path) = action_log {
        let writer = CommandWriter::create(path, "dry-run")
            .with_context(|| format!("Failed to create action log {}", path.display()))?;
        println!("Logging actions to {}", path.display());
        return Ok(Box::new(DryRunDispatcher::new(true).with_writer(writer)));
    }
    Ok(detect_best_dispatcher(dry_run))
}

/// Run the loop on a blocking worker, stopping it on Ctrl+C.
pub async fn run_until_interrupted(frame_loop: FrameLoop) -> anyhow::Result<LoopSummary> {
    let signal_stop = frame_loop.stop_handle();
    let interrupted = Arc::new(AtomicBool::new(false));
    let signal_seen = interrupted.clone();
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_seen.store(true, Ordering::SeqCst);
            signal_stop.store(true, Ordering::SeqCst);
        }
    });

    let mut summary = tokio::task::spawn_blocking(move || frame_loop.run())
        .await
        .context("Tracking loop panicked")?;
    signal_task.abort();

    // Ctrl+C also reaches the camera and detector children, which then close
    // their pipes before the loop sees the flag.
    if interrupted.load(Ordering::SeqCst) {
        if let StopReason::CaptureFailed(ref message) = summary.stop_reason {
            tracing::debug!(error = %message, "Capture ended during shutdown");
            summary.stop_reason = StopReason::Stopped;
        }
    }

    Ok(summary)
}

/// Print the run summary and turn a capture failure into an error.
pub fn report(summary: &LoopSummary) -> anyhow::Result<()> {
    println!();
    println!("Frames:           {}", summary.frames);
    println!("Average FPS:      {:.1}", summary.fps());
    println!("Hands detected:   {}", summary.hands_seen);
    println!("Hands skipped:    {}", summary.skipped_hands);
    println!("Cursor moves:     {}", summary.cursor_moves);
    println!(
        "Gestures:         {} left, {} right, {} up, {} down",
        summary.gestures.left_clicks,
        summary.gestures.right_clicks,
        summary.gestures.scroll_ups,
        summary.gestures.scroll_downs
    );
    if summary.dispatch_failures > 0 {
        println!("Dispatch errors:  {}", summary.dispatch_failures);
    }
    if summary.detector_failures > 0 {
        println!("Detector errors:  {}", summary.detector_failures);
    }

    match &summary.stop_reason {
        StopReason::CaptureFailed(message) => {
            eprintln!("Failed to grab frame");
            anyhow::bail!("capture failed: {message}")
        }
        StopReason::ExitKey => println!("Stopped: exit key"),
        StopReason::Stopped => println!("Stopped: interrupted"),
        StopReason::EndOfStream => println!("Stopped: end of stream"),
    }
    Ok(())
}

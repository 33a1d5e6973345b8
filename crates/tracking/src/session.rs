//! The tracking frame loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use handmouse_common::clock::{FrameClock, RateController};
use handmouse_common::config::{CursorConfig, GestureConfig, OverlayConfig};
use handmouse_common::error::{HandmouseError, HandmouseResult};
use handmouse_gesture_core::classifier::{GestureClassifier, ThresholdMode, Thresholds};
use handmouse_gesture_core::cursor::CursorMapper;
use handmouse_gesture_core::geometry::distance;
use handmouse_gesture_core::selection::HandPolicy;
use handmouse_gesture_model::gesture::Action;
use handmouse_gesture_model::landmark::{index, HandLandmarks};
use handmouse_input_dispatch::{dispatch, ActionDispatcher};

use crate::detector::LandmarkProvider;
use crate::frame::Frame;
use crate::overlay::{NullOverlay, Overlay};
use crate::recorder::LandmarkRecorder;
use crate::source::FrameSource;

/// Loop parameters that are not owned by a component.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopSettings {
    pub policy: HandPolicy,

    /// Wheel clicks per scroll action.
    pub scroll_amount: u32,

    /// Key code that stops the loop when reported by the overlay.
    pub exit_key: u8,

    /// Statistics log rate.
    pub stats_hz: u32,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            policy: HandPolicy::First,
            scroll_amount: 10,
            exit_key: 27,
            stats_hz: 1,
        }
    }
}

impl LoopSettings {
    pub fn from_config(gesture: &GestureConfig, overlay: &OverlayConfig) -> HandmouseResult<Self> {
        Ok(Self {
            policy: gesture.hand_policy.parse()?,
            scroll_amount: gesture.scroll_amount,
            exit_key: overlay.exit_key,
            ..Self::default()
        })
    }
}

/// Build the classifier described by the gesture config.
pub fn classifier_from_config(config: &GestureConfig) -> HandmouseResult<GestureClassifier> {
    let mode: ThresholdMode = config.threshold_mode.parse()?;
    let pixels = Thresholds {
        pinch: config.pinch_px,
        spread: config.spread_px,
        touch: config.touch_px,
    };
    let ratios = Thresholds {
        pinch: config.pinch_ratio,
        spread: config.spread_ratio,
        touch: config.touch_ratio,
    };
    Ok(GestureClassifier::new(mode, pixels, ratios))
}

/// Build the cursor mapper for a screen size.
pub fn mapper_from_config(config: &CursorConfig, screen: (u32, u32)) -> CursorMapper {
    CursorMapper::new(screen.0, screen.1)
        .with_smoothing(config.smoothing)
        .with_clamp(config.clamp)
}

/// Why the loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The overlay reported the exit key.
    ExitKey,
    /// The external stop flag was raised.
    Stopped,
    /// The frame source has no more frames.
    EndOfStream,
    /// The camera or detector failed.
    CaptureFailed(String),
}

/// Gesture actions dispatched, by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GestureCounts {
    pub left_clicks: u64,
    pub right_clicks: u64,
    pub scroll_ups: u64,
    pub scroll_downs: u64,
}

impl GestureCounts {
    fn record(&mut self, action: Action) {
        match action {
            Action::LeftClick => self.left_clicks += 1,
            Action::RightClick => self.right_clicks += 1,
            Action::ScrollUp => self.scroll_ups += 1,
            Action::ScrollDown => self.scroll_downs += 1,
            Action::MoveCursor { .. } | Action::NoOp => {}
        }
    }

    pub fn total(&self) -> u64 {
        self.left_clicks + self.right_clicks + self.scroll_ups + self.scroll_downs
    }
}

/// What happened during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopSummary {
    pub frames: u64,

    /// Hands reported by the detector.
    pub hands_seen: u64,

    /// Hands that moved the cursor and were classified.
    pub hands_processed: u64,

    /// Hands dropped for malformed landmarks.
    pub skipped_hands: u64,

    pub cursor_moves: u64,
    pub gestures: GestureCounts,
    pub dispatch_failures: u64,

    /// Frames the detector could not analyse.
    pub detector_failures: u64,

    pub elapsed_ns: u64,
    pub stop_reason: StopReason,
}

impl LoopSummary {
    fn new() -> Self {
        Self {
            frames: 0,
            hands_seen: 0,
            hands_processed: 0,
            skipped_hands: 0,
            cursor_moves: 0,
            gestures: GestureCounts::default(),
            dispatch_failures: 0,
            detector_failures: 0,
            elapsed_ns: 0,
            stop_reason: StopReason::Stopped,
        }
    }

    pub fn fps(&self) -> f64 {
        FrameClock::fps(self.frames, self.elapsed_ns)
    }
}

/// Single-threaded capture → detect → classify → dispatch loop.
///
/// The loop owns every component. Running it consumes the loop, so the
/// camera and detector are released on every exit path.
pub struct FrameLoop {
    source: Box<dyn FrameSource>,
    detector: Box<dyn LandmarkProvider>,
    dispatcher: Box<dyn ActionDispatcher>,
    overlay: Box<dyn Overlay>,
    recorder: Option<LandmarkRecorder>,
    classifier: GestureClassifier,
    mapper: CursorMapper,
    settings: LoopSettings,
    stop: Arc<AtomicBool>,
}

impl FrameLoop {
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Box<dyn LandmarkProvider>,
        dispatcher: Box<dyn ActionDispatcher>,
        mapper: CursorMapper,
    ) -> Self {
        Self {
            source,
            detector,
            dispatcher,
            overlay: Box::new(NullOverlay),
            recorder: None,
            classifier: GestureClassifier::default(),
            mapper,
            settings: LoopSettings::default(),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_classifier(mut self, classifier: GestureClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_settings(mut self, settings: LoopSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_overlay(mut self, overlay: Box<dyn Overlay>) -> Self {
        self.overlay = overlay;
        self
    }

    pub fn with_recorder(mut self, recorder: LandmarkRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    /// Share an externally owned stop flag.
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    /// Handle that stops the loop before its next frame when set.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    /// Run until exit key, stop flag, end of stream or capture failure.
    pub fn run(mut self) -> LoopSummary {
        let clock = FrameClock::start();
        let mut stats = RateController::new(self.settings.stats_hz);
        let mut summary = LoopSummary::new();

        tracing::info!(
            source = self.source.name(),
            detector = self.detector.name(),
            dispatcher = self.dispatcher.name(),
            policy = ?self.settings.policy,
            screen = ?self.mapper.screen_size(),
            "Tracking started"
        );

        summary.stop_reason = loop {
            if self.stop.load(Ordering::SeqCst) {
                break StopReason::Stopped;
            }

            let frame = match self.source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break StopReason::EndOfStream,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to grab frame");
                    break StopReason::CaptureFailed(e.to_string());
                }
            };
            summary.frames += 1;

            let hands = match self.detector.detect(&frame) {
                Ok(hands) => hands,
                Err(e @ HandmouseError::Detection { .. }) => {
                    tracing::warn!(seq = frame.seq, error = %e, "Detection failed for frame");
                    summary.detector_failures += 1;
                    Vec::new()
                }
                Err(e) => {
                    tracing::error!(error = %e, "Landmark provider failed");
                    break StopReason::CaptureFailed(e.to_string());
                }
            };
            tracing::trace!(seq = frame.seq, hands = hands.len(), "Frame processed");
            summary.hands_seen += hands.len() as u64;

            if let Some(recorder) = self.recorder.as_mut() {
                if let Err(e) = recorder.write_frame(&frame, &hands) {
                    tracing::warn!(error = %e, "Dropping landmark recording");
                    self.recorder = None;
                }
            }

            if hands.is_empty() {
                self.mapper.reset();
            }

            let selected = self.settings.policy.select(&hands);
            for (idx, hand) in hands.iter().enumerate() {
                if selected.contains(&idx) {
                    continue;
                }
                if let Err(e) = hand.validate() {
                    tracing::warn!(seq = frame.seq, hand = idx, error = %e, "Skipping hand");
                    summary.skipped_hands += 1;
                }
            }

            for idx in selected {
                match self.process_hand(&frame, &hands[idx], &mut summary) {
                    Ok(()) => summary.hands_processed += 1,
                    Err(e) => {
                        tracing::warn!(seq = frame.seq, hand = idx, error = %e, "Skipping hand");
                        summary.skipped_hands += 1;
                    }
                }
            }

            match self.overlay.present(&frame, &hands) {
                Ok(Some(key)) if key == self.settings.exit_key => break StopReason::ExitKey,
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "Overlay failed"),
            }

            let now = clock.elapsed_ns();
            if stats.should_tick(now) {
                tracing::info!(
                    frames = summary.frames,
                    fps = %format!("{:.1}", FrameClock::fps(summary.frames, now)),
                    hands = summary.hands_seen,
                    gestures = summary.gestures.total(),
                    "Tracking"
                );
            }
        };

        summary.elapsed_ns = clock.elapsed_ns();
        tracing::info!(
            frames = summary.frames,
            reason = ?summary.stop_reason,
            "Tracking stopped"
        );
        summary
    }

    /// Move the cursor to the hand and dispatch its gesture.
    fn process_hand(
        &mut self,
        frame: &Frame,
        hand: &HandLandmarks,
        summary: &mut LoopSummary,
    ) -> HandmouseResult<()> {
        hand.validate()?;
        let tips = hand.fingertips_px(frame.width, frame.height)?;
        let wrist = hand.wrist()?;
        if !wrist.is_normalized() {
            tracing::debug!(
                seq = frame.seq,
                x = wrist.x,
                y = wrist.y,
                "Wrist outside the frame, cursor may leave the screen"
            );
        }
        let middle_tip = hand.get(index::MIDDLE_TIP)?.point();
        let span = distance(
            wrist.to_pixels(frame.width, frame.height),
            middle_tip.to_pixels(frame.width, frame.height),
        );

        let (x, y) = self.mapper.map(wrist);
        if self.dispatch_action(Action::MoveCursor { x, y }, summary) {
            summary.cursor_moves += 1;
        }

        let decision = self.classifier.classify(&tips, Some(span));
        tracing::debug!(
            seq = frame.seq,
            action = %decision.action,
            thumb_index = decision.measurements.thumb_index,
            index_middle = decision.measurements.index_middle,
            hand_span = span,
            "Hand decision"
        );
        if self.dispatch_action(decision.action, summary) {
            summary.gestures.record(decision.action);
        }
        Ok(())
    }

    /// Dispatch one action; failures are logged and never retried.
    fn dispatch_action(&mut self, action: Action, summary: &mut LoopSummary) -> bool {
        match dispatch(self.dispatcher.as_mut(), action, self.settings.scroll_amount) {
            Ok(issued) => issued,
            Err(e) => {
                tracing::warn!(action = %action, error = %e, "Dispatch failed");
                summary.dispatch_failures += 1;
                false
            }
        }
    }
}

use std::path::PathBuf;

use handmouse_gesture_core::cursor::CursorMapper;
use handmouse_input_dispatch::backends::DryRunDispatcher;
use handmouse_input_dispatch::writer::{parse_action_log, CommandWriter};
use handmouse_input_dispatch::DispatchedCommand;
use handmouse_tracking::{load_recording, replay, FrameLoop, StopReason};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("sample-session")
        .join("landmarks.jsonl")
}

#[test]
fn fixture_recording_loads_with_header() {
    let recording = load_recording(&fixture_path()).expect("fixture should load");
    let header = recording.header.expect("fixture has a header");

    assert_eq!(header.schema_version, "1.0");
    assert_eq!((header.frame_width, header.frame_height), (640, 480));
    assert_eq!(recording.frames.len(), 7);
}

#[test]
fn fixture_replay_produces_expected_commands() {
    let dir = std::env::temp_dir().join("handmouse_test_fixture_replay");
    let _ = std::fs::remove_dir_all(&dir);
    let log_path = dir.join("actions.jsonl");

    let recording = load_recording(&fixture_path()).expect("fixture should load");
    let (source, detector) = replay(recording);

    let writer = CommandWriter::create(&log_path, "dry-run").expect("action log should open");
    let dispatcher = DryRunDispatcher::new(false).with_writer(writer);

    let summary = FrameLoop::new(
        Box::new(source),
        Box::new(detector),
        Box::new(dispatcher),
        CursorMapper::new(1920, 1080),
    )
    .run();

    assert_eq!(summary.stop_reason, StopReason::EndOfStream);
    assert_eq!(summary.frames, 7);
    assert_eq!(summary.hands_seen, 6);
    assert_eq!(summary.hands_processed, 5);
    assert_eq!(summary.skipped_hands, 1);

    let content = std::fs::read_to_string(&log_path).expect("action log should exist");
    let (header, logged) = parse_action_log(&content).expect("action log should parse");
    assert_eq!(header.map(|h| h.backend), Some("dry-run".to_string()));

    let commands: Vec<DispatchedCommand> = logged.into_iter().map(|c| c.command).collect();
    assert_eq!(
        commands,
        vec![
            DispatchedCommand::MoveCursor { x: 480, y: 540 },
            DispatchedCommand::MoveCursor { x: 1440, y: 270 },
            DispatchedCommand::LeftClick,
            DispatchedCommand::MoveCursor { x: 960, y: 945 },
            DispatchedCommand::ScrollUp { amount: 10 },
            DispatchedCommand::MoveCursor { x: 240, y: 135 },
            DispatchedCommand::ScrollDown { amount: 10 },
            DispatchedCommand::MoveCursor { x: 1200, y: 405 },
            DispatchedCommand::RightClick,
        ]
    );

    std::fs::remove_dir_all(&dir).ok();
}

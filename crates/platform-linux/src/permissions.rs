//! Capability detection and guidance for Linux.
//!
//! HandMouse shells out to a few external tools for capture, detection,
//! and input injection. This module reports which of them are usable.

use std::path::{Path, PathBuf};

use crate::display::{detect_display_server, DisplayServer};

/// A system capability that HandMouse may need.
#[derive(Debug, Clone)]
pub struct Capability {
    pub name: String,
    pub description: String,
    pub available: bool,
    pub required: bool,
    pub fix_instructions: Option<String>,
}

/// Check all capabilities and report status.
///
/// `detector_command` is the configured landmark detector executable.
pub fn check_capabilities(detector_command: &str) -> Vec<Capability> {
    vec![
        check_display_session(),
        check_xdotool(),
        check_ffmpeg(),
        check_webcam_access(),
        check_detector(detector_command),
        check_xrandr(),
    ]
}

/// Locate an executable on `PATH`, or accept an explicit path that exists.
pub fn find_executable(command: &str) -> Option<PathBuf> {
    let direct = Path::new(command);
    if direct.components().count() > 1 {
        return direct.is_file().then(|| direct.to_path_buf());
    }

    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(command))
        .find(|candidate| candidate.is_file())
}

fn check_display_session() -> Capability {
    let server = detect_display_server();
    let available = server == DisplayServer::X11;

    Capability {
        name: "X11 Session".to_string(),
        description: "Graphical session that accepts synthetic pointer events".to_string(),
        available,
        required: true,
        fix_instructions: match server {
            DisplayServer::X11 => None,
            DisplayServer::Wayland => Some(
                "Wayland blocks synthetic input from xdotool; run under an X11 session or XWayland"
                    .to_string(),
            ),
            DisplayServer::Unknown => {
                Some("Run from a graphical desktop session (DISPLAY must be set)".to_string())
            }
        },
    }
}

fn check_xdotool() -> Capability {
    let available = find_executable("xdotool").is_some();

    Capability {
        name: "xdotool".to_string(),
        description: "Cursor movement, click, and scroll injection".to_string(),
        available,
        required: true,
        fix_instructions: if !available {
            Some("Install xdotool: sudo apt install xdotool".to_string())
        } else {
            None
        },
    }
}

fn check_ffmpeg() -> Capability {
    let available = find_executable("ffmpeg").is_some();

    Capability {
        name: "FFmpeg".to_string(),
        description: "Webcam capture via Video4Linux".to_string(),
        available,
        required: true,
        fix_instructions: if !available {
            Some("Install FFmpeg: sudo apt install ffmpeg".to_string())
        } else {
            None
        },
    }
}

fn check_xrandr() -> Capability {
    let available = find_executable("xrandr").is_some();

    Capability {
        name: "xrandr".to_string(),
        description: "Screen resolution discovery".to_string(),
        available,
        required: false, // falls back to 1920x1080
        fix_instructions: if !available {
            Some(
                "Install xrandr (x11-xserver-utils) or set cursor.screen_width/height in config"
                    .to_string(),
            )
        } else {
            None
        },
    }
}

/// Check if a webcam device is available.
fn check_webcam_access() -> Capability {
    let has_webcam = (0..16)
        .map(|idx| format!("/dev/video{idx}"))
        .any(|path| std::path::Path::new(&path).exists());

    Capability {
        name: "Webcam Device".to_string(),
        description: "Video4Linux camera source".to_string(),
        available: has_webcam,
        required: true,
        fix_instructions: if has_webcam {
            None
        } else {
            Some(
                "Connect a webcam and verify /dev/video* exists (v4l2-ctl --list-devices)"
                    .to_string(),
            )
        },
    }
}

fn check_detector(command: &str) -> Capability {
    let available = find_executable(command).is_some();

    Capability {
        name: "Landmark Detector".to_string(),
        description: format!("Hand landmark detector process ({command})"),
        available,
        required: true,
        fix_instructions: if !available {
            Some(
                "Set detector.command in the config to an executable that speaks the READY/JSON protocol"
                    .to_string(),
            )
        } else {
            None
        },
    }
}

/// Print a user-friendly capability report.
pub fn print_capability_report(capabilities: &[Capability]) {
    println!("HandMouse System Capabilities:");
    println!("{}", "-".repeat(60));

    for cap in capabilities {
        let status = if cap.available {
            "[OK]"
        } else if cap.required {
            "[MISSING - REQUIRED]"
        } else {
            "[MISSING - OPTIONAL]"
        };

        println!("  {} {}: {}", status, cap.name, cap.description);

        if let Some(ref fix) = cap.fix_instructions {
            println!("    Fix: {fix}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_executable_rejects_missing_explicit_path() {
        assert!(find_executable("/definitely/not/here/detector").is_none());
    }

    #[test]
    fn test_find_executable_accepts_existing_explicit_path() {
        let dir = std::env::temp_dir().join("handmouse_test_find_exe");
        std::fs::create_dir_all(&dir).unwrap();
        let exe = dir.join("detector");
        std::fs::write(&exe, "#!/bin/sh\n").unwrap();

        assert_eq!(find_executable(exe.to_str().unwrap()), Some(exe.clone()));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_check_capabilities_reports_detector_by_name() {
        let caps = check_capabilities("no-such-detector-binary");
        let detector = caps.iter().find(|c| c.name == "Landmark Detector").unwrap();
        assert!(!detector.available);
        assert!(detector.description.contains("no-such-detector-binary"));
    }
}

//! Display/monitor detection.

use std::process::Command;

use handmouse_common::error::{HandmouseError, HandmouseResult};
pub use handmouse_platform_core::{DisplayServer, MonitorInfo};

/// Detect connected monitors by querying `xrandr`.
pub fn detect_monitors() -> HandmouseResult<Vec<MonitorInfo>> {
    tracing::debug!("Detecting monitors");

    let output = Command::new("xrandr")
        .arg("--query")
        .output()
        .map_err(|e| HandmouseError::platform(format!("Failed to run xrandr: {e}")))?;

    if !output.status.success() {
        return Err(HandmouseError::platform(format!(
            "xrandr exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let monitors = parse_xrandr(&String::from_utf8_lossy(&output.stdout));
    if monitors.is_empty() {
        return Err(HandmouseError::platform(
            "xrandr reported no connected monitors",
        ));
    }
    Ok(monitors)
}

/// Detect monitors, falling back to a single 1920x1080 monitor.
pub fn detect_monitors_or_default() -> Vec<MonitorInfo> {
    match detect_monitors() {
        Ok(monitors) => monitors,
        Err(e) => {
            tracing::warn!(error = %e, "Monitor detection failed, assuming 1920x1080");
            vec![MonitorInfo::fallback()]
        }
    }
}

/// Parse `xrandr --query` output into monitors.
///
/// Only connected outputs with an active mode (`WxH+X+Y`) are returned. The
/// refresh rate comes from the mode line marked with `*`.
pub fn parse_xrandr(output: &str) -> Vec<MonitorInfo> {
    let mut monitors: Vec<MonitorInfo> = Vec::new();
    let mut current_active = false;

    for line in output.lines() {
        if line.starts_with(char::is_whitespace) {
            if !current_active {
                continue;
            }
            if let Some(rate) = line.split_whitespace().find_map(parse_active_rate) {
                if let Some(last) = monitors.last_mut() {
                    last.refresh_rate_hz = rate;
                }
                current_active = false;
            }
            continue;
        }

        current_active = false;
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            continue;
        };
        if tokens.next() != Some("connected") {
            continue;
        }

        let rest: Vec<&str> = tokens.collect();
        let primary = rest.first() == Some(&"primary");
        let Some((width, height, x, y)) = rest.iter().find_map(|t| parse_geometry(t)) else {
            continue;
        };

        monitors.push(MonitorInfo {
            name: name.to_string(),
            width,
            height,
            x,
            y,
            scale_factor: 1.0,
            refresh_rate_hz: 60,
            primary,
        });
        current_active = true;
    }

    monitors
}

/// Parse a `WxH+X+Y` geometry token.
fn parse_geometry(token: &str) -> Option<(u32, u32, i32, i32)> {
    let (size, offsets) = token.split_once('+')?;
    let (w, h) = size.split_once('x')?;
    let (x, y) = offsets.split_once('+')?;
    Some((w.parse().ok()?, h.parse().ok()?, x.parse().ok()?, y.parse().ok()?))
}

/// Parse a mode-line rate token like `60.00*+`, returning it only when active.
fn parse_active_rate(token: &str) -> Option<u32> {
    if !token.contains('*') {
        return None;
    }
    let digits = token.trim_end_matches(&['*', '+'][..]);
    digits.parse::<f64>().ok().map(|hz| hz.round() as u32)
}

/// Detect the current display server.
pub fn detect_display_server() -> DisplayServer {
    if std::env::var("WAYLAND_DISPLAY").is_ok() {
        DisplayServer::Wayland
    } else if std::env::var("DISPLAY").is_ok() {
        DisplayServer::X11
    } else {
        DisplayServer::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XRANDR: &str = "\
Screen 0: minimum 320 x 200, current 4480 x 1440, maximum 16384 x 16384
HDMI-1 connected 1920x1080+0+180 (normal left inverted right x axis y axis) 527mm x 296mm
   1920x1080     60.00 +  74.97*   50.00
   1280x720      60.00
DP-1 connected primary 2560x1440+1920+0 (normal left inverted right x axis y axis) 597mm x 336mm
   2560x1440     59.95*+
DP-2 disconnected (normal left inverted right x axis y axis)
HDMI-2 connected (normal left inverted right x axis y axis)
   1024x768      60.00
";

    #[test]
    fn test_parse_xrandr_connected_outputs() {
        let monitors = parse_xrandr(XRANDR);
        assert_eq!(monitors.len(), 2);

        assert_eq!(monitors[0].name, "HDMI-1");
        assert_eq!((monitors[0].width, monitors[0].height), (1920, 1080));
        assert_eq!((monitors[0].x, monitors[0].y), (0, 180));
        assert_eq!(monitors[0].refresh_rate_hz, 75);
        assert!(!monitors[0].primary);

        assert_eq!(monitors[1].name, "DP-1");
        assert_eq!(monitors[1].x, 1920);
        assert_eq!(monitors[1].refresh_rate_hz, 60);
        assert!(monitors[1].primary);
    }

    #[test]
    fn test_parse_xrandr_empty() {
        assert!(parse_xrandr("").is_empty());
    }

    #[test]
    fn test_parse_geometry() {
        assert_eq!(parse_geometry("800x600+10+20"), Some((800, 600, 10, 20)));
        assert_eq!(parse_geometry("(normal"), None);
        assert_eq!(parse_geometry("primary"), None);
    }
}

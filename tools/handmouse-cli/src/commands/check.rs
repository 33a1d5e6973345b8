//! Check system capabilities.

use handmouse_common::config::AppConfig;
use handmouse_platform_core::primary_monitor;
use handmouse_platform_linux::permissions::{check_capabilities, print_capability_report};
use handmouse_platform_linux::{detect_display_server, detect_monitors, DisplayServer};

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("HandMouse System Check");
    println!("{}", "=".repeat(50));

    match detect_display_server() {
        DisplayServer::X11 => println!("[OK] Display server: X11"),
        DisplayServer::Wayland => println!("[WARN] Display server: Wayland (XWayland only)"),
        DisplayServer::Unknown => println!("[WARN] Display server: Unknown"),
    }

    match detect_monitors() {
        Ok(monitors) => {
            let primary = primary_monitor(&monitors).map(|m| m.name.clone());
            println!("[OK] Monitors detected: {}", monitors.len());
            for m in &monitors {
                println!(
                    "     {} {}x{}+{}+{} @ {}Hz {}",
                    m.name,
                    m.width,
                    m.height,
                    m.x,
                    m.y,
                    m.refresh_rate_hz,
                    if primary.as_deref() == Some(m.name.as_str()) {
                        "(cursor target)"
                    } else {
                        ""
                    }
                );
            }
        }
        Err(e) => println!("[WARN] Monitor detection failed ({e}); 1920x1080 will be assumed"),
    }

    let capabilities = check_capabilities(&config.detector.command);
    println!();
    print_capability_report(&capabilities);

    let all_required_ok = capabilities
        .iter()
        .filter(|c| c.required)
        .all(|c| c.available);

    println!();
    if all_required_ok {
        println!("All required capabilities are available. HandMouse is ready.");
    } else {
        println!("Some required capabilities are missing. See above for fixes.");
    }

    Ok(())
}

//! Write the default configuration file.

use std::path::Path;

use anyhow::Context;

use handmouse_common::config::AppConfig;

pub fn run(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    AppConfig::default()
        .save_to(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Wrote default configuration to {}", path.display());
    println!();
    println!("Sections:");
    println!("  camera    device index, capture size, mirroring");
    println!("  detector  landmark detector command and confidence cutoff");
    println!("  gesture   thresholds, scroll amount, hand policy");
    println!("  cursor    smoothing, clamping, screen size override");
    println!("  overlay   snapshot directory and exit key");
    println!("  logging   level, JSON output, log file");

    Ok(())
}

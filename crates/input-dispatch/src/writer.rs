//! Append-only JSONL log of dispatched commands.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use handmouse_common::clock::FrameClock;
use handmouse_common::error::{HandmouseError, HandmouseResult};

use crate::DispatchedCommand;

/// Current action log schema version.
pub const ACTION_LOG_SCHEMA_VERSION: &str = "1.0";

/// First line of an action log, written as `# {json}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionLogHeader {
    pub schema_version: String,
    pub epoch_wall: String,
    pub backend: String,
}

/// One logged command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedCommand {
    /// Nanoseconds since the log was opened.
    pub t: u64,
    #[serde(flatten)]
    pub command: DispatchedCommand,
}

/// Writes dispatched commands to a JSONL file.
pub struct CommandWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    clock: FrameClock,
    commands_written: u64,
}

impl CommandWriter {
    /// Create the log, truncating any existing file.
    pub fn create(path: impl AsRef<Path>, backend: &str) -> HandmouseResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        let mut writer = BufWriter::new(file);

        let clock = FrameClock::start();
        let header = ActionLogHeader {
            schema_version: ACTION_LOG_SCHEMA_VERSION.to_string(),
            epoch_wall: clock.epoch_wall().to_string(),
            backend: backend.to_string(),
        };
        let header_json = serde_json::to_string(&header)?;
        writeln!(writer, "# {header_json}")
            .map_err(|e| HandmouseError::recording(format!("Failed to write header: {e}")))?;

        Ok(Self {
            writer,
            path,
            clock,
            commands_written: 0,
        })
    }

    pub fn write_command(&mut self, command: &DispatchedCommand) -> HandmouseResult<()> {
        let entry = LoggedCommand {
            t: self.clock.elapsed_ns(),
            command: *command,
        };
        let json = serde_json::to_string(&entry)?;
        writeln!(self.writer, "{json}")
            .map_err(|e| HandmouseError::recording(format!("Failed to write command: {e}")))?;
        self.commands_written += 1;

        if self.commands_written % 100 == 0 {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> HandmouseResult<()> {
        self.writer
            .flush()
            .map_err(|e| HandmouseError::recording(format!("Failed to flush action log: {e}")))
    }

    pub fn commands_written(&self) -> u64 {
        self.commands_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for CommandWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// Parse an action log back into its header and commands.
pub fn parse_action_log(
    jsonl: &str,
) -> Result<(Option<ActionLogHeader>, Vec<LoggedCommand>), serde_json::Error> {
    let mut header = None;
    let mut commands = Vec::new();

    for line in jsonl.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix('#') {
            if header.is_none() {
                header = serde_json::from_str(rest.trim()).ok();
            }
            continue;
        }
        commands.push(serde_json::from_str(line)?);
    }

    Ok((header, commands))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_writer_log() {
        let dir = std::env::temp_dir().join("handmouse_test_action_log");
        let _ = std::fs::remove_dir_all(&dir);

        let path = dir.join("actions.jsonl");
        {
            let mut writer = CommandWriter::create(&path, "dry-run").unwrap();
            writer
                .write_command(&DispatchedCommand::MoveCursor { x: 10, y: 20 })
                .unwrap();
            writer.write_command(&DispatchedCommand::LeftClick).unwrap();
            writer
                .write_command(&DispatchedCommand::ScrollDown { amount: 10 })
                .unwrap();
            assert_eq!(writer.commands_written(), 3);
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("# "));
        assert!(lines[1].contains("\"cmd\":\"move_cursor\""));

        let (header, commands) = parse_action_log(&content).unwrap();
        assert_eq!(header.unwrap().backend, "dry-run");
        let issued: Vec<DispatchedCommand> = commands.iter().map(|c| c.command).collect();
        assert_eq!(
            issued,
            vec![
                DispatchedCommand::MoveCursor { x: 10, y: 20 },
                DispatchedCommand::LeftClick,
                DispatchedCommand::ScrollDown { amount: 10 },
            ]
        );
        assert!(commands.windows(2).all(|w| w[0].t <= w[1].t));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_dry_run_dispatcher_writes_log() {
        use crate::backends::DryRunDispatcher;
        use crate::ActionDispatcher;

        let dir = std::env::temp_dir().join("handmouse_test_dry_run_log");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("actions.jsonl");

        {
            let writer = CommandWriter::create(&path, "dry-run").unwrap();
            let mut dry = DryRunDispatcher::new(false).with_writer(writer);
            dry.right_click().unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let (_, commands) = parse_action_log(&content).unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].command, DispatchedCommand::RightClick);

        std::fs::remove_dir_all(&dir).ok();
    }
}

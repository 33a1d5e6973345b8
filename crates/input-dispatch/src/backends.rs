//! Dispatcher backend implementations.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::Command;

use handmouse_common::error::{HandmouseError, HandmouseResult};

use crate::writer::CommandWriter;
use crate::{ActionDispatcher, DispatchedCommand};

const BUTTON_LEFT: &str = "1";
const BUTTON_RIGHT: &str = "3";
const WHEEL_UP: &str = "4";
const WHEEL_DOWN: &str = "5";

/// Injects input through the `xdotool` command (X11 / XWayland).
pub struct XdotoolDispatcher {
    binary: PathBuf,
}

impl XdotoolDispatcher {
    pub fn new() -> Self {
        Self::with_binary("xdotool")
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Whether the binary can be executed.
    pub fn is_supported(&self) -> bool {
        Command::new(&self.binary)
            .arg("version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// The `xdotool` arguments for a command.
    pub fn args_for(command: DispatchedCommand) -> Vec<String> {
        match command {
            DispatchedCommand::MoveCursor { x, y } => {
                vec!["mousemove".into(), "--".into(), x.to_string(), y.to_string()]
            }
            DispatchedCommand::LeftClick => vec!["click".into(), BUTTON_LEFT.into()],
            DispatchedCommand::RightClick => vec!["click".into(), BUTTON_RIGHT.into()],
            DispatchedCommand::ScrollUp { amount } => vec![
                "click".into(),
                "--repeat".into(),
                amount.max(1).to_string(),
                WHEEL_UP.into(),
            ],
            DispatchedCommand::ScrollDown { amount } => vec![
                "click".into(),
                "--repeat".into(),
                amount.max(1).to_string(),
                WHEEL_DOWN.into(),
            ],
        }
    }

    fn run(&self, command: DispatchedCommand) -> HandmouseResult<()> {
        let args = Self::args_for(command);
        let status = Command::new(&self.binary)
            .args(&args)
            .status()
            .map_err(|e| {
                HandmouseError::dispatch(format!(
                    "Failed to execute {}: {e}",
                    self.binary.display()
                ))
            })?;

        if !status.success() {
            return Err(HandmouseError::dispatch(format!(
                "{} {} exited with {status}",
                self.binary.display(),
                args.join(" ")
            )));
        }
        Ok(())
    }
}

impl Default for XdotoolDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionDispatcher for XdotoolDispatcher {
    fn move_cursor(&mut self, x: i32, y: i32) -> HandmouseResult<()> {
        self.run(DispatchedCommand::MoveCursor { x, y })
    }

    fn left_click(&mut self) -> HandmouseResult<()> {
        self.run(DispatchedCommand::LeftClick)
    }

    fn right_click(&mut self) -> HandmouseResult<()> {
        self.run(DispatchedCommand::RightClick)
    }

    fn scroll_up(&mut self, amount: u32) -> HandmouseResult<()> {
        self.run(DispatchedCommand::ScrollUp { amount })
    }

    fn scroll_down(&mut self, amount: u32) -> HandmouseResult<()> {
        self.run(DispatchedCommand::ScrollDown { amount })
    }

    fn name(&self) -> &str {
        "xdotool"
    }
}

/// Collects commands in memory without touching the OS.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    commands: Vec<DispatchedCommand>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands issued so far, in order.
    pub fn commands(&self) -> &[DispatchedCommand] {
        &self.commands
    }

    /// Drain the recorded commands.
    pub fn take(&mut self) -> Vec<DispatchedCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl ActionDispatcher for RecordingDispatcher {
    fn move_cursor(&mut self, x: i32, y: i32) -> HandmouseResult<()> {
        self.commands.push(DispatchedCommand::MoveCursor { x, y });
        Ok(())
    }

    fn left_click(&mut self) -> HandmouseResult<()> {
        self.commands.push(DispatchedCommand::LeftClick);
        Ok(())
    }

    fn right_click(&mut self) -> HandmouseResult<()> {
        self.commands.push(DispatchedCommand::RightClick);
        Ok(())
    }

    fn scroll_up(&mut self, amount: u32) -> HandmouseResult<()> {
        self.commands.push(DispatchedCommand::ScrollUp { amount });
        Ok(())
    }

    fn scroll_down(&mut self, amount: u32) -> HandmouseResult<()> {
        self.commands.push(DispatchedCommand::ScrollDown { amount });
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Prints commands instead of executing them, optionally logging to JSONL.
pub struct DryRunDispatcher {
    writer: Option<CommandWriter>,
    echo: bool,
    line_end: &'static str,
    issued: u64,
}

impl DryRunDispatcher {
    pub fn new(echo: bool) -> Self {
        // The terminal may be in raw mode for key input while the loop runs.
        let line_end = if std::io::stdout().is_terminal() {
            "\r\n"
        } else {
            "\n"
        };
        Self {
            writer: None,
            echo,
            line_end,
            issued: 0,
        }
    }

    /// Also append every command to a JSONL log.
    pub fn with_writer(mut self, writer: CommandWriter) -> Self {
        self.writer = Some(writer);
        self
    }

    /// Number of commands issued.
    pub fn issued(&self) -> u64 {
        self.issued
    }

    fn record(&mut self, command: DispatchedCommand) -> HandmouseResult<()> {
        self.issued += 1;
        if self.echo {
            print!("{command}{}", self.line_end);
        }
        if let Some(writer) = self.writer.as_mut() {
            writer.write_command(&command)?;
        }
        Ok(())
    }
}

impl ActionDispatcher for DryRunDispatcher {
    fn move_cursor(&mut self, x: i32, y: i32) -> HandmouseResult<()> {
        self.record(DispatchedCommand::MoveCursor { x, y })
    }

    fn left_click(&mut self) -> HandmouseResult<()> {
        self.record(DispatchedCommand::LeftClick)
    }

    fn right_click(&mut self) -> HandmouseResult<()> {
        self.record(DispatchedCommand::RightClick)
    }

    fn scroll_up(&mut self, amount: u32) -> HandmouseResult<()> {
        self.record(DispatchedCommand::ScrollUp { amount })
    }

    fn scroll_down(&mut self, amount: u32) -> HandmouseResult<()> {
        self.record(DispatchedCommand::ScrollDown { amount })
    }

    fn name(&self) -> &str {
        "dry-run"
    }
}

/// Pick the dispatcher for this system.
///
/// Falls back to a printing dry-run dispatcher when `xdotool` is missing.
pub fn detect_best_dispatcher(dry_run: bool) -> Box<dyn ActionDispatcher> {
    if !dry_run {
        let xdotool = XdotoolDispatcher::new();
        if xdotool.is_supported() {
            tracing::info!("Using xdotool dispatcher");
            return Box::new(xdotool);
        }
        tracing::warn!("xdotool not available, actions will be printed instead of executed");
    }
    Box::new(DryRunDispatcher::new(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xdotool_args() {
        assert_eq!(
            XdotoolDispatcher::args_for(DispatchedCommand::MoveCursor { x: -5, y: 20 }),
            vec!["mousemove", "--", "-5", "20"]
        );
        assert_eq!(
            XdotoolDispatcher::args_for(DispatchedCommand::RightClick),
            vec!["click", "3"]
        );
        assert_eq!(
            XdotoolDispatcher::args_for(DispatchedCommand::ScrollUp { amount: 10 }),
            vec!["click", "--repeat", "10", "4"]
        );
        assert_eq!(
            XdotoolDispatcher::args_for(DispatchedCommand::ScrollDown { amount: 0 }),
            vec!["click", "--repeat", "1", "5"]
        );
    }

    #[test]
    fn test_missing_xdotool_binary_is_dispatch_error() {
        let mut dispatcher = XdotoolDispatcher::with_binary("/nonexistent/xdotool");
        assert!(!dispatcher.is_supported());
        let err = dispatcher.left_click().unwrap_err();
        assert!(matches!(err, HandmouseError::Dispatch { .. }));
    }

    #[test]
    fn test_recording_dispatcher_take_drains() {
        let mut rec = RecordingDispatcher::new();
        rec.left_click().unwrap();
        rec.scroll_up(2).unwrap();
        assert_eq!(rec.take().len(), 2);
        assert!(rec.commands().is_empty());
    }

    #[test]
    fn test_dry_run_counts_commands() {
        let mut dry = DryRunDispatcher::new(false);
        dry.move_cursor(1, 1).unwrap();
        dry.right_click().unwrap();
        assert_eq!(dry.issued(), 2);
    }
}

//! HandMouse Input Dispatch
//!
//! Executes pointer actions against the host input subsystem. Uses a
//! pluggable backend architecture:
//!
//! - **Xdotool:** Synthetic X11 events via the `xdotool` command
//! - **Dry run:** Prints commands and optionally logs them as JSONL
//! - **Recording:** Collects commands in memory (tests, replays)

pub mod backends;
pub mod writer;

use serde::{Deserialize, Serialize};

use handmouse_common::error::HandmouseResult;
use handmouse_gesture_model::gesture::Action;

/// Trait for input injection backends.
pub trait ActionDispatcher: Send {
    /// Move the cursor to absolute screen pixels.
    fn move_cursor(&mut self, x: i32, y: i32) -> HandmouseResult<()>;

    /// Press and release the primary button.
    fn left_click(&mut self) -> HandmouseResult<()>;

    /// Press and release the secondary button.
    fn right_click(&mut self) -> HandmouseResult<()>;

    /// Scroll the wheel up by `amount` clicks.
    fn scroll_up(&mut self, amount: u32) -> HandmouseResult<()>;

    /// Scroll the wheel down by `amount` clicks.
    fn scroll_down(&mut self, amount: u32) -> HandmouseResult<()>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

/// A command issued to a dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum DispatchedCommand {
    MoveCursor { x: i32, y: i32 },
    LeftClick,
    RightClick,
    ScrollUp { amount: u32 },
    ScrollDown { amount: u32 },
}

impl std::fmt::Display for DispatchedCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MoveCursor { x, y } => write!(f, "moveCursor({x}, {y})"),
            Self::LeftClick => f.write_str("leftClick()"),
            Self::RightClick => f.write_str("rightClick()"),
            Self::ScrollUp { amount } => write!(f, "scrollUp({amount})"),
            Self::ScrollDown { amount } => write!(f, "scrollDown({amount})"),
        }
    }
}

/// Translate an action to the dispatcher command it issues, if any.
pub fn command_for(action: Action, scroll_amount: u32) -> Option<DispatchedCommand> {
    match action {
        Action::MoveCursor { x, y } => Some(DispatchedCommand::MoveCursor { x, y }),
        Action::LeftClick => Some(DispatchedCommand::LeftClick),
        Action::RightClick => Some(DispatchedCommand::RightClick),
        Action::ScrollUp => Some(DispatchedCommand::ScrollUp {
            amount: scroll_amount,
        }),
        Action::ScrollDown => Some(DispatchedCommand::ScrollDown {
            amount: scroll_amount,
        }),
        Action::NoOp => None,
    }
}

/// Issue a single command on a dispatcher.
pub fn execute(
    dispatcher: &mut dyn ActionDispatcher,
    command: DispatchedCommand,
) -> HandmouseResult<()> {
    match command {
        DispatchedCommand::MoveCursor { x, y } => dispatcher.move_cursor(x, y),
        DispatchedCommand::LeftClick => dispatcher.left_click(),
        DispatchedCommand::RightClick => dispatcher.right_click(),
        DispatchedCommand::ScrollUp { amount } => dispatcher.scroll_up(amount),
        DispatchedCommand::ScrollDown { amount } => dispatcher.scroll_down(amount),
    }
}

/// Dispatch an action. `NoOp` issues nothing and returns `Ok(false)`.
pub fn dispatch(
    dispatcher: &mut dyn ActionDispatcher,
    action: Action,
    scroll_amount: u32,
) -> HandmouseResult<bool> {
    match command_for(action, scroll_amount) {
        Some(command) => {
            tracing::debug!(backend = %dispatcher.name(), %command, "Dispatching");
            execute(dispatcher, command)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::RecordingDispatcher;

    #[test]
    fn test_dispatch_maps_each_action() {
        let mut rec = RecordingDispatcher::new();
        for action in [
            Action::MoveCursor { x: 5, y: 6 },
            Action::LeftClick,
            Action::RightClick,
            Action::ScrollUp,
            Action::ScrollDown,
        ] {
            assert!(dispatch(&mut rec, action, 10).unwrap());
        }

        assert_eq!(
            rec.commands(),
            &[
                DispatchedCommand::MoveCursor { x: 5, y: 6 },
                DispatchedCommand::LeftClick,
                DispatchedCommand::RightClick,
                DispatchedCommand::ScrollUp { amount: 10 },
                DispatchedCommand::ScrollDown { amount: 10 },
            ]
        );
    }

    #[test]
    fn test_noop_dispatches_nothing() {
        let mut rec = RecordingDispatcher::new();
        assert!(!dispatch(&mut rec, Action::NoOp, 10).unwrap());
        assert!(rec.commands().is_empty());
    }

    #[test]
    fn test_command_display() {
        assert_eq!(
            DispatchedCommand::MoveCursor { x: 1, y: 2 }.to_string(),
            "moveCursor(1, 2)"
        );
        assert_eq!(
            DispatchedCommand::ScrollDown { amount: 3 }.to_string(),
            "scrollDown(3)"
        );
    }
}

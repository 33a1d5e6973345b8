//! Keyboard input from the controlling terminal.
//!
//! The loop has no window of its own, so the exit key is read from the
//! terminal that started it. [`KeyboardOverlay`] layers key polling over any
//! other overlay.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use handmouse_common::error::{HandmouseError, HandmouseResult};
use handmouse_gesture_model::landmark::HandLandmarks;

use crate::frame::Frame;
use crate::overlay::Overlay;

pub const KEY_ESC: u8 = 27;
pub const KEY_CTRL_C: u8 = 3;

/// A non-blocking source of key presses.
pub trait KeySource: Send {
    /// The next pending key code, if any.
    fn poll_key(&mut self) -> HandmouseResult<Option<u8>>;
}

/// Key code reported for a terminal key event.
pub fn key_code(code: KeyCode, modifiers: KeyModifiers) -> Option<u8> {
    match code {
        KeyCode::Esc => Some(KEY_ESC),
        KeyCode::Enter => Some(b'\r'),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(KEY_CTRL_C),
        KeyCode::Char(c) if c.is_ascii() => Some(c as u8),
        _ => None,
    }
}

/// Reads keys from the terminal in raw mode.
///
/// Raw mode is left when the value is dropped.
pub struct TerminalKeys {
    _raw: (),
}

impl TerminalKeys {
    pub fn enable() -> HandmouseResult<Self> {
        enable_raw_mode().map_err(|e| {
            HandmouseError::platform(format!("Failed to read keys from the terminal: {e}"))
        })?;
        tracing::debug!("Terminal raw mode enabled");
        Ok(Self { _raw: () })
    }
}

impl KeySource for TerminalKeys {
    fn poll_key(&mut self) -> HandmouseResult<Option<u8>> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(code) = key_code(key.code, key.modifiers) {
                    return Ok(Some(code));
                }
            }
        }
        Ok(None)
    }
}

impl Drop for TerminalKeys {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            tracing::warn!(error = %e, "Failed to restore terminal mode");
        }
    }
}

/// Presents through an inner overlay and reports key presses.
pub struct KeyboardOverlay {
    inner: Box<dyn Overlay>,
    keys: Box<dyn KeySource>,
    interrupt: Option<Arc<AtomicBool>>,
}

impl KeyboardOverlay {
    pub fn new(inner: Box<dyn Overlay>, keys: Box<dyn KeySource>) -> Self {
        Self {
            inner,
            keys,
            interrupt: None,
        }
    }

    /// Raise `flag` on Ctrl+C. Raw mode keeps the terminal from sending SIGINT.
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = Some(flag);
        self
    }
}

impl Overlay for KeyboardOverlay {
    fn present(&mut self, frame: &Frame, hands: &[HandLandmarks]) -> HandmouseResult<Option<u8>> {
        let pressed = self.keys.poll_key()?;
        if pressed == Some(KEY_CTRL_C) {
            if let Some(flag) = self.interrupt.as_ref() {
                flag.store(true, Ordering::SeqCst);
            }
        }

        match (pressed, self.inner.present(frame, hands)) {
            (Some(key), Err(e)) => {
                tracing::warn!(error = %e, "Overlay failed");
                Ok(Some(key))
            }
            (Some(key), Ok(_)) => Ok(Some(key)),
            (None, shown) => shown,
        }
    }
}

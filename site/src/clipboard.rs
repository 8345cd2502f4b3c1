//! Clipboard access for the share action.
//!
//! The primary path writes an OSC 52 sequence, which terminals forward to the
//! system clipboard. When stdout is not a terminal the fallback prints the
//! link so it can be copied by hand.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::io::{IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// Errors that can occur when copying
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    /// This clipboard cannot be used here
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    /// Writing failed
    #[error("Clipboard write failed: {0}")]
    WriteFailed(String),
}

/// Somewhere a link can be copied to.
pub trait Clipboard: Send + Sync {
    /// Copy `text`.
    ///
    /// # Errors
    ///
    /// Returns a [`ClipboardError`] if the text could not be copied.
    fn copy(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Which path ended up handling a copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyPath {
    /// The platform clipboard
    Primary,
    /// The manual fallback
    Fallback,
}

/// Copy with `primary`, falling back to `fallback`.
///
/// The caller acknowledges the copy whichever path ran; a failing fallback is
/// only logged.
pub fn copy_with_fallback(primary: &dyn Clipboard, fallback: &dyn Clipboard, text: &str) -> CopyPath {
    match primary.copy(text) {
        Ok(()) => CopyPath::Primary,
        Err(error) => {
            tracing::warn!(%error, "Clipboard unavailable, using fallback");
            if let Err(error) = fallback.copy(text) {
                tracing::warn!(%error, "Fallback copy failed");
            }
            CopyPath::Fallback
        },
    }
}

/// OSC 52 clipboard on the controlling terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalClipboard;

impl Clipboard for TerminalClipboard {
    fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        let mut stdout = std::io::stdout();
        if !stdout.is_terminal() {
            return Err(ClipboardError::Unavailable("stdout is not a terminal".into()));
        }

        write!(stdout, "{}", osc52(text))
            .and_then(|()| stdout.flush())
            .map_err(|e| ClipboardError::WriteFailed(e.to_string()))
    }
}

/// Fallback that prints the text for the user to select and copy
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualCopy;

impl Clipboard for ManualCopy {
    fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        let mut stderr = std::io::stderr();
        writeln!(stderr, "Copy this link: {text}")
            .map_err(|e| ClipboardError::WriteFailed(e.to_string()))
    }
}

/// Clipboard that keeps what was copied; can be switched off to exercise
/// fallbacks.
#[derive(Debug)]
pub struct RecordingClipboard {
    available: AtomicBool,
    copied: Mutex<Vec<String>>,
}

impl RecordingClipboard {
    /// A working clipboard
    #[must_use]
    pub const fn new() -> Self {
        Self {
            available: AtomicBool::new(true),
            copied: Mutex::new(Vec::new()),
        }
    }

    /// A clipboard whose every copy fails
    #[must_use]
    pub const fn unavailable() -> Self {
        Self {
            available: AtomicBool::new(false),
            copied: Mutex::new(Vec::new()),
        }
    }

    /// Make copies succeed or fail
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Everything copied so far
    #[must_use]
    pub fn copied(&self) -> Vec<String> {
        self.copied
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for RecordingClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard for RecordingClipboard {
    fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(ClipboardError::Unavailable("clipboard disabled".into()));
        }
        self.copied
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
        Ok(())
    }
}

/// `ESC ] 52 ; c ; <base64> BEL`
fn osc52(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

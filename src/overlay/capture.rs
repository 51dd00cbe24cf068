//! The capture workflow: one user gesture from capture-click to saved file.
//!
//! Modeled as an explicit state machine so the dialog/hide ordering is a
//! stated policy instead of incidental control flow. The element snapshot is
//! frozen when the gesture starts; the pointer may move while the dialog is
//! open and the current hover must never bleed into an in-flight capture.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::backend::OverlayBackend;

use super::prefs::ClipboardPref;
use super::types::ElementInfo;

/// Asks the user where to save a capture. Production is the native save
/// dialog; tests script it.
pub trait SaveDialog: Send + Sync {
    /// Returns the chosen path, or `None` when the user dismissed the dialog.
    fn pick_save_path(&self, suggested_name: &str) -> Option<PathBuf>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePhase {
    Idle,
    DialogPending,
    Cancelled,
    Confirmed,
    FileCaptured,
    ClipboardCaptured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureAction {
    OpenDialog,
    Cancel,
    Confirm,
    FileCapture,
    ClipboardCapture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStateError {
    InvalidTransition {
        from: CapturePhase,
        action: CaptureAction,
    },
}

/// One capture gesture and its frozen element snapshot.
pub struct CaptureGesture {
    phase: CapturePhase,
    info: ElementInfo,
}

impl CaptureGesture {
    pub fn new(info: ElementInfo) -> Self {
        Self {
            phase: CapturePhase::Idle,
            info,
        }
    }

    pub fn phase(&self) -> CapturePhase {
        self.phase
    }

    pub fn info(&self) -> &ElementInfo {
        &self.info
    }

    fn transition(
        &mut self,
        allowed: &[CapturePhase],
        to: CapturePhase,
        action: CaptureAction,
    ) -> Result<(), CaptureStateError> {
        if allowed.contains(&self.phase) {
            self.phase = to;
            Ok(())
        } else {
            Err(CaptureStateError::InvalidTransition {
                from: self.phase,
                action,
            })
        }
    }

    pub fn open_dialog(&mut self) -> Result<(), CaptureStateError> {
        self.transition(
            &[CapturePhase::Idle],
            CapturePhase::DialogPending,
            CaptureAction::OpenDialog,
        )
    }

    pub fn cancel(&mut self) -> Result<(), CaptureStateError> {
        self.transition(
            &[CapturePhase::DialogPending],
            CapturePhase::Cancelled,
            CaptureAction::Cancel,
        )
    }

    pub fn confirm(&mut self) -> Result<(), CaptureStateError> {
        self.transition(
            &[CapturePhase::DialogPending],
            CapturePhase::Confirmed,
            CaptureAction::Confirm,
        )
    }

    pub fn file_captured(&mut self) -> Result<(), CaptureStateError> {
        self.transition(
            &[CapturePhase::Confirmed],
            CapturePhase::FileCaptured,
            CaptureAction::FileCapture,
        )
    }

    pub fn clipboard_captured(&mut self) -> Result<(), CaptureStateError> {
        self.transition(
            &[CapturePhase::FileCaptured],
            CapturePhase::ClipboardCaptured,
            CaptureAction::ClipboardCapture,
        )
    }
}

/// What a finished gesture did.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    Cancelled,
    /// The controller was torn down while the gesture was in flight; the
    /// backend was never invoked on its behalf.
    Abandoned,
    Saved {
        path: PathBuf,
        copied_to_clipboard: bool,
    },
}

/// Suggested file name for the save dialog.
pub fn default_file_name() -> String {
    format!("capture-{}.png", chrono::Utc::now().timestamp_millis())
}

/// Drives one capture gesture to completion.
///
/// The overlay window is hidden as soon as the dialog resolves, before the
/// cancellation check: presenting the native dialog may have brought the
/// overlay back into focus, and it must drop out of the way whatever the
/// user decided. The clipboard preference is read after the file capture
/// completes, so a toggle made while the dialog was open is honored.
///
/// `abandoned` is the controller's teardown flag: a gesture still parked at
/// its dialog when the controller detaches must not reach the backend, so it
/// is re-checked after the dialog resolves and again before the clipboard
/// step.
pub fn run_capture(
    info: ElementInfo,
    dialog: &dyn SaveDialog,
    backend: &dyn OverlayBackend,
    copy_to_clipboard: &ClipboardPref,
    abandoned: &AtomicBool,
) -> Result<CaptureOutcome, String> {
    let mut gesture = CaptureGesture::new(info);
    gesture.open_dialog().map_err(|error| format!("{error:?}"))?;

    let path = dialog.pick_save_path(&default_file_name());

    if abandoned.load(Ordering::SeqCst) {
        gesture.cancel().map_err(|error| format!("{error:?}"))?;
        return Ok(CaptureOutcome::Abandoned);
    }

    backend.hide_window()?;

    let Some(path) = path else {
        gesture.cancel().map_err(|error| format!("{error:?}"))?;
        return Ok(CaptureOutcome::Cancelled);
    };

    gesture.confirm().map_err(|error| format!("{error:?}"))?;
    let request = gesture.info().capture_request();

    backend.capture_rect_to_file(&request, &path)?;
    gesture
        .file_captured()
        .map_err(|error| format!("{error:?}"))?;

    let copied_to_clipboard = copy_to_clipboard.get() && !abandoned.load(Ordering::SeqCst);
    if copied_to_clipboard {
        backend.capture_rect(&request)?;
        gesture
            .clipboard_captured()
            .map_err(|error| format!("{error:?}"))?;
    }

    Ok(CaptureOutcome::Saved {
        path,
        copied_to_clipboard,
    })
}

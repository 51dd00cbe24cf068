//! Backend operations the overlay invokes: hiding the overlay window and
//! capturing a screen region to a file or the clipboard.
//!
//! The accessibility inspection that produces hover/click events lives
//! outside this crate; the overlay only consumes its events and calls the
//! operations below.

use std::path::Path;
use std::process::Command;

use tauri::Manager;

use crate::constants::WINDOW_LABEL_MAIN;

/// Region of the screen to capture, in screen-absolute coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRequest {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub window_id: u32,
    pub role: String,
}

/// Operations the overlay asks of its environment. All calls are
/// single-attempt; retry policy, if any, belongs to the implementation.
pub trait OverlayBackend: Send + Sync {
    fn hide_window(&self) -> Result<(), String>;
    fn capture_rect_to_file(&self, request: &CaptureRequest, path: &Path) -> Result<(), String>;
    fn capture_rect(&self, request: &CaptureRequest) -> Result<(), String>;
}

enum Destination<'a> {
    Clipboard,
    File(&'a Path),
}

/// Builds the `screencapture` argument list for a request.
///
/// Capturing by window ID (-l) is cleaner for rounded corners and shadows,
/// so it is preferred whenever the hovered element is a window.
fn screencapture_args(request: &CaptureRequest, dest: &Destination) -> Vec<String> {
    let mut args = Vec::new();

    if let Destination::Clipboard = dest {
        args.push("-c".to_string());
    }

    if request.role.contains("Window") && request.window_id > 0 {
        args.push("-l".to_string());
        args.push(request.window_id.to_string());
    } else {
        args.push("-R".to_string());
        args.push(format!(
            "{},{},{},{}",
            request.x, request.y, request.width, request.height
        ));
    }

    if let Destination::File(path) = dest {
        args.push(path.display().to_string());
    }

    args
}

fn run_screencapture(args: &[String]) -> Result<(), String> {
    let output = Command::new("screencapture")
        .args(args)
        .output()
        .map_err(|e| e.to_string())?;

    if !output.status.success() {
        return Err(String::from_utf8_lossy(&output.stderr).to_string());
    }

    Ok(())
}

/// Production backend: hides the Tauri overlay window and delegates pixel
/// capture to the macOS `screencapture` utility.
pub struct ScreencaptureBackend {
    app: tauri::AppHandle,
}

impl ScreencaptureBackend {
    pub fn new(app: tauri::AppHandle) -> Self {
        Self { app }
    }
}

impl OverlayBackend for ScreencaptureBackend {
    fn hide_window(&self) -> Result<(), String> {
        let window = self
            .app
            .get_webview_window(WINDOW_LABEL_MAIN)
            .ok_or_else(|| "overlay window missing".to_string())?;
        window.hide().map_err(|e| e.to_string())
    }

    fn capture_rect_to_file(&self, request: &CaptureRequest, path: &Path) -> Result<(), String> {
        run_screencapture(&screencapture_args(request, &Destination::File(path)))
    }

    fn capture_rect(&self, request: &CaptureRequest) -> Result<(), String> {
        run_screencapture(&screencapture_args(request, &Destination::Clipboard))
    }
}

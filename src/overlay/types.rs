use serde::{Deserialize, Serialize};

use crate::backend::CaptureRequest;

/// Geometry and classification of the UI element under the pointer, as
/// reported by the accessibility backend.
///
/// `x`/`y`/`width`/`height` are overlay-window-relative and feed the
/// highlight drawing; `global_x`/`global_y` are screen-absolute and feed
/// capture. The same shape arrives on both hover and capture-click events;
/// the click payload is frozen for the whole gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementInfo {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub role: String,
    pub global_x: f64,
    pub global_y: f64,
    pub window_id: u32,
}

impl ElementInfo {
    /// Screen-absolute capture request for this element.
    pub fn capture_request(&self) -> CaptureRequest {
        CaptureRequest {
            x: self.global_x,
            y: self.global_y,
            width: self.width,
            height: self.height,
            window_id: self.window_id,
            role: self.role.clone(),
        }
    }

    #[cfg(test)]
    pub fn sample() -> Self {
        Self {
            x: 10.0,
            y: 5.0,
            width: 100.0,
            height: 50.0,
            role: "AXButton".to_string(),
            global_x: 500.0,
            global_y: 300.0,
            window_id: 7,
        }
    }
}

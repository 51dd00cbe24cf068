//! Derives the highlight box and info label from the hovered element.
//!
//! Pure functions of the latest hover payload; geometry passes through
//! untouched (any coordinate work already happened in the backend).

use serde::Serialize;

use super::types::ElementInfo;
use crate::constants::{AX_ROLE_PREFIX, LABEL_FLIP_THRESHOLD};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPlacement {
    Above,
    Below,
}

/// What the webview paints: the highlight rectangle plus its info label.
/// Purely informational; the rectangle never intercepts pointer events.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightView {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label: String,
    pub label_placement: LabelPlacement,
}

/// Strips the accessibility namespace prefix from a role name
/// ("AXButton" -> "Button").
pub fn format_role(role: &str) -> &str {
    role.strip_prefix(AX_ROLE_PREFIX).unwrap_or(role)
}

pub fn highlight_view(info: &ElementInfo) -> HighlightView {
    // Boxes hugging the top screen edge get their label below the bottom
    // edge instead, so it never clips offscreen.
    let label_placement = if info.y < LABEL_FLIP_THRESHOLD {
        LabelPlacement::Below
    } else {
        LabelPlacement::Above
    };

    HighlightView {
        x: info.x,
        y: info.y,
        width: info.width,
        height: info.height,
        label: format!(
            "{} | {} × {}",
            format_role(&info.role),
            info.width.round() as i64,
            info.height.round() as i64
        ),
        label_placement,
    }
}

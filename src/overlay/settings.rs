use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

/// What the webview needs to draw the settings panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsView {
    pub visible: bool,
    pub copy_to_clipboard: bool,
}

/// Visibility of the settings panel. Toggled by the host's `show-settings`
/// signal; no backend round-trip involved. While visible, the panel is the
/// only surface of the otherwise click-through overlay that takes input.
#[derive(Default)]
pub struct SettingsPanel {
    visible: AtomicBool,
}

impl SettingsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips visibility and returns the new state.
    pub fn toggle(&self) -> bool {
        !self.visible.fetch_xor(true, Ordering::SeqCst)
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }
}

/// The label/ID of the main overlay window.
pub const WINDOW_LABEL_MAIN: &str = "main";

/// Event pushed by the inspection backend when a UI element is hovered.
pub const EVENT_ELEMENT_HOVER: &str = "element-hover";

/// Event pushed by the inspection backend when the user clicks to capture.
pub const EVENT_CAPTURE_CLICK: &str = "capture-click";

/// Event pushed by the host (tray menu) to toggle the settings panel.
pub const EVENT_SHOW_SETTINGS: &str = "show-settings";

/// Event emitted to the overlay webview with the current highlight view.
pub const EVENT_HIGHLIGHT_CHANGED: &str = "highlight-changed";

/// Event emitted to the overlay webview with the current settings view.
pub const EVENT_SETTINGS_CHANGED: &str = "settings-changed";

/// Accessibility roles carry this namespace prefix; the label strips it.
pub const AX_ROLE_PREFIX: &str = "AX";

/// Highlight rectangles starting above this y-coordinate get their label
/// placed below the box instead of above, to avoid clipping against the
/// top screen edge. Fixed policy constant, not a measured label height.
pub const LABEL_FLIP_THRESHOLD: f64 = 30.0;

/// Storage key of the "copy capture to clipboard" preference.
pub const PREF_COPY_TO_CLIPBOARD: &str = "axray-copy-to-clipboard";

/// Global shortcut that hides the overlay.
pub const CANCEL_SHORTCUT: &str = "Escape";

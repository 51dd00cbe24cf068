//! The overlay interaction controller.
//!
//! Subscribes to the backend's push events, derives the highlight view for
//! the webview, drives the capture workflow, and owns the settings panel
//! plus the clipboard preference. Everything runs on trait seams (`EventBus`,
//! `OverlayBackend`, `SaveDialog`, `RenderSink`, `PrefStore`) so the whole
//! controller is exercisable without a running Tauri app.

pub mod capture;
pub mod events;
pub mod highlight;
pub mod prefs;
pub mod settings;
pub mod types;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::backend::OverlayBackend;
use crate::constants::{EVENT_CAPTURE_CLICK, EVENT_ELEMENT_HOVER, EVENT_SHOW_SETTINGS};

use capture::{run_capture, SaveDialog};
use events::{EventBus, SubscriptionSet};
use highlight::{highlight_view, HighlightView};
use prefs::{ClipboardPref, PrefStore};
use settings::{SettingsPanel, SettingsView};
use types::ElementInfo;

/// Receives derived view models. Production emits them to the overlay
/// webview; tests record them.
pub trait RenderSink: Send + Sync {
    /// `None` means "no element currently hovered" — render nothing.
    fn highlight(&self, view: Option<&HighlightView>);
    fn settings(&self, view: &SettingsView);
}

pub struct OverlayController {
    hover: Mutex<Option<ElementInfo>>,
    panel: SettingsPanel,
    clipboard_pref: ClipboardPref,
    backend: Arc<dyn OverlayBackend>,
    dialog: Arc<dyn SaveDialog>,
    sink: Arc<dyn RenderSink>,
    gesture_in_flight: Arc<AtomicBool>,
    detached: AtomicBool,
    subscriptions: Mutex<SubscriptionSet>,
}

impl OverlayController {
    pub fn new(
        backend: Arc<dyn OverlayBackend>,
        dialog: Arc<dyn SaveDialog>,
        sink: Arc<dyn RenderSink>,
        store: Arc<dyn PrefStore>,
    ) -> Arc<Self> {
        Arc::new(Self {
            hover: Mutex::new(None),
            panel: SettingsPanel::new(),
            clipboard_pref: ClipboardPref::load(store),
            backend,
            dialog,
            sink,
            gesture_in_flight: Arc::new(AtomicBool::new(false)),
            detached: AtomicBool::new(false),
            subscriptions: Mutex::new(SubscriptionSet::new()),
        })
    }

    /// Registers the three backend event channels, each exactly once.
    ///
    /// A channel that fails to register is reported and skipped; the others
    /// keep operating independently.
    pub fn attach(self: &Arc<Self>, bus: Arc<dyn EventBus>) -> Result<(), String> {
        let mut subscriptions = self
            .subscriptions
            .lock()
            .map_err(|_| "subscription set lock poisoned".to_string())?;
        self.detached.store(false, Ordering::SeqCst);

        let controller = Arc::clone(self);
        if let Err(error) = subscriptions.subscribe(
            &bus,
            EVENT_ELEMENT_HOVER,
            Box::new(move |payload| match serde_json::from_str::<ElementInfo>(payload) {
                Ok(info) => controller.on_hover(info),
                Err(error) => {
                    if cfg!(debug_assertions) {
                        eprintln!("bad {EVENT_ELEMENT_HOVER} payload: {error}");
                    }
                }
            }),
        ) {
            eprintln!("failed to subscribe to {EVENT_ELEMENT_HOVER}: {error}");
        }

        let controller = Arc::clone(self);
        if let Err(error) = subscriptions.subscribe(
            &bus,
            EVENT_CAPTURE_CLICK,
            Box::new(move |payload| match serde_json::from_str::<ElementInfo>(payload) {
                Ok(info) => controller.on_capture_click(info),
                Err(error) => {
                    if cfg!(debug_assertions) {
                        eprintln!("bad {EVENT_CAPTURE_CLICK} payload: {error}");
                    }
                }
            }),
        ) {
            eprintln!("failed to subscribe to {EVENT_CAPTURE_CLICK}: {error}");
        }

        let controller = Arc::clone(self);
        if let Err(error) = subscriptions.subscribe(
            &bus,
            EVENT_SHOW_SETTINGS,
            Box::new(move |_payload| controller.on_show_settings()),
        ) {
            eprintln!("failed to subscribe to {EVENT_SHOW_SETTINGS}: {error}");
        }

        Ok(())
    }

    /// Releases every subscription and abandons any in-flight capture
    /// gesture. After this returns, no handler runs for subsequently
    /// delivered backend events, and a gesture still parked at its save
    /// dialog will not invoke the backend when the dialog resolves.
    pub fn detach(&self) -> Result<(), String> {
        self.detached.store(true, Ordering::SeqCst);
        self.subscriptions
            .lock()
            .map_err(|_| "subscription set lock poisoned".to_string())?
            .clear();
        Ok(())
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.lock().map(|s| s.len()).unwrap_or(0)
    }

    fn on_hover(&self, info: ElementInfo) {
        let view = highlight_view(&info);
        if let Ok(mut hover) = self.hover.lock() {
            *hover = Some(info);
        }
        self.sink.highlight(Some(&view));
    }

    /// The latest hover payload, or `None` when nothing is hovered.
    pub fn current_hover(&self) -> Option<ElementInfo> {
        self.hover.lock().ok().and_then(|hover| hover.clone())
    }

    pub fn clear_highlight(&self) {
        if let Ok(mut hover) = self.hover.lock() {
            *hover = None;
        }
        self.sink.highlight(None);
    }

    fn on_capture_click(self: &Arc<Self>, info: ElementInfo) {
        // One gesture at a time: a second click while the first is still at
        // its dialog is dropped, not queued (a queued gesture would replay a
        // stale rectangle after an arbitrarily long dialog wait).
        if self
            .gesture_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            if cfg!(debug_assertions) {
                eprintln!("capture gesture already in flight; dropping click");
            }
            return;
        }

        // The native save dialog blocks, so the gesture runs off the event
        // thread. The payload is moved in and never re-read from `hover`.
        let controller = Arc::clone(self);
        std::thread::spawn(move || {
            let result = run_capture(
                info,
                controller.dialog.as_ref(),
                controller.backend.as_ref(),
                &controller.clipboard_pref,
                &controller.detached,
            );
            controller.gesture_in_flight.store(false, Ordering::SeqCst);
            if let Err(error) = result {
                eprintln!("capture failed: {error}");
            }
        });
    }

    pub fn gesture_in_flight(&self) -> bool {
        self.gesture_in_flight.load(Ordering::SeqCst)
    }

    fn on_show_settings(&self) {
        let visible = self.panel.toggle();
        self.sink.settings(&SettingsView {
            visible,
            copy_to_clipboard: self.clipboard_pref.get(),
        });
    }

    pub fn settings_view(&self) -> SettingsView {
        SettingsView {
            visible: self.panel.is_visible(),
            copy_to_clipboard: self.clipboard_pref.get(),
        }
    }

    pub fn close_settings(&self) {
        self.panel.set_visible(false);
        self.sink.settings(&self.settings_view());
    }

    pub fn set_copy_to_clipboard(&self, value: bool) -> Result<(), String> {
        self.clipboard_pref.set(value)?;
        self.sink.settings(&self.settings_view());
        Ok(())
    }

    /// Escape: hide the overlay and drop all transient UI state. Independent
    /// of any in-flight gesture; subscriptions stay registered.
    pub fn cancel(&self) -> Result<(), String> {
        self.backend.hide_window()?;
        self.clear_highlight();
        self.close_settings();
        Ok(())
    }
}

// Learn more about Tauri commands at https://tauri.app/develop/calling-rust/
pub mod backend;
pub mod constants;
pub mod overlay;

use std::path::PathBuf;
use std::sync::Arc;

use tauri::{Emitter, Manager};
use tauri_plugin_dialog::DialogExt;

use backend::ScreencaptureBackend;
use constants::{
    CANCEL_SHORTCUT, EVENT_HIGHLIGHT_CHANGED, EVENT_SETTINGS_CHANGED, WINDOW_LABEL_MAIN,
};
use overlay::capture::SaveDialog;
use overlay::events::TauriEventBus;
use overlay::highlight::HighlightView;
use overlay::prefs::FilePrefStore;
use overlay::settings::SettingsView;
use overlay::{OverlayController, RenderSink};

struct OverlayAppState {
    controller: Arc<OverlayController>,
}

/// Native save dialog with the PNG filter and a suggested file name.
struct NativeSaveDialog {
    app: tauri::AppHandle,
}

impl SaveDialog for NativeSaveDialog {
    fn pick_save_path(&self, suggested_name: &str) -> Option<PathBuf> {
        self.app
            .dialog()
            .file()
            .add_filter("PNG Image", &["png"])
            .set_file_name(suggested_name)
            .blocking_save_file()
            .and_then(|file| file.into_path().ok())
    }
}

/// Pushes view models to the overlay webview. The window ignores cursor
/// events except while the settings panel is visible.
struct EventRenderSink {
    app: tauri::AppHandle,
}

impl RenderSink for EventRenderSink {
    fn highlight(&self, view: Option<&HighlightView>) {
        if let Err(error) = self.app.emit(EVENT_HIGHLIGHT_CHANGED, view) {
            if cfg!(debug_assertions) {
                eprintln!("failed to emit highlight view: {error}");
            }
        }
    }

    fn settings(&self, view: &SettingsView) {
        if let Err(error) = self.app.emit(EVENT_SETTINGS_CHANGED, *view) {
            if cfg!(debug_assertions) {
                eprintln!("failed to emit settings view: {error}");
            }
        }
        if let Some(window) = self.app.get_webview_window(WINDOW_LABEL_MAIN) {
            let _ = window.set_ignore_cursor_events(!view.visible);
        }
    }
}

/// Hides the overlay window. Wired to the webview's Escape key, in addition
/// to the app-level global shortcut.
#[tauri::command]
fn hide_window(state: tauri::State<'_, OverlayAppState>) -> Result<(), String> {
    state.controller.cancel()
}

#[tauri::command]
fn set_copy_to_clipboard(
    state: tauri::State<'_, OverlayAppState>,
    value: bool,
) -> Result<(), String> {
    state.controller.set_copy_to_clipboard(value)
}

#[tauri::command]
fn overlay_settings(state: tauri::State<'_, OverlayAppState>) -> SettingsView {
    state.controller.settings_view()
}

#[tauri::command]
fn close_settings(state: tauri::State<'_, OverlayAppState>) {
    state.controller.close_settings();
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .plugin(
            tauri_plugin_global_shortcut::Builder::new()
                .with_shortcut(CANCEL_SHORTCUT)
                .expect("failed to register cancel shortcut")
                .with_handler(|app, _shortcut, event| {
                    if event.state == tauri_plugin_global_shortcut::ShortcutState::Pressed {
                        if let Some(state) = app.try_state::<OverlayAppState>() {
                            if let Err(error) = state.controller.cancel() {
                                eprintln!("failed to hide overlay: {error}");
                            }
                        }
                    }
                })
                .build(),
        )
        .setup(|app| {
            let handle = app.handle().clone();

            // Click-through until the settings panel opens.
            if let Some(window) = app.get_webview_window(WINDOW_LABEL_MAIN) {
                window.set_ignore_cursor_events(true)?;
            }

            let store = FilePrefStore::default_location()?;
            let controller = OverlayController::new(
                Arc::new(ScreencaptureBackend::new(handle.clone())),
                Arc::new(NativeSaveDialog {
                    app: handle.clone(),
                }),
                Arc::new(EventRenderSink {
                    app: handle.clone(),
                }),
                Arc::new(store),
            );
            controller.attach(Arc::new(TauriEventBus::new(handle)))?;
            app.manage(OverlayAppState { controller });

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            hide_window,
            set_copy_to_clipboard,
            overlay_settings,
            close_settings,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

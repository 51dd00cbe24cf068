fn main() {
    let manifest = tauri_build::AppManifest::new().commands(&[
        "hide_window",
        "set_copy_to_clipboard",
        "overlay_settings",
        "close_settings",
    ]);

    let attrs = tauri_build::Attributes::new().app_manifest(manifest);
    tauri_build::try_build(attrs).expect("failed to run build script");
}

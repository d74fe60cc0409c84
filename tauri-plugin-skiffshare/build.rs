const COMMANDS: &[&str] = &[
    "pop_shared_file",
    "get_downloads_dir",
    "open_file",
    "check_storage_permission",
    "request_storage_permission",
];

fn main() {
    // The Android/iOS projects ship with the app; the plugin is registered
    // at runtime via register_android_plugin / the Swift package binding.
    tauri_plugin::Builder::new(COMMANDS).build();
}

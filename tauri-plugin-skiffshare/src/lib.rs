use tauri::{
    plugin::{Builder, TauriPlugin},
    Manager, Runtime,
};

pub use models::*;

#[cfg(desktop)]
mod desktop;
#[cfg(mobile)]
mod mobile;

mod commands;
mod error;
mod models;

pub use error::{Error, Result};

#[cfg(desktop)]
use desktop::Skiffshare;
#[cfg(mobile)]
use mobile::Skiffshare;

/// Extensions to [`tauri::App`], [`tauri::AppHandle`] and [`tauri::Window`] to access the skiffshare APIs.
pub trait SkiffshareExt<R: Runtime> {
    fn skiffshare(&self) -> &Skiffshare<R>;
}

impl<R: Runtime, T: Manager<R>> crate::SkiffshareExt<R> for T {
    fn skiffshare(&self) -> &Skiffshare<R> {
        self.state::<Skiffshare<R>>().inner()
    }
}

/// Initializes the skiffshare plugin.
///
/// This plugin makes Skiff a share target:
/// - on mobile it registers with the native layer, which feeds incoming
///   "share with Skiff" intents into a single-slot buffer, including the
///   intent that launched the session
/// - the buffer is consumed from the frontend via `pop_shared_file`
/// - storage permissions, the downloads directory and native file viewing
///   are exposed alongside, degrading to local filesystem behaviour on
///   desktop
pub fn init<R: Runtime>() -> TauriPlugin<R, Option<Config>> {
    Builder::<R, Option<Config>>::new("skiffshare")
        .invoke_handler(tauri::generate_handler![
            commands::pop_shared_file,
            commands::get_downloads_dir,
            commands::open_file,
            commands::check_storage_permission,
            commands::request_storage_permission,
        ])
        .setup(|app, api| {
            #[cfg(mobile)]
            let skiffshare = mobile::init(app, api)?;
            #[cfg(desktop)]
            let skiffshare = desktop::init(app, api)?;
            app.manage(skiffshare);
            Ok(())
        })
        .on_event(|_app, event| {
            if let tauri::RunEvent::Resumed = event {
                // The native layer re-delivers any intent that arrived while
                // the app was backgrounded; consumption stays with the
                // frontend's next poll.
                log::info!("skiffshare: app resumed");
            }
        })
        .build()
}

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tauri::{plugin::PluginApi, AppHandle, Runtime};

use crate::models::PermissionState;

/// Initialize the plugin without a native sharing layer (no listener is
/// registered; the buffer stays empty for the process lifetime).
pub fn init<R: Runtime, C: DeserializeOwned>(
    app: &AppHandle<R>,
    _api: PluginApi<R, C>,
) -> crate::Result<Skiffshare<R>> {
    Ok(Skiffshare(app.clone()))
}

/// Access to the share-target APIs (desktop rendition).
///
/// Nothing shares files with a desktop build, so the pull operation always
/// comes back empty. The directory and file-opening helpers degrade to
/// plain local filesystem behaviour, and there is no permission model to
/// consult.
pub struct Skiffshare<R: Runtime>(AppHandle<R>);

impl<R: Runtime> Skiffshare<R> {
    /// Takes the pending shared file, of which desktop never has one.
    pub fn pop_shared_file(&self) -> crate::Result<Option<PathBuf>> {
        Ok(None)
    }

    pub fn downloads_dir(&self) -> crate::Result<PathBuf> {
        Ok(skiffshare_core::fs::downloads_dir())
    }

    pub fn open_file(&self, path: &Path) -> crate::Result<()> {
        skiffshare_core::fs::open_file(path).map_err(Into::into)
    }

    pub fn check_storage_permission(&self) -> crate::Result<PermissionState> {
        Ok(PermissionState::Granted)
    }

    pub fn request_storage_permission(&self) -> crate::Result<PermissionState> {
        Ok(PermissionState::Granted)
    }

    /// Runs `op` synchronously and immediately; without a permission model
    /// the fallback can never fire.
    pub fn with_storage_permission<F, G>(&self, op: F, _fallback: G) -> crate::Result<()>
    where
        F: FnOnce() + Send + 'static,
        G: FnOnce() + Send + 'static,
    {
        op();
        Ok(())
    }
}

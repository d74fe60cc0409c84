use std::path::PathBuf;

use tauri::{command, AppHandle, Runtime};

use crate::models::PermissionState;
use crate::Result;
use crate::SkiffshareExt;

/// Pull the outcome of the most recent share event.
///
/// Returns the resolved file path if a share is pending and nothing if no
/// share has arrived since the last call. Fails with a user-facing message
/// when the last share target could not be recognised as a file; the
/// frontend displays that message verbatim.
#[command]
pub(crate) async fn pop_shared_file<R: Runtime>(app: AppHandle<R>) -> Result<Option<PathBuf>> {
    app.skiffshare().pop_shared_file()
}

/// The directory received files should be written to.
#[command]
pub(crate) async fn get_downloads_dir<R: Runtime>(app: AppHandle<R>) -> Result<PathBuf> {
    app.skiffshare().downloads_dir()
}

/// View the file with whatever the platform associates with it.
#[command]
pub(crate) async fn open_file<R: Runtime>(app: AppHandle<R>, path: PathBuf) -> Result<()> {
    app.skiffshare().open_file(&path)
}

/// Check the storage-write permission without prompting the user.
#[command]
pub(crate) async fn check_storage_permission<R: Runtime>(
    app: AppHandle<R>,
) -> Result<PermissionState> {
    app.skiffshare().check_storage_permission()
}

/// Prompt the user for the storage-write permission and report the result.
#[command]
pub(crate) async fn request_storage_permission<R: Runtime>(
    app: AppHandle<R>,
) -> Result<PermissionState> {
    app.skiffshare().request_storage_permission()
}

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tauri::{
    ipc::{Channel, InvokeResponseBody},
    plugin::{PluginApi, PluginHandle},
    AppHandle, Runtime,
};

use skiffshare_core::{IntentHandler, ShareEvent, SkiffshareError, UriResolver};

use crate::models::{Config, PermissionState};

#[cfg(target_os = "ios")]
tauri::ios_plugin_binding!(init_plugin_skiffshare);

/// Payload registering the channel the native layer pushes share events
/// into.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EventHandlerPayload {
    handler: Channel<ShareEvent>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResolveUriRequest<'a> {
    uri: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PathResponse {
    path: PathBuf,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OpenFileRequest<'a> {
    path: &'a Path,
    authority: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LaunchEventResponse {
    event: Option<ShareEvent>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PermissionResponse {
    storage: PermissionState,
}

/// Resolves content URIs through the native layer's content resolver.
pub struct NativeUriResolver<R: Runtime>(PluginHandle<R>);

impl<R: Runtime> UriResolver for NativeUriResolver<R> {
    fn resolve(&self, uri: &str) -> skiffshare_core::Result<PathBuf> {
        self.0
            .run_mobile_plugin::<PathResponse>("resolveUri", ResolveUriRequest { uri })
            .map(|response| response.path)
            .map_err(|e| SkiffshareError::UriResolution(e.to_string()))
    }
}

/// Initialize the mobile plugin: register the native layer, subscribe to
/// incoming share events, and replay the intent that launched the current
/// session as if it had just arrived.
pub fn init<R: Runtime>(
    _app: &AppHandle<R>,
    api: PluginApi<R, Option<Config>>,
) -> crate::Result<Skiffshare<R>> {
    let config = api.config().clone().unwrap_or_default();

    #[cfg(target_os = "android")]
    let handle = api.register_android_plugin("com.skiff.plugins.skiffshare", "SkiffsharePlugin")?;
    #[cfg(target_os = "ios")]
    let handle = api.register_ios_plugin(init_plugin_skiffshare)?;

    let handler = Arc::new(IntentHandler::new(NativeUriResolver(handle.clone())));

    // Incoming intents are pushed over this channel for the process
    // lifetime. Resolution failures are handed back to the dispatcher.
    let events = Arc::clone(&handler);
    let channel = Channel::new(move |body| {
        let event: ShareEvent = match body {
            InvokeResponseBody::Json(payload) => serde_json::from_str(&payload)?,
            _ => return Ok(()),
        };
        events
            .handle_incoming_event(&event)
            .map_err(|e| tauri::Error::Anyhow(anyhow::Error::new(e)))
    });
    // Kotlin returns an empty JSObject here, so deserialize to Value and
    // discard it.
    handle.run_mobile_plugin::<serde_json::Value>(
        "setEventHandler",
        EventHandlerPayload { handler: channel },
    )?;

    // The intent that launched this session counts as a live event.
    let launch = handle.run_mobile_plugin::<LaunchEventResponse>("getLaunchEvent", ())?;
    if let Some(event) = launch.event {
        handler.handle_incoming_event(&event)?;
    }

    Ok(Skiffshare {
        handle,
        handler,
        config,
    })
}

/// Access to the share-target APIs (mobile rendition).
pub struct Skiffshare<R: Runtime> {
    handle: PluginHandle<R>,
    handler: Arc<IntentHandler<NativeUriResolver<R>>>,
    config: Config,
}

impl<R: Runtime> Skiffshare<R> {
    /// Takes the outcome of the most recent share event, if any.
    ///
    /// An event whose target could not be recognised as a file surfaces
    /// here as an error carrying the stored user-facing message.
    pub fn pop_shared_file(&self) -> crate::Result<Option<PathBuf>> {
        self.handler.pop().map_err(Into::into)
    }

    /// The external-storage downloads directory, as reported by the native
    /// layer.
    pub fn downloads_dir(&self) -> crate::Result<PathBuf> {
        self.handle
            .run_mobile_plugin::<PathResponse>("getDownloadsDir", ())
            .map(|response| response.path)
            .map_err(Into::into)
    }

    /// Fires the platform VIEW action for the file.
    ///
    /// The native layer guesses the content type and sanctions the URI via
    /// the configured provider authority before starting the activity.
    pub fn open_file(&self, path: &Path) -> crate::Result<()> {
        self.handle
            .run_mobile_plugin::<serde_json::Value>(
                "openFile",
                OpenFileRequest {
                    path,
                    authority: self.config.fileprovider_authority.as_deref(),
                },
            )
            .map(|_| ())
            .map_err(Into::into)
    }

    pub fn check_storage_permission(&self) -> crate::Result<PermissionState> {
        self.handle
            .run_mobile_plugin::<PermissionResponse>("checkPermissions", ())
            .map(|response| response.storage)
            .map_err(Into::into)
    }

    /// Prompts the user for the storage-write permission and reports the
    /// resulting state.
    pub fn request_storage_permission(&self) -> crate::Result<PermissionState> {
        self.handle
            .run_mobile_plugin::<PermissionResponse>("requestPermissions", ())
            .map(|response| response.storage)
            .map_err(Into::into)
    }

    /// Runs `op` once the storage-write permission is confirmed granted.
    ///
    /// If the permission is already held, `op` runs synchronously on the
    /// caller's thread. Otherwise the request is issued on a blocking task
    /// and exactly one of `op` and `fallback` runs there with the grant
    /// result; a failed request counts as a denial. Neither closure can
    /// return a value to the caller in the asynchronous case.
    pub fn with_storage_permission<F, G>(&self, op: F, fallback: G) -> crate::Result<()>
    where
        F: FnOnce() + Send + 'static,
        G: FnOnce() + Send + 'static,
    {
        if self.check_storage_permission()?.is_granted() {
            op();
            return Ok(());
        }

        let handle = self.handle.clone();
        tauri::async_runtime::spawn_blocking(move || {
            match handle.run_mobile_plugin::<PermissionResponse>("requestPermissions", ()) {
                Ok(response) if response.storage.is_granted() => op(),
                Ok(_) => fallback(),
                Err(e) => {
                    log::error!("storage permission request failed: {e}");
                    fallback();
                }
            }
        });
        Ok(())
    }
}

use serde::{Deserialize, Serialize};

pub use skiffshare_core::{ClipItem, ShareEvent};

/// Plugin configuration, read from the `skiffshare` section of the Tauri
/// config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// FileProvider authority the native layer uses to sanction URIs handed
    /// to VIEW intents. When unset, the native layer derives one from the
    /// application id.
    pub fileprovider_authority: Option<String>,
}

/// Grant status of a platform permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PermissionState {
    Granted,
    Denied,
    /// Not requested yet; asking would show the platform prompt.
    Prompt,
}

impl PermissionState {
    pub fn is_granted(self) -> bool {
        matches!(self, PermissionState::Granted)
    }
}

//! Platform-neutral share-target handling for Skiff.
//!
//! This crate holds the logic that does not depend on Tauri or on any
//! native mobile layer:
//!
//! - [`IntentHandler`]: the single-slot buffer that receives incoming
//!   "share a file with Skiff" events and hands their outcome to the
//!   application on demand
//! - [`UriResolver`]: the contract for turning an opaque content URI into
//!   a local file path
//! - [`fs`]: downloads-directory and file-opening helpers for platforms
//!   without a native sharing layer
//!
//! The `tauri-plugin-skiffshare` crate wires these to the platform.

mod error;
mod intent;

pub mod fs;

pub use error::{Result, SkiffshareError};
pub use intent::{
    ClipItem, IntentHandler, ShareEvent, UriResolver, ACTION_SEND, ACTION_SEND_MULTIPLE,
    UNRECOGNISED_TARGET_MSG,
};

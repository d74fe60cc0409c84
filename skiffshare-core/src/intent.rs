//! Incoming share intent handling.
//!
//! Other apps share files with Skiff through the platform's share sheet.
//! The platform delivers those intents asynchronously, on whatever thread
//! it pleases, while the application consumes them by polling. The
//! [`IntentHandler`] in between is a single-slot buffer: each incoming
//! single-item share overwrites whatever was pending, and reading the slot
//! empties it.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, SkiffshareError};

/// Intent action for sharing a single item.
pub const ACTION_SEND: &str = "android.intent.action.SEND";

/// Intent action for sharing several items at once.
pub const ACTION_SEND_MULTIPLE: &str = "android.intent.action.SEND_MULTIPLE";

/// Shown when a share event carries nothing we can treat as a file.
/// Existing UI matches on this text, so it must stay as is.
pub const UNRECOGNISED_TARGET_MSG: &str = "Your share target cannot be recognised as a file. \
     If it is indeed one, please try selecting it via the file chooser instead.";

/// A share intent, as serialized by the native layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareEvent {
    /// The intent's action string, e.g. [`ACTION_SEND`].
    pub action: String,
    /// The intent's direct data URI, if it carries one.
    pub data: Option<String>,
    /// The ClipData items, the fallback location for the shared URI.
    #[serde(default)]
    pub clip_items: Option<Vec<ClipItem>>,
}

/// One item of an intent's ClipData payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipItem {
    pub uri: Option<String>,
}

/// Turns an opaque platform file reference into a local filesystem path.
///
/// On mobile this is backed by the native layer's content resolver, which
/// may fail if the reference has expired or the app is not allowed to read
/// it. Resolution may perform I/O.
pub trait UriResolver {
    fn resolve(&self, uri: &str) -> Result<PathBuf>;
}

/// What the single-slot buffer currently holds.
#[derive(Debug, Default)]
enum Slot {
    #[default]
    Empty,
    Ready(PathBuf),
    Failed(String),
}

/// Receives incoming share events and hands their outcome to the
/// application on demand.
///
/// Events arrive via [`IntentHandler::handle_incoming_event`] and are
/// consumed via [`IntentHandler::pop`]. Only the most recent outcome is
/// kept; an unconsumed path or error is silently replaced by the next
/// event. The two call sites are not guaranteed to run on the same thread,
/// so the slot sits behind a mutex.
pub struct IntentHandler<U> {
    slot: Mutex<Slot>,
    resolver: U,
}

impl<U: UriResolver> IntentHandler<U> {
    /// Creates a handler with an empty buffer and no other side effects.
    pub fn new(resolver: U) -> Self {
        Self {
            slot: Mutex::new(Slot::Empty),
            resolver,
        }
    }

    /// Classifies an incoming share event and updates the buffer.
    ///
    /// Single-item sends are processed. Multi-item sends are acknowledged
    /// but not captured: receiving several files at once is not supported.
    /// Intents with any other action are ignored.
    ///
    /// A resolver failure is not caught here; it propagates to the caller
    /// and leaves the buffer empty.
    pub fn handle_incoming_event(&self, event: &ShareEvent) -> Result<()> {
        match event.action.as_str() {
            ACTION_SEND => self.handle_single_send(event),
            ACTION_SEND_MULTIPLE => {
                debug!("ignoring a send-multiple intent");
                Ok(())
            }
            other => {
                // TODO: surface unrecognised actions to the user?
                debug!("ignoring an intent with action {:?}", other);
                Ok(())
            }
        }
    }

    fn handle_single_send(&self, event: &ShareEvent) -> Result<()> {
        // A new event always starts from a clean slate, whether or not the
        // previous outcome has been consumed.
        self.clear();

        let Some(uri) = extract_uri(event) else {
            warn!("share event carries no usable file reference");
            *self.lock_slot() = Slot::Failed(UNRECOGNISED_TARGET_MSG.to_string());
            return Ok(());
        };

        // Resolution may block on I/O, so it runs outside the lock.
        let path = self.resolver.resolve(&uri)?;
        debug!("shared file resolved to {}", path.display());
        *self.lock_slot() = Slot::Ready(path);
        Ok(())
    }

    /// Takes the pending outcome out of the buffer.
    ///
    /// Returns the resolved path if a share is pending, raises the stored
    /// error if the last share target could not be recognised, and yields
    /// nothing otherwise. The buffer is empty afterwards in every case.
    pub fn pop(&self) -> Result<Option<PathBuf>> {
        match std::mem::take(&mut *self.lock_slot()) {
            Slot::Empty => Ok(None),
            Slot::Ready(path) => Ok(Some(path)),
            Slot::Failed(message) => Err(SkiffshareError::InvalidShareTarget(message)),
        }
    }

    fn clear(&self) {
        let mut slot = self.lock_slot();
        if !matches!(*slot, Slot::Empty) {
            warn!("discarding an unconsumed share outcome");
        }
        *slot = Slot::Empty;
    }

    fn lock_slot(&self) -> MutexGuard<'_, Slot> {
        // A poisoned lock only means a writer panicked; the slot itself is
        // a plain value and stays usable.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The direct data URI if present, otherwise the first ClipData item's.
fn extract_uri(event: &ShareEvent) -> Option<String> {
    if let Some(uri) = &event.data {
        return Some(uri.clone());
    }
    event.clip_items.as_ref()?.first()?.uri.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Maps any URI to a path under /tmp and records every call. URIs under
    /// the `content://broken/` authority fail to resolve.
    struct MockResolver {
        calls: Mutex<Vec<String>>,
    }

    impl MockResolver {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl UriResolver for &MockResolver {
        fn resolve(&self, uri: &str) -> Result<PathBuf> {
            self.calls.lock().unwrap().push(uri.to_string());
            if uri.starts_with("content://broken/") {
                return Err(SkiffshareError::UriResolution("reference expired".into()));
            }
            let name = uri.rsplit('/').next().unwrap_or(uri);
            Ok(PathBuf::from("/tmp").join(name))
        }
    }

    fn send_event(data: Option<&str>, clip_items: Option<Vec<ClipItem>>) -> ShareEvent {
        ShareEvent {
            action: ACTION_SEND.into(),
            data: data.map(Into::into),
            clip_items,
        }
    }

    fn clip_item(uri: &str) -> ClipItem {
        ClipItem {
            uri: Some(uri.into()),
        }
    }

    #[test]
    fn test_pop_on_fresh_handler_returns_none() {
        let resolver = MockResolver::new();
        let handler = IntentHandler::new(&resolver);

        assert!(handler.pop().unwrap().is_none());
        assert!(handler.pop().unwrap().is_none());
        assert!(resolver.calls().is_empty());
    }

    #[test]
    fn test_direct_data_uri_is_resolved_and_popped() {
        let resolver = MockResolver::new();
        let handler = IntentHandler::new(&resolver);

        handler
            .handle_incoming_event(&send_event(Some("content://media/photo.jpg"), None))
            .unwrap();

        assert_eq!(handler.pop().unwrap(), Some(PathBuf::from("/tmp/photo.jpg")));
        assert_eq!(resolver.calls(), vec!["content://media/photo.jpg"]);
    }

    #[test]
    fn test_pop_empties_the_buffer() {
        let resolver = MockResolver::new();
        let handler = IntentHandler::new(&resolver);

        handler
            .handle_incoming_event(&send_event(Some("content://media/photo.jpg"), None))
            .unwrap();

        assert!(handler.pop().unwrap().is_some());
        assert!(handler.pop().unwrap().is_none());
    }

    #[test]
    fn test_clip_data_fallback_uses_the_first_item() {
        let resolver = MockResolver::new();
        let handler = IntentHandler::new(&resolver);

        let clip = vec![clip_item("content://clip/first.pdf"), clip_item("content://clip/second.pdf")];
        handler
            .handle_incoming_event(&send_event(None, Some(clip)))
            .unwrap();

        assert_eq!(handler.pop().unwrap(), Some(PathBuf::from("/tmp/first.pdf")));
        assert_eq!(resolver.calls(), vec!["content://clip/first.pdf"]);
    }

    #[test]
    fn test_direct_data_takes_precedence_over_clip_data() {
        let resolver = MockResolver::new();
        let handler = IntentHandler::new(&resolver);

        let clip = vec![clip_item("content://clip/ignored.png")];
        handler
            .handle_incoming_event(&send_event(Some("content://media/direct.png"), Some(clip)))
            .unwrap();

        assert_eq!(resolver.calls(), vec!["content://media/direct.png"]);
    }

    #[test]
    fn test_event_without_any_reference_stores_the_fixed_error() {
        let resolver = MockResolver::new();
        let handler = IntentHandler::new(&resolver);

        handler
            .handle_incoming_event(&send_event(None, None))
            .unwrap();

        let err = handler.pop().unwrap_err();
        assert_eq!(err.to_string(), UNRECOGNISED_TARGET_MSG);
        assert!(resolver.calls().is_empty());

        // The error is consumed along with the slot.
        assert!(handler.pop().unwrap().is_none());
    }

    #[test]
    fn test_empty_clip_payload_is_rejected() {
        let resolver = MockResolver::new();
        let handler = IntentHandler::new(&resolver);

        handler
            .handle_incoming_event(&send_event(None, Some(Vec::new())))
            .unwrap();

        let err = handler.pop().unwrap_err();
        assert_eq!(err.to_string(), UNRECOGNISED_TARGET_MSG);
    }

    #[test]
    fn test_clip_item_without_uri_is_rejected() {
        let resolver = MockResolver::new();
        let handler = IntentHandler::new(&resolver);

        handler
            .handle_incoming_event(&send_event(None, Some(vec![ClipItem { uri: None }])))
            .unwrap();

        assert_eq!(
            handler.pop().unwrap_err().to_string(),
            UNRECOGNISED_TARGET_MSG
        );
    }

    #[test]
    fn test_last_write_wins_across_events() {
        let resolver = MockResolver::new();
        let handler = IntentHandler::new(&resolver);

        handler
            .handle_incoming_event(&send_event(Some("content://media/old.jpg"), None))
            .unwrap();
        handler
            .handle_incoming_event(&send_event(Some("content://media/new.jpg"), None))
            .unwrap();

        assert_eq!(handler.pop().unwrap(), Some(PathBuf::from("/tmp/new.jpg")));
        assert!(handler.pop().unwrap().is_none());
    }

    #[test]
    fn test_new_event_replaces_a_pending_error() {
        let resolver = MockResolver::new();
        let handler = IntentHandler::new(&resolver);

        handler
            .handle_incoming_event(&send_event(None, None))
            .unwrap();
        handler
            .handle_incoming_event(&send_event(Some("content://media/ok.jpg"), None))
            .unwrap();

        assert_eq!(handler.pop().unwrap(), Some(PathBuf::from("/tmp/ok.jpg")));
    }

    #[test]
    fn test_new_unrecognised_event_replaces_a_pending_path() {
        let resolver = MockResolver::new();
        let handler = IntentHandler::new(&resolver);

        handler
            .handle_incoming_event(&send_event(Some("content://media/ok.jpg"), None))
            .unwrap();
        handler
            .handle_incoming_event(&send_event(None, None))
            .unwrap();

        assert_eq!(
            handler.pop().unwrap_err().to_string(),
            UNRECOGNISED_TARGET_MSG
        );
    }

    #[test]
    fn test_send_multiple_is_acknowledged_without_capture() {
        let resolver = MockResolver::new();
        let handler = IntentHandler::new(&resolver);

        handler
            .handle_incoming_event(&ShareEvent {
                action: ACTION_SEND_MULTIPLE.into(),
                data: Some("content://media/one-of-many.jpg".into()),
                clip_items: None,
            })
            .unwrap();

        assert!(handler.pop().unwrap().is_none());
        assert!(resolver.calls().is_empty());
    }

    #[test]
    fn test_send_multiple_leaves_a_pending_share_alone() {
        let resolver = MockResolver::new();
        let handler = IntentHandler::new(&resolver);

        handler
            .handle_incoming_event(&send_event(Some("content://media/kept.jpg"), None))
            .unwrap();
        handler
            .handle_incoming_event(&ShareEvent {
                action: ACTION_SEND_MULTIPLE.into(),
                data: None,
                clip_items: None,
            })
            .unwrap();

        assert_eq!(handler.pop().unwrap(), Some(PathBuf::from("/tmp/kept.jpg")));
    }

    #[test]
    fn test_unrelated_actions_are_ignored() {
        let resolver = MockResolver::new();
        let handler = IntentHandler::new(&resolver);

        handler
            .handle_incoming_event(&ShareEvent {
                action: "android.intent.action.MAIN".into(),
                data: None,
                clip_items: None,
            })
            .unwrap();

        assert!(handler.pop().unwrap().is_none());
        assert!(resolver.calls().is_empty());
    }

    #[test]
    fn test_resolver_failure_propagates_and_leaves_the_buffer_empty() {
        let resolver = MockResolver::new();
        let handler = IntentHandler::new(&resolver);

        let err = handler
            .handle_incoming_event(&send_event(Some("content://broken/gone.jpg"), None))
            .unwrap_err();
        assert!(matches!(err, SkiffshareError::UriResolution(_)));

        assert!(handler.pop().unwrap().is_none());
    }

    #[test]
    fn test_resolver_failure_discards_a_pending_share() {
        let resolver = MockResolver::new();
        let handler = IntentHandler::new(&resolver);

        handler
            .handle_incoming_event(&send_event(Some("content://media/ok.jpg"), None))
            .unwrap();
        handler
            .handle_incoming_event(&send_event(Some("content://broken/gone.jpg"), None))
            .unwrap_err();

        // The slot is cleared before resolution is attempted, so the earlier
        // share does not survive the failed event.
        assert!(handler.pop().unwrap().is_none());
    }

    #[test]
    fn test_share_event_deserializes_from_the_native_wire_shape() {
        let event: ShareEvent = serde_json::from_str(
            r#"{"action":"android.intent.action.SEND","clipItems":[{"uri":"content://clip/a.txt"}]}"#,
        )
        .unwrap();

        assert_eq!(event.action, ACTION_SEND);
        assert!(event.data.is_none());
        assert_eq!(
            event.clip_items.unwrap()[0].uri.as_deref(),
            Some("content://clip/a.txt")
        );
    }
}

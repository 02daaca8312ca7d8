//! The clipboard capture queue.
//!
//! Copied fragments accumulate here until the user flushes them to the system
//! clipboard as one combined document. The in-memory queue is mirrored to a
//! session-scoped store after every mutation so a reload within the same
//! session restores it. Items are immutable once enqueued; the queue is only
//! ever cleared in full, and only after a flush actually succeeded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::ExportError;
use crate::messages::{parse_capture_event, CaptureEvent};
use crate::normalize::normalize;

/// Well-known session store key for the serialized queue.
pub const STORAGE_KEY: &str = "chatmd_capture_queue";

/// One captured fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureItem {
    /// Capture origin: `copy`, `cut`, `writeText`, `write`
    pub kind: String,
    pub text: String,
    pub captured_at: DateTime<Utc>,
}

/// Session-scoped key/value storage for the queue mirror.
pub trait SessionStore {
    fn load(&self, key: &str) -> Result<Option<String>, ExportError>;
    fn save(&mut self, key: &str, value: &str) -> Result<(), ExportError>;
}

/// In-memory store, for tests and embedding hosts with their own persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, ExportError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), ExportError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed store: one JSON file per key under a session directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        JsonFileStore { dir: dir.into() }
    }

    /// Default session directory under the OS temp dir, gone with the session.
    pub fn session_default() -> Self {
        JsonFileStore::at(std::env::temp_dir().join("chatmd-session"))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SessionStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<String>, ExportError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ExportError::Store(e.to_string())),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), ExportError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| ExportError::Store(e.to_string()))?;
        std::fs::write(self.path_for(key), value).map_err(|e| ExportError::Store(e.to_string()))
    }
}

/// Destination of a flush.
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<(), ExportError>;
}

/// Shape of the combined flush document.
#[derive(Debug, Clone, PartialEq)]
pub struct FlushFormat {
    /// Heading line over the combined document
    pub banner: String,
    /// Separator between items
    pub separator: String,
}

impl Default for FlushFormat {
    fn default() -> Self {
        FlushFormat {
            banner: concat!("chatmd v", env!("CARGO_PKG_VERSION")).to_string(),
            separator: "\n\n".to_string(),
        }
    }
}

/// The capture queue itself.
#[derive(Debug, Default)]
pub struct CaptureQueue {
    items: Vec<CaptureItem>,
    format: FlushFormat,
}

impl CaptureQueue {
    pub fn new() -> Self {
        CaptureQueue::default()
    }

    pub fn with_format(format: FlushFormat) -> Self {
        CaptureQueue {
            items: Vec::new(),
            format,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[CaptureItem] {
        &self.items
    }

    /// Restore the mirrored queue from a previous page of the same session.
    /// A missing or corrupt mirror restores to empty; never an error.
    pub fn restore(&mut self, store: &dyn SessionStore) {
        match store.load(STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CaptureItem>>(&raw) {
                Ok(items) => self.items = items,
                Err(e) => tracing::debug!(error = %e, "ignoring corrupt queue mirror"),
            },
            Ok(None) => {}
            Err(e) => tracing::debug!(error = %e, "ignoring unreadable queue mirror"),
        }
    }

    /// Append a capture. Text is normalized first; captures that normalize to
    /// nothing are dropped. Returns whether an item was enqueued.
    pub fn enqueue(&mut self, kind: &str, text: &str, store: &mut dyn SessionStore) -> bool {
        let clean = normalize(text);
        if clean.is_empty() {
            return false;
        }
        self.items.push(CaptureItem {
            kind: kind.to_string(),
            text: clean,
            captured_at: Utc::now(),
        });
        self.mirror(store);
        true
    }

    /// Feed a raw channel message; non-capture traffic is ignored.
    pub fn apply_event(&mut self, value: &serde_json::Value, store: &mut dyn SessionStore) -> bool {
        match parse_capture_event(value) {
            Some(CaptureEvent { kind, payload, .. }) => {
                self.enqueue(&kind, &payload.text, store)
            }
            None => false,
        }
    }

    /// The combined document a flush writes: banner heading, then items
    /// labeled Q/A by alternating position.
    pub fn render_flush_document(&self) -> String {
        let labeled: Vec<String> = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let label = if i % 2 == 0 { "Q" } else { "A" };
                format!("**{label}:** {}", item.text)
            })
            .collect();
        format!(
            "## {}{}{}",
            self.format.banner,
            self.format.separator,
            labeled.join(&self.format.separator)
        )
    }

    /// Write the combined document to the clipboard, then clear.
    ///
    /// The clear happens only after the sink accepted the write; a denied
    /// write leaves the queue (and its mirror) untouched so the user can
    /// retry. An empty queue flushes to nothing without touching the sink.
    pub fn flush(
        &mut self,
        sink: &mut dyn ClipboardSink,
        store: &mut dyn SessionStore,
    ) -> Result<String, ExportError> {
        if self.items.is_empty() {
            return Ok(String::new());
        }
        let document = self.render_flush_document();
        sink.write_text(&document)?;
        self.items.clear();
        self.mirror(store);
        Ok(document)
    }

    /// Mirror the queue to the session store. Mirror trouble is logged and
    /// swallowed: the in-memory queue stays authoritative for this page.
    fn mirror(&self, store: &mut dyn SessionStore) {
        match serde_json::to_string(&self.items) {
            Ok(raw) => {
                if let Err(e) = store.save(STORAGE_KEY, &raw) {
                    tracing::warn!(error = %e, "failed to mirror capture queue");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize capture queue"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::CAPTURE_EVENT_TYPE;
    use serde_json::json;

    #[derive(Default)]
    struct RecordingSink {
        writes: Vec<String>,
    }

    impl ClipboardSink for RecordingSink {
        fn write_text(&mut self, text: &str) -> Result<(), ExportError> {
            self.writes.push(text.to_string());
            Ok(())
        }
    }

    struct DenyingSink;

    impl ClipboardSink for DenyingSink {
        fn write_text(&mut self, _text: &str) -> Result<(), ExportError> {
            Err(ExportError::Clipboard("write denied".to_string()))
        }
    }

    #[test]
    fn enqueue_normalizes_and_drops_empty_captures() {
        let mut store = MemoryStore::new();
        let mut queue = CaptureQueue::new();
        assert!(queue.enqueue("copy", "  hello\u{00A0}world \r\n", &mut store));
        assert!(!queue.enqueue("copy", "   \n  ", &mut store));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.items()[0].text, "hello world");
    }

    #[test]
    fn mirror_restores_in_capture_order() {
        let mut store = MemoryStore::new();
        let mut queue = CaptureQueue::new();
        queue.enqueue("copy", "first", &mut store);
        queue.enqueue("cut", "second", &mut store);
        queue.enqueue("writeText", "third", &mut store);

        let mut restored = CaptureQueue::new();
        restored.restore(&store);
        let texts: Vec<&str> = restored.items().iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert_eq!(restored.items()[1].kind, "cut");
    }

    #[test]
    fn restore_tolerates_missing_and_corrupt_mirrors() {
        let mut queue = CaptureQueue::new();
        queue.restore(&MemoryStore::new());
        assert!(queue.is_empty());

        let mut store = MemoryStore::new();
        store.save(STORAGE_KEY, "not json at all").unwrap();
        queue.restore(&store);
        assert!(queue.is_empty());
    }

    #[test]
    fn flush_document_alternates_question_and_answer_labels() {
        let mut store = MemoryStore::new();
        let mut queue = CaptureQueue::with_format(FlushFormat {
            banner: "banner".to_string(),
            separator: "\n\n".to_string(),
        });
        queue.enqueue("copy", "what is it", &mut store);
        queue.enqueue("copy", "it is this", &mut store);
        queue.enqueue("copy", "and also", &mut store);
        assert_eq!(
            queue.render_flush_document(),
            "## banner\n\n**Q:** what is it\n\n**A:** it is this\n\n**Q:** and also"
        );
    }

    #[test]
    fn successful_flush_clears_queue_and_mirror() {
        let mut store = MemoryStore::new();
        let mut queue = CaptureQueue::new();
        queue.enqueue("copy", "a", &mut store);
        queue.enqueue("copy", "b", &mut store);

        let mut sink = RecordingSink::default();
        let doc = queue.flush(&mut sink, &mut store).unwrap();
        assert_eq!(sink.writes, vec![doc]);
        assert!(queue.is_empty());
        assert_eq!(store.load(STORAGE_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn denied_flush_leaves_queue_and_mirror_unchanged() {
        let mut store = MemoryStore::new();
        let mut queue = CaptureQueue::new();
        queue.enqueue("copy", "a", &mut store);
        queue.enqueue("copy", "b", &mut store);
        let mirror_before = store.load(STORAGE_KEY).unwrap();

        let err = queue.flush(&mut DenyingSink, &mut store).unwrap_err();
        assert!(matches!(err, ExportError::Clipboard(_)));
        assert_eq!(queue.len(), 2, "queue not partially cleared");
        assert_eq!(store.load(STORAGE_KEY).unwrap(), mirror_before);
    }

    #[test]
    fn empty_flush_is_a_no_op() {
        let mut store = MemoryStore::new();
        let mut queue = CaptureQueue::new();
        let mut sink = RecordingSink::default();
        assert_eq!(queue.flush(&mut sink, &mut store).unwrap(), "");
        assert!(sink.writes.is_empty());
    }

    #[test]
    fn apply_event_filters_on_the_marker_tag() {
        let mut store = MemoryStore::new();
        let mut queue = CaptureQueue::new();

        let capture = json!({
            "type": CAPTURE_EVENT_TYPE,
            "kind": "copy",
            "payload": {"text": "picked up"},
            "ts": 1_754_500_000_000i64,
        });
        assert!(queue.apply_event(&capture, &mut store));

        let foreign = json!({"type": "unrelated", "kind": "copy", "payload": {"text": "x"}, "ts": 0});
        assert!(!queue.apply_event(&foreign, &mut store));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn file_store_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::at(dir.path());
        let mut queue = CaptureQueue::new();
        queue.enqueue("copy", "persisted", &mut store);

        let mut restored = CaptureQueue::new();
        restored.restore(&JsonFileStore::at(dir.path()));
        assert_eq!(restored.len(), 1);
        assert_eq!(restored.items()[0].text, "persisted");
    }
}

//! # Durable Store
//!
//! Persistence for the memory document. Every save rewrites the whole
//! document; concurrent writers are last-write-wins.

use super::document::MemoryDocument;
use crate::error::MemoryError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::fs;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Load the persisted document, falling back to an empty one.
    ///
    /// Never fails: a missing or unparseable copy is replaced by a fresh
    /// document, which is persisted immediately.
    async fn load(&self) -> MemoryDocument;

    /// Overwrite the persisted copy with `doc`.
    async fn save(&self, doc: &MemoryDocument) -> Result<(), MemoryError>;

    /// Human-readable location, for logs
    fn location(&self) -> String;
}

/// JSON file at a fixed path
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read(&self) -> Result<Option<MemoryDocument>, MemoryError> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(MemoryError::io(&self.path, e)),
        }
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn load(&self) -> MemoryDocument {
        match self.read().await {
            Ok(Some(doc)) => {
                tracing::debug!(
                    "Loaded memory from {:?}: {} users, {} conversations",
                    self.path,
                    doc.users.len(),
                    doc.conversations.len()
                );
                return doc;
            }
            Ok(None) => tracing::info!("No memory at {:?}, starting empty", self.path),
            Err(e) => tracing::warn!("Discarding unreadable memory at {:?}: {}", self.path, e),
        }

        let doc = MemoryDocument::default();
        if let Err(e) = self.save(&doc).await {
            tracing::warn!("Failed to initialize memory file: {}", e);
        }
        doc
    }

    async fn save(&self, doc: &MemoryDocument) -> Result<(), MemoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| MemoryError::io(parent, e))?;
            }
        }

        let content = serde_json::to_string_pretty(doc)?;
        fs::write(&self.path, content)
            .await
            .map_err(|e| MemoryError::io(&self.path, e))?;

        tracing::debug!("Persisted memory to {:?}", self.path);
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Non-persistent store holding the last saved document
#[derive(Debug, Default)]
pub struct InMemoryStore {
    saved: Mutex<Option<MemoryDocument>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing document
    pub fn with_document(doc: MemoryDocument) -> Self {
        Self {
            saved: Mutex::new(Some(doc)),
        }
    }

    /// The most recently saved document, if any
    pub fn snapshot(&self) -> Option<MemoryDocument> {
        self.saved.lock().ok().and_then(|saved| saved.clone())
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn load(&self) -> MemoryDocument {
        self.snapshot().unwrap_or_default()
    }

    async fn save(&self, doc: &MemoryDocument) -> Result<(), MemoryError> {
        let mut saved = self
            .saved
            .lock()
            .map_err(|e| MemoryError::Unavailable(format!("Lock error: {}", e)))?;
        *saved = Some(doc.clone());
        Ok(())
    }

    fn location(&self) -> String {
        "in-memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::conversation::ConversationEntry;
    use chrono::Utc;

    #[tokio::test]
    async fn test_missing_file_creates_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("memory.json");
        let store = JsonFileStore::new(&path);

        let doc = store.load().await;
        assert_eq!(doc, MemoryDocument::default());
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::new(&path);
        let doc = store.load().await;
        assert!(doc.users.is_empty());

        let rewritten = std::fs::read_to_string(&path).unwrap();
        let parsed: MemoryDocument = serde_json::from_str(&rewritten).unwrap();
        assert_eq!(parsed, MemoryDocument::default());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("memory.json"));

        let mut doc = MemoryDocument::default();
        doc.conversations
            .append(ConversationEntry::new("u1", "hi", "hello", Utc::now()), 100);
        store.save(&doc).await.unwrap();

        let loaded = store.load().await;
        assert_eq!(loaded.conversations.len(), 1);
        assert_eq!(loaded, doc);
    }

    #[tokio::test]
    async fn test_save_into_unwritable_location_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").unwrap();

        let store = JsonFileStore::new(blocker.join("memory.json"));
        let result = store.save(&MemoryDocument::default()).await;
        assert!(matches!(result, Err(MemoryError::Persistence { .. })));
    }

    #[tokio::test]
    async fn test_in_memory_store() {
        let store = InMemoryStore::new();
        assert!(store.snapshot().is_none());
        assert_eq!(store.load().await, MemoryDocument::default());

        let mut doc = MemoryDocument::default();
        doc.users.upsert("u1", Default::default(), Utc::now());
        store.save(&doc).await.unwrap();
        assert_eq!(store.snapshot().unwrap().users.len(), 1);
    }
}

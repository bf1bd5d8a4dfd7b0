//! Document store collaborator and a local JSON-file implementation

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use super::subscription::{Listeners, Subscription};
use crate::error::{AppError, Result};

const STORE_FILE: &str = "store.json";

#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

pub type SnapshotListener = Box<dyn Fn(Vec<Document>) + Send + Sync>;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fires once immediately with the collection contents, then after
    /// every write to it.
    fn subscribe(&self, collection: &str, listener: SnapshotListener) -> Subscription;

    /// Create or replace a document. `timestamp_field`, when given, is
    /// stamped with the server time.
    async fn set(
        &self,
        collection: &str,
        id: &str,
        data: Value,
        timestamp_field: Option<&str>,
    ) -> Result<()>;

    async fn delete(&self, collection: &str, id: &str) -> Result<()>;

    /// Insert with a store-assigned id, returned on success
    async fn add(&self, collection: &str, data: Value, timestamp_field: Option<&str>) -> Result<String>;
}

type Collections = BTreeMap<String, BTreeMap<String, Value>>;

pub struct LocalStore {
    path: PathBuf,
    collections: Mutex<Collections>,
    listeners: Listeners<(String, Vec<Document>)>,
    sequence: AtomicU64,
}

impl LocalStore {
    pub fn new(data_dir: &Path) -> Self {
        let path = data_dir.join(STORE_FILE);
        let collections = load_collections(&path);
        tracing::debug!(path = %path.display(), collections = collections.len(), "Document store opened");
        Self {
            path,
            collections: Mutex::new(collections),
            listeners: Listeners::new(),
            sequence: AtomicU64::new(0),
        }
    }

    fn collections(&self) -> MutexGuard<'_, Collections> {
        self.collections.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Ids sort in creation order
    fn new_document_id(&self) -> String {
        format!(
            "{:013}-{:06}",
            chrono::Utc::now().timestamp_millis(),
            self.sequence.fetch_add(1, Ordering::Relaxed)
        )
    }

    fn snapshot(&self, collection: &str) -> Vec<Document> {
        snapshot_of(&self.collections(), collection)
    }

    /// Apply a mutation, write the file and notify the collection's listeners.
    fn write(&self, collection: &str, mutate: impl FnOnce(&mut BTreeMap<String, Value>)) -> Result<()> {
        let (content, snapshot) = {
            let mut collections = self.collections();
            mutate(collections.entry(collection.to_string()).or_default());
            let content = serde_json::to_string(&*collections)
                .map_err(|e| AppError::Storage(e.to_string()))?;
            (content, snapshot_of(&collections, collection))
        };

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| AppError::Storage(e.to_string()))?;
        }
        fs::write(&self.path, content).map_err(|e| AppError::Storage(e.to_string()))?;

        self.listeners.notify(&(collection.to_string(), snapshot));
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for LocalStore {
    fn subscribe(&self, collection: &str, listener: SnapshotListener) -> Subscription {
        listener(self.snapshot(collection));
        let collection = collection.to_string();
        self.listeners.add(move |(written, documents)| {
            if *written == collection {
                listener(documents.clone());
            }
        })
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        data: Value,
        timestamp_field: Option<&str>,
    ) -> Result<()> {
        let data = stamp(data, timestamp_field);
        tracing::debug!(collection, id, "Setting document");
        self.write(collection, |docs| {
            docs.insert(id.to_string(), data);
        })
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        tracing::debug!(collection, id, "Deleting document");
        self.write(collection, |docs| {
            docs.remove(id);
        })
    }

    async fn add(&self, collection: &str, data: Value, timestamp_field: Option<&str>) -> Result<String> {
        let id = self.new_document_id();
        let data = stamp(data, timestamp_field);
        tracing::debug!(collection, id = %id, "Adding document");
        self.write(collection, |docs| {
            docs.insert(id.clone(), data);
        })?;
        Ok(id)
    }
}

pub type SharedStore = Arc<dyn DocumentStore>;

fn snapshot_of(collections: &Collections, collection: &str) -> Vec<Document> {
    collections
        .get(collection)
        .map(|docs| {
            docs.iter()
                .map(|(id, data)| Document {
                    id: id.clone(),
                    data: data.clone(),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn stamp(mut data: Value, timestamp_field: Option<&str>) -> Value {
    if let (Some(field), Some(object)) = (timestamp_field, data.as_object_mut()) {
        object.insert(field.to_string(), Value::String(chrono::Utc::now().to_rfc3339()));
    }
    data
}

fn load_collections(path: &Path) -> Collections {
    let Ok(content) = fs::read_to_string(path) else {
        return Collections::new();
    };
    serde_json::from_str(&content).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable store file");
        Collections::new()
    })
}

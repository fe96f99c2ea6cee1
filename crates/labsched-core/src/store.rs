//! Flat-file schedule store.
//!
//! Schedules are stored as bundles: the schedule payload plus caller-supplied
//! metadata (course, day, times, group size, ...). The whole store is one JSON
//! document holding the bundles and the id counter; every write rewrites it.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, StoreError};
use crate::schedule::Schedule;

/// Metadata key holding the bundle identifier.
pub const ID_KEY: &str = "id";

/// A stored schedule and its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleBundle {
    pub schedule: Schedule,
    #[serde(flatten)]
    pub meta: IndexMap<String, Value>,
}

impl ScheduleBundle {
    pub fn new(schedule: Schedule) -> Self {
        Self {
            schedule,
            meta: IndexMap::new(),
        }
    }

    /// Attach a metadata field; `None` is stored as null.
    pub fn with_meta(mut self, key: &str, value: Option<impl Into<Value>>) -> Self {
        self.meta
            .insert(key.to_string(), value.map_or(Value::Null, Into::into));
        self
    }

    /// Metadata value as text. Null and missing fields are `None`.
    pub fn meta_str(&self, key: &str) -> Option<String> {
        match self.meta.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn id(&self) -> Option<String> {
        self.meta_str(ID_KEY)
    }

    fn matches(&self, key: &str, value: &str) -> bool {
        self.meta_str(key).is_some_and(|v| v == value)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    bundles: Vec<ScheduleBundle>,
}

/// Older stores are a bare array of bundles with the counter kept elsewhere.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredShape {
    Document(StoreDocument),
    Bare(Vec<ScheduleBundle>),
}

/// JSON-file store of schedule bundles with auto-incrementing ids.
pub struct ScheduleStore {
    path: PathBuf,
    doc: StoreDocument,
}

impl ScheduleStore {
    /// Open the store at `path`, creating an empty one if it does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            let doc = Self::read(&path)?;
            return Ok(Self { path, doc });
        }

        let store = Self {
            path,
            doc: StoreDocument::default(),
        };
        store.write()?;
        tracing::debug!(path = %store.path.display(), "created empty schedule store");
        Ok(store)
    }

    fn read(path: &Path) -> Result<StoreDocument, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(StoreDocument::default());
        }

        let shape: StoredShape =
            serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(match shape {
            StoredShape::Document(doc) => doc,
            StoredShape::Bare(bundles) => {
                let next_id = bundles.iter().filter_map(numeric_id).max().unwrap_or(0);
                StoreDocument { next_id, bundles }
            }
        })
    }

    fn write(&self) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(&self.doc)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }

    /// Append a bundle, assigning the next id when it has none. Returns the id.
    ///
    /// Numeric ids supplied by the caller advance the counter so later
    /// automatic ids never collide with them.
    pub fn save(&mut self, mut bundle: ScheduleBundle) -> Result<String> {
        let id = match bundle.id() {
            Some(id) => {
                if let Ok(n) = id.parse::<u64>() {
                    self.doc.next_id = self.doc.next_id.max(n);
                }
                id
            }
            None => {
                let last = self.doc.next_id;
                self.doc.next_id = last
                    .checked_add(1)
                    .ok_or(StoreError::IdsExhausted { last })?;
                let id = self.doc.next_id.to_string();
                bundle.meta.insert(ID_KEY.to_string(), Value::String(id.clone()));
                id
            }
        };

        self.doc.bundles.push(bundle);
        self.write()?;
        tracing::info!(id = %id, path = %self.path.display(), "schedule saved");
        Ok(id)
    }

    /// Bundles whose metadata field `key` equals `value`.
    pub fn retrieve(&self, key: &str, value: &str) -> Vec<ScheduleBundle> {
        self.doc
            .bundles
            .iter()
            .filter(|b| b.matches(key, value))
            .cloned()
            .collect()
    }

    /// Remove bundles whose metadata field `key` equals `value`; returns them.
    pub fn delete(&mut self, key: &str, value: &str) -> Result<Vec<ScheduleBundle>> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.doc.bundles)
            .into_iter()
            .partition(|b| b.matches(key, value));
        self.doc.bundles = kept;
        self.write()?;
        tracing::info!(key, value, removed = removed.len(), "schedules deleted");
        Ok(removed)
    }

    pub fn all(&self) -> &[ScheduleBundle] {
        &self.doc.bundles
    }

    pub fn len(&self) -> usize {
        self.doc.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc.bundles.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn numeric_id(bundle: &ScheduleBundle) -> Option<u64> {
    bundle.id()?.parse().ok()
}

//! Local Store: the durable, client-side cache of domain entities.
//!
//! One JSON file per collection under the data directory, flat and
//! filtered by `project_id`. All operations are synchronous and persist
//! immediately, so a process exit never loses the latest write. The
//! store is a cache, not a source of truth: missing entities come back
//! as `Option`/`bool` sentinels, and an unparseable collection file
//! loads as the empty collection and is overwritten by the next
//! successful write.

mod collection;

pub use collection::{Collection, StoredEntity};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::errors::{StoreError, StoreResult};

pub struct LocalStore {
    dir: PathBuf,
    // Serializes read-modify-write cycles across callers sharing the store.
    lock: Mutex<()>,
}

impl LocalStore {
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|_| StoreError::DataDir(dir.clone()))?;
        Ok(Self {
            dir,
            lock: Mutex::new(()),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.dir
    }

    pub fn get<E: StoredEntity>(&self, id: &str) -> Option<E> {
        let _guard = self.lock.lock().unwrap();
        self.load::<E>().into_iter().find(|e| e.id() == id)
    }

    /// Entities for one project, in insertion order.
    pub fn list_by_project<E: StoredEntity>(&self, project_id: &str) -> Vec<E> {
        let _guard = self.lock.lock().unwrap();
        self.load::<E>()
            .into_iter()
            .filter(|e| e.project_id() == project_id)
            .collect()
    }

    pub fn list_all<E: StoredEntity>(&self) -> Vec<E> {
        let _guard = self.lock.lock().unwrap();
        self.load::<E>()
    }

    pub fn contains<E: StoredEntity>(&self, id: &str) -> bool {
        let _guard = self.lock.lock().unwrap();
        self.load::<E>().iter().any(|e| e.id() == id)
    }

    pub fn count_for_project<E: StoredEntity>(&self, project_id: &str) -> usize {
        let _guard = self.lock.lock().unwrap();
        self.load::<E>()
            .iter()
            .filter(|e| e.project_id() == project_id)
            .count()
    }

    /// Insert-if-absent. An empty id gets a fresh uuid; an id already in
    /// the collection is skipped (never overwritten) and the stored copy
    /// is returned, which is what keeps regeneration append-only.
    pub fn insert<E: StoredEntity>(&self, mut entity: E) -> StoreResult<E> {
        let _guard = self.lock.lock().unwrap();
        let mut entries = self.load::<E>();

        if entity.id().is_empty() {
            entity.set_id(Uuid::new_v4().to_string());
        }
        if let Some(existing) = entries.iter().find(|e| e.id() == entity.id()) {
            return Ok(existing.clone());
        }

        entries.push(entity.clone());
        self.persist::<E>(&entries)?;
        Ok(entity)
    }

    /// Upsert: replace the entity with the same id, or append when
    /// absent. Used where a caller has explicitly decided the incoming
    /// copy wins.
    pub fn replace<E: StoredEntity>(&self, entity: E) -> StoreResult<E> {
        let _guard = self.lock.lock().unwrap();
        let mut entries = self.load::<E>();

        match entries.iter_mut().find(|e| e.id() == entity.id()) {
            Some(slot) => *slot = entity.clone(),
            None => entries.push(entity.clone()),
        }
        self.persist::<E>(&entries)?;
        Ok(entity)
    }

    /// Apply a mutation to the entity with the given id. Returns `None`
    /// for a missing id, never an error.
    pub fn update<E, F>(&self, id: &str, mutate: F) -> StoreResult<Option<E>>
    where
        E: StoredEntity,
        F: FnOnce(&mut E),
    {
        let _guard = self.lock.lock().unwrap();
        let mut entries = self.load::<E>();

        let Some(slot) = entries.iter_mut().find(|e| e.id() == id) else {
            return Ok(None);
        };
        mutate(slot);
        slot.touch(Utc::now());
        let updated = slot.clone();

        self.persist::<E>(&entries)?;
        Ok(Some(updated))
    }

    pub fn delete<E: StoredEntity>(&self, id: &str) -> StoreResult<bool> {
        let _guard = self.lock.lock().unwrap();
        let mut entries = self.load::<E>();

        let before = entries.len();
        entries.retain(|e| e.id() != id);
        if entries.len() == before {
            return Ok(false);
        }

        self.persist::<E>(&entries)?;
        Ok(true)
    }

    /// Remove every entity belonging to a project; returns the count
    /// removed. Used by the local cascade on project delete.
    pub fn delete_by_project<E: StoredEntity>(&self, project_id: &str) -> StoreResult<usize> {
        let _guard = self.lock.lock().unwrap();
        let mut entries = self.load::<E>();

        let before = entries.len();
        entries.retain(|e| e.project_id() != project_id);
        let removed = before - entries.len();
        if removed > 0 {
            self.persist::<E>(&entries)?;
        }
        Ok(removed)
    }

    fn load<E: StoredEntity>(&self) -> Vec<E> {
        let path = self.dir.join(E::COLLECTION.file_name());
        read_json_or_default(&path).unwrap_or_else(|err| {
            warn!(
                "{} collection is unreadable, treating as empty: {}",
                E::COLLECTION.display_name(),
                err
            );
            Vec::new()
        })
    }

    fn persist<E: StoredEntity>(&self, entries: &[E]) -> StoreResult<()> {
        let path = self.dir.join(E::COLLECTION.file_name());
        atomic_write_json(&path, entries)
    }
}

/// Read and deserialize a JSON file. A missing file is `Ok(default)`;
/// an unreadable or unparseable file is `Err` so the caller can decide
/// whether to self-heal.
pub(crate) fn read_json_or_default<T: DeserializeOwned + Default>(
    path: &Path,
) -> Result<T, String> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(err) => return Err(err.to_string()),
    };
    serde_json::from_str(&raw).map_err(|err| err.to_string())
}

/// Write JSON through a temp file + rename so a crash mid-write never
/// truncates the collection.
pub(crate) fn atomic_write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> StoreResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

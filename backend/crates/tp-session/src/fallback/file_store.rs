//! File-backed fallback store.
//!
//! All keys live in one JSON object. Every write replaces the whole file:
//! write a temp file, fsync it, then rename over the original, so a crash
//! mid-write leaves either the old or the new document.

use crate::fallback::FallbackStore;
use crate::fallback::error::{Result as StoreResult, StoreError};

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use log::{debug, warn};

const DATE_FORMAT: &str = "%Y%m%d_%H%M%S";

type Document = BTreeMap<String, String>;

#[derive(Debug)]
pub struct FileFallbackStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileFallbackStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file reads as an empty document
    fn read_document(&self) -> StoreResult<Document> {
        if !self.path.exists() {
            return Ok(Document::new());
        }

        let contents = fs::read_to_string(&self.path)
            .map_err(|e| StoreError::file_read(self.path.clone(), e))?;

        if contents.trim().is_empty() {
            return Ok(Document::new());
        }

        serde_json::from_str(&contents)
            .map_err(|e| StoreError::corrupted(self.path.clone(), e.to_string()))
    }

    /// Read for modification; a corrupted document is moved aside and
    /// replaced by an empty one.
    fn read_document_for_update(&self) -> StoreResult<Document> {
        match self.read_document() {
            Err(StoreError::Corrupted { message, .. }) => {
                warn!("Fallback store corrupted at {:?}: {message}", self.path);
                self.backup_corrupted()?;
                Ok(Document::new())
            }
            other => other,
        }
    }

    fn write_document(&self, document: &Document) -> StoreResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| StoreError::dir_creation(dir.clone(), e))?;

        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("session.json"));
        let temp_path = dir.join(format!("{file_name}.tmp.{}", std::process::id()));

        let json = serde_json::to_string_pretty(document)?;

        {
            let mut file = fs::File::create(&temp_path)
                .map_err(|e| StoreError::file_write(temp_path.clone(), e))?;
            file.write_all(json.as_bytes())
                .map_err(|e| StoreError::file_write(temp_path.clone(), e))?;
            file.sync_all()
                .map_err(|e| StoreError::file_write(temp_path.clone(), e))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            StoreError::atomic_rename(temp_path, self.path.clone(), e)
        })?;

        Ok(())
    }

    /// Rename the corrupted file to `<name>.corrupted.<timestamp>`
    fn backup_corrupted(&self) -> StoreResult<Option<PathBuf>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let timestamp = chrono::Utc::now().format(DATE_FORMAT);
        let mut backup = self.path.clone().into_os_string();
        backup.push(format!(".corrupted.{timestamp}"));
        let backup_path = PathBuf::from(backup);

        fs::rename(&self.path, &backup_path)
            .map_err(|e| StoreError::atomic_rename(self.path.clone(), backup_path.clone(), e))?;

        warn!("Backed up corrupted fallback store to {backup_path:?}");
        Ok(Some(backup_path))
    }
}

impl FallbackStore for FileFallbackStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.read_document()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut document = self.read_document_for_update()?;
        document.insert(key.to_string(), value.to_string());
        self.write_document(&document)?;

        debug!("Fallback store: wrote '{key}'");
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut document = self.read_document_for_update()?;
        if document.remove(key).is_none() {
            return Ok(());
        }
        self.write_document(&document)?;

        debug!("Fallback store: removed '{key}'");
        Ok(())
    }
}

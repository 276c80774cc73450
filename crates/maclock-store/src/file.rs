//! JSON-file property store.
//!
//! The whole store is one JSON object (`{"user": {"key": "value"}}`). Every
//! operation re-reads the document so edits made by the admin CLI are seen
//! by a running hook process; every mutation rewrites it through a temporary
//! file and a rename.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use maclock_core::error::{AppError, ErrorKind};
use maclock_core::result::AppResult;
use maclock_core::traits::property_store::UserPropertyStore;
use maclock_core::types::auth::PropertyList;

type Document = BTreeMap<String, PropertyList>;

/// Property store persisted as a JSON document on local disk.
#[derive(Debug)]
pub struct FilePropertyStore {
    /// Location of the JSON document.
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FilePropertyStore {
    /// Opens (or prepares to create) the store at `path`.
    ///
    /// Creates the parent directory and fails early if an existing document
    /// cannot be parsed.
    pub async fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create store directory: {}", parent.display()),
                    e,
                )
            })?;
        }

        let store = Self {
            path,
            lock: Mutex::new(()),
        };
        let users = store.read_document().await?.len();
        info!(path = %store.path.display(), users = users, "File property store opened");
        Ok(store)
    }

    /// Returns the document path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> AppResult<Document> {
        match fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Document::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                AppError::with_source(
                    ErrorKind::Serialization,
                    format!("Corrupt property store: {}", self.path.display()),
                    e,
                )
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Document::new()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to read property store: {}", self.path.display()),
                e,
            )),
        }
    }

    async fn write_document(&self, doc: &Document) -> AppResult<()> {
        let json = serde_json::to_vec_pretty(doc)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write property store: {}", tmp.display()),
                e,
            )
        })?;
        fs::rename(&tmp, &self.path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to replace property store: {}", self.path.display()),
                e,
            )
        })?;
        debug!(path = %self.path.display(), users = doc.len(), "Property store written");
        Ok(())
    }
}

#[async_trait]
impl UserPropertyStore for FilePropertyStore {
    async fn get_properties(&self, username: &str) -> AppResult<PropertyList> {
        let _guard = self.lock.lock().await;
        let mut doc = self.read_document().await?;
        Ok(doc.remove(username).unwrap_or_default())
    }

    async fn put(&self, username: &str, key: &str, value: &str) -> AppResult<()> {
        let _guard = self.lock.lock().await;
        let mut doc = self.read_document().await?;
        doc.entry(username.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        self.write_document(&doc).await
    }

    async fn delete(&self, username: &str, key: &str) -> AppResult<bool> {
        let _guard = self.lock.lock().await;
        let mut doc = self.read_document().await?;
        let Some(props) = doc.get_mut(username) else {
            return Ok(false);
        };
        if props.remove(key).is_none() {
            return Ok(false);
        }
        if props.is_empty() {
            doc.remove(username);
        }
        self.write_document(&doc).await?;
        Ok(true)
    }

    async fn register_if_absent(
        &self,
        username: &str,
        key: &str,
        value: &str,
    ) -> AppResult<bool> {
        let _guard = self.lock.lock().await;
        let mut doc = self.read_document().await?;
        let props = doc.entry(username.to_string()).or_default();
        if props.get(key).is_some_and(|current| !current.is_empty()) {
            return Ok(false);
        }
        props.insert(key.to_string(), value.to_string());
        self.write_document(&doc).await?;
        Ok(true)
    }

    async fn merge(&self, username: &str, properties: &PropertyList) -> AppResult<()> {
        if properties.is_empty() {
            return Ok(());
        }
        let _guard = self.lock.lock().await;
        let mut doc = self.read_document().await?;
        doc.entry(username.to_string())
            .or_default()
            .extend(properties.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.write_document(&doc).await
    }

    async fn list_users(&self) -> AppResult<Vec<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_document().await?.into_keys().collect())
    }
}

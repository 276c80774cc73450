//! In-memory property store using a Tokio mutex for single-process use.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use maclock_core::result::AppResult;
use maclock_core::traits::property_store::UserPropertyStore;
use maclock_core::types::auth::PropertyList;

/// In-memory property store.
///
/// Contents are lost when the process exits. Used by tests and by the
/// `memory` store provider.
#[derive(Debug, Clone, Default)]
pub struct MemoryPropertyStore {
    /// Username → property list.
    users: Arc<Mutex<BTreeMap<String, PropertyList>>>,
}

impl MemoryPropertyStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given users.
    pub fn with_users(users: BTreeMap<String, PropertyList>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }
}

#[async_trait]
impl UserPropertyStore for MemoryPropertyStore {
    async fn get_properties(&self, username: &str) -> AppResult<PropertyList> {
        let users = self.users.lock().await;
        Ok(users.get(username).cloned().unwrap_or_default())
    }

    async fn put(&self, username: &str, key: &str, value: &str) -> AppResult<()> {
        let mut users = self.users.lock().await;
        users
            .entry(username.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        debug!(username = %username, key = %key, "Property stored");
        Ok(())
    }

    async fn delete(&self, username: &str, key: &str) -> AppResult<bool> {
        let mut users = self.users.lock().await;
        let Some(props) = users.get_mut(username) else {
            return Ok(false);
        };
        let existed = props.remove(key).is_some();
        if props.is_empty() {
            users.remove(username);
        }
        Ok(existed)
    }

    async fn register_if_absent(
        &self,
        username: &str,
        key: &str,
        value: &str,
    ) -> AppResult<bool> {
        let mut users = self.users.lock().await;
        let props = users.entry(username.to_string()).or_default();
        if props.get(key).is_some_and(|current| !current.is_empty()) {
            return Ok(false);
        }
        props.insert(key.to_string(), value.to_string());
        debug!(username = %username, key = %key, "Property registered");
        Ok(true)
    }

    async fn merge(&self, username: &str, properties: &PropertyList) -> AppResult<()> {
        if properties.is_empty() {
            return Ok(());
        }
        let mut users = self.users.lock().await;
        users
            .entry(username.to_string())
            .or_default()
            .extend(properties.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(())
    }

    async fn list_users(&self) -> AppResult<Vec<String>> {
        let users = self.users.lock().await;
        Ok(users.keys().cloned().collect())
    }
}

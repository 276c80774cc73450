//! User property store trait.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::auth::PropertyList;

/// Persistent per-user property storage.
///
/// The post-auth flow reads a user's properties before the hook runs and
/// merges the hook's `proplist_save` afterwards. Administrators use the same
/// store to reset or provision MAC bindings.
///
/// A read followed by a write is not atomic. A first-login binding must go
/// through [`register_if_absent`](Self::register_if_absent), which checks and
/// writes under one lock, so two concurrent first logins cannot both bind.
#[async_trait]
pub trait UserPropertyStore: Send + Sync + 'static {
    /// Return every property of `username` (empty when the user is unknown).
    async fn get_properties(&self, username: &str) -> AppResult<PropertyList>;

    /// Return a single property value.
    async fn get(&self, username: &str, key: &str) -> AppResult<Option<String>> {
        Ok(self.get_properties(username).await?.remove(key))
    }

    /// Set a property, replacing any previous value.
    async fn put(&self, username: &str, key: &str, value: &str) -> AppResult<()>;

    /// Delete a property. Returns whether it existed.
    async fn delete(&self, username: &str, key: &str) -> AppResult<bool>;

    /// Set `key` only if it is missing or empty. Returns whether it was written.
    ///
    /// The check and the write happen under the same lock.
    async fn register_if_absent(
        &self,
        username: &str,
        key: &str,
        value: &str,
    ) -> AppResult<bool>;

    /// Merge several properties for `username` in one write.
    async fn merge(&self, username: &str, properties: &PropertyList) -> AppResult<()>;

    /// List every user that has at least one property, sorted by name.
    async fn list_users(&self) -> AppResult<Vec<String>>;
}

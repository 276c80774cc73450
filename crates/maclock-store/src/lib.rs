//! # maclock-store
//!
//! User property store backends for MacLock:
//!
//! - [`MemoryPropertyStore`]: process-local, for tests and throwaway runs
//! - [`FilePropertyStore`]: JSON document on disk
//!
//! [`open_store`] picks the backend named by the `[store]` config section.

pub mod file;
pub mod memory;

use std::sync::Arc;

use tracing::info;

use maclock_core::config::store::{StoreConfig, StoreProvider};
use maclock_core::result::AppResult;
use maclock_core::traits::property_store::UserPropertyStore;

pub use file::FilePropertyStore;
pub use memory::MemoryPropertyStore;

/// Open the property store selected by configuration.
pub async fn open_store(config: &StoreConfig) -> AppResult<Arc<dyn UserPropertyStore>> {
    let store: Arc<dyn UserPropertyStore> = match config.provider {
        StoreProvider::File => {
            info!(path = %config.path, "Initializing file property store");
            Arc::new(FilePropertyStore::open(&config.path).await?)
        }
        StoreProvider::Memory => {
            info!("Initializing in-memory property store");
            Arc::new(MemoryPropertyStore::new())
        }
    };
    Ok(store)
}

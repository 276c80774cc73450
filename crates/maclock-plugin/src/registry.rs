//! Plugin registry: stores loaded plugin instances and metadata.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use maclock_core::error::AppError;
use maclock_core::result::AppResult;

use crate::hooks::definitions::HookPoint;

/// Metadata about a loaded plugin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginInfo {
    /// Unique plugin identifier.
    pub id: String,
    /// Human-readable plugin name.
    pub name: String,
    /// Plugin version string.
    pub version: String,
    /// Plugin description.
    pub description: String,
    /// Hook points this plugin registers for.
    pub hooks: Vec<HookPoint>,
}

/// Trait that all plugins must implement.
#[async_trait::async_trait]
pub trait Plugin: Send + Sync + std::fmt::Debug {
    /// Returns plugin metadata.
    fn info(&self) -> PluginInfo;

    /// Called once when the plugin is loaded.
    async fn on_load(&self) -> AppResult<()> {
        Ok(())
    }

    /// Called when the plugin is unloaded.
    async fn on_unload(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Registry of all loaded plugins.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    /// Plugin ID → plugin instance.
    plugins: RwLock<HashMap<String, Arc<dyn Plugin>>>,
}

impl PluginRegistry {
    /// Creates a new empty plugin registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plugin. Fails if the ID is already taken.
    pub async fn register(&self, plugin: Arc<dyn Plugin>) -> AppResult<()> {
        let info = plugin.info();
        let mut plugins = self.plugins.write().await;

        if plugins.contains_key(&info.id) {
            return Err(AppError::plugin(format!(
                "Plugin '{}' is already registered",
                info.id
            )));
        }

        info!(
            plugin_id = %info.id,
            name = %info.name,
            version = %info.version,
            "Registering plugin"
        );
        plugins.insert(info.id, plugin);
        Ok(())
    }

    /// Unregisters a plugin by ID.
    pub async fn unregister(&self, plugin_id: &str) -> AppResult<Arc<dyn Plugin>> {
        let mut plugins = self.plugins.write().await;
        let plugin = plugins
            .remove(plugin_id)
            .ok_or_else(|| AppError::not_found(format!("Plugin '{plugin_id}' not found")))?;
        info!(plugin_id = %plugin_id, "Plugin unregistered");
        Ok(plugin)
    }

    /// Lists all registered plugin metadata, sorted by ID.
    pub async fn list(&self) -> Vec<PluginInfo> {
        let plugins = self.plugins.read().await;
        let mut infos: Vec<PluginInfo> = plugins.values().map(|p| p.info()).collect();
        infos.sort_by(|a, b| a.id.cmp(&b.id));
        infos
    }
}

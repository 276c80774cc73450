//! Plugin manager: lifecycle management for compiled-in plugins.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use maclock_core::result::AppResult;

use crate::hooks::definitions::{HookPayload, HookPoint};
use crate::hooks::dispatcher::HookDispatcher;
use crate::hooks::registry::{HookHandler, HookRegistry};
use crate::registry::{Plugin, PluginInfo, PluginRegistry};

/// Manages plugin load/unload and owns the hook dispatcher.
#[derive(Debug)]
pub struct PluginManager {
    /// Plugin registry.
    plugin_registry: Arc<PluginRegistry>,
    /// Hook registry.
    hook_registry: Arc<HookRegistry>,
    /// Hook dispatcher.
    hook_dispatcher: Arc<HookDispatcher>,
}

impl PluginManager {
    /// Creates a new plugin manager whose handlers get `hook_timeout` each.
    pub fn new(hook_timeout: Duration) -> Self {
        let hook_registry = Arc::new(HookRegistry::new());
        let hook_dispatcher = Arc::new(HookDispatcher::new(hook_registry.clone(), hook_timeout));

        Self {
            plugin_registry: Arc::new(PluginRegistry::new()),
            hook_registry,
            hook_dispatcher,
        }
    }

    /// Loads a plugin and registers its hook handlers.
    pub async fn load_plugin(
        &self,
        plugin: Arc<dyn Plugin>,
        handlers: Vec<(HookPoint, Arc<dyn HookHandler>)>,
    ) -> AppResult<()> {
        let info = plugin.info();

        plugin.on_load().await.inspect_err(|e| {
            error!(plugin_id = %info.id, error = %e, "Plugin load failed");
        })?;

        self.plugin_registry.register(plugin).await?;

        for (hook_point, handler) in handlers {
            self.hook_registry.register(hook_point, handler).await;
        }

        info!(
            plugin_id = %info.id,
            name = %info.name,
            version = %info.version,
            hooks = info.hooks.len(),
            "Plugin loaded"
        );

        Ok(())
    }

    /// Unregisters a plugin's hooks and unloads it.
    pub async fn unload_plugin(&self, plugin_id: &str) -> AppResult<()> {
        self.hook_registry.unregister_plugin(plugin_id).await;
        let plugin = self.plugin_registry.unregister(plugin_id).await?;

        if let Err(e) = plugin.on_unload().await {
            warn!(plugin_id = %plugin_id, error = %e, "Plugin unload returned error");
        }

        info!(plugin_id = %plugin_id, "Plugin unloaded");
        Ok(())
    }

    /// Fires `on_server_start` to every plugin.
    pub async fn start(&self) {
        self.hook_dispatcher
            .fire_and_forget(&HookPayload::new(HookPoint::OnServerStart))
            .await;
    }

    /// Fires `on_server_shutdown` and unloads all plugins.
    pub async fn shutdown(&self) {
        self.hook_dispatcher
            .fire_and_forget(&HookPayload::new(HookPoint::OnServerShutdown))
            .await;

        for info in self.plugin_registry.list().await {
            if let Err(e) = self.unload_plugin(&info.id).await {
                error!(plugin_id = %info.id, error = %e, "Error unloading plugin");
            }
        }
    }

    /// Returns the hook dispatcher for firing hooks.
    pub fn dispatcher(&self) -> &Arc<HookDispatcher> {
        &self.hook_dispatcher
    }

    /// Lists all loaded plugins.
    pub async fn list_plugins(&self) -> Vec<PluginInfo> {
        self.plugin_registry.list().await
    }
}

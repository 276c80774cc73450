//! MAC lock plugin: registers the post-auth hook with the plugin manager.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use maclock_core::config::post_auth::PostAuthConfig;
use maclock_core::result::AppResult;
use maclock_plugin::hooks::definitions::HookPoint;
use maclock_plugin::hooks::registry::HookHandler;
use maclock_plugin::manager::PluginManager;
use maclock_plugin::registry::{Plugin, PluginInfo};

use crate::PLUGIN_ID;
use crate::hooks::PostAuthHook;
use crate::policy::Evaluator;

/// Plugin that binds each VPN account to its first-seen MAC address.
#[derive(Debug)]
pub struct MacLockPlugin {
    /// Shared evaluator used by the hook handler.
    evaluator: Arc<Evaluator>,
}

impl MacLockPlugin {
    /// Create the plugin with a fixed policy configuration.
    pub fn new(config: PostAuthConfig) -> Self {
        Self {
            evaluator: Arc::new(Evaluator::new(config)),
        }
    }

    /// Hook handlers to register, keyed by hook point.
    pub fn handlers(&self) -> Vec<(HookPoint, Arc<dyn HookHandler>)> {
        let post_auth: Arc<dyn HookHandler> =
            Arc::new(PostAuthHook::new(Arc::clone(&self.evaluator)));
        vec![(HookPoint::PostAuth, post_auth)]
    }

    /// Load this plugin and its handlers into `manager`.
    pub async fn install(config: PostAuthConfig, manager: &PluginManager) -> AppResult<()> {
        let plugin = Arc::new(Self::new(config));
        let handlers = plugin.handlers();
        manager.load_plugin(plugin, handlers).await
    }
}

#[async_trait]
impl Plugin for MacLockPlugin {
    fn info(&self) -> PluginInfo {
        PluginInfo {
            id: PLUGIN_ID.to_string(),
            name: "MAC address lock".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: "Locks each VPN account to the first MAC address it logs in from"
                .to_string(),
            hooks: vec![HookPoint::PostAuth],
        }
    }

    async fn on_load(&self) -> AppResult<()> {
        let config = self.evaluator.config();
        info!(
            first_login_ip_addr = config.allow_ip().unwrap_or("<any>"),
            synchronous = config.synchronous,
            "MAC lock plugin configured"
        );
        Ok(())
    }
}

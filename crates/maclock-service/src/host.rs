//! Host assembly: configuration, property store, and plugins wired together.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use maclock_core::config::AppConfig;
use maclock_core::result::AppResult;
use maclock_core::traits::property_store::UserPropertyStore;
use maclock_plugin::manager::PluginManager;
use plugin_mac_lock::MacLockPlugin;

use crate::post_auth::PostAuthService;

/// Everything a post-auth run needs, built from one [`AppConfig`].
#[derive(Clone)]
pub struct Host {
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
    /// User property store.
    pub store: Arc<dyn UserPropertyStore>,
    /// Plugin manager owning the hook dispatcher.
    pub plugins: Arc<PluginManager>,
    /// Post-auth orchestration.
    pub post_auth: PostAuthService,
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("config", &self.config)
            .field("plugins", &self.plugins)
            .finish_non_exhaustive()
    }
}

impl Host {
    /// Open the configured store and load the MAC lock plugin.
    pub async fn build(config: AppConfig) -> AppResult<Self> {
        let store = maclock_store::open_store(&config.store).await?;
        Self::with_store(config, store).await
    }

    /// Build a host around an already-open store.
    pub async fn with_store(
        config: AppConfig,
        store: Arc<dyn UserPropertyStore>,
    ) -> AppResult<Self> {
        let timeout = Duration::from_secs(config.post_auth.hook_timeout_seconds);
        let plugins = Arc::new(PluginManager::new(timeout));
        MacLockPlugin::install(config.post_auth.clone(), &plugins).await?;

        let post_auth = PostAuthService::new(Arc::clone(&store), Arc::clone(plugins.dispatcher()));

        info!(
            store = %config.store.provider,
            hook_timeout_seconds = config.post_auth.hook_timeout_seconds,
            "Host ready"
        );

        Ok(Self {
            config: Arc::new(config),
            store,
            plugins,
            post_auth,
        })
    }

    /// Fire `on_server_start`.
    pub async fn start(&self) {
        self.plugins.start().await;
    }

    /// Fire `on_server_shutdown` and unload plugins.
    pub async fn shutdown(&self) {
        self.plugins.shutdown().await;
    }
}

//! Hook registry: plugins register handlers by hook point with priority ordering.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use super::definitions::{HookPayload, HookPoint, HookResult};

/// Trait for hook handler implementations.
#[async_trait]
pub trait HookHandler: Send + Sync + std::fmt::Debug {
    /// Handles a hook invocation.
    async fn handle(&self, payload: &HookPayload) -> HookResult;

    /// Returns the plugin ID owning this handler.
    fn plugin_id(&self) -> &str;

    /// Returns the priority (lower = runs first).
    fn priority(&self) -> i32 {
        100
    }

    /// Whether the dispatcher runs this handler inline on the calling task.
    ///
    /// Asynchronous handlers (the default) run on a spawned worker task.
    fn synchronous(&self) -> bool {
        false
    }
}

/// Entry in the hook registry.
#[derive(Debug)]
struct HookEntry {
    /// The handler.
    handler: Arc<dyn HookHandler>,
    /// Priority (lower = earlier execution).
    priority: i32,
    /// Plugin that registered this handler.
    plugin_id: String,
}

/// Registry of hook handlers organized by hook point.
#[derive(Debug, Default)]
pub struct HookRegistry {
    /// Hook point → sorted list of handlers.
    handlers: RwLock<HashMap<HookPoint, Vec<HookEntry>>>,
}

impl HookRegistry {
    /// Creates a new empty hook registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for a specific hook point.
    pub async fn register(&self, hook: HookPoint, handler: Arc<dyn HookHandler>) {
        let plugin_id = handler.plugin_id().to_string();
        let priority = handler.priority();

        let mut handlers = self.handlers.write().await;
        let entries = handlers.entry(hook.clone()).or_default();

        entries.push(HookEntry {
            handler,
            priority,
            plugin_id: plugin_id.clone(),
        });

        // Stable sort keeps registration order among equal priorities
        entries.sort_by_key(|e| e.priority);

        info!(
            hook = %hook,
            plugin_id = %plugin_id,
            priority = priority,
            "Hook handler registered"
        );
    }

    /// Unregisters all handlers for a specific plugin.
    pub async fn unregister_plugin(&self, plugin_id: &str) {
        let mut handlers = self.handlers.write().await;

        for entries in handlers.values_mut() {
            entries.retain(|e| e.plugin_id != plugin_id);
        }
        handlers.retain(|_, entries| !entries.is_empty());

        info!(plugin_id = %plugin_id, "All hooks unregistered for plugin");
    }

    /// Returns all handlers for a specific hook point, sorted by priority.
    pub async fn get_handlers(&self, hook: &HookPoint) -> Vec<Arc<dyn HookHandler>> {
        let handlers = self.handlers.read().await;
        handlers
            .get(hook)
            .map(|entries| entries.iter().map(|e| e.handler.clone()).collect())
            .unwrap_or_default()
    }

    /// Returns the number of handlers registered for a hook point.
    pub async fn handler_count(&self, hook: &HookPoint) -> usize {
        let handlers = self.handlers.read().await;
        handlers.get(hook).map(|entries| entries.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Named {
        id: &'static str,
        priority: i32,
    }

    #[async_trait]
    impl HookHandler for Named {
        async fn handle(&self, _payload: &HookPayload) -> HookResult {
            HookResult::continue_execution(self.id)
        }

        fn plugin_id(&self) -> &str {
            self.id
        }

        fn priority(&self) -> i32 {
            self.priority
        }
    }

    #[tokio::test]
    async fn test_handlers_sorted_by_priority() {
        let registry = HookRegistry::new();
        registry
            .register(HookPoint::PostAuth, Arc::new(Named { id: "late", priority: 200 }))
            .await;
        registry
            .register(HookPoint::PostAuth, Arc::new(Named { id: "early", priority: 10 }))
            .await;

        let ids: Vec<String> = registry
            .get_handlers(&HookPoint::PostAuth)
            .await
            .iter()
            .map(|h| h.plugin_id().to_string())
            .collect();
        assert_eq!(ids, vec!["early", "late"]);
    }

    #[tokio::test]
    async fn test_unregister_plugin() {
        let registry = HookRegistry::new();
        registry
            .register(HookPoint::PostAuth, Arc::new(Named { id: "a", priority: 1 }))
            .await;
        registry
            .register(HookPoint::OnServerStart, Arc::new(Named { id: "a", priority: 1 }))
            .await;
        registry
            .register(HookPoint::PostAuth, Arc::new(Named { id: "b", priority: 2 }))
            .await;

        registry.unregister_plugin("a").await;

        assert_eq!(registry.handler_count(&HookPoint::PostAuth).await, 1);
        assert_eq!(registry.handler_count(&HookPoint::OnServerStart).await, 0);
    }
}

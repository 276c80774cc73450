//! Hook dispatcher: fires hooks and aggregates results.
//!
//! Handlers run in priority order. At hook points that support halting
//! (`post_auth`), the first `Halt` stops the chain; property sets from
//! `ContinueWith` results are merged in order, later handlers winning.
//!
//! A post-auth handler that times out or panics fails closed: the attempt
//! is halted. At other hook points the failure is logged and skipped.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tracing::{debug, error, info, warn};

use maclock_core::types::auth::PropertyList;

use super::definitions::{HookAction, HookPayload, HookResult};
use super::registry::{HookHandler, HookRegistry};

/// Reason reported when a post-auth handler fails to produce a result.
pub const HANDLER_FAILURE_REASON: &str =
    "Login could not be verified by the access server. Please try again later.";

/// Aggregated result of dispatching a hook to all handlers.
#[derive(Debug, Clone, Default)]
pub struct DispatchResult {
    /// Whether execution was halted.
    pub halted: bool,
    /// Halt reason (if halted).
    pub halt_reason: Option<String>,
    /// Plugin that halted (if halted).
    pub halted_by: Option<String>,
    /// All individual handler results.
    pub results: Vec<HookResult>,
    /// Merged properties from `ContinueWith` results.
    pub properties_to_save: PropertyList,
}

/// Dispatches hooks to all registered handlers.
#[derive(Debug)]
pub struct HookDispatcher {
    /// Hook registry.
    registry: Arc<HookRegistry>,
    /// Per-handler time limit.
    timeout: Duration,
}

impl HookDispatcher {
    /// Creates a new hook dispatcher.
    pub fn new(registry: Arc<HookRegistry>, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    /// Dispatches a hook to all registered handlers.
    pub async fn dispatch(&self, payload: &HookPayload) -> DispatchResult {
        let handlers = self.registry.get_handlers(&payload.hook).await;
        let mut outcome = DispatchResult::default();

        if handlers.is_empty() {
            return outcome;
        }

        debug!(
            hook = %payload.hook,
            request_id = %payload.request_id,
            handler_count = handlers.len(),
            "Dispatching hook"
        );

        let can_halt = payload.hook.supports_halt();

        for handler in &handlers {
            let result = match self.run_handler(handler, payload).await {
                Some(r) => r,
                None if can_halt => {
                    HookResult::halt(handler.plugin_id(), HANDLER_FAILURE_REASON)
                }
                None => HookResult::continue_execution(handler.plugin_id()),
            };

            match &result.action {
                HookAction::Continue => {
                    debug!(
                        hook = %payload.hook,
                        plugin_id = %result.plugin_id,
                        "Handler returned Continue"
                    );
                }
                HookAction::ContinueWith(props) => {
                    debug!(
                        hook = %payload.hook,
                        plugin_id = %result.plugin_id,
                        properties = props.len(),
                        "Handler returned ContinueWith"
                    );
                    outcome
                        .properties_to_save
                        .extend(props.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
                HookAction::Halt { reason } => {
                    if can_halt {
                        info!(
                            hook = %payload.hook,
                            plugin_id = %result.plugin_id,
                            reason = %reason,
                            "Handler halted execution"
                        );
                        outcome.halted = true;
                        outcome.halt_reason = Some(reason.clone());
                        outcome.halted_by = Some(result.plugin_id.clone());
                        outcome.results.push(result);
                        break;
                    }
                    warn!(
                        hook = %payload.hook,
                        plugin_id = %result.plugin_id,
                        "Handler returned Halt for a hook that cannot halt, ignoring"
                    );
                }
            }

            outcome.results.push(result);
        }

        outcome
    }

    /// Fires a hook without inspecting the result (lifecycle hooks).
    pub async fn fire_and_forget(&self, payload: &HookPayload) {
        let _ = self.dispatch(payload).await;
    }

    /// Returns a reference to the hook registry.
    pub fn registry(&self) -> &Arc<HookRegistry> {
        &self.registry
    }

    /// Runs one handler under the time limit. `None` means it timed out or panicked.
    async fn run_handler(
        &self,
        handler: &Arc<dyn HookHandler>,
        payload: &HookPayload,
    ) -> Option<HookResult> {
        if handler.synchronous() {
            let fut = AssertUnwindSafe(handler.handle(payload)).catch_unwind();
            return match tokio::time::timeout(self.timeout, fut).await {
                Ok(Ok(result)) => Some(result),
                Ok(Err(_)) => {
                    error!(
                        hook = %payload.hook,
                        plugin_id = %handler.plugin_id(),
                        "Hook handler panicked"
                    );
                    None
                }
                Err(_) => {
                    self.log_timeout(handler, payload);
                    None
                }
            };
        }

        let task_handler = Arc::clone(handler);
        let task_payload = payload.clone();
        let mut task =
            tokio::spawn(async move { task_handler.handle(&task_payload).await });

        match tokio::time::timeout(self.timeout, &mut task).await {
            Ok(Ok(result)) => Some(result),
            Ok(Err(e)) => {
                error!(
                    hook = %payload.hook,
                    plugin_id = %handler.plugin_id(),
                    error = %e,
                    "Hook worker task failed"
                );
                None
            }
            Err(_) => {
                task.abort();
                self.log_timeout(handler, payload);
                None
            }
        }
    }

    fn log_timeout(&self, handler: &Arc<dyn HookHandler>, payload: &HookPayload) {
        error!(
            hook = %payload.hook,
            plugin_id = %handler.plugin_id(),
            timeout_secs = self.timeout.as_secs(),
            "Hook handler timed out"
        );
    }
}

//! Post-auth hook handler that applies the device-binding policy.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use maclock_plugin::hooks::definitions::{HookPayload, HookResult};
use maclock_plugin::hooks::dispatcher::HANDLER_FAILURE_REASON;
use maclock_plugin::hooks::registry::HookHandler;

use crate::PLUGIN_ID;
use crate::diagnostics::LOG_TARGET;
use crate::policy::{AuthenticationContext, Evaluator, UserPropertyView};

/// Hook handler for `post_auth`: check or learn the client's MAC address.
#[derive(Debug)]
pub struct PostAuthHook {
    /// Policy evaluator with the process configuration.
    evaluator: Arc<Evaluator>,
}

impl PostAuthHook {
    /// Create a new post_auth hook handler.
    pub fn new(evaluator: Arc<Evaluator>) -> Self {
        Self { evaluator }
    }
}

#[async_trait]
impl HookHandler for PostAuthHook {
    async fn handle(&self, payload: &HookPayload) -> HookResult {
        let Some(input) = payload.post_auth.as_ref() else {
            error!(
                hook = %payload.hook,
                request_id = %payload.request_id,
                "post_auth payload carries no authentication data"
            );
            return HookResult::halt(PLUGIN_ID, HANDLER_FAILURE_REASON);
        };

        debug!(
            target: LOG_TARGET,
            request_id = %payload.request_id,
            username = %input.authcred.username,
            client_ip = %input.authcred.client_ip_addr,
            hw_addr = ?input.authcred.client_hw_addr,
            vpn_auth = input.attributes.vpn_auth,
            "********** POST_AUTH"
        );

        let ctx = AuthenticationContext::from_request(&input.authcred, &input.attributes);
        let outcome = self
            .evaluator
            .evaluate(&ctx, &UserPropertyView::new(&input.proplist));

        match outcome.denial {
            Some(denial) => HookResult::halt(PLUGIN_ID, &denial.to_string()),
            None if outcome.properties_to_save.is_empty() => {
                HookResult::continue_execution(PLUGIN_ID)
            }
            None => HookResult::continue_with(PLUGIN_ID, outcome.properties_to_save),
        }
    }

    fn plugin_id(&self) -> &str {
        PLUGIN_ID
    }

    fn priority(&self) -> i32 {
        100
    }

    fn synchronous(&self) -> bool {
        self.evaluator.config().synchronous
    }
}

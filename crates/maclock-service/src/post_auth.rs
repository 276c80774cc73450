//! Post-auth flow: what the access server does around the hook.
//!
//! 1. Load the user's stored properties.
//! 2. Fire `post_auth` through the dispatcher.
//! 3. On halt, mark the attempt failed and relay the reason.
//! 4. Otherwise persist the properties the hooks asked to save. The MAC
//!    binding is written only if still absent; losing that race refuses
//!    the login.

use std::sync::Arc;

use tracing::{info, warn};

use maclock_core::result::AppResult;
use maclock_core::traits::property_store::UserPropertyStore;
use maclock_core::types::auth::{
    AuthReturn, HW_ADDR_PROPERTY, PostAuthRequest, PostAuthResponse, PropertyList,
};
use maclock_plugin::hooks::definitions::{HookPayload, PostAuthInput};
use maclock_plugin::hooks::dispatcher::HookDispatcher;
use plugin_mac_lock::Denial;

/// Whether a post-auth run writes `proplist_save` back to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Merge returned properties into the store.
    Persist,
    /// Report returned properties without storing them.
    DryRun,
}

/// Runs post-auth hooks against the property store.
#[derive(Clone)]
pub struct PostAuthService {
    /// User property store.
    store: Arc<dyn UserPropertyStore>,
    /// Hook dispatcher.
    dispatcher: Arc<HookDispatcher>,
}

impl std::fmt::Debug for PostAuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostAuthService").finish()
    }
}

impl PostAuthService {
    /// Creates a new post-auth service.
    pub fn new(store: Arc<dyn UserPropertyStore>, dispatcher: Arc<HookDispatcher>) -> Self {
        Self { store, dispatcher }
    }

    /// Runs post-auth for one login attempt and persists any registration.
    pub async fn post_auth(&self, request: PostAuthRequest) -> AppResult<PostAuthResponse> {
        self.run(request, WriteMode::Persist).await
    }

    /// Runs post-auth for one login attempt.
    pub async fn run(
        &self,
        request: PostAuthRequest,
        mode: WriteMode,
    ) -> AppResult<PostAuthResponse> {
        let PostAuthRequest {
            authcred,
            attributes,
            mut authret,
        } = request;
        let username = authcred.username.clone();

        // The store is authoritative over whatever the caller passed in
        let stored = self.store.get_properties(&username).await?;
        authret.proplist.extend(stored);

        let payload = HookPayload::post_auth(PostAuthInput {
            authcred,
            attributes,
            proplist: authret.proplist.clone(),
        });
        let dispatch = self.dispatcher.dispatch(&payload).await;

        if dispatch.halted {
            let reason = dispatch.halt_reason.unwrap_or_default();
            warn!(
                request_id = %payload.request_id,
                username = %username,
                plugin_id = dispatch.halted_by.as_deref().unwrap_or("unknown"),
                reason = %reason,
                "Post-auth refused login"
            );
            return Ok(refused(authret, &reason));
        }

        let proplist_save = dispatch.properties_to_save;
        if proplist_save.is_empty() {
            return Ok(PostAuthResponse {
                authret,
                proplist_save,
            });
        }

        if mode == WriteMode::Persist && !self.persist(&username, &proplist_save).await? {
            let reason = Denial::HardwareAddressMismatch.to_string();
            warn!(
                request_id = %payload.request_id,
                username = %username,
                reason = %reason,
                "MAC address registered by a concurrent login; refusing"
            );
            return Ok(refused(authret, &reason));
        }

        authret
            .proplist
            .extend(proplist_save.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(PostAuthResponse {
            authret,
            proplist_save,
        })
    }

    /// Writes `properties` for `username`. Returns `false` when the MAC
    /// binding was taken by another address in the meantime.
    async fn persist(&self, username: &str, properties: &PropertyList) -> AppResult<bool> {
        let mut rest = properties.clone();
        if let Some(hw_addr) = rest.remove(HW_ADDR_PROPERTY) {
            let registered = self
                .store
                .register_if_absent(username, HW_ADDR_PROPERTY, &hw_addr)
                .await?;
            if !registered {
                let current = self.store.get(username, HW_ADDR_PROPERTY).await?;
                if current.as_deref() != Some(hw_addr.as_str()) {
                    return Ok(false);
                }
            }
        }
        self.store.merge(username, &rest).await?;

        info!(
            username = %username,
            properties = properties.len(),
            "User properties saved"
        );
        Ok(true)
    }
}

fn refused(mut authret: AuthReturn, reason: &str) -> PostAuthResponse {
    authret.fail(reason);
    PostAuthResponse {
        authret,
        proplist_save: PropertyList::new(),
    }
}

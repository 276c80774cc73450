//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use tempfile::TempDir;

use maclock_core::config::AppConfig;
use maclock_core::config::store::StoreProvider;
use maclock_core::traits::property_store::UserPropertyStore;
use maclock_core::types::auth::{
    AuthAttributes, AuthCredentials, AuthReturn, PostAuthRequest, PostAuthResponse,
};
use maclock_service::Host;

/// Test application context
pub struct TestApp {
    /// Fully wired host
    pub host: Host,
    /// Property store backing the host
    pub store: Arc<dyn UserPropertyStore>,
    /// Keeps a file-backed store's directory alive
    pub dir: Option<TempDir>,
}

impl TestApp {
    /// Host with an in-memory store and default policy
    pub async fn new() -> Self {
        Self::with_config(AppConfig::default()).await
    }

    /// Host with an in-memory store and the given configuration
    pub async fn with_config(mut config: AppConfig) -> Self {
        config.store.provider = StoreProvider::Memory;
        let host = Host::build(config).await.expect("Failed to build host");
        Self {
            store: host.store.clone(),
            host,
            dir: None,
        }
    }

    /// Host with a JSON file store in a fresh temporary directory
    pub async fn with_file_store() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let mut app = Self::with_file_store_in(&dir).await;
        app.dir = Some(dir);
        app
    }

    /// Host with a JSON file store inside `dir`
    pub async fn with_file_store_in(dir: &TempDir) -> Self {
        let mut config = AppConfig::default();
        config.store.provider = StoreProvider::File;
        config.store.path = store_path(dir);
        let host = Host::build(config).await.expect("Failed to build host");
        Self {
            store: host.store.clone(),
            host,
            dir: None,
        }
    }

    /// Run a VPN login for `username`
    pub async fn vpn_login(
        &self,
        username: &str,
        client_ip: &str,
        hw_addr: Option<&str>,
    ) -> PostAuthResponse {
        self.login(request(username, client_ip, hw_addr, true)).await
    }

    /// Run an arbitrary post-auth request
    pub async fn login(&self, request: PostAuthRequest) -> PostAuthResponse {
        self.host
            .post_auth
            .post_auth(request)
            .await
            .expect("post_auth failed")
    }
}

/// Build a post-auth request
pub fn request(
    username: &str,
    client_ip: &str,
    hw_addr: Option<&str>,
    vpn_auth: bool,
) -> PostAuthRequest {
    PostAuthRequest {
        authcred: AuthCredentials {
            username: username.to_string(),
            client_ip_addr: client_ip.to_string(),
            client_hw_addr: hw_addr.map(str::to_string),
        },
        attributes: AuthAttributes { vpn_auth },
        authret: AuthReturn::default(),
    }
}

/// Path of the JSON store inside `dir`
pub fn store_path(dir: &TempDir) -> String {
    dir.path()
        .join("userprops.json")
        .to_string_lossy()
        .into_owned()
}

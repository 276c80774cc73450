//! Post-auth MAC binding policy configuration.

use serde::{Deserialize, Serialize};

/// MAC address binding policy configuration.
///
/// Fixed for the life of the process; there is no hot reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostAuthConfig {
    /// Client IP address from which first-time MAC registration is accepted.
    ///
    /// Empty means registrations are accepted from anywhere. An impossible
    /// value such as `"NONE"` forces all registrations through the admin CLI.
    pub first_login_ip_addr: String,
    /// Whether the host runs the hook inline on the calling task.
    ///
    /// When `false` the hook runs on a spawned worker task. Does not affect
    /// the policy decision.
    pub synchronous: bool,
    /// Seconds a post-auth handler may run before the attempt is denied.
    pub hook_timeout_seconds: u64,
}

impl PostAuthConfig {
    /// Returns the registration allow-list address, if one is configured.
    pub fn allow_ip(&self) -> Option<&str> {
        let ip = self.first_login_ip_addr.as_str();
        if ip.is_empty() { None } else { Some(ip) }
    }
}

impl Default for PostAuthConfig {
    fn default() -> Self {
        Self {
            first_login_ip_addr: String::new(),
            synchronous: false,
            hook_timeout_seconds: default_hook_timeout(),
        }
    }
}

fn default_hook_timeout() -> u64 {
    30
}

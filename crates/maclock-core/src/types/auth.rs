//! Typed post-auth exchange between the VPN server and the hook.
//!
//! The access server hands the hook three loosely-typed dictionaries
//! (`authcred`, `attributes`, `authret`). These structs give each one a
//! fixed shape while accepting the same JSON field names.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// User property key holding the registered hardware address.
pub const HW_ADDR_PROPERTY: &str = "pvt_hw_addr";

/// Per-user property list (property name → value).
pub type PropertyList = BTreeMap<String, String>;

/// Credentials and client-reported attributes of one login attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCredentials {
    /// Account name as reported by the authentication backend.
    #[serde(default)]
    pub username: String,
    /// Public IP address of the connecting client.
    #[serde(default)]
    pub client_ip_addr: String,
    /// Hardware (MAC) address reported by the VPN client, if any.
    #[serde(default)]
    pub client_hw_addr: Option<String>,
}

/// Attributes describing the kind of authentication being performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthAttributes {
    /// `true` for VPN data-plane authentication, `false` for e.g. web admin login.
    #[serde(default)]
    pub vpn_auth: bool,
}

/// Pass/fail status of an authentication attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthStatus {
    /// The attempt is allowed.
    #[default]
    Success,
    /// The attempt is refused.
    Fail,
}

impl std::fmt::Display for AuthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthStatus::Success => write!(f, "SUCCESS"),
            AuthStatus::Fail => write!(f, "FAIL"),
        }
    }
}

/// Result of the primary authentication step, as amended by post-auth hooks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthReturn {
    /// Pass/fail status visible to the login flow.
    #[serde(default)]
    pub status: AuthStatus,
    /// Failure reason written to the server log.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Failure reason reported to the connecting client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_reason: Option<String>,
    /// The user's current property list.
    #[serde(default)]
    pub proplist: PropertyList,
}

impl AuthReturn {
    /// Marks the attempt failed, relaying `reason` to both the log and the client.
    pub fn fail(&mut self, reason: &str) {
        self.status = AuthStatus::Fail;
        self.reason = Some(reason.to_string());
        self.client_reason = Some(reason.to_string());
    }

    /// Returns whether the attempt is currently allowed.
    pub fn is_success(&self) -> bool {
        self.status == AuthStatus::Success
    }
}

/// One post-auth invocation as received from the access server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostAuthRequest {
    /// Credentials of the attempt.
    #[serde(default)]
    pub authcred: AuthCredentials,
    /// Kind of authentication.
    #[serde(default)]
    pub attributes: AuthAttributes,
    /// Result of primary authentication.
    #[serde(default)]
    pub authret: AuthReturn,
}

/// Reply to the access server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostAuthResponse {
    /// Possibly amended authentication result.
    pub authret: AuthReturn,
    /// Properties the server must persist for the user.
    pub proplist_save: PropertyList,
}

//! Hook point definitions with typed payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use maclock_core::types::auth::{AuthAttributes, AuthCredentials, PropertyList};

/// Enumeration of all hook points in the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookPoint {
    /// Fired when the host starts.
    OnServerStart,
    /// Fired when the host is shutting down.
    OnServerShutdown,
    /// Fired after primary credential verification. Can amend or halt.
    PostAuth,
}

impl HookPoint {
    /// Returns the string name of this hook point.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnServerStart => "on_server_start",
            Self::OnServerShutdown => "on_server_shutdown",
            Self::PostAuth => "post_auth",
        }
    }

    /// Returns whether a handler may halt the operation at this hook point.
    pub fn supports_halt(&self) -> bool {
        matches!(self, Self::PostAuth)
    }
}

impl std::fmt::Display for HookPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input of one post-auth invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostAuthInput {
    /// Credentials and client-reported attributes.
    pub authcred: AuthCredentials,
    /// Kind of authentication.
    pub attributes: AuthAttributes,
    /// The user's stored properties at the time of the attempt.
    pub proplist: PropertyList,
}

/// Payload passed to hook handlers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookPayload {
    /// The hook point being fired.
    pub hook: HookPoint,
    /// Correlates all log lines of one invocation.
    pub request_id: Uuid,
    /// Post-auth input, present only for [`HookPoint::PostAuth`].
    pub post_auth: Option<PostAuthInput>,
    /// Timestamp of the event.
    pub timestamp: DateTime<Utc>,
}

impl HookPayload {
    /// Creates a payload without data (lifecycle hooks).
    pub fn new(hook: HookPoint) -> Self {
        Self {
            hook,
            request_id: Uuid::now_v7(),
            post_auth: None,
            timestamp: Utc::now(),
        }
    }

    /// Creates a post-auth payload.
    pub fn post_auth(input: PostAuthInput) -> Self {
        Self {
            post_auth: Some(input),
            ..Self::new(HookPoint::PostAuth)
        }
    }
}

/// Action returned by a hook handler telling the dispatcher what to do next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookAction {
    /// Continue to the next handler.
    Continue,
    /// Continue and ask the host to persist these user properties.
    ContinueWith(PropertyList),
    /// Halt: no further handlers run and the attempt is refused.
    Halt {
        /// Reason for halting, shown to the operator and the client.
        reason: String,
    },
}

/// Result returned from a hook handler invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookResult {
    /// The action the handler wants the dispatcher to take.
    pub action: HookAction,
    /// Plugin ID that produced this result.
    pub plugin_id: String,
}

impl HookResult {
    /// Creates a continue result.
    pub fn continue_execution(plugin_id: &str) -> Self {
        Self {
            action: HookAction::Continue,
            plugin_id: plugin_id.to_string(),
        }
    }

    /// Creates a continue result carrying properties to save.
    pub fn continue_with(plugin_id: &str, properties: PropertyList) -> Self {
        Self {
            action: HookAction::ContinueWith(properties),
            plugin_id: plugin_id.to_string(),
        }
    }

    /// Creates a halt result.
    pub fn halt(plugin_id: &str, reason: &str) -> Self {
        Self {
            action: HookAction::Halt {
                reason: reason.to_string(),
            },
            plugin_id: plugin_id.to_string(),
        }
    }

    /// Returns whether this result halts the chain.
    pub fn is_halt(&self) -> bool {
        matches!(self.action, HookAction::Halt { .. })
    }
}

//! Device-binding policy: one hardware address per VPN account.
//!
//! The first VPN login of an account registers the reported MAC address
//! (optionally only from an approved client IP). Every later VPN login must
//! report exactly that address. Non-VPN logins are not checked.
//!
//! Addresses are compared byte for byte. Backends that report a different
//! case than the one registered will be refused; callers that mix backends
//! must canonicalize before the hook runs.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use maclock_core::config::post_auth::PostAuthConfig;
use maclock_core::types::auth::{AuthAttributes, AuthCredentials, HW_ADDR_PROPERTY, PropertyList};

use crate::diagnostics::{LOG_TARGET, MacCheckAction, MacCheckRecord};

/// Why a login attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Denial {
    /// The client did not report a hardware address.
    #[error(
        "VPN client is not reporting a MAC address. Please verify that Connect Client latest version is being used."
    )]
    MissingHardwareAddress,
    /// The reported address differs from the registered one.
    #[error(
        "The hardware MAC address reported by this VPN client does not match the registered MAC address."
    )]
    HardwareAddressMismatch,
    /// First registration attempted from an IP outside the allow-list.
    #[error(
        "Your attempt to login from a system not approved for MAC address registration has been denied."
    )]
    UnapprovedRegistrationLocation,
}

/// Inputs of one login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticationContext<'a> {
    /// Address reported by the client, if any.
    pub hardware_address: Option<&'a str>,
    /// Account name.
    pub username: &'a str,
    /// Client network address.
    pub client_ip: &'a str,
    /// VPN data-plane authentication (as opposed to e.g. web admin login).
    pub is_vpn_auth: bool,
}

impl<'a> AuthenticationContext<'a> {
    /// Builds the context from the server's credential and attribute records.
    pub fn from_request(authcred: &'a AuthCredentials, attributes: &AuthAttributes) -> Self {
        Self {
            hardware_address: authcred.client_hw_addr.as_deref(),
            username: &authcred.username,
            client_ip: &authcred.client_ip_addr,
            is_vpn_auth: attributes.vpn_auth,
        }
    }

    /// The reported address, with an empty string treated as absent.
    fn reported_hw_addr(&self) -> Option<&'a str> {
        self.hardware_address.filter(|addr| !addr.is_empty())
    }
}

/// Read-only view of the user's stored properties.
#[derive(Debug, Clone, Copy)]
pub struct UserPropertyView<'a> {
    properties: &'a PropertyList,
}

impl<'a> UserPropertyView<'a> {
    /// Wraps a property list.
    pub fn new(properties: &'a PropertyList) -> Self {
        Self { properties }
    }

    /// The registered hardware address, with an empty value treated as absent.
    pub fn registered_hw_addr(&self) -> Option<&'a str> {
        self.properties
            .get(HW_ADDR_PROPERTY)
            .map(String::as_str)
            .filter(|addr| !addr.is_empty())
    }
}

/// Result of evaluating one login attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyOutcome {
    /// `None` allows the attempt.
    pub denial: Option<Denial>,
    /// Properties the host must persist; only ever the first registration.
    pub properties_to_save: PropertyList,
}

impl PolicyOutcome {
    /// Allow without writing anything.
    pub fn allow() -> Self {
        Self::default()
    }

    /// Allow and register `hw_addr` as the user's binding.
    pub fn register(hw_addr: &str) -> Self {
        let mut properties_to_save = PropertyList::new();
        properties_to_save.insert(HW_ADDR_PROPERTY.to_string(), hw_addr.to_string());
        Self {
            denial: None,
            properties_to_save,
        }
    }

    /// Refuse the attempt.
    pub fn deny(denial: Denial) -> Self {
        Self {
            denial: Some(denial),
            properties_to_save: PropertyList::new(),
        }
    }

    /// Whether the attempt is allowed.
    pub fn is_allowed(&self) -> bool {
        self.denial.is_none()
    }

    /// Message relayed to the log and the client when denied.
    pub fn message(&self) -> Option<String> {
        self.denial.map(|d| d.to_string())
    }
}

/// Evaluates the device-binding policy with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    config: PostAuthConfig,
}

impl Evaluator {
    /// Creates an evaluator; the configuration is fixed for its lifetime.
    pub fn new(config: PostAuthConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PostAuthConfig {
        &self.config
    }

    /// Evaluates one attempt and writes its diagnostic record to the log.
    pub fn evaluate(
        &self,
        ctx: &AuthenticationContext<'_>,
        props: &UserPropertyView<'_>,
    ) -> PolicyOutcome {
        let (outcome, record) = self.decide(ctx, props);
        match record {
            Some(record) => record.emit(),
            None => debug!(
                target: LOG_TARGET,
                username = %ctx.username,
                "Not a VPN authentication, MAC check skipped"
            ),
        }
        outcome
    }

    /// Pure decision: the outcome plus the record to log, if the policy applied.
    pub fn decide(
        &self,
        ctx: &AuthenticationContext<'_>,
        props: &UserPropertyView<'_>,
    ) -> (PolicyOutcome, Option<MacCheckRecord>) {
        if !ctx.is_vpn_auth {
            return (PolicyOutcome::allow(), None);
        }

        let mut record = MacCheckRecord {
            username: ctx.username.to_string(),
            client_ip: ctx.client_ip.to_string(),
            hw_addr: None,
            expected_hw_addr: None,
            action: MacCheckAction::NoneReported,
            success: false,
        };

        let Some(hw_addr) = ctx.reported_hw_addr() else {
            return (PolicyOutcome::deny(Denial::MissingHardwareAddress), Some(record));
        };
        record.hw_addr = Some(hw_addr.to_string());

        let outcome = match props.registered_hw_addr() {
            Some(registered) => {
                record.action = MacCheckAction::Compared;
                record.expected_hw_addr = Some(registered.to_string());
                if registered == hw_addr {
                    PolicyOutcome::allow()
                } else {
                    PolicyOutcome::deny(Denial::HardwareAddressMismatch)
                }
            }
            None if self.registration_allowed_from(ctx.client_ip) => {
                record.action = MacCheckAction::Learned;
                PolicyOutcome::register(hw_addr)
            }
            None => {
                record.action = MacCheckAction::RegistrationDenied;
                PolicyOutcome::deny(Denial::UnapprovedRegistrationLocation)
            }
        };

        record.success = outcome.is_allowed();
        (outcome, Some(record))
    }

    fn registration_allowed_from(&self, client_ip: &str) -> bool {
        match self.config.allow_ip() {
            None => true,
            Some(allowed) => allowed == client_ip,
        }
    }
}

/// Evaluates one attempt with an explicit configuration.
pub fn evaluate(
    ctx: &AuthenticationContext<'_>,
    props: &UserPropertyView<'_>,
    config: &PostAuthConfig,
) -> PolicyOutcome {
    Evaluator::new(config.clone()).evaluate(ctx, props)
}

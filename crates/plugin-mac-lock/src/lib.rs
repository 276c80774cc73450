//! MAC address lock plugin for MacLock.
//!
//! Binds every VPN account to the hardware address it first logs in from
//! and refuses later VPN logins that report a different address.

pub mod diagnostics;
pub mod hooks;
pub mod mac;
pub mod plugin;
pub mod policy;

/// Plugin identifier used in hook results and logs.
pub const PLUGIN_ID: &str = "mac_lock";

pub use mac::mac_not_in_db;
pub use plugin::MacLockPlugin;
pub use policy::{
    AuthenticationContext, Denial, Evaluator, PolicyOutcome, UserPropertyView, evaluate,
};

//! # maclock-plugin
//!
//! Plugin framework for the MacLock host. Provides:
//!
//! - Plugin load/unload through [`PluginManager`]
//! - Hook registry with priority-ordered registration
//! - Hook dispatcher with Continue/Halt semantics and inline or
//!   worker-task execution per handler

pub mod hooks;
pub mod manager;
pub mod registry;

pub use hooks::definitions::{HookAction, HookPayload, HookPoint, HookResult, PostAuthInput};
pub use hooks::dispatcher::{DispatchResult, HookDispatcher};
pub use hooks::registry::{HookHandler, HookRegistry};
pub use manager::PluginManager;
pub use registry::{Plugin, PluginInfo, PluginRegistry};

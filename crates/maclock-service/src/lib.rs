//! # maclock-service
//!
//! Host-side orchestration of the post-auth hook: assembles the host
//! (config, store, plugins) and runs login attempts through it.

pub mod host;
pub mod post_auth;

pub use host::Host;
pub use post_auth::{PostAuthService, WriteMode};

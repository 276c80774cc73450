//! # maclock-core
//!
//! Core crate for MacLock. Contains configuration schemas, the typed
//! post-auth exchange, the property store trait, and the unified error
//! system.
//!
//! This crate has **no** internal dependencies on other MacLock crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;

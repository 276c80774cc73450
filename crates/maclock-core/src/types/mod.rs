//! Shared types used across MacLock crates.

pub mod auth;

pub use auth::{
    AuthAttributes, AuthCredentials, AuthReturn, AuthStatus, HW_ADDR_PROPERTY, PostAuthRequest,
    PostAuthResponse, PropertyList,
};

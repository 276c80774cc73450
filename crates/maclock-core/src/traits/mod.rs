//! Core traits defined in `maclock-core` and implemented by other crates.

pub mod property_store;

pub use property_store::UserPropertyStore;

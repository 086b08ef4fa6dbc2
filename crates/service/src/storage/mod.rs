//! Storage abstractions for service layer
//!
//! Typed access to the embedded ordered store, with values kept as JSON.

pub mod json_kv_store;

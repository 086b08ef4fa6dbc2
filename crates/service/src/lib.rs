//! Service layer for the todo list.
//! - `storage` wraps the embedded store with JSON-encoded values.
//! - `todo` holds the repository seam and the access-layer operations.
//! - Errors are surfaced unchanged to the HTTP layer as `ServiceError`.

pub mod errors;
pub mod pagination;
pub mod storage;
pub mod todo;
#[cfg(test)]
pub mod test_support;

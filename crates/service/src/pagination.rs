//! List options for the todo scan
//!
//! Mirrors the `limit` / `reverse` query parameters and normalizes them.

pub const DEFAULT_LIMIT: u32 = 500;

/// Raw list parameters as they arrive from the query string.
#[derive(Clone, Copy, Debug, Default)]
pub struct ListOptions {
    /// maximum number of todos returned
    pub limit: Option<u32>,
    /// newest first when true
    pub reverse: Option<bool>,
}

impl ListOptions {
    /// Apply defaults and clamp `limit` to at least 1. Returns `(limit, reverse)`.
    pub fn normalize(self) -> (usize, bool) {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).max(1);
        (limit as usize, self.reverse.unwrap_or(true))
    }
}

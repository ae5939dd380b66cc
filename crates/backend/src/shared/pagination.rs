use serde::Deserialize;
use std::fmt::Display;

use super::data::db::MAX_SQL_INT;

/// Raw `limit`/`page` query parameters. Kept as strings so that malformed
/// values fall back to defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: u64,
    pub page: u64,
}

impl Pagination {
    /// `limit` is clamped to what the database can bind
    pub fn new(limit: u64, page: u64) -> Self {
        Self {
            limit: limit.min(MAX_SQL_INT),
            page,
        }
    }

    pub fn from_query(query: &PageQuery, default_limit: u64) -> Self {
        let limit = query
            .limit
            .as_deref()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(default_limit);
        let page = query
            .page
            .as_deref()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(0);
        Self::new(limit, page)
    }

    /// Number of records skipped before the window starts
    pub fn skip(&self) -> u64 {
        self.page.saturating_mul(self.limit).min(MAX_SQL_INT)
    }
}

/// Keeps the value of one branch of a concurrent fetch. A failed branch is
/// logged and yields `None` without affecting its sibling.
pub fn settled<T, E: Display>(branch: &str, result: Result<T, E>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(branch, error = %e, "Listing branch failed");
            None
        }
    }
}

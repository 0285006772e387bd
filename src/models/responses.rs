use serde::{Deserialize, Serialize};

/// Number of upstream entries left out because they had no usable miss distance
pub const DROPPED_ENTRIES_HEADER: &str = "X-Dropped-Entries";

/// Set to `true` when the requested range was cut to the maximum span
pub const SPAN_TRUNCATED_HEADER: &str = "X-Span-Truncated";

/// Last day actually served, present only alongside `X-Span-Truncated`
pub const EFFECTIVE_END_DATE_HEADER: &str = "X-Effective-End-Date";

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

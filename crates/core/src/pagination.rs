//! Limit/offset clamping for list endpoints.

/// Default page size for resource history.
pub const DEFAULT_HISTORY_LIMIT: i64 = 50;
/// Largest page of resource history a caller may request.
pub const MAX_HISTORY_LIMIT: i64 = 500;
/// Default number of leaderboard rows.
pub const DEFAULT_LEADERBOARD_LIMIT: i64 = 10;
/// Largest leaderboard a caller may request.
pub const MAX_LEADERBOARD_LIMIT: i64 = 100;

/// Clamp a user-provided limit to `[1, max]`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

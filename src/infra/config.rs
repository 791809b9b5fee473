//! Centralized configuration (environment variables + defaults).

/// Database URL must be provided (no default) for safety.
pub fn database_url() -> String {
    std::env::var("DATABASE_URL").expect("DATABASE_URL must be set")
}

/// Address the API server binds to.
pub fn bind_addr() -> String {
    std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string())
}

/// Minimum number of approvals before a review counts as approved.
///
/// Read once at startup; the running service can still be retuned through
/// [`crate::ApprovalConfig::set_min_count`].
pub fn min_approval_count() -> u32 {
    let v = std::env::var("MIN_APPROVAL_COUNT").unwrap_or_else(|_| "2".to_string());
    v.parse::<u32>()
        .expect("MIN_APPROVAL_COUNT must be a valid u32")
        .max(1)
}

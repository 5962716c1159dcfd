//! Application-wide constants

pub const TOKEN_TYPE_BEARER: &str = "Bearer";
/// Refresh tokens live this many base session lifetimes.
pub const REFRESH_LIFETIME_MULTIPLIER: i64 = 7;
pub const DEFAULT_SESSION_LIFETIME_SECS: i64 = 3600;
/// HS256 wants at least 256 bits of key material.
pub const MIN_SECRET_BYTES: usize = 32;
pub const DEFAULT_CORS_MAX_AGE_SECS: u64 = 3600;

use std::env;

/// Listing validation settings: token lifetime and the bounded wait applied
/// to confirmation email dispatch.
#[derive(Debug, Clone, Copy)]
pub struct ValidationConfig {
    pub token_ttl_hours: i64,
    pub email_timeout_secs: u64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            token_ttl_hours: 48,
            email_timeout_secs: 10,
        }
    }
}

impl ValidationConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let token_ttl_hours = env::var("VALIDATION_TOKEN_TTL_HOURS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|h| *h > 0)
            .unwrap_or(defaults.token_ttl_hours);

        let email_timeout_secs = env::var("EMAIL_DISPATCH_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|t| *t > 0)
            .unwrap_or(defaults.email_timeout_secs);

        Self {
            token_ttl_hours,
            email_timeout_secs,
        }
    }
}

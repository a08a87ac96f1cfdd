/// Rate limit rule applied to a request category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitRule {
    /// Category label used as the key prefix.
    pub category: String,
    /// Maximum attempts inside the window.
    pub max_attempts: i32,
    /// Window length in seconds.
    pub window_seconds: i64,
}

impl RateLimitRule {
    /// Creates a rule for the given category.
    #[must_use]
    pub fn new(category: impl Into<String>, max_attempts: i32, window_seconds: i64) -> Self {
        Self {
            category: category.into(),
            max_attempts,
            window_seconds,
        }
    }
}

//! Application configuration.

/// Default origin for shareable post links.
pub const DEFAULT_SHARE_BASE_URL: &str = "http://localhost:5173";

/// Settings that shape application behavior, independent of transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Origin prepended to `/posts/{id}` when sharing.
    pub share_base_url: String,
}

impl AppConfig {
    /// Config with the given share origin. A trailing slash is dropped.
    pub fn new(share_base_url: impl Into<String>) -> Self {
        let share_base_url = share_base_url.into().trim_end_matches('/').to_owned();
        Self { share_base_url }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SHARE_BASE_URL)
    }
}

//! Connection settings shared by every request.

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const REQUESTED_WITH_HEADER: &str = "X-Requested-With";
pub const DEFAULT_REQUESTED_WITH: &str = "XMLHttpRequest";

/// Environment variable that overrides the base URL in `from_env`.
pub const BASE_URL_ENV: &str = "TASKBOARD_API_URL";

/// Base address and fixed header for the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub requested_with: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            requested_with: DEFAULT_REQUESTED_WITH.to_string(),
        }
    }

    /// Defaults, with the base URL taken from `TASKBOARD_API_URL` when it is
    /// set to a non-empty value.
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }

    /// Headers attached to every request.
    pub fn default_headers(&self) -> Vec<(String, String)> {
        vec![(
            REQUESTED_WITH_HEADER.to_string(),
            self.requested_with.clone(),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_localhost() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.requested_with, "XMLHttpRequest");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let config = ClientConfig::new("http://api.local:8080/");
        assert_eq!(config.base_url, "http://api.local:8080");
    }

    #[test]
    fn from_env_overrides_base_url() {
        std::env::set_var(BASE_URL_ENV, "http://staging.local:4000/");
        let config = ClientConfig::from_env();
        std::env::remove_var(BASE_URL_ENV);
        assert_eq!(config.base_url, "http://staging.local:4000");
        assert_eq!(config.requested_with, DEFAULT_REQUESTED_WITH);
    }

    #[test]
    fn default_headers_carry_requested_with() {
        let headers = ClientConfig::default().default_headers();
        assert_eq!(
            headers,
            vec![("X-Requested-With".to_string(), "XMLHttpRequest".to_string())]
        );
    }
}

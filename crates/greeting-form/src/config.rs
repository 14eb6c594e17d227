//! Endpoint and page-binding configuration.

use serde::{Deserialize, Serialize};

/// Server used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Environment variable overriding the server base URL.
pub const BASE_URL_ENV: &str = "GREETING_FORM_URL";

/// Where submissions go and which page elements the handler binds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Origin the relative endpoint is resolved against.
    pub base_url: String,
    /// Relative path submissions are posted to.
    pub endpoint: String,
    /// Id of the form whose submit event is intercepted.
    pub form_id: String,
    /// Id of the input whose value is sent.
    pub input_id: String,
    /// Id of the element that receives the greeting.
    pub display_id: String,
    /// Whole-request timeout for the HTTP transport. `None` waits as long
    /// as the server takes.
    pub timeout_ms: Option<u64>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint: "/submit".to_string(),
            form_id: "userForm".to_string(),
            input_id: "name".to_string(),
            display_id: "greeting".to_string(),
            timeout_ms: None,
        }
    }
}

impl FormConfig {
    /// Default bindings against the given server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Parse a JSON configuration; missing keys take their defaults.
    pub fn from_json(json: &str) -> crate::FormResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Resolve the server base URL: explicit value, then `GREETING_FORM_URL`,
/// then the built-in default.
pub fn resolve_base_url(explicit: Option<&str>) -> String {
    if let Some(url) = explicit {
        return url.to_string();
    }

    if let Ok(env_url) = std::env::var(BASE_URL_ENV) {
        if !env_url.trim().is_empty() {
            return env_url;
        }
    }

    DEFAULT_BASE_URL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_page_markup() {
        let config = FormConfig::default();
        assert_eq!(config.endpoint, "/submit");
        assert_eq!(config.form_id, "userForm");
        assert_eq!(config.input_id, "name");
        assert_eq!(config.display_id, "greeting");
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = FormConfig::from_json(r#"{"base_url":"http://example.test"}"#).unwrap();
        assert_eq!(config.base_url, "http://example.test");
        assert_eq!(config.endpoint, "/submit");
        assert_eq!(config.timeout_ms, None);
    }

    #[test]
    fn test_from_json_reads_timeout() {
        let config = FormConfig::from_json(r#"{"timeout_ms":250}"#).unwrap();
        assert_eq!(config.timeout_ms, Some(250));
    }

    #[test]
    fn test_explicit_url_wins() {
        assert_eq!(resolve_base_url(Some("http://a.test")), "http://a.test");
    }

    // Only test in the crate touching GREETING_FORM_URL.
    #[test]
    fn test_env_url_fallback() {
        std::env::set_var(BASE_URL_ENV, "http://env.test");
        assert_eq!(resolve_base_url(None), "http://env.test");
        assert_eq!(resolve_base_url(Some("http://a.test")), "http://a.test");

        std::env::set_var(BASE_URL_ENV, "   ");
        assert_eq!(resolve_base_url(None), DEFAULT_BASE_URL);

        std::env::remove_var(BASE_URL_ENV);
        assert_eq!(resolve_base_url(None), DEFAULT_BASE_URL);
    }
}

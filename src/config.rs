use crate::errors::UiError;
use std::{env, time::Duration};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";
pub const DEFAULT_CSRF_COOKIE: &str = "csrftoken";

#[derive(Debug, Clone)]
pub struct UiConfig {
    /// Base that relative `data-url` values are resolved against.
    pub base_url: Url,
    pub csrf_cookie: String,
    /// `None` waits as long as the server takes, like a bare fetch.
    pub request_timeout: Option<Duration>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            csrf_cookie: DEFAULT_CSRF_COOKIE.to_string(),
            request_timeout: None,
        }
    }
}

impl UiConfig {
    pub fn from_env() -> Result<Self, UiError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, UiError> {
        let mut config = Self::default();

        if let Some(raw) = lookup("GRIEVANCE_BASE_URL") {
            config.base_url = Url::parse(raw.trim())?;
        }

        if let Some(raw) = lookup("GRIEVANCE_CSRF_COOKIE") {
            let name = raw.trim();
            if name.is_empty() {
                return Err(UiError::config("GRIEVANCE_CSRF_COOKIE must not be empty"));
            }
            config.csrf_cookie = name.to_string();
        }

        if let Some(raw) = lookup("GRIEVANCE_REQUEST_TIMEOUT_MS") {
            let millis = raw.trim().parse::<u64>().map_err(|err| {
                UiError::config(format!("GRIEVANCE_REQUEST_TIMEOUT_MS: {err}"))
            })?;
            config.request_timeout = Some(Duration::from_millis(millis));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_env() {
        let config = UiConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.csrf_cookie, "csrftoken");
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn env_overrides_are_read() {
        let config = UiConfig::from_lookup(lookup(&[
            ("GRIEVANCE_BASE_URL", "https://grievance.example.org/portal/"),
            ("GRIEVANCE_CSRF_COOKIE", " portal_csrf "),
            ("GRIEVANCE_REQUEST_TIMEOUT_MS", "2500"),
        ]))
        .unwrap();
        assert_eq!(config.base_url.as_str(), "https://grievance.example.org/portal/");
        assert_eq!(config.csrf_cookie, "portal_csrf");
        assert_eq!(config.request_timeout, Some(Duration::from_millis(2500)));
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let err = UiConfig::from_lookup(lookup(&[("GRIEVANCE_REQUEST_TIMEOUT_MS", "soon")]))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Config);

        let err = UiConfig::from_lookup(lookup(&[("GRIEVANCE_BASE_URL", "not a url")]))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Config);
    }
}

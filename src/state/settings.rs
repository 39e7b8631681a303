//! Classification service settings.
//!
//! Read from the process environment on native builds. WASM builds have no
//! process environment, so the values are captured at compile time.

use std::time::Duration;

/// Environment variable holding the service base URL.
pub const SERVER_URL_VAR: &str = "CLASSIFIER_SERVER_URL";
/// Environment variable holding the classification timeout in seconds.
pub const TIMEOUT_VAR: &str = "CLASSIFIER_TIMEOUT_SECS";

const DEFAULT_SERVER_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Where the classification service lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    pub server_url: String,
    pub timeout: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ServiceSettings {
    /// Load settings from the environment, falling back to defaults.
    pub fn load() -> Self {
        let server_url = read_var(SERVER_URL_VAR);
        let timeout = read_var(TIMEOUT_VAR);

        let settings = Self::from_values(server_url.as_deref(), timeout.as_deref());
        log::info!(
            "Classification service at {} (timeout {}s)",
            settings.server_url,
            settings.timeout.as_secs()
        );
        settings
    }

    /// Build settings from optional raw values.
    pub fn from_values(server_url: Option<&str>, timeout_secs: Option<&str>) -> Self {
        let mut settings = Self::default();

        if let Some(url) = server_url.map(str::trim).filter(|url| !url.is_empty()) {
            settings.server_url = url.trim_end_matches('/').to_string();
        }

        if let Some(raw) = timeout_secs {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => settings.timeout = Duration::from_secs(secs),
                _ => log::warn!(
                    "Ignoring invalid {} value {:?}, using {}s",
                    TIMEOUT_VAR,
                    raw,
                    DEFAULT_TIMEOUT_SECS
                ),
            }
        }

        settings
    }
}

/// Runtime environment lookup.
#[cfg(not(target_arch = "wasm32"))]
fn read_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Compile-time environment lookup; the browser has no process environment.
#[cfg(target_arch = "wasm32")]
fn read_var(name: &str) -> Option<String> {
    let value = match name {
        SERVER_URL_VAR => option_env!("CLASSIFIER_SERVER_URL"),
        TIMEOUT_VAR => option_env!("CLASSIFIER_TIMEOUT_SECS"),
        _ => None,
    };
    value.map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let settings = ServiceSettings::from_values(None, None);
        assert_eq!(settings, ServiceSettings::default());
        assert_eq!(settings.server_url, "http://localhost:5000");
        assert_eq!(settings.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_values_override_defaults() {
        let settings =
            ServiceSettings::from_values(Some(" https://classify.example.org/ "), Some("45"));
        assert_eq!(settings.server_url, "https://classify.example.org");
        assert_eq!(settings.timeout, Duration::from_secs(45));
    }

    #[test]
    fn test_invalid_timeout_falls_back() {
        assert_eq!(
            ServiceSettings::from_values(None, Some("soon")).timeout,
            Duration::from_secs(120)
        );
        assert_eq!(
            ServiceSettings::from_values(None, Some("0")).timeout,
            Duration::from_secs(120)
        );
    }

    #[test]
    fn test_unset_variable_reads_none() {
        assert_eq!(read_var("CLASSIFIER_SETTINGS_TEST_UNSET"), None);
    }

    #[test]
    fn test_empty_url_falls_back() {
        assert_eq!(
            ServiceSettings::from_values(Some("  "), None).server_url,
            "http://localhost:5000"
        );
    }
}

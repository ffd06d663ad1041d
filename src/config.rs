use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::chat::DEFAULT_REPLY_DELAY_MS;
use crate::models::BusyPolicy;
use crate::pipeline::upload::DEFAULT_MAX_UPLOAD_BYTES;
use crate::session_history::DEFAULT_HISTORY_CAPACITY;

/// Application-level constants
pub const APP_NAME: &str = "X-ray Triage";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5174";
pub const DEFAULT_CLASSIFIER_TIMEOUT_SECS: u64 = 60;

/// Environment variable names
pub const ENV_API_BASE: &str = "XRAY_TRIAGE_API_BASE";
pub const ENV_BIND: &str = "XRAY_TRIAGE_BIND";
pub const ENV_TIMEOUT_SECS: &str = "XRAY_TRIAGE_TIMEOUT_SECS";
pub const ENV_HISTORY_CAPACITY: &str = "XRAY_TRIAGE_HISTORY_CAPACITY";
pub const ENV_CHAT_DELAY_MS: &str = "XRAY_TRIAGE_CHAT_DELAY_MS";
pub const ENV_CHAT_BUSY_POLICY: &str = "XRAY_TRIAGE_CHAT_BUSY_POLICY";
pub const ENV_MAX_UPLOAD_BYTES: &str = "XRAY_TRIAGE_MAX_UPLOAD_BYTES";
pub const ENV_STATIC_DIR: &str = "XRAY_TRIAGE_STATIC_DIR";
pub const ENV_CORS: &str = "XRAY_TRIAGE_CORS";
pub const ENV_LOG: &str = "XRAY_TRIAGE_LOG";

/// Tracing filter used when `XRAY_TRIAGE_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "xray_triage=info,tower_http=warn"
}

/// The log filter directive from the environment, or the default.
pub fn log_filter_from_env() -> String {
    std::env::var(ENV_LOG)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default_log_filter().to_string())
}

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub classifier_base_url: String,
    pub classifier_timeout_secs: u64,
    pub bind_addr: SocketAddr,
    /// Zero means unbounded.
    pub history_capacity: usize,
    pub chat_reply_delay: Duration,
    pub chat_busy_policy: BusyPolicy,
    pub max_upload_bytes: usize,
    /// Built browser assets served at `/` when set.
    pub static_dir: Option<PathBuf>,
    pub cors_permissive: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            classifier_base_url: DEFAULT_API_BASE.to_string(),
            classifier_timeout_secs: DEFAULT_CLASSIFIER_TIMEOUT_SECS,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5174)),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            chat_reply_delay: Duration::from_millis(DEFAULT_REPLY_DELAY_MS),
            chat_busy_policy: BusyPolicy::Reject,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            static_dir: None,
            cors_permissive: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unparseable values fall back to
    /// the default with a warning; startup never fails on configuration.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let classifier_base_url = get(ENV_API_BASE)
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or(defaults.classifier_base_url);

        Self {
            classifier_base_url,
            classifier_timeout_secs: parsed::<u64>(ENV_TIMEOUT_SECS, get(ENV_TIMEOUT_SECS))
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.classifier_timeout_secs),
            bind_addr: parsed::<SocketAddr>(ENV_BIND, get(ENV_BIND)).unwrap_or(defaults.bind_addr),
            history_capacity: parsed::<usize>(ENV_HISTORY_CAPACITY, get(ENV_HISTORY_CAPACITY))
                .unwrap_or(defaults.history_capacity),
            chat_reply_delay: parsed::<u64>(ENV_CHAT_DELAY_MS, get(ENV_CHAT_DELAY_MS))
                .map(Duration::from_millis)
                .unwrap_or(defaults.chat_reply_delay),
            chat_busy_policy: parsed::<BusyPolicy>(ENV_CHAT_BUSY_POLICY, get(ENV_CHAT_BUSY_POLICY))
                .unwrap_or(defaults.chat_busy_policy),
            max_upload_bytes: parsed::<usize>(ENV_MAX_UPLOAD_BYTES, get(ENV_MAX_UPLOAD_BYTES))
                .filter(|bytes| *bytes > 0)
                .unwrap_or(defaults.max_upload_bytes),
            static_dir: get(ENV_STATIC_DIR).map(PathBuf::from),
            cors_permissive: get(ENV_CORS)
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.cors_permissive),
        }
    }
}

fn parsed<T>(key: &str, raw: Option<String>) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = raw?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "Ignoring invalid config value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn app_name_is_xray_triage() {
        assert_eq!(APP_NAME, "X-ray Triage");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = from_pairs(&[]);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.classifier_base_url, "http://localhost:8000");
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.chat_reply_delay, Duration::from_millis(1500));
        assert_eq!(config.history_capacity, 100);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn values_are_read_from_lookup() {
        let config = from_pairs(&[
            (ENV_API_BASE, "http://classifier.local:9000/"),
            (ENV_BIND, "0.0.0.0:8080"),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_HISTORY_CAPACITY, "0"),
            (ENV_CHAT_DELAY_MS, "10"),
            (ENV_CHAT_BUSY_POLICY, "cancel_previous"),
            (ENV_MAX_UPLOAD_BYTES, "2048"),
            (ENV_STATIC_DIR, "/srv/www"),
            (ENV_CORS, "1"),
        ]);
        assert_eq!(config.classifier_base_url, "http://classifier.local:9000");
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.classifier_timeout_secs, 5);
        assert_eq!(config.history_capacity, 0);
        assert_eq!(config.chat_reply_delay, Duration::from_millis(10));
        assert_eq!(config.chat_busy_policy, BusyPolicy::CancelPrevious);
        assert_eq!(config.max_upload_bytes, 2048);
        assert_eq!(config.static_dir, Some(PathBuf::from("/srv/www")));
        assert!(config.cors_permissive);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = from_pairs(&[
            (ENV_BIND, "not-an-addr"),
            (ENV_TIMEOUT_SECS, "0"),
            (ENV_HISTORY_CAPACITY, "-3"),
            (ENV_CHAT_BUSY_POLICY, "queue"),
            (ENV_MAX_UPLOAD_BYTES, "lots"),
            (ENV_CORS, "maybe"),
        ]);
        let defaults = AppConfig::default();
        assert_eq!(config.bind_addr, defaults.bind_addr);
        assert_eq!(config.classifier_timeout_secs, defaults.classifier_timeout_secs);
        assert_eq!(config.history_capacity, defaults.history_capacity);
        assert_eq!(config.chat_busy_policy, BusyPolicy::Reject);
        assert_eq!(config.max_upload_bytes, defaults.max_upload_bytes);
        assert!(!config.cors_permissive);
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = from_pairs(&[(ENV_API_BASE, "   "), (ENV_STATIC_DIR, "")]);
        assert_eq!(config.classifier_base_url, DEFAULT_API_BASE);
        assert_eq!(config.static_dir, None);
    }

    #[test]
    fn default_log_filter_scopes_crate() {
        assert!(default_log_filter().starts_with("xray_triage="));
    }
}

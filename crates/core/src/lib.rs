pub mod analytics;
pub mod domain;
pub mod error;
pub mod orchestrator;
pub mod view;

pub mod config {
    use std::time::Duration;

    pub const DEFAULT_ANALYTICS_BASE_URL: &str = "http://127.0.0.1:8000";
    const DEFAULT_ANALYTICS_TIMEOUT_SECS: u64 = 30;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub analytics_base_url: String,
        pub analytics_timeout: Duration,
        pub sentry_dsn: Option<String>,
        pub default_assets: Option<String>,
        pub default_weights: Option<String>,
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                analytics_base_url: DEFAULT_ANALYTICS_BASE_URL.to_string(),
                analytics_timeout: Duration::from_secs(DEFAULT_ANALYTICS_TIMEOUT_SECS),
                sentry_dsn: None,
                default_assets: None,
                default_weights: None,
            }
        }
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let analytics_base_url = std::env::var("ANALYTICS_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ANALYTICS_BASE_URL.to_string());

            let timeout_secs = std::env::var("ANALYTICS_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(DEFAULT_ANALYTICS_TIMEOUT_SECS);

            Ok(Self {
                analytics_base_url,
                analytics_timeout: Duration::from_secs(timeout_secs),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
                default_assets: std::env::var("QUANTFOLIO_DEFAULT_ASSETS").ok(),
                default_weights: std::env::var("QUANTFOLIO_DEFAULT_WEIGHTS").ok(),
            })
        }
    }
}

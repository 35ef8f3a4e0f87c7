use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_SERVICE_URL: &str = "translate.google.com";
pub const DEFAULT_FALLBACK_SERVICE_URL: &str = "translate.googleapis.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";
pub const DEFAULT_REFERER: &str = "https://translate.google.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_DEST_LANG: &str = "en";
pub const DEFAULT_SRC_LANG: &str = "auto";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceConfig {
    pub service_urls: Vec<String>,
    pub user_agent: String,
    pub timeout: Duration,
    pub use_fallback: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service_urls: vec![DEFAULT_SERVICE_URL.to_owned()],
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            use_fallback: false,
        }
    }
}

impl ServiceConfig {
    pub fn with_service_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.service_urls = urls.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_fallback(mut self, use_fallback: bool) -> Self {
        self.use_fallback = use_fallback;
        self
    }

    /// Hosts requests are sent to. The fallback set replaces any configured hosts.
    pub fn effective_service_urls(&self) -> Vec<String> {
        if self.use_fallback {
            vec![DEFAULT_FALLBACK_SERVICE_URL.to_owned()]
        } else {
            self.service_urls.clone()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let hosts = self.effective_service_urls();
        if hosts.is_empty() {
            return Err(ConfigError::NoServiceUrls);
        }
        if hosts.iter().any(|h| h.trim().is_empty()) {
            return Err(ConfigError::EmptyServiceUrl);
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::EmptyUserAgent);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("at least one service url is required")]
    NoServiceUrls,
    #[error("service url must not be empty")]
    EmptyServiceUrl,
    #[error("user agent must not be empty")]
    EmptyUserAgent,
    #[error("timeout must be > 0 s")]
    ZeroTimeout,
}

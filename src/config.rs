//! Backend connection settings

use std::time::Duration;

use crate::state::CityId;

pub const DEFAULT_BASE_URL: &str = "http://localhost:9000";

/// Where the city backend lives and how long to wait for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL without a trailing slash
    pub base_url: String,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn cities_url(&self) -> String {
        format!("{}/cities", self.base_url)
    }

    pub fn city_url(&self, id: &CityId) -> String {
        format!(
            "{}/cities/{}",
            self.base_url,
            urlencoding::encode(&id.to_string())
        )
    }
}

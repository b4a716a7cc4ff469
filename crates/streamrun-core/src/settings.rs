//! Process-wide framework settings read during descriptor compilation.

use serde::{Deserialize, Serialize};

/// Settings fixed at process start and passed explicitly to whatever
/// compiles launch descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkSettings {
    /// Base URL of the framework API. Executors are fetched from
    /// `{api}/resource/{executor}`.
    pub api: String,

    /// Log level forwarded to every executor via `--log.level`.
    pub log_level: String,
}

impl Default for FrameworkSettings {
    fn default() -> Self {
        Self {
            api: "http://127.0.0.1:6666".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl FrameworkSettings {
    /// Builder method to set the API base URL.
    pub fn with_api(mut self, api: impl Into<String>) -> Self {
        self.api = api.into();
        self
    }

    /// Builder method to set the executor log level.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Fetch URL of an executor artifact.
    pub fn resource_url(&self, executor: &str) -> String {
        format!("{}/resource/{}", self.api.trim_end_matches('/'), executor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_url_ignores_trailing_slash() {
        let settings = FrameworkSettings::default().with_api("http://master:7000/");
        assert_eq!(
            settings.resource_url("consumer.sh"),
            "http://master:7000/resource/consumer.sh"
        );
    }
}

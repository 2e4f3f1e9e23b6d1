use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

use crate::page::ElementPath;

pub const DEFAULT_ANCHOR_PATH: &str =
    "/html/body/div[2]/div[2]/div/main/div[2]/div/div/div/pace-island/div/div/div[1]/div[1]";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub display: DisplayConfig,
    pub page: PageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub version: Option<String>,
    pub platform: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    pub poll_interval_ms: u64,
    pub stats_url: String,
    /// Parsed once at load; an invalid path fails configuration loading.
    pub anchor_path: ElementPath,
    pub failure_policy: FailurePolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageConfig {
    pub start_url: String,
    pub snapshot: Option<String>,
    pub match_patterns: Vec<String>,
}

/// What the overlay shows when a cycle fails (no room id, request failed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Clear the overlay and create nothing.
    Remove,
    /// Show a "获取失败" overlay without a link.
    Label,
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl DisplayConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 4000,
            stats_url: "https://www.phpnbw.com".to_string(),
            anchor_path: ElementPath::parse(DEFAULT_ANCHOR_PATH).unwrap(),
            failure_policy: FailurePolicy::Remove,
        }
    }
}

/// Loads `Settings.toml` from the working directory, overridden by `APP__*` variables.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from("Settings.toml")
}

pub fn load_config_from(path: &str) -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        .set_default("service.base_url", "https://dyapi.phpnbw.com")?
        .set_default("service.timeout_ms", 5000)?
        .set_default("display.poll_interval_ms", 4000)?
        .set_default("display.stats_url", "https://www.phpnbw.com")?
        .set_default("display.anchor_path", DEFAULT_ANCHOR_PATH)?
        .set_default("display.failure_policy", "remove")?
        .set_default("page.start_url", "https://live.douyin.com/613217711064")?
        .set_default(
            "page.match_patterns",
            vec!["https://live.douyin.com/*", "https://www.douyin.com/*"],
        )?
        .add_source(File::new(path, FileFormat::Toml).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    settings.try_deserialize::<AppConfig>()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Settings.toml");

        let config = load_config_from(path.to_str().unwrap()).unwrap();

        assert_eq!(config.service.base_url, "https://dyapi.phpnbw.com");
        assert_eq!(config.service.timeout(), Duration::from_secs(5));
        assert_eq!(config.service.version, None);
        assert_eq!(config.display.poll_interval(), Duration::from_secs(4));
        assert_eq!(config.display.anchor_path, ElementPath::parse(DEFAULT_ANCHOR_PATH).unwrap());
        assert_eq!(config.display.failure_policy, FailurePolicy::Remove);
        assert_eq!(config.page.snapshot, None);
        assert_eq!(
            config.page.match_patterns,
            vec!["https://live.douyin.com/*", "https://www.douyin.com/*"]
        );
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Settings.toml");
        fs::write(
            &path,
            r#"
[service]
base_url = "http://127.0.0.1:9000"
timeout_ms = 1500
platform = "web"

[display]
poll_interval_ms = 5000
failure_policy = "label"

[page]
snapshot = "page.html"
"#,
        )
        .unwrap();

        let config = load_config_from(path.to_str().unwrap()).unwrap();

        assert_eq!(config.service.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.service.timeout(), Duration::from_millis(1500));
        assert_eq!(config.service.platform.as_deref(), Some("web"));
        assert_eq!(config.display.poll_interval_ms, 5000);
        assert_eq!(config.display.failure_policy, FailurePolicy::Label);
        assert_eq!(config.display.stats_url, "https://www.phpnbw.com");
        assert_eq!(config.page.snapshot.as_deref(), Some("page.html"));
    }

    #[test]
    fn malformed_anchor_path_is_rejected_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Settings.toml");
        fs::write(&path, "[display]\nanchor_path = \"html/body/div[0]\"\n").unwrap();

        assert!(load_config_from(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Settings.toml");
        fs::write(&path, "[page]\nstart_url = \"https://live.douyin.com/1\"\n").unwrap();

        // No other test reads page.start_url, so setting it here is isolated.
        std::env::set_var("APP__PAGE__START_URL", "https://live.douyin.com/574023227986");
        let config = load_config_from(path.to_str().unwrap());
        std::env::remove_var("APP__PAGE__START_URL");

        assert_eq!(
            config.unwrap().page.start_url,
            "https://live.douyin.com/574023227986"
        );
    }

    #[test]
    fn unknown_failure_policy_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Settings.toml");
        fs::write(&path, "[display]\nfailure_policy = \"blink\"\n").unwrap();

        assert!(load_config_from(path.to_str().unwrap()).is_err());
    }
}

use serde::Deserialize;
use std::time::Duration;

use crate::domain::insights::InsightTolerances;
use crate::domain::rover::RoverThresholds;
use crate::domain::status::{SeverityLabels, StatusThresholds};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub firebase: FirebaseSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub feeds: FeedSettings,
    #[serde(default)]
    pub mood: MoodSettings,
    #[serde(default)]
    pub insights: InsightTolerances,
    #[serde(default)]
    pub rover: RoverThresholds,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FirebaseSettings {
    pub database_url: String,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl FirebaseSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_request_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Collection names in the realtime database
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FeedSettings {
    pub greenhouse: String,
    pub rover: String,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            greenhouse: "greenhouse_measurements".to_string(),
            rover: "rover_status".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct MoodSettings {
    pub thresholds: StatusThresholds,
    pub labels: SeverityLabels,
}

/// Load `config/terrasense.toml` (optional), overridden by `TERRASENSE__SECTION__KEY` variables.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/terrasense").required(false))
        .add_source(
            config::Environment::with_prefix("TERRASENSE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

use crate::poll::PollSettings;
use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const BASE_URL_ENV: &str = "ONBOARD_API_BASE_URL";
const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub poll_interval_secs: Option<u64>,
    #[serde(default)]
    pub max_polls: Option<u32>,
}

impl AppConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path).context("read config")?;
        let config = serde_json::from_str(&data).context("parse config")?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("create config directory")?;
        }
        let data = serde_json::to_string_pretty(self).context("serialize config")?;
        fs::write(path, data).context("write config")?;
        Ok(())
    }

    /// Effective API base path: the environment overrides the config file,
    /// which overrides the built-in default.
    pub fn base_url(&self) -> String {
        self.base_url_with(std::env::var(BASE_URL_ENV).ok())
    }

    fn base_url_with(&self, env_value: Option<String>) -> String {
        env_value
            .filter(|value| !value.is_empty())
            .or_else(|| self.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn poll_settings(&self) -> PollSettings {
        let defaults = PollSettings::default();
        PollSettings {
            interval: self
                .poll_interval_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.interval),
            max_polls: self.max_polls,
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let project = ProjectDirs::from("com", "ci-workflow-onboard", "ci-workflow-onboard")
        .context("resolve project dirs")?;
    Ok(project.config_dir().join("config.json"))
}

//! Application settings that persist across sessions.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context as _, Result};
use newsletters_core::Collections;
use serde::{Deserialize, Serialize};

/// Directory name under the platform config and data dirs.
const APP_DIR: &str = "newsletters";

/// Environment variable overriding the project ID.
pub const PROJECT_ID_ENV: &str = "NEWSLETTERS_PROJECT_ID";

/// Environment variable overriding the API key.
pub const API_KEY_ENV: &str = "NEWSLETTERS_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub project_id: String,
    pub api_key: String,
    pub metadata_collection: String,
    pub data_collection: String,
    pub poll_interval_secs: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        let collections = Collections::default();
        Self {
            project_id: String::new(),
            api_key: String::new(),
            metadata_collection: collections.metadata,
            data_collection: collections.data,
            poll_interval_secs: 30,
        }
    }
}

impl AppSettings {
    /// Applies `NEWSLETTERS_*` environment overrides.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(PROJECT_ID_ENV).ok(),
            std::env::var(API_KEY_ENV).ok(),
        )
    }

    fn with_overrides(mut self, project_id: Option<String>, api_key: Option<String>) -> Self {
        if let Some(project_id) = project_id.filter(|v| !v.is_empty()) {
            self.project_id = project_id;
        }
        if let Some(api_key) = api_key.filter(|v| !v.is_empty()) {
            self.api_key = api_key;
        }
        self
    }

    /// Returns true once a project and key are known.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.project_id.is_empty() && !self.api_key.is_empty()
    }

    #[must_use]
    pub fn collections(&self) -> Collections {
        Collections {
            metadata: self.metadata_collection.clone(),
            data: self.data_collection.clone(),
        }
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Directory holding the offline cache.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn cache_path() -> PathBuf {
    data_dir().join("newsletters.db")
}

/// Load application settings from file, with environment overrides.
pub async fn load_settings() -> Result<AppSettings> {
    Ok(load_settings_from(&settings_path()).await?.with_env_overrides())
}

async fn load_settings_from(path: &Path) -> Result<AppSettings> {
    if !path.exists() {
        return Ok(AppSettings::default());
    }

    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    serde_json::from_str(&contents).with_context(|| format!("Invalid settings in {}", path.display()))
}

/// Save application settings to file.
pub async fn save_settings(settings: &AppSettings) -> Result<PathBuf> {
    let path = settings_path();
    save_settings_to(settings, &path).await?;
    tracing::info!("Settings saved to {:?}", path);
    Ok(path)
}

async fn save_settings_to(settings: &AppSettings, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir).await?;
    }

    let contents = serde_json::to_string_pretty(settings)?;
    tokio::fs::write(path, contents).await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings: AppSettings = serde_json::from_str(r#"{"project_id": "p"}"#).unwrap();
        assert_eq!(settings.project_id, "p");
        assert_eq!(settings.metadata_collection, "NewsletterMetadata");
        assert_eq!(settings.data_collection, "NewsletterData");
        assert_eq!(settings.poll_interval_secs, 30);
        assert!(!settings.is_configured());
    }

    #[test]
    fn test_overrides() {
        let settings = AppSettings::default()
            .with_overrides(Some("proj".to_string()), Some(String::new()));
        assert_eq!(settings.project_id, "proj");
        assert_eq!(settings.api_key, "");
    }

    #[test]
    fn test_zero_poll_interval_is_clamped() {
        let settings = AppSettings {
            poll_interval_secs: 0,
            ..AppSettings::default()
        };
        assert_eq!(settings.poll_interval(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let path = std::env::temp_dir()
            .join(format!("newsletters-settings-{}", std::process::id()))
            .join("settings.json");
        let settings = AppSettings {
            project_id: "p".to_string(),
            api_key: "k".to_string(),
            ..AppSettings::default()
        };

        save_settings_to(&settings, &path).await.unwrap();
        let loaded = load_settings_from(&path).await.unwrap();
        assert_eq!(loaded, settings);

        tokio::fs::remove_dir_all(path.parent().unwrap()).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("newsletters-no-such-dir/settings.json");
        assert_eq!(load_settings_from(&path).await.unwrap(), AppSettings::default());
    }
}

use std::{path::Path, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use repvoice_domain::{Mode, ResolverPolicy, ScriptCheck};
use repvoice_gateway::{ProviderConfig, ProviderKind};

pub const API_KEY_VARIABLE: &str = "REPVOICE_API_KEY";

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub endpoint: String,
    pub provider: Option<ProviderKind>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: u64,
    pub mode: ModeSetting,
    pub max_distance: usize,
    pub script_check: ScriptSetting,
    /// Directory of the JSON store. Records are kept in memory if unset.
    pub data_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:1234/v1/chat/completions".to_string(),
            provider: None,
            api_key: None,
            model: None,
            timeout_secs: 30,
            mode: ModeSetting::Bodyweight,
            max_distance: 2,
            script_check: ScriptSetting::Alphabetic,
            data_dir: None,
        }
    }
}

impl Settings {
    /// Read settings from a JSON file, falling back to defaults if the file does not exist.
    ///
    /// A key in `REPVOICE_API_KEY` takes precedence over the one in the file.
    pub fn load(path: &Path) -> Result<Self> {
        let settings = Self::read(path)?;
        Ok(settings.with_api_key(std::env::var(API_KEY_VARIABLE).ok()))
    }

    fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse settings from {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("failed to write settings to {}", path.display()))
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        if let Some(api_key) = api_key.filter(|key| !key.trim().is_empty()) {
            self.api_key = Some(api_key);
        }
        self
    }

    #[must_use]
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            endpoint: self.endpoint.clone(),
            provider: self.provider,
            api_key: self.api_key.clone(),
            model: self.model.clone(),
        }
    }

    #[must_use]
    pub fn resolver_policy(&self) -> ResolverPolicy {
        ResolverPolicy {
            max_distance: self.max_distance,
            script_check: self.script_check.into(),
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModeSetting {
    Bodyweight,
    Weighted,
}

impl From<ModeSetting> for Mode {
    fn from(value: ModeSetting) -> Self {
        match value {
            ModeSetting::Bodyweight => Mode::Bodyweight,
            ModeSetting::Weighted => Mode::Weighted,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScriptSetting {
    Any,
    Alphabetic,
    Japanese,
}

impl From<ScriptSetting> for ScriptCheck {
    fn from(value: ScriptSetting) -> Self {
        match value {
            ScriptSetting::Any => ScriptCheck::Any,
            ScriptSetting::Alphabetic => ScriptCheck::Alphabetic,
            ScriptSetting::Japanese => ScriptCheck::Japanese,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_read_missing_file() {
        let directory = tempfile::tempdir().unwrap();

        assert_eq!(
            Settings::read(&directory.path().join("settings.json")).unwrap(),
            Settings::default()
        );
    }

    #[test]
    fn test_read_partial_file() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"endpoint": "https://api.anthropic.com/v1/messages", "api_key": "secret", "mode": "weighted", "script_check": "japanese"}"#,
        )
        .unwrap();

        let settings = Settings::read(&path).unwrap();

        assert_eq!(
            settings,
            Settings {
                endpoint: "https://api.anthropic.com/v1/messages".to_string(),
                api_key: Some("secret".to_string()),
                mode: ModeSetting::Weighted,
                script_check: ScriptSetting::Japanese,
                ..Settings::default()
            }
        );
        assert_eq!(settings.provider_config().kind(), ProviderKind::Anthropic);
        assert_eq!(Mode::from(settings.mode), Mode::Weighted);
        assert_eq!(
            settings.resolver_policy(),
            ResolverPolicy {
                max_distance: 2,
                script_check: ScriptCheck::Japanese,
            }
        );
    }

    #[test]
    fn test_read_invalid_file() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("settings.json");
        std::fs::write(&path, r#"{"mode": "heavy"}"#).unwrap();

        let err = Settings::read(&path).unwrap_err();

        assert!(err.to_string().starts_with("failed to parse settings from"));
    }

    #[test]
    fn test_save_and_read() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("config").join("settings.json");
        let settings = Settings {
            provider: Some(ProviderKind::Gemini),
            model: Some("gemini-2.0-flash".to_string()),
            timeout_secs: 5,
            data_dir: Some(directory.path().join("data")),
            ..Settings::default()
        };

        settings.save(&path).unwrap();

        assert_eq!(Settings::read(&path).unwrap(), settings);
        assert_eq!(settings.timeout(), Duration::from_secs(5));
    }

    #[rstest]
    #[case::override_key(Some("file"), Some("env"), Some("env"))]
    #[case::no_override(Some("file"), None, Some("file"))]
    #[case::blank_override(Some("file"), Some(" "), Some("file"))]
    #[case::only_env(None, Some("env"), Some("env"))]
    fn test_with_api_key(
        #[case] file: Option<&str>,
        #[case] env: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let settings = Settings {
            api_key: file.map(str::to_string),
            ..Settings::default()
        }
        .with_api_key(env.map(str::to_string));

        assert_eq!(settings.api_key.as_deref(), expected);
    }
}

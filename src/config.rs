use crate::error::{CallMatchError, Result};
use call_matcher_common::{MatchOptions, MatchPolicy};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Имена листов итоговой книги
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetNames {
    pub matches: String,
    pub visits: String,
    pub calls: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            matches: "Совпадения".into(),
            visits: "Метрика".into(),
            calls: "Звонки".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub matching: MatchOptions,
    pub sheets: SheetNames,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.matching.validate()?;
        Ok(config)
    }

    /// Записать настройки по умолчанию, не читая текущий файл
    ///
    /// Работает и тогда, когда файл повреждён или не проходит проверку.
    pub fn reset() -> Result<Self> {
        Self::reset_at(&Self::config_path()?)
    }

    pub fn reset_at(path: &std::path::Path) -> Result<Self> {
        let config = Self::default();
        config.save_to(path)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &std::path::Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CallMatchError::Config("домашняя папка не найдена".into()))?;
        Ok(home.join(".config").join("call-matcher").join("config.json"))
    }

    /// Настройки запуска с учётом флагов командной строки
    pub fn match_options(&self, policy: Option<MatchPolicy>, window_minutes: Option<i64>) -> MatchOptions {
        let mut options = self.matching.clone();
        if let Some(policy) = policy {
            options.policy = policy;
        }
        if let Some(window) = window_minutes {
            options.window_minutes = window;
        }
        options
    }

    pub fn set_policy(&mut self, policy: MatchPolicy) -> Result<()> {
        self.matching.policy = policy;
        self.save()
    }

    pub fn set_window(&mut self, minutes: i64) -> Result<()> {
        let mut matching = self.matching.clone();
        matching.window_minutes = minutes;
        matching.window()?;
        self.matching = matching;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.matching.window_minutes, 60);
        assert_eq!(config.matching.policy, MatchPolicy::FirstPerCall);
        assert_eq!(config.sheets.matches, "Совпадения");
    }

    #[test]
    fn test_cli_overrides() {
        let config = Config::default();
        let options = config.match_options(Some(MatchPolicy::NoDedup), Some(90));
        assert_eq!(options.policy, MatchPolicy::NoDedup);
        assert_eq!(options.window_minutes, 90);

        let untouched = config.match_options(None, None);
        assert_eq!(untouched, config.matching);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.matching.policy = MatchPolicy::NearestPerVisit;
        config.sheets.calls = "Calls".into();
        config.save_to(&path).expect("Не удалось сохранить настройки");

        let loaded = Config::load_from(&path).expect("Не удалось прочитать настройки");
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"matching": {"window_minutes": 30}}"#).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.matching.window_minutes, 30);
        assert_eq!(loaded.sheets, SheetNames::default());
    }

    #[test]
    fn test_invalid_window_in_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"matching": {"window_minutes": 0}}"#).unwrap();

        assert!(matches!(Config::load_from(&path), Err(CallMatchError::Common(_))));
    }

    #[test]
    fn test_reset_over_invalid_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"matching": {"window_minutes": 0}}"#).unwrap();
        assert!(Config::load_from(&path).is_err());

        let config = Config::reset_at(&path).unwrap();
        assert_eq!(config, Config::default());

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_reset_over_broken_json() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ не json").unwrap();

        Config::reset_at(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().matching.window_minutes, 60);
    }

    #[test]
    fn test_set_window_rejects_huge_value() {
        let mut config = Config::default();
        let err = config.set_window(200_000_000_000).unwrap_err();
        assert!(matches!(err, CallMatchError::Common(_)));
        assert_eq!(config.matching.window_minutes, 60);
    }
}

use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;

use super::alerts::engine::AlertEngineConfig;
use super::alerts::model::AlertCondition;
use super::error::{InsightError, Result};
use super::ranking::OTHER_CATEGORY;

fn default_top_comment_count() -> usize {
    5
}

fn default_other_category() -> String {
    OTHER_CATEGORY.to_string()
}

/// Dashboard settings: alert conditions and top-comment display options.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Alert system configuration
    #[serde(default)]
    pub alert_settings: AlertEngineConfig,
    /// How many top comments to show overall and per category
    #[serde(default = "default_top_comment_count")]
    pub top_comment_count: usize,
    /// Category sorted after all others in display order
    #[serde(default = "default_other_category")]
    pub other_category: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            alert_settings: AlertEngineConfig::default(),
            top_comment_count: default_top_comment_count(),
            other_category: default_other_category(),
        }
    }
}

impl Settings {
    /// Validate and append a condition, assigning a fresh id.
    /// Returns the assigned id.
    pub fn add_condition(&mut self, mut condition: AlertCondition) -> Result<String> {
        condition.validate()?;

        let mut id = chrono::Utc::now().timestamp_millis();
        while self.find_condition(&id.to_string()).is_some() {
            id += 1;
        }
        condition.id = id.to_string();

        log::info!("Added alert condition '{}' ({})", condition.name, condition.id);
        self.alert_settings.conditions.push(condition);
        Ok(id.to_string())
    }

    /// Remove a condition by id. Returns whether anything was removed.
    pub fn remove_condition(&mut self, id: &str) -> bool {
        let before = self.alert_settings.conditions.len();
        self.alert_settings.conditions.retain(|c| c.id != id);
        before != self.alert_settings.conditions.len()
    }

    /// Flip a condition's enabled flag. Returns the new state.
    pub fn toggle_condition(&mut self, id: &str) -> Result<bool> {
        let condition = self
            .alert_settings
            .conditions
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| InsightError::InvalidCondition(format!("no condition with id {}", id)))?;
        condition.enabled = !condition.enabled;
        Ok(condition.enabled)
    }

    pub fn find_condition(&self, id: &str) -> Option<&AlertCondition> {
        self.alert_settings.conditions.iter().find(|c| c.id == id)
    }
}

pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(app_config_dir: PathBuf) -> Self {
        Self {
            config_path: app_config_dir.join("settings.json"),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Load settings, falling back to defaults when the file is missing or unreadable.
    pub fn load(&self) -> Settings {
        if !self.config_path.exists() {
            return Settings::default();
        }
        let content = match fs::read_to_string(&self.config_path) {
            Ok(content) => content,
            Err(err) => {
                log::warn!("Failed to read {:?}: {}; using defaults", self.config_path, err);
                return Settings::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Invalid settings in {:?}: {}; using defaults", self.config_path, err);
                Settings::default()
            }
        }
    }

    pub fn save(&self, settings: &Settings) -> io::Result<()> {
        // Ensure directory exists
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.config_path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alerts::model::AlertTarget;
    use tempfile::tempdir;

    fn named(name: &str) -> AlertCondition {
        AlertCondition {
            name: name.to_string(),
            ..AlertCondition::template()
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new(dir.path().to_path_buf());

        let default = manager.load();
        assert_eq!(default.top_comment_count, 5);
        assert_eq!(default.other_category, "その他");

        let mut new_settings = Settings {
            top_comment_count: 8,
            ..Settings::default()
        };
        new_settings.add_condition(named("ネガティブコメント多数")).unwrap();

        manager.save(&new_settings).unwrap();
        let loaded = manager.load();

        assert_eq!(loaded, new_settings);
        assert_eq!(loaded.top_comment_count, 8);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new(dir.path().to_path_buf());
        fs::write(manager.path(), "{ not json").unwrap();

        assert_eq!(manager.load(), Settings::default());
    }

    #[test]
    fn test_partial_file_uses_field_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new(dir.path().to_path_buf());
        fs::write(manager.path(), r#"{"top_comment_count": 3}"#).unwrap();

        let loaded = manager.load();
        assert_eq!(loaded.top_comment_count, 3);
        assert!(loaded.alert_settings.conditions.is_empty());
        assert_eq!(loaded.other_category, "その他");
    }

    #[test]
    fn test_add_condition_assigns_unique_ids() {
        let mut settings = Settings::default();
        let first = settings.add_condition(named("a")).unwrap();
        let second = settings.add_condition(named("b")).unwrap();

        assert_ne!(first, second);
        assert_eq!(settings.find_condition(&first).unwrap().name, "a");
        assert_eq!(settings.alert_settings.conditions.len(), 2);
    }

    #[test]
    fn test_add_condition_rejects_invalid() {
        let mut settings = Settings::default();
        assert!(settings.add_condition(named("")).is_err());

        let mut bad_importance = named("importance");
        bad_importance.target = AlertTarget::Importance;
        bad_importance.target_value = Some("urgent".to_string());
        assert!(matches!(
            settings.add_condition(bad_importance),
            Err(InsightError::InvalidLabel(_))
        ));
        assert!(settings.alert_settings.conditions.is_empty());
    }

    #[test]
    fn test_toggle_and_remove() {
        let mut settings = Settings::default();
        let id = settings.add_condition(named("a")).unwrap();

        assert!(!settings.toggle_condition(&id).unwrap());
        assert!(settings.toggle_condition(&id).unwrap());
        assert!(settings.toggle_condition("missing").is_err());

        assert!(settings.remove_condition(&id));
        assert!(!settings.remove_condition(&id));
        assert!(settings.find_condition(&id).is_none());
    }
}

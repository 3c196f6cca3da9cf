use crate::domain::{PreferenceKey, Preferences};
use crate::errors::NewsResult;
use crate::storage::traits::PreferenceRepository;

/// One row of the settings screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingEntry {
    pub key: PreferenceKey,
    pub value: String,
    pub summary: String,
}

impl SettingEntry {
    fn new(key: PreferenceKey, value: &str) -> Self {
        Self {
            key,
            value: value.to_string(),
            summary: key.summary(value),
        }
    }

    /// True when the displayed summary differs from what is stored
    pub fn is_clamped(&self) -> bool {
        self.key == PreferenceKey::PageSize && self.summary != self.value
    }
}

pub struct SettingsService<R: PreferenceRepository> {
    repository: R,
}

impl<R: PreferenceRepository> SettingsService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn preferences(&self) -> NewsResult<Preferences> {
        Preferences::load(&self.repository)
    }

    /// All settings with their display summaries
    pub fn show(&self) -> NewsResult<Vec<SettingEntry>> {
        let prefs = self.preferences()?;

        Ok(PreferenceKey::ALL
            .iter()
            .map(|key| SettingEntry::new(*key, prefs.value(*key)))
            .collect())
    }

    /// Validate and store a value. The value is stored exactly as given.
    pub fn set(&self, key: &str, value: &str) -> NewsResult<SettingEntry> {
        let key: PreferenceKey = key.parse()?;
        key.validate(value)?;

        self.repository.set(key.as_str(), value)?;
        Ok(SettingEntry::new(key, value))
    }

    /// Restore one setting, or all of them, to the default
    pub fn reset(&self, key: Option<&str>) -> NewsResult<Vec<PreferenceKey>> {
        let keys = match key {
            Some(key) => vec![key.parse::<PreferenceKey>()?],
            None => PreferenceKey::ALL.to_vec(),
        };

        for key in &keys {
            self.repository.remove(key.as_str())?;
        }

        Ok(keys)
    }
}

//! Best-effort persistence of view preferences across sessions.
//!
//! Every tracked preference lives under its own key so that a corrupt or
//! missing value only resets that one preference to its default.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::preferences::ViewPreferences;
use crate::preferences::errors::{PreferenceError, PreferenceResult};

pub mod errors;
pub mod memory;
#[cfg(feature = "client")]
pub mod sqlite;

pub const VIEW_MODE_KEY: &str = "crm_view_mode";
pub const FILTERS_KEY: &str = "crm_filters";
pub const LIST_SORT_KEY: &str = "crm_list_sort";
pub const STAGE_SORTS_KEY: &str = "crm_stage_sorts";
pub const FILTER_PANEL_KEY: &str = "crm_filter_panel";
pub const SEEN_NOTIFICATIONS_KEY: &str = "crm_sla_seen_ids";
pub const SESSION_TOKEN_KEY: &str = "crm_session_token";

/// Raw string key/value storage.
pub trait PreferenceStore {
    fn read(&self, key: &str) -> PreferenceResult<Option<String>>;
    fn write(&self, key: &str, value: &str) -> PreferenceResult<()>;
    fn remove(&self, key: &str) -> PreferenceResult<()>;
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for &S {
    fn read(&self, key: &str) -> PreferenceResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> PreferenceResult<()> {
        (**self).write(key, value)
    }

    fn remove(&self, key: &str) -> PreferenceResult<()> {
        (**self).remove(key)
    }
}

/// JSON layer over a [`PreferenceStore`] that never fails.
pub struct PreferencePersistence<S> {
    store: S,
}

impl<S: PreferenceStore> PreferencePersistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Serializes and writes the value. Errors are logged and dropped.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(PreferenceError::from)
            .and_then(|json| self.store.write(key, &json));

        if let Err(err) = result {
            log::warn!("Failed to persist preference {key}: {err}");
        }
    }

    /// Returns the stored value, or `default` when it is absent, unreadable
    /// or unparseable.
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.store.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(err) => {
                log::warn!("Failed to read preference {key}: {err}");
                return default;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("Discarding corrupt preference {key}: {err}");
                default
            }
        }
    }

    pub fn forget(&self, key: &str) {
        if let Err(err) = self.store.remove(key) {
            log::warn!("Failed to remove preference {key}: {err}");
        }
    }

    /// Rehydrates every tracked preference independently.
    pub fn load_preferences(&self) -> ViewPreferences {
        let defaults = ViewPreferences::default();
        ViewPreferences {
            view_mode: self.load(VIEW_MODE_KEY, defaults.view_mode),
            filters: self.load(FILTERS_KEY, defaults.filters),
            list_sort: self.load(LIST_SORT_KEY, defaults.list_sort),
            stage_sorts: self.load(STAGE_SORTS_KEY, defaults.stage_sorts),
            filter_panel_visible: self.load(FILTER_PANEL_KEY, defaults.filter_panel_visible),
        }
    }

    /// Writes every tracked preference, each under its own key.
    pub fn save_preferences(&self, preferences: &ViewPreferences) {
        self.save(VIEW_MODE_KEY, &preferences.view_mode);
        self.save(FILTERS_KEY, &preferences.filters);
        self.save(LIST_SORT_KEY, &preferences.list_sort);
        self.save(STAGE_SORTS_KEY, &preferences.stage_sorts);
        self.save(FILTER_PANEL_KEY, &preferences.filter_panel_visible);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filter::FilterSet;
    use crate::domain::preferences::ViewMode;
    use crate::domain::sort::{SortField, SortSpec};
    use crate::domain::stage::PipelineStage;
    use crate::preferences::memory::MemoryPreferenceStore;

    struct FailingStore;

    impl PreferenceStore for FailingStore {
        fn read(&self, _key: &str) -> PreferenceResult<Option<String>> {
            Err(PreferenceError::Storage("disk on fire".to_string()))
        }

        fn write(&self, _key: &str, _value: &str) -> PreferenceResult<()> {
            Err(PreferenceError::Storage("quota exceeded".to_string()))
        }

        fn remove(&self, _key: &str) -> PreferenceResult<()> {
            Err(PreferenceError::Storage("read only".to_string()))
        }
    }

    #[test]
    fn load_of_missing_key_returns_default() {
        let persistence = PreferencePersistence::new(MemoryPreferenceStore::new());
        let value: Vec<i32> = persistence.load("never_written", vec![7, 8]);
        assert_eq!(value, vec![7, 8]);
    }

    #[test]
    fn storage_failures_are_swallowed() {
        let persistence = PreferencePersistence::new(FailingStore);
        persistence.save(VIEW_MODE_KEY, &ViewMode::List);
        persistence.forget(VIEW_MODE_KEY);
        assert_eq!(persistence.load(VIEW_MODE_KEY, ViewMode::Board), ViewMode::Board);
    }

    #[test]
    fn corrupt_key_does_not_reset_the_others() {
        let store = MemoryPreferenceStore::new();
        let persistence = PreferencePersistence::new(&store);

        let mut prefs = ViewPreferences {
            view_mode: ViewMode::Forecast,
            filters: FilterSet::new().event_type("social"),
            list_sort: SortSpec::desc(SortField::Budget),
            filter_panel_visible: true,
            ..ViewPreferences::default()
        };
        prefs
            .stage_sorts
            .insert(PipelineStage::Quoted, SortSpec::desc(SortField::CreatedAt));
        persistence.save_preferences(&prefs);

        store.write(FILTERS_KEY, "{not json").unwrap();

        let loaded = persistence.load_preferences();
        assert_eq!(loaded.filters, FilterSet::default());
        assert_eq!(loaded.view_mode, ViewMode::Forecast);
        assert_eq!(loaded.list_sort, SortSpec::desc(SortField::Budget));
        assert_eq!(loaded.stage_sorts, prefs.stage_sorts);
        assert!(loaded.filter_panel_visible);
    }
}

use super::{Settings, SettingsError, SettingsStore};
use std::sync::{Arc, Mutex, RwLock};

/// Current settings plus the store they persist to.
pub struct SettingsService {
    store: Box<dyn SettingsStore>,
    current: RwLock<Arc<Settings>>,
    /// Serializes save-then-swap so memory and disk agree
    write_lock: Mutex<()>,
}

impl SettingsService {
    /// Load once from `store`.
    ///
    /// Nothing saved, or a store that cannot be read, starts from defaults.
    pub fn load(store: Box<dyn SettingsStore>) -> Self {
        let initial = match store.load() {
            Ok(Some(settings)) => settings,
            Ok(None) => Settings::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load settings, using defaults");
                Settings::default()
            }
        };
        Self {
            store,
            current: RwLock::new(Arc::new(initial)),
            write_lock: Mutex::new(()),
        }
    }

    pub fn current(&self) -> Arc<Settings> {
        Arc::clone(&self.current.read().unwrap_or_else(|e| e.into_inner()))
    }

    /// Poll interval hint for page responses.
    pub fn refresh_rate_ms(&self) -> u64 {
        self.current().refresh_rate_ms
    }

    /// Validate, persist, then publish `settings`.
    ///
    /// On error the current settings are unchanged.
    pub fn update(&self, settings: Settings) -> Result<Arc<Settings>, SettingsError> {
        settings.validate()?;

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.store.save(&settings)?;

        let settings = Arc::new(settings);
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Arc::clone(&settings);
        tracing::info!(refresh_rate_ms = settings.refresh_rate_ms, "Settings updated");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{JsonFileStore, MemoryStore};

    struct FailingStore;

    impl SettingsStore for FailingStore {
        fn load(&self) -> Result<Option<Settings>, SettingsError> {
            Err(SettingsError::Invalid("unreadable".into()))
        }

        fn save(&self, _: &Settings) -> Result<(), SettingsError> {
            Err(SettingsError::Invalid("read-only".into()))
        }
    }

    #[test]
    fn test_load_prefers_saved_settings() {
        let saved = Settings {
            weather_city: "Austin".into(),
            ..Settings::default()
        };
        let service = SettingsService::load(Box::new(MemoryStore::with_settings(saved.clone())));
        assert_eq!(*service.current(), saved);
    }

    #[test]
    fn test_unreadable_store_falls_back_to_defaults() {
        let service = SettingsService::load(Box::new(FailingStore));
        assert_eq!(*service.current(), Settings::default());
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ broken").unwrap();
        let service = SettingsService::load(Box::new(JsonFileStore::new(path)));
        assert_eq!(service.refresh_rate_ms(), 2000);
    }

    #[test]
    fn test_update_persists_and_swaps() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let service = SettingsService::load(Box::new(JsonFileStore::new(&path)));

        let next = Settings {
            refresh_rate_ms: 5000,
            ..Settings::default()
        };
        service.update(next.clone()).unwrap();
        assert_eq!(service.refresh_rate_ms(), 5000);

        let reloaded = SettingsService::load(Box::new(JsonFileStore::new(&path)));
        assert_eq!(*reloaded.current(), next);
    }

    #[test]
    fn test_failed_update_keeps_current() {
        let service = SettingsService::load(Box::new(FailingStore));
        let next = Settings {
            show_debug: true,
            ..Settings::default()
        };
        assert!(service.update(next).is_err());
        assert!(!service.current().show_debug);

        let invalid = Settings {
            refresh_rate_ms: 0,
            ..Settings::default()
        };
        let memory = SettingsService::load(Box::new(MemoryStore::new()));
        assert!(matches!(memory.update(invalid), Err(SettingsError::Invalid(_))));
        assert_eq!(memory.refresh_rate_ms(), 2000);
    }
}

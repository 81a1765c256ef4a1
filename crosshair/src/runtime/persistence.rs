use super::storage::Storage;
use crate::core::prelude::*;
use crate::state::{
    Overrides, StateStore, deserialize_overrides, serialize_overrides,
};

pub const STORAGE_KEY: &str = "crosshair-vars";

/// Saves and restores a store's overrides under a single storage key.
/// Failures are logged and never interrupt the pipeline.
#[derive(Debug)]
pub struct Persistence<S: Storage> {
    storage: S,
    key: String,
}

impl<S: Storage> Persistence<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, STORAGE_KEY)
    }

    pub fn with_key(storage: S, key: &str) -> Self {
        Self {
            storage,
            key: key.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn save(&mut self, store: &StateStore) {
        let json = match serialize_overrides(store.overrides()) {
            Ok(json) => json,
            Err(err) => {
                error!("Unable to serialize state: {}", err);
                return;
            }
        };

        if let Err(err) = self.storage.set_item(&self.key, &json) {
            error!("Unable to save state under `{}`: {}", self.key, err);
        }
    }

    pub fn load(&self) -> Overrides {
        match self.storage.get_item(&self.key) {
            Ok(Some(json)) => deserialize_overrides(&json),
            Ok(None) => Overrides::default(),
            Err(err) => {
                warn!("Unable to read state under `{}`: {}", self.key, err);
                Overrides::default()
            }
        }
    }

    pub fn reset(&mut self) {
        if let Err(err) = self.storage.remove_item(&self.key) {
            error!("Unable to remove state under `{}`: {}", self.key, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::ControlValue;
    use crate::control::crosshair::*;
    use crate::geometry::ResolutionTable;
    use crate::runtime::MemoryStorage;

    fn store() -> StateStore {
        StateStore::new(&crosshair_controls(&ResolutionTable::default()))
    }

    #[test]
    fn test_save_then_load() {
        let storage = MemoryStorage::new();
        let mut persistence = Persistence::new(storage.clone());

        let mut store = store();
        store.set(GAP, ControlValue::Float(3.0));
        store.set(SHARP, ControlValue::Bool(false));
        persistence.save(&store);

        assert_eq!(
            storage.get(STORAGE_KEY).as_deref(),
            Some(r#"{"gap":3.0,"sharp":false}"#)
        );
        assert_eq!(&persistence.load(), store.overrides());
    }

    #[test]
    fn test_missing_or_malformed_loads_empty() {
        let mut storage = MemoryStorage::new();
        let persistence = Persistence::new(storage.clone());
        assert!(persistence.load().is_empty());

        storage.set_item(STORAGE_KEY, "{ nope").unwrap();
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_reset_removes_key() {
        let storage = MemoryStorage::new();
        let mut persistence = Persistence::new(storage.clone());
        persistence.save(&store());
        assert!(storage.get(STORAGE_KEY).is_some());

        persistence.reset();
        assert_eq!(storage.get(STORAGE_KEY), None);
    }
}

use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::rc::Rc;

use directories_next::BaseDirs;

use crate::core::prelude::*;

pub fn config_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|base| base.config_dir().join("CrosshairStudio"))
}

/// Key/value string storage, modelled on a browser's local storage
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, Box<dyn Error>>;

    fn set_item(
        &mut self,
        key: &str,
        value: &str,
    ) -> Result<(), Box<dyn Error>>;

    fn remove_item(&mut self, key: &str) -> Result<(), Box<dyn Error>>;
}

/// In-process storage. Clones share the same entries so a caller can keep a
/// handle to inspect what the pipeline wrote.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
    writes: Rc<Cell<usize>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    /// Number of successful `set_item` calls so far
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        Ok(self.get(key))
    }

    fn set_item(
        &mut self,
        key: &str,
        value: &str,
    ) -> Result<(), Box<dyn Error>> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), Box<dyn Error>> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside `dir`
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        match fs::read_to_string(self.path(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set_item(
        &mut self,
        key: &str,
        value: &str,
    ) -> Result<(), Box<dyn Error>> {
        let path = self.path(key);
        if let Some(parent_dir) = path.parent() {
            fs::create_dir_all(parent_dir)?;
        }
        fs::write(&path, value)?;
        trace!("Wrote {}", path.display());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), Box<dyn Error>> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("crosshair-storage-{}", name))
    }

    #[test]
    fn test_memory_storage_shares_entries() {
        let storage = MemoryStorage::new();
        let mut writer = storage.clone();

        writer.set_item("k", "v").unwrap();
        assert_eq!(storage.get("k"), Some("v".to_string()));
        assert_eq!(storage.write_count(), 1);

        writer.remove_item("k").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), None);
    }

    #[test]
    #[serial]
    fn test_file_storage_round_trip() {
        let dir = temp_dir("round-trip");
        let _ = fs::remove_dir_all(&dir);
        let mut storage = FileStorage::new(&dir);

        assert_eq!(storage.get_item("crosshair-vars").unwrap(), None);

        storage.set_item("crosshair-vars", r#"{"gap":3}"#).unwrap();
        assert!(dir.join("crosshair-vars.json").exists());
        assert_eq!(
            storage.get_item("crosshair-vars").unwrap().as_deref(),
            Some(r#"{"gap":3}"#)
        );

        storage.remove_item("crosshair-vars").unwrap();
        storage.remove_item("crosshair-vars").unwrap();
        assert_eq!(storage.get_item("crosshair-vars").unwrap(), None);

        let _ = fs::remove_dir_all(&dir);
    }
}

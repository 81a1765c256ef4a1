use std::error::Error;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::persistence::STORAGE_KEY;
use super::storage;
use crate::geometry::GOAL_HEIGHT;

pub const SETTINGS_VERSION: &str = "1";

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Settings {
    pub version: String,
    /// Key the crosshair state is persisted under
    pub storage_key: String,
    pub storage_dir: String,
    pub viewport_height: f32,
    /// Optional yaml control script replacing the built-in controls
    pub controls_path: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION.to_string(),
            storage_key: STORAGE_KEY.to_string(),
            storage_dir: default_storage_dir(),
            viewport_height: GOAL_HEIGHT,
            controls_path: None,
        }
    }
}

fn default_storage_dir() -> String {
    storage::config_dir()
        .unwrap_or_else(|| PathBuf::from(".crosshair"))
        .join("State")
        .to_string_lossy()
        .into_owned()
}

pub fn settings_path(dir: &Path) -> PathBuf {
    dir.join("settings.json")
}

impl Settings {
    pub fn save(&self, dir: &Path) -> Result<(), Box<dyn Error>> {
        let json = serde_json::to_string_pretty(self)?;
        let path = settings_path(dir);
        if let Some(parent_dir) = path.parent() {
            fs::create_dir_all(parent_dir)?;
        }
        fs::write(&path, json)?;
        Ok(())
    }

    pub fn load(dir: &Path) -> Result<Self, Box<dyn Error>> {
        let json = fs::read_to_string(settings_path(dir))?;
        let settings = serde_json::from_str::<Settings>(&json)?;
        Ok(settings)
    }

    pub fn load_if_exists(dir: &Path) -> Result<Option<Self>, Box<dyn Error>> {
        match Self::load(dir) {
            Ok(settings) => Ok(Some(settings)),
            Err(err) => {
                if err
                    .downcast_ref::<std::io::Error>()
                    .is_some_and(|e| e.kind() == ErrorKind::NotFound)
                {
                    Ok(None)
                } else {
                    Err(err)
                }
            }
        }
    }
}

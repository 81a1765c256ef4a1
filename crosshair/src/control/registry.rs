use indexmap::IndexMap;

use super::controls::{ControlConfig, ControlValue};
use crate::core::prelude::*;

/// Ordered, name-keyed collection of control descriptors. Declaration order is
/// the order widgets get created in.
#[derive(Clone, Debug, Default)]
pub struct ControlRegistry {
    configs: IndexMap<String, ControlConfig>,
}

impl ControlRegistry {
    pub fn new(controls: Vec<ControlConfig>) -> Self {
        let mut configs: IndexMap<String, ControlConfig> = IndexMap::new();

        for control in controls {
            let name = control.name().to_string();
            if configs.contains_key(&name) {
                warn!(
                    "Duplicate control `{}`; replacing the earlier definition",
                    name
                );
            }
            configs.insert(name, control);
        }

        Self { configs }
    }

    pub fn get(&self, name: &str) -> Option<&ControlConfig> {
        self.configs.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.configs.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ControlConfig> {
        self.configs.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.configs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Every control's configured default; `None` for controls that have
    /// none (image pickers)
    pub fn defaults(&self) -> IndexMap<String, Option<ControlValue>> {
        self.configs
            .iter()
            .map(|(name, config)| (name.clone(), config.default_value()))
            .collect()
    }

    /// Fails with the first missing name
    pub fn require(&self, names: &[&str]) -> Result<(), String> {
        match names.iter().find(|name| !self.has(name)) {
            Some(name) => Err(format!("missing required control `{}`", name)),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
pub struct ControlRegistryBuilder {
    controls: Vec<ControlConfig>,
}

impl ControlRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn control(mut self, control: ControlConfig) -> Self {
        self.controls.push(control);
        self
    }

    pub fn checkbox(self, name: &str, value: bool) -> Self {
        self.control(ControlConfig::checkbox(name, value))
    }

    pub fn slider(
        self,
        name: &str,
        value: f32,
        range: (f32, f32),
        step: f32,
    ) -> Self {
        self.control(ControlConfig::slider(name, value, range, step))
    }

    pub fn select<S>(self, name: &str, value: &str, options: &[S]) -> Self
    where
        S: AsRef<str>,
    {
        self.control(ControlConfig::select(name, value, options))
    }

    pub fn color(self, name: &str, value: &str) -> Self {
        self.control(ControlConfig::color(name, value))
    }

    pub fn image<S>(self, name: &str, accept: &[S]) -> Self
    where
        S: AsRef<str>,
    {
        self.control(ControlConfig::image(name, accept))
    }

    pub fn build(self) -> ControlRegistry {
        ControlRegistry::new(self.controls)
    }
}

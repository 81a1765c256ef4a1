use indexmap::IndexMap;

use super::serialization::deserialize_overrides;
use crate::control::{ControlRegistry, ControlValue};
use crate::core::prelude::*;

/// Values the user changed away from their control's default, in the order
/// they were first set
pub type Overrides = IndexMap<String, ControlValue>;

/// Single source of truth for every parameter. Only overrides are held;
/// anything absent reads through to the owning control's default.
#[derive(Clone, Debug, Default)]
pub struct StateStore {
    defaults: IndexMap<String, Option<ControlValue>>,
    overrides: Overrides,
    dirty: bool,
}

impl StateStore {
    pub fn new(registry: &ControlRegistry) -> Self {
        Self {
            defaults: registry.defaults(),
            overrides: Overrides::default(),
            dirty: false,
        }
    }

    /// Returns the override if present, else the control's default. `None`
    /// only for controls declared without one.
    ///
    /// # Panics
    /// When `name` is neither overridden nor registered. That is a
    /// misconfigured registry, not a runtime condition.
    pub fn get(&self, name: &str) -> Option<&ControlValue> {
        if let Some(value) = self.overrides.get(name) {
            return Some(value);
        }

        match self.defaults.get(name) {
            Some(default) => default.as_ref(),
            None => panic!("Control `{}` does not exist", name),
        }
    }

    pub fn float(&self, name: &str) -> f32 {
        self.get(name)
            .and_then(ControlValue::as_float)
            .unwrap_or_else(|| {
                error!("No float for `{}`. Returning NaN.", name);
                f32::NAN
            })
    }

    pub fn bool(&self, name: &str) -> bool {
        self.get(name)
            .and_then(ControlValue::as_bool)
            .unwrap_or_else(|| {
                error!("No bool for `{}`. Returning false.", name);
                false
            })
    }

    pub fn string(&self, name: &str) -> &str {
        self.optional_string(name).unwrap_or_else(|| {
            error!("No String for `{}`. Returning empty.", name);
            ""
        })
    }

    /// Like [`Self::string`] but silent when the control has no value at all
    pub fn optional_string(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(ControlValue::String(value)) => Some(value),
            Some(other) => {
                error!("Expected a String for `{}`, found {:?}", name, other);
                None
            }
            None => None,
        }
    }

    /// Stores `value` unconditionally and marks the store dirty. Nothing is
    /// recomputed here; the owner flushes once per turn.
    pub fn set(&mut self, name: &str, value: ControlValue) {
        self.overrides.insert(name.to_string(), value);
        self.dirty = true;
    }

    /// Replaces every override with the contents of `blob`. An absent or
    /// malformed blob leaves the store empty.
    pub fn load_from(&mut self, blob: Option<&str>) {
        self.restore(blob.map(deserialize_overrides).unwrap_or_default());
    }

    /// Replaces every override with `overrides`. Does not mark dirty.
    pub fn restore(&mut self, overrides: Overrides) {
        self.overrides = overrides;
    }

    /// Drops all overrides without scheduling anything
    pub fn clear(&mut self) {
        self.overrides.clear();
    }

    pub fn overrides(&self) -> &Overrides {
        &self.overrides
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether a flush is due and resets the flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

//! Control descriptors and the rules for turning raw widget input into typed
//! [`ControlValue`]s.

use serde::{Deserialize, Serialize};

use super::widget::{
    FileHandle, RawInput, WidgetHandle, WidgetHost, WidgetKind, WidgetSpec,
};
use crate::state::StateStore;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ControlValue {
    Bool(bool),
    Float(f32),
    String(String),
}

impl ControlValue {
    pub fn as_float(&self) -> Option<f32> {
        if let ControlValue::Float(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let ControlValue::Bool(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        if let ControlValue::String(v) = self {
            Some(v)
        } else {
            None
        }
    }

    /// The textual form a text-like widget would display for this value
    pub fn to_text(&self) -> String {
        match self {
            ControlValue::Bool(v) => v.to_string(),
            ControlValue::Float(v) => v.to_string(),
            ControlValue::String(v) => v.clone(),
        }
    }
}

impl From<f32> for ControlValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ControlValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<String> for ControlValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for ControlValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// Outcome of running a control's change handler over raw widget input
#[derive(Debug, PartialEq)]
pub enum Extraction {
    Value(ControlValue),
    /// The value arrives later, once the file has been read
    ReadFile(FileHandle),
    Rejected(String),
}

/// Behaviour shared by every control variant
pub trait Control {
    fn name(&self) -> &str;

    fn default_value(&self) -> Option<ControlValue>;

    fn widget_kind(&self, current: Option<&ControlValue>) -> WidgetKind;

    fn extract(&self, raw: RawInput) -> Extraction;

    /// Whether the change handler runs once right after binding. Inputs that
    /// start out empty have nothing to seed.
    fn seeds_on_bind(&self) -> bool {
        true
    }

    fn widget_spec(&self, current: Option<&ControlValue>) -> WidgetSpec {
        WidgetSpec {
            id: self.name().to_string(),
            label: self.name().to_string(),
            kind: self.widget_kind(current),
        }
    }

    /// Creates this control's widget, initialized from the store
    fn bind(
        &self,
        store: &StateStore,
        host: &mut dyn WidgetHost,
    ) -> WidgetHandle {
        host.create_widget(self.widget_spec(store.get(self.name())))
    }
}

fn unexpected(name: &str, raw: &RawInput) -> Extraction {
    Extraction::Rejected(format!("`{}` cannot accept {:?}", name, raw))
}

#[derive(Clone, Debug, PartialEq)]
pub struct Checkbox {
    pub name: String,
    pub value: bool,
}

impl Control for Checkbox {
    fn name(&self) -> &str {
        &self.name
    }

    fn default_value(&self) -> Option<ControlValue> {
        Some(ControlValue::Bool(self.value))
    }

    fn widget_kind(&self, current: Option<&ControlValue>) -> WidgetKind {
        WidgetKind::Checkbox {
            checked: current
                .and_then(ControlValue::as_bool)
                .unwrap_or(self.value),
        }
    }

    fn extract(&self, raw: RawInput) -> Extraction {
        match raw {
            RawInput::Checked(checked) => {
                Extraction::Value(ControlValue::Bool(checked))
            }
            other => unexpected(&self.name, &other),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Slider {
    pub name: String,
    pub value: f32,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl Control for Slider {
    fn name(&self) -> &str {
        &self.name
    }

    fn default_value(&self) -> Option<ControlValue> {
        Some(ControlValue::Float(self.value))
    }

    fn widget_kind(&self, current: Option<&ControlValue>) -> WidgetKind {
        WidgetKind::Range {
            value: current
                .map(ControlValue::to_text)
                .unwrap_or_else(|| self.value.to_string()),
            min: self.min,
            max: self.max,
            step: self.step,
        }
    }

    /// Parses the slider text without clamping. Text that is not a finite
    /// number is rejected so NaN never enters the store from a widget.
    fn extract(&self, raw: RawInput) -> Extraction {
        match raw {
            RawInput::Text(text) => match text.trim().parse::<f32>() {
                Ok(value) if value.is_finite() => {
                    Extraction::Value(ControlValue::Float(value))
                }
                _ => Extraction::Rejected(format!(
                    "`{}` is not a finite number for `{}`",
                    text, self.name
                )),
            },
            other => unexpected(&self.name, &other),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Select {
    pub name: String,
    pub value: String,
    pub options: Vec<String>,
}

impl Control for Select {
    fn name(&self) -> &str {
        &self.name
    }

    fn default_value(&self) -> Option<ControlValue> {
        Some(ControlValue::String(self.value.clone()))
    }

    fn widget_kind(&self, current: Option<&ControlValue>) -> WidgetKind {
        WidgetKind::Select {
            value: current
                .and_then(ControlValue::as_string)
                .unwrap_or(&self.value)
                .to_string(),
            options: self.options.clone(),
        }
    }

    fn extract(&self, raw: RawInput) -> Extraction {
        match raw {
            RawInput::Text(item) => {
                Extraction::Value(ControlValue::String(item))
            }
            other => unexpected(&self.name, &other),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ColorPicker {
    pub name: String,
    pub value: String,
}

impl Control for ColorPicker {
    fn name(&self) -> &str {
        &self.name
    }

    fn default_value(&self) -> Option<ControlValue> {
        Some(ControlValue::String(self.value.clone()))
    }

    fn widget_kind(&self, current: Option<&ControlValue>) -> WidgetKind {
        WidgetKind::Color {
            value: current
                .and_then(ControlValue::as_string)
                .unwrap_or(&self.value)
                .to_string(),
        }
    }

    fn extract(&self, raw: RawInput) -> Extraction {
        match raw {
            RawInput::Text(color) => Extraction::Value(ControlValue::String(
                color.trim().to_string(),
            )),
            other => unexpected(&self.name, &other),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImagePicker {
    pub name: String,
    /// MIME types offered by the file dialog
    pub accept: Vec<String>,
}

impl Control for ImagePicker {
    fn name(&self) -> &str {
        &self.name
    }

    fn default_value(&self) -> Option<ControlValue> {
        None
    }

    fn widget_kind(&self, _current: Option<&ControlValue>) -> WidgetKind {
        WidgetKind::File {
            accept: self.accept.clone(),
        }
    }

    fn extract(&self, raw: RawInput) -> Extraction {
        match raw {
            RawInput::File(file) => Extraction::ReadFile(file),
            other => unexpected(&self.name, &other),
        }
    }

    fn seeds_on_bind(&self) -> bool {
        false
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ControlConfig {
    Checkbox(Checkbox),
    Slider(Slider),
    Select(Select),
    Color(ColorPicker),
    Image(ImagePicker),
}

impl ControlConfig {
    pub fn checkbox(name: &str, value: bool) -> ControlConfig {
        ControlConfig::Checkbox(Checkbox {
            name: name.to_string(),
            value,
        })
    }

    pub fn slider(
        name: &str,
        value: f32,
        range: (f32, f32),
        step: f32,
    ) -> ControlConfig {
        ControlConfig::Slider(Slider {
            name: name.to_string(),
            value,
            min: range.0,
            max: range.1,
            step,
        })
    }

    pub fn select<S>(name: &str, value: &str, options: &[S]) -> ControlConfig
    where
        S: AsRef<str>,
    {
        ControlConfig::Select(Select {
            name: name.to_string(),
            value: value.to_string(),
            options: options.iter().map(|s| s.as_ref().to_string()).collect(),
        })
    }

    pub fn color(name: &str, value: &str) -> ControlConfig {
        ControlConfig::Color(ColorPicker {
            name: name.to_string(),
            value: value.to_string(),
        })
    }

    pub fn image<S>(name: &str, accept: &[S]) -> ControlConfig
    where
        S: AsRef<str>,
    {
        ControlConfig::Image(ImagePicker {
            name: name.to_string(),
            accept: accept.iter().map(|s| s.as_ref().to_string()).collect(),
        })
    }

    pub fn control(&self) -> &dyn Control {
        match self {
            ControlConfig::Checkbox(c) => c,
            ControlConfig::Slider(c) => c,
            ControlConfig::Select(c) => c,
            ControlConfig::Color(c) => c,
            ControlConfig::Image(c) => c,
        }
    }

    pub fn name(&self) -> &str {
        self.control().name()
    }

    pub fn default_value(&self) -> Option<ControlValue> {
        self.control().default_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slider_parses_text() {
        let slider = ControlConfig::slider("gap", 25.0, (0.0, 100.0), 1.0);
        assert_eq!(
            slider.control().extract(RawInput::Text("12.5".into())),
            Extraction::Value(ControlValue::Float(12.5))
        );
    }

    #[test]
    fn test_slider_does_not_clamp() {
        let slider = ControlConfig::slider("gap", 25.0, (0.0, 100.0), 1.0);
        assert_eq!(
            slider.control().extract(RawInput::Text("-40".into())),
            Extraction::Value(ControlValue::Float(-40.0))
        );
    }

    #[test]
    fn test_slider_rejects_non_numeric_text() {
        let slider = ControlConfig::slider("gap", 25.0, (0.0, 100.0), 1.0);
        for text in ["abc", "", "NaN", "inf"] {
            assert!(matches!(
                slider.control().extract(RawInput::Text(text.into())),
                Extraction::Rejected(_)
            ));
        }
    }

    #[test]
    fn test_checkbox_and_select_extraction() {
        let checkbox = ControlConfig::checkbox("sharp", true);
        assert_eq!(
            checkbox.control().extract(RawInput::Checked(false)),
            Extraction::Value(ControlValue::Bool(false))
        );
        assert!(matches!(
            checkbox.control().extract(RawInput::Text("on".into())),
            Extraction::Rejected(_)
        ));

        let select =
            ControlConfig::select("aspect ratio", "16:9", &["16:9", "4:3"]);
        assert_eq!(
            select.control().extract(RawInput::Text("4:3".into())),
            Extraction::Value(ControlValue::from("4:3"))
        );
    }

    #[test]
    fn test_image_defers_to_file_read() {
        let image = ControlConfig::image("image", &["image/png"]);
        let file = FileHandle("bg.png".into());
        assert_eq!(
            image.control().extract(RawInput::File(file.clone())),
            Extraction::ReadFile(file)
        );
        assert!(!image.control().seeds_on_bind());
        assert_eq!(image.default_value(), None);
    }

    #[test]
    fn test_widget_kind_prefers_current_value() {
        let slider = ControlConfig::slider("thickness", 5.0, (1.0, 25.0), 1.0);
        assert_eq!(
            slider.control().widget_kind(None),
            WidgetKind::Range {
                value: "5".into(),
                min: 1.0,
                max: 25.0,
                step: 1.0,
            }
        );
        assert_eq!(
            slider
                .control()
                .widget_kind(Some(&ControlValue::Float(7.5))),
            WidgetKind::Range {
                value: "7.5".into(),
                min: 1.0,
                max: 25.0,
                step: 1.0,
            }
        );

        let color = ControlConfig::color("colour", "#00FF00");
        assert_eq!(
            color.control().widget_kind(Some(&ControlValue::Float(1.0))),
            WidgetKind::Color {
                value: "#00FF00".into()
            }
        );
    }
}

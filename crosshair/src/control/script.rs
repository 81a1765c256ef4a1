//! Deserialization types for declaring controls in yaml instead of code.
//!
//! ```yaml
//! thickness:
//!   type: slider
//!   range: [1, 25]
//!   default: 5
//!
//! colour:
//!   type: color
//!   default: "#00FF00"
//! ```
//!
//! Entries without a `type` are ignored, which leaves room for anchors that
//! other entries merge in with `<<`.

use std::error::Error;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use yaml_merge_keys::merge_keys_serde_yml;

use super::controls::ControlConfig;
use super::registry::ControlRegistry;
use crate::core::prelude::*;

/// Uses [`IndexMap`] so controls keep the order they are declared in
pub type ConfigFile = IndexMap<String, MaybeControlConfig>;

#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum MaybeControlConfig {
    Control(ScriptedControlConfig),
    #[allow(dead_code)]
    Other(serde_yml::Value),
}

#[derive(Deserialize, Debug)]
pub struct ScriptedControlConfig {
    #[serde(rename = "type")]
    pub control_type: ControlType,
    #[serde(flatten)]
    pub config: serde_yml::Value,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub enum ControlType {
    #[serde(rename = "slider")]
    Slider,
    #[serde(rename = "checkbox")]
    Checkbox,
    #[serde(rename = "select")]
    Select,
    #[serde(rename = "color")]
    Color,
    #[serde(rename = "image")]
    Image,
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct SliderConfig {
    pub range: [f32; 2],
    pub default: f32,
    pub step: f32,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            range: [0.0, 1.0],
            default: 0.0,
            step: 1.0,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CheckboxConfig {
    pub default: bool,
}

#[derive(Deserialize, Debug)]
pub struct SelectConfig {
    pub options: Vec<String>,
    pub default: String,
}

#[derive(Deserialize, Debug)]
pub struct ColorConfig {
    pub default: String,
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct ImageConfig {
    pub accept: Vec<String>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            accept: vec!["image/png".to_string(), "image/jpeg".to_string()],
        }
    }
}

pub fn parse_from_str(yaml_str: &str) -> Result<ConfigFile, Box<dyn Error>> {
    let raw_config = serde_yml::from_str(yaml_str)?;
    let merged_config = merge_keys_serde_yml(raw_config)?;
    let config: ConfigFile = serde_yml::from_value(merged_config)?;
    Ok(config)
}

fn to_control(
    name: &str,
    config: &ScriptedControlConfig,
) -> Result<ControlConfig, Box<dyn Error>> {
    let value = config.config.clone();

    let control = match config.control_type {
        ControlType::Slider => {
            let conf: SliderConfig = serde_yml::from_value(value)?;
            ControlConfig::slider(
                name,
                conf.default,
                (conf.range[0], conf.range[1]),
                conf.step,
            )
        }
        ControlType::Checkbox => {
            let conf: CheckboxConfig = serde_yml::from_value(value)?;
            ControlConfig::checkbox(name, conf.default)
        }
        ControlType::Select => {
            let conf: SelectConfig = serde_yml::from_value(value)?;
            if !conf.options.contains(&conf.default) {
                warn!(
                    "Default `{}` of `{}` is not one of its options",
                    conf.default, name
                );
            }
            ControlConfig::select(name, &conf.default, &conf.options)
        }
        ControlType::Color => {
            let conf: ColorConfig = serde_yml::from_value(value)?;
            ControlConfig::color(name, &conf.default)
        }
        ControlType::Image => {
            let conf: ImageConfig = serde_yml::from_value(value)?;
            ControlConfig::image(name, &conf.accept)
        }
    };

    Ok(control)
}

impl ControlRegistry {
    pub fn from_config_file(
        config_file: &ConfigFile,
    ) -> Result<Self, Box<dyn Error>> {
        let mut controls = vec![];

        for (name, maybe_config) in config_file {
            let config = match maybe_config {
                MaybeControlConfig::Control(config) => config,
                MaybeControlConfig::Other(_) => continue,
            };

            let control = to_control(name, config)
                .map_err(|err| format!("control `{}`: {}", name, err))?;

            controls.push(control);
        }

        Ok(Self::new(controls))
    }

    pub fn from_yaml(yaml_str: &str) -> Result<Self, Box<dyn Error>> {
        Self::from_config_file(&parse_from_str(yaml_str)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, Box<dyn Error>> {
        let file_content = fs::read_to_string(path)?;
        let registry = Self::from_yaml(&file_content)?;
        debug!(
            "Loaded {} controls from {}",
            registry.len(),
            path.display()
        );
        Ok(registry)
    }
}

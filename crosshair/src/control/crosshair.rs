//! The crosshair's control surface

use super::registry::{ControlRegistry, ControlRegistryBuilder};
use crate::geometry::ResolutionTable;

pub const THICKNESS: &str = "thickness";
pub const GAP: &str = "gap";
pub const LENGTH: &str = "length";
pub const COLOUR: &str = "colour";
pub const SHARP: &str = "sharp";
pub const RESOLUTION: &str = "resolution";
pub const ASPECT_RATIO: &str = "aspect ratio";
pub const IMAGE: &str = "image";
pub const ZOOM: &str = "zoom";

/// Parameters the layout and render steps read
pub const REQUIRED: &[&str] = &[
    THICKNESS,
    GAP,
    LENGTH,
    COLOUR,
    SHARP,
    RESOLUTION,
    ASPECT_RATIO,
    IMAGE,
    ZOOM,
];

pub const ASPECT_RATIOS: &[&str] = &["16:9", "4:3", "16:10"];
pub const IMAGE_TYPES: &[&str] = &["image/png", "image/jpeg"];

pub fn crosshair_controls(resolutions: &ResolutionTable) -> ControlRegistry {
    let labels: Vec<&str> = resolutions.labels().collect();

    ControlRegistryBuilder::new()
        .slider(THICKNESS, 5.0, (1.0, 25.0), 1.0)
        .slider(GAP, 25.0, (0.0, 100.0), 1.0)
        .slider(LENGTH, 15.0, (1.0, 100.0), 1.0)
        .color(COLOUR, "#00FF00")
        .checkbox(SHARP, true)
        .select(RESOLUTION, "1080p", &labels)
        .select(ASPECT_RATIO, "16:9", ASPECT_RATIOS)
        .image(IMAGE, IMAGE_TYPES)
        .slider(ZOOM, 1.0, (1.0, 10.0), 1.0)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{ControlConfig, ControlValue};

    #[test]
    fn test_crosshair_controls_cover_required_names() {
        let registry = crosshair_controls(&ResolutionTable::default());
        assert!(registry.require(REQUIRED).is_ok());
        assert_eq!(registry.len(), REQUIRED.len());
    }

    #[test]
    fn test_resolution_options_follow_table() {
        let registry = crosshair_controls(&ResolutionTable::default());
        match registry.get(RESOLUTION) {
            Some(ControlConfig::Select(select)) => {
                assert_eq!(select.options, vec!["2160p", "1440p", "1080p"]);
                assert_eq!(select.value, "1080p");
            }
            other => panic!("unexpected resolution control: {:?}", other),
        }
    }

    #[test]
    fn test_default_table() {
        let registry = crosshair_controls(&ResolutionTable::default());
        let default = |name| registry.get(name).and_then(|c| c.default_value());

        assert_eq!(default(THICKNESS), Some(ControlValue::Float(5.0)));
        assert_eq!(default(GAP), Some(ControlValue::Float(25.0)));
        assert_eq!(default(LENGTH), Some(ControlValue::Float(15.0)));
        assert_eq!(default(COLOUR), Some(ControlValue::from("#00FF00")));
        assert_eq!(default(SHARP), Some(ControlValue::Bool(true)));
        assert_eq!(default(ASPECT_RATIO), Some(ControlValue::from("16:9")));
        assert_eq!(default(IMAGE), None);
        assert_eq!(default(ZOOM), Some(ControlValue::Float(1.0)));
    }
}

//! Derives everything one render cycle needs from the current state: canvas
//! pixel size, on-screen display size, background scaling, and the four arm
//! rectangles.
//!
//! The logical canvas size follows the chosen resolution and aspect ratio
//! while the display size follows the viewport, so changing one never
//! disturbs the other.

use serde::Serialize;

use super::resolution::ResolutionTable;
use crate::control::crosshair::*;
use crate::core::prelude::*;
use crate::state::StateStore;

/// Display height the zoom factor is expressed against
pub const GOAL_HEIGHT: f32 = 1080.0;

/// Vertical room left around the displayed canvas, in CSS pixels
pub const PADDING: f32 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            height: GOAL_HEIGHT,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: String,
}

impl Rect {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Arms {
    pub left: Rect,
    pub right: Rect,
    pub top: Rect,
    pub bottom: Rect,
}

impl Arms {
    pub fn iter(&self) -> impl Iterator<Item = &Rect> {
        [&self.left, &self.right, &self.top, &self.bottom].into_iter()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LayoutResult {
    pub pixel_width: f32,
    pub pixel_height: f32,
    pub css_width: f32,
    pub css_height: f32,
    /// Horizontal and vertical CSS `background-size` percentages
    pub background_size: (f32, f32),
    pub arms: Arms,
    pub sharp_edges: bool,
}

impl LayoutResult {
    pub fn center(&self) -> (f32, f32) {
        (self.pixel_width / 2.0, self.pixel_height / 2.0)
    }
}

/// Parses `"X:Y"` into its two terms
pub fn parse_aspect_ratio(aspect: &str) -> Option<(f32, f32)> {
    let (x, y) = aspect.split_once(':')?;
    let x = x.trim().parse::<f32>().ok()?;
    let y = y.trim().parse::<f32>().ok()?;
    Some((x, y))
}

/// Canvas pixel size: the resolution's height, widened to the aspect ratio.
/// Unknown resolutions and malformed ratios give NaN.
pub fn canvas_size(
    resolution: &str,
    aspect: &str,
    resolutions: &ResolutionTable,
) -> (f32, f32) {
    let base_height = resolutions.get(resolution).map_or_else(
        || {
            warn_once!("Unknown resolution `{}`", resolution);
            f32::NAN
        },
        |(_, h)| h,
    );

    let (x, y) = parse_aspect_ratio(aspect).unwrap_or_else(|| {
        warn_once!("Malformed aspect ratio `{}`", aspect);
        (f32::NAN, f32::NAN)
    });

    (base_height * x / y, base_height)
}

/// On-screen size. Always 16:9 and tied to the viewport height, independent
/// of the canvas's own aspect ratio.
pub fn display_size(zoom: f32, viewport: Viewport) -> (f32, f32) {
    let height = GOAL_HEIGHT * zoom * (viewport.height / GOAL_HEIGHT) - PADDING;
    (height * 16.0 / 9.0, height)
}

/// Scales a background image so it keeps its perceived size as the logical
/// resolution changes
pub fn background_size(
    pixel_width: f32,
    pixel_height: f32,
    reference: (f32, f32),
) -> (f32, f32) {
    let (ref_width, ref_height) = reference;
    (
        100.0 + (1.0 - pixel_width / ref_width) * 100.0,
        pixel_height / ref_height * 100.0,
    )
}

/// Lays the four arms out around `center`. For odd thickness the right and
/// bottom arms shift one extra pixel outward so the gap stays visually
/// centred on the half-pixel the arms straddle.
pub fn arms(
    center: (f32, f32),
    thickness: f32,
    gap: f32,
    length: f32,
    color: &str,
) -> Arms {
    let (cx, cy) = center;
    let half = (thickness / 2.0).floor();
    let parity = ternary!(is_odd(thickness), 1.0, 0.0);

    let rect = |x, y, width, height| Rect {
        x,
        y,
        width,
        height,
        color: color.to_string(),
    };

    Arms {
        left: rect(cx - length - gap, cy - half, length, thickness),
        right: rect(cx + gap + parity, cy - half, length, thickness),
        top: rect(cx - half, cy - length - gap, thickness, length),
        bottom: rect(cx - half, cy + gap + parity, thickness, length),
    }
}

pub fn compute_layout(
    store: &StateStore,
    resolutions: &ResolutionTable,
    viewport: Viewport,
) -> LayoutResult {
    let (pixel_width, pixel_height) = canvas_size(
        store.string(RESOLUTION),
        store.string(ASPECT_RATIO),
        resolutions,
    );

    let (css_width, css_height) = display_size(store.float(ZOOM), viewport);

    let reference = resolutions.reference().unwrap_or((f32::NAN, f32::NAN));

    LayoutResult {
        pixel_width,
        pixel_height,
        css_width,
        css_height,
        background_size: background_size(pixel_width, pixel_height, reference),
        arms: arms(
            (pixel_width / 2.0, pixel_height / 2.0),
            store.float(THICKNESS),
            store.float(GAP),
            store.float(LENGTH),
            store.string(COLOUR),
        ),
        sharp_edges: store.bool(SHARP),
    }
}

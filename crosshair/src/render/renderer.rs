use image::RgbaImage;

use super::background::{decode_data_url, paint_background};
use super::color::{Rgba, parse_css_color};
use super::surface::{Bitmap, MAX_DIMENSION};
use crate::core::prelude::*;
use crate::geometry::{LayoutResult, Rect};

/// Draws a [`LayoutResult`] onto a [`Bitmap`]. Holds on to the last decoded
/// background so an unchanged image is not decoded on every flush.
#[derive(Debug, Default)]
pub struct Renderer {
    background: Option<CachedBackground>,
}

#[derive(Debug)]
struct CachedBackground {
    source: String,
    image: Option<RgbaImage>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        surface: &mut Bitmap,
        layout: &LayoutResult,
        image: Option<&str>,
    ) {
        let (width, height) =
            surface_size(layout.pixel_width, layout.pixel_height);
        if (width, height) == (surface.width(), surface.height()) {
            surface.clear();
        } else {
            surface.resize(width, height);
        }

        if surface.is_empty() {
            return;
        }

        if let Some(url) = image {
            if let Some(background) = self.background(url) {
                paint_background(surface, background, layout.background_size);
            }
        }

        for rect in layout.arms.iter() {
            fill_rect(surface, rect, layout.sharp_edges);
        }
    }

    fn background(&mut self, url: &str) -> Option<&RgbaImage> {
        let stale = self
            .background
            .as_ref()
            .is_none_or(|cached| cached.source != url);

        if stale {
            let image = decode_data_url(url)
                .inspect_err(|err| warn!("Ignoring background image: {}", err))
                .ok();
            self.background = Some(CachedBackground {
                source: url.to_string(),
                image,
            });
        }

        self.background.as_ref().and_then(|c| c.image.as_ref())
    }
}

/// Rounds the layout's pixel size to whole pixels. Non-finite, non-positive
/// or oversized dimensions yield an empty surface.
pub fn surface_size(width: f32, height: f32) -> (u32, u32) {
    let dimension = |v: f32| -> Option<u32> {
        let v = v.round();
        (v.is_finite() && v > 0.0 && v <= MAX_DIMENSION as f32)
            .then_some(v as u32)
    };

    match (dimension(width), dimension(height)) {
        (Some(w), Some(h)) => (w, h),
        _ => {
            warn_once!("Degenerate canvas size {}x{}", width, height);
            (0, 0)
        }
    }
}

/// Fills `rect` with partial coverage at fractional edges. In sharp mode the
/// origin is snapped to the nearest whole pixel first.
pub fn fill_rect(surface: &mut Bitmap, rect: &Rect, sharp: bool) {
    let Some(color) = parse_css_color(&rect.color) else {
        warn_once!("Unparseable color `{}`", rect.color);
        return;
    };

    let (mut x, mut y) = (rect.x, rect.y);
    let (mut w, mut h) = (rect.width, rect.height);

    if ![x, y, w, h].iter().all(|v| v.is_finite()) {
        warn_once!("Skipping non-finite rect {:?}", rect);
        return;
    }

    if sharp {
        x = x.round();
        y = y.round();
    }

    // Negative sizes extend up/left, as on a canvas
    if w < 0.0 {
        x += w;
        w = -w;
    }
    if h < 0.0 {
        y += h;
        h = -h;
    }

    let (x0, x1) = pixel_span(x, x + w, surface.width());
    let (y0, y1) = pixel_span(y, y + h, surface.height());

    for py in y0..y1 {
        let cover_y = overlap(py, y, y + h);
        for px in x0..x1 {
            let coverage = overlap(px, x, x + w) * cover_y;
            blend(surface, px, py, color, coverage);
        }
    }
}

fn blend(surface: &mut Bitmap, x: u32, y: u32, color: Rgba, coverage: f32) {
    if coverage > 0.0 {
        surface.blend(x, y, color, coverage);
    }
}

fn pixel_span(start: f32, end: f32, limit: u32) -> (u32, u32) {
    let lo = start.floor().clamp(0.0, limit as f32) as u32;
    let hi = end.ceil().clamp(0.0, limit as f32) as u32;
    (lo, hi.max(lo))
}

/// Fraction of pixel `p` covered by `[start, end)`
fn overlap(p: u32, start: f32, end: f32) -> f32 {
    let lo = (p as f32).max(start);
    let hi = (p as f32 + 1.0).min(end);
    (hi - lo).clamp(0.0, 1.0)
}

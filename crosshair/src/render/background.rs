//! Background images arrive as data URIs. Base64 PNG and JPEG payloads are
//! decoded; anything else is reported and left off the surface.

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::RgbaImage;

use super::color::Rgba;
use super::surface::Bitmap;
use crate::core::prelude::*;

const IMAGE_MIME_TYPES: &[&str] = &["image/png", "image/jpeg"];

pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        _ => None,
    }
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

pub fn decode_data_url(url: &str) -> Result<RgbaImage, String> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| "background is not a data URI".to_string())?;

    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| "data URI has no payload".to_string())?;

    let mut params = meta.split(';');
    let mime = params.next().unwrap_or_default();
    if !params.any(|p| p == "base64") {
        return Err(format!("data URI for '{}' is not base64", mime));
    }

    if !IMAGE_MIME_TYPES.contains(&mime) {
        return Err(format!("unsupported background image type '{}'", mime));
    }

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|err| format!("invalid base64 in data URI: {}", err))?;

    let image = image::load_from_memory(&bytes)
        .map_err(|err| format!("failed to decode {}: {}", mime, err))?;

    Ok(image.to_rgba8())
}

/// Fills the surface with `image` repeated at a tile size given as
/// percentages of the surface size, the way CSS `background-size` with the
/// default repeat behaves. Sampling is nearest-neighbour.
pub fn paint_background(
    surface: &mut Bitmap,
    image: &RgbaImage,
    size_percent: (f32, f32),
) {
    let tile_w = surface.width() as f32 * size_percent.0 / 100.0;
    let tile_h = surface.height() as f32 * size_percent.1 / 100.0;

    if !(tile_w.is_finite() && tile_h.is_finite())
        || tile_w <= 0.0
        || tile_h <= 0.0
        || image.width() == 0
        || image.height() == 0
    {
        warn_once!(
            "Skipping background with degenerate tile size {}x{}",
            tile_w,
            tile_h
        );
        return;
    }

    let sample = |p: u32, tile: f32, extent: u32| -> u32 {
        let t = (p as f32 + 0.5).rem_euclid(tile) / tile;
        ((t * extent as f32) as u32).min(extent - 1)
    };

    for y in 0..surface.height() {
        let v = sample(y, tile_h, image.height());
        for x in 0..surface.width() {
            let u = sample(x, tile_w, image.width());
            surface.put(x, y, Rgba::from(image.get_pixel(u, v).0));
        }
    }
}

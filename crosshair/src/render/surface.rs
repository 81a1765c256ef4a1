use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::color::Rgba;

/// Largest width or height a surface will allocate
pub const MAX_DIMENSION: u32 = 16_384;

/// Straight-alpha RGBA8 bitmap the renderer draws into
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Bitmap {
    pub fn new(width: u32, height: u32) -> Self {
        let mut bitmap = Self::default();
        bitmap.resize(width, height);
        bitmap
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Resizes and clears. Like a canvas, changing the size discards the
    /// previous contents.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width as usize * height as usize * 4, 0);
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| (y as usize * self.width as usize + x as usize) * 4)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let i = self.offset(x, y)?;
        let p = &self.pixels[i..i + 4];
        Some(Rgba::new(p[0], p[1], p[2], p[3]))
    }

    pub fn put(&mut self, x: u32, y: u32, color: Rgba) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i..i + 4].copy_from_slice(&color.to_array());
        }
    }

    /// Source-over composite of `color` at `coverage` (0..=1) of the pixel
    pub fn blend(&mut self, x: u32, y: u32, color: Rgba, coverage: f32) {
        let Some(i) = self.offset(x, y) else {
            return;
        };

        let src_a = color.a as f32 / 255.0 * coverage.clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }

        let dst = &mut self.pixels[i..i + 4];
        let dst_a = dst[3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);

        let mix = |src: u8, dst: u8| -> u8 {
            let c = (src as f32 * src_a + dst as f32 * dst_a * (1.0 - src_a))
                / out_a;
            c.round().clamp(0.0, 255.0) as u8
        };

        dst[0] = mix(color.r, dst[0]);
        dst[1] = mix(color.g, dst[1]);
        dst[2] = mix(color.b, dst[2]);
        dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, String> {
        let mut bytes = Vec::new();
        self.write_png_to(&mut bytes)?;
        Ok(bytes)
    }

    pub fn write_png(&self, path: &Path) -> Result<(), String> {
        let file = fs::File::create(path).map_err(|err| {
            format!("failed to create '{}': {}", path.display(), err)
        })?;
        let mut writer = BufWriter::new(file);
        self.write_png_to(&mut writer)?;
        writer
            .flush()
            .map_err(|err| format!("png flush failed: {}", err))
    }

    fn write_png_to<W: Write>(&self, writer: W) -> Result<(), String> {
        if self.is_empty() {
            return Err("cannot encode an empty surface".to_string());
        }

        let mut encoder = png::Encoder::new(writer, self.width, self.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut png_writer = encoder
            .write_header()
            .map_err(|err| format!("png header failed: {}", err))?;
        png_writer
            .write_image_data(&self.pixels)
            .map_err(|err| format!("png write failed: {}", err))?;
        png_writer
            .finish()
            .map_err(|err| format!("png finish failed: {}", err))
    }
}

use bigcolor::BigColor;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[u8; 4]> for Rgba {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

/// Parses any CSS color string a color picker may hand back: hex forms,
/// named colors and the functional `rgb`/`hsl` notations
pub fn parse_css_color(input: &str) -> Option<Rgba> {
    let color = BigColor::new(input.trim());
    if !color.is_valid() {
        return None;
    }

    let rgb = color.to_rgb();
    let alpha = (color.get_alpha() as f32).clamp(0.0, 1.0);

    Some(Rgba::new(
        rgb.r as u8,
        rgb.g as u8,
        rgb.b as u8,
        (alpha * 255.0).round() as u8,
    ))
}

use serde::{Deserialize, Serialize};

/// 8-bit RGB triple, serialized as `[r, g, b]`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const BLACK: Rgb = Rgb([0, 0, 0]);
    pub const WHITE: Rgb = Rgb([255, 255, 255]);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub const fn with_alpha(self, a: u8) -> Rgba {
        let [r, g, b] = self.0;
        Rgba([r, g, b, a])
    }
}

/// 8-bit RGBA, serialized as `[r, g, b, a]`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgba(pub [u8; 4]);

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    pub const fn rgb(self) -> Rgb {
        let [r, g, b, _] = self.0;
        Rgb([r, g, b])
    }
}

impl From<Rgb> for Rgba {
    fn from(c: Rgb) -> Self {
        c.with_alpha(255)
    }
}

/// Converts an arbitrary float to a color channel.
///
/// Saturates at `0..=255`; NaN maps to 0.
pub fn channel_from_f64(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

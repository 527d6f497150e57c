//! Pixel type and color helpers.
//!
//! Frames are made of [`Rgb8`] values, 8 bits per channel, which is what
//! addressable LED strips consume. Keyboard configurations usually describe
//! colors as packed `0xRRGGBB` integers; [`from_u32`] decodes those. The HSV
//! helpers are handy for building layer color tables spread around the wheel.

use palette::{FromColor, Hsv, Srgb};

/// One LED worth of color, 8 bits per channel.
pub type Rgb8 = Srgb<u8>;

pub const BLACK: Rgb8 = Srgb::new(0, 0, 0);
pub const WHITE: Rgb8 = Srgb::new(255, 255, 255);
pub const RED: Rgb8 = Srgb::new(255, 0, 0);
pub const GREEN: Rgb8 = Srgb::new(0, 255, 0);
pub const BLUE: Rgb8 = Srgb::new(0, 0, 255);
pub const YELLOW: Rgb8 = Srgb::new(255, 255, 0);
pub const CYAN: Rgb8 = Srgb::new(0, 255, 255);
pub const MAGENTA: Rgb8 = Srgb::new(255, 0, 255);

/// Decodes a packed `0xRRGGBB` value. The top byte is ignored.
#[inline]
pub const fn from_u32(packed: u32) -> Rgb8 {
    Srgb::new((packed >> 16) as u8, (packed >> 8) as u8, packed as u8)
}

/// Packs a color back into `0xRRGGBB`.
#[inline]
pub const fn to_u32(color: Rgb8) -> u32 {
    ((color.red as u32) << 16) | ((color.green as u32) << 8) | color.blue as u32
}

/// Creates an RGB color from HSV (Hue, Saturation, Value) components.
#[inline]
pub fn hsv(hue: f32, saturation: f32, value: f32) -> Rgb8 {
    let hsv = Hsv::new(hue, saturation, value);
    let rgb: Srgb = Srgb::from_color(hsv);
    rgb.into_format()
}

/// Creates an RGB color from hue only (full saturation and value).
#[inline]
pub fn hue(hue: f32) -> Rgb8 {
    hsv(hue, 1.0, 1.0)
}

/// Scales every channel by `level / 255`.
#[inline]
pub fn dim(color: Rgb8, level: u8) -> Rgb8 {
    let scale = |c: u8| ((c as u16 * level as u16) / 255) as u8;
    Srgb::new(scale(color.red), scale(color.green), scale(color.blue))
}

//! Color helpers shared by buffer construction and the filters.

use image::Rgba;

/// Straight (non-premultiplied) RGBA color used for fills, backgrounds and text.
pub type Color = Rgba<u8>;

/// BT.601 luma of an RGB triple, rounded and clamped to a channel value.
pub fn luma_bt601(r: u8, g: u8, b: u8) -> u8 {
    clamp_channel(0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32)
}

/// Round a computed channel value and clamp it into [0, 255].
#[inline]
pub fn clamp_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

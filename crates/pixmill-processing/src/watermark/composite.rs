//! Source-over compositing onto a pixel buffer

use image::{Rgba, RgbaImage};
use pixmill_core::color::clamp_channel;
use pixmill_core::{luma_bt601, Color, PixelBuffer, PixelFormat};
use std::ops::Range;

/// Blend `overlay` onto `target` with its top-left corner at (`x`, `y`).
///
/// Each overlay pixel contributes with its alpha scaled by `opacity`. Parts of the
/// overlay outside the target are clipped. Gray targets are blended on luma.
pub fn composite_over(
    target: &mut PixelBuffer,
    overlay: &RgbaImage,
    x: i64,
    y: i64,
    opacity: f32,
) {
    if opacity <= 0.0 {
        return;
    }
    for (ox, oy, pixel) in overlay.enumerate_pixels() {
        let alpha = pixel[3] as f32 / 255.0 * opacity;
        blend_at(target, x + ox as i64, y + oy as i64, *pixel, alpha);
    }
}

/// Blend `color` over the rectangle at (`x`, `y`), clipped to the target
pub(crate) fn fill_rect(
    target: &mut PixelBuffer,
    (x, y): (i64, i64),
    (width, height): (u32, u32),
    color: Color,
    opacity: f32,
) {
    let alpha = color[3] as f32 / 255.0 * opacity;
    let (target_width, target_height) = target.dimensions();
    for ty in clip_span(y, height, target_height) {
        for tx in clip_span(x, width, target_width) {
            blend_at(target, tx, ty, color, alpha);
        }
    }
}

/// The part of `start..start + len` that falls inside `0..limit`
pub(crate) fn clip_span(start: i64, len: u32, limit: u32) -> Range<i64> {
    let end = start.saturating_add(len as i64).min(limit as i64);
    start.max(0)..end.max(0)
}

/// Blend `color` over a single pixel with coverage `alpha` in [0, 1].
/// Coordinates outside the target are ignored.
pub(crate) fn blend_at(target: &mut PixelBuffer, x: i64, y: i64, color: Color, alpha: f32) {
    let (width, height) = target.dimensions();
    if alpha <= 0.0 || x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
        return;
    }

    let format = target.format();
    let channels = format.channels();
    let offset = (y as usize * width as usize + x as usize) * channels;
    let pixel = &mut target.samples_mut()[offset..offset + channels];
    blend_pixel(pixel, format, color, alpha.min(1.0));
}

fn blend_pixel(pixel: &mut [u8], format: PixelFormat, color: Color, alpha: f32) {
    let Rgba([r, g, b, _]) = color;
    let source = if format.is_gray() {
        [luma_bt601(r, g, b), 0, 0]
    } else {
        [r, g, b]
    };
    let color_channels = if format.is_gray() { 1 } else { 3 };

    let dst_alpha = format
        .alpha_index()
        .map_or(1.0, |i| pixel[i] as f32 / 255.0);
    let out_alpha = alpha + dst_alpha * (1.0 - alpha);

    for c in 0..color_channels {
        let blended =
            source[c] as f32 * alpha + pixel[c] as f32 * dst_alpha * (1.0 - alpha);
        pixel[c] = clamp_channel(blended / out_alpha);
    }
    if let Some(i) = format.alpha_index() {
        pixel[i] = clamp_channel(out_alpha * 255.0);
    }
}

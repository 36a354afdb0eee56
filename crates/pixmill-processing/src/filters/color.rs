use super::{apply_lut, build_lut, require_finite, require_range};
use pixmill_core::color::clamp_channel;
use pixmill_core::{luma_bt601, PixelBuffer, ProcessingResult};
use std::borrow::Cow;

/// Intensity used when a sepia tone is requested without one
pub const DEFAULT_SEPIA_INTENSITY: f32 = 1.0;

/// Replace the color channels with their BT.601 luma, keeping the pixel format
pub fn grayscale(source: &PixelBuffer) -> ProcessingResult<PixelBuffer> {
    let format = source.format();
    tracing::debug!(format = ?format, "Converting to grayscale");
    if format.is_gray() {
        return Ok(source.clone());
    }

    let mut samples = source.samples().to_vec();
    for pixel in samples.chunks_exact_mut(format.channels()) {
        let luma = luma_bt601(pixel[0], pixel[1], pixel[2]);
        pixel[..3].fill(luma);
    }
    source.with_samples(samples)
}

/// Multiply every color channel by `factor`. Negative factors clamp to black.
pub fn brightness(source: &PixelBuffer, factor: f32) -> ProcessingResult<PixelBuffer> {
    require_finite(source, "brightness", "factor", factor)?;

    tracing::debug!(factor, "Adjusting brightness");
    apply_lut(source, &build_lut(|v| clamp_channel(v * factor)))
}

/// Add `offset` to every color channel
pub fn brightness_offset(source: &PixelBuffer, offset: f32) -> ProcessingResult<PixelBuffer> {
    require_range(source, "brightness_offset", "offset", offset, (-255.0, 255.0))?;

    tracing::debug!(offset, "Offsetting brightness");
    apply_lut(source, &build_lut(|v| clamp_channel(v + offset)))
}

/// Scale every color channel away from (or toward) mid gray.
///
/// A factor of 1 is the identity, 0 flattens to 128 and negative factors invert
/// around 128.
pub fn contrast(source: &PixelBuffer, factor: f32) -> ProcessingResult<PixelBuffer> {
    require_finite(source, "contrast", "factor", factor)?;

    tracing::debug!(factor, "Adjusting contrast");
    let intercept = (1.0 - factor) * 128.0;
    apply_lut(source, &build_lut(|v| clamp_channel(v * factor + intercept)))
}

/// Invert every color channel
pub fn invert(source: &PixelBuffer) -> ProcessingResult<PixelBuffer> {
    tracing::debug!("Inverting colors");
    apply_lut(source, &build_lut(|v| 255 - v as u8))
}

/// Sepia tone.
///
/// Each pixel's luma indexes three tone tables, one per output channel. At full
/// intensity the tables hold the classic sepia weights applied to a gray input;
/// lower intensities interpolate every entry toward the identity. An intensity of 0
/// returns the source itself. Gray inputs are promoted to RGB (or RGBA).
pub fn sepia(source: &PixelBuffer, intensity: f32) -> ProcessingResult<Cow<'_, PixelBuffer>> {
    require_range(source, "sepia", "intensity", intensity, (0.0, 1.0))?;
    if intensity == 0.0 {
        return Ok(Cow::Borrowed(source));
    }

    tracing::debug!(intensity, "Applying sepia");

    let tone = |weight: f32| {
        build_lut(|v| {
            let full = (v * weight).min(255.0);
            clamp_channel(v + (full - v) * intensity)
        })
    };
    let red = tone(0.393 + 0.769 + 0.189);
    let green = tone(0.349 + 0.686 + 0.168);
    let blue = tone(0.272 + 0.534 + 0.131);

    let format = source.format();
    let output_format = format.to_color();
    let (width, height) = source.dimensions();
    PixelBuffer::check_allocation("sepia", width, height, output_format)?;

    let alpha = format.alpha_index();
    let pixel_count = width as usize * height as usize;
    let mut samples = Vec::with_capacity(pixel_count * output_format.channels());
    for pixel in source.samples().chunks_exact(format.channels()) {
        let luma = if format.is_gray() {
            pixel[0]
        } else {
            luma_bt601(pixel[0], pixel[1], pixel[2])
        };
        let i = luma as usize;
        samples.extend_from_slice(&[red[i], green[i], blue[i]]);
        if let Some(a) = alpha {
            samples.push(pixel[a]);
        }
    }

    PixelBuffer::from_samples(width, height, output_format, samples).map(Cow::Owned)
}

/// Darken pixels toward the corners.
///
/// Each color channel is scaled by `clamp(1 - intensity * d / d_max, 0, 1)`, where
/// `d` is the distance from the image center to the pixel center and `d_max` the
/// distance from the center to a corner.
pub fn vignette(source: &PixelBuffer, intensity: f32) -> ProcessingResult<PixelBuffer> {
    require_range(source, "vignette", "intensity", intensity, (0.0, 1.0))?;

    let (width, height) = source.dimensions();
    tracing::debug!(intensity, width, height, "Applying vignette");

    let format = source.format();
    let alpha = format.alpha_index();
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let max_distance = (cx * cx + cy * cy).sqrt();

    let mut samples = source.samples().to_vec();
    for (i, pixel) in samples.chunks_exact_mut(format.channels()).enumerate() {
        let x = (i % width as usize) as f32 + 0.5;
        let y = (i / width as usize) as f32 + 0.5;
        let distance = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
        let factor = (1.0 - intensity * distance / max_distance).clamp(0.0, 1.0);

        for (c, sample) in pixel.iter_mut().enumerate() {
            if Some(c) != alpha {
                *sample = clamp_channel(*sample as f32 * factor);
            }
        }
    }
    source.with_samples(samples)
}

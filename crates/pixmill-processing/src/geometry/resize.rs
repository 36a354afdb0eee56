use crate::dispatch::map_pixels;
use image::imageops;
use pixmill_core::{PixelBuffer, ProcessingError, ProcessingResult, ResizeQuality};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// How the target dimensions are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeMode {
    /// Same as `Fit`
    #[default]
    Automatic,
    /// Scale to fit inside the target, preserving aspect ratio
    Fit,
    /// Scale to cover the target, preserving aspect ratio. The result may be larger
    /// than the target on one axis; nothing is cropped.
    Fill,
    /// Use the target dimensions verbatim
    Exact,
}

/// Calculate the output dimensions of a resize.
///
/// For the aspect-preserving modes the axis that determines the scale is set to
/// the target exactly and the other axis is rounded, never below 1.
pub fn resize_dimensions(
    orig_width: u32,
    orig_height: u32,
    target_width: u32,
    target_height: u32,
    mode: ResizeMode,
) -> (u32, u32) {
    let scale_x = target_width as f64 / orig_width as f64;
    let scale_y = target_height as f64 / orig_height as f64;

    let scale_by_width = match mode {
        ResizeMode::Exact => return (target_width, target_height),
        ResizeMode::Fit | ResizeMode::Automatic => scale_x <= scale_y,
        ResizeMode::Fill => scale_x >= scale_y,
    };

    if scale_by_width {
        let h = (orig_height as f64 * scale_x).round().max(1.0) as u32;
        (target_width, h)
    } else {
        let w = (orig_width as f64 * scale_y).round().max(1.0) as u32;
        (w, target_height)
    }
}

/// Resize an image.
///
/// Returns the source itself when the target already matches its dimensions;
/// otherwise a new buffer resampled with the filter of `quality`.
pub fn resize(
    source: &PixelBuffer,
    target_width: u32,
    target_height: u32,
    mode: ResizeMode,
    quality: ResizeQuality,
) -> ProcessingResult<Cow<'_, PixelBuffer>> {
    let (orig_width, orig_height) = source.dimensions();
    if target_width == 0 || target_height == 0 {
        return Err(ProcessingError::invalid_argument(
            "resize",
            format!(
                "target dimensions must be positive, got {}x{} for a {}x{} image",
                target_width, target_height, orig_width, orig_height
            ),
        ));
    }

    if (target_width, target_height) == (orig_width, orig_height) {
        return Ok(Cow::Borrowed(source));
    }

    let (width, height) =
        resize_dimensions(orig_width, orig_height, target_width, target_height, mode);
    PixelBuffer::check_allocation("resize", width, height, source.format())?;

    tracing::debug!(
        from_width = orig_width,
        from_height = orig_height,
        width = width,
        height = height,
        mode = ?mode,
        quality = %quality,
        "Resizing image"
    );

    let filter = quality.filter_type();
    let resized = map_pixels!(source, |image| imageops::resize(image, width, height, filter));
    PixelBuffer::from_data(resized).map(Cow::Owned)
}

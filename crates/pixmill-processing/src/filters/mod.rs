//! Pixel filters
//!
//! Convolution filters (blur, sharpen, edge detection), lookup-table and
//! per-pixel color transforms, and mirroring. Every filter validates its
//! parameters before allocating and returns a buffer of the source's dimensions.

mod color;
mod convolution;
mod mirror;

pub use color::{
    brightness, brightness_offset, contrast, grayscale, invert, sepia, vignette,
    DEFAULT_SEPIA_INTENSITY,
};
pub use convolution::{blur, edge_detect, sharpen, DEFAULT_SHARPEN_STRENGTH, MAX_BLUR_RADIUS};
pub use mirror::{flip, flop};

use pixmill_core::{PixelBuffer, ProcessingError, ProcessingResult};

/// Map every color sample through `lut`, leaving alpha untouched
fn apply_lut(source: &PixelBuffer, lut: &[u8; 256]) -> ProcessingResult<PixelBuffer> {
    let format = source.format();
    let alpha = format.alpha_index();
    let mut samples = source.samples().to_vec();
    for pixel in samples.chunks_exact_mut(format.channels()) {
        for (i, sample) in pixel.iter_mut().enumerate() {
            if Some(i) != alpha {
                *sample = lut[*sample as usize];
            }
        }
    }
    source.with_samples(samples)
}

fn build_lut(f: impl Fn(f32) -> u8) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        *entry = f(i as f32);
    }
    lut
}

fn require_finite(
    source: &PixelBuffer,
    operation: &'static str,
    name: &str,
    value: f32,
) -> ProcessingResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        let (width, height) = source.dimensions();
        Err(ProcessingError::invalid_argument(
            operation,
            format!(
                "{} must be finite, got {} (image {}x{})",
                name, value, width, height
            ),
        ))
    }
}

fn require_range(
    source: &PixelBuffer,
    operation: &'static str,
    name: &str,
    value: f32,
    (min, max): (f32, f32),
) -> ProcessingResult<()> {
    require_finite(source, operation, name, value)?;
    if value < min || value > max {
        let (width, height) = source.dimensions();
        return Err(ProcessingError::invalid_argument(
            operation,
            format!(
                "{} must be between {} and {}, got {} (image {}x{})",
                name, min, max, value, width, height
            ),
        ));
    }
    Ok(())
}

use crate::dispatch::map_pixels;
use image::imageops;
use pixmill_core::{PixelBuffer, ProcessingResult};

/// Mirror horizontally: pixel (x, y) moves to (width - 1 - x, y)
pub fn flip(source: &PixelBuffer) -> ProcessingResult<PixelBuffer> {
    tracing::debug!("Flipping horizontally");
    PixelBuffer::from_data(map_pixels!(source, |image| imageops::flip_horizontal(image)))
}

/// Mirror vertically: pixel (x, y) moves to (x, height - 1 - y)
pub fn flop(source: &PixelBuffer) -> ProcessingResult<PixelBuffer> {
    tracing::debug!("Flipping vertically");
    PixelBuffer::from_data(map_pixels!(source, |image| imageops::flip_vertical(image)))
}

//! Test fixtures: synthetic pixel buffers.

use image::Rgba;
use pixmill_processing::{Color, PixelBuffer, PixelFormat};

pub const RED: Color = Rgba([255, 0, 0, 255]);
pub const BLUE: Color = Rgba([0, 0, 255, 255]);
pub const WHITE: Color = Rgba([255, 255, 255, 255]);
pub const BLACK: Color = Rgba([0, 0, 0, 255]);

pub const ALL_FORMATS: [PixelFormat; 4] = [
    PixelFormat::Gray8,
    PixelFormat::GrayAlpha8,
    PixelFormat::Rgb8,
    PixelFormat::Rgba8,
];

/// Single-color buffer
pub fn solid(width: u32, height: u32, format: PixelFormat, color: Color) -> PixelBuffer {
    PixelBuffer::filled(width, height, format, color).unwrap()
}

/// Buffer where every sample varies with its position, alpha included
pub fn gradient(width: u32, height: u32, format: PixelFormat) -> PixelBuffer {
    let channels = format.channels();
    let mut samples = Vec::with_capacity((width * height) as usize * channels);
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let v = (x * 7 + y * 13 + c as u32 * 41) % 256;
                samples.push(v as u8);
            }
        }
    }
    PixelBuffer::from_samples(width, height, format, samples).unwrap()
}

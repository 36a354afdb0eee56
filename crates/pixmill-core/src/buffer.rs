//! Pixel buffer module
//!
//! [`PixelBuffer`] is the only data type the engine operates on: a non-empty 2D grid
//! of 8-bit samples in one of four channel layouts. Buffers own their storage; the
//! processing crate never mutates an input buffer except when compositing a
//! watermark onto an explicit target.

use crate::color::{luma_bt601, Color};
use crate::error::{ProcessingError, ProcessingResult};
use image::{
    DynamicImage, GrayAlphaImage, GrayImage, ImageBuffer, Luma, LumaA, Pixel, Rgb, RgbImage,
    Rgba, RgbaImage,
};
use serde::{Deserialize, Serialize};

/// Channel layout of a pixel buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    Gray8,
    GrayAlpha8,
    Rgb8,
    Rgba8,
}

impl PixelFormat {
    /// Number of samples per pixel
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::GrayAlpha8 => 2,
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }

    /// Index of the alpha sample within a pixel, if the layout has one
    pub fn alpha_index(self) -> Option<usize> {
        match self {
            PixelFormat::Gray8 | PixelFormat::Rgb8 => None,
            PixelFormat::GrayAlpha8 => Some(1),
            PixelFormat::Rgba8 => Some(3),
        }
    }

    pub fn has_alpha(self) -> bool {
        self.alpha_index().is_some()
    }

    pub fn is_gray(self) -> bool {
        matches!(self, PixelFormat::Gray8 | PixelFormat::GrayAlpha8)
    }

    /// The RGB layout with the same alpha presence
    pub fn to_color(self) -> PixelFormat {
        if self.has_alpha() {
            PixelFormat::Rgba8
        } else {
            PixelFormat::Rgb8
        }
    }

    /// Encode a color as samples of this layout.
    ///
    /// Only the first [`channels`](Self::channels) entries are meaningful.
    pub fn encode(self, color: Color) -> [u8; 4] {
        let Rgba([r, g, b, a]) = color;
        match self {
            PixelFormat::Gray8 => [luma_bt601(r, g, b), 0, 0, 0],
            PixelFormat::GrayAlpha8 => [luma_bt601(r, g, b), a, 0, 0],
            PixelFormat::Rgb8 => [r, g, b, 0],
            PixelFormat::Rgba8 => [r, g, b, a],
        }
    }
}

/// Typed storage of a pixel buffer, one variant per [`PixelFormat`]
#[derive(Debug, Clone, PartialEq)]
pub enum PixelData {
    Gray8(GrayImage),
    GrayAlpha8(GrayAlphaImage),
    Rgb8(RgbImage),
    Rgba8(RgbaImage),
}

impl PixelData {
    pub fn format(&self) -> PixelFormat {
        match self {
            PixelData::Gray8(_) => PixelFormat::Gray8,
            PixelData::GrayAlpha8(_) => PixelFormat::GrayAlpha8,
            PixelData::Rgb8(_) => PixelFormat::Rgb8,
            PixelData::Rgba8(_) => PixelFormat::Rgba8,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            PixelData::Gray8(image) => image.dimensions(),
            PixelData::GrayAlpha8(image) => image.dimensions(),
            PixelData::Rgb8(image) => image.dimensions(),
            PixelData::Rgba8(image) => image.dimensions(),
        }
    }
}

/// In-memory image with a fixed pixel format and non-zero dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    data: PixelData,
}

impl PixelBuffer {
    /// Allocate a zero-filled buffer
    pub fn new(width: u32, height: u32, format: PixelFormat) -> ProcessingResult<Self> {
        Self::filled(width, height, format, Rgba([0, 0, 0, 0]))
    }

    /// Allocate a buffer with every pixel set to `color`
    pub fn filled(
        width: u32,
        height: u32,
        format: PixelFormat,
        color: Color,
    ) -> ProcessingResult<Self> {
        Self::check_allocation("pixel_buffer", width, height, format)?;

        let samples = format.encode(color);
        let data = match format {
            PixelFormat::Gray8 => {
                PixelData::Gray8(ImageBuffer::from_pixel(width, height, Luma([samples[0]])))
            }
            PixelFormat::GrayAlpha8 => PixelData::GrayAlpha8(ImageBuffer::from_pixel(
                width,
                height,
                LumaA([samples[0], samples[1]]),
            )),
            PixelFormat::Rgb8 => PixelData::Rgb8(ImageBuffer::from_pixel(
                width,
                height,
                Rgb([samples[0], samples[1], samples[2]]),
            )),
            PixelFormat::Rgba8 => {
                PixelData::Rgba8(ImageBuffer::from_pixel(width, height, Rgba(samples)))
            }
        };

        Ok(PixelBuffer { data })
    }

    /// Wrap interleaved samples of the given layout
    pub fn from_samples(
        width: u32,
        height: u32,
        format: PixelFormat,
        samples: Vec<u8>,
    ) -> ProcessingResult<Self> {
        let expected = Self::check_allocation("pixel_buffer", width, height, format)?;
        if samples.len() != expected {
            return Err(ProcessingError::invalid_argument(
                "pixel_buffer",
                format!(
                    "expected {} bytes for {}x{} {:?}, got {}",
                    expected,
                    width,
                    height,
                    format,
                    samples.len()
                ),
            ));
        }

        let data = match format {
            PixelFormat::Gray8 => ImageBuffer::from_raw(width, height, samples).map(PixelData::Gray8),
            PixelFormat::GrayAlpha8 => {
                ImageBuffer::from_raw(width, height, samples).map(PixelData::GrayAlpha8)
            }
            PixelFormat::Rgb8 => ImageBuffer::from_raw(width, height, samples).map(PixelData::Rgb8),
            PixelFormat::Rgba8 => {
                ImageBuffer::from_raw(width, height, samples).map(PixelData::Rgba8)
            }
        };

        data.map(|data| PixelBuffer { data }).ok_or_else(|| {
            ProcessingError::invalid_argument("pixel_buffer", "sample buffer too small")
        })
    }

    /// Wrap already typed storage, rejecting empty images
    pub fn from_data(data: PixelData) -> ProcessingResult<Self> {
        let (width, height) = data.dimensions();
        if width == 0 || height == 0 {
            return Err(ProcessingError::invalid_argument(
                "pixel_buffer",
                format!("dimensions must be positive, got {}x{}", width, height),
            ));
        }
        Ok(PixelBuffer { data })
    }

    /// Accept a decoded image from the I/O layer.
    ///
    /// 16-bit and floating point images are narrowed to the 8-bit layout with the
    /// same channel structure.
    pub fn from_dynamic(image: DynamicImage) -> ProcessingResult<Self> {
        let data = match image {
            DynamicImage::ImageLuma8(image) => PixelData::Gray8(image),
            DynamicImage::ImageLumaA8(image) => PixelData::GrayAlpha8(image),
            DynamicImage::ImageRgb8(image) => PixelData::Rgb8(image),
            DynamicImage::ImageRgba8(image) => PixelData::Rgba8(image),
            DynamicImage::ImageLuma16(_) => PixelData::Gray8(image.to_luma8()),
            DynamicImage::ImageLumaA16(_) => PixelData::GrayAlpha8(image.to_luma_alpha8()),
            other if other.color().has_alpha() => PixelData::Rgba8(other.to_rgba8()),
            other => PixelData::Rgb8(other.to_rgb8()),
        };
        Self::from_data(data)
    }

    /// Hand the buffer back to the I/O layer
    pub fn into_dynamic(self) -> DynamicImage {
        match self.data {
            PixelData::Gray8(image) => DynamicImage::ImageLuma8(image),
            PixelData::GrayAlpha8(image) => DynamicImage::ImageLumaA8(image),
            PixelData::Rgb8(image) => DynamicImage::ImageRgb8(image),
            PixelData::Rgba8(image) => DynamicImage::ImageRgba8(image),
        }
    }

    /// Reject dimensions that are empty or whose sample count cannot be addressed.
    ///
    /// Returns the number of bytes such a buffer occupies.
    pub fn check_allocation(
        operation: &'static str,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> ProcessingResult<usize> {
        if width == 0 || height == 0 {
            return Err(ProcessingError::invalid_argument(
                operation,
                format!("dimensions must be positive, got {}x{}", width, height),
            ));
        }

        (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(format.channels()))
            .filter(|&len| len <= isize::MAX as usize)
            .ok_or_else(|| {
                ProcessingError::unsupported(
                    operation,
                    format!("{}x{} {:?} buffer is not addressable", width, height, format),
                )
            })
    }

    pub fn width(&self) -> u32 {
        self.dimensions().0
    }

    pub fn height(&self) -> u32 {
        self.dimensions().1
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.data.dimensions()
    }

    pub fn format(&self) -> PixelFormat {
        self.data.format()
    }

    pub fn data(&self) -> &PixelData {
        &self.data
    }

    pub fn into_data(self) -> PixelData {
        self.data
    }

    /// Interleaved samples, row-major
    pub fn samples(&self) -> &[u8] {
        match &self.data {
            PixelData::Gray8(image) => image.as_raw().as_slice(),
            PixelData::GrayAlpha8(image) => image.as_raw().as_slice(),
            PixelData::Rgb8(image) => image.as_raw().as_slice(),
            PixelData::Rgba8(image) => image.as_raw().as_slice(),
        }
    }

    /// Mutable interleaved samples, row-major
    pub fn samples_mut(&mut self) -> &mut [u8] {
        match &mut self.data {
            PixelData::Gray8(image) => &mut **image,
            PixelData::GrayAlpha8(image) => &mut **image,
            PixelData::Rgb8(image) => &mut **image,
            PixelData::Rgba8(image) => &mut **image,
        }
    }

    /// Build a buffer with the same dimensions and layout from new samples
    pub fn with_samples(&self, samples: Vec<u8>) -> ProcessingResult<Self> {
        Self::from_samples(self.width(), self.height(), self.format(), samples)
    }

    /// Pixel at (x, y) expanded to RGBA, or `None` outside the buffer
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let (width, height) = self.dimensions();
        if x >= width || y >= height {
            return None;
        }
        let color = match &self.data {
            PixelData::Gray8(image) => image.get_pixel(x, y).to_rgba(),
            PixelData::GrayAlpha8(image) => image.get_pixel(x, y).to_rgba(),
            PixelData::Rgb8(image) => image.get_pixel(x, y).to_rgba(),
            PixelData::Rgba8(image) => *image.get_pixel(x, y),
        };
        Some(color)
    }

    /// Copy of the buffer expanded to RGBA
    pub fn to_rgba8(&self) -> RgbaImage {
        match &self.data {
            PixelData::Gray8(image) => DynamicImage::ImageLuma8(image.clone()).to_rgba8(),
            PixelData::GrayAlpha8(image) => DynamicImage::ImageLumaA8(image.clone()).to_rgba8(),
            PixelData::Rgb8(image) => DynamicImage::ImageRgb8(image.clone()).to_rgba8(),
            PixelData::Rgba8(image) => image.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_zeroed() {
        let buffer = PixelBuffer::new(4, 3, PixelFormat::Rgba8).unwrap();
        assert_eq!(buffer.dimensions(), (4, 3));
        assert_eq!(buffer.format(), PixelFormat::Rgba8);
        assert_eq!(buffer.samples().len(), 4 * 3 * 4);
        assert!(buffer.samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let err = PixelBuffer::new(0, 10, PixelFormat::Rgb8).unwrap_err();
        assert!(matches!(err, ProcessingError::InvalidArgument { .. }));

        let err = PixelBuffer::from_data(PixelData::Gray8(GrayImage::new(5, 0))).unwrap_err();
        assert!(matches!(err, ProcessingError::InvalidArgument { .. }));
    }

    #[test]
    fn test_filled_encodes_color_per_format() {
        let red = Rgba([255, 0, 0, 128]);

        let rgb = PixelBuffer::filled(2, 2, PixelFormat::Rgb8, red).unwrap();
        assert_eq!(&rgb.samples()[..3], &[255, 0, 0]);

        let gray_alpha = PixelBuffer::filled(2, 2, PixelFormat::GrayAlpha8, red).unwrap();
        assert_eq!(&gray_alpha.samples()[..2], &[76, 128]);

        let rgba = PixelBuffer::filled(2, 2, PixelFormat::Rgba8, red).unwrap();
        assert_eq!(rgba.pixel(1, 1), Some(red));
    }

    #[test]
    fn test_from_samples_validates_length() {
        let err = PixelBuffer::from_samples(2, 2, PixelFormat::Rgb8, vec![0; 11]).unwrap_err();
        assert!(matches!(err, ProcessingError::InvalidArgument { .. }));

        let buffer = PixelBuffer::from_samples(2, 2, PixelFormat::Rgb8, vec![7; 12]).unwrap();
        assert_eq!(buffer.pixel(0, 1), Some(Rgba([7, 7, 7, 255])));
    }

    #[test]
    fn test_from_dynamic_narrows_wide_formats() {
        let wide = DynamicImage::new_rgb16(3, 2);
        let buffer = PixelBuffer::from_dynamic(wide).unwrap();
        assert_eq!(buffer.format(), PixelFormat::Rgb8);
        assert_eq!(buffer.dimensions(), (3, 2));

        let wide_alpha = DynamicImage::new_rgba16(3, 2);
        let buffer = PixelBuffer::from_dynamic(wide_alpha).unwrap();
        assert_eq!(buffer.format(), PixelFormat::Rgba8);
    }

    #[test]
    fn test_dynamic_round_trip_keeps_layout() {
        let image = DynamicImage::ImageLumaA8(GrayAlphaImage::from_pixel(2, 2, LumaA([9, 200])));
        let buffer = PixelBuffer::from_dynamic(image.clone()).unwrap();
        assert_eq!(buffer.format(), PixelFormat::GrayAlpha8);
        assert_eq!(buffer.into_dynamic(), image);
    }

    #[test]
    fn test_pixel_out_of_bounds() {
        let buffer = PixelBuffer::new(2, 2, PixelFormat::Gray8).unwrap();
        assert_eq!(buffer.pixel(2, 0), None);
        assert_eq!(buffer.pixel(0, 0), Some(Rgba([0, 0, 0, 255])));
    }

    #[test]
    fn test_check_allocation_overflow() {
        let err =
            PixelBuffer::check_allocation("resize", u32::MAX, u32::MAX, PixelFormat::Rgba8);
        if usize::BITS == 64 {
            // 2^64 * 4 bytes does not fit
            assert!(matches!(err, Err(ProcessingError::Unsupported { .. })));
        } else {
            assert!(err.is_err());
        }
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(PixelFormat::GrayAlpha8.to_color(), PixelFormat::Rgba8);
        assert_eq!(PixelFormat::Gray8.to_color(), PixelFormat::Rgb8);
        assert_eq!(PixelFormat::Rgba8.alpha_index(), Some(3));
        assert!(PixelFormat::Gray8.is_gray());
        assert!(!PixelFormat::Rgb8.has_alpha());
    }
}

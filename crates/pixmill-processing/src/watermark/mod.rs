//! Watermarks
//!
//! Text and image watermarks anchored on a 3x3 grid and composited source-over.
//! Unlike the geometry and filter operations, applying a watermark mutates its
//! target buffer in place.

mod composite;
mod position;
mod raster;
mod text;

pub use composite::composite_over;
pub use position::{calculate_position, WatermarkPosition};
pub use raster::{ImageWatermark, ImageWatermarkBuilder};
pub use text::{
    TextMetrics, TextWatermark, TextWatermarkBuilder, DEFAULT_FONT_SIZE, DEFAULT_TEXT_COLOR,
};

use pixmill_core::{PixelBuffer, ProcessingError, ProcessingResult};

/// Distance kept between a watermark and the image edges it is aligned to
pub const DEFAULT_MARGIN: u32 = 10;

/// A text or image watermark
#[derive(Debug, Clone)]
pub enum Watermark {
    Text(TextWatermark),
    Image(ImageWatermark),
}

impl Watermark {
    /// Composite the watermark onto `target` in place
    pub fn apply(&self, target: &mut PixelBuffer) -> ProcessingResult<()> {
        match self {
            Watermark::Text(watermark) => watermark.apply(target),
            Watermark::Image(watermark) => watermark.apply(target),
        }
    }

    pub fn position(&self) -> WatermarkPosition {
        match self {
            Watermark::Text(watermark) => watermark.position(),
            Watermark::Image(watermark) => watermark.position(),
        }
    }

    pub fn opacity(&self) -> f32 {
        match self {
            Watermark::Text(watermark) => watermark.opacity(),
            Watermark::Image(watermark) => watermark.opacity(),
        }
    }

    pub fn margin(&self) -> u32 {
        match self {
            Watermark::Text(watermark) => watermark.margin(),
            Watermark::Image(watermark) => watermark.margin(),
        }
    }
}

impl From<TextWatermark> for Watermark {
    fn from(watermark: TextWatermark) -> Self {
        Watermark::Text(watermark)
    }
}

impl From<ImageWatermark> for Watermark {
    fn from(watermark: ImageWatermark) -> Self {
        Watermark::Image(watermark)
    }
}

fn validate_opacity(operation: &'static str, opacity: f32) -> ProcessingResult<()> {
    if !opacity.is_finite() || !(0.0..=1.0).contains(&opacity) {
        return Err(ProcessingError::invalid_argument(
            operation,
            format!("opacity must be between 0 and 1, got {}", opacity),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use pixmill_core::PixelFormat;

    #[test]
    fn test_enum_delegates_to_variant() {
        let mark = PixelBuffer::filled(4, 4, PixelFormat::Rgb8, Rgba([0, 0, 0, 255])).unwrap();
        let watermark: Watermark = ImageWatermark::builder(mark)
            .position(WatermarkPosition::TopCenter)
            .opacity(0.75)
            .margin(2)
            .build()
            .unwrap()
            .into();

        assert_eq!(watermark.position(), WatermarkPosition::TopCenter);
        assert_eq!(watermark.opacity(), 0.75);
        assert_eq!(watermark.margin(), 2);

        let mut target =
            PixelBuffer::filled(10, 10, PixelFormat::Rgb8, Rgba([255, 255, 255, 255])).unwrap();
        watermark.apply(&mut target).unwrap();
        // (10 - 4) / 2 = 3 horizontally, margin 2 vertically
        assert_ne!(target.pixel(3, 2), Some(Rgba([255, 255, 255, 255])));
        assert_eq!(target.pixel(3, 1), Some(Rgba([255, 255, 255, 255])));
    }
}

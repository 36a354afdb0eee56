use super::composite::composite_over;
use super::position::{calculate_position, WatermarkPosition};
use super::{validate_opacity, DEFAULT_MARGIN};
use crate::geometry::{resize, ResizeMode};
use pixmill_core::{PixelBuffer, ProcessingError, ProcessingResult, ResizeQuality};

/// Validated image watermark. Build one with [`ImageWatermark::builder`].
#[derive(Debug, Clone)]
pub struct ImageWatermark {
    image: PixelBuffer,
    scale: f32,
    quality: ResizeQuality,
    position: WatermarkPosition,
    opacity: f32,
    margin: u32,
}

impl ImageWatermark {
    pub fn builder(image: PixelBuffer) -> ImageWatermarkBuilder {
        ImageWatermarkBuilder {
            image,
            scale: 1.0,
            quality: ResizeQuality::default(),
            position: WatermarkPosition::default(),
            opacity: 1.0,
            margin: DEFAULT_MARGIN,
        }
    }

    pub fn image(&self) -> &PixelBuffer {
        &self.image
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn quality(&self) -> ResizeQuality {
        self.quality
    }

    pub fn position(&self) -> WatermarkPosition {
        self.position
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn margin(&self) -> u32 {
        self.margin
    }

    /// Dimensions of the watermark after scaling, never below 1x1
    pub fn scaled_dimensions(&self) -> (u32, u32) {
        let (width, height) = self.image.dimensions();
        let scale = |v: u32| ((v as f64 * self.scale as f64).round() as u32).max(1);
        (scale(width), scale(height))
    }

    /// Composite the scaled watermark onto `target` in place
    pub fn apply(&self, target: &mut PixelBuffer) -> ProcessingResult<()> {
        let (width, height) = self.scaled_dimensions();
        let scaled = resize(&self.image, width, height, ResizeMode::Exact, self.quality)?;
        let overlay = scaled.to_rgba8();

        let (target_width, target_height) = target.dimensions();
        let (x, y) = calculate_position(
            target_width,
            target_height,
            width,
            height,
            self.position,
            self.margin,
        );

        tracing::debug!(
            x,
            y,
            width,
            height,
            position = ?self.position,
            opacity = self.opacity,
            "Applying image watermark"
        );

        composite_over(target, &overlay, x, y, self.opacity);
        Ok(())
    }
}

/// Builder for [`ImageWatermark`]; values are validated by [`build`](Self::build)
#[derive(Debug, Clone)]
pub struct ImageWatermarkBuilder {
    image: PixelBuffer,
    scale: f32,
    quality: ResizeQuality,
    position: WatermarkPosition,
    opacity: f32,
    margin: u32,
}

impl ImageWatermarkBuilder {
    /// Fraction of the watermark's own size, in (0, 1]
    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn quality(mut self, quality: ResizeQuality) -> Self {
        self.quality = quality;
        self
    }

    pub fn position(mut self, position: WatermarkPosition) -> Self {
        self.position = position;
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    pub fn build(self) -> ProcessingResult<ImageWatermark> {
        if !self.scale.is_finite() || self.scale <= 0.0 || self.scale > 1.0 {
            return Err(ProcessingError::invalid_argument(
                "image_watermark",
                format!("scale must be in (0, 1], got {}", self.scale),
            ));
        }
        validate_opacity("image_watermark", self.opacity)?;

        Ok(ImageWatermark {
            image: self.image,
            scale: self.scale,
            quality: self.quality,
            position: self.position,
            opacity: self.opacity,
            margin: self.margin,
        })
    }
}

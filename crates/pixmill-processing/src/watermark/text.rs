use super::composite::{blend_at, clip_span, fill_rect};
use super::position::{calculate_position, WatermarkPosition};
use super::{validate_opacity, DEFAULT_MARGIN};
use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{GrayImage, Luma, Rgba};
use imageproc::drawing::{draw_text_mut, text_size};
use pixmill_core::{Color, PixelBuffer, ProcessingError, ProcessingResult};
use std::fmt;

pub const DEFAULT_FONT_SIZE: f32 = 24.0;
pub const DEFAULT_TEXT_COLOR: Color = Rgba([255, 255, 255, 255]);

/// Measured box of a rendered line of text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    /// Sum of glyph advances
    pub width: u32,
    /// Ascent minus descent
    pub height: u32,
    /// Distance from the top of the box to the baseline
    pub ascent: f32,
}

/// Validated text watermark. Build one with [`TextWatermark::builder`].
#[derive(Clone)]
pub struct TextWatermark {
    text: String,
    font: FontArc,
    font_size: f32,
    color: Color,
    background: Option<Color>,
    position: WatermarkPosition,
    opacity: f32,
    margin: u32,
}

impl fmt::Debug for TextWatermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextWatermark")
            .field("text", &self.text)
            .field("font_size", &self.font_size)
            .field("color", &self.color)
            .field("background", &self.background)
            .field("position", &self.position)
            .field("opacity", &self.opacity)
            .field("margin", &self.margin)
            .finish_non_exhaustive()
    }
}

impl TextWatermark {
    pub fn builder(text: impl Into<String>, font: FontArc) -> TextWatermarkBuilder {
        TextWatermarkBuilder {
            text: text.into(),
            font,
            font_size: DEFAULT_FONT_SIZE,
            color: DEFAULT_TEXT_COLOR,
            background: None,
            position: WatermarkPosition::default(),
            opacity: 1.0,
            margin: DEFAULT_MARGIN,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn background(&self) -> Option<Color> {
        self.background
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

    /// Measure the text at the configured font size
    pub fn measure(&self) -> TextMetrics {
        let scale = PxScale::from(self.font_size);
        let scaled = self.font.as_scaled(scale);
        let (width, _) = text_size(scale, &self.font, &self.text);
        let height = (scaled.ascent() - scaled.descent()).ceil().max(1.0) as u32;
        TextMetrics {
            width: width.max(1),
            height,
            ascent: scaled.ascent(),
        }
    }

    /// Draw the text onto `target` in place.
    ///
    /// The background rectangle, when set, covers the text box plus the margin on
    /// every side and is painted before the glyphs.
    pub fn apply(&self, target: &mut PixelBuffer) -> ProcessingResult<()> {
        let metrics = self.measure();
        let (width, height) = target.dimensions();
        let (x, y) = calculate_position(
            width,
            height,
            metrics.width,
            metrics.height,
            self.position,
            self.margin,
        );

        tracing::debug!(
            text = %self.text,
            x,
            y,
            text_width = metrics.width,
            text_height = metrics.height,
            position = ?self.position,
            "Applying text watermark"
        );

        if let Some(background) = self.background {
            let margin = self.margin as i64;
            let (box_width, box_height) = (
                metrics.width.saturating_add(self.margin.saturating_mul(2)),
                metrics.height.saturating_add(self.margin.saturating_mul(2)),
            );
            fill_rect(
                target,
                (x - margin, y - margin),
                (box_width, box_height),
                background,
                self.opacity,
            );
        }

        // Glyph coverage over the visible part of the text box, with room for
        // glyphs that overhang their advance
        let overhang = (self.font_size / 4.0).ceil() as u32;
        let (box_width, box_height) = (
            metrics.width.saturating_add(overhang.saturating_mul(2)),
            metrics.height.saturating_add(overhang.saturating_mul(2)),
        );
        let visible_x = clip_span(x - overhang as i64, box_width, width);
        let visible_y = clip_span(y - overhang as i64, box_height, height);
        if visible_x.is_empty() || visible_y.is_empty() {
            return Ok(());
        }

        let mut mask = GrayImage::new(
            (visible_x.end - visible_x.start) as u32,
            (visible_y.end - visible_y.start) as u32,
        );
        let to_i32 = |v: i64| v.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
        // The baseline sits at y + ascent
        draw_text_mut(
            &mut mask,
            Luma([255]),
            to_i32(x - visible_x.start),
            to_i32(y - visible_y.start),
            PxScale::from(self.font_size),
            &self.font,
            &self.text,
        );

        let color_alpha = self.color[3] as f32 / 255.0 * self.opacity;
        for (mx, my, coverage) in mask.enumerate_pixels() {
            if coverage[0] > 0 {
                let alpha = coverage[0] as f32 / 255.0 * color_alpha;
                blend_at(
                    target,
                    visible_x.start + mx as i64,
                    visible_y.start + my as i64,
                    self.color,
                    alpha,
                );
            }
        }
        Ok(())
    }
}

/// Builder for [`TextWatermark`]; values are validated by [`build`](Self::build)
#[derive(Clone)]
pub struct TextWatermarkBuilder {
    text: String,
    font: FontArc,
    font_size: f32,
    color: Color,
    background: Option<Color>,
    position: WatermarkPosition,
    opacity: f32,
    margin: u32,
}

impl TextWatermarkBuilder {
    pub fn font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn background(mut self, background: Color) -> Self {
        self.background = Some(background);
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

    pub fn build(self) -> ProcessingResult<TextWatermark> {
        if self.text.is_empty() {
            return Err(ProcessingError::invalid_argument(
                "text_watermark",
                "text must not be empty",
            ));
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(ProcessingError::invalid_argument(
                "text_watermark",
                format!("font size must be positive, got {}", self.font_size),
            ));
        }
        validate_opacity("text_watermark", self.opacity)?;

        Ok(TextWatermark {
            text: self.text,
            font: self.font,
            font_size: self.font_size,
            color: self.color,
            background: self.background,
            position: self.position,
            opacity: self.opacity,
            margin: self.margin,
        })
    }
}

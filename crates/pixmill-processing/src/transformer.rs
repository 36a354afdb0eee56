//! Image transformer - applies an ordered list of operations to a buffer
//!
//! Operations are plain data (`serde`-tagged, so a chain can be described as
//! JSON) and are applied one after another, each step consuming the previous
//! step's buffer.

use crate::filters::{
    blur, brightness, brightness_offset, contrast, edge_detect, flip, flop, grayscale, invert,
    sepia, sharpen, vignette, DEFAULT_SEPIA_INTENSITY, DEFAULT_SHARPEN_STRENGTH,
};
use crate::geometry::{crop, pad, resize, resize_dimensions, rotate, rotated_bounds, ResizeMode};
use crate::watermark::Watermark;
use image::Rgba;
use pixmill_core::{EngineConfig, PixelBuffer, ProcessingError, ProcessingResult, ResizeQuality};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

fn default_sharpen_strength() -> f32 {
    DEFAULT_SHARPEN_STRENGTH
}

fn default_sepia_intensity() -> f32 {
    DEFAULT_SEPIA_INTENSITY
}

/// A single geometry or filter step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Resize {
        width: u32,
        height: u32,
        #[serde(default)]
        mode: ResizeMode,
        /// Falls back to the configured default quality
        #[serde(default)]
        quality: Option<ResizeQuality>,
    },
    Crop {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    Rotate {
        degrees: f64,
        #[serde(default)]
        background: Option<[u8; 4]>,
    },
    Pad {
        #[serde(default)]
        top: u32,
        #[serde(default)]
        right: u32,
        #[serde(default)]
        bottom: u32,
        #[serde(default)]
        left: u32,
        #[serde(default)]
        color: Option<[u8; 4]>,
    },
    Blur {
        radius: f32,
    },
    Sharpen {
        #[serde(default = "default_sharpen_strength")]
        strength: f32,
    },
    Grayscale,
    Brightness {
        factor: f32,
    },
    BrightnessOffset {
        offset: f32,
    },
    Contrast {
        factor: f32,
    },
    Sepia {
        #[serde(default = "default_sepia_intensity")]
        intensity: f32,
    },
    EdgeDetect,
    Vignette {
        intensity: f32,
    },
    Invert,
    Flip,
    Flop,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Resize { .. } => "resize",
            Operation::Crop { .. } => "crop",
            Operation::Rotate { .. } => "rotate",
            Operation::Pad { .. } => "pad",
            Operation::Blur { .. } => "blur",
            Operation::Sharpen { .. } => "sharpen",
            Operation::Grayscale => "grayscale",
            Operation::Brightness { .. } => "brightness",
            Operation::BrightnessOffset { .. } => "brightness_offset",
            Operation::Contrast { .. } => "contrast",
            Operation::Sepia { .. } => "sepia",
            Operation::EdgeDetect => "edge_detect",
            Operation::Vignette { .. } => "vignette",
            Operation::Invert => "invert",
            Operation::Flip => "flip",
            Operation::Flop => "flop",
        }
    }

    /// Dimensions this step produces from a `width`x`height` input.
    ///
    /// `None` when the parameters are invalid; the operation itself reports why.
    pub fn output_dimensions(&self, width: u32, height: u32) -> Option<(u32, u32)> {
        match *self {
            Operation::Resize {
                width: tw,
                height: th,
                mode,
                ..
            } => {
                if tw == 0 || th == 0 {
                    None
                } else if (tw, th) == (width, height) {
                    Some((width, height))
                } else {
                    Some(resize_dimensions(width, height, tw, th, mode))
                }
            }
            Operation::Crop {
                width: cw,
                height: ch,
                ..
            } => Some((cw, ch)),
            Operation::Rotate { degrees, .. } => {
                degrees.is_finite().then(|| rotated_bounds(width, height, degrees))
            }
            Operation::Pad {
                top,
                right,
                bottom,
                left,
                ..
            } => {
                let w = width.checked_add(left)?.checked_add(right)?;
                let h = height.checked_add(top)?.checked_add(bottom)?;
                Some((w, h))
            }
            _ => Some((width, height)),
        }
    }
}

/// Applies operation chains under an [`EngineConfig`]
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    config: EngineConfig,
}

impl Transformer {
    pub fn new(config: EngineConfig) -> Self {
        Transformer { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Apply `operations` in order.
    ///
    /// Stops at the first failing step; the error names that step's operation.
    pub fn run(
        &self,
        buffer: PixelBuffer,
        operations: &[Operation],
    ) -> ProcessingResult<PixelBuffer> {
        let mut buffer = buffer;
        for (step, operation) in operations.iter().enumerate() {
            tracing::debug!(
                step,
                operation = operation.name(),
                width = buffer.width(),
                height = buffer.height(),
                "Applying transform step"
            );
            buffer = self.apply(buffer, operation).map_err(|err| {
                err.log();
                err
            })?;
        }
        Ok(buffer)
    }

    /// Apply a single operation, consuming the input buffer
    pub fn apply(
        &self,
        buffer: PixelBuffer,
        operation: &Operation,
    ) -> ProcessingResult<PixelBuffer> {
        self.check_output_size(&buffer, operation)?;

        match *operation {
            Operation::Resize {
                width,
                height,
                mode,
                quality,
            } => {
                let quality = quality.unwrap_or(self.config.default_quality);
                let resized = take_owned(resize(&buffer, width, height, mode, quality)?);
                Ok(resized.unwrap_or(buffer))
            }
            Operation::Crop {
                x,
                y,
                width,
                height,
            } => crop(&buffer, x, y, width, height),
            Operation::Rotate {
                degrees,
                background,
            } => rotate(&buffer, degrees, background.map(Rgba)),
            Operation::Pad {
                top,
                right,
                bottom,
                left,
                color,
            } => pad(&buffer, top, right, bottom, left, color.map(Rgba)),
            Operation::Blur { radius } => blur(&buffer, radius),
            Operation::Sharpen { strength } => sharpen(&buffer, strength),
            Operation::Grayscale => grayscale(&buffer),
            Operation::Brightness { factor } => brightness(&buffer, factor),
            Operation::BrightnessOffset { offset } => brightness_offset(&buffer, offset),
            Operation::Contrast { factor } => contrast(&buffer, factor),
            Operation::Sepia { intensity } => {
                let toned = take_owned(sepia(&buffer, intensity)?);
                Ok(toned.unwrap_or(buffer))
            }
            Operation::EdgeDetect => edge_detect(&buffer),
            Operation::Vignette { intensity } => vignette(&buffer, intensity),
            Operation::Invert => invert(&buffer),
            Operation::Flip => flip(&buffer),
            Operation::Flop => flop(&buffer),
        }
    }

    /// Composite `watermark` onto `buffer` and hand the buffer back
    pub fn watermark(
        &self,
        mut buffer: PixelBuffer,
        watermark: &Watermark,
    ) -> ProcessingResult<PixelBuffer> {
        tracing::debug!(position = ?watermark.position(), "Applying watermark step");
        watermark.apply(&mut buffer)?;
        Ok(buffer)
    }

    fn check_output_size(
        &self,
        buffer: &PixelBuffer,
        operation: &Operation,
    ) -> ProcessingResult<()> {
        let (width, height) = match operation.output_dimensions(buffer.width(), buffer.height()) {
            Some(dimensions) => dimensions,
            None => return Ok(()),
        };

        let pixels = width as u64 * height as u64;
        if pixels > self.config.max_output_pixels {
            return Err(ProcessingError::unsupported(
                operation.name(),
                format!(
                    "output {}x{} ({} pixels) exceeds the limit of {} pixels",
                    width, height, pixels, self.config.max_output_pixels
                ),
            ));
        }
        Ok(())
    }
}

/// The owned result of an operation that may return its input unchanged
fn take_owned(result: Cow<'_, PixelBuffer>) -> Option<PixelBuffer> {
    match result {
        Cow::Owned(buffer) => Some(buffer),
        Cow::Borrowed(_) => None,
    }
}

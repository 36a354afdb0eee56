//! Resampling quality levels
//!
//! Each level maps to one resampling filter of the `image` crate. The level lives in
//! the core crate so the engine configuration can name a default.

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Resampling quality used by resize and image watermark scaling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeQuality {
    /// Nearest neighbor
    Low,
    /// Bilinear
    Medium,
    /// Bicubic (Catmull-Rom)
    #[default]
    High,
    /// Bicubic-plus (Lanczos with a 3-lobe window)
    Ultra,
}

impl ResizeQuality {
    pub fn filter_type(self) -> FilterType {
        match self {
            ResizeQuality::Low => FilterType::Nearest,
            ResizeQuality::Medium => FilterType::Triangle,
            ResizeQuality::High => FilterType::CatmullRom,
            ResizeQuality::Ultra => FilterType::Lanczos3,
        }
    }

    /// Select a quality based on the resize ratio.
    ///
    /// Strong downscales gain little from wide filters, so they use cheaper kernels.
    pub fn for_scale(orig_width: u32, orig_height: u32, new_width: u32, new_height: u32) -> Self {
        let width_ratio = orig_width as f32 / new_width.max(1) as f32;
        let height_ratio = orig_height as f32 / new_height.max(1) as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            ResizeQuality::Medium
        } else if max_ratio > 1.5 {
            ResizeQuality::High
        } else {
            ResizeQuality::Ultra
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResizeQuality::Low => "low",
            ResizeQuality::Medium => "medium",
            ResizeQuality::High => "high",
            ResizeQuality::Ultra => "ultra",
        }
    }
}

impl fmt::Display for ResizeQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResizeQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(ResizeQuality::Low),
            "medium" => Ok(ResizeQuality::Medium),
            "high" => Ok(ResizeQuality::High),
            "ultra" => Ok(ResizeQuality::Ultra),
            other => Err(format!(
                "Invalid resize quality: {}. Expected: low, medium, high or ultra",
                other
            )),
        }
    }
}

//! Pixmill Image Processing Library
//!
//! This crate provides the in-memory image operations of the engine:
//! - Geometry (resize, crop, rotate, pad)
//! - Filters (convolution, color lookup tables, per-pixel effects, mirroring)
//! - Watermarks (text and image, composited onto a target buffer)
//! - A transformer that applies an ordered list of operations
//!
//! Geometry and filter operations are pure: they borrow their input and return a
//! new buffer (or the input itself for documented identity cases). Watermark
//! application is the one operation that mutates its target in place.

mod dispatch;

pub mod filters;
pub mod geometry;
pub mod kernel;
pub mod transformer;
pub mod watermark;

// Re-export commonly used types
pub use filters::{
    blur, brightness, brightness_offset, contrast, edge_detect, flip, flop, grayscale, invert,
    sepia, sharpen, vignette, DEFAULT_SEPIA_INTENSITY, DEFAULT_SHARPEN_STRENGTH, MAX_BLUR_RADIUS,
};
pub use geometry::{crop, pad, resize, resize_dimensions, rotate, rotated_bounds, ResizeMode};
pub use kernel::Kernel;
pub use pixmill_core::{
    Color, PixelBuffer, PixelData, PixelFormat, ProcessingError, ProcessingResult, ResizeQuality,
};
pub use transformer::{Operation, Transformer};
pub use watermark::{
    calculate_position, composite_over, ImageWatermark, ImageWatermarkBuilder, TextMetrics,
    TextWatermark, TextWatermarkBuilder, Watermark, WatermarkPosition,
};

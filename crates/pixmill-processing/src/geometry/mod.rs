//! Geometry operations
//!
//! Resize, crop, rotate and pad. Every operation validates its parameters before
//! allocating and preserves the source pixel format.

pub mod crop;
pub mod pad;
pub mod resize;
pub mod rotate;

pub use crop::crop;
pub use pad::pad;
pub use resize::{resize, resize_dimensions, ResizeMode};
pub use rotate::{normalize_degrees, rotate, rotated_bounds};

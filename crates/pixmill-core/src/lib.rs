//! Pixmill Core Library
//!
//! This crate provides the pixel buffer abstraction, error types, configuration
//! and tracing setup shared by the Pixmill processing crate.

pub mod buffer;
pub mod color;
pub mod config;
pub mod error;
pub mod quality;
pub mod telemetry;

// Re-export commonly used types
pub use buffer::{PixelBuffer, PixelData, PixelFormat};
pub use color::{luma_bt601, Color};
pub use config::{EngineConfig, LoggingConfig};
pub use error::{ErrorMetadata, LogLevel, ProcessingError, ProcessingResult};
pub use quality::ResizeQuality;
pub use telemetry::init_tracing;

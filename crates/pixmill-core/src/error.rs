//! Error types module
//!
//! Every engine operation fails with a [`ProcessingError`]. Errors always name the
//! operation that rejected its input and, for region and dimension problems, carry
//! the dimensions involved so the host can report them without extra context.
//!
//! Operations are deterministic: the same inputs fail the same way, so no variant
//! is ever recoverable by retrying.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for caller mistakes like invalid parameters
    Debug,
    /// Warning level - for requests the engine cannot represent
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be reported by the host
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "OUT_OF_BOUNDS")
    fn error_code(&self) -> &'static str;

    /// Whether retrying the same call could succeed
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the caller
    fn suggested_action(&self) -> Option<&'static str>;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProcessingError {
    #[error("{operation}: invalid argument: {message}")]
    InvalidArgument {
        operation: &'static str,
        message: String,
    },

    #[error(
        "{operation}: region {width}x{height} at ({x}, {y}) exceeds image bounds {image_width}x{image_height}"
    )]
    OutOfBounds {
        operation: &'static str,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    },

    #[error("{operation}: unsupported: {message}")]
    Unsupported {
        operation: &'static str,
        message: String,
    },
}

pub type ProcessingResult<T> = Result<T, ProcessingError>;

impl ProcessingError {
    pub fn invalid_argument(operation: &'static str, message: impl Into<String>) -> Self {
        ProcessingError::InvalidArgument {
            operation,
            message: message.into(),
        }
    }

    pub fn unsupported(operation: &'static str, message: impl Into<String>) -> Self {
        ProcessingError::Unsupported {
            operation,
            message: message.into(),
        }
    }

    /// Name of the operation that produced this error
    pub fn operation(&self) -> &'static str {
        match self {
            ProcessingError::InvalidArgument { operation, .. }
            | ProcessingError::OutOfBounds { operation, .. }
            | ProcessingError::Unsupported { operation, .. } => operation,
        }
    }

    /// Emit this error as a tracing event at its metadata log level
    pub fn log(&self) {
        let code = self.error_code();
        let operation = self.operation();
        match self.log_level() {
            LogLevel::Debug => tracing::debug!(code, operation, error = %self, "Operation rejected"),
            LogLevel::Warn => tracing::warn!(code, operation, error = %self, "Operation rejected"),
            LogLevel::Error => tracing::error!(code, operation, error = %self, "Operation failed"),
        }
    }
}

impl ErrorMetadata for ProcessingError {
    fn error_code(&self) -> &'static str {
        match self {
            ProcessingError::InvalidArgument { .. } => "INVALID_ARGUMENT",
            ProcessingError::OutOfBounds { .. } => "OUT_OF_BOUNDS",
            ProcessingError::Unsupported { .. } => "UNSUPPORTED",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }

    fn suggested_action(&self) -> Option<&'static str> {
        match self {
            ProcessingError::InvalidArgument { .. } => Some("Check operation parameters and try again"),
            ProcessingError::OutOfBounds { .. } => Some("Keep the region inside the image dimensions"),
            ProcessingError::Unsupported { .. } => Some("Reduce the requested output size"),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            ProcessingError::InvalidArgument { .. } | ProcessingError::OutOfBounds { .. } => {
                LogLevel::Debug
            }
            ProcessingError::Unsupported { .. } => LogLevel::Warn,
        }
    }
}

//! Configuration module
//!
//! Engine-wide settings read from the environment (and a `.env` file when present).

use std::env;

use crate::quality::ResizeQuality;

// Common constants
const MAX_OUTPUT_PIXELS: u64 = 268_435_456; // 16384 x 16384
const LOG_FILTER: &str = "pixmill=info";

/// Tracing subscriber settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive string, e.g. "pixmill=debug"
    pub filter: String,
    /// Emit JSON lines instead of the compact console format
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: LOG_FILTER.to_string(),
            json: false,
        }
    }
}

/// Engine configuration
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Largest output (width x height) a transformer step may produce
    pub max_output_pixels: u64,
    /// Quality used when a resize step does not name one
    pub default_quality: ResizeQuality,
    pub logging: LoggingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_output_pixels: MAX_OUTPUT_PIXELS,
            default_quality: ResizeQuality::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let max_output_pixels = match env::var("PIXMILL_MAX_OUTPUT_PIXELS") {
            Ok(value) => value.trim().parse::<u64>().map_err(|_| {
                anyhow::anyhow!("PIXMILL_MAX_OUTPUT_PIXELS must be a positive integer")
            })?,
            Err(_) => MAX_OUTPUT_PIXELS,
        };

        let default_quality = match env::var("PIXMILL_DEFAULT_QUALITY") {
            Ok(value) => value.parse::<ResizeQuality>().map_err(anyhow::Error::msg)?,
            Err(_) => ResizeQuality::default(),
        };

        let logging = LoggingConfig {
            filter: env::var("PIXMILL_LOG_FILTER").unwrap_or_else(|_| LOG_FILTER.to_string()),
            json: env::var("PIXMILL_LOG_JSON")
                .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        };

        let config = EngineConfig {
            max_output_pixels,
            default_quality,
            logging,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_output_pixels == 0 {
            return Err(anyhow::anyhow!(
                "PIXMILL_MAX_OUTPUT_PIXELS must be greater than zero"
            ));
        }
        if self.logging.filter.trim().is_empty() {
            return Err(anyhow::anyhow!("PIXMILL_LOG_FILTER cannot be empty"));
        }
        Ok(())
    }
}

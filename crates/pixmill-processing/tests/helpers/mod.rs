#![allow(dead_code)]

pub mod fixtures;

use ab_glyph::FontArc;
use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
/// Honors `RUST_LOG`, defaulting to debug output for the engine crates.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pixmill_processing=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

const FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
];

/// A system TrueType font, if one is installed.
/// Text watermark tests return early when this is `None`.
pub fn load_font() -> Option<FontArc> {
    FONT_PATHS.iter().find_map(|path| {
        let data = std::fs::read(path).ok()?;
        FontArc::try_from_vec(data).ok()
    })
}

//! Transformer integration tests.
//!
//! Run with: `cargo test -p pixmill-processing --test transformer_test`

mod helpers;

use helpers::fixtures::{gradient, solid, BLUE, WHITE};
use pixmill_core::{EngineConfig, ErrorMetadata, LogLevel};
use pixmill_processing::{
    ImageWatermark, Operation, PixelFormat, ProcessingError, ResizeMode, ResizeQuality,
    Transformer, Watermark, WatermarkPosition,
};

#[test]
fn test_json_pipeline_matches_direct_calls() -> anyhow::Result<()> {
    helpers::init_tracing();
    let operations: Vec<Operation> = serde_json::from_str(
        r#"[
            {"op": "crop", "x": 10, "y": 5, "width": 80, "height": 40},
            {"op": "resize", "width": 40, "height": 40, "mode": "fit", "quality": "ultra"},
            {"op": "grayscale"},
            {"op": "flop"}
        ]"#,
    )?;

    let source = gradient(120, 60, PixelFormat::Rgb8);
    let piped = Transformer::default().run(source.clone(), &operations)?;

    let cropped = pixmill_processing::crop(&source, 10, 5, 80, 40)?;
    let resized = pixmill_processing::resize(
        &cropped,
        40,
        40,
        ResizeMode::Fit,
        ResizeQuality::Ultra,
    )?;
    let gray = pixmill_processing::grayscale(&resized)?;
    let direct = pixmill_processing::flop(&gray)?;

    assert_eq!(piped, direct);
    assert_eq!(piped.dimensions(), (40, 20));
    Ok(())
}

#[test]
fn test_operations_serialize_with_tags() -> anyhow::Result<()> {
    let operation = Operation::Rotate {
        degrees: 30.0,
        background: Some([255, 255, 255, 255]),
    };
    let value = serde_json::to_value(&operation)?;
    assert_eq!(value["op"], "rotate");
    assert_eq!(value["degrees"], 30.0);

    let back: Operation = serde_json::from_value(value)?;
    assert_eq!(back, operation);
    Ok(())
}

#[test]
fn test_default_quality_comes_from_config() -> anyhow::Result<()> {
    let config = EngineConfig {
        default_quality: ResizeQuality::Low,
        ..EngineConfig::default()
    };
    let source = gradient(30, 30, PixelFormat::Rgba8);
    let operation = Operation::Resize {
        width: 13,
        height: 7,
        mode: ResizeMode::Exact,
        quality: None,
    };

    let configured = Transformer::new(config).apply(source.clone(), &operation)?;
    let nearest =
        pixmill_processing::resize(&source, 13, 7, ResizeMode::Exact, ResizeQuality::Low)?;
    assert_eq!(&configured, nearest.as_ref());
    Ok(())
}

#[test]
fn test_pixel_limit_error_metadata() {
    let transformer = Transformer::new(EngineConfig {
        max_output_pixels: 1_000,
        ..EngineConfig::default()
    });
    let rotated = transformer
        .apply(
            solid(10, 10, PixelFormat::Gray8, WHITE),
            &Operation::Rotate {
                degrees: 45.0,
                background: None,
            },
        )
        .unwrap();
    // 10x10 at 45 degrees is 15x15, well under the limit
    assert_eq!(rotated.dimensions(), (15, 15));

    let err = transformer
        .apply(
            solid(10, 10, PixelFormat::Gray8, WHITE),
            &Operation::Pad {
                top: 20,
                right: 20,
                bottom: 20,
                left: 20,
                color: None,
            },
        )
        .unwrap_err();
    assert!(matches!(err, ProcessingError::Unsupported { operation: "pad", .. }));
    assert_eq!(err.error_code(), "UNSUPPORTED");
    assert_eq!(err.log_level(), LogLevel::Warn);
    assert!(!err.is_recoverable());
}

#[test]
fn test_watermark_step_after_filters() -> anyhow::Result<()> {
    let transformer = Transformer::default();
    let buffer = transformer.run(
        solid(64, 64, PixelFormat::Rgb8, WHITE),
        &[Operation::Invert, Operation::Vignette { intensity: 0.0 }],
    )?;

    let watermark: Watermark = ImageWatermark::builder(solid(8, 8, PixelFormat::Rgb8, BLUE))
        .position(WatermarkPosition::TopLeft)
        .margin(0)
        .build()?
        .into();
    let marked = transformer.watermark(buffer, &watermark)?;

    assert_eq!(marked.pixel(0, 0), Some(BLUE));
    assert_eq!(marked.pixel(32, 32), Some(image::Rgba([0, 0, 0, 255])));
    Ok(())
}

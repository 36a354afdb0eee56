use crate::dispatch::map_pixels;
use image::imageops;
use pixmill_core::{Color, PixelBuffer, ProcessingError, ProcessingResult};

/// Map any finite angle into [0, 360)
pub fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Bounding box of a `width`x`height` image rotated by `degrees`.
///
/// Quarter turns are exact; other angles use
/// `ceil(|w·cos θ| + |h·sin θ|)` x `ceil(|w·sin θ| + |h·cos θ|)`.
pub fn rotated_bounds(width: u32, height: u32, degrees: f64) -> (u32, u32) {
    let degrees = normalize_degrees(degrees);
    if degrees == 0.0 || degrees == 180.0 {
        return (width, height);
    }
    if degrees == 90.0 || degrees == 270.0 {
        return (height, width);
    }

    let (sin, cos) = degrees.to_radians().sin_cos();
    let (w, h) = (width as f64, height as f64);
    // Absorb floating point noise so exact integer extents do not gain a pixel
    let bound = |extent: f64| (extent - 1e-9).ceil().max(1.0) as u32;
    (
        bound((w * cos).abs() + (h * sin).abs()),
        bound((w * sin).abs() + (h * cos).abs()),
    )
}

/// Rotate an image clockwise by `degrees`.
///
/// Quarter turns relocate pixels without interpolation. Any other angle rotates the
/// image about its center into its bounding box using bilinear sampling; pixels the
/// rotated source does not cover are set to `background`, or left zeroed when no
/// background is given. Uncovered pixels are never extended or reflected from the
/// source edge.
pub fn rotate(
    source: &PixelBuffer,
    degrees: f64,
    background: Option<Color>,
) -> ProcessingResult<PixelBuffer> {
    if !degrees.is_finite() {
        return Err(ProcessingError::invalid_argument(
            "rotate",
            format!(
                "angle must be finite, got {} (image {}x{})",
                degrees,
                source.width(),
                source.height()
            ),
        ));
    }

    let degrees = normalize_degrees(degrees);
    let (width, height) = rotated_bounds(source.width(), source.height(), degrees);
    PixelBuffer::check_allocation("rotate", width, height, source.format())?;

    tracing::debug!(
        degrees = degrees,
        width = width,
        height = height,
        "Rotating image"
    );

    let rotated = if degrees == 0.0 {
        source.data().clone()
    } else if degrees == 90.0 {
        map_pixels!(source, |image| imageops::rotate90(image))
    } else if degrees == 180.0 {
        map_pixels!(source, |image| imageops::rotate180(image))
    } else if degrees == 270.0 {
        map_pixels!(source, |image| imageops::rotate270(image))
    } else {
        let fill = background
            .map(|color| source.format().encode(color))
            .unwrap_or([0; 4]);
        return rotate_into_bounds(source, degrees.to_radians(), (width, height), &fill);
    };

    PixelBuffer::from_data(rotated)
}

/// Inverse-map every destination pixel into the source and sample bilinearly.
///
/// A destination pixel is covered when its center maps inside the source
/// rectangle; neighbors past the last row or column are clamped to it.
fn rotate_into_bounds(
    source: &PixelBuffer,
    radians: f64,
    (width, height): (u32, u32),
    fill: &[u8; 4],
) -> ProcessingResult<PixelBuffer> {
    let format = source.format();
    let channels = format.channels();
    let (src_width, src_height) = source.dimensions();
    let samples = source.samples();

    let (sin, cos) = radians.sin_cos();
    let src_center = (src_width as f64 / 2.0, src_height as f64 / 2.0);
    let dst_center = (width as f64 / 2.0, height as f64 / 2.0);

    let mut out = Vec::with_capacity(width as usize * height as usize * channels);
    let mut pixel = [0u8; 4];
    for y in 0..height {
        let dy = y as f64 + 0.5 - dst_center.1;
        for x in 0..width {
            let dx = x as f64 + 0.5 - dst_center.0;
            // Inverse of the clockwise rotation in y-down coordinates
            let sx = dx * cos + dy * sin + src_center.0 - 0.5;
            let sy = -dx * sin + dy * cos + src_center.1 - 0.5;

            let covered = sample_bilinear(
                samples,
                (src_width, src_height),
                channels,
                (sx, sy),
                &mut pixel[..channels],
            );
            if covered {
                out.extend_from_slice(&pixel[..channels]);
            } else {
                out.extend_from_slice(&fill[..channels]);
            }
        }
    }

    PixelBuffer::from_samples(width, height, format, out)
}

fn sample_bilinear(
    samples: &[u8],
    (width, height): (u32, u32),
    channels: usize,
    (x, y): (f64, f64),
    out: &mut [u8],
) -> bool {
    let max_x = width as f64 - 1.0;
    let max_y = height as f64 - 1.0;
    if x < -0.5 || y < -0.5 || x > max_x + 0.5 || y > max_y + 0.5 {
        return false;
    }

    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);
    let x0 = x.floor() as usize;
    let y0 = y.floor() as usize;
    let x1 = (x0 + 1).min(width as usize - 1);
    let y1 = (y0 + 1).min(height as usize - 1);
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let row = width as usize;
    let at = |px: usize, py: usize, c: usize| samples[(py * row + px) * channels + c] as f64;
    for (c, sample) in out.iter_mut().enumerate() {
        let top = at(x0, y0, c) * (1.0 - fx) + at(x1, y0, c) * fx;
        let bottom = at(x0, y1, c) * (1.0 - fx) + at(x1, y1, c) * fx;
        *sample = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use pixmill_core::PixelFormat;

    fn create_test_image(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::filled(width, height, PixelFormat::Rgba8, Rgba([0, 0, 255, 255])).unwrap()
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(450.0), 90.0);
        assert!(normalize_degrees(-1e-20) < 360.0);
    }

    #[test]
    fn test_rotation_dimension_changes() {
        let img = create_test_image(4, 2);

        // 90 degree rotation should swap dimensions
        assert_eq!(rotate(&img, 90.0, None).unwrap().dimensions(), (2, 4));
        // 180 degree rotation should keep dimensions
        assert_eq!(rotate(&img, 180.0, None).unwrap().dimensions(), (4, 2));
        // 270 degree rotation should swap dimensions
        assert_eq!(rotate(&img, 270.0, None).unwrap().dimensions(), (2, 4));
        assert_eq!(rotate(&img, 0.0, None).unwrap().dimensions(), (4, 2));
        assert_eq!(rotate(&img, 360.0, None).unwrap().dimensions(), (4, 2));
        assert_eq!(rotate(&img, -90.0, None).unwrap().dimensions(), (2, 4));
    }

    #[test]
    fn test_quarter_turn_relocates_pixels() {
        // 2x1 image: red then green
        let img = PixelBuffer::from_samples(
            2,
            1,
            PixelFormat::Rgb8,
            vec![255, 0, 0, 0, 255, 0],
        )
        .unwrap();

        let rotated = rotate(&img, 90.0, None).unwrap();
        assert_eq!(rotated.dimensions(), (1, 2));
        // Clockwise: the left pixel ends up on top
        assert_eq!(rotated.pixel(0, 0), Some(Rgba([255, 0, 0, 255])));
        assert_eq!(rotated.pixel(0, 1), Some(Rgba([0, 255, 0, 255])));

        let flipped = rotate(&img, 180.0, None).unwrap();
        assert_eq!(flipped.pixel(0, 0), Some(Rgba([0, 255, 0, 255])));
    }

    #[test]
    fn test_rotate_45_bounding_box() {
        let img = create_test_image(100, 100);
        let rotated = rotate(&img, 45.0, None).unwrap();
        let expected = 100.0 * std::f64::consts::SQRT_2;
        let (w, h) = rotated.dimensions();
        assert!((w as f64 - expected).abs() <= 1.0);
        assert!((h as f64 - expected).abs() <= 1.0);
    }

    #[test]
    fn test_rotate_fills_corners_with_background() {
        let img = create_test_image(50, 50);
        let background = Rgba([255, 255, 255, 255]);
        let rotated = rotate(&img, 45.0, Some(background)).unwrap();
        assert_eq!(rotated.pixel(0, 0), Some(background));

        let (w, h) = rotated.dimensions();
        assert_eq!(rotated.pixel(w / 2, h / 2), Some(Rgba([0, 0, 255, 255])));

        // Without a background the uncovered corner stays zeroed
        let rotated = rotate(&img, 45.0, None).unwrap();
        assert_eq!(rotated.pixel(0, 0), Some(Rgba([0, 0, 0, 0])));
    }

    #[test]
    fn test_rotated_bounds_general() {
        assert_eq!(rotated_bounds(200, 100, 90.0), (100, 200));
        let (w, h) = rotated_bounds(200, 100, 30.0);
        // 200*cos30 + 100*sin30 = 223.2; 200*sin30 + 100*cos30 = 186.6
        assert_eq!((w, h), (224, 187));
    }

    #[test]
    fn test_rotate_rejects_non_finite() {
        let img = create_test_image(4, 4);
        assert!(rotate(&img, f64::NAN, None).is_err());
        assert!(rotate(&img, f64::INFINITY, None).is_err());
    }
}

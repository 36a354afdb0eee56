use crate::dispatch::map_pixels;
use image::imageops;
use pixmill_core::{PixelBuffer, ProcessingError, ProcessingResult};

/// Copy the region `width`x`height` at (`x`, `y`) into a new buffer.
///
/// The region must lie entirely inside the source. Cropping the full image still
/// returns a distinct buffer.
pub fn crop(
    source: &PixelBuffer,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> ProcessingResult<PixelBuffer> {
    let (image_width, image_height) = source.dimensions();
    if width == 0 || height == 0 {
        return Err(ProcessingError::invalid_argument(
            "crop",
            format!(
                "region dimensions must be positive, got {}x{} for a {}x{} image",
                width, height, image_width, image_height
            ),
        ));
    }

    let fits_x = x.checked_add(width).is_some_and(|right| right <= image_width);
    let fits_y = y.checked_add(height).is_some_and(|bottom| bottom <= image_height);
    if !fits_x || !fits_y {
        return Err(ProcessingError::OutOfBounds {
            operation: "crop",
            x,
            y,
            width,
            height,
            image_width,
            image_height,
        });
    }

    tracing::debug!(x, y, width, height, "Cropping image");

    let cropped = map_pixels!(source, |image| {
        imageops::crop_imm(image, x, y, width, height).to_image()
    });
    PixelBuffer::from_data(cropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use pixmill_core::PixelFormat;

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let samples = (0..width * height)
            .flat_map(|i| {
                let v = (i % 256) as u8;
                [v, v, v]
            })
            .collect();
        PixelBuffer::from_samples(width, height, PixelFormat::Rgb8, samples).unwrap()
    }

    #[test]
    fn test_crop_region_contents() {
        let img = gradient(10, 10);
        let cropped = crop(&img, 2, 3, 4, 5).unwrap();
        assert_eq!(cropped.dimensions(), (4, 5));
        assert_eq!(cropped.pixel(0, 0), img.pixel(2, 3));
        assert_eq!(cropped.pixel(3, 4), img.pixel(5, 7));
    }

    #[test]
    fn test_crop_full_image_is_distinct() {
        let img = PixelBuffer::filled(8, 6, PixelFormat::Rgba8, Rgba([1, 2, 3, 4])).unwrap();
        let cropped = crop(&img, 0, 0, 8, 6).unwrap();
        assert_eq!(cropped.dimensions(), img.dimensions());
        assert_eq!(cropped, img);
        assert!(!std::ptr::eq(cropped.samples().as_ptr(), img.samples().as_ptr()));
    }

    #[test]
    fn test_crop_out_of_bounds() {
        let img = gradient(200, 100);
        let err = crop(&img, 150, 0, 100, 50).unwrap_err();
        assert!(matches!(
            err,
            ProcessingError::OutOfBounds {
                image_width: 200,
                image_height: 100,
                ..
            }
        ));

        let err = crop(&img, 0, u32::MAX, 10, 10).unwrap_err();
        assert!(matches!(err, ProcessingError::OutOfBounds { .. }));
    }

    #[test]
    fn test_crop_zero_size() {
        let img = gradient(10, 10);
        let err = crop(&img, 0, 0, 0, 5).unwrap_err();
        assert!(matches!(err, ProcessingError::InvalidArgument { .. }));
    }
}

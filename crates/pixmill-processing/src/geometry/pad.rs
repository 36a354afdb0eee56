use crate::dispatch::map_pixels;
use image::{imageops, ImageBuffer, Pixel};
use pixmill_core::{Color, PixelBuffer, ProcessingError, ProcessingResult};

/// Surround an image with a border.
///
/// The output is `left + width + right` by `top + height + bottom`, filled with
/// `color` (zeroed when `None`), with the source copied at (`left`, `top`).
pub fn pad(
    source: &PixelBuffer,
    top: u32,
    right: u32,
    bottom: u32,
    left: u32,
    color: Option<Color>,
) -> ProcessingResult<PixelBuffer> {
    let (width, height) = source.dimensions();
    let new_width = width.checked_add(left).and_then(|w| w.checked_add(right));
    let new_height = height.checked_add(top).and_then(|h| h.checked_add(bottom));

    let (new_width, new_height) = match (new_width, new_height) {
        (Some(w), Some(h)) => (w, h),
        _ => {
            return Err(ProcessingError::unsupported(
                "pad",
                format!(
                    "padding {}x{} by ({}, {}, {}, {}) overflows the maximum dimension",
                    width, height, top, right, bottom, left
                ),
            ))
        }
    };
    PixelBuffer::check_allocation("pad", new_width, new_height, source.format())?;

    tracing::debug!(
        top,
        right,
        bottom,
        left,
        width = new_width,
        height = new_height,
        "Padding image"
    );

    let fill = color
        .map(|color| source.format().encode(color))
        .unwrap_or([0; 4]);
    let padded = map_pixels!(source, |image| {
        place_on_canvas(image, (new_width, new_height), (left, top), &fill)
    });
    PixelBuffer::from_data(padded)
}

fn place_on_canvas<P>(
    image: &ImageBuffer<P, Vec<u8>>,
    (width, height): (u32, u32),
    (left, top): (u32, u32),
    fill: &[u8; 4],
) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8>,
{
    let background = *P::from_slice(&fill[..P::CHANNEL_COUNT as usize]);
    let mut canvas = ImageBuffer::from_pixel(width, height, background);
    imageops::replace(&mut canvas, image, left as i64, top as i64);
    canvas
}

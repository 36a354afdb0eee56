use super::{require_finite, require_range};
use crate::kernel::{convolve, convolve_plane, Kernel};
use pixmill_core::color::clamp_channel;
use pixmill_core::{luma_bt601, PixelBuffer, ProcessingError, ProcessingResult};

/// Strength used when a sharpen is requested without one
pub const DEFAULT_SHARPEN_STRENGTH: f32 = 1.0;

/// Largest accepted blur radius
pub const MAX_BLUR_RADIUS: f32 = 128.0;

/// Gaussian blur.
///
/// `radius` must be positive. Pixels within the kernel radius of an edge are
/// copied from the source.
pub fn blur(source: &PixelBuffer, radius: f32) -> ProcessingResult<PixelBuffer> {
    require_finite(source, "blur", "radius", radius)?;
    if radius <= 0.0 {
        let (width, height) = source.dimensions();
        return Err(ProcessingError::invalid_argument(
            "blur",
            format!(
                "radius must be positive, got {} (image {}x{})",
                radius, width, height
            ),
        ));
    }
    if radius > MAX_BLUR_RADIUS {
        return Err(ProcessingError::unsupported(
            "blur",
            format!("radius {} exceeds the maximum of {}", radius, MAX_BLUR_RADIUS),
        ));
    }

    let kernel = Kernel::gaussian(radius)?;
    tracing::debug!(radius, kernel_size = kernel.size(), "Applying blur");
    convolve(source, &kernel)
}

/// Sharpen with a 3x3 kernel. A strength of 0 reproduces the source.
pub fn sharpen(source: &PixelBuffer, strength: f32) -> ProcessingResult<PixelBuffer> {
    require_range(source, "sharpen", "strength", strength, (0.0, f32::MAX))?;

    tracing::debug!(strength, "Applying sharpen");
    convolve(source, &Kernel::sharpen(strength))
}

/// Sobel edge magnitude of the source's luma.
///
/// The output is gray-valued RGB, or RGBA carrying the source alpha when the
/// source has one. Pixels on the outer ring have magnitude 0.
pub fn edge_detect(source: &PixelBuffer) -> ProcessingResult<PixelBuffer> {
    let (width, height) = source.dimensions();
    let format = source.format();
    let output_format = format.to_color();
    PixelBuffer::check_allocation("edge_detect", width, height, output_format)?;

    tracing::debug!(width, height, "Detecting edges");

    let channels = format.channels();
    let alpha = format.alpha_index();
    let luma: Vec<f32> = source
        .samples()
        .chunks_exact(channels)
        .map(|pixel| {
            if format.is_gray() {
                pixel[0] as f32
            } else {
                luma_bt601(pixel[0], pixel[1], pixel[2]) as f32
            }
        })
        .collect();

    let (w, h) = (width as usize, height as usize);
    let gx = convolve_plane(&luma, w, h, &Kernel::sobel_horizontal());
    let gy = convolve_plane(&luma, w, h, &Kernel::sobel_vertical());

    let mut samples = Vec::with_capacity(w * h * output_format.channels());
    for (i, pixel) in source.samples().chunks_exact(channels).enumerate() {
        let magnitude = clamp_channel((gx[i] * gx[i] + gy[i] * gy[i]).sqrt());
        samples.extend_from_slice(&[magnitude; 3]);
        if let Some(a) = alpha {
            samples.push(pixel[a]);
        }
    }

    PixelBuffer::from_samples(width, height, output_format, samples)
}

//! Convolution kernels
//!
//! Square, odd-sized weight matrices and the convolution passes the filters use.
//! Both passes leave pixels closer than `size / 2` to an edge untouched rather
//! than extending or wrapping the source.

use pixmill_core::color::clamp_channel;
use pixmill_core::{PixelBuffer, ProcessingError, ProcessingResult};

/// Square convolution kernel with an odd side length, weights in row-major order
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: usize,
    weights: Vec<f32>,
}

impl Kernel {
    /// Build a kernel from row-major weights.
    ///
    /// `size` must be odd and `weights` must hold exactly `size * size` finite values.
    pub fn new(size: usize, weights: Vec<f32>) -> ProcessingResult<Self> {
        if size == 0 || size % 2 == 0 {
            return Err(ProcessingError::invalid_argument(
                "kernel",
                format!("kernel size must be odd, got {}", size),
            ));
        }
        if weights.len() != size * size {
            return Err(ProcessingError::invalid_argument(
                "kernel",
                format!(
                    "expected {} weights for a {}x{} kernel, got {}",
                    size * size,
                    size,
                    size,
                    weights.len()
                ),
            ));
        }
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(ProcessingError::invalid_argument(
                "kernel",
                "kernel weights must be finite",
            ));
        }
        Ok(Kernel { size, weights })
    }

    /// Normalized 2D Gaussian for a blur of `radius` pixels.
    ///
    /// The side is `max(3, 2 * ceil(radius) + 1)` and sigma is `radius / 3`.
    pub fn gaussian(radius: f32) -> ProcessingResult<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ProcessingError::invalid_argument(
                "blur",
                format!("radius must be a positive number, got {}", radius),
            ));
        }

        let half = (radius.ceil() as usize).max(1);
        let size = 2 * half + 1;
        let sigma = radius / 3.0;
        let two_sigma_sq = 2.0 * sigma * sigma;

        // Radii small enough for sigma squared to underflow collapse to the identity
        if !two_sigma_sq.is_normal() {
            let mut weights = vec![0.0; size * size];
            weights[size * size / 2] = 1.0;
            tracing::trace!(radius, size, "Built identity kernel for a vanishing sigma");
            return Ok(Kernel { size, weights });
        }

        let mut weights = Vec::with_capacity(size * size);
        for y in 0..size {
            let dy = y as f32 - half as f32;
            for x in 0..size {
                let dx = x as f32 - half as f32;
                weights.push((-(dx * dx + dy * dy) / two_sigma_sq).exp());
            }
        }

        tracing::trace!(radius, size, sigma, "Built gaussian kernel");
        Ok(Kernel { size, weights }.normalized())
    }

    /// 3x3 sharpening kernel: center `1 + 4 * strength`, edge neighbors `-strength`
    pub fn sharpen(strength: f32) -> Self {
        let edge = -strength;
        let center = 1.0 + 4.0 * strength;
        tracing::trace!(strength, "Built sharpen kernel");
        Kernel {
            size: 3,
            weights: vec![0.0, edge, 0.0, edge, center, edge, 0.0, edge, 0.0],
        }
    }

    /// Sobel operator responding to horizontal intensity changes
    pub fn sobel_horizontal() -> Self {
        Kernel {
            size: 3,
            weights: vec![-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0],
        }
    }

    /// Sobel operator responding to vertical intensity changes
    pub fn sobel_vertical() -> Self {
        Kernel {
            size: 3,
            weights: vec![-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Distance from the center to an edge of the kernel
    pub fn radius(&self) -> usize {
        self.size / 2
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }

    /// Weight at offset (`dx`, `dy`) from the center
    pub fn weight(&self, dx: isize, dy: isize) -> Option<f32> {
        let r = self.radius() as isize;
        if dx.abs() > r || dy.abs() > r {
            return None;
        }
        let index = (dy + r) as usize * self.size + (dx + r) as usize;
        self.weights.get(index).copied()
    }

    /// Scale the weights to sum to 1. Kernels summing to 0 are returned unchanged.
    pub fn normalized(mut self) -> Self {
        let sum = self.sum();
        if sum != 0.0 {
            for w in &mut self.weights {
                *w /= sum;
            }
        }
        self
    }
}

/// Convolve every color channel of `source` with `kernel`.
///
/// Alpha is copied unchanged, as is every pixel within `kernel.radius()` of an edge.
/// Results are rounded and clamped into [0, 255].
pub fn convolve(source: &PixelBuffer, kernel: &Kernel) -> ProcessingResult<PixelBuffer> {
    let (width, height) = source.dimensions();
    let (width, height) = (width as usize, height as usize);
    let format = source.format();
    let channels = format.channels();
    let alpha = format.alpha_index();
    let r = kernel.radius();
    let input = source.samples();
    let mut output = input.to_vec();

    tracing::trace!(
        width,
        height,
        kernel_size = kernel.size(),
        "Convolving buffer"
    );

    if width <= 2 * r || height <= 2 * r {
        return source.with_samples(output);
    }

    let stride = width * channels;
    for y in r..height - r {
        for x in r..width - r {
            for c in (0..channels).filter(|&c| Some(c) != alpha) {
                let mut acc = 0.0f32;
                for ky in 0..kernel.size {
                    let row = (y + ky - r) * stride;
                    let weights = &kernel.weights[ky * kernel.size..(ky + 1) * kernel.size];
                    for (kx, w) in weights.iter().enumerate() {
                        acc += w * input[row + (x + kx - r) * channels + c] as f32;
                    }
                }
                output[y * stride + x * channels + c] = clamp_channel(acc);
            }
        }
    }

    source.with_samples(output)
}

/// Convolve a single-channel plane without clamping. Border values are 0.
pub(crate) fn convolve_plane(
    plane: &[f32],
    width: usize,
    height: usize,
    kernel: &Kernel,
) -> Vec<f32> {
    let r = kernel.radius();
    let mut output = vec![0.0f32; plane.len()];
    if width <= 2 * r || height <= 2 * r {
        return output;
    }

    for y in r..height - r {
        for x in r..width - r {
            let mut acc = 0.0f32;
            for ky in 0..kernel.size {
                let row = (y + ky - r) * width;
                for kx in 0..kernel.size {
                    acc += kernel.weights[ky * kernel.size + kx] * plane[row + x + kx - r];
                }
            }
            output[y * width + x] = acc;
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use pixmill_core::PixelFormat;

    #[test]
    fn test_gaussian_size_and_sum() {
        let kernel = Kernel::gaussian(1.0).unwrap();
        assert_eq!(kernel.size(), 3);
        assert!((kernel.sum() - 1.0).abs() < 1e-5);

        let kernel = Kernel::gaussian(2.5).unwrap();
        assert_eq!(kernel.size(), 7);
        assert!((kernel.sum() - 1.0).abs() < 1e-5);

        // Sub-pixel radii still get a 3x3 kernel
        assert_eq!(Kernel::gaussian(0.3).unwrap().size(), 3);
    }

    #[test]
    fn test_gaussian_peaks_at_center() {
        let kernel = Kernel::gaussian(3.0).unwrap();
        let center = kernel.weight(0, 0).unwrap();
        assert!(center > kernel.weight(1, 0).unwrap());
        assert_eq!(kernel.weight(1, 0), kernel.weight(0, 1));
        assert_eq!(kernel.weight(-2, 1), kernel.weight(2, -1));
        assert_eq!(kernel.weight(4, 0), None);
    }

    #[test]
    fn test_gaussian_tiny_radius_is_identity() {
        for radius in [1e-23, 1e-20, f32::MIN_POSITIVE] {
            let kernel = Kernel::gaussian(radius).unwrap();
            assert_eq!(kernel.size(), 3);
            assert!(kernel.weights().iter().all(|w| w.is_finite()));
            assert_eq!(kernel.weight(0, 0), Some(1.0));
            assert_eq!(kernel.sum(), 1.0);
        }
    }

    #[test]
    fn test_gaussian_rejects_bad_radius() {
        assert!(Kernel::gaussian(0.0).is_err());
        assert!(Kernel::gaussian(-1.0).is_err());
        assert!(Kernel::gaussian(f32::NAN).is_err());
    }

    #[test]
    fn test_sharpen_kernel_layout() {
        let kernel = Kernel::sharpen(0.5);
        assert_eq!(kernel.weight(0, 0), Some(3.0));
        assert_eq!(kernel.weight(1, 0), Some(-0.5));
        assert_eq!(kernel.weight(0, -1), Some(-0.5));
        assert_eq!(kernel.weight(1, 1), Some(0.0));
        // Sharpening never changes flat regions
        assert!((kernel.sum() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_new_validates_shape() {
        assert!(Kernel::new(2, vec![0.0; 4]).is_err());
        assert!(Kernel::new(3, vec![0.0; 8]).is_err());
        assert!(Kernel::new(3, vec![f32::INFINITY; 9]).is_err());
        assert!(Kernel::new(1, vec![1.0]).is_ok());
    }

    #[test]
    fn test_convolve_keeps_border_and_alpha() {
        let mut samples = vec![0u8; 5 * 5 * 4];
        for (i, pixel) in samples.chunks_exact_mut(4).enumerate() {
            let v = (i * 10) as u8;
            pixel.copy_from_slice(&[v, v, v, 77]);
        }
        let img = PixelBuffer::from_samples(5, 5, PixelFormat::Rgba8, samples).unwrap();
        let box_blur = Kernel::new(3, vec![1.0; 9]).unwrap().normalized();

        let out = convolve(&img, &box_blur).unwrap();
        assert_eq!(out.pixel(0, 0), img.pixel(0, 0));
        assert_eq!(out.pixel(4, 2), img.pixel(4, 2));
        // Interior of a linear ramp is unchanged by a box blur
        assert_eq!(out.pixel(2, 2), img.pixel(2, 2));
        assert!(out.samples().chunks_exact(4).all(|p| p[3] == 77));
    }

    #[test]
    fn test_convolve_small_image_is_copied() {
        let img = PixelBuffer::filled(2, 2, PixelFormat::Rgb8, Rgba([10, 20, 30, 255])).unwrap();
        let out = convolve(&img, &Kernel::sharpen(2.0)).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_convolve_plane_sobel() {
        // Vertical edge: left half 0, right half 100
        let plane: Vec<f32> = (0..16).map(|i| if i % 4 >= 2 { 100.0 } else { 0.0 }).collect();
        let gx = convolve_plane(&plane, 4, 4, &Kernel::sobel_horizontal());
        let gy = convolve_plane(&plane, 4, 4, &Kernel::sobel_vertical());
        assert_eq!(gx[4 + 1], 400.0);
        assert_eq!(gy[4 + 1], 0.0);
        assert_eq!(gx[0], 0.0);
    }
}

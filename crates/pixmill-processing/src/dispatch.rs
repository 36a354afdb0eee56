//! Typed dispatch over the four pixel layouts.

/// Run `$body` against the typed image inside a buffer and rewrap the result in
/// the same layout. `$image` is bound to `&ImageBuffer<P, Vec<u8>>` for the
/// buffer's pixel type `P`, and `$body` must evaluate to an `ImageBuffer` of the
/// same pixel type.
macro_rules! map_pixels {
    ($buffer:expr, |$image:ident| $body:expr) => {
        match $buffer.data() {
            ::pixmill_core::PixelData::Gray8($image) => ::pixmill_core::PixelData::Gray8($body),
            ::pixmill_core::PixelData::GrayAlpha8($image) => {
                ::pixmill_core::PixelData::GrayAlpha8($body)
            }
            ::pixmill_core::PixelData::Rgb8($image) => ::pixmill_core::PixelData::Rgb8($body),
            ::pixmill_core::PixelData::Rgba8($image) => ::pixmill_core::PixelData::Rgba8($body),
        }
    };
}

pub(crate) use map_pixels;

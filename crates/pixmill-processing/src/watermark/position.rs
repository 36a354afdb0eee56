use serde::{Deserialize, Serialize};

/// Anchor of a watermark on the 3x3 placement grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatermarkPosition {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    Center,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    #[default]
    BottomRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Start,
    Middle,
    End,
}

impl WatermarkPosition {
    pub const ALL: [WatermarkPosition; 9] = [
        WatermarkPosition::TopLeft,
        WatermarkPosition::TopCenter,
        WatermarkPosition::TopRight,
        WatermarkPosition::MiddleLeft,
        WatermarkPosition::Center,
        WatermarkPosition::MiddleRight,
        WatermarkPosition::BottomLeft,
        WatermarkPosition::BottomCenter,
        WatermarkPosition::BottomRight,
    ];

    fn alignment(self) -> (Align, Align) {
        use WatermarkPosition::*;
        match self {
            TopLeft => (Align::Start, Align::Start),
            TopCenter => (Align::Middle, Align::Start),
            TopRight => (Align::End, Align::Start),
            MiddleLeft => (Align::Start, Align::Middle),
            Center => (Align::Middle, Align::Middle),
            MiddleRight => (Align::End, Align::Middle),
            BottomLeft => (Align::Start, Align::End),
            BottomCenter => (Align::Middle, Align::End),
            BottomRight => (Align::End, Align::End),
        }
    }
}

/// Top-left corner for content of `content_width`x`content_height` anchored at
/// `position` inside an image.
///
/// `margin` pushes edge-aligned axes inward and is ignored on centered axes.
/// Content larger than the image yields negative coordinates; compositing clips.
pub fn calculate_position(
    image_width: u32,
    image_height: u32,
    content_width: u32,
    content_height: u32,
    position: WatermarkPosition,
    margin: u32,
) -> (i64, i64) {
    let place = |align: Align, image: u32, content: u32| -> i64 {
        let (image, content, margin) = (image as i64, content as i64, margin as i64);
        match align {
            Align::Start => margin,
            Align::Middle => (image - content) / 2,
            Align::End => image - content - margin,
        }
    };

    let (horizontal, vertical) = position.alignment();
    (
        place(horizontal, image_width, content_width),
        place(vertical, image_height, content_height),
    )
}

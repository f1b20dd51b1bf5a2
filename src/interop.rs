//! Contracts with collaborators outside the picker: screen sampling and
//! drag-and-drop payloads.

use floem::kurbo::Point;

use crate::color::SolidColor;

/// Tag carried by color drag payloads.
pub const COLOR_PAYLOAD_KIND: &str = "color";

/// Reads a color from an external pixel source (usually the screen).
pub trait PixelSampler {
    /// The color at `point`, or `None` if nothing could be read there.
    fn sample(&self, point: Point) -> Option<SolidColor>;
}

impl<F> PixelSampler for F
where
    F: Fn(Point) -> Option<SolidColor>,
{
    fn sample(&self, point: Point) -> Option<SolidColor> {
        self(point)
    }
}

/// Data moved between widgets by drag-and-drop.
#[derive(Debug, Clone, PartialEq)]
pub enum DragPayload {
    Color(SolidColor),
    /// Anything else, identified by its type tag.
    Other(String),
}

impl DragPayload {
    pub fn kind(&self) -> &str {
        match self {
            Self::Color(_) => COLOR_PAYLOAD_KIND,
            Self::Other(kind) => kind,
        }
    }

    pub fn color(&self) -> Option<SolidColor> {
        match self {
            Self::Color(color) => Some(*color),
            Self::Other(_) => None,
        }
    }
}

//! Paint helpers shared by the custom views.

use floem::context::PaintCx;
use floem::kurbo::{Circle, Point, Stroke};
#[cfg(feature = "alpha")]
use floem::kurbo::Rect;
use floem::peniko::Color;
use floem_renderer::Renderer;

use crate::color::SolidColor;
#[cfg(feature = "alpha")]
use crate::constants;

#[cfg(feature = "alpha")]
const LIGHT: Color = Color::rgb8(255, 255, 255);
#[cfg(feature = "alpha")]
const DARK: Color = Color::rgb8(204, 204, 204);

/// Track outline and the dark parts of rings.
pub(crate) const OUTLINE: Color = Color::rgba8(0, 0, 0, 40);
const SHADOW: Color = Color::rgba8(0, 0, 0, 80);

/// Display color for `color`, with HDR channels clipped.
pub(crate) fn to_color(color: SolidColor) -> Color {
    Color::rgba(
        color.r().clamp(0.0, 1.0),
        color.g().clamp(0.0, 1.0),
        color.b().clamp(0.0, 1.0),
        color.a().clamp(0.0, 1.0),
    )
}

/// Paint a checkerboard pattern into `rect`.
#[cfg(feature = "alpha")]
pub(crate) fn paint_checkerboard(cx: &mut PaintCx, rect: Rect) {
    let cell = constants::CHECKER_CELL;
    cx.fill(&rect, LIGHT, 0.0);
    let cols = (rect.width() / cell).ceil() as usize;
    let rows = (rect.height() / cell).ceil() as usize;
    for row in 0..rows {
        for col in 0..cols {
            if (row + col) % 2 == 1 {
                let x = rect.x0 + col as f64 * cell;
                let y = rect.y0 + row as f64 * cell;
                let cell_rect = Rect::new(x, y, (x + cell).min(rect.x1), (y + cell).min(rect.y1));
                cx.fill(&cell_rect, DARK, 0.0);
            }
        }
    }
}

/// White ring with dark hairlines inside and out, readable on any color.
/// `radius` is the outer edge.
pub(crate) fn paint_ring(cx: &mut PaintCx, center: Point, radius: f64) {
    cx.stroke(&Circle::new(center, radius), SHADOW, &Stroke::new(1.0));
    cx.stroke(&Circle::new(center, radius - 1.5), Color::WHITE, &Stroke::new(2.0));
    cx.stroke(&Circle::new(center, radius - 3.0), SHADOW, &Stroke::new(1.0));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hdr_colors_are_clipped_for_display() {
        let c = to_color(SolidColor::from_rgba(4.0, 0.5, -1.0, 1.0));
        assert_eq!(c, Color::rgba(1.0, 0.5, 0.0, 1.0));
    }
}

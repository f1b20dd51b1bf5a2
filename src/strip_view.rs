//! The 1D strip paired with the picking area (hue, value, or lightness,
//! depending on the shape).
//!
//! Rendered as a rasterized image rather than a linear gradient, avoiding
//! vger's broken gradient coordinate handling. Each widget has a fixed
//! orientation and hides itself while the active shape uses the other one.

use std::sync::Arc;

use floem::kurbo::{Point, Rect};
use floem::peniko::{self, Blob};
use floem::reactive::{create_effect, SignalWith};
use floem::views::Decorators;
use floem::{
    context::{ComputeLayoutCx, EventCx, PaintCx, UpdateCx},
    event::{Event, EventPropagation},
    View, ViewId,
};
use floem_renderer::Renderer;

use crate::color::HueCache;
use crate::constants;
use crate::handle::PickerHandle;
use crate::paint;
use crate::picker::PickTarget;
use crate::shape::{picker_shape, PickerShape, PickerShapeType, StripAxis};

/// Rasterize `len` strip colors, start to end, as RGBA8.
fn rasterize_strip(shape: &dyn PickerShape, cache: &HueCache, len: u32) -> Vec<u8> {
    let last = (len - 1).max(1) as f64;
    (0..len)
        .flat_map(|i| {
            let (r, g, b) = shape.strip_color(i as f64 / last, cache).to_rgb();
            [r, g, b, 255]
        })
        .collect()
}

/// Start, middle and end colors; the raster is rebuilt when these change.
fn strip_key(shape: &dyn PickerShape, cache: &HueCache) -> [u8; 9] {
    let mut key = [0u8; 9];
    for (i, t) in [0.0, 0.5, 1.0].into_iter().enumerate() {
        let (r, g, b) = shape.strip_color(t, cache).to_rgb();
        key[i * 3..i * 3 + 3].copy_from_slice(&[r, g, b]);
    }
    key
}

struct StripUpdate {
    shape: PickerShapeType,
    hue: HueCache,
}

pub(crate) struct PickStrip {
    id: ViewId,
    handle: PickerHandle,
    axis: StripAxis,
    held: bool,
    shape: PickerShapeType,
    hue: HueCache,
    size: floem::taffy::prelude::Size<f32>,
    strip_img: Option<peniko::Image>,
    strip_hash: Vec<u8>,
    cached_key: Option<(PickerShapeType, [u8; 9])>,
}

/// Creates a strip laid out along `axis`.
pub(crate) fn pick_strip(handle: PickerHandle, axis: StripAxis) -> PickStrip {
    let id = ViewId::new();
    let view = handle.view();

    create_effect(move |_| {
        let (shape, hue) = view.with(|v| (v.picker_shape, v.hue));
        id.update_state(StripUpdate { shape, hue });
    });

    let (shape, hue) = view.with_untracked(|v| (v.picker_shape, v.hue));
    PickStrip {
        id,
        handle,
        axis,
        held: false,
        shape,
        hue,
        size: Default::default(),
        strip_img: None,
        strip_hash: Vec::new(),
        cached_key: None,
    }
    .style(move |s| {
        let active = view.with(|v| picker_shape(v.picker_shape).strip_axis()) == axis;
        let s = match axis {
            StripAxis::Vertical => s.width(constants::STRIP_WIDTH).min_height(100.0),
            StripAxis::Horizontal => s.height(constants::SLIDER_HEIGHT).width_full(),
        };
        s.border_radius(constants::THUMB_RADIUS as f32)
            .cursor(floem::style::CursorStyle::Pointer)
            .apply_if(!active, |s| s.hide())
    })
}

impl PickStrip {
    fn shape(&self) -> &'static dyn PickerShape {
        picker_shape(self.shape)
    }

    fn is_active(&self) -> bool {
        self.shape().strip_axis() == self.axis
    }

    fn track_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.size.width as f64, self.size.height as f64)
    }

    /// The range the thumb center travels, inset so the thumb stays inside.
    fn thumb_region(&self) -> Rect {
        let r = constants::THUMB_RADIUS;
        let track = self.track_rect();
        match self.axis {
            StripAxis::Horizontal => Rect::new(r, 0.0, (track.x1 - r).max(r), track.y1),
            StripAxis::Vertical => Rect::new(0.0, r, track.x1, (track.y1 - r).max(r)),
        }
    }

    fn ensure_strip_image(&mut self) {
        let shape = self.shape();
        let key = (self.shape, strip_key(shape, &self.hue));
        if self.cached_key == Some(key) {
            return;
        }

        let len = constants::STRIP_RASTER_LEN;
        let pixels = rasterize_strip(shape, &self.hue, len);
        let (w, h) = match self.axis {
            StripAxis::Horizontal => (len, 1),
            StripAxis::Vertical => (1, len),
        };
        let blob = Blob::new(Arc::new(pixels));
        let img = peniko::Image::new(blob.clone(), peniko::Format::Rgba8, w, h);

        self.strip_hash = blob.id().to_le_bytes().to_vec();
        self.strip_img = Some(img);
        self.cached_key = Some(key);
    }
}

impl View for PickStrip {
    fn id(&self) -> ViewId {
        self.id
    }

    fn update(&mut self, _cx: &mut UpdateCx, state: Box<dyn std::any::Any>) {
        if let Ok(update) = state.downcast::<StripUpdate>() {
            self.shape = update.shape;
            self.hue = update.hue;
            self.id.request_layout();
        }
    }

    fn event_before_children(&mut self, cx: &mut EventCx, event: &Event) -> EventPropagation {
        if !self.is_active() {
            return EventPropagation::Continue;
        }
        match event {
            Event::PointerDown(e) => {
                cx.update_active(self.id());
                self.held = true;
                let region = self.thumb_region();
                self.handle
                    .update(|picker| picker.pointer_down(PickTarget::Strip, region, e.pos));
                EventPropagation::Stop
            }
            Event::PointerMove(e) => {
                if self.held {
                    self.handle.update(|picker| picker.pointer_move(e.pos));
                    EventPropagation::Stop
                } else {
                    EventPropagation::Continue
                }
            }
            Event::PointerUp(_) | Event::FocusLost => {
                if self.held {
                    self.held = false;
                    self.handle.update(|picker| picker.pointer_up());
                }
                EventPropagation::Continue
            }
            _ => EventPropagation::Continue,
        }
    }

    fn compute_layout(&mut self, _cx: &mut ComputeLayoutCx) -> Option<Rect> {
        let layout = self.id.get_layout().unwrap_or_default();
        self.size = layout.size;
        None
    }

    fn paint(&mut self, cx: &mut PaintCx) {
        if !self.is_active() || self.size.width == 0.0 || self.size.height == 0.0 {
            return;
        }
        let rect = self.track_rect();
        let rrect = rect.to_rounded_rect(constants::THUMB_RADIUS);

        cx.save();
        cx.clip(&rrect);
        self.ensure_strip_image();
        if let Some(ref img) = self.strip_img {
            cx.draw_img(
                floem_renderer::Img {
                    img: img.clone(),
                    hash: &self.strip_hash,
                },
                rect,
            );
        }
        cx.restore();

        cx.stroke(&rrect, paint::OUTLINE, &floem::kurbo::Stroke::new(1.0));

        let thumb = self.shape().strip_cursor(self.thumb_region(), &self.hue);
        let center = match self.axis {
            StripAxis::Horizontal => Point::new(thumb.x, rect.height() / 2.0),
            StripAxis::Vertical => Point::new(rect.width() / 2.0, thumb.y),
        };
        paint::paint_ring(cx, center, constants::THUMB_RADIUS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::SolidColor;

    #[test]
    fn hue_strip_starts_and_ends_red() {
        let shape = picker_shape(PickerShapeType::HsvRectangle);
        let buf = rasterize_strip(shape, &HueCache::default(), 16);
        assert_eq!(buf.len(), 16 * 4);
        assert_eq!(&buf[..4], &[255, 0, 0, 255]);
        assert_eq!(&buf[buf.len() - 4..], &[255, 0, 0, 255]);
    }

    #[test]
    fn value_strip_key_follows_hue() {
        let shape = picker_shape(PickerShapeType::VhsCircle);
        let red = HueCache::from_color(SolidColor::from_rgba(1.0, 0.0, 0.0, 1.0));
        let blue = HueCache::from_color(SolidColor::from_rgba(0.0, 0.0, 1.0, 1.0));
        assert_ne!(strip_key(shape, &red), strip_key(shape, &blue));
        // Bottom end is black for any hue.
        assert_eq!(strip_key(shape, &red)[6..], [0, 0, 0]);
    }
}

//! The 2D picking area.
//!
//! Whatever the active shape, the area is rasterized through the shape's own
//! `pick` mapping at a fixed resolution and scaled to the widget, so what is
//! drawn under the pointer is exactly what a click there selects. The raster
//! is rebuilt only when the shape or the (quantized) strip value changes.

use std::sync::Arc;

use floem::kurbo::{Circle, Point, Rect};
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
use crate::shape::{picker_shape, PickerShape, PickerShapeType, Region};

/// Feather width in raster pixels for anti-aliasing disk edges.
const FEATHER: f64 = 3.0;

/// Rasterize `shape` to a `size`×`size` RGBA8 buffer.
///
/// Polar shapes are inset by [`FEATHER`] so the edge fade fits inside the
/// buffer; the fade only affects alpha, edge pixels keep full saturation.
fn rasterize_area(shape: &dyn PickerShape, cache: &HueCache, size: u32) -> Vec<u8> {
    let full = Rect::new(0.0, 0.0, size as f64, size as f64);
    let polar = shape.is_polar();
    let region = if polar { full.inset(-FEATHER) } else { full };
    let center = region.center();
    let radius = Region::disk_radius(region);

    let mut buf = vec![0u8; (size * size * 4) as usize];
    for py in 0..size {
        for px in 0..size {
            let pos = Point::new(px as f64 + 0.5, py as f64 + 0.5);
            let alpha = if polar {
                let dist = pos.distance(center);
                if dist > radius + FEATHER {
                    continue;
                }
                ((radius + FEATHER - dist) / FEATHER).clamp(0.0, 1.0)
            } else {
                1.0
            };

            let mut picked = *cache;
            shape.pick(region, pos, &mut picked);
            let (r, g, b) = picked.color_in(shape.hue_space(), 1.0).to_rgb();
            let offset = ((py * size + px) * 4) as usize;
            buf[offset..offset + 4].copy_from_slice(&[r, g, b, (alpha * 255.0 + 0.5) as u8]);
        }
    }
    buf
}

struct AreaUpdate {
    shape: PickerShapeType,
    hue: HueCache,
}

pub(crate) struct PickArea {
    id: ViewId,
    handle: PickerHandle,
    held: bool,
    shape: PickerShapeType,
    hue: HueCache,
    size: floem::taffy::prelude::Size<f32>,
    area_img: Option<peniko::Image>,
    area_hash: Vec<u8>,
    cached_key: Option<(PickerShapeType, u16)>,
}

pub(crate) fn pick_area(handle: PickerHandle) -> PickArea {
    let id = ViewId::new();
    let view = handle.view();

    create_effect(move |_| {
        let (shape, hue) = view.with(|v| (v.picker_shape, v.hue));
        id.update_state(AreaUpdate { shape, hue });
    });

    let (shape, hue) = view.with_untracked(|v| (v.picker_shape, v.hue));
    PickArea {
        id,
        handle,
        held: false,
        shape,
        hue,
        size: Default::default(),
        area_img: None,
        area_hash: Vec::new(),
        cached_key: None,
    }
    .style(|s| {
        s.flex_grow(1.0)
            .aspect_ratio(1.0)
            .min_height(100.0)
            .cursor(floem::style::CursorStyle::Default)
    })
}

impl PickArea {
    fn shape(&self) -> &'static dyn PickerShape {
        picker_shape(self.shape)
    }

    /// The region handed to the shape: the whole widget for rectangles, the
    /// centered square for disks.
    fn area_rect(&self) -> Rect {
        let rect = Rect::new(0.0, 0.0, self.size.width as f64, self.size.height as f64);
        if !self.shape().is_polar() {
            return rect;
        }
        let side = 2.0 * Region::disk_radius(rect);
        Rect::from_center_size(rect.center(), (side, side))
    }

    fn ensure_area_image(&mut self) {
        let shape = self.shape();
        let key = (self.shape, (shape.strip_fraction(&self.hue) * 255.0).round() as u16);
        if self.cached_key == Some(key) {
            return;
        }

        let size = constants::AREA_RASTER_SIZE;
        let pixels = rasterize_area(shape, &self.hue, size);
        let blob = Blob::new(Arc::new(pixels));
        let img = peniko::Image::new(blob.clone(), peniko::Format::Rgba8, size, size);

        self.area_hash = blob.id().to_le_bytes().to_vec();
        self.area_img = Some(img);
        self.cached_key = Some(key);
    }

    fn release(&mut self) {
        if self.held {
            self.held = false;
            self.handle.update(|picker| picker.pointer_up());
        }
    }
}

impl View for PickArea {
    fn id(&self) -> ViewId {
        self.id
    }

    fn update(&mut self, _cx: &mut UpdateCx, state: Box<dyn std::any::Any>) {
        if let Ok(update) = state.downcast::<AreaUpdate>() {
            self.shape = update.shape;
            self.hue = update.hue;
            self.id.request_layout();
        }
    }

    fn event_before_children(&mut self, cx: &mut EventCx, event: &Event) -> EventPropagation {
        match event {
            Event::PointerDown(e) => {
                cx.update_active(self.id());
                self.held = true;
                let region = self.area_rect();
                self.handle
                    .update(|picker| picker.pointer_down(PickTarget::Area, region, e.pos));
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
                self.release();
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
        if self.size.width == 0.0 || self.size.height == 0.0 {
            return;
        }
        let area = self.area_rect();
        let polar = self.shape().is_polar();

        cx.save();
        if polar {
            cx.clip(&Circle::new(area.center(), area.width() / 2.0));
        } else {
            cx.clip(&area.to_rounded_rect(constants::RADIUS as f64));
        }
        self.ensure_area_image();
        if let Some(ref img) = self.area_img {
            cx.draw_img(
                floem_renderer::Img {
                    img: img.clone(),
                    hash: &self.area_hash,
                },
                area,
            );
        }
        cx.restore();

        if !polar {
            cx.stroke(
                &area.to_rounded_rect(constants::RADIUS as f64),
                paint::OUTLINE,
                &floem::kurbo::Stroke::new(1.0),
            );
        }

        let cursor = self.shape().cursor(area, &self.hue);
        paint::paint_ring(cx, cursor, constants::CURSOR_RADIUS + 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::SolidColor;

    fn pixel(buf: &[u8], size: u32, x: u32, y: u32) -> [u8; 4] {
        let o = ((y * size + x) * 4) as usize;
        [buf[o], buf[o + 1], buf[o + 2], buf[o + 3]]
    }

    #[test]
    fn rectangle_raster_spans_saturation_and_value() {
        let hue = HueCache::from_color(SolidColor::from_rgba(1.0, 0.0, 0.0, 1.0));
        let buf = rasterize_area(picker_shape(PickerShapeType::HsvRectangle), &hue, 32);
        // Top right is the pure hue, bottom left black, top left white.
        assert!(pixel(&buf, 32, 31, 0)[0] > 240);
        assert!(pixel(&buf, 32, 31, 0)[1] < 16);
        assert!(pixel(&buf, 32, 0, 31)[0] < 16);
        assert!(pixel(&buf, 32, 0, 0)[1] > 240);
        assert_eq!(pixel(&buf, 32, 0, 0)[3], 255);
    }

    #[test]
    fn disk_rasters_are_transparent_outside() {
        let hue = HueCache::default();
        for kind in [
            PickerShapeType::HsvWheel,
            PickerShapeType::VhsCircle,
            PickerShapeType::OkhslCircle,
        ] {
            let buf = rasterize_area(picker_shape(kind), &hue, 64);
            assert_eq!(pixel(&buf, 64, 0, 0)[3], 0, "{kind:?}");
            assert_eq!(pixel(&buf, 64, 32, 32)[3], 255, "{kind:?}");
        }
    }
}

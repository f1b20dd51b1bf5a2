//! Slider track for one mode slot: gradient of the colors it selects, over a
//! checkerboard for the alpha slot.

use floem::kurbo::{Point, Rect, Shape};
use floem::peniko::{Color, Gradient};
use floem::reactive::{create_effect, SignalWith};
use floem::views::Decorators;
use floem::{
    context::{ComputeLayoutCx, EventCx, PaintCx, UpdateCx},
    event::{Event, EventPropagation},
    View, ViewId,
};
use floem_renderer::Renderer;

#[cfg(feature = "alpha")]
use crate::mode::ALPHA_SLIDER;

use crate::constants;
use crate::handle::PickerHandle;
use crate::paint;
use crate::picker::SliderView;

const UNCOLORED: Color = Color::rgb8(200, 200, 200);

pub(crate) struct SliderTrack {
    id: ViewId,
    handle: PickerHandle,
    idx: usize,
    held: bool,
    slider: Option<SliderView>,
    size: floem::taffy::prelude::Size<f32>,
}

/// Creates the track for slider slot `idx`.
pub(crate) fn slider_track(handle: PickerHandle, idx: usize) -> SliderTrack {
    let id = ViewId::new();
    let view = handle.view();

    create_effect(move |_| {
        let slider = view.with(|v| v.sliders.get(idx).cloned());
        id.update_state(slider);
    });

    SliderTrack {
        id,
        handle,
        idx,
        held: false,
        slider: view.with_untracked(|v| v.sliders.get(idx).cloned()),
        size: Default::default(),
    }
    .style(|s| {
        s.height(constants::SLIDER_HEIGHT)
            .flex_grow(1.0)
            .border_radius(constants::THUMB_RADIUS as f32)
            .cursor(floem::style::CursorStyle::Pointer)
    })
}

impl SliderTrack {
    fn value_at(&self, x: f64) -> Option<f64> {
        let spec = self.slider.as_ref()?.spec;
        let w = self.size.width as f64;
        let r = constants::THUMB_RADIUS;
        let usable = w - 2.0 * r;
        if usable <= 0.0 {
            return None;
        }
        Some(spec.value_at((x - r) / usable))
    }

    fn drag_to(&mut self, x: f64) {
        let idx = self.idx;
        if let Some(value) = self.value_at(x) {
            self.handle.update(|picker| picker.drag_slider(idx, value));
        }
    }
}

impl View for SliderTrack {
    fn id(&self) -> ViewId {
        self.id
    }

    fn update(&mut self, _cx: &mut UpdateCx, state: Box<dyn std::any::Any>) {
        if let Ok(slider) = state.downcast::<Option<SliderView>>() {
            self.slider = *slider;
            self.id.request_layout();
        }
    }

    fn event_before_children(&mut self, cx: &mut EventCx, event: &Event) -> EventPropagation {
        match event {
            Event::PointerDown(e) => {
                cx.update_active(self.id());
                self.held = true;
                self.drag_to(e.pos.x);
                EventPropagation::Stop
            }
            Event::PointerMove(e) => {
                if self.held {
                    self.drag_to(e.pos.x);
                    EventPropagation::Stop
                } else {
                    EventPropagation::Continue
                }
            }
            Event::PointerUp(_) | Event::FocusLost => {
                if self.held {
                    self.held = false;
                    self.handle.update(|picker| picker.end_slider_drag());
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
        let Some(slider) = &self.slider else {
            return;
        };
        let w = self.size.width as f64;
        let h = self.size.height as f64;
        let rect = Rect::new(0.0, 0.0, w, h);
        let rrect = rect.to_rounded_rect(constants::THUMB_RADIUS);

        cx.save();
        cx.clip(&rrect);
        #[cfg(feature = "alpha")]
        if self.idx == ALPHA_SLIDER {
            paint::paint_checkerboard(cx, rect);
        }
        if slider.gradient.is_empty() {
            cx.fill(&rect, UNCOLORED, 0.0);
        } else {
            let stops: Vec<Color> = slider.gradient.iter().copied().map(paint::to_color).collect();
            let gradient =
                Gradient::new_linear((0.0, h / 2.0), (w, h / 2.0)).with_stops(stops.as_slice());
            // Convert to BezPath so the vello renderer uses the general path
            // handler (its Rect fast-path only supports solid colors).
            let path = rect.to_path(0.1);
            cx.fill(&path, &gradient, 0.0);
        }
        cx.restore();

        cx.stroke(&rrect, paint::OUTLINE, &floem::kurbo::Stroke::new(1.0));

        let radius = constants::THUMB_RADIUS;
        let thumb_x = radius + slider.spec.fraction(slider.value) * (w - 2.0 * radius);
        paint::paint_ring(cx, Point::new(thumb_x, h / 2.0), radius);
    }
}

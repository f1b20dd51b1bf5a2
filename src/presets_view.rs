//! Swatch grids for saved presets and recent colors.
//!
//! Primary click selects a swatch, secondary click removes it.

use floem::kurbo::{Point, Rect};
use floem::reactive::{create_effect, SignalWith};
use floem::views::Decorators;
use floem::{
    context::{ComputeLayoutCx, EventCx, PaintCx, UpdateCx},
    event::{Event, EventPropagation},
    View, ViewId,
};
use floem_renderer::Renderer;

use crate::color::SolidColor;
use crate::constants::{PRESET_COLUMN_COUNT, PRESET_GAP, PRESET_SIZE, RADIUS};
use crate::handle::PickerHandle;
use crate::paint;
use crate::picker::PickerView;

const PITCH: f64 = PRESET_SIZE + PRESET_GAP;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PresetList {
    Saved,
    Recent,
}

impl PresetList {
    fn entries(self, view: &PickerView) -> (Vec<SolidColor>, Option<usize>) {
        match self {
            Self::Saved => (view.presets.clone(), view.selected_preset),
            Self::Recent => (view.recent_presets.clone(), view.selected_recent),
        }
    }
}

/// Swatch under `pos`, if any. Gaps between swatches hit nothing.
fn swatch_at(pos: Point, count: usize) -> Option<usize> {
    if pos.x < 0.0 || pos.y < 0.0 {
        return None;
    }
    let col = (pos.x / PITCH) as usize;
    let row = (pos.y / PITCH) as usize;
    if col >= PRESET_COLUMN_COUNT || pos.x % PITCH > PRESET_SIZE || pos.y % PITCH > PRESET_SIZE {
        return None;
    }
    let idx = row * PRESET_COLUMN_COUNT + col;
    (idx < count).then_some(idx)
}

fn swatch_rect(idx: usize) -> Rect {
    let col = (idx % PRESET_COLUMN_COUNT) as f64;
    let row = (idx / PRESET_COLUMN_COUNT) as f64;
    Rect::new(
        col * PITCH,
        row * PITCH,
        col * PITCH + PRESET_SIZE,
        row * PITCH + PRESET_SIZE,
    )
}

fn grid_height(count: usize) -> f64 {
    let rows = count.div_ceil(PRESET_COLUMN_COUNT);
    if rows == 0 {
        0.0
    } else {
        rows as f64 * PITCH - PRESET_GAP
    }
}

struct GridUpdate {
    colors: Vec<SolidColor>,
    selected: Option<usize>,
}

pub(crate) struct PresetGrid {
    id: ViewId,
    handle: PickerHandle,
    list: PresetList,
    colors: Vec<SolidColor>,
    selected: Option<usize>,
}

pub(crate) fn preset_grid(handle: PickerHandle, list: PresetList) -> PresetGrid {
    let id = ViewId::new();
    let view = handle.view();

    create_effect(move |_| {
        let (colors, selected) = view.with(|v| list.entries(v));
        id.update_state(GridUpdate { colors, selected });
    });

    let (colors, selected) = view.with_untracked(|v| list.entries(v));
    PresetGrid {
        id,
        handle,
        list,
        colors,
        selected,
    }
    .style(move |s| {
        let count = view.with(|v| match list {
            PresetList::Saved => v.presets.len(),
            PresetList::Recent => v.recent_presets.len(),
        });
        s.width((PRESET_COLUMN_COUNT as f64 * PITCH - PRESET_GAP) as f32)
            .height(grid_height(count) as f32)
            .cursor(floem::style::CursorStyle::Pointer)
    })
}

impl PresetGrid {
    fn select(&self, idx: usize) {
        match self.list {
            PresetList::Saved => self.handle.update(|picker| picker.select_preset_at(idx)),
            PresetList::Recent => self
                .handle
                .update(|picker| picker.select_recent_preset_at(idx)),
        };
    }

    fn remove(&self, idx: usize) {
        let Some(color) = self.colors.get(idx).copied() else {
            return;
        };
        match self.list {
            PresetList::Saved => self.handle.update(|picker| picker.erase_preset(color)),
            PresetList::Recent => self
                .handle
                .update(|picker| picker.erase_recent_preset(color)),
        };
    }
}

impl View for PresetGrid {
    fn id(&self) -> ViewId {
        self.id
    }

    fn update(&mut self, _cx: &mut UpdateCx, state: Box<dyn std::any::Any>) {
        if let Ok(update) = state.downcast::<GridUpdate>() {
            self.colors = update.colors;
            self.selected = update.selected;
            self.id.request_layout();
        }
    }

    fn event_before_children(&mut self, _cx: &mut EventCx, event: &Event) -> EventPropagation {
        match event {
            Event::PointerDown(e) => {
                let Some(idx) = swatch_at(e.pos, self.colors.len()) else {
                    return EventPropagation::Continue;
                };
                if e.button.is_secondary() {
                    self.remove(idx);
                } else {
                    self.select(idx);
                }
                EventPropagation::Stop
            }
            _ => EventPropagation::Continue,
        }
    }

    fn compute_layout(&mut self, _cx: &mut ComputeLayoutCx) -> Option<Rect> {
        None
    }

    fn paint(&mut self, cx: &mut PaintCx) {
        for (idx, color) in self.colors.iter().enumerate() {
            let rect = swatch_rect(idx);
            let rrect = rect.to_rounded_rect(RADIUS as f64);
            cx.save();
            cx.clip(&rrect);
            #[cfg(feature = "alpha")]
            if color.a() < 1.0 {
                paint::paint_checkerboard(cx, rect);
            }
            cx.fill(&rect, paint::to_color(*color), 0.0);
            cx.restore();

            if self.selected == Some(idx) {
                cx.stroke(
                    &rect.inflate(1.5, 1.5).to_rounded_rect(RADIUS as f64 + 1.5),
                    floem::peniko::Color::rgb8(60, 60, 60),
                    &floem::kurbo::Stroke::new(2.0),
                );
            } else {
                cx.stroke(&rrect, paint::OUTLINE, &floem::kurbo::Stroke::new(1.0));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_testing_follows_the_grid() {
        assert_eq!(swatch_at(Point::new(1.0, 1.0), 3), Some(0));
        assert_eq!(swatch_at(Point::new(PITCH + 1.0, 1.0), 3), Some(1));
        // Gap between the first two swatches.
        assert_eq!(swatch_at(Point::new(PRESET_SIZE + 1.0, 1.0), 3), None);
        // Second row.
        assert_eq!(
            swatch_at(Point::new(1.0, PITCH + 1.0), PRESET_COLUMN_COUNT + 1),
            Some(PRESET_COLUMN_COUNT)
        );
        // Past the last swatch.
        assert_eq!(swatch_at(Point::new(PITCH * 3.0 + 1.0, 1.0), 3), None);
        assert_eq!(swatch_at(Point::new(-1.0, 1.0), 3), None);
    }

    #[test]
    fn rects_and_hits_agree() {
        for idx in 0..(PRESET_COLUMN_COUNT * 2) {
            let center = swatch_rect(idx).center();
            assert_eq!(swatch_at(center, PRESET_COLUMN_COUNT * 2), Some(idx));
        }
    }

    #[test]
    fn height_grows_by_rows() {
        assert_eq!(grid_height(0), 0.0);
        assert_eq!(grid_height(1), PRESET_SIZE);
        assert_eq!(grid_height(PRESET_COLUMN_COUNT + 1), PITCH + PRESET_SIZE);
    }
}

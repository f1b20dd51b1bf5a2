//! The assembled picker widget: picking area with its strip, swatch and
//! selectors, slider rows, text field, and preset grids.

use floem::prelude::*;
use floem::reactive::SignalWith;

use crate::area_view::pick_area;
use crate::constants;
#[cfg(all(feature = "eyedropper", target_os = "macos"))]
use crate::eyedropper::eyedropper_button;
use crate::handle::PickerHandle;
use crate::inputs::{color_text_input, copy_button, format_toggle, number_input};
use crate::mode::SLIDER_COUNT;
use crate::paint::to_color;
use crate::presets_view::{preset_grid, PresetList};
use crate::shape::StripAxis;
use crate::slider_track::slider_track;
use crate::strip_view::pick_strip;

const MUTED: Color = Color::rgb8(120, 120, 120);

/// A clickable text chip, used for the mode and shape selectors.
fn chip(text: impl Fn() -> &'static str + 'static, on_click: impl Fn() + 'static) -> impl IntoView {
    label(text)
        .style(|s| {
            s.font_size(constants::LABEL_FONT)
                .padding_horiz(6.0)
                .padding_vert(2.0)
                .border(1.0)
                .border_color(Color::rgb8(200, 200, 200))
                .border_radius(3.0)
                .color(MUTED)
                .background(Color::WHITE)
                .cursor(floem::style::CursorStyle::Pointer)
                .hover(|s| s.background(Color::rgb8(230, 230, 230)))
        })
        .on_click_stop(move |_| on_click())
}

/// Current color, with the old color beside it when displayed. Clicking
/// the old half reverts to it.
fn sample_swatch(handle: PickerHandle) -> impl IntoView {
    let view = handle.view();
    h_stack((
        empty()
            .style(move |s| {
                let old = view.with(|v| v.old_color);
                match old {
                    Some(c) => s
                        .width(16.0)
                        .height(32.0)
                        .background(to_color(c))
                        .cursor(floem::style::CursorStyle::Pointer),
                    None => s.hide(),
                }
            })
            .on_click_stop(move |_| {
                handle.update(|picker| picker.revert_to_old_color());
            }),
        empty().style(move |s| {
            let c = view.with(|v| v.color);
            s.width(32.0).height(32.0).background(to_color(c))
        }),
    ))
    .style(|s| {
        s.border_radius(constants::RADIUS)
            .border(1.0)
            .border_color(Color::rgb8(180, 180, 180))
    })
}

/// Label, track and numeric field for slider slot `idx`. Hidden when the
/// mode shows fewer sliders.
fn slider_row(handle: PickerHandle, idx: usize) -> impl IntoView {
    let view = handle.view();
    h_stack((
        label(move || view.with(|v| v.sliders.get(idx).map_or("", |s| s.spec.label))).style(|s| {
            s.width(12.0)
                .font_size(constants::LABEL_FONT)
                .color(MUTED)
        }),
        slider_track(handle.clone(), idx),
        number_input(handle, idx),
    ))
    .style(move |s| {
        let shown = view.with(|v| idx < v.sliders.len());
        s.items_center()
            .gap(constants::GAP / 2.0)
            .apply_if(!shown, |s| s.hide())
    })
}

fn presets_section(handle: PickerHandle) -> impl IntoView {
    let view = handle.view();
    let toggle = handle.clone();
    let add = handle.clone();
    v_stack((
        h_stack((
            label(move || {
                if view.with(|v| v.presets_visible) {
                    "Swatches"
                } else {
                    "Swatches (hidden)"
                }
            })
            .style(|s| {
                s.font_size(constants::LABEL_FONT)
                    .color(MUTED)
                    .cursor(floem::style::CursorStyle::Pointer)
            })
            .on_click_stop(move |_| {
                toggle.update(|picker| {
                    let visible = picker.are_presets_visible();
                    picker.set_presets_visible(!visible);
                });
            }),
            empty().style(|s| s.flex_grow(1.0)),
            label(|| lucide_icons::Icon::Plus.unicode().to_string())
                .style(|s| {
                    s.font_size(14.0)
                        .font_family("lucide".to_string())
                        .color(MUTED)
                        .border_radius(3.0)
                        .cursor(floem::style::CursorStyle::Pointer)
                        .hover(|s| s.background(Color::rgb8(230, 230, 230)))
                })
                .on_click_stop(move |_| {
                    add.update(|picker| picker.add_current_as_preset());
                }),
        ))
        .style(|s| s.items_center()),
        v_stack((
            preset_grid(handle.clone(), PresetList::Saved),
            label(|| "Recent").style(|s| s.font_size(constants::LABEL_FONT).color(MUTED)),
            preset_grid(handle, PresetList::Recent),
        ))
        .style(move |s| {
            let visible = view.with(|v| v.presets_visible);
            s.gap(constants::GAP / 2.0).apply_if(!visible, |s| s.hide())
        }),
    ))
    .style(move |s| {
        let enabled = view.with(|v| v.presets_enabled);
        s.gap(constants::GAP / 2.0).apply_if(!enabled, |s| s.hide())
    })
}

/// Builds the full picker around `handle`.
pub(crate) fn picker_view(handle: PickerHandle) -> impl IntoView {
    let view = handle.view();
    let mode_handle = handle.clone();
    let shape_handle = handle.clone();
    let sliders: Vec<_> = (0..SLIDER_COUNT)
        .map(|idx| slider_row(handle.clone(), idx))
        .collect();

    v_stack((
        // Picking area with its vertical strip; the horizontal strip sits below.
        h_stack((
            pick_area(handle.clone()),
            pick_strip(handle.clone(), StripAxis::Vertical),
        ))
        .style(|s| s.gap(constants::GAP).margin_top(12.0)),
        pick_strip(handle.clone(), StripAxis::Horizontal),
        // Eyedropper, selectors and swatch
        h_stack((
            #[cfg(all(feature = "eyedropper", target_os = "macos"))]
            eyedropper_button(handle.clone()),
            chip(
                move || view.with(|v| v.color_mode.name()),
                move || {
                    mode_handle.update(|picker| {
                        let next = picker.color_mode().next();
                        picker.set_color_mode(next);
                    });
                },
            ),
            chip(
                move || view.with(|v| v.picker_shape.name()),
                move || {
                    shape_handle.update(|picker| {
                        let next = picker.picker_shape().next();
                        picker.set_picker_shape(next);
                    });
                },
            ),
            empty().style(|s| s.flex_grow(1.0)),
            sample_swatch(handle.clone()),
        ))
        .style(|s| s.items_center().gap(constants::GAP / 2.0)),
        v_stack_from_iter(sliders).style(|s| s.gap(constants::GAP / 2.0)),
        // Text field row
        h_stack((
            format_toggle(handle.clone()),
            color_text_input(handle.clone()),
            copy_button(move || view.with(|v| v.text.clone())),
        ))
        .style(|s| s.gap(constants::GAP / 2.0).items_center().justify_center()),
        presets_section(handle),
    ))
    .style(|s| {
        s.gap(constants::GAP)
            .padding_horiz(constants::PADDING)
            .padding_bottom(constants::PADDING)
            .padding_top(2.0)
            .size_full()
            .background(Color::rgb8(242, 242, 242))
    })
}

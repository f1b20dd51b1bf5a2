//! Text inputs: per-slider numeric fields, the color text field, and the
//! copy button.

use floem::event::{Event, EventListener, EventPropagation};
use floem::keyboard::{Key, NamedKey};
use floem::prelude::*;
use floem::reactive::{create_effect, RwSignal, SignalGet, SignalUpdate, SignalWith};

use crate::constants;
use crate::handle::PickerHandle;
use crate::mode::TextFormat;

const ERROR_BORDER: Color = Color::rgb8(220, 60, 60);

fn is_enter(event: &Event) -> bool {
    match event {
        Event::KeyDown(ke) => ke.key.logical_key == Key::Named(NamedKey::Enter),
        _ => false,
    }
}

/// Whole numbers for integer-stepped sliders, three decimals otherwise.
fn format_value(value: f64, step: f64) -> String {
    if step >= 1.0 {
        format!("{}", value.round() as i64)
    } else {
        format!("{:.3}", value)
    }
}

/// The numeric field for slider slot `idx`, labeled by the active mode.
pub(crate) fn number_input(handle: PickerHandle, idx: usize) -> impl IntoView {
    let view = handle.view();
    let displayed = move || {
        view.with_untracked(|v| {
            v.sliders
                .get(idx)
                .map(|s| format_value(s.value, s.spec.step))
        })
    };
    let text = RwSignal::new(displayed().unwrap_or_default());

    // Controller -> text
    create_effect(move |_| {
        let current = view.with(|v| {
            v.sliders
                .get(idx)
                .map(|s| format_value(s.value, s.spec.step))
        });
        if let Some(current) = current {
            if text.get_untracked() != current {
                text.set(current);
            }
        }
    });

    let on_commit = move || {
        let raw = text.get_untracked();
        if let Ok(num) = raw.trim().parse::<f64>() {
            handle.update(|picker| {
                picker.set_slider_value(idx, num);
                picker.commit_slider_edit();
            });
        }
        // Show the clamped/snapped value, or restore it after bad input.
        if let Some(formatted) = displayed() {
            if raw != formatted {
                text.set(formatted);
            }
        }
    };
    let on_commit_clone = on_commit.clone();

    v_stack((
        text_input(text)
            .style(|s| {
                s.width(constants::INPUT_WIDTH)
                    .padding(2.0)
                    .font_size(constants::INPUT_FONT)
                    .font_family("monospace".to_string())
                    .background(Color::WHITE)
                    .border(1.0)
                    .border_color(Color::rgb8(200, 200, 200))
                    .border_radius(3.0)
            })
            .on_event_stop(EventListener::FocusLost, move |_| {
                on_commit();
            })
            .on_event(EventListener::KeyDown, move |e| {
                if is_enter(e) {
                    on_commit_clone();
                    return EventPropagation::Stop;
                }
                EventPropagation::Continue
            }),
        label(move || view.with(|v| v.sliders.get(idx).map_or("", |s| s.spec.label))).style(|s| {
            s.font_size(constants::LABEL_FONT)
                .color(Color::rgb8(120, 120, 120))
                .justify_content(Some(floem::taffy::AlignContent::Center))
        }),
    ))
    .style(|s| s.items_center().gap(1.0))
}

/// The hex / tuple text field.
///
/// Keystrokes are handed to the controller as a draft; the color only
/// changes on Enter or when the field loses focus. Rejected text gets a red
/// border until it is edited again.
pub(crate) fn color_text_input(handle: PickerHandle) -> impl IntoView {
    let view = handle.view();
    let text = RwSignal::new(view.with_untracked(|v| v.text.clone()));

    // Controller -> text. The controller leaves the text alone while focused.
    create_effect(move |_| {
        let current = view.with(|v| v.text.clone());
        if text.get_untracked() != current {
            text.set(current);
        }
    });

    // Text -> controller draft
    let draft_handle = handle.clone();
    create_effect(move |_| {
        let raw = text.get();
        if view.with_untracked(|v| v.text != raw) {
            draft_handle.update(|picker| picker.edit_text(&raw));
        }
    });

    let focus_handle = handle.clone();
    let blur_handle = handle.clone();

    h_stack((
        label(move || {
            if view.with(|v| v.text_format == TextFormat::Hex) {
                "#"
            } else {
                ""
            }
        })
        .style(|s| {
            s.font_size(constants::INPUT_FONT)
                .font_family("monospace".to_string())
                .color(Color::rgb8(120, 120, 120))
        }),
        text_input(text)
            .style(move |s| {
                let invalid = view.with(|v| v.text_error.is_some());
                s.width(constants::TEXT_INPUT_WIDTH)
                    .padding(2.0)
                    .font_size(constants::INPUT_FONT)
                    .font_family("monospace".to_string())
                    .background(Color::WHITE)
                    .border(1.0)
                    .border_color(if invalid {
                        ERROR_BORDER
                    } else {
                        Color::rgb8(200, 200, 200)
                    })
                    .border_radius(3.0)
            })
            .on_event_stop(EventListener::FocusGained, move |_| {
                focus_handle.update(|picker| picker.set_text_focus(true));
            })
            .on_event_stop(EventListener::FocusLost, move |_| {
                blur_handle.update(|picker| picker.set_text_focus(false));
            })
            .on_event_stop(EventListener::KeyDown, move |e| {
                if is_enter(e) {
                    // A rejected entry shows up as the error border.
                    let _ = handle.update(|picker| picker.submit_text());
                }
            }),
    ))
    .style(|s| s.items_center().gap(1.0))
}

/// Label that flips the text field between hex and tuple form.
pub(crate) fn format_toggle(handle: PickerHandle) -> impl IntoView {
    let view = handle.view();
    label(move || match view.with(|v| v.text_format) {
        TextFormat::Hex => "Hex",
        TextFormat::Tuple => "RGB",
    })
    .style(|s| {
        s.font_size(constants::LABEL_FONT)
            .padding_horiz(4.0)
            .border_radius(3.0)
            .color(Color::rgb8(120, 120, 120))
            .cursor(floem::style::CursorStyle::Pointer)
            .hover(|s| s.background(Color::rgb8(230, 230, 230)))
    })
    .on_click_stop(move |_| {
        handle.update(|picker| picker.toggle_text_format());
    })
}

/// A small copy button that copies the result of `get_text` to the clipboard.
pub(crate) fn copy_button(get_text: impl Fn() -> String + 'static) -> impl IntoView {
    let pressed = RwSignal::new(false);
    container(
        label(|| lucide_icons::Icon::Copy.unicode().to_string()).style(move |s| {
            let c = if pressed.get() {
                Color::rgb8(80, 80, 80)
            } else {
                Color::rgb8(120, 120, 120)
            };
            s.font_size(14.0).font_family("lucide".to_string()).color(c)
        }),
    )
    .style(|s| {
        s.size(20.0, 20.0)
            .items_center()
            .justify_center()
            .border_radius(3.0)
            .cursor(floem::style::CursorStyle::Pointer)
            .align_self(Some(floem::taffy::AlignItems::Start))
            .hover(|s| s.background(Color::rgb8(230, 230, 230)))
    })
    .on_event_stop(EventListener::PointerDown, move |_| {
        pressed.set(true);
    })
    .on_event_stop(EventListener::PointerUp, move |_| {
        pressed.set(false);
        copy_to_clipboard(&get_text());
    })
}

fn copy_to_clipboard(text: &str) {
    match arboard::Clipboard::new() {
        Ok(mut clipboard) => {
            if let Err(err) = clipboard.set_text(text) {
                log::warn!("clipboard write failed: {err}");
            }
        }
        Err(err) => log::warn!("clipboard unavailable: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slider_values_are_formatted_by_step() {
        assert_eq!(format_value(127.6, 1.0), "128");
        assert_eq!(format_value(0.25, 0.001), "0.250");
        assert_eq!(format_value(42.0, 1.0), "42");
    }
}

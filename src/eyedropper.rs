//! macOS native eyedropper (screen color sampler) integration.
//!
//! Uses `NSColorSampler` via Objective-C FFI to invoke the system-wide
//! screen color picker. The sampler runs asynchronously: macOS shows a
//! magnifying-glass overlay, the user clicks a pixel, and the callback
//! fires with the sampled color. Cancelling (Esc) fires nothing.

use std::cell::Cell;

use block2::RcBlock;
use objc2::rc::{Allocated, Id};
use objc2::runtime::{AnyClass, AnyObject};
use objc2::{msg_send, msg_send_id};

use floem::prelude::*;
use floem::reactive::{RwSignal, SignalGet, SignalUpdate};
use log::debug;

use crate::color::SolidColor;
use crate::handle::PickerHandle;

/// Read an `NSColor` as sRGB components.
///
/// # Safety
///
/// `color` must point to a live `NSColor`.
unsafe fn srgb_components(color: &AnyObject) -> Option<SolidColor> {
    let space_cls = AnyClass::get("NSColorSpace")?;
    let srgb: *const AnyObject = msg_send![space_cls, sRGBColorSpace];
    let srgb = srgb.as_ref()?;
    let converted: *const AnyObject = msg_send![color, colorUsingColorSpace: srgb];
    let converted = converted.as_ref()?;

    let (mut r, mut g, mut b, mut a) = (0.0_f64, 0.0_f64, 0.0_f64, 0.0_f64);
    let _: () = msg_send![
        converted,
        getRed: &mut r,
        green: &mut g,
        blue: &mut b,
        alpha: &mut a
    ];
    Some(SolidColor::from_rgba(r, g, b, a))
}

/// Show the system screen sampler; `on_pick` receives the sampled color.
///
/// Must be called from the main thread (Floem event handlers satisfy this).
pub(crate) fn sample_color(on_pick: impl FnOnce(SolidColor) + 'static) {
    let Some(cls) = AnyClass::get("NSColorSampler") else {
        log::warn!("NSColorSampler unavailable");
        return;
    };

    let sampler: Allocated<AnyObject> = unsafe { msg_send_id![cls, alloc] };
    let sampler: Id<AnyObject> = unsafe { msg_send_id![sampler, init] };

    // The handler is a reusable block; the pick callback runs at most once.
    let pending: Cell<Option<Box<dyn FnOnce(SolidColor)>>> = Cell::new(Some(Box::new(on_pick)));
    let handler = RcBlock::new(move |picked: *mut AnyObject| {
        // Null when the user cancelled.
        let Some(picked) = (unsafe { picked.as_ref() }) else {
            return;
        };
        let Some(color) = (unsafe { srgb_components(picked) }) else {
            return;
        };
        if let Some(on_pick) = pending.take() {
            on_pick(color);
        }
    });

    unsafe {
        let _: () = msg_send![&*sampler, showSamplerWithSelectionHandler: &*handler];
    }
}

/// A small button that invokes the macOS screen color sampler.
///
/// On click, opens the system eyedropper and hands the sampled color to the
/// picker. Styled to match `copy_button`.
pub(crate) fn eyedropper_button(handle: PickerHandle) -> impl IntoView {
    let pressed = RwSignal::new(false);
    label(|| lucide_icons::Icon::Pipette.unicode().to_string())
        .style(move |s| {
            let c = if pressed.get() {
                Color::rgb8(80, 80, 80)
            } else {
                Color::rgb8(120, 120, 120)
            };
            s.font_size(18.0)
                .font_family("lucide".to_string())
                .cursor(floem::style::CursorStyle::Pointer)
                .border_radius(3.0)
                .padding(2.0)
                .color(c)
                .hover(|s| s.background(Color::rgb8(230, 230, 230)))
        })
        .on_event_stop(floem::event::EventListener::PointerDown, move |_| {
            pressed.set(true);
        })
        .on_event_stop(floem::event::EventListener::PointerUp, move |_| {
            pressed.set(false);
            let handle = handle.clone();
            sample_color(move |picked| {
                debug!("screen sample {}", picked.to_hex(true));
                handle.update(|picker| picker.apply_sampled_color(picked));
            });
        })
}

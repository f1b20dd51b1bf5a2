//! Bridge between the headless [`ColorPicker`] and Floem's reactive views.

use std::cell::RefCell;
use std::rc::Rc;

use floem::reactive::{create_effect, RwSignal, Scope, SignalGet, SignalUpdate};
use log::{trace, warn};

use crate::color::SolidColor;
use crate::picker::{ColorPicker, PickerEvent, PickerView};

thread_local! {
    /// Bumped whenever a picker changes its preset store. Every handle
    /// listens, so pickers sharing a store resync without user input.
    static PRESETS_CHANGED: RwSignal<u64> = Scope::new().create_rw_signal(0);
}

fn presets_changed() -> RwSignal<u64> {
    PRESETS_CHANGED.with(|signal| *signal)
}

/// Shared access to one picker from every view that makes up its widget.
///
/// Controller calls go through [`PickerHandle::update`], which republishes
/// the picker's [`PickerView`] and forwards color changes to the bound
/// color signal once the controller borrow is released.
#[derive(Clone)]
pub(crate) struct PickerHandle {
    picker: Rc<RefCell<ColorPicker>>,
    events: Rc<RefCell<Vec<PickerEvent>>>,
    view: RwSignal<PickerView>,
    color: RwSignal<SolidColor>,
}

impl PickerHandle {
    pub(crate) fn new(mut picker: ColorPicker, color: RwSignal<SolidColor>) -> Self {
        picker.set_pick_color(color.get_untracked());

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        picker.connect(move |event| sink.borrow_mut().push(event.clone()));

        let handle = Self {
            view: RwSignal::new(picker.view().clone()),
            picker: Rc::new(RefCell::new(picker)),
            events,
            color,
        };

        // External writes to the color signal.
        let this = handle.clone();
        create_effect(move |_| {
            let c = color.get();
            this.update(|picker| {
                if picker.color() != c {
                    picker.set_pick_color(c);
                }
            });
        });

        // Preset edits made through other handles.
        let this = handle.clone();
        create_effect(move |_| {
            presets_changed().get();
            this.update(|_| ());
        });

        handle
    }

    /// The latest view snapshot.
    pub(crate) fn view(&self) -> RwSignal<PickerView> {
        self.view
    }

    /// Run a controller entry point. Returns `None` if the picker is already
    /// borrowed further up the stack.
    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut ColorPicker) -> R) -> Option<R> {
        let (result, snapshot, presets_touched) = {
            let Ok(mut picker) = self.picker.try_borrow_mut() else {
                warn!("picker busy, dropping reentrant update");
                return None;
            };
            picker.sync_presets();
            let revision = picker.preset_store().revision();
            let result = f(&mut picker);
            let presets_touched = picker.preset_store().revision() != revision;
            (result, picker.view().clone(), presets_touched)
        };

        if self.view.get_untracked() != snapshot {
            self.view.set(snapshot);
        }
        let events = std::mem::take(&mut *self.events.borrow_mut());
        for event in events {
            if let PickerEvent::ColorChanged(c) = event {
                if self.color.get_untracked() != c {
                    self.color.set(c);
                }
            }
        }
        if presets_touched {
            trace!("preset store changed, notifying pickers");
            presets_changed().update(|n| *n += 1);
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PickerConfig;
    use crate::presets::PresetStore;

    fn handle(store: &PresetStore, color: SolidColor) -> (PickerHandle, RwSignal<SolidColor>) {
        let signal = RwSignal::new(color);
        let picker = ColorPicker::new(PickerConfig::default(), store.clone());
        (PickerHandle::new(picker, signal), signal)
    }

    #[test]
    fn preset_added_in_one_picker_shows_in_the_other() {
        let store = PresetStore::new();
        let red = SolidColor::from_rgb(200, 20, 20);
        let (a, _) = handle(&store, red);
        let (b, _) = handle(&store, SolidColor::WHITE);

        a.update(|picker| picker.add_current_as_preset());
        assert_eq!(b.view().get_untracked().presets, vec![red]);

        a.update(|picker| picker.erase_preset(red));
        assert!(b.view().get_untracked().presets.is_empty());
    }

    #[test]
    fn edits_reach_the_bound_signal_and_back() {
        let store = PresetStore::new();
        let (h, color) = handle(&store, SolidColor::WHITE);

        h.update(|picker| picker.set_slider_value(0, 0.0));
        assert_eq!(color.get_untracked(), SolidColor::from_rgb(0, 255, 255));

        color.set(SolidColor::BLACK);
        assert_eq!(h.view().get_untracked().color, SolidColor::BLACK);
    }
}

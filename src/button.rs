//! A swatch button that owns a popup picker, created on first press.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::color::SolidColor;
use crate::config::PickerConfig;
use crate::picker::{ColorPicker, PickerEvent};
use crate::presets::PresetStore;

#[derive(Debug, Clone, PartialEq)]
pub enum ButtonEvent {
    /// The button's color changed through its picker.
    ColorChanged(SolidColor),
    /// Fired before the popup shows, with the color it opens on.
    PopupAboutToOpen(SolidColor),
    /// Fired after the popup is dismissed, with the final color.
    PopupClosed(SolidColor),
}

type Listener = Box<dyn FnMut(&ButtonEvent)>;

pub struct PickerButton {
    color: SolidColor,
    config: PickerConfig,
    presets: PresetStore,
    picker: Option<ColorPicker>,
    picker_events: Rc<RefCell<Vec<PickerEvent>>>,
    popup_open: bool,
    listeners: Vec<Listener>,
}

impl PickerButton {
    pub fn new(color: SolidColor, config: PickerConfig, presets: PresetStore) -> Self {
        Self {
            color,
            config,
            presets,
            picker: None,
            picker_events: Rc::new(RefCell::new(Vec::new())),
            popup_open: false,
            listeners: Vec::new(),
        }
    }

    pub fn connect(&mut self, listener: impl FnMut(&ButtonEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn color(&self) -> SolidColor {
        self.color
    }

    /// Set the swatch color, forwarding it to the picker if one exists.
    pub fn set_pick_color(&mut self, color: SolidColor) {
        self.color = color;
        if self.picker.is_some() {
            self.with_picker(|picker| picker.set_pick_color(color));
        }
    }

    pub fn is_editing_alpha(&self) -> bool {
        self.config.edit_alpha
    }

    pub fn set_edit_alpha(&mut self, edit_alpha: bool) {
        self.config.edit_alpha = edit_alpha;
        if let Some(picker) = &mut self.picker {
            picker.set_edit_alpha(edit_alpha);
        }
    }

    pub fn is_popup_open(&self) -> bool {
        self.popup_open
    }

    /// The popup picker, if the button was pressed at least once.
    pub fn picker(&self) -> Option<&ColorPicker> {
        self.picker.as_ref()
    }

    /// Run `f` against the picker (creating it if needed), then relay the
    /// color changes it produced.
    pub fn with_picker<R>(&mut self, f: impl FnOnce(&mut ColorPicker) -> R) -> R {
        let result = f(self.ensure_picker());
        self.relay_events();
        result
    }

    /// Open the popup.
    pub fn press(&mut self) {
        if self.popup_open {
            return;
        }
        let color = self.color;
        self.ensure_picker().set_old_color(color);
        self.popup_open = true;
        debug!("picker popup opening on {}", color.to_hex(true));
        self.emit(ButtonEvent::PopupAboutToOpen(color));
    }

    /// Dismiss the popup. A cancelled popup puts the old color back.
    pub fn close(&mut self, cancelled: bool) {
        if !self.popup_open {
            return;
        }
        self.popup_open = false;
        if cancelled {
            self.with_picker(ColorPicker::revert_to_old_color);
        }
        let color = self.color;
        if self.config.presets_enabled {
            self.with_picker(|picker| picker.add_recent_preset(color));
        }
        self.emit(ButtonEvent::PopupClosed(color));
    }

    fn ensure_picker(&mut self) -> &mut ColorPicker {
        let color = self.color;
        let config = self.config;
        let presets = &self.presets;
        let queue = &self.picker_events;
        self.picker.get_or_insert_with(|| {
            debug!("creating popup picker");
            let mut picker = ColorPicker::new(config, presets.clone());
            picker.set_pick_color(color);
            let sink = queue.clone();
            picker.connect(move |event| sink.borrow_mut().push(event.clone()));
            picker
        })
    }

    fn relay_events(&mut self) {
        let events = std::mem::take(&mut *self.picker_events.borrow_mut());
        for event in events {
            if let PickerEvent::ColorChanged(color) = event {
                self.color = color;
                self.emit(ButtonEvent::ColorChanged(color));
            }
        }
    }

    fn emit(&mut self, event: ButtonEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: SolidColor = SolidColor::from_rgba(1.0, 0.0, 0.0, 1.0);
    const BLUE: SolidColor = SolidColor::from_rgba(0.0, 0.0, 1.0, 1.0);

    fn button() -> (PickerButton, Rc<RefCell<Vec<ButtonEvent>>>) {
        let mut button = PickerButton::new(RED, PickerConfig::default(), PresetStore::new());
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        button.connect(move |e| sink.borrow_mut().push(e.clone()));
        (button, events)
    }

    #[test]
    fn picker_is_created_on_first_press() {
        let (mut b, events) = button();
        assert!(b.picker().is_none());
        b.press();
        let picker = b.picker().unwrap();
        assert_eq!(picker.color(), RED);
        assert_eq!(picker.old_color(), RED);
        // Creating the picker is not a color change.
        assert_eq!(*events.borrow(), vec![ButtonEvent::PopupAboutToOpen(RED)]);
    }

    #[test]
    fn picker_changes_reach_the_button() {
        let (mut b, events) = button();
        b.press();
        b.with_picker(|p| p.set_pick_color(BLUE));
        assert_eq!(b.color(), BLUE);
        b.close(false);
        assert_eq!(
            *events.borrow(),
            vec![
                ButtonEvent::PopupAboutToOpen(RED),
                ButtonEvent::ColorChanged(BLUE),
                ButtonEvent::PopupClosed(BLUE),
            ]
        );
        assert_eq!(b.picker().unwrap().recent_presets(), vec![BLUE]);
    }

    #[test]
    fn cancelling_restores_the_old_color() {
        let (mut b, events) = button();
        b.press();
        b.with_picker(|p| p.commit_text("0000FF").unwrap());
        b.close(true);
        assert_eq!(b.color(), RED);
        assert_eq!(events.borrow().last(), Some(&ButtonEvent::PopupClosed(RED)));
        assert!(!b.is_popup_open());
    }

    #[test]
    fn set_pick_color_before_press_only_stores() {
        let (mut b, events) = button();
        b.set_pick_color(BLUE);
        assert!(b.picker().is_none());
        assert!(events.borrow().is_empty());
        b.press();
        assert_eq!(b.picker().unwrap().color(), BLUE);
    }
}

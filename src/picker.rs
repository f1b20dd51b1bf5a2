//! The picker controller: owns the canonical color and keeps every view of
//! it (sliders, text, 2D cursor, strip, preset highlighting) consistent.
//!
//! All inputs funnel into one pass: store the color, refresh the hue caches,
//! then re-derive every view inside a [`SyncState`] guard so notifications
//! fired by those writes are dropped. A single `ColorChanged` event follows
//! once the views are consistent.

use floem::kurbo::{Point, Rect};
use log::{debug, trace};

use crate::color::{HueCache, HueSpace, SolidColor};
use crate::config::PickerConfig;
use crate::constants::PRESET_COLUMN_COUNT;
use crate::error::ParseColorError;
use crate::interop::{DragPayload, PixelSampler};
use crate::mode::{color_mode, ColorMode, ColorModeType, SliderSpec, TextFormat, SLIDER_COUNT};
use crate::presets::PresetStore;
use crate::shape::{picker_shape, PickerShape, PickerShapeType};
use crate::sync::{SyncState, SyncStats};

/// Events observable from outside the picker.
#[derive(Debug, Clone, PartialEq)]
pub enum PickerEvent {
    /// The canonical color changed. Fired once per input (or once per
    /// gesture in deferred mode).
    ColorChanged(SolidColor),
    PresetAdded(SolidColor),
    PresetRemoved(SolidColor),
}

/// The pointer-driven surfaces of the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickTarget {
    /// The 2D picking area.
    Area,
    /// The 1D strip next to it.
    Strip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gesture {
    /// A single complete input: commit, click, programmatic set.
    Discrete,
    /// Part of a drag that is still in progress.
    Continuous,
}

/// Where a color change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    External,
    Slider,
    SliderStep,
    Area,
    Strip,
    Text,
    Preset,
    RecentPreset,
    Screen,
    Drop,
    Revert,
}

impl Origin {
    /// Programmatic sets, spin box steps and re-selecting a recent color
    /// are not new picks.
    fn records_recent(self) -> bool {
        !matches!(self, Self::External | Self::SliderStep | Self::RecentPreset)
    }
}

impl From<PickTarget> for Origin {
    fn from(target: PickTarget) -> Self {
        match target {
            PickTarget::Area => Self::Area,
            PickTarget::Strip => Self::Strip,
        }
    }
}

/// A slider as it should currently be displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderView {
    pub spec: SliderSpec,
    pub value: f64,
    /// Whether the track shows a hue rainbow.
    pub is_hue: bool,
    /// Track colors, left to right. Empty when slider colorizing is off.
    pub gradient: Vec<SolidColor>,
}

/// Snapshot of everything the picker displays, rebuilt on every pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PickerView {
    pub color: SolidColor,
    /// The old color, when it is displayed next to the current one.
    pub old_color: Option<SolidColor>,
    pub hue: HueCache,
    pub color_mode: ColorModeType,
    pub picker_shape: PickerShapeType,
    pub sliders: Vec<SliderView>,
    pub text: String,
    pub text_format: TextFormat,
    /// Validation notice for the text field.
    pub text_error: Option<ParseColorError>,
    pub area_cursor: Point,
    pub strip_cursor: Point,
    /// Alpha (0.0–1.0) when alpha editing is on.
    pub alpha: Option<f64>,
    /// Preset buttons in display order.
    pub presets: Vec<SolidColor>,
    /// Recent-color buttons, oldest first.
    pub recent_presets: Vec<SolidColor>,
    pub selected_preset: Option<usize>,
    pub selected_recent: Option<usize>,
    pub presets_enabled: bool,
    pub presets_visible: bool,
}

type Listener = Box<dyn FnMut(&PickerEvent)>;

/// Headless color picker state machine.
pub struct ColorPicker {
    color: SolidColor,
    old_color: SolidColor,
    hue: HueCache,
    config: PickerConfig,

    sync: SyncState,
    stats: SyncStats,

    slider_values: [f64; SLIDER_COUNT],
    slider_drag: bool,
    slider_edited: bool,

    text_focused: bool,
    text_draft: Option<String>,
    text_error: Option<ParseColorError>,

    area_region: Rect,
    strip_region: Rect,
    drag: Option<PickTarget>,
    pending_emit: bool,

    presets: PresetStore,
    preset_mirror: Vec<SolidColor>,
    recent_mirror: Vec<SolidColor>,
    mirror_revision: Option<u64>,

    view: PickerView,
    listeners: Vec<Listener>,
}

impl Default for ColorPicker {
    fn default() -> Self {
        Self::new(PickerConfig::default(), PresetStore::shared())
    }
}

impl ColorPicker {
    /// A picker showing opaque white, using `presets` for its preset lists.
    pub fn new(config: PickerConfig, presets: PresetStore) -> Self {
        let color = SolidColor::default();
        let unit = Rect::new(0.0, 0.0, 1.0, 1.0);
        let mut picker = Self {
            color,
            old_color: color,
            hue: HueCache::from_color(color),
            config,
            sync: SyncState::Idle,
            stats: SyncStats::default(),
            slider_values: [0.0; SLIDER_COUNT],
            slider_drag: false,
            slider_edited: false,
            text_focused: false,
            text_draft: None,
            text_error: None,
            area_region: unit,
            strip_region: unit,
            drag: None,
            pending_emit: false,
            presets,
            preset_mirror: Vec::new(),
            recent_mirror: Vec::new(),
            mirror_revision: None,
            view: PickerView::default(),
            listeners: Vec::new(),
        };
        picker.reload_presets();
        picker.refresh(true);
        picker
    }

    /// Register a listener for [`PickerEvent`]s.
    pub fn connect(&mut self, listener: impl FnMut(&PickerEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn view(&self) -> &PickerView {
        &self.view
    }

    pub fn sync_stats(&self) -> SyncStats {
        self.stats
    }

    fn mode(&self) -> &'static dyn ColorMode {
        color_mode(self.config.color_mode)
    }

    fn shape(&self) -> &'static dyn PickerShape {
        picker_shape(self.config.picker_shape)
    }

    // ── color ──────────────────────────────────────────────────────────

    pub fn color(&self) -> SolidColor {
        self.color
    }

    /// Set the color from outside. Always fires one `ColorChanged`.
    pub fn set_pick_color(&mut self, color: SolidColor) {
        self.set_color_from(color, Origin::External, None, true, Gesture::Discrete);
    }

    pub fn old_color(&self) -> SolidColor {
        self.old_color
    }

    /// Snapshot the color an editing session started from.
    pub fn set_old_color(&mut self, color: SolidColor) {
        self.old_color = color;
        self.refresh(false);
    }

    pub fn is_displaying_old_color(&self) -> bool {
        self.config.display_old_color
    }

    pub fn set_display_old_color(&mut self, display: bool) {
        self.config.display_old_color = display;
        self.refresh(false);
    }

    /// Go back to the old color (a click on its half of the sample swatch).
    pub fn revert_to_old_color(&mut self) {
        let old = self.old_color;
        self.set_color_from(old, Origin::Revert, None, true, Gesture::Discrete);
    }

    // ── configuration ──────────────────────────────────────────────────

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn color_mode(&self) -> ColorModeType {
        self.config.color_mode
    }

    /// Switch modes. The color is untouched; sliders are relabeled and
    /// repopulated.
    pub fn set_color_mode(&mut self, mode: ColorModeType) {
        if self.config.color_mode == mode {
            return;
        }
        debug!("color mode {:?} -> {:?}", self.config.color_mode, mode);
        self.config.color_mode = mode;
        self.refresh(true);
    }

    pub fn picker_shape(&self) -> PickerShapeType {
        self.config.picker_shape
    }

    pub fn set_picker_shape(&mut self, shape: PickerShapeType) {
        if self.config.picker_shape == shape {
            return;
        }
        debug!("picker shape {:?} -> {:?}", self.config.picker_shape, shape);
        // A drag in the old geometry ends here, with its held event.
        if let Some(target) = self.drag.take() {
            self.end_gesture(target.into());
        }
        self.config.picker_shape = shape;
        self.refresh(true);
    }

    pub fn is_editing_alpha(&self) -> bool {
        self.config.edit_alpha
    }

    pub fn set_edit_alpha(&mut self, edit_alpha: bool) {
        if self.config.edit_alpha == edit_alpha {
            return;
        }
        self.config.edit_alpha = edit_alpha;
        self.refresh(true);
    }

    pub fn is_deferred_mode(&self) -> bool {
        self.config.deferred_mode
    }

    /// Turning deferred mode off flushes an event held back by it.
    pub fn set_deferred_mode(&mut self, deferred: bool) {
        self.config.deferred_mode = deferred;
        if !deferred && std::mem::take(&mut self.pending_emit) {
            self.emit(PickerEvent::ColorChanged(self.color));
        }
    }

    pub fn are_presets_enabled(&self) -> bool {
        self.config.presets_enabled
    }

    pub fn set_presets_enabled(&mut self, enabled: bool) {
        self.config.presets_enabled = enabled;
        self.refresh(false);
    }

    pub fn are_presets_visible(&self) -> bool {
        self.config.presets_visible
    }

    pub fn set_presets_visible(&mut self, visible: bool) {
        self.config.presets_visible = visible;
        self.refresh(false);
    }

    pub fn is_colorizing_sliders(&self) -> bool {
        self.config.colorize_sliders
    }

    pub fn set_colorize_sliders(&mut self, colorize: bool) {
        self.config.colorize_sliders = colorize;
        self.refresh(false);
    }

    pub fn text_format(&self) -> TextFormat {
        self.mode().text_format(self.config.text_format)
    }

    pub fn set_text_format(&mut self, format: TextFormat) {
        self.config.text_format = format;
        self.refresh(false);
    }

    /// Flip between hex and tuple text.
    pub fn toggle_text_format(&mut self) {
        let next = match self.config.text_format {
            TextFormat::Hex => TextFormat::Tuple,
            TextFormat::Tuple => TextFormat::Hex,
        };
        self.set_text_format(next);
    }

    // ── sliders ────────────────────────────────────────────────────────

    pub fn slider_count(&self) -> usize {
        self.mode().slider_count(self.config.edit_alpha)
    }

    /// Values of the visible sliders.
    pub fn slider_values(&self) -> Vec<f64> {
        self.slider_values[..self.slider_count()].to_vec()
    }

    /// Set a slider value (spin box entry, keyboard step). Out-of-range
    /// values are clamped and snapped to the step. The color changes right
    /// away; it joins the recent colors on [`ColorPicker::commit_slider_edit`].
    pub fn set_slider_value(&mut self, idx: usize, value: f64) {
        if self.store_slider(idx, value) {
            self.slider_edited = true;
            self.slider_changed(Origin::SliderStep, Gesture::Discrete);
        }
    }

    /// The spin box was committed (Enter or focus loss).
    pub fn commit_slider_edit(&mut self) {
        if std::mem::take(&mut self.slider_edited) && self.record_recent(Origin::Slider) {
            self.refresh(false);
        }
    }

    /// Move a slider thumb as part of a drag; finish with
    /// [`ColorPicker::end_slider_drag`].
    pub fn drag_slider(&mut self, idx: usize, value: f64) {
        if self.store_slider(idx, value) {
            self.slider_drag = true;
            self.slider_changed(Origin::Slider, Gesture::Continuous);
        }
    }

    pub fn end_slider_drag(&mut self) {
        if std::mem::take(&mut self.slider_drag) {
            self.end_gesture(Origin::Slider);
        }
    }

    fn store_slider(&mut self, idx: usize, value: f64) -> bool {
        if idx >= self.slider_count() || !value.is_finite() {
            return false;
        }
        self.slider_values[idx] = self.mode().slider(idx).snap(value);
        true
    }

    /// A slider reported a new value. Dropped while a pass is writing them.
    fn slider_changed(&mut self, origin: Origin, gesture: Gesture) {
        if self.sync.is_updating() {
            self.stats.suppressed += 1;
            trace!("slider notification suppressed");
            return;
        }
        let mode = self.mode();
        let mut hue = self.hue;
        let color = mode.apply(&self.slider_values, &mut hue);
        self.hue = hue;
        // The sliders already show the user's values.
        self.set_color_from(color, origin, mode.hue_space(), false, gesture);
    }

    // ── pointer picking ────────────────────────────────────────────────

    /// Report the current bounds of the picking area and the strip.
    pub fn set_regions(&mut self, area: Rect, strip: Rect) {
        self.area_region = area;
        self.strip_region = strip;
        self.refresh(false);
    }

    pub fn pointer_down(&mut self, target: PickTarget, region: Rect, pos: Point) {
        match target {
            PickTarget::Area => self.area_region = region,
            PickTarget::Strip => self.strip_region = region,
        }
        self.drag = Some(target);
        self.pick_at(target, pos);
    }

    /// Returns whether a drag was in progress.
    pub fn pointer_move(&mut self, pos: Point) -> bool {
        let Some(target) = self.drag else {
            return false;
        };
        self.pick_at(target, pos);
        true
    }

    pub fn pointer_up(&mut self) {
        if let Some(target) = self.drag.take() {
            self.end_gesture(target.into());
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some() || self.slider_drag
    }

    fn pick_at(&mut self, target: PickTarget, pos: Point) {
        let shape = self.shape();
        let mut hue = self.hue;
        match target {
            PickTarget::Area => shape.pick(self.area_region, pos, &mut hue),
            PickTarget::Strip => shape.pick_strip(self.strip_region, pos, &mut hue),
        }
        let space = shape.hue_space();
        let color = hue.color_in(space, self.color.a());
        self.hue = hue;
        self.set_color_from(color, target.into(), Some(space), true, Gesture::Continuous);
    }

    // ── text ───────────────────────────────────────────────────────────

    pub fn has_text_focus(&self) -> bool {
        self.text_focused
    }

    /// Focus changes of the text field. Losing focus commits a pending edit.
    pub fn set_text_focus(&mut self, focused: bool) {
        if self.text_focused == focused {
            return;
        }
        self.text_focused = focused;
        if focused {
            return;
        }
        if let Some(draft) = self.text_draft.take() {
            // A rejected draft is dropped; the field shows the color again.
            let _ = self.apply_text(&draft);
        }
        self.refresh(false);
    }

    /// A keystroke in the text field. Nothing is parsed until commit.
    pub fn edit_text(&mut self, text: &str) {
        self.text_draft = Some(text.to_string());
        self.text_error = None;
        self.view.text = text.to_string();
        self.view.text_error = None;
    }

    /// Commit the text field's current contents.
    pub fn submit_text(&mut self) -> Result<(), ParseColorError> {
        let text = self
            .text_draft
            .take()
            .unwrap_or_else(|| self.view.text.clone());
        self.apply_text(&text)
    }

    /// Commit `text` as if typed into the text field.
    pub fn commit_text(&mut self, text: &str) -> Result<(), ParseColorError> {
        self.text_draft = None;
        self.apply_text(text)
    }

    fn apply_text(&mut self, text: &str) -> Result<(), ParseColorError> {
        let parsed = self.mode().parse_text(
            text,
            self.config.text_format,
            self.color,
            self.config.edit_alpha,
        );
        match parsed {
            Ok(color) => {
                self.text_error = None;
                self.set_color_from(color, Origin::Text, None, true, Gesture::Discrete);
                // The accepted text is shown in canonical form, focused or not.
                self.view.text = self.mode().format_text(
                    self.color,
                    self.config.text_format,
                    self.config.edit_alpha,
                );
                Ok(())
            }
            Err(err) => {
                debug!("rejected color text {text:?}: {err}");
                self.text_error = Some(err.clone());
                self.view.text_error = Some(err.clone());
                Err(err)
            }
        }
    }

    // ── screen sampling and drag-and-drop ──────────────────────────────

    /// Read the color under `point` from `sampler`. Returns whether a
    /// color was read.
    pub fn pick_from_screen(&mut self, sampler: &dyn PixelSampler, point: Point) -> bool {
        match sampler.sample(point) {
            Some(color) => {
                self.apply_sampled_color(color);
                true
            }
            None => false,
        }
    }

    /// Apply a color read from the screen. Alpha is kept when it is not
    /// editable.
    pub fn apply_sampled_color(&mut self, color: SolidColor) {
        let color = if self.config.edit_alpha {
            color
        } else {
            color.with_alpha(self.color.a())
        };
        self.set_color_from(color, Origin::Screen, None, true, Gesture::Discrete);
    }

    pub fn drag_data(&self) -> DragPayload {
        DragPayload::Color(self.color)
    }

    pub fn can_drop(&self, payload: &DragPayload) -> bool {
        payload.color().is_some()
    }

    /// Accept a dropped payload. Returns whether it carried a color.
    pub fn drop_data(&mut self, payload: &DragPayload) -> bool {
        let Some(color) = payload.color() else {
            return false;
        };
        self.set_color_from(color, Origin::Drop, None, true, Gesture::Discrete);
        true
    }

    // ── presets ────────────────────────────────────────────────────────

    pub fn preset_store(&self) -> &PresetStore {
        &self.presets
    }

    pub fn add_preset(&mut self, color: SolidColor) {
        if !self.presets.add(color) {
            return;
        }
        self.reload_presets();
        self.refresh(false);
        self.emit(PickerEvent::PresetAdded(color));
    }

    /// The "+" button: save the current color.
    pub fn add_current_as_preset(&mut self) {
        self.add_preset(self.color);
    }

    pub fn erase_preset(&mut self, color: SolidColor) {
        if !self.presets.erase(color) {
            return;
        }
        self.reload_presets();
        self.refresh(false);
        self.emit(PickerEvent::PresetRemoved(color));
    }

    pub fn add_recent_preset(&mut self, color: SolidColor) {
        if self.presets.add_recent(color) {
            self.reload_presets();
            self.refresh(false);
        }
    }

    pub fn erase_recent_preset(&mut self, color: SolidColor) {
        if self.presets.erase_recent(color) {
            self.reload_presets();
            self.refresh(false);
        }
    }

    pub fn presets(&self) -> Vec<SolidColor> {
        self.presets.presets()
    }

    /// Recent colors, oldest first.
    pub fn recent_presets(&self) -> Vec<SolidColor> {
        self.presets.recent_presets()
    }

    /// This picker's preset buttons, laid out in grid rows.
    pub fn preset_rows(&self) -> std::slice::Chunks<'_, SolidColor> {
        self.preset_mirror.chunks(PRESET_COLUMN_COUNT)
    }

    /// This picker's recent-color buttons.
    pub fn recent_buttons(&self) -> &[SolidColor] {
        &self.recent_mirror
    }

    pub fn select_preset(&mut self, color: SolidColor) {
        self.set_color_from(color, Origin::Preset, None, true, Gesture::Discrete);
    }

    /// Select a recent color. The recent list is neither extended nor
    /// reordered.
    pub fn select_recent_preset(&mut self, color: SolidColor) {
        self.set_color_from(color, Origin::RecentPreset, None, true, Gesture::Discrete);
    }

    pub fn select_preset_at(&mut self, idx: usize) -> bool {
        let Some(color) = self.preset_mirror.get(idx).copied() else {
            return false;
        };
        self.select_preset(color);
        true
    }

    pub fn select_recent_preset_at(&mut self, idx: usize) -> bool {
        let Some(color) = self.recent_mirror.get(idx).copied() else {
            return false;
        };
        self.select_recent_preset(color);
        true
    }

    /// Pick up changes other pickers made to the shared lists. Returns
    /// whether anything changed.
    pub fn sync_presets(&mut self) -> bool {
        let changed = self.reload_presets();
        if changed {
            self.refresh(false);
        }
        changed
    }

    fn reload_presets(&mut self) -> bool {
        let revision = self.presets.revision();
        if self.mirror_revision == Some(revision) {
            return false;
        }
        self.preset_mirror = self.presets.presets();
        self.recent_mirror = self.presets.recent_presets();
        self.mirror_revision = Some(revision);
        true
    }

    fn record_recent(&mut self, origin: Origin) -> bool {
        if !origin.records_recent() || !self.config.presets_enabled {
            return false;
        }
        if !self.presets.add_recent(self.color) {
            return false;
        }
        self.reload_presets();
        true
    }

    // ── synchronization ────────────────────────────────────────────────

    /// The single entry point for color changes.
    ///
    /// `edited` is the hue space the change was made in (its cached
    /// coordinates are kept as-is); `update_sliders` is false when the
    /// sliders are the source.
    fn set_color_from(
        &mut self,
        color: SolidColor,
        origin: Origin,
        edited: Option<HueSpace>,
        update_sliders: bool,
        gesture: Gesture,
    ) {
        if self.sync.is_updating() {
            self.stats.suppressed += 1;
            trace!("{origin:?} change suppressed during update");
            return;
        }
        self.color = color;
        self.hue.sync_from(color, edited);
        if gesture == Gesture::Discrete {
            self.record_recent(origin);
        }
        self.refresh(update_sliders);
        self.finish(gesture);
    }

    /// Emit the change now, or hold it until the gesture ends.
    fn finish(&mut self, gesture: Gesture) {
        if gesture == Gesture::Continuous && self.config.deferred_mode {
            self.pending_emit = true;
            return;
        }
        self.pending_emit = false;
        self.emit(PickerEvent::ColorChanged(self.color));
    }

    fn end_gesture(&mut self, origin: Origin) {
        let pending = std::mem::take(&mut self.pending_emit);
        if self.record_recent(origin) {
            self.refresh(false);
        }
        if pending {
            self.emit(PickerEvent::ColorChanged(self.color));
        }
    }

    /// Re-derive every view from the canonical color.
    fn refresh(&mut self, update_sliders: bool) {
        if !self.sync.try_enter() {
            self.stats.suppressed += 1;
            trace!("nested refresh suppressed");
            return;
        }
        if update_sliders {
            self.write_sliders();
        }
        self.refresh_views();
        self.sync.exit();
        self.stats.passes += 1;
        trace!("sync pass {} for {}", self.stats.passes, self.color.to_hex(true));
    }

    fn write_sliders(&mut self) {
        let values = self.mode().values(self.color, &self.hue);
        for (idx, value) in values.into_iter().enumerate() {
            self.slider_values[idx] = value;
            // Slider widgets report every write back to the picker.
            self.slider_changed(Origin::SliderStep, Gesture::Discrete);
        }
    }

    fn refresh_views(&mut self) {
        let mode = self.mode();
        let shape = self.shape();
        let edit_alpha = self.config.edit_alpha;
        let hue_slider = mode.hue_slider();

        let sliders = (0..mode.slider_count(edit_alpha))
            .map(|idx| SliderView {
                spec: mode.slider(idx),
                value: self.slider_values[idx],
                is_hue: hue_slider == Some(idx),
                gradient: if self.config.colorize_sliders {
                    mode.slider_gradient(idx, self.color, &self.hue)
                } else {
                    Vec::new()
                },
            })
            .collect();

        // Never overwrite the field while the user is typing in it. Once
        // it is rewritten, a notice about earlier text no longer applies.
        let text = if self.text_focused {
            std::mem::take(&mut self.view.text)
        } else {
            self.text_error = None;
            mode.format_text(self.color, self.config.text_format, edit_alpha)
        };

        self.view = PickerView {
            color: self.color,
            old_color: self.config.display_old_color.then_some(self.old_color),
            hue: self.hue,
            color_mode: self.config.color_mode,
            picker_shape: self.config.picker_shape,
            sliders,
            text,
            text_format: mode.text_format(self.config.text_format),
            text_error: self.text_error.clone(),
            area_cursor: shape.cursor(self.area_region, &self.hue),
            strip_cursor: shape.strip_cursor(self.strip_region, &self.hue),
            alpha: edit_alpha.then_some(self.color.a()),
            presets: self.preset_mirror.clone(),
            recent_presets: self.recent_mirror.clone(),
            selected_preset: self.preset_mirror.iter().position(|c| *c == self.color),
            selected_recent: self.recent_mirror.iter().position(|c| *c == self.color),
            presets_enabled: self.config.presets_enabled,
            presets_visible: self.config.presets_visible,
        };
    }

    fn emit(&mut self, event: PickerEvent) {
        trace!("emit {event:?}");
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    const RED: SolidColor = SolidColor::from_rgba(1.0, 0.0, 0.0, 1.0);

    fn picker_with(config: PickerConfig) -> (ColorPicker, Rc<RefCell<Vec<PickerEvent>>>) {
        let mut picker = ColorPicker::new(config, PresetStore::new());
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        picker.connect(move |e| sink.borrow_mut().push(e.clone()));
        (picker, events)
    }

    fn picker() -> (ColorPicker, Rc<RefCell<Vec<PickerEvent>>>) {
        picker_with(PickerConfig::default().with_edit_alpha(true))
    }

    fn color_events(events: &Rc<RefCell<Vec<PickerEvent>>>) -> Vec<SolidColor> {
        events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                PickerEvent::ColorChanged(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    fn close(a: SolidColor, b: SolidColor) -> bool {
        a.channels()
            .iter()
            .zip(b.channels())
            .all(|(x, y)| (x - y).abs() < 1e-9)
    }

    #[test]
    fn starts_opaque_white() {
        let (p, events) = picker();
        assert_eq!(p.color(), SolidColor::WHITE);
        assert_eq!(p.view().text, "FFFFFFFF");
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn red_reads_as_full_hsv_and_mode_switch_keeps_color() {
        let (mut p, events) = picker();
        p.set_pick_color(RED);
        p.set_color_mode(ColorModeType::Hsv);
        assert_eq!(p.color(), RED);
        assert_eq!(&p.slider_values()[..3], &[0.0, 100.0, 100.0]);
        assert_eq!(p.view().sliders[0].spec.label, "H");
        assert!(p.view().sliders[0].is_hue);
        // Only the set fired an event.
        assert_eq!(color_events(&events), vec![RED]);
    }

    #[test]
    fn one_event_and_bounded_work_per_set() {
        let (mut p, events) = picker();
        let before = p.sync_stats();
        p.set_pick_color(SolidColor::from_rgb(10, 200, 30));
        let after = p.sync_stats();
        assert_eq!(events.borrow().len(), 1);
        assert_eq!(after.passes - before.passes, 1);
        // Each slider write notified the picker once and was dropped.
        assert_eq!(after.suppressed - before.suppressed, SLIDER_COUNT as u64);
        assert!(!p.sync.is_updating());
    }

    #[test]
    fn deferred_drag_emits_once_on_release() {
        let (mut p, events) = picker_with(PickerConfig::default().with_deferred_mode(true));
        let region = Rect::new(0.0, 0.0, 100.0, 100.0);
        p.pointer_down(PickTarget::Area, region, Point::new(10.0, 10.0));
        p.pointer_move(Point::new(40.0, 20.0));
        p.pointer_move(Point::new(70.0, 5.0));
        p.pointer_move(Point::new(100.0, 0.0));
        assert!(events.borrow().is_empty());
        // Views follow the drag right away.
        assert!(close(p.view().color, RED));

        p.pointer_up();
        let emitted = color_events(&events);
        assert_eq!(emitted.len(), 1);
        assert!(close(emitted[0], RED));
        assert_eq!(emitted[0], p.color());
    }

    #[test]
    fn immediate_drag_emits_per_move() {
        let (mut p, events) = picker();
        let region = Rect::new(0.0, 0.0, 100.0, 100.0);
        p.pointer_down(PickTarget::Area, region, Point::new(10.0, 10.0));
        p.pointer_move(Point::new(20.0, 10.0));
        p.pointer_move(Point::new(30.0, 10.0));
        p.pointer_up();
        assert_eq!(color_events(&events).len(), 3);
    }

    #[test]
    fn deferred_mode_does_not_delay_discrete_inputs() {
        let (mut p, events) = picker_with(PickerConfig::default().with_deferred_mode(true));
        p.add_preset(RED);
        p.select_preset(RED);
        p.commit_text("00FF00").unwrap();
        assert_eq!(color_events(&events).len(), 2);
    }

    #[test]
    fn hex_keeps_alpha_and_rejects_garbage() {
        let (mut p, events) = picker();
        p.set_pick_color(SolidColor::from_rgba(0.0, 0.0, 1.0, 0.5));
        events.borrow_mut().clear();

        p.commit_text("FF0000").unwrap();
        assert_eq!(p.color(), SolidColor::from_rgba(1.0, 0.0, 0.0, 0.5));
        assert_eq!(events.borrow().len(), 1);

        let before = p.color();
        let err = p.commit_text("ZZZZZZ").unwrap_err();
        assert_eq!(err, ParseColorError::InvalidHexDigit('Z'));
        assert_eq!(p.color(), before);
        assert_eq!(p.view().text_error, Some(err));
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn text_is_not_overwritten_while_focused() {
        let (mut p, _) = picker();
        p.set_text_focus(true);
        p.edit_text("12");
        p.set_pick_color(RED);
        assert_eq!(p.view().text, "12");

        p.edit_text("00FF00");
        p.set_text_focus(false);
        assert_eq!(p.color(), SolidColor::from_rgba(0.0, 1.0, 0.0, 1.0));
        assert_eq!(p.view().text, "00FF00FF");
    }

    #[test]
    fn submit_uses_typed_text() {
        let (mut p, _) = picker();
        p.edit_text("#0000ff80");
        p.submit_text().unwrap();
        assert_eq!(p.color(), SolidColor::from_rgba8(0, 0, 255, 0x80));
    }

    #[test]
    fn selecting_recent_preset_neither_appends_nor_reorders() {
        let (mut p, _) = picker();
        let a = SolidColor::from_rgb(1, 2, 3);
        let b = SolidColor::from_rgb(4, 5, 6);
        p.add_recent_preset(a);
        p.add_recent_preset(b);
        p.select_recent_preset(a);
        assert_eq!(p.recent_presets(), vec![a, b]);
        assert_eq!(p.color(), a);
        assert_eq!(p.view().selected_recent, Some(0));
    }

    #[test]
    fn commits_record_recent_colors() {
        let (mut p, _) = picker();
        p.set_pick_color(RED);
        assert!(p.recent_presets().is_empty());

        p.commit_text("00FF00").unwrap();
        let region = Rect::new(0.0, 0.0, 100.0, 100.0);
        p.pointer_down(PickTarget::Area, region, Point::new(0.0, 100.0));
        p.pointer_move(Point::new(0.0, 50.0));
        p.pointer_up();

        let recent = p.recent_presets();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0], SolidColor::from_rgba(0.0, 1.0, 0.0, 1.0));
        assert_eq!(recent[1], p.color());
    }

    #[test]
    fn presets_deduplicate_and_emit() {
        let (mut p, events) = picker();
        p.add_preset(RED);
        p.add_preset(RED);
        p.add_preset(SolidColor::BLACK);
        p.erase_preset(RED);
        p.erase_preset(RED);
        assert_eq!(p.presets(), vec![SolidColor::BLACK]);
        assert_eq!(
            *events.borrow(),
            vec![
                PickerEvent::PresetAdded(RED),
                PickerEvent::PresetAdded(SolidColor::BLACK),
                PickerEvent::PresetRemoved(RED),
            ]
        );
    }

    #[test]
    fn preset_highlight_tracks_color() {
        let (mut p, _) = picker();
        p.add_preset(SolidColor::BLACK);
        p.add_preset(RED);
        assert_eq!(p.view().selected_preset, None);
        assert!(p.select_preset_at(1));
        assert_eq!(p.view().selected_preset, Some(1));
        assert!(!p.select_preset_at(5));
    }

    #[test]
    fn preset_rows_wrap_at_column_count() {
        let (mut p, _) = picker();
        for n in 0..(PRESET_COLUMN_COUNT as u8 + 2) {
            p.add_preset(SolidColor::from_rgb(n, 0, 0));
        }
        let rows: Vec<_> = p.preset_rows().map(<[SolidColor]>::len).collect();
        assert_eq!(rows, vec![PRESET_COLUMN_COUNT, 2]);
    }

    #[test]
    fn pickers_sharing_a_store_see_each_other() {
        let store = PresetStore::new();
        let mut a = ColorPicker::new(PickerConfig::default(), store.clone());
        let mut b = ColorPicker::new(PickerConfig::default(), store);
        a.add_preset(RED);
        assert_eq!(b.presets(), vec![RED]);
        assert!(b.preset_rows().next().is_none());
        assert!(b.sync_presets());
        assert_eq!(b.preset_rows().next(), Some(&[RED][..]));
        assert!(!b.sync_presets());
    }

    #[test]
    fn hsv_hue_survives_scrubbing_through_gray() {
        let (mut p, _) = picker();
        p.set_color_mode(ColorModeType::Hsv);
        p.set_slider_value(0, 200.0);
        p.set_slider_value(1, 80.0);
        p.set_slider_value(1, 0.0);
        assert_eq!(p.slider_values()[0], 200.0);
        p.set_slider_value(1, 50.0);
        assert!((p.view().hue.hsv.h - 200.0 / 360.0).abs() < 1e-12);
        let (h, s, _) = p.color().to_hsv();
        assert!((h - 200.0 / 360.0).abs() < 1e-9);
        assert!((s - 0.5).abs() < 1e-9);
    }

    #[test]
    fn external_gray_keeps_cached_hue() {
        let (mut p, _) = picker();
        p.set_pick_color(SolidColor::from_hsv(0.6, 1.0, 1.0, 1.0));
        p.set_pick_color(SolidColor::from_rgba(0.3, 0.3, 0.3, 1.0));
        p.set_color_mode(ColorModeType::Hsv);
        assert!((p.slider_values()[0] - 216.0).abs() < 1e-9);
    }

    #[test]
    fn slider_values_clamp_and_snap() {
        let (mut p, _) = picker();
        p.set_slider_value(0, 999.0);
        assert_eq!(p.color().r(), 1.0);
        p.set_slider_value(1, 127.6);
        assert_eq!(p.slider_values()[1], 128.0);
        // Out-of-range slot indices are ignored.
        p.set_slider_value(7, 1.0);
    }

    #[test]
    fn alpha_editing_changes_slider_count_and_text() {
        let (mut p, _) = picker();
        assert_eq!(p.slider_count(), 4);
        p.set_edit_alpha(false);
        assert_eq!(p.slider_count(), 3);
        assert_eq!(p.view().sliders.len(), 3);
        assert_eq!(p.view().text, "FFFFFF");
        assert_eq!(p.view().alpha, None);
    }

    #[test]
    fn slider_drag_defers_like_pointer_drag() {
        let (mut p, events) = picker_with(PickerConfig::default().with_deferred_mode(true));
        p.drag_slider(0, 10.0);
        p.drag_slider(0, 20.0);
        assert!(events.borrow().is_empty());
        p.end_slider_drag();
        assert_eq!(events.borrow().len(), 1);
        assert!((p.color().r() - 20.0 / 255.0).abs() < 1e-12);
    }

    #[test]
    fn raw_mode_uses_tuple_text() {
        let (mut p, _) = picker();
        p.set_color_mode(ColorModeType::Raw);
        p.set_slider_value(0, 2.5);
        assert!((p.color().r() - 2.5).abs() < 1e-12);
        assert_eq!(p.view().text, "(2.500, 1.000, 1.000, 1.000)");
        p.commit_text("(0.5, 0.25, 4, 1)").unwrap();
        assert_eq!(p.color(), SolidColor::from_rgba(0.5, 0.25, 4.0, 1.0));
    }

    #[test]
    fn shape_switch_moves_cursor_not_color() {
        let (mut p, events) = picker();
        p.set_regions(Rect::new(0.0, 0.0, 100.0, 100.0), Rect::new(0.0, 0.0, 10.0, 100.0));
        p.set_pick_color(SolidColor::from_hsv(0.25, 0.5, 1.0, 1.0));
        let color = p.color();
        assert!((p.view().area_cursor.x - 50.0).abs() < 1e-9);
        p.set_picker_shape(PickerShapeType::VhsCircle);
        assert_eq!(p.color(), color);
        let cursor = p.view().area_cursor;
        assert!((cursor.x - 50.0).abs() < 1e-9);
        assert!((cursor.y - 75.0).abs() < 1e-9);
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn okhsl_circle_picks_in_okhsl() {
        let (mut p, _) = picker();
        p.set_picker_shape(PickerShapeType::OkhslCircle);
        p.set_pick_color(SolidColor::from_okhsl(0.1, 0.5, 0.6, 1.0));
        let region = Rect::new(0.0, 0.0, 100.0, 100.0);
        p.pointer_down(PickTarget::Area, region, Point::new(50.0, 50.0));
        p.pointer_up();
        // Center: saturation drops to zero, hue and lightness stay.
        let ok = p.view().hue.okhsl;
        assert_eq!(ok.s, 0.0);
        assert!((ok.h - 0.1).abs() < 1e-6);
        assert!((ok.l - 0.6).abs() < 1e-6);
    }

    #[test]
    fn screen_pick_and_drop() {
        let (mut p, events) = picker_with(PickerConfig::default().with_edit_alpha(false));
        p.set_pick_color(SolidColor::from_rgba(0.0, 0.0, 0.0, 0.5));
        let sampler = |_: Point| Some(SolidColor::from_rgba(0.2, 0.4, 0.6, 1.0));
        assert!(p.pick_from_screen(&sampler, Point::new(3.0, 4.0)));
        assert_eq!(p.color(), SolidColor::from_rgba(0.2, 0.4, 0.6, 0.5));

        assert!(!p.drop_data(&DragPayload::Other("text".into())));
        assert!(p.can_drop(&DragPayload::Color(RED)));
        assert!(p.drop_data(&DragPayload::Color(RED)));
        assert_eq!(p.drag_data(), DragPayload::Color(RED));
        assert_eq!(color_events(&events).len(), 3);
    }

    #[test]
    fn revert_restores_old_color() {
        let (mut p, _) = picker();
        p.set_old_color(SolidColor::BLACK);
        p.set_display_old_color(true);
        p.set_pick_color(RED);
        assert_eq!(p.view().old_color, Some(SolidColor::BLACK));
        p.revert_to_old_color();
        assert_eq!(p.color(), SolidColor::BLACK);
    }

    #[test]
    fn disabling_deferred_mode_flushes_pending_event() {
        let (mut p, events) = picker_with(PickerConfig::default().with_deferred_mode(true));
        p.pointer_down(PickTarget::Strip, Rect::new(0.0, 0.0, 10.0, 100.0), Point::new(5.0, 50.0));
        assert!(events.borrow().is_empty());
        p.set_deferred_mode(false);
        assert_eq!(events.borrow().len(), 1);
        p.pointer_up();
        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn shape_switch_mid_drag_ends_the_gesture() {
        let (mut p, events) = picker_with(PickerConfig::default().with_deferred_mode(true));
        let region = Rect::new(0.0, 0.0, 100.0, 100.0);
        p.pointer_down(PickTarget::Area, region, Point::new(100.0, 0.0));
        p.pointer_move(Point::new(60.0, 10.0));
        assert!(events.borrow().is_empty());

        let dragged = p.color();
        p.set_picker_shape(PickerShapeType::VhsCircle);
        assert_eq!(color_events(&events), vec![dragged]);
        assert_eq!(p.recent_presets(), vec![dragged]);
        assert!(!p.is_dragging());

        // Nothing is left over for the next input.
        p.pointer_up();
        p.set_slider_value(1, 10.0);
        assert_eq!(color_events(&events).len(), 2);
    }

    #[test]
    fn hue_slider_stays_below_a_full_turn() {
        let (mut p, _) = picker();
        p.set_color_mode(ColorModeType::Hsv);
        p.set_slider_value(1, 100.0);
        p.set_slider_value(0, 360.0);
        assert_eq!(p.slider_values()[0], 359.0);
        assert_eq!(p.view().sliders[0].value, 359.0);
        assert!((p.view().hue.hsv.h * 360.0 - 359.0).abs() < 1e-9);
    }

    #[test]
    fn accepted_text_is_reformatted_while_focused() {
        let (mut p, _) = picker();
        p.set_text_focus(true);
        p.edit_text("#0000ff80");
        p.submit_text().unwrap();
        assert!(p.has_text_focus());
        assert_eq!(p.view().text, "0000FF80");
    }

    #[test]
    fn rejected_draft_notice_clears_when_field_is_rewritten() {
        let (mut p, events) = picker();
        p.set_text_focus(true);
        p.edit_text("nope");
        p.set_text_focus(false);
        assert_eq!(p.color(), SolidColor::WHITE);
        assert_eq!(p.view().text, "FFFFFFFF");
        assert_eq!(p.view().text_error, None);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn spin_box_steps_record_one_recent_color_on_commit() {
        let (mut p, _) = picker();
        for value in [10.0, 20.0, 30.0, 40.0] {
            p.set_slider_value(0, value);
        }
        assert!(p.recent_presets().is_empty());

        p.commit_slider_edit();
        assert_eq!(p.recent_presets(), vec![p.color()]);
        assert_eq!(p.view().selected_recent, Some(0));

        // A second commit without edits adds nothing.
        p.commit_slider_edit();
        assert_eq!(p.recent_presets().len(), 1);
    }
}

//! Runtime configuration of a picker instance.

use crate::mode::{ColorModeType, TextFormat};
use crate::shape::PickerShapeType;

/// Initial settings of a [`crate::ColorPicker`]. Every field can also be
/// changed later through the picker's setters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerConfig {
    pub color_mode: ColorModeType,
    pub picker_shape: PickerShapeType,
    pub text_format: TextFormat,
    /// Show the alpha slider and carry alpha in hex text.
    pub edit_alpha: bool,
    /// Hold back color-changed events until a drag gesture ends.
    pub deferred_mode: bool,
    pub presets_enabled: bool,
    pub presets_visible: bool,
    /// Paint slider tracks with the colors they select.
    pub colorize_sliders: bool,
    /// Show the old color next to the current one in the sample swatch.
    pub display_old_color: bool,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            color_mode: ColorModeType::Rgb,
            picker_shape: PickerShapeType::HsvRectangle,
            text_format: TextFormat::Hex,
            edit_alpha: cfg!(feature = "alpha"),
            deferred_mode: false,
            presets_enabled: true,
            presets_visible: true,
            colorize_sliders: true,
            display_old_color: false,
        }
    }
}

impl PickerConfig {
    pub fn with_color_mode(mut self, mode: ColorModeType) -> Self {
        self.color_mode = mode;
        self
    }

    pub fn with_picker_shape(mut self, shape: PickerShapeType) -> Self {
        self.picker_shape = shape;
        self
    }

    pub fn with_text_format(mut self, format: TextFormat) -> Self {
        self.text_format = format;
        self
    }

    pub fn with_edit_alpha(mut self, edit_alpha: bool) -> Self {
        self.edit_alpha = edit_alpha;
        self
    }

    pub fn with_deferred_mode(mut self, deferred: bool) -> Self {
        self.deferred_mode = deferred;
        self
    }

    pub fn with_presets_enabled(mut self, enabled: bool) -> Self {
        self.presets_enabled = enabled;
        self
    }

    pub fn with_presets_visible(mut self, visible: bool) -> Self {
        self.presets_visible = visible;
        self
    }

    pub fn with_colorize_sliders(mut self, colorize: bool) -> Self {
        self.colorize_sliders = colorize;
        self
    }

    pub fn with_display_old_color(mut self, display: bool) -> Self {
        self.display_old_color = display;
        self
    }
}

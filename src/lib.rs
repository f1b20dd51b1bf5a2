//! # floem-prism
//!
//! A color picker for [Floem](https://github.com/lapce/floem) with
//! interchangeable color modes (RGB, HSV, RAW, OKHSL), several picking-area
//! shapes, hex / tuple text entry, and preset swatches shared between
//! pickers.
//!
//! The picking logic lives in the headless [`ColorPicker`], which can be
//! driven and tested without a window; [`color_picker`] wraps it in Floem
//! views.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use floem::prelude::*;
//! use floem_prism::{color_picker, PickerConfig, PresetStore, SolidColor};
//!
//! let color = RwSignal::new(SolidColor::from_hex("3B82F6").unwrap());
//! // Use `color_picker(color, PickerConfig::default(), PresetStore::shared())`
//! // in your Floem view tree.
//! ```

mod button;
mod color;
mod config;
mod constants;
mod error;
mod interop;
mod math;
mod mode;
mod picker;
mod presets;
mod shape;
mod sync;

mod area_view;
#[cfg(all(feature = "eyedropper", target_os = "macos"))]
mod eyedropper;
mod handle;
mod inputs;
mod paint;
mod picker_view;
mod presets_view;
mod slider_track;
mod strip_view;

pub use button::{ButtonEvent, PickerButton};
pub use color::{Hsv, HueCache, HueSpace, Okhsl, SolidColor};
pub use config::PickerConfig;
pub use constants::{PRESET_COLUMN_COUNT, RECENT_PRESET_CAPACITY};
pub use error::ParseColorError;
pub use interop::{DragPayload, PixelSampler, COLOR_PAYLOAD_KIND};
pub use mode::{
    color_mode, ColorMode, ColorModeType, HsvMode, OkhslMode, RawMode, RgbMode, SliderSpec,
    TextFormat, ALPHA_SLIDER, RAW_CHANNEL_MAX, SLIDER_COUNT,
};
pub use picker::{ColorPicker, PickTarget, PickerEvent, PickerView, SliderView};
pub use presets::PresetStore;
pub use shape::{
    picker_shape, HsvRectangle, HsvWheel, OkhslCircle, PickerShape, PickerShapeType, Region,
    StripAxis, VhsCircle,
};
pub use sync::{SyncState, SyncStats};

use std::sync::Once;

use floem::prelude::*;
use floem::reactive::RwSignal;
use floem::text::FONT_SYSTEM;

static LOAD_LUCIDE_FONT: Once = Once::new();

/// Creates the color picker view.
///
/// The picker reads from and writes to `color`: external writes to the
/// signal update the picker, and user edits update the signal. `presets`
/// is usually [`PresetStore::shared`] so every picker sees the same
/// swatches.
pub fn color_picker(
    color: RwSignal<SolidColor>,
    config: PickerConfig,
    presets: PresetStore,
) -> impl IntoView {
    LOAD_LUCIDE_FONT.call_once(|| {
        FONT_SYSTEM
            .lock()
            .db_mut()
            .load_font_data(lucide_icons::LUCIDE_FONT_BYTES.to_vec());
    });
    let handle = handle::PickerHandle::new(ColorPicker::new(config, presets), color);
    picker_view::picker_view(handle)
}

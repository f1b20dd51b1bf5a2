//! Sizing, color, and styling constants for the picker.

/// Columns in the preset grid
pub const PRESET_COLUMN_COUNT: usize = 9;

/// Default number of recent colors kept before the oldest is evicted
pub const RECENT_PRESET_CAPACITY: usize = PRESET_COLUMN_COUNT;

/// Side of the preset swatches
pub const PRESET_SIZE: f64 = 18.0;

/// Gap between preset swatches
pub const PRESET_GAP: f64 = 4.0;

/// 1D slider track height
pub const SLIDER_HEIGHT: f32 = 16.0;

/// Width of the vertical strip next to the picking area
pub const STRIP_WIDTH: f32 = 16.0;

/// Cursor circle radius on the 2D picker
pub const CURSOR_RADIUS: f64 = 8.0;

/// Thumb radius on 1D sliders
pub const THUMB_RADIUS: f64 = 7.0;

/// Border radius for slider tracks
pub const RADIUS: f32 = 4.0;

/// Gap between picker elements
pub const GAP: f32 = 8.0;

/// Padding around the whole picker
pub const PADDING: f32 = 8.0;

/// Input field width
pub const INPUT_WIDTH: f32 = 40.0;

/// Text (hex / tuple) input field width
pub const TEXT_INPUT_WIDTH: f32 = 150.0;

/// Input font size
pub const INPUT_FONT: f32 = 11.0;

/// Label font size
pub const LABEL_FONT: f32 = 10.0;

/// Resolution of the rasterized picking area (square, in pixels)
pub const AREA_RASTER_SIZE: u32 = 128;

/// Resolution of rasterized strips and slider tracks along their long axis
pub const STRIP_RASTER_LEN: u32 = 256;

/// Checkerboard cell size (for alpha backgrounds)
#[cfg(feature = "alpha")]
pub const CHECKER_CELL: f64 = 5.0;

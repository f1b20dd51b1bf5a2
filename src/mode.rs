//! Color modes: the slider/text representations of the canonical color.
//!
//! Each mode converts between [`SolidColor`] and up to four slider values
//! (three channels plus alpha) and owns the text form shown in the color
//! field. Modes are stateless; hue-based modes read and write the shared
//! [`HueCache`] so hue survives edits through gray.

use crate::color::{parse_hex, HueCache, HueSpace, SolidColor};
use crate::error::ParseColorError;

/// Number of slider slots a mode exposes (the last one is alpha).
pub const SLIDER_COUNT: usize = 4;

/// Index of the alpha slider.
pub const ALPHA_SLIDER: usize = SLIDER_COUNT - 1;

/// Which color mode drives the sliders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ColorModeType {
    #[default]
    Rgb,
    Hsv,
    Raw,
    Okhsl,
}

impl ColorModeType {
    pub const ALL: [ColorModeType; 4] = [Self::Rgb, Self::Hsv, Self::Raw, Self::Okhsl];

    pub fn name(self) -> &'static str {
        color_mode(self).name()
    }

    /// The next mode, wrapping around (used by the mode selector).
    pub fn next(self) -> Self {
        match self {
            Self::Rgb => Self::Hsv,
            Self::Hsv => Self::Raw,
            Self::Raw => Self::Okhsl,
            Self::Okhsl => Self::Rgb,
        }
    }
}

/// How the color text field is rendered and parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextFormat {
    /// `RRGGBB` or `RRGGBBAA`.
    #[default]
    Hex,
    /// `(r, g, b, a)` with floating channels.
    Tuple,
}

/// Label and range of one slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderSpec {
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SliderSpec {
    const fn new(label: &'static str, max: f64, step: f64) -> Self {
        Self {
            label,
            min: 0.0,
            max,
            step,
        }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Clamp `value` into range and round it to the nearest step.
    pub fn snap(&self, value: f64) -> f64 {
        let clamped = self.clamp(value);
        if self.step <= 0.0 {
            return clamped;
        }
        let steps = ((clamped - self.min) / self.step).round();
        self.clamp(self.min + steps * self.step)
    }

    /// Position of `value` along the slider track, 0.0–1.0.
    pub fn fraction(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }

    /// Inverse of [`SliderSpec::fraction`].
    pub fn value_at(&self, fraction: f64) -> f64 {
        self.min + fraction.clamp(0.0, 1.0) * (self.max - self.min)
    }
}

/// One representation of the canonical color as sliders and text.
pub trait ColorMode {
    fn kind(&self) -> ColorModeType;

    fn name(&self) -> &'static str;

    /// Spec of slider `idx` (`0..SLIDER_COUNT`, the last one is alpha).
    fn slider(&self, idx: usize) -> SliderSpec;

    /// Visible slider count: three channels, plus alpha when it is editable.
    fn slider_count(&self, edit_alpha: bool) -> usize {
        if edit_alpha {
            SLIDER_COUNT
        } else {
            SLIDER_COUNT - 1
        }
    }

    /// Index of the slider whose track shows a hue rainbow.
    fn hue_slider(&self) -> Option<usize> {
        None
    }

    /// The cached hue space this mode edits directly, if any.
    fn hue_space(&self) -> Option<HueSpace> {
        None
    }

    /// Slider values for `color`.
    fn values(&self, color: SolidColor, cache: &HueCache) -> [f64; SLIDER_COUNT];

    /// Color described by `values`. Hue-based modes also write their
    /// coordinates into `cache`.
    fn apply(&self, values: &[f64; SLIDER_COUNT], cache: &mut HueCache) -> SolidColor;

    /// Gradient stops for the track of slider `idx`, left to right.
    fn slider_gradient(&self, idx: usize, color: SolidColor, cache: &HueCache) -> Vec<SolidColor>;

    /// The text form actually used when `requested` is selected.
    fn text_format(&self, requested: TextFormat) -> TextFormat {
        requested
    }

    fn format_text(&self, color: SolidColor, format: TextFormat, edit_alpha: bool) -> String {
        match self.text_format(format) {
            TextFormat::Hex => color.to_hex(edit_alpha),
            TextFormat::Tuple => format_tuple(color, edit_alpha),
        }
    }

    /// Parse text typed into the color field. `current` supplies the alpha
    /// when the text does not carry one (or alpha editing is off).
    fn parse_text(
        &self,
        text: &str,
        format: TextFormat,
        current: SolidColor,
        edit_alpha: bool,
    ) -> Result<SolidColor, ParseColorError> {
        let (color, has_alpha) = match self.text_format(format) {
            TextFormat::Hex => parse_hex(text)?,
            TextFormat::Tuple => parse_tuple(text, self.tuple_limit())?,
        };
        if has_alpha && edit_alpha {
            Ok(color)
        } else {
            Ok(color.with_alpha(current.a()))
        }
    }

    /// Largest channel value accepted by tuple text.
    fn tuple_limit(&self) -> f64 {
        1.0
    }
}

/// The mode implementation for `kind`.
pub fn color_mode(kind: ColorModeType) -> &'static dyn ColorMode {
    match kind {
        ColorModeType::Rgb => &RgbMode,
        ColorModeType::Hsv => &HsvMode,
        ColorModeType::Raw => &RawMode,
        ColorModeType::Okhsl => &OkhslMode,
    }
}

fn format_tuple(color: SolidColor, edit_alpha: bool) -> String {
    if edit_alpha {
        format!(
            "({:.3}, {:.3}, {:.3}, {:.3})",
            color.r(),
            color.g(),
            color.b(),
            color.a()
        )
    } else {
        format!("({:.3}, {:.3}, {:.3})", color.r(), color.g(), color.b())
    }
}

fn parse_tuple(text: &str, max: f64) -> Result<(SolidColor, bool), ParseColorError> {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .unwrap_or(trimmed);
    if inner.trim().is_empty() {
        return Err(ParseColorError::Empty);
    }

    let mut parts = Vec::with_capacity(4);
    for raw in inner.split(',') {
        let raw = raw.trim();
        let value: f64 = raw
            .parse()
            .map_err(|_| ParseColorError::InvalidNumber(raw.to_string()))?;
        if !value.is_finite() || !(0.0..=max).contains(&value) {
            return Err(ParseColorError::OutOfRange {
                value,
                min: 0.0,
                max,
            });
        }
        parts.push(value);
    }

    match parts.as_slice() {
        [r, g, b] => Ok((SolidColor::from_rgba(*r, *g, *b, 1.0), false)),
        [r, g, b, a] => Ok((SolidColor::from_rgba(*r, *g, *b, *a), true)),
        other => Err(ParseColorError::ComponentCount(other.len())),
    }
}

fn channel_ramp(color: SolidColor, idx: usize) -> Vec<SolidColor> {
    let mut lo = color.channels();
    let mut hi = lo;
    lo[idx] = 0.0;
    hi[idx] = 1.0;
    if idx != ALPHA_SLIDER {
        lo[ALPHA_SLIDER] = 1.0;
        hi[ALPHA_SLIDER] = 1.0;
    }
    vec![
        SolidColor::from_rgba(lo[0], lo[1], lo[2], lo[3]),
        SolidColor::from_rgba(hi[0], hi[1], hi[2], hi[3]),
    ]
}

const HUE_STOPS: usize = 7;

fn hue_ramp(f: impl Fn(f64) -> SolidColor) -> Vec<SolidColor> {
    (0..HUE_STOPS)
        .map(|i| f(i as f64 / (HUE_STOPS - 1) as f64))
        .collect()
}

fn wrap_turns(degrees: f64) -> f64 {
    (degrees / 360.0).rem_euclid(1.0)
}

// ── RGB ────────────────────────────────────────────────────────────────

/// Red, green and blue as 0–255.
pub struct RgbMode;

const RGB_SLIDERS: [SliderSpec; SLIDER_COUNT] = [
    SliderSpec::new("R", 255.0, 1.0),
    SliderSpec::new("G", 255.0, 1.0),
    SliderSpec::new("B", 255.0, 1.0),
    SliderSpec::new("A", 255.0, 1.0),
];

impl ColorMode for RgbMode {
    fn kind(&self) -> ColorModeType {
        ColorModeType::Rgb
    }

    fn name(&self) -> &'static str {
        "RGB"
    }

    fn slider(&self, idx: usize) -> SliderSpec {
        RGB_SLIDERS[idx.min(ALPHA_SLIDER)]
    }

    fn values(&self, color: SolidColor, _cache: &HueCache) -> [f64; SLIDER_COUNT] {
        color.channels().map(|c| c * 255.0)
    }

    fn apply(&self, values: &[f64; SLIDER_COUNT], _cache: &mut HueCache) -> SolidColor {
        let [r, g, b, a] = values.map(|v| v / 255.0);
        SolidColor::from_rgba(r, g, b, a)
    }

    fn slider_gradient(&self, idx: usize, color: SolidColor, _cache: &HueCache) -> Vec<SolidColor> {
        channel_ramp(color, idx.min(ALPHA_SLIDER))
    }
}

// ── HSV ────────────────────────────────────────────────────────────────

/// Hue in degrees, saturation and value in percent.
pub struct HsvMode;

const HSV_SLIDERS: [SliderSpec; SLIDER_COUNT] = [
    SliderSpec::new("H", 359.0, 1.0),
    SliderSpec::new("S", 100.0, 1.0),
    SliderSpec::new("V", 100.0, 1.0),
    SliderSpec::new("A", 100.0, 1.0),
];

impl ColorMode for HsvMode {
    fn kind(&self) -> ColorModeType {
        ColorModeType::Hsv
    }

    fn name(&self) -> &'static str {
        "HSV"
    }

    fn slider(&self, idx: usize) -> SliderSpec {
        HSV_SLIDERS[idx.min(ALPHA_SLIDER)]
    }

    fn hue_slider(&self) -> Option<usize> {
        Some(0)
    }

    fn hue_space(&self) -> Option<HueSpace> {
        Some(HueSpace::Hsv)
    }

    fn values(&self, color: SolidColor, cache: &HueCache) -> [f64; SLIDER_COUNT] {
        let hsv = cache.hsv;
        [hsv.h * 360.0, hsv.s * 100.0, hsv.v * 100.0, color.a() * 100.0]
    }

    fn apply(&self, values: &[f64; SLIDER_COUNT], cache: &mut HueCache) -> SolidColor {
        cache.hsv.h = wrap_turns(values[0]);
        cache.hsv.s = values[1] / 100.0;
        cache.hsv.v = values[2] / 100.0;
        cache.color_in(HueSpace::Hsv, values[3] / 100.0)
    }

    fn slider_gradient(&self, idx: usize, color: SolidColor, cache: &HueCache) -> Vec<SolidColor> {
        let hsv = cache.hsv;
        match idx {
            0 => hue_ramp(|h| SolidColor::from_hsv(h, hsv.s, hsv.v, 1.0)),
            1 => vec![
                SolidColor::from_hsv(hsv.h, 0.0, hsv.v, 1.0),
                SolidColor::from_hsv(hsv.h, 1.0, hsv.v, 1.0),
            ],
            2 => vec![
                SolidColor::from_hsv(hsv.h, hsv.s, 0.0, 1.0),
                SolidColor::from_hsv(hsv.h, hsv.s, 1.0, 1.0),
            ],
            _ => channel_ramp(color, ALPHA_SLIDER),
        }
    }
}

// ── RAW ────────────────────────────────────────────────────────────────

/// Unclamped float channels, for HDR colors above 1.0.
pub struct RawMode;

/// Upper bound of the RAW channel sliders.
pub const RAW_CHANNEL_MAX: f64 = 100.0;

const RAW_SLIDERS: [SliderSpec; SLIDER_COUNT] = [
    SliderSpec::new("R", RAW_CHANNEL_MAX, 0.001),
    SliderSpec::new("G", RAW_CHANNEL_MAX, 0.001),
    SliderSpec::new("B", RAW_CHANNEL_MAX, 0.001),
    SliderSpec::new("A", 1.0, 0.001),
];

impl ColorMode for RawMode {
    fn kind(&self) -> ColorModeType {
        ColorModeType::Raw
    }

    fn name(&self) -> &'static str {
        "RAW"
    }

    fn slider(&self, idx: usize) -> SliderSpec {
        RAW_SLIDERS[idx.min(ALPHA_SLIDER)]
    }

    fn values(&self, color: SolidColor, _cache: &HueCache) -> [f64; SLIDER_COUNT] {
        color.channels()
    }

    fn apply(&self, values: &[f64; SLIDER_COUNT], _cache: &mut HueCache) -> SolidColor {
        SolidColor::from_rgba(values[0], values[1], values[2], values[3])
    }

    fn slider_gradient(&self, idx: usize, color: SolidColor, _cache: &HueCache) -> Vec<SolidColor> {
        channel_ramp(color, idx.min(ALPHA_SLIDER))
    }

    // Hex cannot express HDR channels.
    fn text_format(&self, _requested: TextFormat) -> TextFormat {
        TextFormat::Tuple
    }

    fn tuple_limit(&self) -> f64 {
        RAW_CHANNEL_MAX
    }
}

// ── OKHSL ──────────────────────────────────────────────────────────────

/// Perceptual hue in degrees, saturation and lightness in percent.
pub struct OkhslMode;

const OKHSL_SLIDERS: [SliderSpec; SLIDER_COUNT] = [
    SliderSpec::new("H", 359.0, 1.0),
    SliderSpec::new("S", 100.0, 1.0),
    SliderSpec::new("L", 100.0, 1.0),
    SliderSpec::new("A", 100.0, 1.0),
];

impl ColorMode for OkhslMode {
    fn kind(&self) -> ColorModeType {
        ColorModeType::Okhsl
    }

    fn name(&self) -> &'static str {
        "OKHSL"
    }

    fn slider(&self, idx: usize) -> SliderSpec {
        OKHSL_SLIDERS[idx.min(ALPHA_SLIDER)]
    }

    fn hue_slider(&self) -> Option<usize> {
        Some(0)
    }

    fn hue_space(&self) -> Option<HueSpace> {
        Some(HueSpace::Okhsl)
    }

    fn values(&self, color: SolidColor, cache: &HueCache) -> [f64; SLIDER_COUNT] {
        let ok = cache.okhsl;
        [ok.h * 360.0, ok.s * 100.0, ok.l * 100.0, color.a() * 100.0]
    }

    fn apply(&self, values: &[f64; SLIDER_COUNT], cache: &mut HueCache) -> SolidColor {
        cache.okhsl.h = wrap_turns(values[0]);
        cache.okhsl.s = values[1] / 100.0;
        cache.okhsl.l = values[2] / 100.0;
        cache.color_in(HueSpace::Okhsl, values[3] / 100.0)
    }

    fn slider_gradient(&self, idx: usize, color: SolidColor, cache: &HueCache) -> Vec<SolidColor> {
        let ok = cache.okhsl;
        match idx {
            0 => hue_ramp(|h| SolidColor::from_okhsl(h, ok.s, ok.l, 1.0)),
            1 => vec![
                SolidColor::from_okhsl(ok.h, 0.0, ok.l, 1.0),
                SolidColor::from_okhsl(ok.h, 1.0, ok.l, 1.0),
            ],
            2 => vec![
                SolidColor::from_okhsl(ok.h, ok.s, 0.0, 1.0),
                SolidColor::from_okhsl(ok.h, ok.s, 0.5, 1.0),
                SolidColor::from_okhsl(ok.h, ok.s, 1.0, 1.0),
            ],
            _ => channel_ramp(color, ALPHA_SLIDER),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: SolidColor, b: SolidColor, eps: f64) -> bool {
        a.channels()
            .iter()
            .zip(b.channels())
            .all(|(x, y)| (x - y).abs() < eps)
    }

    fn round_trip(kind: ColorModeType, color: SolidColor) -> SolidColor {
        let mode = color_mode(kind);
        let mut cache = HueCache::from_color(color);
        let values = mode.values(color, &cache);
        mode.apply(&values, &mut cache)
    }

    #[test]
    fn red_in_hsv_sliders() {
        let red = SolidColor::from_rgba(1.0, 0.0, 0.0, 1.0);
        let cache = HueCache::from_color(red);
        assert_eq!(HsvMode.values(red, &cache), [0.0, 100.0, 100.0, 100.0]);
    }

    #[test]
    fn rgb_sliders_are_channels_times_255() {
        let c = SolidColor::from_rgb(10, 20, 30);
        let values = RgbMode.values(c, &HueCache::from_color(c));
        assert!((values[0] - 10.0).abs() < 1e-9);
        assert!((values[2] - 30.0).abs() < 1e-9);
        assert!((values[3] - 255.0).abs() < 1e-9);
    }

    #[test]
    fn raw_round_trip_is_exact_for_hdr() {
        let c = SolidColor::from_rgba(3.5, 0.25, 12.0, 0.5);
        assert_eq!(round_trip(ColorModeType::Raw, c), c);
    }

    #[test]
    fn hsv_apply_keeps_hue_at_zero_saturation() {
        let mut cache = HueCache::default();
        let gray = HsvMode.apply(&[200.0, 0.0, 50.0, 100.0], &mut cache);
        assert!((cache.hsv.h - 200.0 / 360.0).abs() < 1e-12);
        assert!(close(gray, SolidColor::from_rgba(0.5, 0.5, 0.5, 1.0), 1e-12));
    }

    #[test]
    fn hue_slider_wraps_at_360() {
        let mut cache = HueCache::default();
        let c = HsvMode.apply(&[360.0, 100.0, 100.0, 100.0], &mut cache);
        assert_eq!(cache.hsv.h, 0.0);
        assert!(close(c, SolidColor::from_rgba(1.0, 0.0, 0.0, 1.0), 1e-12));
    }

    #[test]
    fn slider_snap_and_clamp() {
        let spec = RgbMode.slider(0);
        assert_eq!(spec.snap(300.0), 255.0);
        assert_eq!(spec.snap(-4.0), 0.0);
        assert_eq!(spec.snap(12.4), 12.0);
        let raw = RawMode.slider(0);
        assert!((raw.snap(1.23456) - 1.235).abs() < 1e-9);
    }

    #[test]
    fn slider_counts_follow_alpha_editing() {
        for kind in ColorModeType::ALL {
            assert_eq!(color_mode(kind).slider_count(true), 4);
            assert_eq!(color_mode(kind).slider_count(false), 3);
        }
    }

    #[test]
    fn hex_keeps_alpha_unless_given() {
        let current = SolidColor::from_rgba(0.0, 0.0, 1.0, 0.25);
        let parsed = RgbMode
            .parse_text("FF0000", TextFormat::Hex, current, true)
            .unwrap();
        assert_eq!(parsed, SolidColor::from_rgba(1.0, 0.0, 0.0, 0.25));

        let parsed = RgbMode
            .parse_text("FF000080", TextFormat::Hex, current, true)
            .unwrap();
        assert!((parsed.a() - 128.0 / 255.0).abs() < 1e-12);

        let parsed = RgbMode
            .parse_text("FF000080", TextFormat::Hex, current, false)
            .unwrap();
        assert_eq!(parsed.a(), 0.25);
    }

    #[test]
    fn text_form_depends_on_alpha_editing() {
        let c = SolidColor::from_rgba8(255, 0, 0, 255);
        assert_eq!(RgbMode.format_text(c, TextFormat::Hex, true), "FF0000FF");
        assert_eq!(RgbMode.format_text(c, TextFormat::Hex, false), "FF0000");
        assert_eq!(
            RgbMode.format_text(c, TextFormat::Tuple, true),
            "(1.000, 0.000, 0.000, 1.000)"
        );
    }

    #[test]
    fn raw_always_uses_tuples() {
        let c = SolidColor::from_rgba(2.0, 0.5, 0.0, 1.0);
        assert_eq!(
            RawMode.format_text(c, TextFormat::Hex, false),
            "(2.000, 0.500, 0.000)"
        );
        let parsed = RawMode
            .parse_text("(2, 0.5, 0)", TextFormat::Hex, SolidColor::WHITE, true)
            .unwrap();
        assert_eq!(parsed, SolidColor::from_rgba(2.0, 0.5, 0.0, 1.0));
    }

    #[test]
    fn tuple_errors() {
        let cur = SolidColor::WHITE;
        assert_eq!(
            RgbMode.parse_text("1, 2", TextFormat::Tuple, cur, true),
            Err(ParseColorError::OutOfRange {
                value: 2.0,
                min: 0.0,
                max: 1.0
            })
        );
        assert_eq!(
            RgbMode.parse_text("0.1, 0.2", TextFormat::Tuple, cur, true),
            Err(ParseColorError::ComponentCount(2))
        );
        assert_eq!(
            RgbMode.parse_text("(a, 0, 0)", TextFormat::Tuple, cur, true),
            Err(ParseColorError::InvalidNumber("a".to_string()))
        );
        assert_eq!(
            RgbMode.parse_text("()", TextFormat::Tuple, cur, true),
            Err(ParseColorError::Empty)
        );
    }

    #[test]
    fn hue_gradients_have_rainbow_stops() {
        let c = SolidColor::from_rgba(1.0, 0.0, 0.0, 1.0);
        let cache = HueCache::from_color(c);
        let stops = HsvMode.slider_gradient(0, c, &cache);
        assert_eq!(stops.len(), HUE_STOPS);
        assert!(close(stops[0], stops[HUE_STOPS - 1], 1e-9));
        assert_eq!(RgbMode.slider_gradient(1, c, &cache).len(), 2);
    }

    fn unit() -> impl Strategy<Value = f64> {
        0.0_f64..=1.0
    }

    proptest! {
        #[test]
        fn every_mode_round_trips(r in unit(), g in unit(), b in unit(), a in unit()) {
            let color = SolidColor::from_rgba(r, g, b, a);
            for kind in [ColorModeType::Rgb, ColorModeType::Hsv, ColorModeType::Okhsl] {
                let back = round_trip(kind, color);
                prop_assert!(close(back, color, 1e-4), "{:?}: {:?} -> {:?}", kind, color, back);
            }
            prop_assert_eq!(round_trip(ColorModeType::Raw, color), color);
        }

        #[test]
        fn hex_round_trips_bytes(r in any::<u8>(), g in any::<u8>(), b in any::<u8>(), a in any::<u8>()) {
            let color = SolidColor::from_rgba8(r, g, b, a);
            prop_assert_eq!(SolidColor::from_hex(&color.to_hex(true)), Ok(color));
        }
    }
}

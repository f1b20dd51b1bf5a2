//! SolidColor type: the canonical color representation for floem-prism.
//!
//! Stores RGBA as f64 values, nominally in the 0.0–1.0 range (RAW mode may
//! push channels above 1.0 for HDR colors). Hue-space views of the color are
//! cached in [`HueCache`] so hue survives round-trips through gray.

use crate::error::ParseColorError;
use crate::math;

/// RGBA color with components nominally in the 0.0–1.0 range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidColor {
    r: f64,
    g: f64,
    b: f64,
    a: f64,
}

impl SolidColor {
    pub const WHITE: Self = Self::from_rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::from_rgba(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Self = Self::from_rgba(0.0, 0.0, 0.0, 0.0);

    /// Red component (0.0–1.0).
    pub fn r(&self) -> f64 {
        self.r
    }
    /// Green component (0.0–1.0).
    pub fn g(&self) -> f64 {
        self.g
    }
    /// Blue component (0.0–1.0).
    pub fn b(&self) -> f64 {
        self.b
    }
    /// Alpha component (0.0–1.0).
    pub fn a(&self) -> f64 {
        self.a
    }

    /// Channels in `[r, g, b, a]` order.
    pub fn channels(&self) -> [f64; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }
}

impl Default for SolidColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl SolidColor {
    /// Create from f64 RGBA (all 0.0–1.0).
    pub const fn from_rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Create from 0–255 RGB values with full opacity.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba8(r, g, b, 255)
    }

    /// Create from 0–255 RGBA values.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: a as f64 / 255.0,
        }
    }

    /// Convert to 0–255 RGB tuple. Out-of-range channels saturate.
    pub fn to_rgb(&self) -> (u8, u8, u8) {
        (to_u8(self.r), to_u8(self.g), to_u8(self.b))
    }

    /// Parse a hex string (with or without `#`, 3, 4, 6 or 8 chars).
    ///
    /// 4 and 8-char hex carry alpha (RGBA); 3 and 6-char hex default to full
    /// opacity.
    pub fn from_hex(hex: &str) -> Result<Self, ParseColorError> {
        let (color, _) = parse_hex(hex)?;
        Ok(color)
    }

    /// Format as uppercase hex (no `#` prefix): RRGGBBAA when `with_alpha`,
    /// RRGGBB otherwise.
    pub fn to_hex(&self, with_alpha: bool) -> String {
        let (r, g, b) = self.to_rgb();
        if with_alpha {
            format!("{:02X}{:02X}{:02X}{:02X}", r, g, b, to_u8(self.a))
        } else {
            format!("{:02X}{:02X}{:02X}", r, g, b)
        }
    }

    /// Create from HSV values (all 0.0–1.0).
    pub fn from_hsv(h: f64, s: f64, v: f64, a: f64) -> Self {
        let (r, g, b) = math::hsv_to_rgb(h, s, v);
        Self { r, g, b, a }
    }

    /// Convert to HSV (all 0.0–1.0). Returns (h, s, v).
    ///
    /// Grays report hue 0; use [`HueCache`] to keep a stable hue.
    pub fn to_hsv(&self) -> (f64, f64, f64) {
        math::rgb_to_hsv(self.r, self.g, self.b)
    }

    /// Create from OKHSL values (all 0.0–1.0).
    pub fn from_okhsl(h: f64, s: f64, l: f64, a: f64) -> Self {
        let (r, g, b) = math::okhsl_to_rgb(h, s, l);
        Self { r, g, b, a }
    }

    /// Convert to OKHSL (all 0.0–1.0). Returns (h, s, l).
    pub fn to_okhsl(&self) -> (f64, f64, f64) {
        math::rgb_to_okhsl(self.r, self.g, self.b)
    }
}

fn to_u8(x: f64) -> u8 {
    (x * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Parses hex text. The flag reports whether the text carried alpha digits.
pub(crate) fn parse_hex(hex: &str) -> Result<(SolidColor, bool), ParseColorError> {
    let stripped = hex.trim().trim_start_matches('#');
    if stripped.is_empty() {
        return Err(ParseColorError::Empty);
    }
    if let Some(bad) = stripped.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ParseColorError::InvalidHexDigit(bad));
    }

    let digits: Vec<u8> = match stripped.len() {
        3 | 4 => stripped
            .chars()
            .filter_map(|c| c.to_digit(16))
            .map(|d| d as u8 * 17)
            .collect(),
        6 | 8 => stripped
            .as_bytes()
            .chunks(2)
            .filter_map(|pair| std::str::from_utf8(pair).ok())
            .filter_map(|pair| u8::from_str_radix(pair, 16).ok())
            .collect(),
        n => return Err(ParseColorError::InvalidHexLength(n)),
    };

    match digits.as_slice() {
        [r, g, b] => Ok((SolidColor::from_rgba8(*r, *g, *b, 255), false)),
        [r, g, b, a] => Ok((SolidColor::from_rgba8(*r, *g, *b, *a), true)),
        _ => Err(ParseColorError::InvalidHexLength(stripped.len())),
    }
}

// ── hue-space caches ───────────────────────────────────────────────────

/// Below this value (or saturation) the hue of a color is undefined.
pub(crate) const DEGENERATE_EPSILON: f64 = 1e-4;

/// The two hue-based spaces whose coordinates are cached next to the color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HueSpace {
    Hsv,
    Okhsl,
}

/// Hue/saturation/value, all 0.0–1.0 with hue wrapped to `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

/// OKHSL hue/saturation/lightness, all 0.0–1.0 with hue wrapped to `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Okhsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// Cached hue-space coordinates of the canonical color.
///
/// Hue is undefined for grays and saturation is undefined for black, so the
/// cache keeps the previous values in those cases instead of snapping to 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HueCache {
    pub hsv: Hsv,
    pub okhsl: Okhsl,
}

impl HueCache {
    pub fn from_color(color: SolidColor) -> Self {
        let (h, s, v) = color.to_hsv();
        let (oh, os, ol) = color.to_okhsl();
        Self {
            hsv: Hsv { h, s, v },
            okhsl: Okhsl { h: oh, s: os, l: ol },
        }
    }

    /// Recompute every space except `edited` from `color`.
    ///
    /// `edited` names the space the change came from; its coordinates are
    /// already authoritative and must not be rounded through RGB.
    pub fn sync_from(&mut self, color: SolidColor, edited: Option<HueSpace>) {
        if edited != Some(HueSpace::Hsv) {
            let (h, s, v) = color.to_hsv();
            let prev = self.hsv;
            self.hsv = if v < DEGENERATE_EPSILON {
                Hsv { h: prev.h, s: prev.s, v }
            } else if s < DEGENERATE_EPSILON {
                Hsv { h: prev.h, s, v }
            } else {
                Hsv { h, s, v }
            };
        }
        if edited != Some(HueSpace::Okhsl) {
            let (h, s, l) = color.to_okhsl();
            let prev = self.okhsl;
            self.okhsl = if l < DEGENERATE_EPSILON || l > 1.0 - DEGENERATE_EPSILON {
                Okhsl { h: prev.h, s: prev.s, l }
            } else if s < DEGENERATE_EPSILON {
                Okhsl { h: prev.h, s, l }
            } else {
                Okhsl { h, s, l }
            };
        }
    }

    /// The color these coordinates describe in `space`, with alpha `a`.
    pub fn color_in(&self, space: HueSpace, a: f64) -> SolidColor {
        match space {
            HueSpace::Hsv => SolidColor::from_hsv(self.hsv.h, self.hsv.s, self.hsv.v, a),
            HueSpace::Okhsl => SolidColor::from_okhsl(self.okhsl.h, self.okhsl.s, self.okhsl.l, a),
        }
    }
}

impl Default for HueCache {
    fn default() -> Self {
        Self::from_color(SolidColor::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_formats() {
        let c = SolidColor::from_rgba8(0x3B, 0x82, 0xF6, 0x80);
        assert_eq!(c.to_hex(true), "3B82F680");
        assert_eq!(c.to_hex(false), "3B82F6");
    }

    #[test]
    fn hex_parsing_accepts_shorthand_and_prefix() {
        assert_eq!(SolidColor::from_hex("#fff"), Ok(SolidColor::WHITE));
        assert_eq!(
            SolidColor::from_hex("F008"),
            Ok(SolidColor::from_rgba8(255, 0, 0, 0x88))
        );
        assert_eq!(
            SolidColor::from_hex("3B82F6"),
            Ok(SolidColor::from_rgb(0x3B, 0x82, 0xF6))
        );
    }

    #[test]
    fn hex_parsing_errors() {
        assert_eq!(SolidColor::from_hex(""), Err(ParseColorError::Empty));
        assert_eq!(
            SolidColor::from_hex("ZZZZZZ"),
            Err(ParseColorError::InvalidHexDigit('Z'))
        );
        assert_eq!(
            SolidColor::from_hex("12345"),
            Err(ParseColorError::InvalidHexLength(5))
        );
    }

    #[test]
    fn hdr_channels_saturate_in_hex() {
        let c = SolidColor::from_rgba(4.0, -1.0, 0.5, 1.0);
        assert_eq!(c.to_hex(false), "FF0080");
    }

    #[test]
    fn gray_keeps_previous_hue() {
        let mut cache = HueCache::from_color(SolidColor::from_hsv(0.6, 0.8, 0.9, 1.0));
        cache.sync_from(SolidColor::from_rgba(0.5, 0.5, 0.5, 1.0), None);
        assert!((cache.hsv.h - 0.6).abs() < 1e-9);
        assert_eq!(cache.hsv.s, 0.0);
        assert!((cache.hsv.v - 0.5).abs() < 1e-9);
    }

    #[test]
    fn black_keeps_previous_hue_and_saturation() {
        let mut cache = HueCache::from_color(SolidColor::from_hsv(0.25, 0.7, 0.9, 1.0));
        cache.sync_from(SolidColor::BLACK, None);
        assert!((cache.hsv.h - 0.25).abs() < 1e-9);
        assert!((cache.hsv.s - 0.7).abs() < 1e-9);
        assert_eq!(cache.hsv.v, 0.0);
    }

    #[test]
    fn edited_space_is_left_alone() {
        let mut cache = HueCache::default();
        cache.hsv = Hsv { h: 0.9, s: 0.0, v: 0.4 };
        let color = cache.color_in(HueSpace::Hsv, 1.0);
        cache.sync_from(color, Some(HueSpace::Hsv));
        assert_eq!(cache.hsv, Hsv { h: 0.9, s: 0.0, v: 0.4 });
    }
}

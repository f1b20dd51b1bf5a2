//! Picker shapes: pointer ⇄ color mapping for the 2D picking area and its
//! companion 1D strip.
//!
//! Positions are in the local coordinates of the region they were reported
//! for. Polar shapes use the disk inscribed in the region; hue runs clockwise
//! on screen (y grows down) starting at 3 o'clock. Points outside a shape are
//! clamped to its boundary, so dragging past the edge picks the edge.

use std::f64::consts::TAU;

use floem::kurbo::{Point, Rect};

use crate::color::{HueCache, HueSpace, SolidColor};

/// Below this fraction of the radius the pointer sits on the disk center,
/// where hue is undefined.
const CENTER_EPSILON: f64 = 1e-9;

/// Which shape the picking area uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PickerShapeType {
    /// Saturation × value square, vertical hue strip.
    #[default]
    HsvRectangle,
    /// Hue × saturation disk, horizontal value bar.
    HsvWheel,
    /// Hue × saturation disk, vertical value strip.
    VhsCircle,
    /// OKHSL hue × saturation disk, vertical lightness strip.
    OkhslCircle,
}

impl PickerShapeType {
    pub const ALL: [PickerShapeType; 4] = [
        Self::HsvRectangle,
        Self::HsvWheel,
        Self::VhsCircle,
        Self::OkhslCircle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::HsvRectangle => "HSV Rectangle",
            Self::HsvWheel => "HSV Wheel",
            Self::VhsCircle => "VHS Circle",
            Self::OkhslCircle => "OKHSL Circle",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::HsvRectangle => Self::HsvWheel,
            Self::HsvWheel => Self::VhsCircle,
            Self::VhsCircle => Self::OkhslCircle,
            Self::OkhslCircle => Self::HsvRectangle,
        }
    }
}

/// Orientation of the companion strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripAxis {
    Horizontal,
    Vertical,
}

/// Pointer-to-local mapping of a rectangular region.
pub struct Region;

impl Region {
    /// `pos` as fractions of `rect`, clamped to `[0, 1]` on both axes.
    pub fn normalize(rect: Rect, pos: Point) -> (f64, f64) {
        let fx = if rect.width() > 0.0 {
            (pos.x - rect.x0) / rect.width()
        } else {
            0.0
        };
        let fy = if rect.height() > 0.0 {
            (pos.y - rect.y0) / rect.height()
        } else {
            0.0
        };
        (fx.clamp(0.0, 1.0), fy.clamp(0.0, 1.0))
    }

    pub fn denormalize(rect: Rect, fx: f64, fy: f64) -> Point {
        Point::new(rect.x0 + fx * rect.width(), rect.y0 + fy * rect.height())
    }

    /// Radius of the disk inscribed in `rect`.
    pub fn disk_radius(rect: Rect) -> f64 {
        rect.width().min(rect.height()) / 2.0
    }

    /// `pos` in polar form around the center of `rect`: `(turns, radius)`
    /// with the radius as a fraction of the inscribed disk, clamped to 1.
    ///
    /// Returns `None` for the turn when `pos` is on the center.
    pub fn polar(rect: Rect, pos: Point) -> (Option<f64>, f64) {
        let center = rect.center();
        let max_r = Self::disk_radius(rect);
        if max_r <= 0.0 {
            return (None, 0.0);
        }
        let dx = pos.x - center.x;
        let dy = pos.y - center.y;
        let frac = ((dx * dx + dy * dy).sqrt() / max_r).min(1.0);
        if frac < CENTER_EPSILON {
            return (None, 0.0);
        }
        let turns = (dy.atan2(dx) / TAU).rem_euclid(1.0);
        (Some(turns), frac)
    }

    pub fn from_polar(rect: Rect, turns: f64, frac: f64) -> Point {
        let center = rect.center();
        let r = frac * Self::disk_radius(rect);
        let angle = turns * TAU;
        Point::new(center.x + angle.cos() * r, center.y + angle.sin() * r)
    }
}

/// One shape topology of the picking area.
pub trait PickerShape {
    fn kind(&self) -> PickerShapeType;

    /// The hue space picks in this shape edit.
    fn hue_space(&self) -> HueSpace {
        HueSpace::Hsv
    }

    /// Whether the picking area is a disk rather than the full rectangle.
    fn is_polar(&self) -> bool {
        true
    }

    /// Update the two area scalars in `cache` from a pointer position.
    fn pick(&self, region: Rect, pos: Point, cache: &mut HueCache);

    /// Where the area cursor belongs for `cache`.
    fn cursor(&self, region: Rect, cache: &HueCache) -> Point;

    fn strip_axis(&self) -> StripAxis {
        StripAxis::Vertical
    }

    /// Set the strip scalar from `t`, the 0.0–1.0 position along the strip
    /// (left-to-right or top-to-bottom).
    fn set_strip(&self, t: f64, cache: &mut HueCache);

    /// Inverse of [`PickerShape::set_strip`].
    fn strip_fraction(&self, cache: &HueCache) -> f64;

    /// Color shown at position `t` along the strip.
    fn strip_color(&self, t: f64, cache: &HueCache) -> SolidColor {
        let mut c = *cache;
        self.set_strip(t, &mut c);
        c.color_in(self.hue_space(), 1.0)
    }

    /// Update the strip scalar in `cache` from a pointer position.
    fn pick_strip(&self, region: Rect, pos: Point, cache: &mut HueCache) {
        let (fx, fy) = Region::normalize(region, pos);
        let t = match self.strip_axis() {
            StripAxis::Horizontal => fx,
            StripAxis::Vertical => fy,
        };
        self.set_strip(t, cache);
    }

    /// Where the strip thumb belongs for `cache`.
    fn strip_cursor(&self, region: Rect, cache: &HueCache) -> Point {
        let t = self.strip_fraction(cache);
        match self.strip_axis() {
            StripAxis::Horizontal => Region::denormalize(region, t, 0.5),
            StripAxis::Vertical => Region::denormalize(region, 0.5, t),
        }
    }
}

/// The shape implementation for `kind`.
pub fn picker_shape(kind: PickerShapeType) -> &'static dyn PickerShape {
    match kind {
        PickerShapeType::HsvRectangle => &HsvRectangle,
        PickerShapeType::HsvWheel => &HsvWheel,
        PickerShapeType::VhsCircle => &VhsCircle,
        PickerShapeType::OkhslCircle => &OkhslCircle,
    }
}

pub struct HsvRectangle;

impl PickerShape for HsvRectangle {
    fn kind(&self) -> PickerShapeType {
        PickerShapeType::HsvRectangle
    }

    fn is_polar(&self) -> bool {
        false
    }

    fn pick(&self, region: Rect, pos: Point, cache: &mut HueCache) {
        let (fx, fy) = Region::normalize(region, pos);
        cache.hsv.s = fx;
        cache.hsv.v = 1.0 - fy;
    }

    fn cursor(&self, region: Rect, cache: &HueCache) -> Point {
        Region::denormalize(region, cache.hsv.s, 1.0 - cache.hsv.v)
    }

    fn set_strip(&self, t: f64, cache: &mut HueCache) {
        cache.hsv.h = t.rem_euclid(1.0);
    }

    fn strip_fraction(&self, cache: &HueCache) -> f64 {
        cache.hsv.h
    }

    // The hue strip is a plain rainbow.
    fn strip_color(&self, t: f64, _cache: &HueCache) -> SolidColor {
        SolidColor::from_hsv(t.rem_euclid(1.0), 1.0, 1.0, 1.0)
    }
}

/// Hue/saturation from a polar position, keeping hue at the center.
fn pick_polar(region: Rect, pos: Point, hue: &mut f64, sat: &mut f64) {
    let (turns, frac) = Region::polar(region, pos);
    if let Some(turns) = turns {
        *hue = turns;
    }
    *sat = frac;
}

pub struct HsvWheel;

impl PickerShape for HsvWheel {
    fn kind(&self) -> PickerShapeType {
        PickerShapeType::HsvWheel
    }

    fn pick(&self, region: Rect, pos: Point, cache: &mut HueCache) {
        pick_polar(region, pos, &mut cache.hsv.h, &mut cache.hsv.s);
    }

    fn cursor(&self, region: Rect, cache: &HueCache) -> Point {
        Region::from_polar(region, cache.hsv.h, cache.hsv.s)
    }

    fn strip_axis(&self) -> StripAxis {
        StripAxis::Horizontal
    }

    // Left = full value, right = black.
    fn set_strip(&self, t: f64, cache: &mut HueCache) {
        cache.hsv.v = 1.0 - t.clamp(0.0, 1.0);
    }

    fn strip_fraction(&self, cache: &HueCache) -> f64 {
        1.0 - cache.hsv.v
    }
}

pub struct VhsCircle;

impl PickerShape for VhsCircle {
    fn kind(&self) -> PickerShapeType {
        PickerShapeType::VhsCircle
    }

    fn pick(&self, region: Rect, pos: Point, cache: &mut HueCache) {
        pick_polar(region, pos, &mut cache.hsv.h, &mut cache.hsv.s);
    }

    fn cursor(&self, region: Rect, cache: &HueCache) -> Point {
        Region::from_polar(region, cache.hsv.h, cache.hsv.s)
    }

    // Top = full value.
    fn set_strip(&self, t: f64, cache: &mut HueCache) {
        cache.hsv.v = 1.0 - t.clamp(0.0, 1.0);
    }

    fn strip_fraction(&self, cache: &HueCache) -> f64 {
        1.0 - cache.hsv.v
    }
}

pub struct OkhslCircle;

impl PickerShape for OkhslCircle {
    fn kind(&self) -> PickerShapeType {
        PickerShapeType::OkhslCircle
    }

    fn hue_space(&self) -> HueSpace {
        HueSpace::Okhsl
    }

    fn pick(&self, region: Rect, pos: Point, cache: &mut HueCache) {
        pick_polar(region, pos, &mut cache.okhsl.h, &mut cache.okhsl.s);
    }

    fn cursor(&self, region: Rect, cache: &HueCache) -> Point {
        Region::from_polar(region, cache.okhsl.h, cache.okhsl.s.min(1.0))
    }

    // Top = full lightness.
    fn set_strip(&self, t: f64, cache: &mut HueCache) {
        cache.okhsl.l = 1.0 - t.clamp(0.0, 1.0);
    }

    fn strip_fraction(&self, cache: &HueCache) -> f64 {
        1.0 - cache.okhsl.l
    }
}

//! Color math: direct conversions without external dependencies.
//! All functions use normalized f64 in 0.0–1.0 for internal use.
//!
//! The OKLab / OKHSL functions follow Björn Ottosson's published reference
//! transform (<https://bottosson.github.io/posts/colorpicker/>), so values
//! match other implementations within float tolerance.

use std::f64::consts::{PI, TAU};

/// HSV → RGB. All values 0.0–1.0.
pub(crate) fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (v, v, v);
    }
    let h6 = (h * 6.0).rem_euclid(6.0);
    let i = h6.floor() as u32;
    let f = h6 - h6.floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match i % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

/// RGB → HSV. All values 0.0–1.0.
pub(crate) fn rgb_to_hsv(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let v = max;
    let s = if max == 0.0 { 0.0 } else { delta / max };

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        ((g - b) / delta).rem_euclid(6.0) / 6.0
    } else if max == g {
        ((b - r) / delta + 2.0) / 6.0
    } else {
        ((r - g) / delta + 4.0) / 6.0
    };

    (h, s, v)
}

// ── sRGB transfer ──────────────────────────────────────────────────────

fn srgb_to_linear(x: f64) -> f64 {
    if x > 0.04045 {
        ((x + 0.055) / 1.055).powf(2.4)
    } else {
        x / 12.92
    }
}

fn linear_to_srgb(x: f64) -> f64 {
    if x > 0.003_130_8 {
        1.055 * x.powf(1.0 / 2.4) - 0.055
    } else {
        12.92 * x
    }
}

// ── OKLab ──────────────────────────────────────────────────────────────

fn linear_srgb_to_oklab(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let l = 0.412_221_470_8 * r + 0.536_332_536_3 * g + 0.051_445_992_9 * b;
    let m = 0.211_903_498_2 * r + 0.680_699_545_1 * g + 0.107_396_956_6 * b;
    let s = 0.088_302_461_9 * r + 0.281_718_837_6 * g + 0.629_978_700_5 * b;

    let l_ = l.cbrt();
    let m_ = m.cbrt();
    let s_ = s.cbrt();

    (
        0.210_454_255_3 * l_ + 0.793_617_785_0 * m_ - 0.004_072_046_8 * s_,
        1.977_998_495_1 * l_ - 2.428_592_205_0 * m_ + 0.450_593_709_9 * s_,
        0.025_904_037_1 * l_ + 0.782_771_766_2 * m_ - 0.808_675_766_0 * s_,
    )
}

fn oklab_to_linear_srgb(l: f64, a: f64, b: f64) -> (f64, f64, f64) {
    let l_ = l + 0.396_337_777_4 * a + 0.215_803_757_3 * b;
    let m_ = l - 0.105_561_345_8 * a - 0.063_854_172_8 * b;
    let s_ = l - 0.089_484_177_5 * a - 1.291_485_548_0 * b;

    let l = l_ * l_ * l_;
    let m = m_ * m_ * m_;
    let s = s_ * s_ * s_;

    (
        4.076_741_662_1 * l - 3.307_711_591_3 * m + 0.230_969_929_2 * s,
        -1.268_438_004_6 * l + 2.609_757_401_1 * m - 0.341_319_396_5 * s,
        -0.004_196_086_3 * l - 0.703_418_614_7 * m + 1.707_614_701_0 * s,
    )
}

/// Maximum saturation `S = C / L` for the hue `(a, b)` (normalized so
/// `a² + b² = 1`) that still fits in the sRGB gamut.
fn compute_max_saturation(a: f64, b: f64) -> f64 {
    // Pick the channel that clips first and the matching polynomial fit.
    let (k0, k1, k2, k3, k4, wl, wm, ws) = if -1.881_703_28 * a - 0.809_364_93 * b > 1.0 {
        (
            1.190_862_77,
            1.765_767_28,
            0.596_626_41,
            0.755_151_97,
            0.567_712_45,
            4.076_741_662_1,
            -3.307_711_591_3,
            0.230_969_929_2,
        )
    } else if 1.814_441_04 * a - 1.194_452_76 * b > 1.0 {
        (
            0.739_565_15,
            -0.459_544_04,
            0.082_854_27,
            0.125_410_70,
            0.145_032_04,
            -1.268_438_004_6,
            2.609_757_401_1,
            -0.341_319_396_5,
        )
    } else {
        (
            1.357_336_52,
            -0.009_157_99,
            -1.151_302_10,
            -0.505_596_06,
            0.006_921_67,
            -0.004_196_086_3,
            -0.703_418_614_7,
            1.707_614_701_0,
        )
    };

    let mut sat = k0 + k1 * a + k2 * b + k3 * a * a + k4 * a * b;

    let k_l = 0.396_337_777_4 * a + 0.215_803_757_3 * b;
    let k_m = -0.105_561_345_8 * a - 0.063_854_172_8 * b;
    let k_s = -0.089_484_177_5 * a - 1.291_485_548_0 * b;

    // One Halley step.
    let l_ = 1.0 + sat * k_l;
    let m_ = 1.0 + sat * k_m;
    let s_ = 1.0 + sat * k_s;

    let l = l_ * l_ * l_;
    let m = m_ * m_ * m_;
    let s = s_ * s_ * s_;

    let l_ds = 3.0 * k_l * l_ * l_;
    let m_ds = 3.0 * k_m * m_ * m_;
    let s_ds = 3.0 * k_s * s_ * s_;

    let l_ds2 = 6.0 * k_l * k_l * l_;
    let m_ds2 = 6.0 * k_m * k_m * m_;
    let s_ds2 = 6.0 * k_s * k_s * s_;

    let f = wl * l + wm * m + ws * s;
    let f1 = wl * l_ds + wm * m_ds + ws * s_ds;
    let f2 = wl * l_ds2 + wm * m_ds2 + ws * s_ds2;

    sat -= f * f1 / (f1 * f1 - 0.5 * f * f2);
    sat
}

#[derive(Clone, Copy)]
struct Cusp {
    l: f64,
    c: f64,
}

fn find_cusp(a: f64, b: f64) -> Cusp {
    let s_cusp = compute_max_saturation(a, b);
    let (r, g, bl) = oklab_to_linear_srgb(1.0, s_cusp * a, s_cusp * b);
    let l_cusp = (1.0 / r.max(g).max(bl)).cbrt();
    Cusp {
        l: l_cusp,
        c: l_cusp * s_cusp,
    }
}

/// Where the line from `(l0, 0)` to `(l1, c1)` leaves the gamut for hue `(a, b)`.
fn find_gamut_intersection(a: f64, b: f64, l1: f64, c1: f64, l0: f64, cusp: Cusp) -> f64 {
    if (l1 - l0) * cusp.c - (cusp.l - l0) * c1 <= 0.0 {
        // Lower half: a triangle edge.
        return cusp.c * l0 / (c1 * cusp.l + cusp.c * (l0 - l1));
    }

    // Upper half: start from the triangle, then refine with one Halley step
    // against each channel.
    let mut t = cusp.c * (l0 - 1.0) / (c1 * (cusp.l - 1.0) + cusp.c * (l0 - l1));

    let dl = l1 - l0;
    let dc = c1;

    let k_l = 0.396_337_777_4 * a + 0.215_803_757_3 * b;
    let k_m = -0.105_561_345_8 * a - 0.063_854_172_8 * b;
    let k_s = -0.089_484_177_5 * a - 1.291_485_548_0 * b;

    let l_dt = dl + dc * k_l;
    let m_dt = dl + dc * k_m;
    let s_dt = dl + dc * k_s;

    let big_l = l0 * (1.0 - t) + t * l1;
    let big_c = t * c1;

    let l_ = big_l + big_c * k_l;
    let m_ = big_l + big_c * k_m;
    let s_ = big_l + big_c * k_s;

    let l = l_ * l_ * l_;
    let m = m_ * m_ * m_;
    let s = s_ * s_ * s_;

    let ldt = 3.0 * l_dt * l_ * l_;
    let mdt = 3.0 * m_dt * m_ * m_;
    let sdt = 3.0 * s_dt * s_ * s_;

    let ldt2 = 6.0 * l_dt * l_dt * l_;
    let mdt2 = 6.0 * m_dt * m_dt * m_;
    let sdt2 = 6.0 * s_dt * s_dt * s_;

    let step = |wl: f64, wm: f64, ws: f64| -> f64 {
        let f = wl * l + wm * m + ws * s - 1.0;
        let f1 = wl * ldt + wm * mdt + ws * sdt;
        let f2 = wl * ldt2 + wm * mdt2 + ws * sdt2;
        let u = f1 / (f1 * f1 - 0.5 * f * f2);
        if u >= 0.0 {
            -f * u
        } else {
            f64::MAX
        }
    };

    let t_r = step(4.076_741_662_1, -3.307_711_591_3, 0.230_969_929_2);
    let t_g = step(-1.268_438_004_6, 2.609_757_401_1, -0.341_319_396_5);
    let t_b = step(-0.004_196_086_3, -0.703_418_614_7, 1.707_614_701_0);

    t += t_r.min(t_g).min(t_b);
    t
}

const TOE_K1: f64 = 0.206;
const TOE_K2: f64 = 0.03;
const TOE_K3: f64 = (1.0 + TOE_K1) / (1.0 + TOE_K2);

/// Lightness estimate that maps OKLab `L` closer to CIELab lightness.
fn toe(x: f64) -> f64 {
    let y = TOE_K3 * x - TOE_K1;
    0.5 * (y + (y * y + 4.0 * TOE_K2 * TOE_K3 * x).sqrt())
}

fn toe_inv(x: f64) -> f64 {
    (x * x + TOE_K1 * x) / (TOE_K3 * (x + TOE_K2))
}

fn st_mid(a: f64, b: f64) -> (f64, f64) {
    let s = 0.115_169_93
        + 1.0
            / (7.447_789_70
                + 4.159_012_40 * b
                + a * (-2.195_573_47
                    + 1.751_984_01 * b
                    + a * (-2.137_049_48
                        - 10.023_010_43 * b
                        + a * (-4.248_945_61 + 5.387_708_19 * b + 4.698_910_13 * a))));
    let t = 0.112_396_42
        + 1.0
            / (1.613_203_20 - 0.681_243_79 * b
                + a * (0.403_706_12
                    + 0.901_481_23 * b
                    + a * (-0.270_879_43
                        + 0.612_239_90 * b
                        + a * (0.002_992_15 - 0.453_995_68 * b - 0.146_618_72 * a))));
    (s, t)
}

/// Chroma anchors `(c_0, c_mid, c_max)` used to map OKHSL saturation.
fn chroma_anchors(l: f64, a: f64, b: f64) -> (f64, f64, f64) {
    let cusp = find_cusp(a, b);
    let c_max = find_gamut_intersection(a, b, l, 1.0, l, cusp);
    let st_max = (cusp.c / cusp.l, cusp.c / (1.0 - cusp.l));

    let k = c_max / (l * st_max.0).min((1.0 - l) * st_max.1);

    let (s_mid, t_mid) = st_mid(a, b);
    let c_a = l * s_mid;
    let c_b = (1.0 - l) * t_mid;
    let c_mid = 0.9 * k * (1.0 / (1.0 / c_a.powi(4) + 1.0 / c_b.powi(4))).sqrt().sqrt();

    let c_a = l * 0.4;
    let c_b = (1.0 - l) * 0.8;
    let c_0 = (1.0 / (1.0 / (c_a * c_a) + 1.0 / (c_b * c_b))).sqrt();

    (c_0, c_mid, c_max)
}

const OK_MID: f64 = 0.8;
const OK_MID_INV: f64 = 1.25;

/// Below this chroma or at the lightness extremes an OKHSL color is gray.
const OK_EPSILON: f64 = 1e-7;

/// OKHSL → sRGB. All values 0.0–1.0 (hue in turns).
pub(crate) fn okhsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    if l >= 1.0 {
        return (1.0, 1.0, 1.0);
    }
    if l <= 0.0 {
        return (0.0, 0.0, 0.0);
    }

    let a_ = (TAU * h).cos();
    let b_ = (TAU * h).sin();
    let big_l = toe_inv(l);

    let c = if s <= 0.0 {
        0.0
    } else {
        let (c_0, c_mid, c_max) = chroma_anchors(big_l, a_, b_);
        if s < OK_MID {
            let t = OK_MID_INV * s;
            let k_1 = OK_MID * c_0;
            let k_2 = 1.0 - k_1 / c_mid;
            t * k_1 / (1.0 - k_2 * t)
        } else {
            let t = (s - OK_MID) / (1.0 - OK_MID);
            let k_0 = c_mid;
            let k_1 = (1.0 - OK_MID) * c_mid * c_mid * OK_MID_INV * OK_MID_INV / c_0;
            let k_2 = 1.0 - k_1 / (c_max - c_mid);
            k_0 + t * k_1 / (1.0 - k_2 * t)
        }
    };

    let (r, g, b) = oklab_to_linear_srgb(big_l, c * a_, c * b_);
    (linear_to_srgb(r), linear_to_srgb(g), linear_to_srgb(b))
}

/// sRGB → OKHSL. Returns `(h, s, l)`, hue in turns.
///
/// Grays report hue 0 and saturation 0; callers that need a stable hue keep
/// their previous value for those (see [`crate::color::HueCache`]).
pub(crate) fn rgb_to_okhsl(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let (big_l, a, bb) = linear_srgb_to_oklab(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b));
    let l = toe(big_l);

    let c = (a * a + bb * bb).sqrt();
    if c < OK_EPSILON || big_l <= OK_EPSILON || big_l >= 1.0 - OK_EPSILON {
        return (0.0, 0.0, l);
    }

    let a_ = a / c;
    let b_ = bb / c;
    let h = 0.5 + 0.5 * (-bb).atan2(-a) / PI;

    let (c_0, c_mid, c_max) = chroma_anchors(big_l, a_, b_);
    let s = if c < c_mid {
        let k_1 = OK_MID * c_0;
        let k_2 = 1.0 - k_1 / c_mid;
        let t = c / (k_1 + k_2 * c);
        t * OK_MID
    } else {
        let k_0 = c_mid;
        let k_1 = (1.0 - OK_MID) * c_mid * c_mid * OK_MID_INV * OK_MID_INV / c_0;
        let k_2 = 1.0 - k_1 / (c_max - c_mid);
        let t = (c - k_0) / (k_1 + k_2 * (c - k_0));
        OK_MID + (1.0 - OK_MID) * t
    };

    (h.rem_euclid(1.0), s, l)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f64, f64, f64), b: (f64, f64, f64), eps: f64) -> bool {
        (a.0 - b.0).abs() < eps && (a.1 - b.1).abs() < eps && (a.2 - b.2).abs() < eps
    }

    #[test]
    fn hsv_primaries() {
        assert!(close(rgb_to_hsv(1.0, 0.0, 0.0), (0.0, 1.0, 1.0), 1e-12));
        assert!(close(rgb_to_hsv(0.0, 1.0, 0.0), (1.0 / 3.0, 1.0, 1.0), 1e-12));
        assert!(close(hsv_to_rgb(2.0 / 3.0, 1.0, 1.0), (0.0, 0.0, 1.0), 1e-12));
        // Hue 1.0 wraps onto red.
        assert!(close(hsv_to_rgb(1.0, 1.0, 1.0), (1.0, 0.0, 0.0), 1e-12));
    }

    #[test]
    fn oklab_white_is_unit_lightness() {
        let (l, a, b) = linear_srgb_to_oklab(1.0, 1.0, 1.0);
        assert!((l - 1.0).abs() < 1e-4);
        assert!(a.abs() < 1e-4 && b.abs() < 1e-4);
    }

    #[test]
    fn okhsl_extremes() {
        assert!(close(okhsl_to_rgb(0.3, 0.7, 1.0), (1.0, 1.0, 1.0), 1e-12));
        assert!(close(okhsl_to_rgb(0.3, 0.7, 0.0), (0.0, 0.0, 0.0), 1e-12));
        let (_, s, l) = rgb_to_okhsl(0.5, 0.5, 0.5);
        assert_eq!(s, 0.0);
        assert!(l > 0.0 && l < 1.0);
    }

    #[test]
    fn okhsl_primaries_are_saturated() {
        for (r, g, b) in [(1.0, 0.0, 0.0), (0.0, 1.0, 0.0), (0.0, 0.0, 1.0)] {
            let (_, s, _) = rgb_to_okhsl(r, g, b);
            assert!((s - 1.0).abs() < 1e-2, "saturation {s} for {r},{g},{b}");
        }
    }

    #[test]
    fn okhsl_round_trip_mid_tones() {
        for rgb in [(0.8, 0.2, 0.1), (0.1, 0.6, 0.3), (0.25, 0.3, 0.9), (0.95, 0.9, 0.2)] {
            let (h, s, l) = rgb_to_okhsl(rgb.0, rgb.1, rgb.2);
            let back = okhsl_to_rgb(h, s, l);
            assert!(close(back, rgb, 1e-6), "{rgb:?} -> {back:?}");
        }
    }
}

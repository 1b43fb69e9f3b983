//! sRGB → CIE L*a*b* conversion (D65) with fixed matrix coefficients.
//!
//! `palette` ships its own conversion, but its matrix and white point constants
//! differ in the last digits from the ones the palette distances were tuned on,
//! so the math is spelled out here and only the `Lab` container is borrowed.

use palette::Lab;
use palette::white_point::D65;

use crate::RgbColor;

/// A color in CIE L*a*b* space relative to the D65 white point.
pub type LabColor = Lab<D65, f64>;

// D65 reference white.
const XN: f64 = 0.95047;
const YN: f64 = 1.0;
const ZN: f64 = 1.08883;

const DELTA: f64 = 6.0 / 29.0;

/// Undo the sRGB transfer curve for a channel normalised to [0, 1].
#[inline(always)]
fn srgb_to_linear(c: f64) -> f64 {
    if c > 0.04045 {
        ((c + 0.055) / 1.055).powf(2.4)
    } else {
        c / 12.92
    }
}

#[inline(always)]
fn lab_f(t: f64) -> f64 {
    if t > DELTA * DELTA * DELTA {
        t.cbrt()
    } else {
        t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
    }
}

/// Convert an 8-bit sRGB color to L*a*b*.
///
/// Steps performed:
/// 1. Normalise every channel to [0, 1] and linearise it.
/// 2. Project onto CIE XYZ with the sRGB/D65 matrix.
/// 3. Scale by the reference white and apply the L*a*b* companding function.
pub fn srgb_to_lab(rgb: RgbColor) -> LabColor {
    let r = srgb_to_linear(rgb.red as f64 / 255.0);
    let g = srgb_to_linear(rgb.green as f64 / 255.0);
    let b = srgb_to_linear(rgb.blue as f64 / 255.0);

    let x = 0.4124564 * r + 0.3575761 * g + 0.1804375 * b;
    let y = 0.2126729 * r + 0.7151522 * g + 0.0721750 * b;
    let z = 0.0193339 * r + 0.1191920 * g + 0.9503041 * b;

    let fx = lab_f(x / XN);
    let fy = lab_f(y / YN);
    let fz = lab_f(z / ZN);

    Lab::new(116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz))
}

/// Euclidean distance between two L*a*b* colors (CIE76 ΔE).
#[inline]
pub fn delta_e(lhs: &LabColor, rhs: &LabColor) -> f64 {
    let dl = lhs.l - rhs.l;
    let da = lhs.a - rhs.a;
    let db = lhs.b - rhs.b;
    (dl * dl + da * da + db * db).sqrt()
}

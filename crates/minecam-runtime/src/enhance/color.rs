//! 8-bit BGR ↔ CIE L\*a\*b\* conversion (D65, sRGB transfer curve).
//!
//! L is scaled to `0..=255`, a and b are offset by 128, matching the usual
//! 8-bit Lab encoding.

use std::sync::LazyLock;

const XN: f32 = 0.950_456;
const ZN: f32 = 1.088_754;
const EPS: f32 = 0.008_856;

/// sRGB-encoded byte → linear light.
static LINEAR: LazyLock<[f32; 256]> = LazyLock::new(|| {
    let mut table = [0.0; 256];
    for (i, v) in table.iter_mut().enumerate() {
        let c = i as f32 / 255.0;
        *v = if c <= 0.040_45 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        };
    }
    table
});

fn f(t: f32) -> f32 {
    if t > EPS {
        t.cbrt()
    } else {
        7.787f32.mul_add(t, 16.0 / 116.0)
    }
}

fn f_inv(t: f32) -> f32 {
    let cube = t * t * t;
    if cube > EPS {
        cube
    } else {
        (t - 16.0 / 116.0) / 7.787
    }
}

fn encode(linear: f32) -> u8 {
    let c = linear.clamp(0.0, 1.0);
    let v = if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055f32.mul_add(c.powf(1.0 / 2.4), -0.055)
    };
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Convert one BGR pixel to 8-bit Lab.
pub fn bgr_to_lab(b: u8, g: u8, r: u8) -> [u8; 3] {
    let (r, g, b) = (
        LINEAR[usize::from(r)],
        LINEAR[usize::from(g)],
        LINEAR[usize::from(b)],
    );

    let x = 0.180_423f32.mul_add(b, 0.412_453f32.mul_add(r, 0.357_580 * g)) / XN;
    let y = 0.072_169f32.mul_add(b, 0.212_671f32.mul_add(r, 0.715_160 * g));
    let z = 0.950_227f32.mul_add(b, 0.019_334f32.mul_add(r, 0.119_193 * g)) / ZN;

    let l = if y > EPS {
        116.0f32.mul_add(y.cbrt(), -16.0)
    } else {
        903.3 * y
    };
    let (fx, fy, fz) = (f(x), f(y), f(z));
    let a = 500.0f32.mul_add(fx - fy, 128.0);
    let bb = 200.0f32.mul_add(fy - fz, 128.0);

    [
        (l * 255.0 / 100.0).round().clamp(0.0, 255.0) as u8,
        a.round().clamp(0.0, 255.0) as u8,
        bb.round().clamp(0.0, 255.0) as u8,
    ]
}

/// Convert one 8-bit Lab pixel back to BGR.
pub fn lab_to_bgr(l: u8, a: u8, b: u8) -> [u8; 3] {
    let l = f32::from(l) * 100.0 / 255.0;
    let a = f32::from(a) - 128.0;
    let b = f32::from(b) - 128.0;

    let fy = (l + 16.0) / 116.0;
    let y = if l > 903.3 * EPS { fy * fy * fy } else { l / 903.3 };
    let x = f_inv(fy + a / 500.0) * XN;
    let z = f_inv(fy - b / 200.0) * ZN;

    let r = (-0.498_535f32).mul_add(z, 3.240_479f32.mul_add(x, -1.537_150 * y));
    let g = 0.041_556f32.mul_add(z, (-0.969_256f32).mul_add(x, 1.875_991 * y));
    let bl = 1.057_311f32.mul_add(z, 0.055_648f32.mul_add(x, -0.204_043 * y));

    [encode(bl), encode(g), encode(r)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_greys_have_centered_chroma() {
        for v in [0u8, 64, 128, 200, 255] {
            let [_, a, b] = bgr_to_lab(v, v, v);
            assert!((i32::from(a) - 128).abs() <= 1, "a={a} for grey {v}");
            assert!((i32::from(b) - 128).abs() <= 1, "b={b} for grey {v}");
        }
        assert_eq!(bgr_to_lab(0, 0, 0)[0], 0);
        assert_eq!(bgr_to_lab(255, 255, 255)[0], 255);
    }

    #[test]
    fn roundtrip_is_close() {
        for &(b, g, r) in &[(10u8, 200u8, 30u8), (255, 0, 0), (90, 90, 180), (3, 7, 11)] {
            let [l, a, bb] = bgr_to_lab(b, g, r);
            let back = lab_to_bgr(l, a, bb);
            for (orig, got) in [b, g, r].iter().zip(back) {
                assert!(
                    (i32::from(*orig) - i32::from(got)).abs() <= 8,
                    "({b},{g},{r}) -> {back:?}"
                );
            }
        }
    }
}

//! Point and neighbourhood filters on BGR24 frames.

use super::lut::saturate;
use crate::frame::Frame;

/// Sharpen kernel weights: centre and each of the 8 neighbours.
const SHARPEN_CENTER: f32 = 1.8;
const SHARPEN_NEIGHBOR: f32 = -0.1;

/// Gamma table: `trunc((i / 255)^(1 / gamma) * 255)`.
pub fn gamma_table(gamma: f64) -> [u8; 256] {
    let inv = 1.0 / gamma;
    let mut table = [0u8; 256];
    for (i, v) in table.iter_mut().enumerate() {
        *v = ((i as f64 / 255.0).powf(inv) * 255.0) as u8;
    }
    table
}

/// Apply gamma correction to every channel. Non-positive gamma is ignored.
pub fn apply_gamma(frame: &mut Frame, gamma: f64) {
    if gamma <= 0.0 || !gamma.is_finite() {
        return;
    }
    let table = gamma_table(gamma);
    for v in frame.data_mut() {
        *v = table[usize::from(*v)];
    }
}

/// Mirror an out-of-range index back into `0..n` without repeating the
/// edge sample (`-1 -> 1`, `n -> n - 2`).
fn reflect101(i: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let n = n as isize;
    let mut i = i;
    while i < 0 || i >= n {
        i = if i < 0 { -i } else { 2 * n - i - 2 };
    }
    i as usize
}

/// 3x3 sharpen with reflected borders.
pub fn sharpen(frame: &Frame) -> Frame {
    let width = frame.width() as usize;
    let height = frame.height() as usize;
    let src = frame.data();
    let mut out = Frame::blank(frame.width(), frame.height());
    let dst = out.data_mut();

    for y in 0..height {
        let rows = [
            reflect101(y as isize - 1, height),
            y,
            reflect101(y as isize + 1, height),
        ];
        for x in 0..width {
            let cols = [
                reflect101(x as isize - 1, width),
                x,
                reflect101(x as isize + 1, width),
            ];
            for c in 0..3 {
                let mut neighbors = 0.0f32;
                for &ry in &rows {
                    for &cx in &cols {
                        neighbors += f32::from(src[(ry * width + cx) * 3 + c]);
                    }
                }
                let center = f32::from(src[(y * width + x) * 3 + c]);
                neighbors -= center;
                let v = SHARPEN_CENTER.mul_add(center, SHARPEN_NEIGHBOR * neighbors);
                dst[(y * width + x) * 3 + c] = v.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    out
}

/// Subtract `strength ×` the min-max normalized dark channel.
pub fn defog(frame: &mut Frame, strength: f64) {
    if strength <= 0.0 {
        return;
    }
    let dark: Vec<u8> = frame
        .data()
        .chunks_exact(3)
        .map(|px| px[0].min(px[1]).min(px[2]))
        .collect();
    let (Some(&lo), Some(&hi)) = (dark.iter().min(), dark.iter().max()) else {
        return;
    };
    if hi == lo {
        // Normalizes to all zeros.
        return;
    }
    let scale = 255.0 / f64::from(hi - lo);

    for (px, &d) in frame.data_mut().chunks_exact_mut(3).zip(&dark) {
        let norm = (f64::from(d - lo) * scale).round();
        for v in px {
            *v = saturate(strength.mul_add(-norm, f64::from(*v)));
        }
    }
}

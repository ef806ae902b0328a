//! Contrast-limited adaptive histogram equalization on a single 8-bit plane.
//!
//! The plane is split into a grid of tiles. Each tile gets a clipped,
//! equalized mapping, and every pixel is mapped by bilinear interpolation
//! between the four nearest tile centres.

/// CLAHE configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clahe {
    pub clip_limit: f64,
    pub tiles_x: usize,
    pub tiles_y: usize,
}

impl Clahe {
    pub fn new(clip_limit: f64, (tiles_x, tiles_y): (u32, u32)) -> Self {
        Self {
            clip_limit,
            tiles_x: (tiles_x as usize).max(1),
            tiles_y: (tiles_y as usize).max(1),
        }
    }

    /// Equalize `plane` (row-major, `width * height` bytes) in place.
    pub fn apply(&self, plane: &mut [u8], width: usize, height: usize) {
        if width == 0 || height == 0 {
            return;
        }
        let tx = self.tiles_x.min(width);
        let ty = self.tiles_y.min(height);
        let xs = bounds(width, tx);
        let ys = bounds(height, ty);

        let mut luts = vec![[0u8; 256]; tx * ty];
        for j in 0..ty {
            for i in 0..tx {
                luts[j * tx + i] =
                    self.tile_lut(plane, width, (xs[i], xs[i + 1]), (ys[j], ys[j + 1]));
            }
        }

        let cols = interpolation(&xs, width);
        let rows = interpolation(&ys, height);

        for (y, &(j0, j1, wy)) in rows.iter().enumerate() {
            let row = &mut plane[y * width..(y + 1) * width];
            for (x, &(i0, i1, wx)) in cols.iter().enumerate() {
                let v = usize::from(row[x]);
                let tl = f32::from(luts[j0 * tx + i0][v]);
                let tr = f32::from(luts[j0 * tx + i1][v]);
                let bl = f32::from(luts[j1 * tx + i0][v]);
                let br = f32::from(luts[j1 * tx + i1][v]);
                let top = (tr - tl).mul_add(wx, tl);
                let bottom = (br - bl).mul_add(wx, bl);
                row[x] = (bottom - top).mul_add(wy, top).round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    fn tile_lut(
        &self,
        plane: &[u8],
        width: usize,
        (x0, x1): (usize, usize),
        (y0, y1): (usize, usize),
    ) -> [u8; 256] {
        let mut hist = [0u32; 256];
        for y in y0..y1 {
            for &v in &plane[y * width + x0..y * width + x1] {
                hist[usize::from(v)] += 1;
            }
        }

        let area = ((x1 - x0) * (y1 - y0)) as u32;
        if self.clip_limit > 0.0 {
            let limit = ((self.clip_limit * f64::from(area) / 256.0) as u32).max(1);
            clip_histogram(&mut hist, limit);
        }

        let scale = 255.0 / area.max(1) as f32;
        let mut lut = [0u8; 256];
        let mut sum = 0u32;
        for (slot, &count) in lut.iter_mut().zip(hist.iter()) {
            sum += count;
            *slot = (sum as f32 * scale).round().clamp(0.0, 255.0) as u8;
        }
        lut
    }
}

/// Clip bins at `limit` and spread the excess evenly, remainder in strides.
fn clip_histogram(hist: &mut [u32; 256], limit: u32) {
    let mut excess = 0u32;
    for bin in hist.iter_mut() {
        if *bin > limit {
            excess += *bin - limit;
            *bin = limit;
        }
    }

    let batch = excess / 256;
    let residual = (excess % 256) as usize;
    for bin in hist.iter_mut() {
        *bin += batch;
    }
    if residual > 0 {
        let step = (256 / residual).max(1);
        for bin in hist.iter_mut().step_by(step).take(residual) {
            *bin += 1;
        }
    }
}

/// Tile boundaries: `n + 1` offsets splitting `len` as evenly as possible.
fn bounds(len: usize, n: usize) -> Vec<usize> {
    (0..=n).map(|i| i * len / n).collect()
}

/// For each coordinate, the two neighbouring tiles and the weight of the
/// second one.
fn interpolation(bounds: &[usize], len: usize) -> Vec<(usize, usize, f32)> {
    let n = bounds.len() - 1;
    let centers: Vec<f32> = bounds
        .windows(2)
        .map(|w| (w[0] + w[1]) as f32 / 2.0 - 0.5)
        .collect();

    (0..len)
        .map(|p| {
            let p = p as f32;
            if p <= centers[0] {
                return (0, 0, 0.0);
            }
            if p >= centers[n - 1] {
                return (n - 1, n - 1, 0.0);
            }
            let i = centers.iter().rposition(|&c| c <= p).unwrap_or(0);
            let i1 = (i + 1).min(n - 1);
            let span = centers[i1] - centers[i];
            let w = if span > 0.0 {
                (p - centers[i]) / span
            } else {
                0.0
            };
            (i, i1, w)
        })
        .collect()
}

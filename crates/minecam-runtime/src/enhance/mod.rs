//! Frame enhancement pipeline.
//!
//! Stages run in a fixed order for every processed frame:
//!
//! 1. LUT colour mapping (when a LUT is loaded and enabled)
//! 2. Gamma correction (when the effective gamma is not 1)
//! 3. CLAHE on the Lab lightness channel (when enabled)
//! 4. Sharpening
//! 5. Dark-channel defogging (when enabled)

mod clahe;
mod color;
mod filters;
mod lut;
mod npy;

pub use clahe::Clahe;
pub use color::{bgr_to_lab, lab_to_bgr};
pub use filters::{apply_gamma, defog, gamma_table, sharpen};
pub use lut::Lut;
pub use npy::{NpyArray, NpyError, parse as parse_npy};

use minecam_core::EnhanceParams;

use crate::frame::Frame;

/// Per-camera enhancer. Holds the camera's LUT; everything else comes from
/// the parameters passed with each frame.
#[derive(Debug, Clone, Default)]
pub struct Enhancer {
    lut: Option<Lut>,
}

impl Enhancer {
    pub const fn new(lut: Option<Lut>) -> Self {
        Self { lut }
    }

    pub const fn has_lut(&self) -> bool {
        self.lut.is_some()
    }

    /// Run the full pipeline and return the enhanced frame.
    pub fn enhance(&self, frame: &Frame, params: &EnhanceParams) -> Frame {
        let mut result = frame.clone();

        if let Some(lut) = self.lut.as_ref().filter(|_| params.lut_enabled) {
            lut.apply(&mut result, params.lut_strength);
        }

        let gamma = params.effective_gamma();
        if (gamma - 1.0).abs() > f64::EPSILON {
            apply_gamma(&mut result, gamma);
        }

        if params.clahe_enabled {
            apply_clahe(
                &mut result,
                &Clahe::new(params.clahe_clip_limit, params.clahe_tile_grid_size),
            );
        }

        let mut result = sharpen(&result);

        if params.defogging_enabled {
            defog(&mut result, params.defogging_strength);
        }

        result
    }
}

/// Equalize the lightness channel of a BGR frame.
fn apply_clahe(frame: &mut Frame, clahe: &Clahe) {
    let width = frame.width() as usize;
    let height = frame.height() as usize;

    let mut lab: Vec<[u8; 3]> = frame
        .data()
        .chunks_exact(3)
        .map(|px| bgr_to_lab(px[0], px[1], px[2]))
        .collect();
    let mut lightness: Vec<u8> = lab.iter().map(|p| p[0]).collect();

    clahe.apply(&mut lightness, width, height);

    for (p, l) in lab.iter_mut().zip(lightness) {
        p[0] = l;
    }
    for (px, [l, a, b]) in frame.data_mut().chunks_exact_mut(3).zip(lab) {
        px.copy_from_slice(&lab_to_bgr(l, a, b));
    }
}

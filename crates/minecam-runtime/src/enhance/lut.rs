//! Per-channel colour lookup tables.

use std::path::Path;

use tracing::{info, warn};

use super::npy::{self, NpyError};
use crate::error::PipelineError;
use crate::frame::Frame;

/// A 256-entry table per colour channel, indexed `[value][channel]` with
/// channels in the frame's B, G, R order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lut {
    table: Box<[[u8; 3]; 256]>,
}

impl Lut {
    pub fn from_table(table: [[u8; 3]; 256]) -> Self {
        Self {
            table: Box::new(table),
        }
    }

    /// Identity mapping.
    pub fn identity() -> Self {
        let mut table = [[0u8; 3]; 256];
        for (i, row) in table.iter_mut().enumerate() {
            *row = [i as u8; 3];
        }
        Self::from_table(table)
    }

    /// Parse a `(256, 3)` `.npy` array.
    ///
    /// Values are truncated toward zero and clamped into `0..=255`.
    pub fn from_npy(bytes: &[u8]) -> Result<Self, NpyError> {
        let array = npy::parse(bytes)?;
        if array.shape != [256, 3] {
            return Err(NpyError::Shape {
                expected: vec![256, 3],
                actual: array.shape,
            });
        }
        let mut table = [[0u8; 3]; 256];
        for (row, values) in table.iter_mut().zip(array.values.chunks_exact(3)) {
            for (slot, &v) in row.iter_mut().zip(values) {
                *slot = v as u8;
            }
        }
        Ok(Self::from_table(table))
    }

    /// Load a LUT file.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let bytes = std::fs::read(path).map_err(|source| PipelineError::LutRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_npy(&bytes).map_err(|source| PipelineError::InvalidLut {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a camera's LUT, treating every failure as "no LUT".
    pub fn load_optional(camera_id: &str, path: Option<&str>) -> Option<Self> {
        let Some(path) = path.filter(|p| !p.is_empty()).map(Path::new) else {
            warn!(camera_id, "No LUT configured");
            return None;
        };
        if !path.exists() {
            warn!(camera_id, path = %path.display(), "LUT file not found");
            return None;
        }
        match Self::load(path) {
            Ok(lut) => {
                info!(camera_id, path = %path.display(), "LUT loaded");
                Some(lut)
            }
            Err(e) => {
                warn!(camera_id, error = %e, "LUT rejected");
                None
            }
        }
    }

    pub fn get(&self, value: u8, channel: usize) -> u8 {
        self.table[usize::from(value)][channel]
    }

    /// Map every pixel through the table, blending with the original when
    /// `strength < 1`.
    pub fn apply(&self, frame: &mut Frame, strength: f64) {
        if strength >= 1.0 {
            for px in frame.data_mut().chunks_exact_mut(3) {
                for (c, v) in px.iter_mut().enumerate() {
                    *v = self.table[usize::from(*v)][c];
                }
            }
            return;
        }

        let keep = 1.0 - strength;
        for px in frame.data_mut().chunks_exact_mut(3) {
            for (c, v) in px.iter_mut().enumerate() {
                let mapped = f64::from(self.table[usize::from(*v)][c]);
                *v = saturate(f64::from(*v).mul_add(keep, mapped * strength));
            }
        }
    }
}

/// Round to nearest and clamp into `0..=255`.
pub(crate) fn saturate(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

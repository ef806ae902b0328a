//! Packed BGR24 frames.

use crate::error::PipelineError;

/// Default decode width.
pub const DEFAULT_WIDTH: u32 = 960;
/// Default decode height.
pub const DEFAULT_HEIGHT: u32 = 540;

/// A packed BGR24 image, row-major with no padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Frame {
    /// Wrap a raw buffer of exactly `width * height * 3` bytes.
    pub fn from_bgr(width: u32, height: u32, data: Vec<u8>) -> Result<Self, PipelineError> {
        let expected = byte_len(width, height);
        if data.len() != expected {
            return Err(PipelineError::FrameSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A black frame.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; byte_len(width, height)],
        }
    }

    /// The placeholder shown while a camera has produced nothing yet.
    pub fn placeholder() -> Self {
        Self::blank(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub const fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Byte length of a BGR24 frame.
pub const fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 3
}

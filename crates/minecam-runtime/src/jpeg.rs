//! JPEG encoding for the MJPEG stream.

use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;

use crate::error::PipelineError;
use crate::frame::Frame;

/// Quality used for every streamed frame.
pub const JPEG_QUALITY: u8 = 85;

/// Encode a BGR24 frame as a baseline JPEG.
pub fn encode_jpeg(frame: &Frame, quality: u8) -> Result<Vec<u8>, PipelineError> {
    let mut rgb = Vec::with_capacity(frame.data().len());
    for px in frame.data().chunks_exact(3) {
        rgb.extend_from_slice(&[px[2], px[1], px[0]]);
    }

    let mut out = Vec::with_capacity(rgb.len() / 8);
    JpegEncoder::new_with_quality(&mut out, quality)
        .encode(&rgb, frame.width(), frame.height(), ExtendedColorType::Rgb8)
        .map_err(|e| PipelineError::Encode(e.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_soi_and_eoi_markers() {
        let jpeg = encode_jpeg(&Frame::blank(16, 8), JPEG_QUALITY).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
        assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
    }
}

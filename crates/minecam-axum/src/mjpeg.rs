//! MJPEG streaming of a camera's latest frames.
//!
//! Browsers render `multipart/x-mixed-replace` bodies in a plain `<img>`
//! tag, replacing the picture with every part. Each part is one JPEG.

use std::convert::Infallible;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use async_stream::stream;
use axum::body::Body;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::{Bytes, BytesMut};
use futures_util::Stream;
use minecam_core::StreamKind;
use minecam_runtime::{Frame, JPEG_QUALITY, VideoStreamProcessor, encode_jpeg};
use tokio::time::{MissedTickBehavior, interval};
use tracing::warn;

/// Multipart boundary between frames.
pub const BOUNDARY: &str = "frame";

/// Upper bound on frames sent per second to one client.
pub const MAX_STREAM_FPS: u32 = 25;

/// Part sent while a camera has not published a frame yet.
static BLANK_PART: LazyLock<Option<Bytes>> = LazyLock::new(|| {
    encode_jpeg(&Frame::placeholder(), JPEG_QUALITY)
        .map(|jpeg| frame_part(&jpeg))
        .map_err(|e| warn!(error = %e, "Failed to encode the blank frame"))
        .ok()
});

/// Wrap one JPEG into a multipart part.
pub fn frame_part(jpeg: &[u8]) -> Bytes {
    let header = format!(
        "--{BOUNDARY}\r\nContent-Type: image/jpeg\r\nContent-Length: {}\r\n\r\n",
        jpeg.len()
    );
    let mut part = BytesMut::with_capacity(header.len() + jpeg.len() + 2);
    part.extend_from_slice(header.as_bytes());
    part.extend_from_slice(jpeg);
    part.extend_from_slice(b"\r\n");
    part.freeze()
}

async fn encode_part(frame: Arc<Frame>) -> Option<Bytes> {
    match tokio::task::spawn_blocking(move || encode_jpeg(&frame, JPEG_QUALITY)).await {
        Ok(Ok(jpeg)) => Some(frame_part(&jpeg)),
        Ok(Err(e)) => {
            warn!(error = %e, "JPEG encoding failed");
            None
        }
        Err(e) => {
            warn!(error = %e, "JPEG encoding task failed");
            None
        }
    }
}

fn latest(processor: &VideoStreamProcessor, kind: StreamKind) -> Option<Arc<Frame>> {
    match kind {
        StreamKind::Raw => processor.original_frame(),
        StreamKind::Enhanced => processor.enhanced_frame(),
    }
}

/// Endless stream of parts, at most [`MAX_STREAM_FPS`] per second.
///
/// A frame that has not changed since the last tick is re-sent without
/// encoding it again. The stream ends when the client disconnects and the
/// body is dropped.
pub fn frame_stream(
    processor: Arc<VideoStreamProcessor>,
    kind: StreamKind,
) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static {
    stream! {
        let mut ticker = interval(Duration::from_secs(1) / MAX_STREAM_FPS);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last: Option<(Arc<Frame>, Bytes)> = None;

        loop {
            ticker.tick().await;

            let Some(frame) = latest(&processor, kind) else {
                if let Some(blank) = BLANK_PART.as_ref() {
                    yield Ok(blank.clone());
                }
                continue;
            };

            let cached = last
                .as_ref()
                .filter(|(previous, _)| Arc::ptr_eq(previous, &frame))
                .map(|(_, part)| part.clone());
            let part = match cached {
                Some(part) => part,
                None => match encode_part(Arc::clone(&frame)).await {
                    Some(part) => {
                        last = Some((frame, part.clone()));
                        part
                    }
                    None => continue,
                },
            };
            yield Ok(part);
        }
    }
}

/// Streaming response with no-cache headers.
pub fn mjpeg_response(processor: Arc<VideoStreamProcessor>, kind: StreamKind) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/x-mixed-replace; boundary={BOUNDARY}"),
        )
        .header(header::CACHE_CONTROL, "no-cache, no-store, must-revalidate")
        .header(header::PRAGMA, "no-cache")
        .header(header::EXPIRES, "0")
        .body(Body::from_stream(frame_stream(processor, kind)))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

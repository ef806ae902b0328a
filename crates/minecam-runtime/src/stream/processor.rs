//! Per-camera decode → enhance → publish loop.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use minecam_core::EnhanceParamsStore;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::{Child, ChildStdout};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::enhance::{Enhancer, Lut};
use crate::ffmpeg::{FfmpegCommand, HwAccel, PROBE_TIMEOUT, rtsp_available, shutdown_child};
use crate::fps::FpsMeter;
use crate::frame::{self, DEFAULT_HEIGHT, DEFAULT_WIDTH, Frame};
use crate::logs::StreamLogBuffer;

/// Consecutive failed reads tolerated before a processor gives up.
pub const MAX_RESTARTS: u32 = 3;

/// Only every Nth decoded frame is enhanced and published.
pub const PROCESS_EVERY: u64 = 3;

/// Enhancement slower than this is logged.
const SLOW_FRAME: Duration = Duration::from_millis(50);

/// Latest published frame.
pub type SharedFrame = Option<Arc<Frame>>;

/// Settings shared by every processor a manager starts.
#[derive(Debug, Clone)]
pub struct StreamSettings {
    /// ffmpeg binary. `None` means no decoder is available.
    pub ffmpeg: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
    pub probe_timeout: Duration,
    /// Pause between killing a failed decoder and starting the next one.
    pub restart_delay: Duration,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            ffmpeg: None,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            probe_timeout: PROBE_TIMEOUT,
            restart_delay: Duration::from_secs(1),
        }
    }
}

/// One camera's stream: the decoder process, the latest frames and their
/// rate.
#[derive(Debug)]
pub struct VideoStreamProcessor {
    camera_id: String,
    rtsp_url: String,
    has_lut: bool,
    running: Arc<AtomicBool>,
    original_rx: watch::Receiver<SharedFrame>,
    enhanced_rx: watch::Receiver<SharedFrame>,
    fps: Arc<Mutex<FpsMeter>>,
    logs: Arc<StreamLogBuffer>,
    stop_tx: watch::Sender<bool>,
    task: tokio::sync::Mutex<Option<JoinHandle<()>>>,
}

impl VideoStreamProcessor {
    /// Create a processor and start decoding if the source is reachable.
    ///
    /// An unreachable source, a placeholder address or a missing ffmpeg
    /// yields a registered processor that is not running.
    pub async fn start(
        camera_id: &str,
        rtsp_url: &str,
        lut_path: Option<&str>,
        settings: &StreamSettings,
        params: EnhanceParamsStore,
    ) -> Self {
        let lut = Lut::load_optional(camera_id, lut_path);
        let (original_tx, original_rx) = watch::channel(None);
        let (enhanced_tx, enhanced_rx) = watch::channel(None);
        let (stop_tx, stop_rx) = watch::channel(false);

        let processor = Self {
            camera_id: camera_id.to_string(),
            rtsp_url: rtsp_url.to_string(),
            has_lut: lut.is_some(),
            running: Arc::new(AtomicBool::new(false)),
            original_rx,
            enhanced_rx,
            fps: Arc::new(Mutex::new(FpsMeter::new())),
            logs: Arc::new(StreamLogBuffer::new(camera_id)),
            stop_tx,
            task: tokio::sync::Mutex::new(None),
        };

        if !rtsp_available(rtsp_url, settings.probe_timeout).await {
            warn!(camera_id, rtsp_url, "RTSP source unreachable, camera stays offline");
            return processor;
        }

        let Some(ffmpeg) = settings.ffmpeg.clone() else {
            warn!(camera_id, "ffmpeg unavailable, camera stays offline");
            return processor;
        };

        let command = FfmpegCommand::new(ffmpeg, rtsp_url).size(settings.width, settings.height);
        let child = match command.clone().hwaccel(HwAccel::for_attempt(0)).spawn() {
            Ok(child) => child,
            Err(e) => {
                error!(camera_id, error = %e, "Failed to start decoder");
                return processor;
            }
        };
        info!(camera_id, rtsp_url, "Decoder started");

        processor.running.store(true, Ordering::SeqCst);
        let worker = Worker {
            camera_id: camera_id.to_string(),
            command,
            frame_len: frame::byte_len(settings.width, settings.height),
            width: settings.width,
            height: settings.height,
            restart_delay: settings.restart_delay,
            enhancer: Arc::new(Enhancer::new(lut)),
            params,
            running: Arc::clone(&processor.running),
            original_tx,
            enhanced_tx,
            fps: Arc::clone(&processor.fps),
            logs: Arc::clone(&processor.logs),
            stop_rx,
        };
        *processor.task.lock().await = Some(tokio::spawn(worker.run(child)));

        processor
    }

    pub fn camera_id(&self) -> &str {
        &self.camera_id
    }

    pub fn rtsp_url(&self) -> &str {
        &self.rtsp_url
    }

    pub const fn has_lut(&self) -> bool {
        self.has_lut
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn original_frame(&self) -> SharedFrame {
        self.original_rx.borrow().clone()
    }

    pub fn enhanced_frame(&self) -> SharedFrame {
        self.enhanced_rx.borrow().clone()
    }

    pub fn fps(&self) -> f64 {
        self.fps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current()
    }

    pub fn logs(&self) -> &StreamLogBuffer {
        &self.logs
    }

    /// Stop decoding and wait for the decoder to exit.
    pub async fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        let _ = self.stop_tx.send(true);
        if let Some(task) = self.task.lock().await.take() {
            if let Err(e) = task.await {
                warn!(camera_id = %self.camera_id, error = %e, "Stream task ended abnormally");
            }
        }
        info!(camera_id = %self.camera_id, "Stream processor stopped");
    }
}

/// State owned by the background task.
struct Worker {
    camera_id: String,
    command: FfmpegCommand,
    frame_len: usize,
    width: u32,
    height: u32,
    restart_delay: Duration,
    enhancer: Arc<Enhancer>,
    params: EnhanceParamsStore,
    running: Arc<AtomicBool>,
    original_tx: watch::Sender<SharedFrame>,
    enhanced_tx: watch::Sender<SharedFrame>,
    fps: Arc<Mutex<FpsMeter>>,
    logs: Arc<StreamLogBuffer>,
    stop_rx: watch::Receiver<bool>,
}

impl Worker {
    async fn run(mut self, mut child: Child) {
        let mut stdout = self.attach(&mut child);
        let mut buf = vec![0u8; self.frame_len];
        let mut failures = 0u32;
        let mut attempt = 0usize;
        let mut decoded = 0u64;

        while !*self.stop_rx.borrow() {
            let read = tokio::select! {
                _ = self.stop_rx.changed() => None,
                n = read_frame(&mut stdout, &mut buf) => Some(n),
            };
            let Some(read) = read else {
                break;
            };

            let n = read.unwrap_or(0);
            if n != self.frame_len {
                warn!(
                    camera_id = %self.camera_id,
                    "Decoder read failed ({n}/{} bytes)",
                    self.frame_len
                );
                failures += 1;
                if failures > MAX_RESTARTS {
                    error!(camera_id = %self.camera_id, "Decoder keeps failing, giving up");
                    break;
                }

                attempt += 1;
                let hwaccel = HwAccel::for_attempt(attempt);
                info!(
                    camera_id = %self.camera_id,
                    hwaccel = hwaccel.as_str(),
                    "Restarting decoder (attempt {failures}/{MAX_RESTARTS})"
                );
                if let Err(e) = shutdown_child(&mut child).await {
                    debug!(camera_id = %self.camera_id, error = %e, "Old decoder shutdown failed");
                }
                let stopped = tokio::select! {
                    _ = self.stop_rx.changed() => true,
                    () = tokio::time::sleep(self.restart_delay) => false,
                };
                if stopped {
                    return self.finish(None).await;
                }
                child = match self.command.clone().hwaccel(hwaccel).spawn() {
                    Ok(c) => c,
                    Err(e) => {
                        error!(camera_id = %self.camera_id, error = %e, "Decoder restart failed");
                        return self.finish(None).await;
                    }
                };
                stdout = self.attach(&mut child);
                continue;
            }

            failures = 0;
            decoded += 1;
            if decoded % PROCESS_EVERY != 0 {
                continue;
            }

            self.process(&buf).await;
        }

        self.finish(Some(child)).await;
    }

    /// Enhance one frame on the blocking pool and publish both versions.
    async fn process(&self, raw: &[u8]) {
        let Ok(original) = Frame::from_bgr(self.width, self.height, raw.to_vec()) else {
            return;
        };
        let original = Arc::new(original);
        let params = self.params.get();
        let enhancer = Arc::clone(&self.enhancer);
        let input = Arc::clone(&original);

        let started = Instant::now();
        let enhanced =
            match tokio::task::spawn_blocking(move || enhancer.enhance(&input, &params)).await {
                Ok(frame) => frame,
                Err(e) => {
                    error!(camera_id = %self.camera_id, error = %e, "Frame enhancement panicked");
                    return;
                }
            };
        let elapsed = started.elapsed();
        if elapsed > SLOW_FRAME {
            warn!(
                camera_id = %self.camera_id,
                elapsed_ms = elapsed.as_millis() as u64,
                "Frame enhancement is slow, consider a lower resolution"
            );
        }

        self.original_tx.send_replace(Some(original));
        self.enhanced_tx.send_replace(Some(Arc::new(enhanced)));
        self.fps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .tick();
    }

    /// Take stdout for frame reads and forward stderr into the log buffer.
    fn attach(&self, child: &mut Child) -> Option<ChildStdout> {
        if let Some(stderr) = child.stderr.take() {
            let logs = Arc::clone(&self.logs);
            let camera_id = self.camera_id.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    debug!(camera_id = %camera_id, "ffmpeg: {line}");
                    logs.push(&line);
                }
            });
        }
        child.stdout.take()
    }

    async fn finish(self, child: Option<Child>) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(mut child) = child {
            if let Err(e) = shutdown_child(&mut child).await {
                debug!(camera_id = %self.camera_id, error = %e, "Decoder shutdown failed");
            }
        }
        debug!(camera_id = %self.camera_id, "Stream loop exited");
    }
}

/// Read until `buf` is full or the stream ends. Returns bytes read.
async fn read_frame<R: AsyncRead + Unpin>(
    reader: &mut Option<R>,
    buf: &mut [u8],
) -> std::io::Result<usize> {
    let Some(reader) = reader.as_mut() else {
        return Ok(0);
    };
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn read_frame_reports_short_reads() {
        let mut full: Option<&[u8]> = Some(&[1, 2, 3, 4, 5, 6]);
        let mut buf = [0u8; 6];
        assert_eq!(read_frame(&mut full, &mut buf).await.unwrap(), 6);
        assert_eq!(buf, [1, 2, 3, 4, 5, 6]);

        let mut short: Option<&[u8]> = Some(&[9, 9]);
        assert_eq!(read_frame(&mut short, &mut buf).await.unwrap(), 2);

        let mut none: Option<&[u8]> = None;
        assert_eq!(read_frame(&mut none, &mut buf).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn placeholder_source_is_registered_offline() {
        let settings = StreamSettings {
            ffmpeg: Some(PathBuf::from("/bin/false")),
            ..StreamSettings::default()
        };
        let processor = VideoStreamProcessor::start(
            "camera-7",
            "rtsp://localhost:8554/camera-7",
            None,
            &settings,
            EnhanceParamsStore::new(),
        )
        .await;

        assert!(!processor.is_running());
        assert!(processor.original_frame().is_none());
        assert!(processor.enhanced_frame().is_none());
        assert!(processor.fps().abs() < f64::EPSILON);
        processor.stop().await;
    }
}

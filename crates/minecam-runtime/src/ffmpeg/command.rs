//! Command builder for the RTSP decoder process.
//!
//! ffmpeg pulls the RTSP stream over TCP with low-latency flags and writes
//! scaled raw BGR24 frames to stdout. stderr is piped so its lines can be
//! kept in the camera's log buffer.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::{Child, Command};

use crate::error::PipelineError;

/// Hardware decoder selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwAccel {
    Cuda,
    Dxva2,
    None,
}

impl HwAccel {
    /// Preference order. Each restart moves one step down the list.
    pub const CANDIDATES: [Self; 3] = [Self::Cuda, Self::Dxva2, Self::None];

    /// Candidate for the given restart attempt; the last one sticks.
    pub fn for_attempt(attempt: usize) -> Self {
        Self::CANDIDATES[attempt.min(Self::CANDIDATES.len() - 1)]
    }

    pub fn args(self) -> &'static [&'static str] {
        match self {
            Self::Cuda => &["-hwaccel", "cuda", "-hwaccel_device", "0"],
            Self::Dxva2 => &["-hwaccel", "dxva2"],
            Self::None => &[],
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cuda => "cuda",
            Self::Dxva2 => "dxva2",
            Self::None => "none",
        }
    }
}

/// Arguments for one ffmpeg decoder invocation.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    program: PathBuf,
    rtsp_url: String,
    width: u32,
    height: u32,
    hwaccel: HwAccel,
}

impl FfmpegCommand {
    pub fn new(program: impl Into<PathBuf>, rtsp_url: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            rtsp_url: rtsp_url.into(),
            width: crate::frame::DEFAULT_WIDTH,
            height: crate::frame::DEFAULT_HEIGHT,
            hwaccel: HwAccel::None,
        }
    }

    #[must_use]
    pub const fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub const fn hwaccel(mut self, hwaccel: HwAccel) -> Self {
        self.hwaccel = hwaccel;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Full argument vector, program excluded.
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = self.hwaccel.args().iter().map(ToString::to_string).collect();
        args.extend(
            [
                "-rtsp_transport",
                "tcp",
                "-max_delay",
                "500000",
                "-reorder_queue_size",
                "0",
                "-fflags",
                "nobuffer+fastseek+flush_packets",
                "-flags",
                "low_delay",
                "-i",
            ]
            .map(String::from),
        );
        args.push(self.rtsp_url.clone());
        args.extend(["-f", "rawvideo", "-pix_fmt", "bgr24", "-s"].map(String::from));
        args.push(format!("{}x{}", self.width, self.height));
        args.extend(["-vsync", "drop", "-"].map(String::from));
        args
    }

    /// Spawn the decoder with stdout and stderr piped.
    pub fn spawn(&self) -> Result<Child, PipelineError> {
        Command::new(&self.program)
            .args(self.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(PipelineError::Spawn)
    }
}

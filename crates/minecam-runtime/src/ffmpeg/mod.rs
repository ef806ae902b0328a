//! ffmpeg decoder process management.

mod command;
mod deps;
mod probe;
mod shutdown;

pub use command::{FfmpegCommand, HwAccel};
pub use deps::{FFMPEG_ENV, locate_ffmpeg, validate_runtime_dependencies};
pub use probe::{PROBE_TIMEOUT, host_port, is_placeholder, rtsp_available};
pub use shutdown::{SHUTDOWN_GRACE, shutdown_child};

//! Camera stream processing.

mod manager;
mod processor;

pub use manager::VideoStreamManager;
pub use processor::{
    MAX_RESTARTS, PROCESS_EVERY, SharedFrame, StreamSettings, VideoStreamProcessor,
};

//! Decoder log capture.
//!
//! ffmpeg writes its diagnostics to stderr. Each camera keeps the most
//! recent lines in a ring buffer, and every line is broadcast so a caller
//! can follow the output live.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Maximum number of log lines to keep per camera.
const MAX_LOG_LINES: usize = 500;

/// A single decoder log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamLogEntry {
    /// Unix timestamp in milliseconds
    pub timestamp: u64,
    pub camera_id: String,
    pub line: String,
}

impl StreamLogEntry {
    pub fn new(camera_id: &str, line: String) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64);
        Self {
            timestamp,
            camera_id: camera_id.to_string(),
            line,
        }
    }
}

/// Ring buffer of one camera's recent decoder output.
#[derive(Debug)]
pub struct StreamLogBuffer {
    camera_id: String,
    lines: Mutex<VecDeque<StreamLogEntry>>,
    broadcast_tx: broadcast::Sender<StreamLogEntry>,
}

impl StreamLogBuffer {
    pub fn new(camera_id: impl Into<String>) -> Self {
        let (broadcast_tx, _) = broadcast::channel(256);
        Self {
            camera_id: camera_id.into(),
            lines: Mutex::new(VecDeque::with_capacity(MAX_LOG_LINES)),
            broadcast_tx,
        }
    }

    /// Add a line, dropping the oldest when full.
    pub fn push(&self, line: &str) {
        let entry = StreamLogEntry::new(&self.camera_id, line.to_string());
        {
            let mut lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
            if lines.len() >= MAX_LOG_LINES {
                lines.pop_front();
            }
            lines.push_back(entry.clone());
        }
        // No subscribers is fine
        let _ = self.broadcast_tx.send(entry);
    }

    pub fn entries(&self) -> Vec<StreamLogEntry> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StreamLogEntry> {
        self.broadcast_tx.subscribe()
    }

    pub fn clear(&self) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_most_recent_lines() {
        let buffer = StreamLogBuffer::new("camera-1");
        for i in 0..MAX_LOG_LINES + 5 {
            buffer.push(&format!("line {i}"));
        }
        let entries = buffer.entries();
        assert_eq!(entries.len(), MAX_LOG_LINES);
        assert_eq!(entries[0].line, "line 5");
        assert_eq!(entries[0].camera_id, "camera-1");

        buffer.clear();
        assert!(buffer.entries().is_empty());
    }

    #[tokio::test]
    async fn broadcasts_new_lines() {
        let buffer = StreamLogBuffer::new("camera-2");
        let mut rx = buffer.subscribe();
        buffer.push("Input #0, rtsp");
        assert_eq!(rx.recv().await.unwrap().line, "Input #0, rtsp");
    }
}

//! Streaming transport limits.

use serde::{Deserialize, Serialize};

/// Limits applied to every streamed chat response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Seconds to wait for the next chunk before giving up (0 disables).
    pub idle_timeout_secs: u32,
    /// Seconds allowed to establish the connection.
    pub connect_timeout_secs: u32,
    /// Upper bound on undelimited text held while waiting for a newline.
    pub max_buffer_bytes: u32,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 60,
            connect_timeout_secs: 10,
            max_buffer_bytes: 1024 * 1024,
        }
    }
}

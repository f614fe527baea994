//! Configuration schema types for Crux.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod chat;
mod stream;
mod system;

pub use chat::*;
pub use stream::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Crux.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct CruxConfig {
    pub chat: ChatConfig,
    pub completion: CompletionConfig,
    pub stream: StreamConfig,
    pub logging: LoggingConfig,
}

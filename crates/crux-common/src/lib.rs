//! Types shared by every Crux crate: error enums and identifiers.

pub mod errors;
pub mod id;

pub use errors::{ConfigError, CruxError};
pub use id::{new_correlation_id, new_id, ConversationId, UserId};

pub type Result<T> = std::result::Result<T, CruxError>;

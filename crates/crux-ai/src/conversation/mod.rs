//! Conversation management for the chat widget.
//!
//! A `Conversation` owns the ordered message log. While a reply streams in,
//! the assistant text accumulates in a separate turn buffer and is presented
//! as the last message of every snapshot handed to the observer; it joins
//! the log when the stream ends.

mod chat;
mod manager;
mod types;


pub use manager::Conversation;
pub use types::{Observer, TurnOutcome, APOLOGY_MESSAGE};

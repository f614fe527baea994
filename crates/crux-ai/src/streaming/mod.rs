//! Streamed chat responses: `data: {...}` lines over a chunked HTTP body.
//!
//! The pieces compose bottom-up:
//! - [`decoder`] turns bytes into text, holding split UTF-8 sequences.
//! - [`frame`] classifies one line and extracts the delta text.
//! - [`framer`] buffers text into lines and emits deltas in order.
//! - [`reader`] pulls chunks from the transport and drives the framer.

pub mod decoder;
pub mod frame;
pub mod framer;
pub mod reader;

pub use decoder::Utf8Decoder;
pub use frame::{DeltaPayload, Frame, DATA_PREFIX, DONE_SENTINEL};
pub use framer::{EventFramer, FramerLimits, FramerState, FramerStats, DEFAULT_MAX_BUFFER_BYTES};
pub use reader::{read_stream, ReadOptions, StreamEnd, StreamSummary};

//! Incremental framing of a chunked event stream into text deltas.

use std::ops::ControlFlow;

use tracing::{debug, warn};

use crate::AiError;

use super::decoder::Utf8Decoder;
use super::frame::{DeltaPayload, Frame};

/// Default cap on undelimited text held by the framer.
pub const DEFAULT_MAX_BUFFER_BYTES: usize = 1024 * 1024;

/// Memory bounds for a single stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramerLimits {
    /// Maximum bytes of partial line plus held payload before the stream is abandoned.
    pub max_buffer_bytes: usize,
}

impl Default for FramerLimits {
    fn default() -> Self {
        Self {
            max_buffer_bytes: DEFAULT_MAX_BUFFER_BYTES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramerState {
    AwaitingChunk,
    Scanning,
    Done,
}

/// Counters describing what the framer has seen so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FramerStats {
    /// Complete lines extracted from the buffer.
    pub frames: u64,
    /// Non-empty deltas handed to the consumer.
    pub deltas: u64,
    /// Data payloads that failed to parse and were held for reassembly.
    pub deferred: u64,
    /// Held payloads dropped because they never became valid JSON.
    pub discarded: u64,
}

/// Turns raw response bytes into ordered text deltas.
///
/// Lines split across chunks are buffered until their newline arrives. A
/// data payload that is not valid JSON is held. The next raw line is
/// appended to it and parsing retried, unless that line is blank or starts
/// a `data:` frame of its own; a leading `:` does not count as a comment
/// here. Otherwise the held payload is discarded and counted.
#[derive(Debug)]
pub struct EventFramer {
    decoder: Utf8Decoder,
    buffer: String,
    held: Option<String>,
    state: FramerState,
    terminated: bool,
    limits: FramerLimits,
    stats: FramerStats,
}

impl Default for EventFramer {
    fn default() -> Self {
        Self::new(FramerLimits::default())
    }
}

impl EventFramer {
    pub fn new(limits: FramerLimits) -> Self {
        Self {
            decoder: Utf8Decoder::new(),
            buffer: String::new(),
            held: None,
            state: FramerState::AwaitingChunk,
            terminated: false,
            limits,
            stats: FramerStats::default(),
        }
    }

    /// Feed one chunk, calling `on_delta` for every non-empty delta it completes.
    ///
    /// Input after the terminator is ignored. Fails only when the undelimited
    /// remainder outgrows [`FramerLimits::max_buffer_bytes`], which also ends
    /// the stream.
    pub fn feed(&mut self, chunk: &[u8], mut on_delta: impl FnMut(&str)) -> Result<(), AiError> {
        if self.state == FramerState::Done {
            return Ok(());
        }

        self.state = FramerState::Scanning;
        let text = self.decoder.decode(chunk);
        self.buffer.push_str(&text);

        if self.scan(&mut on_delta).is_break() {
            self.terminated = true;
            self.close();
            return Ok(());
        }

        let buffered = self.buffered_len();
        if buffered > self.limits.max_buffer_bytes {
            warn!(
                buffered,
                limit = self.limits.max_buffer_bytes,
                "stream buffer limit exceeded"
            );
            self.close();
            return Err(AiError::BufferOverflow {
                limit: self.limits.max_buffer_bytes,
            });
        }

        self.state = FramerState::AwaitingChunk;
        Ok(())
    }

    /// Signal end of input. Unterminated content is dropped without error.
    pub fn finish(&mut self) {
        if self.state == FramerState::Done {
            return;
        }
        if self.decoder.finish().is_some() {
            debug!("stream ended inside a multi-byte character");
        }
        if !self.buffer.is_empty() {
            debug!(bytes = self.buffer.len(), "stream ended without a final newline");
        }
        if let Some(held) = &self.held {
            warn!(bytes = held.len(), "stream ended with an unparsed data frame");
            self.stats.discarded += 1;
        }
        self.close();
    }

    pub fn state(&self) -> FramerState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == FramerState::Done
    }

    /// Whether the `[DONE]` terminator was seen.
    pub fn saw_terminator(&self) -> bool {
        self.terminated
    }

    pub fn stats(&self) -> FramerStats {
        self.stats
    }

    /// Bytes currently held: the partial line plus any payload awaiting reassembly.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len() + self.held.as_ref().map_or(0, String::len)
    }

    fn close(&mut self) {
        self.buffer.clear();
        self.held = None;
        self.state = FramerState::Done;
    }

    fn scan(&mut self, on_delta: &mut dyn FnMut(&str)) -> ControlFlow<()> {
        while let Some(pos) = self.buffer.find('\n') {
            let mut line: String = self.buffer.drain(..=pos).collect();
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
            self.stats.frames += 1;
            self.process_line(&line, on_delta)?;
        }
        ControlFlow::Continue(())
    }

    fn process_line(&mut self, line: &str, on_delta: &mut dyn FnMut(&str)) -> ControlFlow<()> {
        let frame = Frame::classify(line);

        if let Some(held) = self.held.take() {
            // A held payload claims the next raw line, even one that would
            // otherwise read as a comment.
            if let Frame::Other(_) | Frame::Comment(_) = frame {
                self.try_emit(format!("{held}\n{line}"), on_delta);
                return ControlFlow::Continue(());
            }
            warn!(bytes = held.len(), "discarding malformed data frame");
            self.stats.discarded += 1;
        }

        match frame {
            Frame::Blank | Frame::Comment(_) | Frame::Other(_) => ControlFlow::Continue(()),
            Frame::Done => {
                debug!(deltas = self.stats.deltas, "stream terminator received");
                ControlFlow::Break(())
            }
            Frame::Data(payload) => {
                self.try_emit(payload.to_string(), on_delta);
                ControlFlow::Continue(())
            }
        }
    }

    fn try_emit(&mut self, payload: String, on_delta: &mut dyn FnMut(&str)) {
        match DeltaPayload::parse(&payload) {
            Ok(delta) => {
                if !delta.is_empty() {
                    self.stats.deltas += 1;
                    on_delta(delta.content());
                }
            }
            Err(e) => {
                debug!(error = %e, bytes = payload.len(), "holding incomplete data frame");
                self.stats.deferred += 1;
                self.held = Some(payload);
            }
        }
    }
}

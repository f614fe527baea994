//! Read loop that pulls chunks from a transport and drives the framer.
//!
//! Works with any byte stream, so the same loop serves `reqwest` responses
//! and in-memory streams in tests. The loop owns one outstanding read at a
//! time; cancellation and the idle timeout are both checked around that read.

use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::framer::{EventFramer, FramerLimits, FramerStats};
use crate::AiError;

/// How a stream finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// The producer sent `[DONE]`.
    Terminated,
    /// The transport closed without a terminator.
    Exhausted,
    /// The caller's token fired; the transport was dropped.
    Cancelled,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    /// Longest wait for a single chunk. `None` waits forever.
    pub idle_timeout: Option<Duration>,
    pub limits: FramerLimits,
}

#[derive(Debug, Clone, Copy)]
pub struct StreamSummary {
    pub end: StreamEnd,
    pub stats: FramerStats,
}

/// Read `stream` to completion, calling `on_delta` for each text delta in order.
///
/// Returns early on the terminator or cancellation. A read error or idle
/// timeout after some deltas were delivered leaves those deltas with the
/// consumer and returns the error.
pub async fn read_stream<S, E>(
    stream: S,
    options: &ReadOptions,
    cancel: &CancellationToken,
    mut on_delta: impl FnMut(&str),
) -> Result<StreamSummary, AiError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::fmt::Display,
{
    let mut stream = std::pin::pin!(stream);
    let mut framer = EventFramer::new(options.limits);

    let end = loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(deltas = framer.stats().deltas, "stream cancelled by caller");
                break StreamEnd::Cancelled;
            }
            next = next_chunk(stream.as_mut(), options.idle_timeout) => next?,
        };

        let Some(chunk) = next else {
            framer.finish();
            break StreamEnd::Exhausted;
        };
        let chunk = chunk.map_err(|e| AiError::NetworkError(e.to_string()))?;

        framer.feed(&chunk, &mut on_delta)?;
        if framer.is_done() {
            break StreamEnd::Terminated;
        }
    };

    let stats = framer.stats();
    debug!(
        ?end,
        frames = stats.frames,
        deltas = stats.deltas,
        deferred = stats.deferred,
        discarded = stats.discarded,
        "stream finished"
    );
    Ok(StreamSummary { end, stats })
}

async fn next_chunk<S: Stream>(
    mut stream: Pin<&mut S>,
    idle_timeout: Option<Duration>,
) -> Result<Option<S::Item>, AiError> {
    match idle_timeout {
        Some(limit) => tokio::time::timeout(limit, stream.next())
            .await
            .map_err(|_| AiError::Timeout),
        None => Ok(stream.next().await),
    }
}

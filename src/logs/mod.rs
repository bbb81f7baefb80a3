//! Log stream demultiplexing.
//!
//! Container engines that multiplex stdout and stderr into one byte channel
//! prefix each payload with an 8-byte frame header: a stream-origin tag
//! (stdout = 1, stderr = 2), three padding bytes, and a big-endian payload
//! length. Engines running a TTY, and transports that already strip the
//! framing, deliver plain text instead. The demultiplexer tolerates both
//! shapes per chunk.
//!
//! The output is a cancellable sequence of clean text lines: framing
//! stripped, UTF-8 decoded (lossily), split on line boundaries, trimmed,
//! empties dropped, arrival order preserved. Dropping the stream is the
//! cancellation operation; it releases the upstream engine stream with it.

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::Stream;

use crate::error::EngineError;


/// Size of the engine's multiplexing frame header.
const FRAME_HEADER_LEN: usize = 8;

/// Stream-origin tag for stdout frames.
const STDOUT_TAG: u8 = 1;

/// Stream-origin tag for stderr frames.
const STDERR_TAG: u8 = 2;

/// Strip the multiplexing frame header from a chunk, if one is present.
///
/// A chunk is treated as framed only when it is longer than the header and
/// its first byte is a known stream-origin tag. Anything ambiguous passes
/// through unchanged: occasionally forwarding a framed chunk unstripped
/// beats truncating the first eight bytes of a legitimate short text line.
fn strip_frame_header(chunk: &[u8]) -> &[u8] {
    match chunk.first() {
        Some(&tag)
            if chunk.len() > FRAME_HEADER_LEN && (tag == STDOUT_TAG || tag == STDERR_TAG) =>
        {
            chunk.get(FRAME_HEADER_LEN..).unwrap_or_default()
        }
        _ => chunk,
    }
}

/// Demultiplex one raw chunk into clean log lines.
///
/// Strips the frame header when present, decodes the payload as UTF-8
/// (replacing invalid sequences), splits on line boundaries, trims each
/// line, and drops empty results. Order is preserved.
#[must_use]
pub fn demux_chunk(chunk: &[u8]) -> Vec<String> {
    let payload = strip_frame_header(chunk);
    String::from_utf8_lossy(payload)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Lazy sequence of log lines over a raw engine byte stream.
///
/// Yields lines in arrival order until the upstream ends (graceful close),
/// fails (the error is yielded once, then the sequence terminates), or the
/// consumer drops the stream (cancellation; the upstream handle is released
/// by the drop).
pub struct LogLineStream<S> {
    upstream: S,
    pending: VecDeque<String>,
    finished: bool,
}

impl<S> LogLineStream<S> {
    /// Wrap a raw byte stream.
    pub const fn new(upstream: S) -> Self {
        Self {
            upstream,
            pending: VecDeque::new(),
            finished: false,
        }
    }
}

impl<S> Stream for LogLineStream<S>
where
    S: Stream<Item = Result<Bytes, EngineError>> + Unpin,
{
    type Item = Result<String, EngineError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                return Poll::Ready(Some(Ok(line)));
            }
            if self.finished {
                return Poll::Ready(None);
            }
            match Pin::new(&mut self.upstream).poll_next(cx) {
                Poll::Ready(Some(Ok(chunk))) => {
                    self.pending.extend(demux_chunk(&chunk));
                    // Loop: a chunk of pure whitespace yields no lines.
                }
                Poll::Ready(Some(Err(error))) => {
                    self.finished = true;
                    return Poll::Ready(Some(Err(error)));
                }
                Poll::Ready(None) => {
                    self.finished = true;
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

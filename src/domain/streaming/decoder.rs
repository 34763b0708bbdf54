//! Chunk-tolerant NDJSON stream decoder.
//!
//! The model is instructed to emit exactly one JSON object per line, with
//! embedded newlines escaped as `\n` inside string literals. Chunk
//! boundaries from the provider are arbitrary: a single JSON object may
//! arrive split across many chunks, including mid-string. The decoder
//! accumulates chunks and frames records with an explicit scanner that
//! tracks string/escape state, so a quoted `\n` escape never terminates a
//! record and only a literal newline character outside a string does.
//!
//! Guarantees:
//! - output is identical for any re-chunking of the same stream
//! - sequence numbers are strictly increasing in source-line order
//! - no record is emitted twice or split across emissions
//! - the terminal [`DecodeEvent::Finished`] marker is emitted exactly once,
//!   by [`StreamDecoder::finish`]

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::marker::PhantomData;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::foundation::ValidationError;

/// A record type that can be decoded from one NDJSON line.
///
/// Deserialization enforces shape (required fields, known enum values);
/// `validate` adds semantic checks the wire format cannot express.
pub trait StreamRecord: DeserializeOwned {
    /// Semantic validation applied after a line parses.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// What to do with a line that fails to parse or validate.
///
/// The default is to skip it and keep decoding: one malformed line must
/// not cost the rest of a multi-day itinerary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedLinePolicy {
    /// Emit a [`DecodeEvent::Malformed`] signal and continue.
    #[default]
    Skip,
    /// Fail the whole stream on the first malformed line.
    Abort,
}

/// One decoded, validated record with its position in the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamUnit<T> {
    /// 1-based position among successfully decoded records.
    pub sequence: u64,
    /// The decoded record.
    pub record: T,
}

/// A line that failed to parse or validate, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    /// The offending line, trimmed.
    pub line: String,
    /// Parse or validation failure description.
    pub reason: String,
}

/// Totals reported by the terminal marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamStats {
    /// Records decoded successfully.
    pub units: u64,
    /// Lines skipped as malformed.
    pub malformed: u64,
}

/// Incremental decoder output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeEvent<T> {
    /// A complete, valid record.
    Unit(StreamUnit<T>),
    /// A malformed line, under [`MalformedLinePolicy::Skip`].
    Malformed(MalformedLine),
    /// End of the bounded stream; emitted exactly once by `finish`.
    Finished(StreamStats),
}

/// Decoder failure under [`MalformedLinePolicy::Abort`].
#[derive(Debug, Clone, Error)]
pub enum DecodeError {
    #[error("malformed stream unit: {reason}")]
    MalformedUnit { line: String, reason: String },
}

/// Scanner state for framing lines in the accumulation buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Outside any string literal; a newline here ends a record.
    Normal,
    /// Inside a string literal; newlines do not terminate records.
    InString,
    /// Immediately after a backslash inside a string literal.
    Escaped,
}

/// Reassembles NDJSON records from arbitrarily chunked input.
pub struct StreamDecoder<T: StreamRecord> {
    buffer: String,
    /// Byte offset where scanning resumes; everything before it has been
    /// scanned without finding a record boundary.
    scan_pos: usize,
    state: ScanState,
    next_sequence: u64,
    malformed: u64,
    policy: MalformedLinePolicy,
    _record: PhantomData<T>,
}

impl<T: StreamRecord> StreamDecoder<T> {
    /// Creates a decoder with the given malformed-line policy.
    pub fn new(policy: MalformedLinePolicy) -> Self {
        Self {
            buffer: String::new(),
            scan_pos: 0,
            state: ScanState::Normal,
            next_sequence: 1,
            malformed: 0,
            policy,
            _record: PhantomData,
        }
    }

    /// Appends a chunk and returns every event completed by it.
    ///
    /// Errors only under [`MalformedLinePolicy::Abort`].
    pub fn push(&mut self, chunk: &str) -> Result<Vec<DecodeEvent<T>>, DecodeError> {
        self.buffer.push_str(chunk);

        let mut events = Vec::new();
        while let Some(end) = self.scan_line_end() {
            // Drain the line plus its terminating newline; the scanner only
            // reports boundaries in Normal state, so state carries over
            // unchanged for the remainder.
            let line: String = self.buffer.drain(..=end).collect();
            self.scan_pos = 0;
            self.decode_line(&line[..line.len() - 1], &mut events)?;
        }
        Ok(events)
    }

    /// Signals end-of-stream: flushes a trailing record the model may have
    /// left without a newline, then emits the terminal marker.
    pub fn finish(mut self) -> Result<Vec<DecodeEvent<T>>, DecodeError> {
        let mut events = Vec::new();
        let rest = std::mem::take(&mut self.buffer);
        self.decode_line(&rest, &mut events)?;

        let stats = StreamStats {
            units: self.next_sequence - 1,
            malformed: self.malformed,
        };
        debug!(units = stats.units, malformed = stats.malformed, "stream decode finished");
        events.push(DecodeEvent::Finished(stats));
        Ok(events)
    }

    /// Number of units emitted so far.
    pub fn units_emitted(&self) -> u64 {
        self.next_sequence - 1
    }

    /// Scans forward for the next record-terminating newline.
    ///
    /// Returns the byte offset of the newline, or `None` once the buffer is
    /// exhausted (leaving `scan_pos` and `state` ready for the next chunk).
    /// The scanned bytes are ASCII-compared only, which is safe in UTF-8:
    /// continuation bytes never collide with `"`, `\` or `\n`.
    fn scan_line_end(&mut self) -> Option<usize> {
        let bytes = self.buffer.as_bytes();
        let mut i = self.scan_pos;
        while i < bytes.len() {
            match self.state {
                ScanState::Normal => match bytes[i] {
                    b'"' => self.state = ScanState::InString,
                    b'\n' => return Some(i),
                    _ => {}
                },
                ScanState::InString => match bytes[i] {
                    b'\\' => self.state = ScanState::Escaped,
                    b'"' => self.state = ScanState::Normal,
                    _ => {}
                },
                ScanState::Escaped => self.state = ScanState::InString,
            }
            i += 1;
        }
        self.scan_pos = i;
        None
    }

    /// Parses and validates one framed line, appending the resulting event.
    fn decode_line(
        &mut self,
        line: &str,
        events: &mut Vec<DecodeEvent<T>>,
    ) -> Result<(), DecodeError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(());
        }

        let decoded = serde_json::from_str::<T>(trimmed)
            .map_err(|e| e.to_string())
            .and_then(|record| {
                record
                    .validate()
                    .map(|_| record)
                    .map_err(|e| e.to_string())
            });

        match decoded {
            Ok(record) => {
                let sequence = self.next_sequence;
                self.next_sequence += 1;
                events.push(DecodeEvent::Unit(StreamUnit { sequence, record }));
            }
            Err(reason) => {
                self.malformed += 1;
                warn!(%reason, line = trimmed, "skipping malformed stream line");
                match self.policy {
                    MalformedLinePolicy::Skip => {
                        events.push(DecodeEvent::Malformed(MalformedLine {
                            line: trimmed.to_string(),
                            reason,
                        }));
                    }
                    MalformedLinePolicy::Abort => {
                        return Err(DecodeError::MalformedUnit {
                            line: trimmed.to_string(),
                            reason,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

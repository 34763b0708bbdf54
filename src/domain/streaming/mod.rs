//! Streaming NDJSON decoding.
//!
//! Reassembles a model's chunked text stream into discrete, validated
//! records, one per newline-delimited JSON object.

mod decoder;

pub use decoder::{
    DecodeError, DecodeEvent, MalformedLine, MalformedLinePolicy, StreamDecoder, StreamRecord,
    StreamStats, StreamUnit,
};

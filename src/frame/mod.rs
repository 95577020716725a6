//! The frame protocol: a self-describing wire format inserted between units
//! so a chunked/grouped stream survives a process pipe (spec.md §4.2).
//!
//! Organized the way the teacher crate organizes `frame/`: `wire` holds the
//! byte-level primitives (mirrors `frame::header`), `error` the error type
//! (mirrors `frame::types::Lz4FError`), and `encode`/`decode` the two
//! directions of the codec (mirrors `frame::compress`/`frame::decompress`).

pub mod decode;
pub mod encode;
pub mod error;
pub mod wire;

pub use decode::{decode_all, FrameReader};
pub use encode::encode_stream;
pub use error::FrameError;

/// One unit of the framed wire protocol (spec.md §4.2: "Each record is
/// tagged: {CHUNK, OPEN, CLOSE}").
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Chunk(crate::chunk::Chunk),
    Open,
    Close,
}

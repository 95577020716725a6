//! Frame codec error type.
//!
//! Shaped after `frame::types::Lz4FError` in the teacher crate: a closed
//! enum, a stable `error_name()`, and manual `Display`/`Error` impls rather
//! than a `thiserror` derive.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Stream claimed the magic marker but the version byte didn't match.
    UnsupportedVersion(u8),
    /// A record tag byte outside {CHUNK, OPEN, CLOSE} (spec.md §4.2).
    UnknownRecordTag(u8),
    /// A CLOSE record with no matching OPEN (spec.md §4.2 invariant).
    UnmatchedClose,
    /// A varint continued past the point a `u64` can represent.
    VarintOverflow,
    /// End of input reached mid-record.
    Truncated,
    /// A meta value kind tag outside {0x01..0x04}.
    UnknownMetaKind(u8),
    /// A meta name that is not identifier-class (spec.md §3).
    InvalidMetaName(String),
    /// Underlying I/O failure while reading or writing the pipe.
    Io(String),
}

impl FrameError {
    pub fn error_name(&self) -> &'static str {
        match self {
            FrameError::UnsupportedVersion(_) => "unsupported_version",
            FrameError::UnknownRecordTag(_) => "unknown_record_tag",
            FrameError::UnmatchedClose => "unmatched_close",
            FrameError::VarintOverflow => "varint_overflow",
            FrameError::Truncated => "truncated",
            FrameError::UnknownMetaKind(_) => "unknown_meta_kind",
            FrameError::InvalidMetaName(_) => "invalid_meta_name",
            FrameError::Io(_) => "io",
        }
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::UnsupportedVersion(v) => write!(f, "unsupported frame version 0x{:02x}", v),
            FrameError::UnknownRecordTag(t) => write!(f, "unknown record tag 0x{:02x}", t),
            FrameError::UnmatchedClose => write!(f, "CLOSE record with no matching OPEN"),
            FrameError::VarintOverflow => write!(f, "varint exceeds 64 bits"),
            FrameError::Truncated => write!(f, "truncated frame stream"),
            FrameError::UnknownMetaKind(k) => write!(f, "unknown meta value kind 0x{:02x}", k),
            FrameError::InvalidMetaName(n) => write!(f, "invalid meta variable name {:?}", n),
            FrameError::Io(msg) => write!(f, "i/o error: {}", msg),
        }
    }
}

impl std::error::Error for FrameError {}

impl From<std::io::Error> for FrameError {
    fn from(e: std::io::Error) -> Self {
        FrameError::Io(e.to_string())
    }
}

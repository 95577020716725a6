//! Top-level error type (spec.md §7): unifies the four error categories and
//! maps each to its process exit code. Mirrors the teacher's
//! `Lz4FError`/`io` error split — a small closed enum per subsystem, joined
//! here at the one boundary (the CLI) that needs to pick an exit code.

use core::fmt;

use crate::frame::FrameError;
use crate::multibin::ArgumentError;
use crate::unit::UnitError;

#[derive(Debug)]
pub enum RefineryError {
    /// Multibin parse failure, unknown handler, bad switch: fatal, exit 2.
    Argument(ArgumentError),
    /// Corrupt framed stream: fatal, exit 1.
    Frame(FrameError),
    /// Per-chunk processing failure that escalated to fatal (e.g. without
    /// `-L`): exit 1.
    Unit(UnitError),
    /// stdio failure not attributable to a clean peer close: exit 1.
    Io(std::io::Error),
}

impl RefineryError {
    pub fn exit_code(&self) -> i32 {
        match self {
            RefineryError::Argument(_) => 2,
            RefineryError::Frame(_) | RefineryError::Unit(_) | RefineryError::Io(_) => 1,
        }
    }
}

impl fmt::Display for RefineryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefineryError::Argument(e) => write!(f, "{}", e),
            RefineryError::Frame(e) => write!(f, "{}", e),
            RefineryError::Unit(e) => write!(f, "{}", e),
            RefineryError::Io(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RefineryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RefineryError::Argument(e) => Some(e),
            RefineryError::Frame(e) => Some(e),
            RefineryError::Unit(e) => Some(e),
            RefineryError::Io(e) => Some(e),
        }
    }
}

impl From<ArgumentError> for RefineryError {
    fn from(e: ArgumentError) -> Self {
        RefineryError::Argument(e)
    }
}

impl From<FrameError> for RefineryError {
    fn from(e: FrameError) -> Self {
        RefineryError::Frame(e)
    }
}

impl From<UnitError> for RefineryError {
    fn from(e: UnitError) -> Self {
        RefineryError::Unit(e)
    }
}

impl From<std::io::Error> for RefineryError {
    fn from(e: std::io::Error) -> Self {
        RefineryError::Io(e)
    }
}

//! The unit contract (spec.md §4.4): the behavior every transformation in a
//! pipeline implements. Mirrors the way the teacher separates the *shape*
//! of an operation (`block::types::Lz4FError`-style error enum, a small
//! state machine) from its concrete bodies in `block::compress`/`decompress`.

use core::fmt;

use crate::chunk::Chunk;

/// A per-chunk processing failure (spec.md §7: `UnitError`). Non-fatal by
/// default: the driver drops the offending chunk and logs a warning rather
/// than unwinding the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitError {
    pub unit: String,
    pub message: String,
}

impl UnitError {
    pub fn new(unit: impl Into<String>, message: impl Into<String>) -> Self {
        UnitError { unit: unit.into(), message: message.into() }
    }
}

impl fmt::Display for UnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failure in {}: {}", self.unit, self.message)
    }
}

impl std::error::Error for UnitError {}

/// The lifecycle every unit instance passes through (spec.md §4.4):
/// `Configured -> Processing -> Drained`, with no other transitions.
/// Cancellation moves directly to `Drained`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    Configured,
    Processing,
    Drained,
}

/// Reserved switches every unit accepts (spec.md §6), bound once at
/// configure time from argv.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitSwitches {
    /// `-R`/`--reverse`: require and invoke the reverse transform.
    pub reverse: bool,
    /// `-Q`/`--quiet`: suppress non-fatal warnings.
    pub quiet: bool,
    /// `-L`/`--lenient`: downgrade marked fatal conditions to non-fatal.
    pub lenient: bool,
}

/// The capability every transformation implements (spec.md §4.4).
///
/// `process`/`reverse` operate one chunk at a time so the driver can stay
/// lazy (spec.md §5: "must not buffer the entire input"); `filter` is the
/// escape hatch for frame-aware units (`sorted`, `dedup`) that genuinely
/// need to see a whole frame before emitting anything.
pub trait Unit {
    /// The unit's name, used in error messages and the `path`-qualified
    /// warning format (spec.md §7).
    fn name(&self) -> &'static str;

    /// Whether this unit advertises a working `reverse` (spec.md §4.4:
    /// "a unit is reversible iff its variant constructs with a non-null
    /// reverse function").
    fn is_reversible(&self) -> bool {
        false
    }

    /// Whether this unit is frame-aware and must be driven through
    /// `filter` instead of `process` (spec.md §4.4).
    fn is_frame_aware(&self) -> bool {
        false
    }

    /// Primary transformation: zero, one, or many output chunks per input.
    fn process(&mut self, chunk: Chunk) -> Result<Vec<Chunk>, UnitError>;

    /// Inverse transformation, selected by `-R`. The default rejects every
    /// input; reversible units override this.
    fn reverse(&mut self, chunk: Chunk) -> Result<Vec<Chunk>, UnitError> {
        Err(UnitError::new(self.name(), "unit does not support -R"))
    }

    /// Whole-frame re-ordering/filtering (spec.md §4.4: `sorted`, `dedup`).
    /// The default is the identity — most units never buffer.
    fn filter(&mut self, chunks: Vec<Chunk>) -> Result<Vec<Chunk>, UnitError> {
        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Identity;
    impl Unit for Identity {
        fn name(&self) -> &'static str {
            "identity"
        }
        fn process(&mut self, chunk: Chunk) -> Result<Vec<Chunk>, UnitError> {
            Ok(vec![chunk])
        }
    }

    #[test]
    fn default_reverse_is_rejected() {
        let mut u = Identity;
        let err = u.reverse(Chunk::root(b"x".to_vec())).unwrap_err();
        assert_eq!(err.unit, "identity");
    }

    #[test]
    fn default_filter_is_identity() {
        let mut u = Identity;
        let chunks = vec![Chunk::root(b"a".to_vec()), Chunk::root(b"b".to_vec())];
        assert_eq!(u.filter(chunks.clone()).unwrap(), chunks);
    }
}

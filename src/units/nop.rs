//! `nop`: the identity unit (spec.md §4.5), also synthesized implicitly by
//! `]]` fusion when the final stage before a closing bracket is frame-aware.

use crate::chunk::Chunk;
use crate::unit::{Unit, UnitError};

pub struct Nop;

impl Unit for Nop {
    fn name(&self) -> &'static str {
        "nop"
    }

    fn process(&mut self, chunk: Chunk) -> Result<Vec<Chunk>, UnitError> {
        Ok(vec![chunk])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nop_passes_chunk_through_unchanged() {
        let mut u = Nop;
        let chunk = Chunk::root(b"abc".to_vec());
        let out = u.process(chunk.clone()).unwrap();
        assert_eq!(out, vec![chunk]);
    }
}

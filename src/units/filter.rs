//! Frame-aware filter units (spec.md §4.4/§9): `sorted`, `dedup`. Both
//! must see a whole frame before emitting anything, so the driver buffers
//! one frame's worth of chunks and calls `Unit::filter` once per frame
//! (spec.md §9 Open Question, resolved in SPEC_FULL.md §4.3: bounded by
//! `REFINERY_MAX_FRAME_CHUNKS`, default `1 << 20`, exceeding it is fatal).

use crate::chunk::Chunk;
use crate::multibin::ArgumentError;
use crate::unit::{Unit, UnitError, UnitSwitches};

use super::UnitArgv;

pub const DEFAULT_MAX_FRAME_CHUNKS: usize = 1 << 20;

fn max_frame_chunks() -> usize {
    std::env::var("REFINERY_MAX_FRAME_CHUNKS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MAX_FRAME_CHUNKS)
}

fn check_bound(handler: &str, len: usize) -> Result<(), UnitError> {
    let limit = max_frame_chunks();
    if len > limit {
        return Err(UnitError::new(handler, format!("frame exceeds {} chunks (REFINERY_MAX_FRAME_CHUNKS)", limit)));
    }
    Ok(())
}

pub struct Sorted;

impl Sorted {
    pub fn build(_argv: &UnitArgv, _switches: UnitSwitches) -> Result<Self, ArgumentError> {
        Ok(Sorted)
    }
}

impl Unit for Sorted {
    fn name(&self) -> &'static str {
        "sorted"
    }

    fn is_frame_aware(&self) -> bool {
        true
    }

    fn process(&mut self, chunk: Chunk) -> Result<Vec<Chunk>, UnitError> {
        Ok(vec![chunk])
    }

    fn filter(&mut self, mut chunks: Vec<Chunk>) -> Result<Vec<Chunk>, UnitError> {
        check_bound("sorted", chunks.len())?;
        chunks.sort_by(|a, b| a.payload().cmp(b.payload()));
        Ok(chunks)
    }
}

pub struct Dedup;

impl Dedup {
    pub fn build(_argv: &UnitArgv, _switches: UnitSwitches) -> Result<Self, ArgumentError> {
        Ok(Dedup)
    }
}

impl Unit for Dedup {
    fn name(&self) -> &'static str {
        "dedup"
    }

    fn is_frame_aware(&self) -> bool {
        true
    }

    fn process(&mut self, chunk: Chunk) -> Result<Vec<Chunk>, UnitError> {
        Ok(vec![chunk])
    }

    fn filter(&mut self, chunks: Vec<Chunk>) -> Result<Vec<Chunk>, UnitError> {
        check_bound("dedup", chunks.len())?;
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            if seen.insert(chunk.payload().to_vec()) {
                out.push(chunk);
            }
        }
        Ok(out)
    }
}

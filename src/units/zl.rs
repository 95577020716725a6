//! `zl`: zlib compress/decompress (spec.md §8 decode-chain scenario),
//! reversible. Grounded in the pipeline compression-stage shape of
//! `other_examples/.../stage_service.rs`; backed by `flate2`.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::chunk::Chunk;
use crate::multibin::ArgumentError;
use crate::unit::{Unit, UnitError, UnitSwitches};

use super::UnitArgv;

pub struct Zl;

impl Zl {
    pub fn build(_argv: &UnitArgv, _switches: UnitSwitches) -> Result<Self, ArgumentError> {
        Ok(Zl)
    }
}

impl Unit for Zl {
    fn name(&self) -> &'static str {
        "zl"
    }

    fn is_reversible(&self) -> bool {
        true
    }

    fn process(&mut self, mut chunk: Chunk) -> Result<Vec<Chunk>, UnitError> {
        let mut decoder = ZlibDecoder::new(chunk.payload());
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).map_err(|e| UnitError::new("zl", e.to_string()))?;
        chunk.set_payload(out);
        Ok(vec![chunk])
    }

    fn reverse(&mut self, mut chunk: Chunk) -> Result<Vec<Chunk>, UnitError> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(chunk.payload()).map_err(|e| UnitError::new("zl", e.to_string()))?;
        let out = encoder.finish().map_err(|e| UnitError::new("zl", e.to_string()))?;
        chunk.set_payload(out);
        Ok(vec![chunk])
    }
}

//! `hex`/`b64` as reversible units (spec.md §8 decode/re-encode chains):
//! the forward direction decodes text to bytes (matching the multibin
//! decoder handler class, spec.md §4.3); `-R` reverses to encode bytes as
//! text.

use base64::Engine;

use crate::chunk::Chunk;
use crate::multibin::ArgumentError;
use crate::unit::{Unit, UnitError, UnitSwitches};

use super::UnitArgv;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Kind {
    Hex,
    B64,
}

pub struct Codec {
    kind: Kind,
}

impl Codec {
    pub fn build_hex(_argv: &UnitArgv, _switches: UnitSwitches) -> Result<Self, ArgumentError> {
        Ok(Codec { kind: Kind::Hex })
    }

    pub fn build_b64(_argv: &UnitArgv, _switches: UnitSwitches) -> Result<Self, ArgumentError> {
        Ok(Codec { kind: Kind::B64 })
    }

    fn name_str(&self) -> &'static str {
        match self.kind {
            Kind::Hex => "hex",
            Kind::B64 => "b64",
        }
    }

    fn decode(&self, text: &[u8]) -> Result<Vec<u8>, String> {
        match self.kind {
            Kind::Hex => {
                let text = std::str::from_utf8(text).map_err(|e| e.to_string())?;
                let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
                hex::decode(cleaned).map_err(|e| e.to_string())
            }
            Kind::B64 => base64::engine::general_purpose::STANDARD.decode(text).map_err(|e| e.to_string()),
        }
    }

    fn encode(&self, bytes: &[u8]) -> Vec<u8> {
        match self.kind {
            // Upper-case to match this unit's canonical hex-dump rendering
            // (spec.md §8 "Pack" scenario: `... | hex -R` ⇒ `BAADC0FFEE`).
            Kind::Hex => hex::encode_upper(bytes).into_bytes(),
            Kind::B64 => base64::engine::general_purpose::STANDARD.encode(bytes).into_bytes(),
        }
    }
}

impl Unit for Codec {
    fn name(&self) -> &'static str {
        self.name_str()
    }

    fn is_reversible(&self) -> bool {
        true
    }

    fn process(&mut self, mut chunk: Chunk) -> Result<Vec<Chunk>, UnitError> {
        let decoded = self.decode(chunk.payload()).map_err(|m| UnitError::new(self.name_str(), m))?;
        chunk.set_payload(decoded);
        Ok(vec![chunk])
    }

    fn reverse(&mut self, mut chunk: Chunk) -> Result<Vec<Chunk>, UnitError> {
        let encoded = self.encode(chunk.payload());
        chunk.set_payload(encoded);
        Ok(vec![chunk])
    }
}

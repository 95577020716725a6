//! `pack` (spec.md §8 "Pack" scenario): turns a whitespace-separated string
//! of `0xNN` byte tokens into raw bytes.

use crate::chunk::Chunk;
use crate::multibin::ArgumentError;
use crate::unit::{Unit, UnitError, UnitSwitches};

use super::UnitArgv;

pub struct Pack;

impl Pack {
    pub fn build(_argv: &UnitArgv, _switches: UnitSwitches) -> Result<Self, ArgumentError> {
        Ok(Pack)
    }
}

impl Unit for Pack {
    fn name(&self) -> &'static str {
        "pack"
    }

    fn process(&mut self, mut chunk: Chunk) -> Result<Vec<Chunk>, UnitError> {
        let text = std::str::from_utf8(chunk.payload()).map_err(|e| UnitError::new("pack", e.to_string()))?;
        let mut out = Vec::new();
        for token in text.split_whitespace() {
            let digits = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")).unwrap_or(token);
            let byte = u8::from_str_radix(digits, 16)
                .map_err(|_| UnitError::new("pack", format!("{:?} is not a byte token", token)))?;
            out.push(byte);
        }
        chunk.set_payload(out);
        Ok(vec![chunk])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_parses_hex_token_string() {
        let mut u = Pack;
        let chunk = Chunk::root(b"0xBA 0xAD 0xC0 0xFF 0xEE".to_vec());
        let out = u.process(chunk).unwrap();
        assert_eq!(out[0].payload(), &[0xBA, 0xAD, 0xC0, 0xFF, 0xEE]);
    }

    #[test]
    fn pack_rejects_bad_token() {
        let mut u = Pack;
        let chunk = Chunk::root(b"0xZZ".to_vec());
        assert!(u.process(chunk).is_err());
    }
}

//! `resplit`: splits one chunk into many on a literal separator (spec.md
//! §8 "Scoped meta" scenario). Each piece becomes a sibling chunk at the
//! same scope depth, indexed in emission order (spec.md §3: "path
//! monotonic within a frame level").

use crate::chunk::Chunk;
use crate::handlers::default_registry;
use crate::multibin::{self, ArgumentError};
use crate::unit::{Unit, UnitError, UnitSwitches};

use super::UnitArgv;

pub struct Resplit {
    separator: Vec<u8>,
}

impl Resplit {
    pub fn build(argv: &UnitArgv, _switches: UnitSwitches) -> Result<Self, ArgumentError> {
        let raw = argv
            .positional
            .first()
            .ok_or_else(|| ArgumentError::HandlerFailed { handler: "resplit".into(), message: "missing separator argument".into() })?;
        // Run the separator literal through `esc` once so callers can write
        // `resplit "\n"` and get an actual newline byte, not two characters.
        let expr = multibin::compile(&format!("esc:{}", raw))
            .map_err(|message| ArgumentError::HandlerFailed { handler: "resplit".into(), message })?;
        let registry = default_registry();
        let mut scratch = Chunk::root(Vec::new());
        let separator = multibin::eval(&expr, &mut scratch, &registry, 0)
            .map_err(|e| ArgumentError::HandlerFailed { handler: "resplit".into(), message: e.to_string() })?;
        Ok(Resplit { separator })
    }
}

impl Unit for Resplit {
    fn name(&self) -> &'static str {
        "resplit"
    }

    fn process(&mut self, chunk: Chunk) -> Result<Vec<Chunk>, UnitError> {
        if self.separator.is_empty() {
            return Err(UnitError::new("resplit", "separator must not be empty"));
        }
        let payload = chunk.payload();
        let mut out = Vec::new();
        let mut start = 0usize;
        let mut index = 0u64;
        let sep_len = self.separator.len();
        let mut i = 0usize;
        while i + sep_len <= payload.len() {
            if &payload[i..i + sep_len] == self.separator.as_slice() {
                out.push(chunk.derive_child(payload[start..i].to_vec(), index));
                index += 1;
                i += sep_len;
                start = i;
            } else {
                i += 1;
            }
        }
        out.push(chunk.derive_child(payload[start..].to_vec(), index));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resplit_on_newline() {
        let argv = UnitArgv { positional: vec!["\\n".to_string()], named: Default::default() };
        let mut u = Resplit::build(&argv, UnitSwitches::default()).unwrap();
        let chunk = Chunk::root(b"abc\ndef".to_vec());
        let out = u.process(chunk).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].payload(), b"abc");
        assert_eq!(out[1].payload(), b"def");
    }
}

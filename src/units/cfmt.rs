//! `cfmt`: renders a `str.format`-like template against chunk meta
//! (spec.md §8 "Scoped meta" scenario: `cfmt "{len}:{}"` ⇒ `3:abc`).
//! `{name}` substitutes `meta[name]` (reserved names included); the bare
//! `{}` substitutes the chunk's own payload.

use crate::chunk::Chunk;
use crate::multibin::ArgumentError;
use crate::unit::{Unit, UnitError, UnitSwitches};

use super::UnitArgv;

pub struct Cfmt {
    template: String,
}

impl Cfmt {
    pub fn build(argv: &UnitArgv, _switches: UnitSwitches) -> Result<Self, ArgumentError> {
        let template = argv
            .positional
            .first()
            .ok_or_else(|| ArgumentError::HandlerFailed { handler: "cfmt".into(), message: "missing template argument".into() })?
            .clone();
        Ok(Cfmt { template })
    }
}

impl Unit for Cfmt {
    fn name(&self) -> &'static str {
        "cfmt"
    }

    fn process(&mut self, mut chunk: Chunk) -> Result<Vec<Chunk>, UnitError> {
        let index_in_frame = chunk.path().last().copied().unwrap_or(0);
        let mut out = String::new();
        let mut chars = self.template.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '{' {
                out.push(c);
                continue;
            }
            let mut name = String::new();
            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(c) => name.push(c),
                    None => return Err(UnitError::new("cfmt", "unterminated '{' in template")),
                }
            }
            if name.is_empty() {
                out.push_str(&String::from_utf8_lossy(chunk.payload()));
            } else {
                let value = chunk
                    .get_meta(&name, index_in_frame)
                    .ok_or_else(|| UnitError::new("cfmt", format!("no meta variable named {:?}", name)))?;
                out.push_str(&value.to_string());
            }
        }
        chunk.set_payload(out.into_bytes());
        Ok(vec![chunk])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::MetaValue;

    #[test]
    fn renders_named_and_bare_placeholders() {
        let argv = UnitArgv { positional: vec!["{len}:{}".to_string()], named: Default::default() };
        let mut u = Cfmt::build(&argv, UnitSwitches::default()).unwrap();
        let mut chunk = Chunk::root(b"abc".to_vec());
        chunk.meta_mut().set("len", MetaValue::Int(3), 0);
        let out = u.process(chunk).unwrap().remove(0);
        assert_eq!(out.payload(), b"3:abc");
    }
}

//! `ccp`: XOR ("copy cipher") keystream unit (spec.md §8 "Round-trip
//! crypto" scenario). XOR is its own inverse, so `process` and `reverse`
//! are identical; `is_reversible` is still advertised so `-R` is accepted.

use std::rc::Rc;

use crate::chunk::Chunk;
use crate::handlers::HandlerRegistry;
use crate::multibin::{self, ArgumentError, CompiledExpr};
use crate::unit::{Unit, UnitError, UnitSwitches};

use super::UnitArgv;

pub struct Ccp {
    key_expr: CompiledExpr,
    registry: Rc<HandlerRegistry>,
}

impl Ccp {
    pub fn build(argv: &UnitArgv, _switches: UnitSwitches, registry: Rc<HandlerRegistry>) -> Result<Self, ArgumentError> {
        let raw = argv
            .positional
            .first()
            .ok_or_else(|| ArgumentError::HandlerFailed { handler: "ccp".into(), message: "missing keystream argument".into() })?;
        let key_expr = multibin::compile(raw).map_err(|message| ArgumentError::HandlerFailed { handler: "ccp".into(), message })?;
        Ok(Ccp { key_expr, registry })
    }

    fn apply(&mut self, mut chunk: Chunk) -> Result<Vec<Chunk>, UnitError> {
        let key = multibin::eval(&self.key_expr, &mut chunk, &self.registry, 0).map_err(|e| UnitError::new("ccp", e.to_string()))?;
        if key.is_empty() {
            return Err(UnitError::new("ccp", "keystream must not be empty"));
        }
        let xored: Vec<u8> = chunk.payload().iter().enumerate().map(|(i, b)| b ^ key[i % key.len()]).collect();
        chunk.set_payload(xored);
        Ok(vec![chunk])
    }
}

impl Unit for Ccp {
    fn name(&self) -> &'static str {
        "ccp"
    }

    fn is_reversible(&self) -> bool {
        true
    }

    fn process(&mut self, chunk: Chunk) -> Result<Vec<Chunk>, UnitError> {
        self.apply(chunk)
    }

    fn reverse(&mut self, chunk: Chunk) -> Result<Vec<Chunk>, UnitError> {
        self.apply(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::default_registry;

    #[test]
    fn xor_is_its_own_inverse() {
        let registry = Rc::new(default_registry());
        let argv = UnitArgv { positional: vec!["md5:var:seed".to_string()], named: Default::default() };
        let mut u = Ccp::build(&argv, UnitSwitches::default(), registry).unwrap();
        let mut chunk = Chunk::root(b"hi".to_vec());
        chunk.meta_mut().set("seed", crate::meta::MetaValue::Str("x".into()), 0);
        let scrambled = u.process(chunk).unwrap().remove(0);
        assert_ne!(scrambled.payload(), b"hi");
        let restored = u.process(scrambled).unwrap().remove(0);
        assert_eq!(restored.payload(), b"hi");
    }
}

//! Source units (spec.md §4.4, §8 scenarios): `emit` (literal multibin
//! value) and `ef` (read a whole file). Both ignore whatever chunk the
//! driver feeds them as the head of a pipeline — by convention the driver
//! seeds the head unit with one empty root chunk (spec.md §5: "bytes enter
//! the head unit on stdin, are framed") and a source unit replaces its
//! payload entirely rather than transforming it.

use std::rc::Rc;

use crate::chunk::Chunk;
use crate::handlers::HandlerRegistry;
use crate::multibin::{self, ArgumentError, CompiledExpr};
use crate::unit::{Unit, UnitError, UnitSwitches};

use super::UnitArgv;

pub struct Emit {
    expr: CompiledExpr,
    registry: Rc<HandlerRegistry>,
}

impl Emit {
    pub fn build(argv: &UnitArgv, _switches: UnitSwitches, registry: Rc<HandlerRegistry>) -> Result<Self, ArgumentError> {
        let raw = argv
            .positional
            .first()
            .ok_or_else(|| ArgumentError::HandlerFailed { handler: "emit".into(), message: "missing literal argument".into() })?;
        let expr = multibin::compile(raw).map_err(|message| ArgumentError::HandlerFailed { handler: "emit".into(), message })?;
        Ok(Emit { expr, registry })
    }
}

impl Unit for Emit {
    fn name(&self) -> &'static str {
        "emit"
    }

    fn process(&mut self, mut chunk: Chunk) -> Result<Vec<Chunk>, UnitError> {
        let value = multibin::eval(&self.expr, &mut chunk, &self.registry, 0)
            .map_err(|e| UnitError::new("emit", e.to_string()))?;
        chunk.set_payload(value);
        Ok(vec![chunk])
    }
}

pub struct Ef {
    expr: CompiledExpr,
    registry: Rc<HandlerRegistry>,
}

impl Ef {
    pub fn build(argv: &UnitArgv, _switches: UnitSwitches, registry: Rc<HandlerRegistry>) -> Result<Self, ArgumentError> {
        let raw = argv
            .positional
            .first()
            .ok_or_else(|| ArgumentError::HandlerFailed { handler: "ef".into(), message: "missing path argument".into() })?;
        let wrapped = format!("file:{}", raw);
        let expr = multibin::compile(&wrapped).map_err(|message| ArgumentError::HandlerFailed { handler: "ef".into(), message })?;
        Ok(Ef { expr, registry })
    }
}

impl Unit for Ef {
    fn name(&self) -> &'static str {
        "ef"
    }

    fn process(&mut self, mut chunk: Chunk) -> Result<Vec<Chunk>, UnitError> {
        let value = multibin::eval(&self.expr, &mut chunk, &self.registry, 0)
            .map_err(|e| UnitError::new("ef", e.to_string()))?;
        chunk.set_payload(value);
        Ok(vec![chunk])
    }
}

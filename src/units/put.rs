//! `put`: binds a value to a meta name on the current chunk (spec.md §8
//! "Scoped meta" scenario: `put len size` copies the reserved `size` value
//! into a new meta name `len`). The source may be any meta name (including
//! a reserved computed one) or, when it is not a bare identifier, a full
//! multibin expression evaluated against the chunk.

use std::rc::Rc;

use crate::chunk::Chunk;
use crate::handlers::HandlerRegistry;
use crate::meta::{self, MetaValue};
use crate::multibin::{self, ArgumentError, CompiledExpr};
use crate::unit::{Unit, UnitError, UnitSwitches};

use super::UnitArgv;

enum Source {
    MetaName(String),
    Expr(CompiledExpr),
}

pub struct Put {
    dest: String,
    source: Source,
    registry: Rc<HandlerRegistry>,
}

impl Put {
    pub fn build(argv: &UnitArgv, _switches: UnitSwitches, registry: Rc<HandlerRegistry>) -> Result<Self, ArgumentError> {
        let dest = argv
            .positional
            .first()
            .ok_or_else(|| ArgumentError::HandlerFailed { handler: "put".into(), message: "missing destination name".into() })?
            .clone();
        if !meta::is_valid_name(&dest) {
            return Err(ArgumentError::HandlerFailed { handler: "put".into(), message: format!("{:?} is not a valid meta name", dest) });
        }
        let source_raw = argv
            .positional
            .get(1)
            .ok_or_else(|| ArgumentError::HandlerFailed { handler: "put".into(), message: "missing source argument".into() })?;
        let source = if meta::is_valid_name(source_raw) || meta::is_reserved(source_raw) {
            Source::MetaName(source_raw.clone())
        } else {
            let expr = multibin::compile(source_raw).map_err(|message| ArgumentError::HandlerFailed { handler: "put".into(), message })?;
            Source::Expr(expr)
        };
        Ok(Put { dest, source, registry })
    }
}

impl Unit for Put {
    fn name(&self) -> &'static str {
        "put"
    }

    fn process(&mut self, mut chunk: Chunk) -> Result<Vec<Chunk>, UnitError> {
        let index_in_frame = chunk.path().last().copied().unwrap_or(0);
        let value = match &self.source {
            Source::MetaName(name) => chunk
                .get_meta(name, index_in_frame)
                .ok_or_else(|| UnitError::new("put", format!("no meta variable named {:?}", name)))?,
            Source::Expr(expr) => {
                let bytes = multibin::eval(expr, &mut chunk, &self.registry, 0).map_err(|e| UnitError::new("put", e.to_string()))?;
                MetaValue::Bytes(bytes)
            }
        };
        let depth = chunk.scope_depth();
        chunk.meta_mut().set(self.dest.clone(), value, depth);
        Ok(vec![chunk])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::default_registry;

    #[test]
    fn put_copies_reserved_size_into_new_name() {
        let registry = Rc::new(default_registry());
        let argv = UnitArgv { positional: vec!["len".to_string(), "size".to_string()], named: Default::default() };
        let mut u = Put::build(&argv, UnitSwitches::default(), registry).unwrap();
        let chunk = Chunk::root(b"abc".to_vec());
        let out = u.process(chunk).unwrap().remove(0);
        assert_eq!(out.get_meta("len", 0), Some(MetaValue::Int(3)));
    }
}

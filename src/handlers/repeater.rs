//! Repeater handlers (spec.md §4.3): `rep`, `accu`.

use super::{HandlerCtx, HandlerRegistry};
use crate::meta::MetaValue;
use crate::multibin::{self, ArgumentError};

pub fn register(r: &mut HandlerRegistry) {
    r.register("rep", rep);
    r.register("accu", accu);
}

fn fail(handler: &str, message: impl Into<String>) -> ArgumentError {
    ArgumentError::HandlerFailed { handler: handler.to_string(), message: message.into() }
}

/// `rep[count]:value` repeats `value` `count` times.
fn rep(ctx: HandlerCtx) -> Result<Vec<u8>, ArgumentError> {
    let count: usize = ctx
        .args
        .first()
        .map(String::as_str)
        .unwrap_or("1")
        .parse()
        .map_err(|_| fail("rep", "count argument is not a non-negative integer"))?;
    Ok(ctx.value.repeat(count))
}

/// `accu[subexpr]:count` evaluates `subexpr` once per index `0..count`,
/// binding the transient meta variable `i` for each iteration (readable
/// from `subexpr` as `var:i`), and concatenates the results — a
/// deterministic generated byte sequence (SPEC_FULL.md §4.3).
fn accu(mut ctx: HandlerCtx) -> Result<Vec<u8>, ArgumentError> {
    let subexpr = ctx
        .args
        .first()
        .map(String::as_str)
        .ok_or_else(|| fail("accu", "missing sub-pipeline argument"))?
        .to_string();
    let count: u64 = std::str::from_utf8(&ctx.value)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| fail("accu", "value is not a count"))?;

    if ctx.depth + 1 > multibin::MAX_RECURSION_DEPTH {
        return Err(ArgumentError::RecursionLimitExceeded);
    }
    let compiled = multibin::compile(&subexpr).map_err(|message| fail("accu", message))?;

    let scope = ctx.chunk.scope_depth() + 1;
    let mut out = Vec::new();
    for i in 0..count {
        ctx.chunk.meta_mut().set("i", MetaValue::Int(i as i64), scope);
        let piece = multibin::eval(&compiled, ctx.chunk, ctx.registry, ctx.depth + 1)
            .map_err(|e| fail("accu", e.to_string()))?;
        out.extend_from_slice(&piece);
    }
    ctx.chunk.meta_mut().close_scope(scope);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::Chunk;
    use crate::handlers::default_registry;

    #[test]
    fn rep_repeats_value() {
        let registry = default_registry();
        let mut chunk = Chunk::root(Vec::new());
        let args = vec!["3".to_string()];
        let ctx = HandlerCtx { value: b"ab".to_vec(), args: &args, chunk: &mut chunk, registry: &registry, depth: 0, index_in_frame: 0 };
        assert_eq!(rep(ctx).unwrap(), b"ababab");
    }

    #[test]
    fn accu_concatenates_indexed_results() {
        let registry = default_registry();
        let mut chunk = Chunk::root(Vec::new());
        let args = vec!["var:i".to_string()];
        let ctx = HandlerCtx { value: b"3".to_vec(), args: &args, chunk: &mut chunk, registry: &registry, depth: 0, index_in_frame: 0 };
        assert_eq!(accu(ctx).unwrap(), b"012");
        assert!(chunk.get_meta("i", 0).is_none());
    }
}

//! Sub-pipeline handlers (spec.md §4.3, §9): `eat`, `q`.
//!
//! Both take one *opaque* bracket argument — a `|`-separated unit-pipe
//! spec string (`eat[u1|u2]:x`, see `multibin::parse::OPAQUE_ARG_HANDLERS`),
//! not a multibin expression — and run it as a real nested pipeline
//! (spec.md §9: "Nested pipelines inside handlers ... a recursive driver
//! call on an in-memory pipe"), respecting `MAX_RECURSION_DEPTH`. `eat`
//! runs the sub-pipeline against the enclosing chunk's own payload and
//! propagates any failure; `q` is the lenient ("quiet") variant, falling
//! back to the untouched input value on failure.

use std::rc::Rc;

use super::{HandlerCtx, HandlerRegistry};
use crate::chunk::Chunk;
use crate::cli;
use crate::multibin::{self, ArgumentError};
use crate::pipeline;

pub fn register(r: &mut HandlerRegistry) {
    r.register("eat", eat);
    r.register("q", q);
}

fn sub_expr(ctx: &HandlerCtx) -> Result<&str, ArgumentError> {
    ctx.args
        .first()
        .map(String::as_str)
        .ok_or_else(|| ArgumentError::HandlerFailed { handler: "eat".into(), message: "missing sub-pipeline argument".into() })
}

/// Split a `u1|u2|...` sub-pipeline spec into argv-style tokens — a `|`
/// token between unit spans, whitespace-split within one — the same shape
/// `cli::parse_pipeline` expects from real argv.
fn tokenize(expr: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for (i, span) in expr.split('|').enumerate() {
        if i > 0 {
            tokens.push("|".to_string());
        }
        tokens.extend(span.split_whitespace().map(str::to_string));
    }
    tokens
}

fn run_sub_pipeline(handler: &'static str, expr: &str, ctx: &mut HandlerCtx) -> Result<Vec<u8>, ArgumentError> {
    if ctx.depth + 1 > multibin::MAX_RECURSION_DEPTH {
        return Err(ArgumentError::RecursionLimitExceeded);
    }
    let fail = |message: String| ArgumentError::HandlerFailed { handler: handler.to_string(), message };

    let tokens = tokenize(expr);
    let nodes = cli::parse_pipeline(&tokens)?;
    let registry = Rc::new(ctx.registry.clone());
    let mut stages = pipeline::build_stages(nodes, &registry)?;

    let seed = ctx.chunk.derive_child(ctx.chunk.payload().to_vec(), 0);
    let produced = pipeline::driver::run(&mut stages, vec![seed], true).map_err(|e| fail(e.to_string()))?;
    produced
        .into_iter()
        .next()
        .map(Chunk::into_payload)
        .ok_or_else(|| fail("sub-pipeline produced no chunk".into()))
}

fn eat(mut ctx: HandlerCtx) -> Result<Vec<u8>, ArgumentError> {
    let expr = sub_expr(&ctx)?.to_string();
    run_sub_pipeline("eat", &expr, &mut ctx)
}

fn q(mut ctx: HandlerCtx) -> Result<Vec<u8>, ArgumentError> {
    let expr = match sub_expr(&ctx) {
        Ok(e) => e.to_string(),
        Err(_) => return Ok(ctx.value),
    };
    let fallback = ctx.value.clone();
    match run_sub_pipeline("q", &expr, &mut ctx) {
        Ok(out) => Ok(out),
        Err(ArgumentError::RecursionLimitExceeded) => Err(ArgumentError::RecursionLimitExceeded),
        Err(_) => Ok(fallback),
    }
}

#[cfg(test)]
mod tests {
    use base64::Engine;

    use super::*;
    use crate::handlers::default_registry;

    #[test]
    fn eat_runs_a_single_unit_sub_pipeline_against_chunk() {
        let registry = default_registry();
        let mut chunk = Chunk::root(b"SGVsbG8=".to_vec());
        let args = vec!["b64".to_string()];
        let ctx = HandlerCtx { value: b"ignored".to_vec(), args: &args, chunk: &mut chunk, registry: &registry, depth: 0, index_in_frame: 0 };
        assert_eq!(eat(ctx).unwrap(), b"Hello");
    }

    #[test]
    fn eat_runs_a_multi_unit_sub_pipeline_joined_by_pipes() {
        let registry = default_registry();
        let mut chunk = Chunk::root(b"Hello".to_vec());
        let args = vec!["hex -R|b64 -R".to_string()];
        let ctx = HandlerCtx { value: b"ignored".to_vec(), args: &args, chunk: &mut chunk, registry: &registry, depth: 0, index_in_frame: 0 };
        // hex -R: "Hello" -> "48656C6C6F", then b64 -R of that text.
        let expected = base64::engine::general_purpose::STANDARD.encode(b"48656C6C6F");
        assert_eq!(eat(ctx).unwrap(), expected.into_bytes());
    }

    #[test]
    fn q_falls_back_to_input_on_failure() {
        let registry = default_registry();
        let mut chunk = Chunk::root(b"not base64!!".to_vec());
        let args = vec!["b64".to_string()];
        let ctx = HandlerCtx { value: b"original".to_vec(), args: &args, chunk: &mut chunk, registry: &registry, depth: 0, index_in_frame: 0 };
        assert_eq!(q(ctx).unwrap(), b"original");
    }

    #[test]
    fn eat_propagates_failure() {
        let registry = default_registry();
        let mut chunk = Chunk::root(b"not base64!!".to_vec());
        let args = vec!["b64".to_string()];
        let ctx = HandlerCtx { value: b"x".to_vec(), args: &args, chunk: &mut chunk, registry: &registry, depth: 0, index_in_frame: 0 };
        assert!(eat(ctx).is_err());
    }
}

//! Slicer handlers (spec.md §4.3): `cut`, `copy`.
//!
//! Resolves the Open Question in spec.md §9 ("precise delimiter rules of
//! slice arguments ... when negative indices or non-numeric variables are
//! used") the way SPEC_FULL.md §4.3 states: Python-slice-like bounds,
//! negative indices count from the end, a non-numeric argument is looked
//! up as a meta variable name.

use super::{HandlerCtx, HandlerRegistry};
use crate::meta::MetaValue;
use crate::multibin::ArgumentError;

pub fn register(r: &mut HandlerRegistry) {
    r.register("cut", cut);
    r.register("copy", copy);
}

fn fail(handler: &str, message: impl Into<String>) -> ArgumentError {
    ArgumentError::HandlerFailed { handler: handler.to_string(), message: message.into() }
}

/// Resolve one slice bound: empty -> `None` (caller supplies the default),
/// a parseable integer -> that integer (negative counts from the end),
/// anything else -> looked up as a meta variable name and coerced to an
/// integer.
fn resolve_bound(
    handler: &str,
    arg: &str,
    chunk: &crate::chunk::Chunk,
    index_in_frame: u64,
    len: usize,
) -> Result<Option<usize>, ArgumentError> {
    if arg.is_empty() {
        return Ok(None);
    }
    let raw: i64 = if let Ok(n) = arg.parse::<i64>() {
        n
    } else {
        let value = chunk
            .get_meta(arg, index_in_frame)
            .ok_or_else(|| fail(handler, format!("no meta variable named {:?}", arg)))?;
        coerce_int(handler, &value)?
    };
    let idx = if raw < 0 { (len as i64 + raw).max(0) } else { raw };
    Ok(Some(idx.min(len as i64) as usize))
}

fn coerce_int(handler: &str, value: &MetaValue) -> Result<i64, ArgumentError> {
    match value {
        MetaValue::Int(i) => Ok(*i),
        MetaValue::Str(s) => s.parse().map_err(|_| fail(handler, format!("{:?} is not an integer", s))),
        MetaValue::Bytes(b) => std::str::from_utf8(b)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| fail(handler, "bytes value is not an integer")),
        MetaValue::List(_) => Err(fail(handler, "a list cannot be used as a slice bound")),
    }
}

fn bounds(handler: &str, ctx: &HandlerCtx, len: usize) -> Result<(usize, usize), ArgumentError> {
    let start_arg = ctx.args.first().map(String::as_str).unwrap_or("");
    let end_arg = ctx.args.get(1).map(String::as_str).unwrap_or("");
    let start = resolve_bound(handler, start_arg, ctx.chunk, ctx.index_in_frame, len)?.unwrap_or(0);
    let end = resolve_bound(handler, end_arg, ctx.chunk, ctx.index_in_frame, len)?.unwrap_or(len);
    if start > end {
        return Err(fail(handler, format!("start {} is past end {}", start, end)));
    }
    Ok((start, end))
}

/// Extracts `value[start..end]` and removes that span from the enclosing
/// chunk's own payload (spec.md §4.3).
fn cut(ctx: HandlerCtx) -> Result<Vec<u8>, ArgumentError> {
    let (start, end) = bounds("cut", &ctx, ctx.value.len())?;
    let slice = ctx.value[start..end].to_vec();
    let mut remainder = ctx.value[..start].to_vec();
    remainder.extend_from_slice(&ctx.value[end..]);
    ctx.chunk.set_payload(remainder);
    Ok(slice)
}

/// Extracts `value[start..end]` without mutating the enclosing chunk.
fn copy(ctx: HandlerCtx) -> Result<Vec<u8>, ArgumentError> {
    let (start, end) = bounds("copy", &ctx, ctx.value.len())?;
    Ok(ctx.value[start..end].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::Chunk;
    use crate::handlers::default_registry;

    fn run(handler: super::super::HandlerFn, value: &[u8], args: &[&str], chunk: &mut Chunk, registry: &HandlerRegistry) -> Vec<u8> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let ctx = HandlerCtx { value: value.to_vec(), args: &args, chunk, registry, depth: 0, index_in_frame: 0 };
        handler(ctx).unwrap()
    }

    #[test]
    fn cut_extracts_and_mutates_chunk() {
        let registry = default_registry();
        let mut chunk = Chunk::root(b"0123456789abcdef".to_vec());
        let out = run(cut, chunk.payload(), &["", "16"], &mut chunk, &registry);
        assert_eq!(out, b"0123456789abcdef");
        assert_eq!(chunk.payload(), b"");
    }

    #[test]
    fn copy_extracts_without_mutating() {
        let registry = default_registry();
        let mut chunk = Chunk::root(b"hello world".to_vec());
        let value = chunk.payload().to_vec();
        let out = run(copy, &value, &["0", "5"], &mut chunk, &registry);
        assert_eq!(out, b"hello");
        assert_eq!(chunk.payload(), b"hello world");
    }

    #[test]
    fn negative_indices_count_from_end() {
        let registry = default_registry();
        let mut chunk = Chunk::root(b"hello world".to_vec());
        let value = chunk.payload().to_vec();
        let out = run(copy, &value, &["-5", ""], &mut chunk, &registry);
        assert_eq!(out, b"world");
    }
}

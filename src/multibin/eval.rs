//! Evaluates a [`CompiledExpr`] against a chunk (spec.md §4.3).

use std::fmt;

use super::ir::{Base, CompiledExpr};
use crate::chunk::Chunk;
use crate::handlers::{HandlerCtx, HandlerRegistry};

/// Maximum nesting depth for sub-pipeline handlers (`eat`, `q`) — spec.md
/// §9: "enforce a configurable recursion depth cap to prevent stack
/// blow-up".
pub const MAX_RECURSION_DEPTH: u32 = 64;

/// Multibin parse/evaluation failure (spec.md §7: `ArgumentError`, fatal,
/// exit code 2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    UnknownHandler(String),
    MissingPayload,
    RecursionLimitExceeded,
    HandlerFailed { handler: String, message: String },
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentError::UnknownHandler(name) => write!(f, "unknown handler {:?}", name),
            ArgumentError::MissingPayload => write!(f, "payload missing where required"),
            ArgumentError::RecursionLimitExceeded => write!(f, "sub-pipeline recursion limit exceeded"),
            ArgumentError::HandlerFailed { handler, message } => write!(f, "handler {:?} failed: {}", handler, message),
        }
    }
}

impl std::error::Error for ArgumentError {}

/// Evaluate `expr` against `chunk`, consulting `registry` for handler
/// implementations. `depth` is the current sub-pipeline recursion depth
/// (0 at top level); handlers that recurse (`eat`, `q`) must check and
/// increment it themselves via [`MAX_RECURSION_DEPTH`].
pub fn eval(
    expr: &CompiledExpr,
    chunk: &mut Chunk,
    registry: &HandlerRegistry,
    depth: u32,
) -> Result<Vec<u8>, ArgumentError> {
    if depth > MAX_RECURSION_DEPTH {
        return Err(ArgumentError::RecursionLimitExceeded);
    }
    let mut value = match &expr.base {
        Base::Literal(bytes) => bytes.clone(),
        Base::InputChunk => chunk.payload().to_vec(),
    };
    // The chunk's own trailing path index doubles as its ordinal within the
    // current frame (spec.md §3: "path monotonic within a frame level"), so
    // the reserved `index` meta name needs no separate counter threaded in.
    let index_in_frame = chunk.path().last().copied().unwrap_or(0);
    for call in expr.handlers.iter().rev() {
        let handler = registry
            .get(&call.name)
            .ok_or_else(|| ArgumentError::UnknownHandler(call.name.clone()))?;
        let ctx = HandlerCtx { value, args: &call.args, chunk, registry, depth, index_in_frame };
        value = handler(ctx)?;
    }
    Ok(value)
}

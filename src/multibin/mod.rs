//! The multibin argument language (spec.md §4.3): a small expression
//! language evaluated at argument-parse time into a pure function from
//! `(input chunk, meta, handler registry)` to bytes.
//!
//! Split the way the teacher splits its algorithmic modules: `parse` turns
//! source text into a tree, `ir` is the compiled-once representation
//! (spec.md §9: "compile multibin expressions once into a small IR ...
//! execute the IR per chunk"), `eval` walks the IR against a chunk.

pub mod eval;
pub mod ir;
pub mod parse;

pub use eval::{eval, ArgumentError, MAX_RECURSION_DEPTH};
pub use ir::CompiledExpr;
pub use parse::compile;

//! The compiled multibin IR (spec.md §9): parsed once per unit-argument
//! binding, then executed per chunk.

/// One handler atom in a composed expression: `name[arg1,arg2]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerCall {
    pub name: String,
    pub args: Vec<String>,
}

/// The terminal value a compiled expression starts evaluating from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Base {
    /// A literal byte string taken verbatim from the argv token.
    Literal(Vec<u8>),
    /// No trailing literal was present (e.g. `cut::16`): the base value is
    /// the effective input chunk's own payload.
    InputChunk,
}

/// A fully parsed multibin expression: zero or more handler atoms applied
/// right-to-left to a base value (spec.md §4.3: "evaluation is
/// right-to-left").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledExpr {
    pub handlers: Vec<HandlerCall>,
    pub base: Base,
}

//! The handler registry (spec.md §4.3): the named, open set of multibin
//! handlers. Mirrors the way the teacher exposes its compression engine —
//! a handful of focused submodules re-exported through one `mod.rs`.

pub mod decoder;
pub mod file;
pub mod kdf;
pub mod reader;
pub mod repeater;
pub mod slicer;
pub mod subpipeline;

use std::collections::HashMap;

use crate::chunk::Chunk;
use crate::multibin::ArgumentError;

/// Everything one handler invocation needs: the value produced by the
/// handler to its right, this atom's raw argument strings, and mutable
/// access to the chunk under evaluation (spec.md §4.3: "handlers receive
/// the effective input chunk ... so that `cut` can modify it").
pub struct HandlerCtx<'a> {
    pub value: Vec<u8>,
    pub args: &'a [String],
    pub chunk: &'a mut Chunk,
    pub registry: &'a HandlerRegistry,
    pub depth: u32,
    pub index_in_frame: u64,
}

pub type HandlerFn = fn(HandlerCtx) -> Result<Vec<u8>, ArgumentError>;

/// The named set of multibin handlers (spec.md §4.3: "the registry is
/// open"). Built-ins are registered by [`default_registry`]; callers may
/// add more via [`HandlerRegistry::register`].
#[derive(Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<&'static str, HandlerFn>,
}

impl HandlerRegistry {
    pub fn empty() -> Self {
        HandlerRegistry { handlers: HashMap::new() }
    }

    pub fn register(&mut self, name: &'static str, f: HandlerFn) {
        self.handlers.insert(name, f);
    }

    pub fn get(&self, name: &str) -> Option<HandlerFn> {
        self.handlers.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }
}

/// The default handler set shipped with this crate (SPEC_FULL.md §4.3).
pub fn default_registry() -> HandlerRegistry {
    let mut r = HandlerRegistry::empty();
    decoder::register(&mut r);
    reader::register(&mut r);
    slicer::register(&mut r);
    kdf::register(&mut r);
    subpipeline::register(&mut r);
    repeater::register(&mut r);
    file::register(&mut r);
    r
}

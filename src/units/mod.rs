//! Concrete units (SPEC_FULL.md §4.4). Each submodule owns one family;
//! `build` is the factory the pipeline driver calls once per pipeline-spec
//! leaf, mirroring the way the teacher's `cli::dispatch` maps a parsed
//! `OpMode` to a concrete compress/decompress call.

pub mod aes;
pub mod ccp;
pub mod cfmt;
pub mod codec;
pub mod emit;
pub mod filter;
pub mod nop;
pub mod pack;
pub mod put;
pub mod resplit;
pub mod zl;

use std::collections::HashMap;
use std::rc::Rc;

use crate::handlers::HandlerRegistry;
use crate::multibin::{self, ArgumentError, CompiledExpr};
use crate::unit::{Unit, UnitSwitches};

/// Everything a unit factory needs, already split into multibin-expression
/// positionals and `--name value` options (spec.md §6 CLI shape).
#[derive(Debug, Clone, Default)]
pub struct UnitArgv {
    pub positional: Vec<String>,
    pub named: HashMap<String, String>,
}

impl UnitArgv {
    pub fn compile_positional(&self, registry: &HandlerRegistry) -> Result<Vec<CompiledExpr>, ArgumentError> {
        self.positional
            .iter()
            .map(|s| multibin::compile(s).map_err(|message| ArgumentError::HandlerFailed { handler: s.clone(), message }))
            .collect()
    }

    pub fn compile_named(&self, key: &str) -> Result<Option<CompiledExpr>, ArgumentError> {
        match self.named.get(key) {
            Some(s) => multibin::compile(s)
                .map(Some)
                .map_err(|message| ArgumentError::HandlerFailed { handler: key.to_string(), message }),
            None => Ok(None),
        }
    }
}

/// Construct the unit named `name` with the given argv and switches. The
/// handler registry is shared (read-only after startup, spec.md §5) across
/// every unit instance in one pipeline.
pub fn build(
    name: &str,
    argv: &UnitArgv,
    switches: UnitSwitches,
    registry: Rc<HandlerRegistry>,
) -> Result<Box<dyn Unit>, ArgumentError> {
    match name {
        "emit" => emit::Emit::build(argv, switches, registry).map(|u| Box::new(u) as Box<dyn Unit>),
        "ef" => emit::Ef::build(argv, switches, registry).map(|u| Box::new(u) as Box<dyn Unit>),
        "pack" => pack::Pack::build(argv, switches).map(|u| Box::new(u) as Box<dyn Unit>),
        "hex" => codec::Codec::build_hex(argv, switches).map(|u| Box::new(u) as Box<dyn Unit>),
        "b64" => codec::Codec::build_b64(argv, switches).map(|u| Box::new(u) as Box<dyn Unit>),
        "zl" => zl::Zl::build(argv, switches).map(|u| Box::new(u) as Box<dyn Unit>),
        "aes" => aes::Aes::build(argv, switches, registry).map(|u| Box::new(u) as Box<dyn Unit>),
        "ccp" => ccp::Ccp::build(argv, switches, registry).map(|u| Box::new(u) as Box<dyn Unit>),
        "resplit" => resplit::Resplit::build(argv, switches).map(|u| Box::new(u) as Box<dyn Unit>),
        "put" => put::Put::build(argv, switches, registry).map(|u| Box::new(u) as Box<dyn Unit>),
        "cfmt" => cfmt::Cfmt::build(argv, switches).map(|u| Box::new(u) as Box<dyn Unit>),
        "sorted" => filter::Sorted::build(argv, switches).map(|u| Box::new(u) as Box<dyn Unit>),
        "dedup" => filter::Dedup::build(argv, switches).map(|u| Box::new(u) as Box<dyn Unit>),
        "nop" => Ok(Box::new(nop::Nop)),
        other => Err(ArgumentError::UnknownHandler(other.to_string())),
    }
}

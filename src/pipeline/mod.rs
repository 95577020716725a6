//! The pipeline spec tree and driver (spec.md §4.5).

pub mod driver;

use std::rc::Rc;

use crate::chunk::Chunk;
use crate::handlers::HandlerRegistry;
use crate::multibin::ArgumentError;
use crate::unit::{Unit, UnitSwitches};
use crate::units::{self, UnitArgv};

/// `[ ... ]` pushes a frame around its body; `[| ... |]` additionally
/// starts the body's chunks invisible (spec.md §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Plain,
    Scoped,
}

/// One leaf or bracket group in a parsed pipeline (spec.md §3: "Pipeline
/// spec ... tree: leaves are unit invocations; internal nodes are bracket
/// groups").
pub enum Stage {
    Unit { unit: Box<dyn Unit>, switches: UnitSwitches },
    Group { kind: GroupKind, body: Vec<Stage> },
}

/// The parsed-but-not-yet-instantiated form (what the CLI tokenizer
/// produces): unit leaves carry their raw name/argv/switches so the same
/// spec can be turned into live `Stage`s against any handler registry.
pub enum SpecNode {
    Unit { name: String, argv: UnitArgv, switches: UnitSwitches },
    Group { kind: GroupKind, body: Vec<SpecNode> },
}

/// Instantiate every unit leaf in `nodes` against `registry`, producing a
/// runnable stage chain.
pub fn build_stages(nodes: Vec<SpecNode>, registry: &Rc<HandlerRegistry>) -> Result<Vec<Stage>, ArgumentError> {
    nodes
        .into_iter()
        .map(|node| build_stage(node, registry))
        .collect()
}

fn build_stage(node: SpecNode, registry: &Rc<HandlerRegistry>) -> Result<Stage, ArgumentError> {
    match node {
        SpecNode::Unit { name, argv, switches } => {
            let unit = units::build(&name, &argv, switches, Rc::clone(registry))?;
            Ok(Stage::Unit { unit, switches })
        }
        SpecNode::Group { kind, body } => Ok(Stage::Group { kind, body: build_stages(body, registry)? }),
    }
}

/// Render the chunks a whole-pipeline-expression run finished with into the
/// bytes `binref` writes to stdout (spec.md §6). `visible` only ever gates
/// whether a chunk is handed to the *next unit* unchanged (spec.md §3:
/// "invisible chunks traverse a unit unchanged and are not processed") —
/// nothing in the contract says an invisible chunk is excluded from the
/// pipeline's own final output, and the mandatory "Scoped meta" scenario
/// (`... [| put len size | cfmt "{len}:{}" ]` ⇒ `3:abc\n3:def`) only prints
/// anything at all because its last stage is itself the scoped group, whose
/// produced chunks stay invisible (nothing inside re-marks them visible).
/// So every surviving top-level chunk renders, regardless of `.visible()`.
/// Multiple chunks are newline-joined rather than concatenated byte-for-byte
/// (that scenario's two final chunks print as `3:abc\n3:def`, not
/// `3:abc3:def`).
pub fn render_whole_pipeline_output(chunks: &[Chunk]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut iter = chunks.iter().peekable();
    while let Some(chunk) = iter.next() {
        out.extend_from_slice(chunk.payload());
        if iter.peek().is_some() {
            out.push(b'\n');
        }
    }
    out
}

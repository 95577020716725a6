//! Executes a built stage chain (spec.md §4.5/§5): each stage pulls the
//! whole chunk batch the previous stage produced and hands its own batch to
//! the next, so one pipeline invocation stays a single call stack — no OS
//! threads, no channels (spec.md §5: single-threaded cooperative). Bracket
//! groups recurse: each input chunk opens its own nested frame and the
//! group's body runs to completion against just that one chunk before the
//! outer chain continues, matching "a bracketed sub-pipeline is executed
//! once per input chunk of the surrounding scope" (spec.md §4.5).

use crate::chunk::Chunk;
use crate::error::RefineryError;
use crate::logging::warn_dropped_chunk;

use super::{GroupKind, Stage};

/// Run `stages` against `input`, in order. `quiet` suppresses the stderr
/// warning line for dropped chunks (`-Q`); unit errors are always non-fatal
/// by default (spec.md §7: "UnitError ... non-fatal by default").
pub fn run(stages: &mut [Stage], input: Vec<Chunk>, quiet: bool) -> Result<Vec<Chunk>, RefineryError> {
    let mut current = input;
    for stage in stages.iter_mut() {
        current = run_one_stage(stage, current, quiet)?;
    }
    Ok(current)
}

fn run_one_stage(stage: &mut Stage, input: Vec<Chunk>, quiet: bool) -> Result<Vec<Chunk>, RefineryError> {
    match stage {
        Stage::Unit { unit, switches } => {
            let mut out = Vec::with_capacity(input.len());
            for chunk in input {
                if !chunk.visible() {
                    // Invisible chunks traverse a unit unchanged (spec.md §3).
                    out.push(chunk);
                    continue;
                }
                let path = chunk.path_string();
                let result = if switches.reverse { unit.reverse(chunk) } else { unit.process(chunk) };
                match result {
                    Ok(mut produced) => out.append(&mut produced),
                    Err(e) => warn_dropped_chunk(&e, &path, quiet || switches.quiet),
                }
            }
            if unit.is_frame_aware() {
                out = unit.filter(out)?;
            }
            Ok(out)
        }
        Stage::Group { kind, body } => {
            let mut out = Vec::new();
            for chunk in input {
                let mut entered = chunk.enter_frame(0);
                if *kind == GroupKind::Scoped {
                    entered.set_visible(false);
                }
                let frame_depth = entered.scope_depth();
                let mut produced = run(body, vec![entered], quiet)?;
                // Prune meta bound inside the frame as it closes (spec.md
                // §8 law 4: a variable bound at depth d is unset once read
                // back outside it).
                for c in &mut produced {
                    c.meta_mut().close_scope(frame_depth);
                }
                out.extend(produced);
            }
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::default_registry;
    use crate::pipeline::{build_stages, SpecNode};
    use crate::units::UnitArgv;
    use crate::unit::UnitSwitches;
    use std::rc::Rc;

    fn unit_node(name: &str, positional: &[&str]) -> SpecNode {
        SpecNode::Unit {
            name: name.to_string(),
            argv: UnitArgv { positional: positional.iter().map(|s| s.to_string()).collect(), named: Default::default() },
            switches: UnitSwitches::default(),
        }
    }

    #[test]
    fn decode_chain_matches_spec_scenario() {
        let registry = Rc::new(default_registry());
        let nodes = vec![
            unit_node("emit", &["M7EwMzVzBkI3IwNTczM3cyMg2wQA"]),
            unit_node("b64", &[]),
            unit_node("zl", &[]),
            unit_node("hex", &[]),
        ];
        let mut stages = build_stages(nodes, &registry).unwrap();
        let out = run(&mut stages, vec![Chunk::root(Vec::new())], false).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].payload(), b"Hello World");
    }

    #[test]
    fn scoped_group_starts_invisible_and_outer_chunk_is_untouched() {
        let registry = Rc::new(default_registry());
        let nodes = vec![SpecNode::Group {
            kind: GroupKind::Scoped,
            body: vec![unit_node("put", &["len", "size"])],
        }];
        let mut stages = build_stages(nodes, &registry).unwrap();
        let out = run(&mut stages, vec![Chunk::root(b"abc".to_vec())], false).unwrap();
        assert_eq!(out.len(), 1);
        assert!(!out[0].visible());
        assert_eq!(out[0].payload(), b"abc");
    }
}

//! CLI front-end (spec.md §2/§6): tokenizes argv, recognizes the
//! bracket/loop sublanguage, and dispatches to the pipeline driver.
//! Mirrors the shape of the teacher's `cli::args::parse_args` (one parse
//! function over an explicit token slice, so it is unit-testable without
//! touching real `std::env::args()`).

use std::collections::HashMap;
use std::rc::Rc;

use crate::handlers::HandlerRegistry;
use crate::multibin::ArgumentError;
use crate::pipeline::{GroupKind, SpecNode};
use crate::unit::UnitSwitches;
use crate::units::UnitArgv;

const SOURCE_UNITS: &[&str] = &["emit", "ef"];

/// Recognized standalone tokens that are never unit arguments (spec.md
/// §6: "recognized as pipeline tokens only when they appear as standalone
/// argv tokens between pipes").
fn is_control_token(tok: &str) -> bool {
    matches!(tok, "|" | "[" | "]" | "[|" | "|]")
}

/// Parse a full pipeline expression from an argv-style token slice into a
/// sequence of top-level stages (spec.md §3: "Pipeline spec ... tree").
pub fn parse_pipeline(tokens: &[String]) -> Result<Vec<SpecNode>, ArgumentError> {
    let mut pos = 0;
    let nodes = parse_stage_sequence(tokens, &mut pos, false)?;
    if pos != tokens.len() {
        return Err(ArgumentError::HandlerFailed { handler: "cli".into(), message: format!("unexpected token {:?}", tokens[pos]) });
    }
    Ok(nodes)
}

fn parse_stage_sequence(tokens: &[String], pos: &mut usize, inside_group: bool) -> Result<Vec<SpecNode>, ArgumentError> {
    let mut stages = Vec::new();
    loop {
        if *pos >= tokens.len() {
            break;
        }
        let tok = tokens[*pos].as_str();
        if inside_group && (tok == "]" || tok == "|]") {
            break;
        }
        let stage = match tok {
            "[" | "[|" => parse_group(tokens, pos)?,
            _ => parse_unit(tokens, pos)?,
        };
        stages.push(stage);

        match tokens.get(*pos).map(String::as_str) {
            Some("|") => {
                *pos += 1;
            }
            Some("[") | Some("[|") => {}
            _ => break,
        }
    }
    Ok(stages)
}

fn parse_group(tokens: &[String], pos: &mut usize) -> Result<SpecNode, ArgumentError> {
    let kind = match tokens[*pos].as_str() {
        "[" => GroupKind::Plain,
        "[|" => GroupKind::Scoped,
        _ => unreachable!(),
    };
    *pos += 1;
    let body = parse_stage_sequence(tokens, pos, true)?;
    match tokens.get(*pos).map(String::as_str) {
        Some("]") | Some("|]") => {
            *pos += 1;
        }
        _ => return Err(ArgumentError::HandlerFailed { handler: "cli".into(), message: "unterminated bracket group".into() }),
    }
    Ok(SpecNode::Group { kind, body })
}

fn parse_unit(tokens: &[String], pos: &mut usize) -> Result<SpecNode, ArgumentError> {
    let name = tokens[*pos].clone();
    *pos += 1;
    let mut switches = UnitSwitches::default();
    let mut positional = Vec::new();
    let mut named = HashMap::new();

    while let Some(tok) = tokens.get(*pos) {
        if is_control_token(tok) {
            break;
        }
        match tok.as_str() {
            "-R" | "--reverse" => switches.reverse = true,
            "-Q" | "--quiet" => switches.quiet = true,
            "-L" | "--lenient" => switches.lenient = true,
            "--help" => {
                return Err(ArgumentError::HandlerFailed { handler: name.clone(), message: "help requested".into() });
            }
            opt if opt.starts_with("--") => {
                let key = opt.trim_start_matches("--").to_string();
                *pos += 1;
                let value = tokens
                    .get(*pos)
                    .ok_or_else(|| ArgumentError::HandlerFailed { handler: name.clone(), message: format!("--{} requires a value", key) })?
                    .clone();
                named.insert(key, value);
            }
            _ => positional.push(tok.clone()),
        }
        *pos += 1;
    }

    Ok(SpecNode::Unit { name, argv: UnitArgv { positional, named }, switches })
}

/// Whether a pipeline expression should run in per-unit framed-stdio mode
/// (SPEC_FULL.md §1): exactly one stage, a plain unit (not a bracket
/// group), whose name is not a source unit.
pub fn wants_framed_stdio_mode(nodes: &[SpecNode]) -> bool {
    match nodes {
        [SpecNode::Unit { name, .. }] => !SOURCE_UNITS.contains(&name.as_str()),
        _ => false,
    }
}

pub fn build_stages(nodes: Vec<SpecNode>, registry: &Rc<HandlerRegistry>) -> Result<Vec<crate::pipeline::Stage>, ArgumentError> {
    crate::pipeline::build_stages(nodes, registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split(' ').map(str::to_string).collect()
    }

    #[test]
    fn parses_flat_pipe_chain() {
        let nodes = parse_pipeline(&toks("emit Hello | b64 | zl")).unwrap();
        assert_eq!(nodes.len(), 3);
    }

    #[test]
    fn parses_scoped_group_after_unit_without_explicit_pipe() {
        let tokens = vec![
            "resplit".to_string(),
            "\\n".to_string(),
            "[|".to_string(),
            "put".to_string(),
            "len".to_string(),
            "size".to_string(),
            "|".to_string(),
            "cfmt".to_string(),
            "{len}:{}".to_string(),
            "]".to_string(),
        ];
        let nodes = parse_pipeline(&tokens).unwrap();
        assert_eq!(nodes.len(), 2);
        match &nodes[1] {
            SpecNode::Group { kind, body } => {
                assert_eq!(*kind, GroupKind::Scoped);
                assert_eq!(body.len(), 2);
            }
            _ => panic!("expected a group"),
        }
    }

    #[test]
    fn single_non_source_unit_wants_framed_stdio() {
        let nodes = parse_pipeline(&toks("hex")).unwrap();
        assert!(wants_framed_stdio_mode(&nodes));
    }

    #[test]
    fn single_source_unit_does_not_want_framed_stdio() {
        let nodes = parse_pipeline(&toks("emit Hello")).unwrap();
        assert!(!wants_framed_stdio_mode(&nodes));
    }

    #[test]
    fn switches_are_recognized_anywhere_in_a_unit_span() {
        let nodes = parse_pipeline(&toks("hex -R")).unwrap();
        match &nodes[0] {
            SpecNode::Unit { switches, .. } => assert!(switches.reverse),
            _ => panic!("expected a unit"),
        }
    }
}

//! Parses multibin source text into a [`CompiledExpr`] (spec.md §4.3 EBNF).
//!
//! Hand-written, char-by-char, in the style of the teacher's
//! `cli::arg_utils`/`cli::args` parsing helpers rather than a parser-
//! combinator crate — this is argument-syntax parsing, the one place the
//! teacher itself never reaches for a library.

use super::ir::{Base, CompiledExpr, HandlerCall};

/// Handlers whose bracket content is a single opaque argument (a
/// sub-pipeline spec string), never comma-split (spec.md §4.3: `eat`, `q`).
const OPAQUE_ARG_HANDLERS: &[&str] = &["eat", "q", "accu"];

/// Handlers that, when written without brackets, pull their arguments from
/// the following colon-delimited tokens instead of a trailing literal
/// (spec.md §9 Open Question: `cut::16` vs `cut:0:16`).
const INLINE_SLICE_HANDLERS: &[&str] = &["cut", "copy"];

pub fn compile(expr: &str) -> Result<CompiledExpr, String> {
    let tokens = split_top_level(expr, ':');
    if tokens.is_empty() {
        return Ok(CompiledExpr { handlers: vec![], base: Base::Literal(Vec::new()) });
    }

    let mut handlers = Vec::new();
    let mut i = 0usize;
    // Reserve the very last token as a candidate literal unless every token
    // gets consumed by a handler atom first (the `cut::16` case).
    while i + 1 < tokens.len() {
        let (name, bracket_args) = split_name_and_brackets(&tokens[i])?;

        if bracket_args.is_none() && INLINE_SLICE_HANDLERS.contains(&name.as_str()) {
            let take = usize::min(2, tokens.len() - i - 1);
            let args = tokens[i + 1..i + 1 + take].iter().map(|s| s.to_string()).collect();
            handlers.push(HandlerCall { name, args });
            i += 1 + take;
            continue;
        }

        let args = match bracket_args {
            Some(raw) if OPAQUE_ARG_HANDLERS.contains(&name.as_str()) => vec![raw],
            Some(raw) => split_top_level(&raw, ',').into_iter().map(|s| s.to_string()).collect(),
            None => Vec::new(),
        };
        handlers.push(HandlerCall { name, args });
        i += 1;
    }

    let base = if i < tokens.len() {
        Base::Literal(tokens[i].as_bytes().to_vec())
    } else {
        Base::InputChunk
    };

    Ok(CompiledExpr { handlers, base })
}

/// Split `"name[content]"` into `(name, Some(content))`, or `(name, None)`
/// when there are no brackets.
fn split_name_and_brackets(token: &str) -> Result<(String, Option<String>), String> {
    match token.find('[') {
        None => Ok((token.to_string(), None)),
        Some(open) => {
            if !token.ends_with(']') {
                return Err(format!("unterminated bracket args in {:?}", token));
            }
            let name = token[..open].to_string();
            let content = token[open + 1..token.len() - 1].to_string();
            Ok((name, Some(content)))
        }
    }
}

/// Split `s` on `sep`, ignoring occurrences of `sep` nested inside `[...]`.
fn split_top_level(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (idx, c) in s.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth -= 1,
            c if c == sep && depth == 0 => {
                parts.push(&s[start..idx]);
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

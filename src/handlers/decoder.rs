//! Decoder handlers (spec.md §4.3): `hex`, `b64`, `b85`, `url`, `esc`.
//!
//! `hex`/`b64` are thin wrappers around crates already depended on
//! elsewhere in the retrieved pack (mirrors `xxhash::xxh32_oneshot` in the
//! teacher — one-line forwarding to a library). `b85`/`url`/`esc` have no
//! settled crate anywhere in the pack, so they are hand-rolled, in the
//! spirit of the teacher hand-porting the LZ4 algorithm itself.

use base64::Engine;

use super::{HandlerCtx, HandlerRegistry};
use crate::multibin::ArgumentError;

pub fn register(r: &mut HandlerRegistry) {
    r.register("hex", hex_decode);
    r.register("b64", b64_decode);
    r.register("b85", b85_decode);
    r.register("url", url_decode);
    r.register("esc", esc_decode);
}

fn fail(handler: &str, message: impl Into<String>) -> ArgumentError {
    ArgumentError::HandlerFailed { handler: handler.to_string(), message: message.into() }
}

fn hex_decode(ctx: HandlerCtx) -> Result<Vec<u8>, ArgumentError> {
    let text = std::str::from_utf8(&ctx.value).map_err(|e| fail("hex", e.to_string()))?;
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(cleaned).map_err(|e| fail("hex", e.to_string()))
}

fn b64_decode(ctx: HandlerCtx) -> Result<Vec<u8>, ArgumentError> {
    base64::engine::general_purpose::STANDARD
        .decode(&ctx.value)
        .map_err(|e| fail("b64", e.to_string()))
}

/// Decode an Ascii85 (btoa-style, RFC 1924 alphabet) string: groups of 5
/// printable characters (offset by `!` = 0x21) expand to 4 bytes, base 85.
/// `z` stands in for a fully-zero 4-byte group.
fn b85_decode(ctx: HandlerCtx) -> Result<Vec<u8>, ArgumentError> {
    let text = std::str::from_utf8(&ctx.value).map_err(|e| fail("b85", e.to_string()))?;
    let mut out = Vec::with_capacity(text.len() * 4 / 5);
    let mut group = [0u8; 5];
    let mut group_len = 0usize;

    for c in text.chars().filter(|c| !c.is_whitespace()) {
        if c == 'z' && group_len == 0 {
            out.extend_from_slice(&[0, 0, 0, 0]);
            continue;
        }
        if !(('!'..='u').contains(&c)) {
            return Err(fail("b85", format!("character {:?} outside the Ascii85 alphabet", c)));
        }
        group[group_len] = (c as u32 - '!' as u32) as u8;
        group_len += 1;
        if group_len == 5 {
            out.extend_from_slice(&decode_group(&group, 5));
            group_len = 0;
        }
    }
    if group_len == 1 {
        return Err(fail("b85", "trailing group of a single character is invalid"));
    }
    if group_len > 1 {
        let padded_len = group_len;
        for slot in group.iter_mut().skip(group_len) {
            *slot = 84;
        }
        let bytes = decode_group(&group, 5);
        out.extend_from_slice(&bytes[..padded_len - 1]);
    }
    Ok(out)
}

fn decode_group(group: &[u8; 5], _len: usize) -> [u8; 4] {
    let mut value: u32 = 0;
    for &digit in group {
        value = value.wrapping_mul(85).wrapping_add(digit as u32);
    }
    value.to_be_bytes()
}

/// Percent-decoding (`%HH` -> byte, `+` left as a literal plus — this is
/// the bytes-level `url` codec, not `application/x-www-form-urlencoded`).
fn url_decode(ctx: HandlerCtx) -> Result<Vec<u8>, ArgumentError> {
    let bytes = &ctx.value;
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex_digits = std::str::from_utf8(&bytes[i + 1..i + 3]).map_err(|e| fail("url", e.to_string()))?;
            let byte = u8::from_str_radix(hex_digits, 16).map_err(|e| fail("url", e.to_string()))?;
            out.push(byte);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}

/// C-style backslash escapes: `\n \r \t \0 \\ \xHH`. Unknown escapes pass
/// the escaped character through unchanged.
fn esc_decode(ctx: HandlerCtx) -> Result<Vec<u8>, ArgumentError> {
    let mut out = Vec::with_capacity(ctx.value.len());
    let mut chars = ctx.value.iter().copied().peekable();
    while let Some(b) = chars.next() {
        if b != b'\\' {
            out.push(b);
            continue;
        }
        match chars.next() {
            Some(b'n') => out.push(b'\n'),
            Some(b'r') => out.push(b'\r'),
            Some(b't') => out.push(b'\t'),
            Some(b'0') => out.push(0),
            Some(b'\\') => out.push(b'\\'),
            Some(b'x') => {
                let hi = chars.next().ok_or_else(|| fail("esc", "truncated \\x escape"))?;
                let lo = chars.next().ok_or_else(|| fail("esc", "truncated \\x escape"))?;
                let byte = u8::from_str_radix(&format!("{}{}", hi as char, lo as char), 16)
                    .map_err(|e| fail("esc", e.to_string()))?;
                out.push(byte);
            }
            Some(other) => out.push(other),
            None => out.push(b'\\'),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::Chunk;
    use crate::handlers::default_registry;

    fn ctx<'a>(value: Vec<u8>, chunk: &'a mut Chunk, registry: &'a HandlerRegistry) -> HandlerCtx<'a> {
        HandlerCtx { value, args: &[], chunk, registry, depth: 0, index_in_frame: 0 }
    }

    #[test]
    fn hex_roundtrips_known_vector() {
        let registry = default_registry();
        let mut chunk = Chunk::root(Vec::new());
        let decoded = hex_decode(ctx(b"48656c6c6f".to_vec(), &mut chunk, &registry)).unwrap();
        assert_eq!(decoded, b"Hello");
    }

    #[test]
    fn b64_decodes_known_vector() {
        let registry = default_registry();
        let mut chunk = Chunk::root(Vec::new());
        let decoded = b64_decode(ctx(b"SGVsbG8=".to_vec(), &mut chunk, &registry)).unwrap();
        assert_eq!(decoded, b"Hello");
    }

    #[test]
    fn b85_decodes_known_vector() {
        // "Man " -> Ascii85 "9jqo^" is the canonical first-five-bytes example.
        let registry = default_registry();
        let mut chunk = Chunk::root(Vec::new());
        let decoded = b85_decode(ctx(b"9jqo^".to_vec(), &mut chunk, &registry)).unwrap();
        assert_eq!(decoded, b"Man ");
    }

    #[test]
    fn esc_handles_newline_and_hex_escape() {
        let registry = default_registry();
        let mut chunk = Chunk::root(Vec::new());
        let decoded = esc_decode(ctx(b"a\\nb\\x41".to_vec(), &mut chunk, &registry)).unwrap();
        assert_eq!(decoded, b"a\nbA");
    }

    #[test]
    fn url_decodes_percent_escapes() {
        let registry = default_registry();
        let mut chunk = Chunk::root(Vec::new());
        let decoded = url_decode(ctx(b"a%20b%2Bc".to_vec(), &mut chunk, &registry)).unwrap();
        assert_eq!(decoded, b"a b+c");
    }

    #[test]
    fn bad_hex_is_fatal() {
        let registry = default_registry();
        let mut chunk = Chunk::root(Vec::new());
        assert!(hex_decode(ctx(b"zz".to_vec(), &mut chunk, &registry)).is_err());
    }
}

//! Digest and key-derivation handlers (spec.md §4.3): `md5`, `sha1`,
//! `sha256`, `pbkdf2`. Thin wrappers around the RustCrypto crates already
//! grounded in the pack (SPEC_FULL.md §4.3).

use hmac::Hmac;
use md5::{Digest, Md5};
use sha1::Sha1;
use sha2::Sha256;

use super::{HandlerCtx, HandlerRegistry};
use crate::multibin::ArgumentError;

pub fn register(r: &mut HandlerRegistry) {
    r.register("md5", md5_digest);
    r.register("sha1", sha1_digest);
    r.register("sha256", sha256_digest);
    r.register("pbkdf2", pbkdf2_derive);
}

fn fail(handler: &str, message: impl Into<String>) -> ArgumentError {
    ArgumentError::HandlerFailed { handler: handler.to_string(), message: message.into() }
}

fn md5_digest(ctx: HandlerCtx) -> Result<Vec<u8>, ArgumentError> {
    let mut hasher = Md5::new();
    hasher.update(&ctx.value);
    Ok(hasher.finalize().to_vec())
}

fn sha1_digest(ctx: HandlerCtx) -> Result<Vec<u8>, ArgumentError> {
    use sha1::Digest as _;
    let mut hasher = Sha1::new();
    hasher.update(&ctx.value);
    Ok(hasher.finalize().to_vec())
}

fn sha256_digest(ctx: HandlerCtx) -> Result<Vec<u8>, ArgumentError> {
    use sha2::Digest as _;
    let mut hasher = Sha256::new();
    hasher.update(&ctx.value);
    Ok(hasher.finalize().to_vec())
}

const DEFAULT_ROUNDS: u32 = 100_000;

/// `pbkdf2[keylen,salt,rounds]:password` — derives `keylen` bytes (default
/// 32) via PBKDF2-HMAC-SHA256 (the resolved Open Question default, SPEC_FULL
/// §4.3), `salt` defaults to an empty string, `rounds` defaults to 100_000.
fn pbkdf2_derive(ctx: HandlerCtx) -> Result<Vec<u8>, ArgumentError> {
    let keylen: usize = match ctx.args.first().map(String::as_str) {
        Some("") | None => 32,
        Some(s) => s.parse().map_err(|_| fail("pbkdf2", format!("{:?} is not a key length", s)))?,
    };
    let salt = ctx.args.get(1).map(String::as_str).unwrap_or("");
    let rounds: u32 = match ctx.args.get(2).map(String::as_str) {
        Some("") | None => DEFAULT_ROUNDS,
        Some(s) => s.parse().map_err(|_| fail("pbkdf2", format!("{:?} is not a round count", s)))?,
    };

    let mut out = vec![0u8; keylen];
    pbkdf2::pbkdf2::<Hmac<Sha256>>(&ctx.value, salt.as_bytes(), rounds, &mut out)
        .map_err(|e| fail("pbkdf2", e.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::Chunk;
    use crate::handlers::default_registry;

    fn ctx<'a>(value: Vec<u8>, args: &'a [String], chunk: &'a mut Chunk, registry: &'a HandlerRegistry) -> HandlerCtx<'a> {
        HandlerCtx { value, args, chunk, registry, depth: 0, index_in_frame: 0 }
    }

    #[test]
    fn md5_matches_known_vector() {
        let registry = default_registry();
        let mut chunk = Chunk::root(Vec::new());
        let digest = md5_digest(ctx(b"abc".to_vec(), &[], &mut chunk, &registry)).unwrap();
        assert_eq!(hex::encode(digest), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn sha1_matches_known_vector() {
        let registry = default_registry();
        let mut chunk = Chunk::root(Vec::new());
        let digest = sha1_digest(ctx(b"abc".to_vec(), &[], &mut chunk, &registry)).unwrap();
        assert_eq!(hex::encode(digest), "a9993e364706816aba3e25717850c26c9cd0d89");
    }

    #[test]
    fn sha256_matches_known_vector() {
        let registry = default_registry();
        let mut chunk = Chunk::root(Vec::new());
        let digest = sha256_digest(ctx(b"abc".to_vec(), &[], &mut chunk, &registry)).unwrap();
        assert_eq!(hex::encode(digest), "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
    }

    #[test]
    fn pbkdf2_derives_requested_length() {
        let registry = default_registry();
        let mut chunk = Chunk::root(Vec::new());
        let args = vec!["16".to_string(), "salty".to_string()];
        let out = pbkdf2_derive(ctx(b"password".to_vec(), &args, &mut chunk, &registry)).unwrap();
        assert_eq!(out.len(), 16);
    }

    #[test]
    fn pbkdf2_defaults_keylen_to_32() {
        let registry = default_registry();
        let mut chunk = Chunk::root(Vec::new());
        let out = pbkdf2_derive(ctx(b"password".to_vec(), &[], &mut chunk, &registry)).unwrap();
        assert_eq!(out.len(), 32);
    }
}

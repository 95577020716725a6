//! `aes`: CBC encrypt/decrypt (spec.md §8 "Multibin cut+kdf" and
//! "Round-trip crypto" scenarios), reversible. Key size selects
//! AES-128/192/256 (RustCrypto `aes`+`cbc` crates, SPEC_FULL.md §4.3).
//!
//! Consistent with every other reversible unit in this crate, the forward
//! direction *undoes* the transform (decrypt) and `-R` *applies* it
//! (encrypt); `--iv` is a multibin expression evaluated against the
//! current chunk, so `--iv cut::16` both extracts and strips the leading
//! 16 bytes as the IV, and the encrypt direction prepends the IV it used
//! to its output so a paired `--iv cut:0:16` strips it back off.

use std::rc::Rc;

use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use crate::chunk::Chunk;
use crate::handlers::HandlerRegistry;
use crate::multibin::{self, ArgumentError, CompiledExpr};
use crate::unit::{Unit, UnitError, UnitSwitches};

use super::UnitArgv;

pub struct Aes {
    key_expr: CompiledExpr,
    iv_expr: CompiledExpr,
    registry: Rc<HandlerRegistry>,
}

impl Aes {
    pub fn build(argv: &UnitArgv, _switches: UnitSwitches, registry: Rc<HandlerRegistry>) -> Result<Self, ArgumentError> {
        if let Some(mode) = argv.named.get("mode") {
            if mode != "cbc" {
                return Err(ArgumentError::HandlerFailed { handler: "aes".into(), message: format!("unsupported mode {:?}", mode) });
            }
        }
        let key_raw = argv
            .positional
            .first()
            .ok_or_else(|| ArgumentError::HandlerFailed { handler: "aes".into(), message: "missing key argument".into() })?;
        let iv_raw = argv
            .named
            .get("iv")
            .ok_or_else(|| ArgumentError::HandlerFailed { handler: "aes".into(), message: "missing --iv argument".into() })?;
        let key_expr = multibin::compile(key_raw).map_err(|message| ArgumentError::HandlerFailed { handler: "aes".into(), message })?;
        let iv_expr = multibin::compile(iv_raw).map_err(|message| ArgumentError::HandlerFailed { handler: "aes".into(), message })?;
        Ok(Aes { key_expr, iv_expr, registry })
    }
}

fn decrypt(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, String> {
    match key.len() {
        16 => cbc::Decryptor::<Aes128>::new_from_slices(key, iv)
            .map_err(|e| e.to_string())?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|e| e.to_string()),
        24 => cbc::Decryptor::<Aes192>::new_from_slices(key, iv)
            .map_err(|e| e.to_string())?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|e| e.to_string()),
        32 => cbc::Decryptor::<Aes256>::new_from_slices(key, iv)
            .map_err(|e| e.to_string())?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|e| e.to_string()),
        n => Err(format!("key length {} is not a valid AES key size", n)),
    }
}

fn encrypt(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, String> {
    match key.len() {
        16 => Ok(cbc::Encryptor::<Aes128>::new_from_slices(key, iv)
            .map_err(|e| e.to_string())?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
        24 => Ok(cbc::Encryptor::<Aes192>::new_from_slices(key, iv)
            .map_err(|e| e.to_string())?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
        32 => Ok(cbc::Encryptor::<Aes256>::new_from_slices(key, iv)
            .map_err(|e| e.to_string())?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
        n => Err(format!("key length {} is not a valid AES key size", n)),
    }
}

impl Unit for Aes {
    fn name(&self) -> &'static str {
        "aes"
    }

    fn is_reversible(&self) -> bool {
        true
    }

    fn process(&mut self, mut chunk: Chunk) -> Result<Vec<Chunk>, UnitError> {
        let key = multibin::eval(&self.key_expr, &mut chunk, &self.registry, 0).map_err(|e| UnitError::new("aes", e.to_string()))?;
        let iv = multibin::eval(&self.iv_expr, &mut chunk, &self.registry, 0).map_err(|e| UnitError::new("aes", e.to_string()))?;
        let ciphertext = chunk.payload().to_vec();
        let plaintext = decrypt(&key, &iv, &ciphertext).map_err(|m| UnitError::new("aes", m))?;
        chunk.set_payload(plaintext);
        Ok(vec![chunk])
    }

    fn reverse(&mut self, mut chunk: Chunk) -> Result<Vec<Chunk>, UnitError> {
        let key = multibin::eval(&self.key_expr, &mut chunk, &self.registry, 0).map_err(|e| UnitError::new("aes", e.to_string()))?;
        let iv = multibin::eval(&self.iv_expr, &mut chunk, &self.registry, 0).map_err(|e| UnitError::new("aes", e.to_string()))?;
        let plaintext = chunk.payload().to_vec();
        let mut out = iv.clone();
        out.extend(encrypt(&key, &iv, &plaintext).map_err(|m| UnitError::new("aes", m))?);
        chunk.set_payload(out);
        Ok(vec![chunk])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::default_registry;
    use std::collections::HashMap;

    fn build(iv: &str) -> Aes {
        let registry = Rc::new(default_registry());
        let mut named = HashMap::new();
        named.insert("iv".to_string(), iv.to_string());
        named.insert("mode".to_string(), "cbc".to_string());
        let argv = UnitArgv { positional: vec!["pbkdf2[32,s4lty]:swordfish".to_string()], named };
        Aes::build(&argv, UnitSwitches::default(), registry).unwrap()
    }

    #[test]
    fn encrypt_then_decrypt_round_trips() {
        let mut enc = build("md5:var:x");
        let mut chunk = Chunk::root(b"hi".to_vec());
        chunk.meta_mut().set("x", crate::meta::MetaValue::Str("seed".into()), 0);
        let encrypted = enc.reverse(chunk).unwrap().remove(0);

        let mut dec = build("cut:0:16");
        let decrypted = dec.process(encrypted).unwrap().remove(0);
        assert_eq!(decrypted.payload(), b"hi");
    }
}

//! Filesystem-reading handlers (spec.md §4.3/§6): `file`, `range`.
//!
//! Paths are resolved relative to `REFINERY_HOME` when set (spec.md §6: the
//! one runtime environment variable besides the ignored `REFINERY_PREFIX`),
//! falling back to the path as given.

use std::fs;
use std::path::{Path, PathBuf};

use super::{HandlerCtx, HandlerRegistry};
use crate::multibin::ArgumentError;

pub fn register(r: &mut HandlerRegistry) {
    r.register("file", file_read);
    r.register("range", range_read);
}

fn fail(handler: &str, message: impl Into<String>) -> ArgumentError {
    ArgumentError::HandlerFailed { handler: handler.to_string(), message: message.into() }
}

fn resolve_path(raw: &str) -> PathBuf {
    let path = Path::new(raw);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::var_os("REFINERY_HOME") {
        Some(home) => Path::new(&home).join(path),
        None => path.to_path_buf(),
    }
}

fn path_arg(handler: &str, ctx: &HandlerCtx) -> Result<PathBuf, ArgumentError> {
    let raw = std::str::from_utf8(&ctx.value).map_err(|e| fail(handler, e.to_string()))?;
    Ok(resolve_path(raw))
}

/// `file:path` reads the whole file named by `path` (or the current value
/// when no bracket args are given).
fn file_read(ctx: HandlerCtx) -> Result<Vec<u8>, ArgumentError> {
    let path = path_arg("file", &ctx)?;
    fs::read(&path).map_err(|e| fail("file", format!("{}: {}", path.display(), e)))
}

/// `range[offset,length]:path` reads `length` bytes starting at `offset`
/// from the file named by `path`.
fn range_read(ctx: HandlerCtx) -> Result<Vec<u8>, ArgumentError> {
    use std::io::{Read, Seek, SeekFrom};

    let path = path_arg("range", &ctx)?;
    let offset: u64 = ctx
        .args
        .first()
        .map(String::as_str)
        .unwrap_or("0")
        .parse()
        .map_err(|_| fail("range", "offset argument is not an integer"))?;
    let length: usize = ctx
        .args
        .get(1)
        .map(String::as_str)
        .ok_or_else(|| fail("range", "missing length argument"))?
        .parse()
        .map_err(|_| fail("range", "length argument is not an integer"))?;

    let mut f = fs::File::open(&path).map_err(|e| fail("range", format!("{}: {}", path.display(), e)))?;
    f.seek(SeekFrom::Start(offset)).map_err(|e| fail("range", e.to_string()))?;
    let mut buf = vec![0u8; length];
    f.read_exact(&mut buf).map_err(|e| fail("range", e.to_string()))?;
    Ok(buf)
}

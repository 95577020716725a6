//! Reader handler (spec.md §4.3): `var:NAME` returns `meta[NAME]` as bytes.

use super::{HandlerCtx, HandlerRegistry};
use crate::multibin::ArgumentError;

pub fn register(r: &mut HandlerRegistry) {
    r.register("var", var_read);
}

fn var_read(ctx: HandlerCtx) -> Result<Vec<u8>, ArgumentError> {
    let name = std::str::from_utf8(&ctx.value)
        .map_err(|e| ArgumentError::HandlerFailed { handler: "var".into(), message: e.to_string() })?;
    match ctx.chunk.get_meta(name, ctx.index_in_frame) {
        Some(value) => Ok(value.to_bytes()),
        None => Err(ArgumentError::HandlerFailed {
            handler: "var".into(),
            message: format!("no meta variable named {:?} in scope", name),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::Chunk;
    use crate::handlers::default_registry;
    use crate::meta::MetaValue;

    #[test]
    fn reads_bound_variable() {
        let registry = default_registry();
        let mut chunk = Chunk::root(Vec::new());
        chunk.meta_mut().set("greeting", MetaValue::Str("hi".into()), 0);
        let ctx = HandlerCtx { value: b"greeting".to_vec(), args: &[], chunk: &mut chunk, registry: &registry, depth: 0, index_in_frame: 0 };
        assert_eq!(var_read(ctx).unwrap(), b"hi");
    }

    #[test]
    fn reads_reserved_size_name() {
        let registry = default_registry();
        let mut chunk = Chunk::root(b"abcd".to_vec());
        let ctx = HandlerCtx { value: b"size".to_vec(), args: &[], chunk: &mut chunk, registry: &registry, depth: 0, index_in_frame: 0 };
        assert_eq!(var_read(ctx).unwrap(), b"4");
    }

    #[test]
    fn unbound_variable_is_fatal() {
        let registry = default_registry();
        let mut chunk = Chunk::root(Vec::new());
        let ctx = HandlerCtx { value: b"nope".to_vec(), args: &[], chunk: &mut chunk, registry: &registry, depth: 0, index_in_frame: 0 };
        assert!(var_read(ctx).is_err());
    }
}

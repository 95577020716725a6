//! Per-chunk meta-variable store.
//!
//! Mirrors the shape of `frame::types` in the teacher crate (a small closed
//! set of tagged values with manual `Display`/`Error` plumbing) but models
//! spec.md §3/§4.1: a copy-on-write mapping from identifier-class names to
//! typed values, shared between sibling chunks until one of them writes.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Reserved names computed on read rather than stored (spec.md §4.1).
pub const RESERVED_NAMES: &[&str] = &["index", "path", "size", "magic"];

pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// A meta-variable identifier: letters, digits, underscore; must start with
/// a letter or underscore (spec.md §3).
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A tagged meta value (spec.md §3: bytes, integer, string, list).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaValue {
    Bytes(Vec<u8>),
    Int(i64),
    Str(String),
    List(Vec<MetaValue>),
}

impl MetaValue {
    /// Coerce a meta value to its byte representation, the form every
    /// multibin handler category consumes (spec.md §4.3).
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            MetaValue::Bytes(b) => b.clone(),
            MetaValue::Int(i) => i.to_string().into_bytes(),
            MetaValue::Str(s) => s.clone().into_bytes(),
            MetaValue::List(items) => items.iter().flat_map(|v| v.to_bytes()).collect(),
        }
    }

    pub fn kind_tag(&self) -> u8 {
        match self {
            MetaValue::Bytes(_) => 0x01,
            MetaValue::Int(_) => 0x02,
            MetaValue::Str(_) => 0x03,
            MetaValue::List(_) => 0x04,
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Bytes(b) => write!(f, "{}", String::from_utf8_lossy(b)),
            MetaValue::Int(i) => write!(f, "{}", i),
            MetaValue::Str(s) => write!(f, "{}", s),
            MetaValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// One entry's binding scope: the frame depth at which it was set
/// (spec.md §3: "Meta variable ... scope equal to the frame depth at which
/// it was set").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Scope(pub usize);

/// Copy-on-write map from meta name to (value, binding scope).
///
/// Splitting one input chunk into N outputs shares this map until a child
/// mutates it (spec.md §4.1). Implemented as `Rc<BTreeMap>` with
/// `Rc::make_mut` cloning the whole map on first write rather than a
/// persistent tree with structural sharing of sub-spines — see DESIGN.md.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaMap(Rc<BTreeMap<String, (MetaValue, Scope)>>);

impl MetaMap {
    pub fn new() -> Self {
        MetaMap(Rc::new(BTreeMap::new()))
    }

    pub fn get(&self, name: &str) -> Option<&MetaValue> {
        self.0.get(name).map(|(v, _)| v)
    }

    pub fn scope_of(&self, name: &str) -> Option<Scope> {
        self.0.get(name).map(|(_, s)| s)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &MetaValue)> {
        self.0.iter().map(|(k, (v, _))| (k, v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Bind `name` to `value` at the given frame depth, overwriting any
    /// existing binding. Copies the whole map if this handle is shared.
    pub fn set(&mut self, name: impl Into<String>, value: MetaValue, depth: usize) {
        let map = Rc::make_mut(&mut self.0);
        map.insert(name.into(), (value, Scope(depth)));
    }

    pub fn unset(&mut self, name: &str) {
        if self.0.contains_key(name) {
            Rc::make_mut(&mut self.0).remove(name);
        }
    }

    /// Discard every binding made at a depth >= `depth` (spec.md §3/§8.4:
    /// frame exit prunes variables bound inside the closing frame).
    pub fn close_scope(&mut self, depth: usize) {
        if self.0.values().any(|(_, s)| s.0 >= depth) {
            let map = Rc::make_mut(&mut self.0);
            map.retain(|_, (_, s)| s.0 < depth);
        }
    }

    /// Merge `parent` into `self`, with `self`'s own entries winning on
    /// name conflicts (spec.md §4.1: "merge meta from a parent: child meta
    /// wins on conflict").
    pub fn merge_from_parent(&mut self, parent: &MetaMap) {
        if parent.0.is_empty() {
            return;
        }
        let map = Rc::make_mut(&mut self.0);
        for (k, v) in parent.0.iter() {
            map.entry(k.clone()).or_insert_with(|| v.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_names() {
        assert!(is_valid_name("foo"));
        assert!(is_valid_name("_foo_1"));
        assert!(!is_valid_name("1foo"));
        assert!(!is_valid_name("fo o"));
        assert!(!is_valid_name(""));
    }

    #[test]
    fn cow_does_not_mutate_shared_clone() {
        let mut a = MetaMap::new();
        a.set("x", MetaValue::Int(1), 0);
        let b = a.clone();
        a.set("x", MetaValue::Int(2), 0);
        assert_eq!(b.get("x"), Some(&MetaValue::Int(1)));
        assert_eq!(a.get("x"), Some(&MetaValue::Int(2)));
    }

    #[test]
    fn scope_pruned_on_frame_close() {
        let mut m = MetaMap::new();
        m.set("outer", MetaValue::Int(1), 0);
        m.set("inner", MetaValue::Int(2), 1);
        m.close_scope(1);
        assert!(m.contains("outer"));
        assert!(!m.contains("inner"));
    }

    #[test]
    fn child_meta_wins_on_merge() {
        let mut parent = MetaMap::new();
        parent.set("a", MetaValue::Int(1), 0);
        parent.set("b", MetaValue::Int(2), 0);
        let mut child = MetaMap::new();
        child.set("a", MetaValue::Int(99), 0);
        child.merge_from_parent(&parent);
        assert_eq!(child.get("a"), Some(&MetaValue::Int(99)));
        assert_eq!(child.get("b"), Some(&MetaValue::Int(2)));
    }
}

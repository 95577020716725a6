//! Decoding side of the frame codec (spec.md §4.2).
//!
//! `FrameReader` is lazy — it is pulled one record at a time by the
//! pipeline driver (spec.md §5: "the stream is pulled lazily") — except in
//! the no-magic-marker fallback, where the entire input becomes the single
//! raw chunk the spec mandates and there is nothing to stream.

use std::io::Read;

use super::error::FrameError;
use super::wire::*;
use super::Record;
use crate::chunk::Chunk;
use crate::meta::{MetaMap, MetaValue};

/// Decode a whole framed (or raw) stream into its chunk records, rebuilding
/// each chunk's `path`/`scope_depth` from the OPEN/CLOSE/CHUNK structure
/// (the wire format itself carries no path field — see SPEC_FULL.md §4.2).
pub fn decode_all<R: Read>(r: R) -> Result<Vec<Record>, FrameError> {
    FrameReader::new(r)?.collect()
}

enum Mode {
    /// No magic marker observed: the rest of `inner` is one raw chunk.
    Raw { delivered: bool, lookahead: Vec<u8> },
    Framed,
}

pub struct FrameReader<R: Read> {
    inner: R,
    mode: Mode,
    /// Per-depth count of chunks already emitted, used to rebuild `path`
    /// (spec.md §3: "path monotonic within a frame level").
    counters: Vec<u64>,
    depth: usize,
    finished: bool,
}

impl<R: Read> FrameReader<R> {
    pub fn new(mut inner: R) -> Result<Self, FrameError> {
        let mut prefix = [0u8; 3];
        let n = read_prefix(&mut inner, &mut prefix)?;
        let mode = if n == 3 && prefix == MAGIC {
            let mut version = [0u8; 1];
            read_exact(&mut inner, &mut version)?;
            if version[0] != VERSION {
                return Err(FrameError::UnsupportedVersion(version[0]));
            }
            Mode::Framed
        } else {
            Mode::Raw { delivered: false, lookahead: prefix[..n].to_vec() }
        };
        Ok(FrameReader { inner, mode, counters: vec![0], depth: 0, finished: false })
    }

    fn next_path_index(&mut self) -> u64 {
        let idx = self.counters[self.depth];
        self.counters[self.depth] += 1;
        idx
    }

    fn next_chunk_record(&mut self, tag: u8) -> Result<Record, FrameError> {
        let visible = tag & TAG_VIS_BIT != 0;
        let payload = read_length_prefixed(&mut self.inner)?;
        let meta_block = read_length_prefixed(&mut self.inner)?;
        let meta = decode_meta_block(&meta_block, self.depth)?;

        let index = self.next_path_index();
        let mut path: Vec<u64> = (0..self.depth).map(|_| 0).collect();
        // Only the trailing index is meaningful for a flat reconstruction;
        // intermediate indices are not recoverable from the wire alone, so
        // depth-0..depth-1 segments are left at 0 and the caller compares
        // chunk sequences depth-by-depth rather than by absolute path.
        path.push(index);
        Ok(Record::Chunk(Chunk::new(payload, meta, visible, path, self.depth)))
    }
}

impl<R: Read> Iterator for FrameReader<R> {
    type Item = Result<Record, FrameError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match &mut self.mode {
            Mode::Raw { delivered, lookahead } => {
                if *delivered {
                    self.finished = true;
                    return None;
                }
                *delivered = true;
                let mut rest = std::mem::take(lookahead);
                if let Err(e) = self.inner.read_to_end(&mut rest) {
                    return Some(Err(FrameError::from(e)));
                }
                self.finished = true;
                Some(Ok(Record::Chunk(Chunk::root(rest))))
            }
            Mode::Framed => {
                let tag = match read_byte_opt(&mut self.inner) {
                    Ok(Some(t)) => t,
                    Ok(None) => {
                        self.finished = true;
                        return None;
                    }
                    Err(e) => return Some(Err(e)),
                };
                match tag & !TAG_VIS_BIT {
                    TAG_OPEN => {
                        self.depth += 1;
                        self.counters.push(0);
                        Some(Ok(Record::Open))
                    }
                    TAG_CLOSE => {
                        if self.depth == 0 {
                            return Some(Err(FrameError::UnmatchedClose));
                        }
                        self.depth -= 1;
                        self.counters.pop();
                        Some(Ok(Record::Close))
                    }
                    t if t == TAG_CHUNK => Some(self.next_chunk_record(tag)),
                    _ => Some(Err(FrameError::UnknownRecordTag(tag))),
                }
            }
        }
    }
}

fn read_prefix<R: Read>(r: &mut R, buf: &mut [u8; 3]) -> Result<usize, FrameError> {
    let mut total = 0;
    while total < buf.len() {
        match r.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) => return Err(FrameError::from(e)),
        }
    }
    Ok(total)
}

fn read_exact<R: Read>(r: &mut R, buf: &mut [u8]) -> Result<(), FrameError> {
    r.read_exact(buf).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            FrameError::Truncated
        } else {
            FrameError::from(e)
        }
    })
}

fn decode_meta_block(block: &[u8], depth: usize) -> Result<MetaMap, FrameError> {
    let mut cur = block;
    let count = read_uvarint(&mut cur)?;
    let mut meta = MetaMap::new();
    for _ in 0..count {
        let name_bytes = read_length_prefixed(&mut cur)?;
        let name = String::from_utf8(name_bytes)
            .map_err(|e| FrameError::InvalidMetaName(String::from_utf8_lossy(e.as_bytes()).into_owned()))?;
        if !crate::meta::is_valid_name(&name) {
            return Err(FrameError::InvalidMetaName(name));
        }
        let mut kind = [0u8; 1];
        read_exact(&mut cur, &mut kind)?;
        let value = decode_meta_value(&mut cur, kind[0])?;
        meta.set(name, value, depth);
    }
    Ok(meta)
}

fn decode_meta_value(cur: &mut &[u8], kind: u8) -> Result<MetaValue, FrameError> {
    match kind {
        KIND_BYTES => Ok(MetaValue::Bytes(read_length_prefixed(cur)?)),
        KIND_INT => Ok(MetaValue::Int(read_zigzag(cur)?)),
        KIND_STR => {
            let bytes = read_length_prefixed(cur)?;
            String::from_utf8(bytes)
                .map(MetaValue::Str)
                .map_err(|_| FrameError::Io("non-utf8 string meta value".into()))
        }
        KIND_LIST => {
            let count = read_uvarint(cur)?;
            let mut items = Vec::with_capacity(count as usize);
            for _ in 0..count {
                let mut item_kind = [0u8; 1];
                read_exact(cur, &mut item_kind)?;
                items.push(decode_meta_value(cur, item_kind[0])?);
            }
            Ok(MetaValue::List(items))
        }
        other => Err(FrameError::UnknownMetaKind(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::encode::encode_stream;

    #[test]
    fn raw_stream_without_magic_is_one_chunk() {
        let records = decode_all(&b"hello, not framed"[..]).unwrap();
        assert_eq!(records.len(), 1);
        match &records[0] {
            Record::Chunk(c) => {
                assert_eq!(c.payload(), b"hello, not framed");
                assert!(c.meta().is_empty());
                assert_eq!(c.scope_depth(), 0);
            }
            _ => panic!("expected a chunk"),
        }
    }

    #[test]
    fn short_input_shorter_than_magic_is_still_raw() {
        let records = decode_all(&b"hi"[..]).unwrap();
        assert_eq!(records.len(), 1);
        match &records[0] {
            Record::Chunk(c) => assert_eq!(c.payload(), b"hi"),
            _ => panic!("expected a chunk"),
        }
    }

    #[test]
    fn unmatched_close_is_rejected() {
        let mut buf = Vec::new();
        encode_stream(&mut buf, vec![Record::Close]).unwrap();
        let err = decode_all(&buf[..]).unwrap_err();
        assert_eq!(err, FrameError::UnmatchedClose);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&MAGIC);
        buf.push(VERSION);
        buf.push(0x55);
        let err = decode_all(&buf[..]).unwrap_err();
        assert_eq!(err, FrameError::UnknownRecordTag(0x55));
    }

    #[test]
    fn open_close_nest_to_arbitrary_depth() {
        let records = vec![Record::Open, Record::Open, Record::Open, Record::Close, Record::Close, Record::Close];
        let mut buf = Vec::new();
        encode_stream(&mut buf, records.clone()).unwrap();
        let decoded = decode_all(&buf[..]).unwrap();
        assert_eq!(decoded, records);
    }
}

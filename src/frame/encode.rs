//! Encoding side of the frame codec (spec.md §4.2).

use std::io::Write;

use super::error::FrameError;
use super::wire::*;
use super::Record;
use crate::chunk::Chunk;
use crate::meta::MetaValue;

/// Encode a finite sequence of records onto `w`, starting with the magic
/// marker and version byte (spec.md §6). `encode` is prefix-deterministic:
/// encoding a prefix of `records` yields a byte-for-byte prefix of encoding
/// the whole sequence (spec.md §8, law 1).
pub fn encode_stream<W: Write>(w: &mut W, records: impl IntoIterator<Item = Record>) -> Result<(), FrameError> {
    w.write_all(&MAGIC)?;
    w.write_all(&[VERSION])?;
    for record in records {
        encode_record(w, &record)?;
    }
    Ok(())
}

pub fn encode_record<W: Write>(w: &mut W, record: &Record) -> Result<(), FrameError> {
    match record {
        Record::Open => w.write_all(&[TAG_OPEN]).map_err(FrameError::from),
        Record::Close => w.write_all(&[TAG_CLOSE]).map_err(FrameError::from),
        Record::Chunk(chunk) => encode_chunk(w, chunk),
    }
}

fn encode_chunk<W: Write>(w: &mut W, chunk: &Chunk) -> Result<(), FrameError> {
    let tag = TAG_CHUNK | if chunk.visible() { TAG_VIS_BIT } else { 0 };
    w.write_all(&[tag])?;
    write_length_prefixed(w, chunk.payload())?;

    let mut meta_buf = Vec::new();
    write_uvarint(&mut meta_buf, chunk.meta().len() as u64)?;
    for (name, value) in chunk.meta().iter() {
        write_length_prefixed(&mut meta_buf, name.as_bytes())?;
        meta_buf.push(value.kind_tag());
        encode_meta_value(&mut meta_buf, value)?;
    }
    write_length_prefixed(w, &meta_buf)?;
    Ok(())
}

fn encode_meta_value<W: Write>(w: &mut W, value: &MetaValue) -> Result<(), FrameError> {
    match value {
        MetaValue::Bytes(b) => write_length_prefixed(w, b)?,
        MetaValue::Int(i) => write_zigzag(w, *i)?,
        MetaValue::Str(s) => write_length_prefixed(w, s.as_bytes())?,
        MetaValue::List(items) => {
            write_uvarint(w, items.len() as u64)?;
            for item in items {
                w.write_all(&[item.kind_tag()])?;
                encode_meta_value(w, item)?;
            }
        }
    }
    Ok(())
}

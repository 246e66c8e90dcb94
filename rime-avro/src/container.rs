//! Framing of Avro object container files: the header and the sync-delimited data blocks.
//!
//! Values inside the frame are encoded with `apache_avro`'s datum functions. The header schema is
//! written exactly as rime renders it, so annotations such as `adjust-to-utc` and `field-id`
//! survive into the file.

use std::collections::HashMap;
use std::io::{Read, Write};

use apache_avro::types::Value as AvroValue;
use apache_avro::{Codec, Schema, from_avro_datum, to_avro_datum};
use rime_error::{RimeResult, rime_bail, rime_err};

const MAGIC: [u8; 4] = *b"Obj\x01";
pub(crate) const SCHEMA_KEY: &str = "avro.schema";
pub(crate) const CODEC_KEY: &str = "avro.codec";
pub(crate) const SYNC_SIZE: usize = 16;

pub(crate) type SyncMarker = [u8; SYNC_SIZE];

/// Keys in the `avro.` namespace belong to the container format.
pub(crate) fn is_reserved(key: &str) -> bool {
    key.starts_with("avro.")
}

pub(crate) struct Header {
    pub(crate) metadata: HashMap<String, Vec<u8>>,
    pub(crate) sync: SyncMarker,
}

pub(crate) fn write_header<W: Write>(
    sink: &mut W,
    metadata: HashMap<String, Vec<u8>>,
    sync: &SyncMarker,
) -> RimeResult<()> {
    let entries = metadata
        .into_iter()
        .map(|(key, value)| (key, AvroValue::Bytes(value)))
        .collect();
    let encoded = to_avro_datum(&Schema::map(Schema::Bytes), AvroValue::Map(entries))?;
    sink.write_all(&MAGIC)?;
    sink.write_all(&encoded)?;
    sink.write_all(sync)?;
    Ok(())
}

pub(crate) fn read_header<R: Read>(source: &mut R) -> RimeResult<Header> {
    let mut magic = [0u8; 4];
    source.read_exact(&mut magic)?;
    if magic != MAGIC {
        rime_bail!("Not an Avro object container file");
    }

    let AvroValue::Map(entries) = from_avro_datum(&Schema::map(Schema::Bytes), source, None)?
    else {
        rime_bail!("Container metadata is not a map");
    };
    let metadata = entries
        .into_iter()
        .map(|(key, value)| match value {
            AvroValue::Bytes(bytes) => Ok((key, bytes)),
            _ => Err(rime_err!("Metadata entry {key} does not hold bytes")),
        })
        .collect::<RimeResult<HashMap<_, _>>>()?;

    let mut sync = [0u8; SYNC_SIZE];
    source.read_exact(&mut sync)?;
    Ok(Header { metadata, sync })
}

fn encode_len(len: usize) -> RimeResult<Vec<u8>> {
    let len = i64::try_from(len).map_err(|_| rime_err!("Length {len} does not fit an Avro long"))?;
    Ok(to_avro_datum(&Schema::Long, AvroValue::Long(len))?)
}

fn read_len<R: Read>(source: &mut R) -> RimeResult<usize> {
    match from_avro_datum(&Schema::Long, source, None)? {
        AvroValue::Long(len) => {
            usize::try_from(len).map_err(|_| rime_err!("Invalid block length {len}"))
        }
        _ => rime_bail!("Expected an Avro long"),
    }
}

/// Compress `data`, holding `records` encoded records, and append it as one block.
pub(crate) fn write_block<W: Write>(
    sink: &mut W,
    codec: Codec,
    records: usize,
    mut data: Vec<u8>,
    sync: &SyncMarker,
) -> RimeResult<()> {
    codec.compress(&mut data)?;
    sink.write_all(&encode_len(records)?)?;
    sink.write_all(&encode_len(data.len())?)?;
    sink.write_all(&data)?;
    sink.write_all(sync)?;
    Ok(())
}

/// Read the next block as its record count and decompressed bytes; `None` at the end of the file.
pub(crate) fn read_block<R: Read>(
    source: &mut R,
    codec: Codec,
    sync: &SyncMarker,
) -> RimeResult<Option<(usize, Vec<u8>)>> {
    let mut first = [0u8; 1];
    if source.read(&mut first)? == 0 {
        return Ok(None);
    }
    let mut source = first.as_slice().chain(source);

    let records = read_len(&mut source)?;
    let size = read_len(&mut source)?;
    let mut data = vec![0u8; size];
    source.read_exact(&mut data)?;

    let mut marker = [0u8; SYNC_SIZE];
    source.read_exact(&mut marker)?;
    if &marker != sync {
        rime_bail!("Sync marker mismatch after a block of {records} records");
    }

    codec.decompress(&mut data)?;
    Ok(Some((records, data)))
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use apache_avro::Codec;

    use crate::container::{read_block, read_header, write_block, write_header};

    const SYNC: [u8; 16] = [7; 16];

    fn file(blocks: &[&[u8]]) -> Vec<u8> {
        let mut out = Vec::new();
        let metadata = HashMap::from([("k".to_string(), b"v".to_vec())]);
        write_header(&mut out, metadata, &SYNC).unwrap();
        for block in blocks {
            write_block(&mut out, Codec::Deflate, 1, block.to_vec(), &SYNC).unwrap();
        }
        out
    }

    #[test]
    fn header_then_blocks() {
        let bytes = file(&[b"first", b"second"]);
        assert_eq!(&bytes[..4], b"Obj\x01");

        let mut source = bytes.as_slice();
        let header = read_header(&mut source).unwrap();
        assert_eq!(header.sync, SYNC);
        assert_eq!(header.metadata.get("k").map(Vec::as_slice), Some(b"v".as_slice()));

        let first = read_block(&mut source, Codec::Deflate, &SYNC).unwrap();
        assert_eq!(first, Some((1, b"first".to_vec())));
        let second = read_block(&mut source, Codec::Deflate, &SYNC).unwrap();
        assert_eq!(second, Some((1, b"second".to_vec())));
        assert_eq!(read_block(&mut source, Codec::Deflate, &SYNC).unwrap(), None);
    }

    #[test]
    fn rejects_foreign_magic() {
        let mut bytes = file(&[]);
        bytes[0] = b'X';
        assert!(read_header(&mut bytes.as_slice()).is_err());
    }

    #[test]
    fn rejects_wrong_sync_marker() {
        let bytes = file(&[b"data"]);
        let mut source = bytes.as_slice();
        read_header(&mut source).unwrap();
        assert!(read_block(&mut source, Codec::Deflate, &[0; 16]).is_err());
    }
}

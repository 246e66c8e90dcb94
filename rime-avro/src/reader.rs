use std::collections::HashMap;
use std::io::{Cursor, Read};

use apache_avro::{Codec, from_avro_datum};
use rime_error::{RimeResult, rime_bail, rime_err};
use rime_literal::Row;
use serde_json::Value as JsonValue;

use crate::container::{CODEC_KEY, SCHEMA_KEY, SyncMarker, is_reserved, read_block, read_header};
use crate::convert::avro_to_row;
use crate::{AvroSchema, BuildInfo, FORMAT_VERSION_KEY, FormatVersion, RIME_VERSION_KEY};

/// Reads rows back out of an Avro container file written by [`crate::AvroRecordWriter`].
///
/// Records are decoded with the physical schema of `schema` and converted positionally into its
/// logical types. The schema stored in the file header is kept as written and only checked for a
/// matching field count.
pub struct AvroRecordReader<'a, R: Read> {
    schema: &'a AvroSchema,
    source: R,
    header_schema: JsonValue,
    metadata: HashMap<String, Vec<u8>>,
    codec: Codec,
    sync: SyncMarker,
    block: Cursor<Vec<u8>>,
    remaining: usize,
    done: bool,
}

impl<'a, R: Read> AvroRecordReader<'a, R> {
    pub fn try_new(schema: &'a AvroSchema, mut source: R) -> RimeResult<Self> {
        let header = read_header(&mut source)?;
        let mut metadata = header.metadata;

        let raw_schema = metadata
            .remove(SCHEMA_KEY)
            .ok_or_else(|| rime_err!("File header has no {SCHEMA_KEY}"))?;
        let header_schema: JsonValue = serde_json::from_slice(&raw_schema)?;
        match header_schema["fields"].as_array() {
            Some(fields) if fields.len() == schema.len() => {}
            Some(fields) => rime_bail!(
                "File schema has {} fields, expected {}",
                fields.len(),
                schema.len()
            ),
            None => rime_bail!("File schema is not a record"),
        }

        let codec = match metadata.get(CODEC_KEY).map(Vec::as_slice) {
            None | Some(b"null") => Codec::Null,
            Some(b"deflate") => Codec::Deflate,
            Some(other) => rime_bail!("Unsupported codec {}", String::from_utf8_lossy(other)),
        };
        metadata.retain(|key, _| !is_reserved(key));

        Ok(Self {
            schema,
            source,
            header_schema,
            metadata,
            codec,
            sync: header.sync,
            block: Cursor::default(),
            remaining: 0,
            done: false,
        })
    }

    /// The record schema stored in the file header
    pub fn header_schema(&self) -> &JsonValue {
        &self.header_schema
    }

    /// All user metadata of the file header
    pub fn user_metadata(&self) -> &HashMap<String, Vec<u8>> {
        &self.metadata
    }

    /// A user metadata entry, if present and valid UTF-8
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.user_metadata()
            .get(key)
            .and_then(|value| std::str::from_utf8(value).ok())
    }

    pub fn format_version(&self) -> RimeResult<FormatVersion> {
        let raw = self
            .metadata(FORMAT_VERSION_KEY)
            .ok_or_else(|| rime_err!("File has no {FORMAT_VERSION_KEY} metadata"))?;
        FormatVersion::parse(raw)
    }

    /// The version of the library that wrote the file, if it was recorded
    pub fn build_info(&self) -> Option<BuildInfo> {
        self.metadata(RIME_VERSION_KEY).map(BuildInfo::new)
    }

    fn next_row(&mut self) -> RimeResult<Option<Row>> {
        while self.remaining == 0 {
            let Some((records, data)) = read_block(&mut self.source, self.codec, &self.sync)? else {
                return Ok(None);
            };
            self.remaining = records;
            self.block = Cursor::new(data);
        }

        let value = from_avro_datum(self.schema.apache_schema(), &mut self.block, None)?;
        self.remaining -= 1;
        avro_to_row(self.schema, &value).map(Some)
    }
}

impl<R: Read> Iterator for AvroRecordReader<'_, R> {
    type Item = RimeResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let next = self.next_row();
        if !matches!(next, Ok(Some(_))) {
            self.done = true;
        }
        next.transpose()
    }
}

use std::collections::HashMap;
use std::io::Write;

use apache_avro::{Codec, to_avro_datum};
use rime_error::{RimeError, RimeResult, rime_bail};
use rime_literal::StructLike;
use uuid::Uuid;

use crate::container::{CODEC_KEY, SCHEMA_KEY, SyncMarker, is_reserved, write_block, write_header};
use crate::convert::row_to_avro;
use crate::{AvroSchema, AvroWriteOptions, FORMAT_VERSION_KEY, RIME_VERSION_KEY};

/// Encoded records are gathered into blocks of roughly this many bytes before compression.
const BLOCK_SIZE: usize = 16_000;

/// Writes rows into a deflate-compressed Avro object container file.
///
/// The header, carrying [`AvroSchema::to_json`] as `avro.schema` and the `format-version`
/// metadata, is written as soon as the writer is created. The writer owns its sink for the whole
/// session. If any row fails to encode the session is over: drop the writer, which drops the
/// sink, and start again from an empty sink.
pub struct AvroRecordWriter<'a, W: Write> {
    schema: &'a AvroSchema,
    sink: W,
    sync: SyncMarker,
    block: Vec<u8>,
    block_records: usize,
    records: usize,
}

impl<'a, W: Write> AvroRecordWriter<'a, W> {
    pub fn try_new(
        schema: &'a AvroSchema,
        options: &AvroWriteOptions,
        mut sink: W,
    ) -> RimeResult<Self> {
        let mut metadata = HashMap::from([
            (SCHEMA_KEY.to_string(), schema.to_json().to_string().into_bytes()),
            (CODEC_KEY.to_string(), b"deflate".to_vec()),
            (
                FORMAT_VERSION_KEY.to_string(),
                options.format_version().to_string().into_bytes(),
            ),
        ]);
        if let Some(build_info) = options.build_info() {
            metadata.insert(
                RIME_VERSION_KEY.to_string(),
                build_info.version().as_bytes().to_vec(),
            );
        }
        for (key, value) in options.extra_metadata() {
            if key == FORMAT_VERSION_KEY || key == RIME_VERSION_KEY || is_reserved(key) {
                rime_bail!("Metadata key {key} is reserved");
            }
            metadata.insert(key.clone(), value.as_bytes().to_vec());
        }

        let sync = Uuid::new_v4().into_bytes();
        write_header(&mut sink, metadata, &sync)?;

        Ok(Self {
            schema,
            sink,
            sync,
            block: Vec::with_capacity(BLOCK_SIZE),
            block_records: 0,
            records: 0,
        })
    }

    /// Encode and buffer one row.
    pub fn append<R: StructLike + ?Sized>(&mut self, row: &R) -> RimeResult<()> {
        let encoded = row_to_avro(self.schema, row)
            .and_then(|record| {
                to_avro_datum(self.schema.apache_schema(), record).map_err(RimeError::from)
            })
            .map_err(|err| err.with_context(format!("Failed to encode record {}", self.records)))?;
        self.block.extend_from_slice(&encoded);
        self.block_records += 1;
        self.records += 1;

        if self.block.len() >= BLOCK_SIZE {
            self.flush_block()?;
        }
        Ok(())
    }

    /// The number of rows appended so far
    pub fn records(&self) -> usize {
        self.records
    }

    fn flush_block(&mut self) -> RimeResult<()> {
        if self.block_records == 0 {
            return Ok(());
        }
        let data = std::mem::replace(&mut self.block, Vec::with_capacity(BLOCK_SIZE));
        write_block(
            &mut self.sink,
            Codec::Deflate,
            self.block_records,
            data,
            &self.sync,
        )?;
        self.block_records = 0;
        Ok(())
    }

    /// Write the remaining block and hand back the flushed sink.
    pub fn finish(mut self) -> RimeResult<W> {
        self.flush_block()?;
        self.sink.flush()?;
        log::debug!(
            "Wrote {} records to Avro record {}",
            self.records,
            self.schema.name()
        );
        Ok(self.sink)
    }
}

/// Write `rows` into `sink` as one Avro container file with the given options.
pub fn avro_encode<'r, W, R, I>(
    schema: &AvroSchema,
    options: &AvroWriteOptions,
    rows: I,
    sink: W,
) -> RimeResult<W>
where
    W: Write,
    R: StructLike + ?Sized + 'r,
    I: IntoIterator<Item = &'r R>,
{
    options.write(schema, sink, rows)
}

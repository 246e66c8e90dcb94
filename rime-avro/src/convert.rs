use apache_avro::types::Value as AvroValue;
use rime_dtype::DType;
use rime_error::{RimeResult, rime_bail, rime_err};
use rime_literal::{Literal, Row, StructLike, Value};
use uuid::Uuid;

use crate::{AvroField, AvroSchema};

/// Encode one, possibly absent, literal as the physical Avro value of `field`.
///
/// Logical values travel as their storage primitive: dates as `int`, times and timestamps as
/// `long` microseconds, uuids as their 16 raw bytes.
pub fn literal_to_avro(field: &AvroField, literal: Option<&Literal>) -> RimeResult<AvroValue> {
    let Some(literal) = literal else {
        if field.is_nullable() {
            return Ok(AvroValue::Union(0, Box::new(AvroValue::Null)));
        }
        rime_bail!(
            "Null value for required field {} (id {})",
            field.name(),
            field.field_id()
        );
    };

    if !literal.is_instance_of(field.source_type()) {
        rime_bail!(
            "Field {} expects {} but got a {} literal",
            field.name(),
            field.source_type(),
            literal.kind()
        );
    }

    let value = match literal {
        Literal::Boolean(v) => AvroValue::Boolean(*v),
        Literal::Int32(v) | Literal::Date(v) => AvroValue::Int(*v),
        Literal::Int64(v)
        | Literal::Time(v)
        | Literal::Timestamp(v)
        | Literal::TimestampTz(v) => AvroValue::Long(*v),
        Literal::Float32(v) => AvroValue::Float(*v),
        Literal::Float64(v) => AvroValue::Double(*v),
        Literal::String(s) => AvroValue::String(s.to_string()),
        Literal::Binary(b) => AvroValue::Bytes(b.to_vec()),
        Literal::Fixed(b) => AvroValue::Fixed(b.len(), b.to_vec()),
        Literal::Uuid(u) => AvroValue::Fixed(u.as_bytes().len(), u.as_bytes().to_vec()),
    };

    Ok(if field.is_nullable() {
        AvroValue::Union(1, Box::new(value))
    } else {
        value
    })
}

/// Decode the Avro value of `field` back into a literal; `None` for a null.
pub fn avro_to_literal(field: &AvroField, value: &AvroValue) -> RimeResult<Option<Literal>> {
    let value = match value {
        AvroValue::Union(_, inner) => inner.as_ref(),
        other => other,
    };

    Ok(Some(match (field.source_type(), value) {
        (_, AvroValue::Null) => return Ok(None),
        (DType::Boolean, AvroValue::Boolean(v)) => Literal::Boolean(*v),
        (DType::Int32, AvroValue::Int(v)) => Literal::Int32(*v),
        (DType::Int64, AvroValue::Long(v)) => Literal::Int64(*v),
        (DType::Float32, AvroValue::Float(v)) => Literal::Float32(*v),
        (DType::Float64, AvroValue::Double(v)) => Literal::Float64(*v),
        (DType::String, AvroValue::String(s)) => Literal::string(s.as_str()),
        (DType::Binary, AvroValue::Bytes(b)) => Literal::binary(b.clone()),
        (DType::Date, AvroValue::Date(days) | AvroValue::Int(days)) => Literal::Date(*days),
        (DType::Time, AvroValue::TimeMicros(micros) | AvroValue::Long(micros)) => {
            Literal::Time(*micros)
        }
        (
            DType::Timestamp,
            AvroValue::TimeMicros(micros)
            | AvroValue::LocalTimestampMicros(micros)
            | AvroValue::Long(micros),
        ) => Literal::Timestamp(*micros),
        (
            DType::TimestampTz,
            AvroValue::TimeMicros(micros)
            | AvroValue::TimestampMicros(micros)
            | AvroValue::Long(micros),
        ) => Literal::TimestampTz(*micros),
        (DType::Uuid, AvroValue::Uuid(u)) => Literal::Uuid(*u),
        (DType::Uuid, AvroValue::Fixed(_, bytes)) => Literal::Uuid(
            Uuid::from_slice(bytes).map_err(|e| rime_err!("Invalid uuid in {}: {e}", field.name()))?,
        ),
        (dtype, _) => rime_bail!(
            "Avro value of field {} does not match its type {}",
            field.name(),
            dtype
        ),
    }))
}

/// Encode a row positionally against the fields of `schema`.
pub(crate) fn row_to_avro<R: StructLike + ?Sized>(
    schema: &AvroSchema,
    row: &R,
) -> RimeResult<AvroValue> {
    if row.size() != schema.len() {
        rime_bail!(
            "Row has {} values but the schema has {} fields",
            row.size(),
            schema.len()
        );
    }

    let fields = schema
        .fields()
        .iter()
        .enumerate()
        .map(|(pos, field)| -> RimeResult<(String, AvroValue)> {
            let literal = match row.get(pos) {
                None => None,
                Some(Value::Literal(literal)) => Some(literal),
                Some(Value::Struct(_)) => {
                    rime_bail!("Field {} holds a nested row", field.name())
                }
            };
            Ok((field.name().to_string(), literal_to_avro(field, literal)?))
        })
        .collect::<RimeResult<Vec<_>>>()?;

    Ok(AvroValue::Record(fields))
}

/// Decode a record into a row, positionally against the fields of `schema`.
pub(crate) fn avro_to_row(schema: &AvroSchema, value: &AvroValue) -> RimeResult<Row> {
    let AvroValue::Record(values) = value else {
        rime_bail!("Expected an Avro record");
    };
    if values.len() != schema.len() {
        rime_bail!(
            "Record has {} values but the schema has {} fields",
            values.len(),
            schema.len()
        );
    }

    schema
        .fields()
        .iter()
        .zip(values)
        .map(|(field, (_, value))| -> RimeResult<Option<Value>> {
            Ok(avro_to_literal(field, value)?.map(Value::Literal))
        })
        .collect()
}

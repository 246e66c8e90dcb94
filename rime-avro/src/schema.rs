//! Translation of a logical [`StructType`] into a physical Avro record schema.

use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use apache_avro::Schema;
use rime_dtype::{DType, FieldName, NestedField, StructType};
use rime_error::{RimeResult, rime_bail};
use serde_json::{Map, Value as JsonValue, json};

/// The synthetic name every translated record carries, so that structurally identical field lists
/// always produce identical schemas.
pub const RECORD_NAME: &str = "r102";

/// The name of the fixed type backing `uuid` columns.
pub const UUID_FIXED_NAME: &str = "uuid_fixed";

const UUID_SIZE: usize = 16;

/// The physical Avro primitive a column is stored as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AvroPrimitive {
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
    Fixed { name: &'static str, size: usize },
}

impl AvroPrimitive {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Bytes => "bytes",
            Self::String => "string",
            Self::Fixed { .. } => "fixed",
        }
    }
}

impl Display for AvroPrimitive {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed { name, size } => write!(f, "fixed {name}[{size}]"),
            other => write!(f, "{}", other.type_name()),
        }
    }
}

/// A logical type annotation refining the meaning of an [`AvroPrimitive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalAnnotation {
    /// Days since the epoch, on an `int`
    Date,
    /// Microseconds, on a `long`. Timestamps additionally record whether they are UTC-adjusted.
    TimeMicros { adjust_to_utc: Option<bool> },
    /// RFC 4122 identifier, on a 16-byte fixed
    Uuid,
}

impl LogicalAnnotation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::TimeMicros { .. } => "time-micros",
            Self::Uuid => "uuid",
        }
    }
}

fn physical_type(dtype: &DType) -> RimeResult<(AvroPrimitive, Option<LogicalAnnotation>)> {
    Ok(match dtype {
        DType::String => (AvroPrimitive::String, None),
        DType::Int32 => (AvroPrimitive::Int, None),
        DType::Int64 => (AvroPrimitive::Long, None),
        DType::Binary => (AvroPrimitive::Bytes, None),
        DType::Boolean => (AvroPrimitive::Boolean, None),
        DType::Float32 => (AvroPrimitive::Float, None),
        DType::Float64 => (AvroPrimitive::Double, None),
        DType::Date => (AvroPrimitive::Int, Some(LogicalAnnotation::Date)),
        DType::Time => (
            AvroPrimitive::Long,
            Some(LogicalAnnotation::TimeMicros {
                adjust_to_utc: None,
            }),
        ),
        DType::Timestamp => (
            AvroPrimitive::Long,
            Some(LogicalAnnotation::TimeMicros {
                adjust_to_utc: Some(false),
            }),
        ),
        DType::TimestampTz => (
            AvroPrimitive::Long,
            Some(LogicalAnnotation::TimeMicros {
                adjust_to_utc: Some(true),
            }),
        ),
        DType::Uuid => (
            AvroPrimitive::Fixed {
                name: UUID_FIXED_NAME,
                size: UUID_SIZE,
            },
            Some(LogicalAnnotation::Uuid),
        ),
        DType::Decimal(_) | DType::Fixed(_) | DType::Struct(_) | DType::List(_) | DType::Map(_) => {
            rime_bail!(UnsupportedType: "{}", dtype)
        }
    })
}

/// One field of a translated record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvroField {
    name: FieldName,
    field_id: i32,
    doc: Option<Arc<str>>,
    physical: AvroPrimitive,
    logical: Option<LogicalAnnotation>,
    nullable: bool,
    source_type: DType,
}

impl AvroField {
    /// Translate a single primitive field.
    pub fn try_from_nested(field: &NestedField) -> RimeResult<Self> {
        let (physical, logical) = physical_type(field.field_type())?;
        Ok(Self {
            name: field.name().clone(),
            field_id: field.id(),
            doc: field.doc().map(Arc::from),
            physical,
            logical,
            nullable: !field.is_required(),
            source_type: field.field_type().clone(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_id(&self) -> i32 {
        self.field_id
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub fn physical(&self) -> AvroPrimitive {
        self.physical
    }

    pub fn logical(&self) -> Option<LogicalAnnotation> {
        self.logical
    }

    /// Whether the field is wrapped in a `["null", T]` union
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// The logical type the field was translated from
    pub fn source_type(&self) -> &DType {
        &self.source_type
    }

    /// The schema of the non-null value. Named types already emitted earlier in the record are
    /// referenced by name. Without `annotate` only the physical type is written.
    fn value_json(&self, named: &mut HashSet<&'static str>, annotate: bool) -> JsonValue {
        let base = match self.physical {
            AvroPrimitive::Fixed { name, size } => {
                if !named.insert(name) {
                    return json!(name);
                }
                json!({ "type": "fixed", "name": name, "size": size })
            }
            primitive => json!(primitive.type_name()),
        };

        let Some(logical) = self.logical.filter(|_| annotate) else {
            return base;
        };
        let mut annotated = match base {
            JsonValue::Object(obj) => obj,
            other => {
                let mut obj = Map::new();
                obj.insert("type".into(), other);
                obj
            }
        };
        annotated.insert("logicalType".into(), json!(logical.name()));
        if let LogicalAnnotation::TimeMicros {
            adjust_to_utc: Some(adjust),
        } = logical
        {
            annotated.insert("adjust-to-utc".into(), json!(adjust));
        }
        JsonValue::Object(annotated)
    }

    fn to_json(&self, named: &mut HashSet<&'static str>, annotate: bool) -> JsonValue {
        let value = self.value_json(named, annotate);
        let mut field = Map::new();
        field.insert("name".into(), json!(self.name()));
        field.insert(
            "type".into(),
            if self.nullable {
                json!(["null", value])
            } else {
                value
            },
        );
        if let Some(doc) = self.doc().filter(|d| !d.is_empty()) {
            field.insert("doc".into(), json!(doc));
        }
        field.insert("field-id".into(), json!(self.field_id));
        JsonValue::Object(field)
    }
}

pub(crate) fn record_json(name: &str, fields: &[AvroField], annotate: bool) -> JsonValue {
    let mut named = HashSet::new();
    let fields: Vec<JsonValue> = fields
        .iter()
        .map(|f| f.to_json(&mut named, annotate))
        .collect();
    json!({ "type": "record", "name": name, "fields": fields })
}

/// A physical Avro record schema translated from a logical struct.
///
/// Holds the field-level model, the annotated JSON written into file headers, and the parsed
/// physical [`apache_avro::Schema`] records are encoded and decoded with. Equality compares the
/// model only.
#[derive(Debug, Clone)]
pub struct AvroSchema {
    name: Arc<str>,
    fields: Arc<[AvroField]>,
    json: JsonValue,
    schema: Schema,
}

impl AvroSchema {
    /// Assemble a record from translated fields.
    ///
    /// Fails with [`rime_error::RimeError::Avro`] if the record is not a valid Avro schema, for
    /// example because a field name is not a valid Avro identifier.
    pub fn try_new(name: impl Into<Arc<str>>, fields: Vec<AvroField>) -> RimeResult<Self> {
        let name = name.into();
        let json = record_json(&name, &fields, true);
        let schema = Schema::parse(&record_json(&name, &fields, false))?;
        log::debug!("Parsed Avro record {} with {} fields", name, fields.len());

        Ok(Self {
            name,
            fields: fields.into(),
            json,
            schema,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[AvroField] {
        &self.fields
    }

    pub fn field(&self, idx: usize) -> Option<&AvroField> {
        self.fields.get(idx)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The Avro JSON form of the schema. Object keys are sorted.
    pub fn to_json(&self) -> &JsonValue {
        &self.json
    }

    /// The physical schema records are encoded and decoded with.
    ///
    /// Logical annotations are left off, so `uuid_fixed` stays a named 16-byte fixed that later
    /// fields can reference, and temporal values travel as their bare `int` or `long`.
    pub fn apache_schema(&self) -> &Schema {
        &self.schema
    }
}

impl PartialEq for AvroSchema {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.fields == other.fields
    }
}

impl Eq for AvroSchema {}

impl Display for AvroSchema {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.json)
    }
}

/// Translate a flat struct into the Avro record its rows are written as.
///
/// Only primitive fields are supported; decimals, fixed byte arrays and nested types fail with
/// [`rime_error::RimeError::UnsupportedType`] and no schema is returned.
pub fn to_avro_schema(schema: &StructType) -> RimeResult<AvroSchema> {
    let fields = schema
        .fields()
        .iter()
        .map(AvroField::try_from_nested)
        .collect::<RimeResult<Vec<_>>>()?;
    AvroSchema::try_new(RECORD_NAME, fields)
}

#[cfg(test)]
mod test {
    use apache_avro::Schema;
    use rime_dtype::{DType, DecimalDType, ListType, MapType, NestedField, StructType};
    use rime_error::RimeError;
    use rstest::rstest;
    use serde_json::json;

    use crate::schema::record_json;
    use crate::{AvroField, AvroPrimitive, LogicalAnnotation, RECORD_NAME, to_avro_schema};

    fn single(dtype: DType) -> StructType {
        StructType::new(vec![NestedField::required(1, "col", dtype)])
    }

    #[rstest]
    #[case(DType::String, json!("string"))]
    #[case(DType::Int32, json!("int"))]
    #[case(DType::Int64, json!("long"))]
    #[case(DType::Binary, json!("bytes"))]
    #[case(DType::Boolean, json!("boolean"))]
    #[case(DType::Float32, json!("float"))]
    #[case(DType::Float64, json!("double"))]
    #[case(DType::Date, json!({"type": "int", "logicalType": "date"}))]
    #[case(DType::Time, json!({"type": "long", "logicalType": "time-micros"}))]
    #[case(
        DType::Timestamp,
        json!({"type": "long", "logicalType": "time-micros", "adjust-to-utc": false})
    )]
    #[case(
        DType::TimestampTz,
        json!({"type": "long", "logicalType": "time-micros", "adjust-to-utc": true})
    )]
    #[case(
        DType::Uuid,
        json!({"type": "fixed", "name": "uuid_fixed", "size": 16, "logicalType": "uuid"})
    )]
    fn primitive_mapping(#[case] dtype: DType, #[case] expected: serde_json::Value) {
        let schema = to_avro_schema(&single(dtype.clone())).unwrap();
        assert_eq!(schema.to_json()["fields"][0]["type"], expected);
        assert_eq!(schema.field(0).unwrap().source_type(), &dtype);
    }

    #[test]
    fn required_and_optional() {
        let st = StructType::new(vec![
            NestedField::required(1, "id", DType::Int64),
            NestedField::optional(2, "name", DType::String).with_doc("display name"),
        ]);
        let schema = to_avro_schema(&st).unwrap();

        assert_eq!(
            schema.to_json(),
            &json!({
                "type": "record",
                "name": "r102",
                "fields": [
                    {"name": "id", "type": "long", "field-id": 1},
                    {
                        "name": "name",
                        "type": ["null", "string"],
                        "doc": "display name",
                        "field-id": 2
                    }
                ]
            })
        );
        assert_eq!(schema.name(), RECORD_NAME);
        assert_eq!(schema.len(), 2);
        assert!(!schema.fields()[0].is_nullable());
        assert!(schema.fields()[1].is_nullable());
        assert_eq!(schema.fields()[1].doc(), Some("display name"));
        assert!(matches!(
            schema.apache_schema(),
            apache_avro::Schema::Record(_)
        ));
    }

    #[test]
    fn field_order_and_ids_preserved() {
        let st = StructType::new(vec![
            NestedField::required(7, "c", DType::Int32),
            NestedField::required(3, "a", DType::Int32),
            NestedField::optional(5, "b", DType::Date),
        ]);
        let schema = to_avro_schema(&st).unwrap();
        let ids: Vec<_> = schema.fields().iter().map(|f| f.field_id()).collect();
        let names: Vec<_> = schema.fields().iter().map(|f| f.name()).collect();
        assert_eq!(ids, vec![7, 3, 5]);
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn timestamp_variants_differ_only_in_adjustment() {
        let ts = to_avro_schema(&single(DType::Timestamp)).unwrap();
        let tstz = to_avro_schema(&single(DType::TimestampTz)).unwrap();

        let ts_field = &ts.fields()[0];
        let tstz_field = &tstz.fields()[0];
        assert_eq!(ts_field.physical(), tstz_field.physical());
        assert_eq!(
            ts_field.logical(),
            Some(LogicalAnnotation::TimeMicros {
                adjust_to_utc: Some(false)
            })
        );
        assert_eq!(
            tstz_field.logical(),
            Some(LogicalAnnotation::TimeMicros {
                adjust_to_utc: Some(true)
            })
        );

        let mut ts_json = ts.to_json().clone();
        let mut tstz_json = tstz.to_json().clone();
        assert_ne!(ts_json, tstz_json);
        ts_json["fields"][0]["type"]
            .as_object_mut()
            .unwrap()
            .remove("adjust-to-utc");
        tstz_json["fields"][0]["type"]
            .as_object_mut()
            .unwrap()
            .remove("adjust-to-utc");
        assert_eq!(ts_json, tstz_json);
    }

    #[test]
    fn identical_fields_give_identical_schemas() {
        let a = to_avro_schema(&single(DType::Uuid)).unwrap();
        let b = to_avro_schema(&single(DType::Uuid)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), b.to_string());
    }

    #[rstest]
    #[case(DType::Decimal(DecimalDType::try_new(9, 2).unwrap()), "decimal(9, 2)")]
    #[case(DType::Fixed(8), "fixed[8]")]
    #[case(DType::List(ListType::new(3, DType::Int32, true)), "list<int>")]
    #[case(
        DType::Map(MapType::new(3, DType::String, 4, DType::Int64, false)),
        "map<string, long>"
    )]
    #[case(
        DType::Struct(StructType::new(vec![NestedField::required(3, "x", DType::Int32)])),
        "struct<3: x: required int>"
    )]
    fn unsupported_types(#[case] dtype: DType, #[case] name: &str) {
        let st = StructType::new(vec![
            NestedField::required(1, "ok", DType::Int64),
            NestedField::optional(2, "nested", dtype),
        ]);
        let err = to_avro_schema(&st).unwrap_err();
        assert!(matches!(err, RimeError::UnsupportedType(..)));
        assert!(err.to_string().starts_with(&format!("unsupported type: {name}")));
    }

    #[test]
    fn invalid_field_name_is_rejected_by_avro() {
        let st = StructType::new(vec![NestedField::required(1, "not-valid", DType::Int32)]);
        assert!(matches!(to_avro_schema(&st), Err(RimeError::Avro(_))));
    }

    #[test]
    fn repeated_uuid_is_referenced() {
        let fields = vec![
            AvroField::try_from_nested(&NestedField::required(1, "a", DType::Uuid)).unwrap(),
            AvroField::try_from_nested(&NestedField::optional(2, "b", DType::Uuid)).unwrap(),
        ];
        assert_eq!(
            fields[1].physical(),
            AvroPrimitive::Fixed {
                name: "uuid_fixed",
                size: 16
            }
        );
        let json = record_json(RECORD_NAME, &fields, true);
        assert_eq!(json["fields"][0]["type"]["name"], json!("uuid_fixed"));
        assert_eq!(json["fields"][0]["type"]["logicalType"], json!("uuid"));
        assert_eq!(json["fields"][1]["type"], json!(["null", "uuid_fixed"]));
    }

    #[test]
    fn physical_schema_keeps_named_uuid_fixed() {
        let st = StructType::new(vec![
            NestedField::required(1, "a", DType::Uuid),
            NestedField::optional(2, "b", DType::Uuid),
            NestedField::required(3, "ts", DType::TimestampTz),
        ]);
        let schema = to_avro_schema(&st).unwrap();
        let Schema::Record(record) = schema.apache_schema() else {
            panic!("expected a record schema");
        };

        let Schema::Fixed(fixed) = &record.fields[0].schema else {
            panic!("uuid should be stored as a fixed");
        };
        assert_eq!(fixed.name.name, "uuid_fixed");
        assert_eq!(fixed.size, 16);

        let Schema::Union(union) = &record.fields[1].schema else {
            panic!("optional field should be a union");
        };
        assert!(matches!(
            &union.variants()[1],
            Schema::Ref { name } if name.name == "uuid_fixed"
        ));
        assert_eq!(record.fields[2].schema, Schema::Long);

        assert_eq!(
            schema.to_json()["fields"][2]["type"]["adjust-to-utc"],
            json!(true)
        );
    }
}

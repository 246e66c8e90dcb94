use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

use DType::*;

use crate::{DecimalDType, ListType, MapType, StructType};

/// A name for a field in a struct
pub type FieldName = Arc<str>;

/// The logical types a table column may declare.
///
/// A logical type describes what a value means, independently of how any physical format stores
/// it. Primitive types carry no nullability of their own: whether a value may be absent is a
/// property of the [`crate::NestedField`] that holds it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DType {
    /// `true` or `false`
    Boolean,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// 32-bit IEEE 754 floating point
    Float32,
    /// 64-bit IEEE 754 floating point
    Float64,
    /// Fixed-point decimal with the given precision and scale
    Decimal(DecimalDType),
    /// Calendar date, stored as days since 1970-01-01
    Date,
    /// Time of day, stored as microseconds since midnight
    Time,
    /// Timestamp without a zone, stored as microseconds since 1970-01-01 00:00:00
    Timestamp,
    /// Timestamp anchored to UTC, stored as microseconds since 1970-01-01 00:00:00 UTC
    TimestampTz,
    /// UTF-8 text
    String,
    /// RFC 4122 universally unique identifier
    Uuid,
    /// Byte array of the given, fixed length
    Fixed(usize),
    /// Variable-length byte array
    Binary,
    /// An ordered list of nested fields
    Struct(StructType),
    /// A variable-length list of a single element type
    List(ListType),
    /// A map from keys of one type to values of another
    Map(MapType),
}

impl DType {
    /// Check if `self` is a primitive (non-nested) type
    pub fn is_primitive(&self) -> bool {
        !self.is_nested()
    }

    /// Check if `self` is a struct, list or map
    pub fn is_nested(&self) -> bool {
        matches!(self, Struct(_) | List(_) | Map(_))
    }

    /// Check if `self` is a date, time or timestamp type
    pub fn is_temporal(&self) -> bool {
        matches!(self, Date | Time | Timestamp | TimestampTz)
    }

    /// Check if `self` is an integer
    pub fn is_int(&self) -> bool {
        matches!(self, Int32 | Int64)
    }

    /// Check if `self` is a floating point number
    pub fn is_float(&self) -> bool {
        matches!(self, Float32 | Float64)
    }

    /// Get the `StructType` if `self` is a struct, otherwise `None`
    pub fn as_struct(&self) -> Option<&StructType> {
        match self {
            Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Get the `ListType` if `self` is a list, otherwise `None`
    pub fn as_list(&self) -> Option<&ListType> {
        match self {
            List(l) => Some(l),
            _ => None,
        }
    }

    /// Get the `MapType` if `self` is a map, otherwise `None`
    pub fn as_map(&self) -> Option<&MapType> {
        match self {
            Map(m) => Some(m),
            _ => None,
        }
    }
}

impl Display for DType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Boolean => write!(f, "boolean"),
            Int32 => write!(f, "int"),
            Int64 => write!(f, "long"),
            Float32 => write!(f, "float"),
            Float64 => write!(f, "double"),
            Decimal(dt) => write!(f, "{dt}"),
            Date => write!(f, "date"),
            Time => write!(f, "time"),
            Timestamp => write!(f, "timestamp"),
            TimestampTz => write!(f, "timestamptz"),
            String => write!(f, "string"),
            Uuid => write!(f, "uuid"),
            Fixed(len) => write!(f, "fixed[{len}]"),
            Binary => write!(f, "binary"),
            Struct(st) => write!(f, "{st}"),
            List(lt) => write!(f, "{lt}"),
            Map(mt) => write!(f, "{mt}"),
        }
    }
}

#[cfg(test)]
mod test {
    use rstest::rstest;

    use crate::dtype::DType;
    use crate::{DecimalDType, ListType, MapType, NestedField, StructType};

    #[rstest]
    #[case(DType::Boolean, "boolean")]
    #[case(DType::Int32, "int")]
    #[case(DType::Int64, "long")]
    #[case(DType::Float32, "float")]
    #[case(DType::Float64, "double")]
    #[case(DType::Date, "date")]
    #[case(DType::Time, "time")]
    #[case(DType::Timestamp, "timestamp")]
    #[case(DType::TimestampTz, "timestamptz")]
    #[case(DType::String, "string")]
    #[case(DType::Uuid, "uuid")]
    #[case(DType::Fixed(16), "fixed[16]")]
    #[case(DType::Binary, "binary")]
    fn primitive_display(#[case] dtype: DType, #[case] expected: &str) {
        assert!(dtype.is_primitive());
        assert_eq!(dtype.to_string(), expected);
    }

    #[test]
    fn nested_display() {
        let list = DType::List(ListType::new(3, DType::Int32, true));
        assert_eq!(list.to_string(), "list<int>");
        assert!(list.is_nested());
        assert!(list.as_list().is_some());

        let map = DType::Map(MapType::new(4, DType::String, 5, DType::Float64, false));
        assert_eq!(map.to_string(), "map<string, double>");

        let st = DType::Struct(StructType::new(vec![
            NestedField::required(1, "id", DType::Int64),
            NestedField::optional(
                2,
                "price",
                DType::Decimal(DecimalDType::try_new(9, 2).unwrap()),
            ),
        ]));
        assert_eq!(
            st.to_string(),
            "struct<1: id: required long, 2: price: optional decimal(9, 2)>"
        );
        assert!(st.as_struct().is_some());
        assert!(st.as_map().is_none());
    }

    #[test]
    fn predicates() {
        assert!(DType::Date.is_temporal());
        assert!(DType::TimestampTz.is_temporal());
        assert!(!DType::Int64.is_temporal());
        assert!(DType::Int64.is_int());
        assert!(DType::Float32.is_float());
        assert!(!DType::Binary.is_nested());
    }
}

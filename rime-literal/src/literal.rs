use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::mem;
use std::sync::Arc;

use bytes::Bytes;
use rime_dtype::DType;
use uuid::Uuid;

/// The kind of a [`Literal`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Boolean,
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    Binary,
    Fixed,
    Date,
    Time,
    Timestamp,
    TimestampTz,
    Uuid,
}

impl Display for LiteralKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Boolean => "boolean",
            Self::Int32 => "int",
            Self::Int64 => "long",
            Self::Float32 => "float",
            Self::Float64 => "double",
            Self::String => "string",
            Self::Binary => "binary",
            Self::Fixed => "fixed",
            Self::Date => "date",
            Self::Time => "time",
            Self::Timestamp => "timestamp",
            Self::TimestampTz => "timestamptz",
            Self::Uuid => "uuid",
        };
        write!(f, "{name}")
    }
}

/// A typed, immutable constant holding one column value.
///
/// Equality is only defined between literals of the same kind: `Int32(1)` and `Int64(1)` are
/// never equal, and neither are `Date(7)` and `Int32(7)`. Floating point literals compare by
/// their bit pattern, so `NaN` equals an identical `NaN` and `0.0` differs from `-0.0`.
///
/// Cloning is cheap: string and byte payloads are reference counted.
#[derive(Debug, Clone)]
pub enum Literal {
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    String(Arc<str>),
    /// Variable-length bytes
    Binary(Bytes),
    /// Bytes whose length is fixed by the column type
    Fixed(Bytes),
    /// Days since 1970-01-01
    Date(i32),
    /// Microseconds since midnight
    Time(i64),
    /// Microseconds since 1970-01-01 00:00:00, no zone
    Timestamp(i64),
    /// Microseconds since 1970-01-01 00:00:00 UTC
    TimestampTz(i64),
    Uuid(Uuid),
}

impl Literal {
    pub fn boolean(value: bool) -> Self {
        Self::Boolean(value)
    }

    pub fn int32(value: i32) -> Self {
        Self::Int32(value)
    }

    pub fn int64(value: i64) -> Self {
        Self::Int64(value)
    }

    pub fn float32(value: f32) -> Self {
        Self::Float32(value)
    }

    pub fn float64(value: f64) -> Self {
        Self::Float64(value)
    }

    pub fn string(value: impl Into<Arc<str>>) -> Self {
        Self::String(value.into())
    }

    pub fn binary(value: impl Into<Bytes>) -> Self {
        Self::Binary(value.into())
    }

    pub fn fixed(value: impl Into<Bytes>) -> Self {
        Self::Fixed(value.into())
    }

    pub fn date(days: i32) -> Self {
        Self::Date(days)
    }

    pub fn time(micros: i64) -> Self {
        Self::Time(micros)
    }

    pub fn timestamp(micros: i64) -> Self {
        Self::Timestamp(micros)
    }

    pub fn timestamptz(micros: i64) -> Self {
        Self::TimestampTz(micros)
    }

    pub fn uuid(value: Uuid) -> Self {
        Self::Uuid(value)
    }

    pub fn kind(&self) -> LiteralKind {
        match self {
            Self::Boolean(_) => LiteralKind::Boolean,
            Self::Int32(_) => LiteralKind::Int32,
            Self::Int64(_) => LiteralKind::Int64,
            Self::Float32(_) => LiteralKind::Float32,
            Self::Float64(_) => LiteralKind::Float64,
            Self::String(_) => LiteralKind::String,
            Self::Binary(_) => LiteralKind::Binary,
            Self::Fixed(_) => LiteralKind::Fixed,
            Self::Date(_) => LiteralKind::Date,
            Self::Time(_) => LiteralKind::Time,
            Self::Timestamp(_) => LiteralKind::Timestamp,
            Self::TimestampTz(_) => LiteralKind::TimestampTz,
            Self::Uuid(_) => LiteralKind::Uuid,
        }
    }

    /// The logical type this literal is an instance of.
    pub fn dtype(&self) -> DType {
        match self {
            Self::Boolean(_) => DType::Boolean,
            Self::Int32(_) => DType::Int32,
            Self::Int64(_) => DType::Int64,
            Self::Float32(_) => DType::Float32,
            Self::Float64(_) => DType::Float64,
            Self::String(_) => DType::String,
            Self::Binary(_) => DType::Binary,
            Self::Fixed(b) => DType::Fixed(b.len()),
            Self::Date(_) => DType::Date,
            Self::Time(_) => DType::Time,
            Self::Timestamp(_) => DType::Timestamp,
            Self::TimestampTz(_) => DType::TimestampTz,
            Self::Uuid(_) => DType::Uuid,
        }
    }

    /// Whether this literal can be stored in a column of type `dtype`.
    pub fn is_instance_of(&self, dtype: &DType) -> bool {
        &self.dtype() == dtype
    }

    /// Compare against a possibly absent literal; an absent comparand is never equal.
    pub fn equals_opt(&self, other: Option<&Literal>) -> bool {
        other.is_some_and(|o| self == o)
    }

    /// The canonical byte encoding of the payload, used for hashing.
    ///
    /// Fixed-width scalars are little-endian, strings are UTF-8, and byte-like kinds are their
    /// raw bytes. The kind is not part of the encoding, so literals of different kinds may share
    /// it (`Date(7)` and `Int32(7)` both encode as `07 00 00 00`).
    pub fn canonical_bytes(&self) -> Cow<'_, [u8]> {
        match self {
            Self::Boolean(v) => Cow::Owned(vec![u8::from(*v)]),
            Self::Int32(v) | Self::Date(v) => Cow::Owned(v.to_le_bytes().to_vec()),
            Self::Int64(v) | Self::Time(v) | Self::Timestamp(v) | Self::TimestampTz(v) => {
                Cow::Owned(v.to_le_bytes().to_vec())
            }
            Self::Float32(v) => Cow::Owned(v.to_bits().to_le_bytes().to_vec()),
            Self::Float64(v) => Cow::Owned(v.to_bits().to_le_bytes().to_vec()),
            Self::String(s) => Cow::Borrowed(s.as_bytes()),
            Self::Binary(b) | Self::Fixed(b) => Cow::Borrowed(b.as_ref()),
            Self::Uuid(u) => Cow::Borrowed(u.as_bytes().as_slice()),
        }
    }

    /// Feed the canonical encoding into `state`.
    pub fn hash_canonical<H: Hasher>(&self, state: &mut H) {
        state.write(&self.canonical_bytes());
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::Int32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The payload of a [`Literal::Binary`] or [`Literal::Fixed`].
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Binary(b) | Self::Fixed(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Self::Uuid(u) => Some(*u),
            _ => None,
        }
    }
}

impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Int32(a), Self::Int32(b)) => a == b,
            (Self::Int64(a), Self::Int64(b)) => a == b,
            (Self::Float32(a), Self::Float32(b)) => a.to_bits() == b.to_bits(),
            (Self::Float64(a), Self::Float64(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Binary(a), Self::Binary(b)) => a == b,
            (Self::Fixed(a), Self::Fixed(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Time(a), Self::Time(b)) => a == b,
            (Self::Timestamp(a), Self::Timestamp(b)) => a == b,
            (Self::TimestampTz(a), Self::TimestampTz(b)) => a == b,
            (Self::Uuid(a), Self::Uuid(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Literal {}

impl Hash for Literal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
        self.hash_canonical(state);
    }
}

/// Ordering is only defined between literals of the same kind.
impl PartialOrd for Literal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Boolean(a), Self::Boolean(b)) => Some(a.cmp(b)),
            (Self::Int32(a), Self::Int32(b)) | (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::Int64(a), Self::Int64(b))
            | (Self::Time(a), Self::Time(b))
            | (Self::Timestamp(a), Self::Timestamp(b))
            | (Self::TimestampTz(a), Self::TimestampTz(b)) => Some(a.cmp(b)),
            (Self::Float32(a), Self::Float32(b)) => Some(a.total_cmp(b)),
            (Self::Float64(a), Self::Float64(b)) => Some(a.total_cmp(b)),
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Binary(a), Self::Binary(b)) | (Self::Fixed(a), Self::Fixed(b)) => {
                Some(a.cmp(b))
            }
            (Self::Uuid(a), Self::Uuid(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Self::Int32(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Self::Int64(value)
    }
}

impl From<f32> for Literal {
    fn from(value: f32) -> Self {
        Self::Float32(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Self::Float64(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Self::String(value.into())
    }
}

// no From<&[u8]>: bytes could be either Binary or Fixed
impl From<Bytes> for Literal {
    fn from(value: Bytes) -> Self {
        Self::Binary(value)
    }
}

impl From<Uuid> for Literal {
    fn from(value: Uuid) -> Self {
        Self::Uuid(value)
    }
}

#[cfg(test)]
mod test {
    use std::cmp::Ordering;

    use bytes::Bytes;
    use rime_dtype::DType;
    use rstest::rstest;
    use uuid::Uuid;

    use crate::{Literal, LiteralKind};

    #[test]
    fn equality_requires_same_kind() {
        assert_eq!(Literal::int32(1), Literal::int32(1));
        assert_ne!(Literal::int32(1), Literal::int64(1));
        assert_ne!(Literal::int32(7), Literal::date(7));
        assert_ne!(Literal::time(7), Literal::timestamp(7));
        assert_ne!(Literal::timestamp(7), Literal::timestamptz(7));
        assert_ne!(
            Literal::binary(Bytes::from_static(b"ab")),
            Literal::fixed(Bytes::from_static(b"ab"))
        );
        assert_ne!(Literal::string("ab"), Literal::binary(Bytes::from_static(b"ab")));
    }

    #[test]
    fn byte_literals_compare_by_content() {
        let a = Literal::binary(vec![1u8, 2, 3]);
        let b = Literal::binary(Bytes::copy_from_slice(&[1, 2, 3]));
        assert_eq!(a, b);
        assert_ne!(a, Literal::binary(vec![1u8, 2]));
    }

    #[test]
    fn float_bit_equality() {
        assert_eq!(Literal::float64(f64::NAN), Literal::float64(f64::NAN));
        assert_ne!(Literal::float32(0.0), Literal::float32(-0.0));
        assert_eq!(Literal::float32(1.5), Literal::from(1.5f32));
    }

    #[test]
    fn absent_comparand() {
        let lit = Literal::boolean(true);
        assert!(!lit.equals_opt(None));
        assert!(lit.equals_opt(Some(&Literal::from(true))));
        assert!(!lit.equals_opt(Some(&Literal::int32(1))));
    }

    #[test]
    fn ordering_within_kind_only() {
        assert_eq!(
            Literal::int64(1).partial_cmp(&Literal::int64(2)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Literal::string("b").partial_cmp(&Literal::string("a")),
            Some(Ordering::Greater)
        );
        assert_eq!(Literal::int32(1).partial_cmp(&Literal::int64(1)), None);
        assert_eq!(
            Literal::float64(-0.0).partial_cmp(&Literal::float64(0.0)),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn canonical_bytes_ignore_kind() {
        assert_eq!(
            Literal::int32(7).canonical_bytes(),
            Literal::date(7).canonical_bytes()
        );
        assert_eq!(Literal::int32(7).canonical_bytes().as_ref(), &[7, 0, 0, 0]);
        assert_eq!(
            Literal::fixed(Bytes::from_static(b"xy")).canonical_bytes().as_ref(),
            b"xy"
        );
    }

    #[rstest]
    #[case(Literal::boolean(true), DType::Boolean, LiteralKind::Boolean)]
    #[case(Literal::int32(1), DType::Int32, LiteralKind::Int32)]
    #[case(Literal::int64(1), DType::Int64, LiteralKind::Int64)]
    #[case(Literal::float32(1.0), DType::Float32, LiteralKind::Float32)]
    #[case(Literal::float64(1.0), DType::Float64, LiteralKind::Float64)]
    #[case(Literal::string("a"), DType::String, LiteralKind::String)]
    #[case(Literal::binary(vec![1u8]), DType::Binary, LiteralKind::Binary)]
    #[case(Literal::fixed(vec![1u8, 2, 3]), DType::Fixed(3), LiteralKind::Fixed)]
    #[case(Literal::date(1), DType::Date, LiteralKind::Date)]
    #[case(Literal::time(1), DType::Time, LiteralKind::Time)]
    #[case(Literal::timestamp(1), DType::Timestamp, LiteralKind::Timestamp)]
    #[case(Literal::timestamptz(1), DType::TimestampTz, LiteralKind::TimestampTz)]
    #[case(Literal::uuid(Uuid::nil()), DType::Uuid, LiteralKind::Uuid)]
    fn kinds_and_types(#[case] lit: Literal, #[case] dtype: DType, #[case] kind: LiteralKind) {
        assert_eq!(lit.kind(), kind);
        assert!(lit.is_instance_of(&dtype));
        assert_eq!(lit.dtype(), dtype);
    }

    #[test]
    fn accessors() {
        assert_eq!(Literal::from("x").as_str(), Some("x"));
        assert_eq!(Literal::from(3i64).as_i64(), Some(3));
        assert_eq!(Literal::from(3i32).as_i64(), None);
        assert_eq!(Literal::date(3).as_i32(), None);
        assert_eq!(
            Literal::fixed(vec![9u8]).as_bytes().map(|b| b.to_vec()),
            Some(vec![9])
        );
        assert_eq!(Literal::uuid(Uuid::max()).as_uuid(), Some(Uuid::max()));
    }
}

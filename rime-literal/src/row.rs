use rime_error::rime_panic;

use crate::Literal;

/// A non-null value held in one position of a row: a primitive literal or a nested row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Literal(Literal),
    Struct(Row),
}

impl Value {
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(lit) => Some(lit),
            Self::Struct(_) => None,
        }
    }

    pub fn as_struct(&self) -> Option<&Row> {
        match self {
            Self::Struct(row) => Some(row),
            Self::Literal(_) => None,
        }
    }
}

impl From<Literal> for Value {
    fn from(value: Literal) -> Self {
        Self::Literal(value)
    }
}

impl From<Row> for Value {
    fn from(value: Row) -> Self {
        Self::Struct(value)
    }
}

/// Positional access to the values of one record.
///
/// `None` represents a null. Positions at or past [`StructLike::size`] are a programming error,
/// and implementations panic on them.
///
/// Nested records are always held as [`Value::Struct`] rows, so a custom implementation can only
/// stand in for the outermost record. An [`crate::Accessor`] descends through [`Row`]s below it.
pub trait StructLike {
    /// The number of positions
    fn size(&self) -> usize;

    /// The value at `pos`, or `None` if it is null
    fn get(&self, pos: usize) -> Option<&Value>;

    /// Replace the value at `pos`
    fn set(&mut self, pos: usize, value: Option<Value>);
}

/// An owned, positional record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row(Vec<Option<Value>>);

impl Row {
    pub fn new(values: Vec<Option<Value>>) -> Self {
        Self(values)
    }

    /// A row of `size` nulls
    pub fn with_size(size: usize) -> Self {
        Self(vec![None; size])
    }

    /// A flat row of primitive values
    pub fn from_literals(values: impl IntoIterator<Item = Option<Literal>>) -> Self {
        values
            .into_iter()
            .map(|v| v.map(Value::Literal))
            .collect()
    }

    pub fn values(&self) -> &[Option<Value>] {
        &self.0
    }

    pub fn into_values(self) -> Vec<Option<Value>> {
        self.0
    }
}

impl StructLike for Row {
    fn size(&self) -> usize {
        self.0.len()
    }

    fn get(&self, pos: usize) -> Option<&Value> {
        match self.0.get(pos) {
            Some(value) => value.as_ref(),
            None => rime_panic!(OutOfBounds: pos, 0, self.0.len()),
        }
    }

    fn set(&mut self, pos: usize, value: Option<Value>) {
        let len = self.0.len();
        match self.0.get_mut(pos) {
            Some(slot) => *slot = value,
            None => rime_panic!(OutOfBounds: pos, 0, len),
        }
    }
}

impl FromIterator<Option<Value>> for Row {
    fn from_iter<T: IntoIterator<Item = Option<Value>>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<Option<Value>>> for Row {
    fn from(value: Vec<Option<Value>>) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod test {
    use crate::{Literal, Row, StructLike, Value};

    #[test]
    fn get_and_set() {
        let mut row = Row::from_literals([Some(Literal::from(1i64)), None]);
        assert_eq!(row.size(), 2);
        assert_eq!(row.get(0), Some(&Value::Literal(Literal::int64(1))));
        assert_eq!(row.get(1), None);

        row.set(1, Some(Literal::from("x").into()));
        assert_eq!(
            row.get(1).and_then(Value::as_literal),
            Some(&Literal::from("x"))
        );
        row.set(0, None);
        assert_eq!(row.get(0), None);
    }

    #[test]
    fn nested_rows() {
        let inner = Row::from_literals([Some(Literal::from(1.5f64))]);
        let row = Row::new(vec![Some(Value::from(inner.clone())), None]);
        assert_eq!(row.get(0).and_then(Value::as_struct), Some(&inner));
        assert!(row.get(0).and_then(Value::as_literal).is_none());
        assert_eq!(Row::with_size(2).values(), &[None, None]);
    }

    #[test]
    #[should_panic]
    fn get_out_of_range() {
        Row::with_size(1).get(1);
    }

    #[test]
    #[should_panic]
    fn set_out_of_range() {
        Row::default().set(0, None);
    }
}

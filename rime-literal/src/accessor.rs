use std::fmt::{Display, Formatter};
use std::sync::Arc;

use rime_dtype::{FieldPath, StructType};
use rime_error::{RimeResult, rime_err, rime_panic};

use crate::{Literal, StructLike, Value};

/// Extracts one possibly nested value from a row by position.
///
/// An accessor is a path of positions: the first selects a value of the outer row, each later
/// position selects within the nested row found at the previous step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Accessor {
    positions: Arc<[usize]>,
}

impl Accessor {
    /// Create an accessor from the positions it descends through.
    ///
    /// # Panics
    ///
    /// Panics if `positions` is empty.
    pub fn new(positions: Vec<usize>) -> Self {
        if positions.is_empty() {
            rime_panic!("Accessor must have at least one position");
        }
        Self {
            positions: positions.into(),
        }
    }

    /// Resolve a field path against `schema` into an accessor.
    pub fn try_from_path(schema: &StructType, path: &FieldPath) -> RimeResult<Self> {
        schema.resolve_path(path).map(Self::new)
    }

    /// An accessor for the field with the given id, nested only through structs.
    pub fn for_field_id(schema: &StructType, id: i32) -> RimeResult<Self> {
        schema
            .position_path(id)
            .map(Self::new)
            .ok_or_else(|| rime_err!("No positional path to field id {id} in {schema}"))
    }

    /// The position selected in the outermost row
    pub fn position(&self) -> usize {
        self.positions[0]
    }

    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// The accessor applied to the nested row, if this accessor descends any further
    pub fn inner(&self) -> Option<Accessor> {
        (self.positions.len() > 1).then(|| Self {
            positions: self.positions[1..].into(),
        })
    }

    /// Extract the addressed value from `row`.
    ///
    /// Returns `None` when any value on the way is null. If a non-row value is reached while
    /// positions remain, that value is returned as is. Only the first position is read through
    /// `R`; deeper positions index the nested [`crate::Row`]s.
    pub fn get<'a, R: StructLike + ?Sized>(&self, row: &'a R) -> Option<&'a Value> {
        let (first, rest) = self.positions.split_first()?;
        let mut value = row.get(*first)?;
        for pos in rest {
            match value {
                Value::Struct(inner) => value = inner.get(*pos)?,
                Value::Literal(_) => break,
            }
        }
        Some(value)
    }

    /// Extract the addressed value, if it is a primitive literal.
    pub fn get_literal<'a, R: StructLike + ?Sized>(&self, row: &'a R) -> Option<&'a Literal> {
        self.get(row).and_then(Value::as_literal)
    }
}

fn fmt_positions(positions: &[usize], f: &mut Formatter<'_>) -> std::fmt::Result {
    match positions.split_first() {
        None => write!(f, "None"),
        Some((first, rest)) => {
            write!(f, "Accessor(position={first}, inner=")?;
            fmt_positions(rest, f)?;
            write!(f, ")")
        }
    }
}

impl Display for Accessor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        fmt_positions(&self.positions, f)
    }
}

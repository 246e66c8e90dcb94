//! Selectors naming a column inside a (possibly nested) [`crate::StructType`].
//!
//! Schema paths arrive from callers either as column names or as positions; both resolve to the
//! positional chain an accessor walks.

use std::fmt::{self, Display, Formatter};

use itertools::Itertools;

use crate::FieldName;

/// One step of a [`FieldPath`]: a child column chosen by its name or by its position.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Field {
    /// The child column with this name
    Name(FieldName),
    /// The child column at this position
    Index(usize),
}

impl From<&str> for Field {
    fn from(name: &str) -> Self {
        Self::Name(FieldName::from(name))
    }
}

impl From<FieldName> for Field {
    fn from(name: FieldName) -> Self {
        Self::Name(name)
    }
}

impl From<usize> for Field {
    fn from(pos: usize) -> Self {
        Self::Index(pos)
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "${name}"),
            Self::Index(pos) => write!(f, "[{pos}]"),
        }
    }
}

/// Steps from the table's top-level struct down to one column.
///
/// The empty path names the top-level struct itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldPath(Vec<Field>);

impl FieldPath {
    /// The path naming the top-level struct
    pub fn root() -> Self {
        Self::default()
    }

    /// A single step into a top-level column
    pub fn from_name<F: Into<Field>>(step: F) -> Self {
        Self(vec![step.into()])
    }

    /// A path made only of positional steps
    pub fn from_positions(positions: &[usize]) -> Self {
        positions.iter().map(|&pos| Field::Index(pos)).collect()
    }

    /// The steps of this path, outermost first
    pub fn path(&self) -> &[Field] {
        &self.0
    }

    /// Whether this path has no steps
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Descend one more level
    pub fn push<F: Into<Field>>(&mut self, step: F) {
        self.0.push(step.into());
    }

    /// Everything after the first step; `None` when already at the root.
    pub fn step_into(&self) -> Option<Self> {
        let (_, rest) = self.0.split_first()?;
        Some(Self(rest.to_vec()))
    }
}

impl FromIterator<Field> for FieldPath {
    fn from_iter<I: IntoIterator<Item = Field>>(steps: I) -> Self {
        Self(steps.into_iter().collect())
    }
}

impl From<Field> for FieldPath {
    fn from(step: Field) -> Self {
        Self::from_name(step)
    }
}

impl From<Vec<Field>> for FieldPath {
    fn from(steps: Vec<Field>) -> Self {
        Self(steps)
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().format("."))
    }
}

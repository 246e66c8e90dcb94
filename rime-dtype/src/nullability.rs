use std::fmt::{Display, Formatter};

/// Whether values of a field may be absent.
///
/// The table schema expresses this as a `required` flag on each [`crate::NestedField`]; a
/// required field is [`Nullability::NonNullable`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Nullability {
    /// Every row holds a value
    #[default]
    NonNullable,
    /// Rows may hold no value
    Nullable,
}

impl Nullability {
    /// The nullability implied by a field's `required` flag.
    pub fn from_required(required: bool) -> Self {
        if required {
            Self::NonNullable
        } else {
            Self::Nullable
        }
    }

    /// Whether a field with this nullability must always hold a value.
    pub fn is_required(&self) -> bool {
        matches!(self, Self::NonNullable)
    }
}

impl From<bool> for Nullability {
    fn from(nullable: bool) -> Self {
        if nullable {
            Self::Nullable
        } else {
            Self::NonNullable
        }
    }
}

impl From<Nullability> for bool {
    fn from(value: Nullability) -> Self {
        matches!(value, Nullability::Nullable)
    }
}

impl Display for Nullability {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonNullable => write!(f, "required"),
            Self::Nullable => write!(f, "optional"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Nullability;

    #[test]
    fn required_flag() {
        assert_eq!(Nullability::from_required(true), Nullability::NonNullable);
        assert_eq!(Nullability::from_required(false), Nullability::Nullable);
        assert!(Nullability::NonNullable.is_required());
        assert!(bool::from(Nullability::Nullable));
        assert_eq!(Nullability::from(false).to_string(), "required");
    }
}

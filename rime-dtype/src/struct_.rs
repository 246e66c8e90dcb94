use std::fmt::{Display, Formatter};
use std::sync::Arc;

use itertools::Itertools;
use rime_error::{RimeResult, rime_bail, rime_err};

use crate::{DType, Field, FieldName, FieldPath, Nullability};

/// A named, typed column of a struct, identified by a durable field-id.
///
/// The field-id is stable across renames and reordering and is what schema evolution keys on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NestedField {
    id: i32,
    name: FieldName,
    field_type: DType,
    required: bool,
    doc: Option<Arc<str>>,
}

impl NestedField {
    /// Create a field with an explicit `required` flag
    pub fn new(id: i32, name: impl Into<FieldName>, field_type: DType, required: bool) -> Self {
        Self {
            id,
            name: name.into(),
            field_type,
            required,
            doc: None,
        }
    }

    /// Create a field that must hold a value in every row
    pub fn required(id: i32, name: impl Into<FieldName>, field_type: DType) -> Self {
        Self::new(id, name, field_type, true)
    }

    /// Create a field whose value may be absent
    pub fn optional(id: i32, name: impl Into<FieldName>, field_type: DType) -> Self {
        Self::new(id, name, field_type, false)
    }

    /// Attach documentation to the field
    pub fn with_doc(mut self, doc: impl Into<Arc<str>>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// The durable identity of the field
    #[inline]
    pub fn id(&self) -> i32 {
        self.id
    }

    /// The current name of the field
    #[inline]
    pub fn name(&self) -> &FieldName {
        &self.name
    }

    /// The logical type of the field's values
    #[inline]
    pub fn field_type(&self) -> &DType {
        &self.field_type
    }

    /// Whether every row holds a value for this field
    #[inline]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The nullability implied by the `required` flag
    pub fn nullability(&self) -> Nullability {
        Nullability::from_required(self.required)
    }

    /// Documentation attached to the field, if any
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }
}

impl Display for NestedField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}: {} {}",
            self.id,
            self.name,
            self.nullability(),
            self.field_type
        )?;
        if let Some(doc) = &self.doc {
            write!(f, " ({doc})")?;
        }
        Ok(())
    }
}

/// A struct type is an ordered list of [`NestedField`]s.
///
/// A table schema is itself a struct type; its fields are the table's top-level columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StructType {
    fields: Arc<[NestedField]>,
}

impl StructType {
    /// Create a new [`StructType`] from an ordered list of fields
    pub fn new(fields: Vec<NestedField>) -> Self {
        Self {
            fields: fields.into(),
        }
    }

    /// Create a new [`StructType`], rejecting duplicate field-ids or names among its direct children
    pub fn try_new(fields: Vec<NestedField>) -> RimeResult<Self> {
        if let Some(id) = fields.iter().map(NestedField::id).duplicates().next() {
            rime_bail!("duplicate field id {id} in struct");
        }
        if let Some(name) = fields.iter().map(NestedField::name).duplicates().next() {
            rime_bail!("duplicate field name {name} in struct");
        }
        Ok(Self::new(fields))
    }

    /// The fields of the struct, in declaration order
    pub fn fields(&self) -> &[NestedField] {
        &self.fields
    }

    /// The number of direct child fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the struct has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Get the field at `index`, if any
    pub fn field(&self, index: usize) -> Option<&NestedField> {
        self.fields.get(index)
    }

    /// Find the position of a direct child field by name
    pub fn find_name(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name.as_ref() == name)
    }

    /// Find a direct child field by name
    pub fn field_by_name(&self, name: &str) -> Option<&NestedField> {
        self.find_name(name).map(|idx| &self.fields[idx])
    }

    /// Find a field by id, searching nested structs, lists and maps depth-first
    pub fn find_field_by_id(&self, id: i32) -> Option<&NestedField> {
        self.fields.iter().find_map(|field| {
            if field.id == id {
                return Some(field);
            }
            match &field.field_type {
                DType::Struct(st) => st.find_field_by_id(id),
                DType::List(lt) => lt.find_field_by_id(id),
                DType::Map(mt) => mt.find_field_by_id(id),
                _ => None,
            }
        })
    }

    /// Resolve a single selector against the direct children of this struct
    pub fn resolve_field(&self, field: &Field) -> RimeResult<usize> {
        match field {
            Field::Name(name) => self
                .find_name(name)
                .ok_or_else(|| rime_err!("Unknown field: {name}")),
            Field::Index(index) => {
                if *index >= self.len() {
                    rime_bail!(OutOfBounds: *index, 0, self.len());
                }
                Ok(*index)
            }
        }
    }

    /// Resolve a path of selectors into the positions it addresses at each nesting level.
    ///
    /// Every selector except the last must address a struct-typed field.
    pub fn resolve_path(&self, path: &FieldPath) -> RimeResult<Vec<usize>> {
        let mut positions = Vec::with_capacity(path.path().len());
        let mut current = self;
        let (last, init) = path
            .path()
            .split_last()
            .ok_or_else(|| rime_err!("Cannot resolve the root field path to a column"))?;

        for selector in init {
            let idx = current.resolve_field(selector)?;
            positions.push(idx);
            current = current.fields[idx]
                .field_type
                .as_struct()
                .ok_or_else(|| {
                    rime_err!(
                        "Cannot descend into field {} of type {}",
                        selector,
                        current.fields[idx].field_type
                    )
                })?;
        }
        positions.push(current.resolve_field(last)?);

        Ok(positions)
    }

    /// The positions leading to the field with the given id, descending only through structs.
    ///
    /// Fields nested inside lists or maps have no positional path and yield `None`.
    pub fn position_path(&self, id: i32) -> Option<Vec<usize>> {
        self.fields.iter().enumerate().find_map(|(idx, field)| {
            if field.id == id {
                return Some(vec![idx]);
            }
            let st = field.field_type.as_struct()?;
            let mut inner = st.position_path(id)?;
            inner.insert(0, idx);
            Some(inner)
        })
    }
}

impl FromIterator<NestedField> for StructType {
    fn from_iter<T: IntoIterator<Item = NestedField>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Display for StructType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "struct<{}>", self.fields.iter().format(", "))
    }
}

#[cfg(test)]
mod test {
    use crate::{DType, Field, FieldPath, ListType, NestedField, StructType};

    fn schema() -> StructType {
        StructType::new(vec![
            NestedField::required(1, "id", DType::Int64),
            NestedField::optional(
                2,
                "location",
                DType::Struct(StructType::new(vec![
                    NestedField::required(3, "lat", DType::Float64),
                    NestedField::required(4, "lon", DType::Float64),
                ])),
            ),
            NestedField::optional(
                5,
                "tags",
                DType::List(ListType::new(6, DType::String, false)),
            )
            .with_doc("free-form labels"),
        ])
    }

    #[test]
    fn test_struct() {
        let st = schema();
        assert_eq!(st.len(), 3);
        assert_eq!(st.find_name("location"), Some(1));
        assert_eq!(st.find_name("missing"), None);
        assert_eq!(st.field_by_name("tags").unwrap().doc(), Some("free-form labels"));
        assert!(st.field(0).unwrap().is_required());
        assert!(!st.field(1).unwrap().is_required());
        assert!(st.field(3).is_none());
    }

    #[test]
    fn find_by_id() {
        let st = schema();
        assert_eq!(st.find_field_by_id(4).unwrap().name().as_ref(), "lon");
        assert_eq!(st.find_field_by_id(6).unwrap().name().as_ref(), "element");
        assert!(st.find_field_by_id(42).is_none());
    }

    #[test]
    fn resolve_paths() {
        let st = schema();
        let mut path = FieldPath::from_name("location");
        path.push("lon");
        assert_eq!(st.resolve_path(&path).unwrap(), vec![1, 1]);

        let by_index = FieldPath::from(vec![Field::Index(1), Field::Index(0)]);
        assert_eq!(st.resolve_path(&by_index).unwrap(), vec![1, 0]);

        let mut through_leaf = FieldPath::from_name("id");
        through_leaf.push("x");
        assert!(st.resolve_path(&through_leaf).is_err());

        assert!(st.resolve_path(&FieldPath::from_name("nope")).is_err());
        assert!(st.resolve_path(&FieldPath::from(Field::Index(3))).is_err());
        assert!(st.resolve_path(&FieldPath::root()).is_err());
    }

    #[test]
    fn position_paths() {
        let st = schema();
        assert_eq!(st.position_path(1), Some(vec![0]));
        assert_eq!(st.position_path(3), Some(vec![1, 0]));
        assert_eq!(st.position_path(6), None);
    }

    #[test]
    fn try_new_rejects_duplicates() {
        assert!(
            StructType::try_new(vec![
                NestedField::required(1, "a", DType::Int32),
                NestedField::required(1, "b", DType::Int32),
            ])
            .is_err()
        );
        assert!(
            StructType::try_new(vec![
                NestedField::required(1, "a", DType::Int32),
                NestedField::required(2, "a", DType::Int32),
            ])
            .is_err()
        );
    }
}

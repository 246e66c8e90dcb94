use std::fmt::{Display, Formatter};
use std::sync::Arc;

use crate::{DType, NestedField};

/// A variable-length list whose elements are described by a single nested field.
///
/// The element field carries its own field-id so element values can be tracked through schema
/// evolution like any top-level column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListType {
    element: Arc<NestedField>,
}

impl ListType {
    /// Create a list type whose element field has the given id and type
    pub fn new(element_id: i32, element_type: DType, element_required: bool) -> Self {
        Self {
            element: Arc::new(NestedField::new(
                element_id,
                "element",
                element_type,
                element_required,
            )),
        }
    }

    /// The field describing each element
    pub fn element_field(&self) -> &NestedField {
        &self.element
    }

    pub(crate) fn find_field_by_id(&self, id: i32) -> Option<&NestedField> {
        find_in(&self.element, id)
    }
}

impl Display for ListType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "list<{}>", self.element.field_type())
    }
}

/// A map from keys of one type to values of another.
///
/// Keys are always required; values may be optional.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapType {
    key: Arc<NestedField>,
    value: Arc<NestedField>,
}

impl MapType {
    /// Create a map type from the ids and types of its key and value fields
    pub fn new(
        key_id: i32,
        key_type: DType,
        value_id: i32,
        value_type: DType,
        value_required: bool,
    ) -> Self {
        Self {
            key: Arc::new(NestedField::required(key_id, "key", key_type)),
            value: Arc::new(NestedField::new(
                value_id,
                "value",
                value_type,
                value_required,
            )),
        }
    }

    /// The field describing map keys
    pub fn key_field(&self) -> &NestedField {
        &self.key
    }

    /// The field describing map values
    pub fn value_field(&self) -> &NestedField {
        &self.value
    }

    pub(crate) fn find_field_by_id(&self, id: i32) -> Option<&NestedField> {
        find_in(&self.key, id).or_else(|| find_in(&self.value, id))
    }
}

impl Display for MapType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "map<{}, {}>",
            self.key.field_type(),
            self.value.field_type()
        )
    }
}

fn find_in(field: &NestedField, id: i32) -> Option<&NestedField> {
    if field.id() == id {
        return Some(field);
    }
    match field.field_type() {
        DType::Struct(st) => st.find_field_by_id(id),
        DType::List(lt) => lt.find_field_by_id(id),
        DType::Map(mt) => mt.find_field_by_id(id),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::{DType, ListType, MapType, NestedField, StructType};

    #[test]
    fn nested_ids() {
        let map = MapType::new(
            10,
            DType::String,
            11,
            DType::Struct(StructType::new(vec![NestedField::required(
                12,
                "count",
                DType::Int64,
            )])),
            false,
        );
        assert!(map.key_field().is_required());
        assert!(!map.value_field().is_required());
        assert_eq!(map.find_field_by_id(12).unwrap().name().as_ref(), "count");

        let list = ListType::new(20, DType::Map(map), true);
        assert_eq!(list.find_field_by_id(11).unwrap().name().as_ref(), "value");
        assert!(list.find_field_by_id(99).is_none());
    }
}

//! Sort Engine: stable reordering of merged items by a logical field.
//!
//! Keys are compared as plain strings, so numeric identifiers of different widths
//! order lexicographically ("10" before "2"). Items without the field sort as the
//! empty string.

use crate::errors::{AggregationError, Result};
use crate::node::{Node, ResponseKind};
use crate::shape::{FieldRef, ShapeDescriptor};

/// Requested ordering of the merged items.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortSpec {
    /// Logical field name, such as `ProcessId`.
    pub field: String,
    pub ascending: bool,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, ascending: bool) -> Self {
        SortSpec {
            field: field.into(),
            ascending,
        }
    }
}

fn field_key(item: &Node, field: &FieldRef, max_depth: usize) -> Option<String> {
    match field {
        FieldRef::Child(tag) => item
            .find_descendant(tag, max_depth)
            .map(Node::text_value),
        FieldRef::Attribute(name) => item.attributes.get(name).cloned(),
    }
}

/// Extracts one sort key per item.
fn sort_keys(items: &[Node], field: &str, shape: &ShapeDescriptor) -> Result<Vec<String>> {
    if let Some(field_ref) = shape.resolve_field(field) {
        let max_depth = shape.format.field_search_depth();
        let keys: Vec<Option<String>> = items
            .iter()
            .map(|item| field_key(item, field_ref, max_depth))
            .collect();

        let missing = keys.iter().filter(|key| key.is_none()).count();
        if missing > 0 {
            tracing::warn!(field, missing, "Items without sort field sort as empty");
        }
        return Ok(keys.into_iter().map(Option::unwrap_or_default).collect());
    }

    // Bare lists of scalars sort by their own value
    if shape.kind == ResponseKind::RawList && items.iter().all(Node::is_scalar) {
        return Ok(items.iter().map(Node::text_value).collect());
    }

    Err(AggregationError::UnknownSortField {
        field: field.to_string(),
        kind: shape.kind,
    })
}

/// Stably sorts `items` by `field`. Descending order flips the comparator only, so
/// equal keys keep their merge order in both directions.
pub fn sort(
    items: Vec<Node>,
    field: &str,
    ascending: bool,
    shape: &ShapeDescriptor,
) -> Result<Vec<Node>> {
    let keys = sort_keys(&items, field, shape)?;
    let mut keyed: Vec<(String, Node)> = keys.into_iter().zip(items).collect();

    keyed.sort_by(|(a, _), (b, _)| if ascending { a.cmp(b) } else { b.cmp(a) });

    Ok(keyed.into_iter().map(|(_, item)| item).collect())
}

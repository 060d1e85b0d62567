//! Merge Engine: unions the items of several documents of one kind.
//!
//! Items are concatenated in input order with no deduplication, since every backend
//! owns disjoint data. The envelope (root, wrapper levels, attributes, declaration)
//! is taken from the first document that contributes items, or the first document
//! when all of them are empty.

use crate::node::{Node, ResponseDocument};
use crate::shape::ShapeDescriptor;

/// Envelope plus the merged item sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct MergedResult {
    /// Document whose wrapper has been emptied of items.
    pub envelope: ResponseDocument,
    pub items: Vec<Node>,
    /// Position in the envelope wrapper where items go back on rebuild. `None`
    /// appends after the wrapper's other children.
    pub insert_at: Option<usize>,
}

impl MergedResult {
    /// Rebuilds one document from the envelope and the current items.
    pub fn into_document(self, shape: &ShapeDescriptor) -> ResponseDocument {
        let MergedResult {
            mut envelope,
            items,
            insert_at,
        } = self;

        let wrapper = shape.ensure_wrapper(&mut envelope.root);
        let at = insert_at
            .unwrap_or(wrapper.children.len())
            .min(wrapper.children.len());
        wrapper.children.splice(at..at, items);

        envelope.kind = shape.kind;
        envelope
    }
}

/// Moves the items out of `wrapper`, returning them with the index of the first one
/// among the remaining children.
fn take_items(wrapper: &mut Node, shape: &ShapeDescriptor) -> (Vec<Node>, Option<usize>) {
    let mut items = Vec::new();
    let mut kept = Vec::new();
    let mut first = None;

    for child in std::mem::take(&mut wrapper.children) {
        if shape.is_item(&child) {
            first.get_or_insert(kept.len());
            items.push(child);
        } else {
            kept.push(child);
        }
    }

    wrapper.children = kept;
    (items, first)
}

/// Merges `docs` under `shape`. Returns `None` when there is nothing to merge.
///
/// Documents without the wrapper path contribute no items and never fail.
pub fn merge(docs: Vec<ResponseDocument>, shape: &ShapeDescriptor) -> Option<MergedResult> {
    let mut items = Vec::new();
    let mut envelope: Option<(ResponseDocument, Option<usize>)> = None;
    let mut fallback: Option<ResponseDocument> = None;

    for mut doc in docs {
        let (taken, first) = match shape.wrapper_mut(&mut doc.root) {
            Some(wrapper) => take_items(wrapper, shape),
            None => (Vec::new(), None),
        };

        if envelope.is_none() && !taken.is_empty() {
            envelope = Some((doc, first));
        } else if fallback.is_none() {
            fallback = Some(doc);
        }
        items.extend(taken);
    }

    let (envelope, insert_at) = match envelope {
        Some(found) => found,
        None => (fallback?, None),
    };

    Some(MergedResult {
        envelope,
        items,
        insert_at,
    })
}

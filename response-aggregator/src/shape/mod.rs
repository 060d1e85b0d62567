//! Shape Registry: where the repeating items of each response kind live.
//!
//! A [`ShapeDescriptor`] is declared per (kind, wire format) pair. Detection matches a
//! document's root tag and envelope path against the table; documents that match
//! nothing but are bare lists resolve to [`ResponseKind::RawList`].

mod builtin;

use crate::config::{AggregatorConfig, RawListRoot};
use crate::errors::{AggregationError, Result};
use crate::node::{Node, NodeKind, ResponseDocument, ResponseKind, WireFormat};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Where a logical sort field lives inside an item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRef {
    /// Child element or JSON key.
    Child(String),
    /// XML attribute on the item itself.
    Attribute(String),
}

impl FieldRef {
    pub fn child(tag: impl Into<String>) -> Self {
        FieldRef::Child(tag.into())
    }

    pub fn attribute(name: impl Into<String>) -> Self {
        FieldRef::Attribute(name.into())
    }
}

/// Describes one response kind under one wire format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeDescriptor {
    pub kind: ResponseKind,
    pub format: WireFormat,
    /// Root element tag. Only XML roots have one.
    #[serde(default)]
    pub root_tag: Option<String>,
    /// Path below the root that must exist for a document to match.
    /// Defaults to `wrapper_path`.
    #[serde(default)]
    pub signature: Option<Vec<String>>,
    /// Path from the root to the node whose children are the items. Empty means the
    /// root itself is the wrapper.
    #[serde(default)]
    pub wrapper_path: Vec<String>,
    /// Tag of each item. `None` makes every child of the wrapper an item.
    #[serde(default)]
    pub item_tag: Option<String>,
    /// Logical sort-field name to serialized field, written `{child: id}` or
    /// `{attribute: id}` in configuration.
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub sort_fields: IndexMap<String, FieldRef>,
}

impl ShapeDescriptor {
    pub fn new(kind: ResponseKind, format: WireFormat) -> Self {
        ShapeDescriptor {
            kind,
            format,
            root_tag: None,
            signature: None,
            wrapper_path: Vec::new(),
            item_tag: None,
            sort_fields: IndexMap::new(),
        }
    }

    /// Descriptor for a bare list document: every child of the root is an item.
    pub fn raw_list(format: WireFormat, root_tag: Option<String>) -> Self {
        ShapeDescriptor {
            root_tag,
            ..ShapeDescriptor::new(ResponseKind::RawList, format)
        }
    }

    pub fn root(mut self, tag: &str) -> Self {
        self.root_tag = Some(tag.to_string());
        self
    }

    pub fn signature(mut self, path: &[&str]) -> Self {
        self.signature = Some(path.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn with_wrapper(mut self, path: &[&str]) -> Self {
        self.wrapper_path = path.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn item(mut self, tag: &str) -> Self {
        self.item_tag = Some(tag.to_string());
        self
    }

    pub fn field(mut self, logical: &str, field: FieldRef) -> Self {
        self.sort_fields.insert(logical.to_string(), field);
        self
    }

    pub fn signature_path(&self) -> &[String] {
        self.signature.as_deref().unwrap_or(&self.wrapper_path)
    }

    /// Whether `root` carries this descriptor's envelope.
    pub fn matches(&self, root: &Node) -> bool {
        let root_matches = match &self.root_tag {
            Some(tag) => root.tag == *tag,
            None => root.kind == NodeKind::Object,
        };
        root_matches && root.find_path(self.signature_path()).is_some()
    }

    pub fn is_item(&self, node: &Node) -> bool {
        if node.is_text_segment() {
            return false;
        }
        match &self.item_tag {
            Some(tag) => node.tag == *tag,
            None => true,
        }
    }

    pub fn resolve_field(&self, logical: &str) -> Option<&FieldRef> {
        self.sort_fields.get(logical)
    }

    pub fn wrapper<'a>(&self, root: &'a Node) -> Option<&'a Node> {
        root.find_path(&self.wrapper_path)
    }

    pub fn wrapper_mut<'a>(&self, root: &'a mut Node) -> Option<&'a mut Node> {
        root.find_path_mut(&self.wrapper_path)
    }

    /// Returns the wrapper node of `root`, creating any missing levels on the way.
    ///
    /// Synthesized levels are objects, except the last level of a JSON path which is
    /// the item array.
    pub fn ensure_wrapper<'a>(&self, root: &'a mut Node) -> &'a mut Node {
        let mut node = root;
        let depth = self.wrapper_path.len();

        for (level, segment) in self.wrapper_path.iter().enumerate() {
            let is_last = level + 1 == depth;
            let position = match node.children.iter().position(|child| child.tag == *segment) {
                Some(position) => position,
                None => {
                    let synthesized = if is_last && self.format == WireFormat::Json {
                        Node::array(segment.as_str())
                    } else {
                        Node::object(segment.as_str())
                    };
                    node.children.push(synthesized);
                    node.children.len() - 1
                }
            };
            node = &mut node.children[position];
        }

        // `"processes": null` or a text-only element becomes a container again
        if node.is_scalar() {
            node.text = None;
            node.kind = match self.format {
                WireFormat::Json if depth > 0 => NodeKind::Array,
                _ => NodeKind::Object,
            };
        }
        node
    }

    /// Items of `root`, in document order. A document without the wrapper has none.
    pub fn items<'a>(&self, root: &'a Node) -> impl Iterator<Item = &'a Node> + 'a {
        let item_tag = self.item_tag.clone();
        self.wrapper(root)
            .into_iter()
            .flat_map(|wrapper| wrapper.children.iter())
            .filter(move |child| {
                !child.is_text_segment()
                    && item_tag.as_deref().is_none_or(|tag| child.tag == tag)
            })
    }
}

/// Table of known shapes, immutable once built.
#[derive(Clone, Debug)]
pub struct ShapeRegistry {
    shapes: Vec<ShapeDescriptor>,
    raw_list_roots: Vec<RawListRoot>,
}

impl ShapeRegistry {
    /// Registry holding only the built-in shapes.
    pub fn builtin() -> Self {
        Self::from_config(&AggregatorConfig::default())
    }

    /// Builds the registry from configuration.
    ///
    /// Configured shapes come first so they win detection, and a configured shape
    /// replaces the built-in one for the same (kind, format).
    pub fn from_config(config: &AggregatorConfig) -> Self {
        let mut shapes = config.shapes.clone();
        let mut raw_list_roots = config.raw_list_roots.clone();

        if config.builtin_shapes {
            for shape in builtin::shapes() {
                let overridden = shapes
                    .iter()
                    .any(|s| s.kind == shape.kind && s.format == shape.format);
                if !overridden {
                    shapes.push(shape);
                }
            }
            raw_list_roots.extend(builtin::raw_list_roots());
        }

        ShapeRegistry {
            shapes,
            raw_list_roots,
        }
    }

    pub fn descriptors(&self, format: WireFormat) -> impl Iterator<Item = &ShapeDescriptor> {
        self.shapes.iter().filter(move |shape| shape.format == format)
    }

    pub fn get(&self, kind: ResponseKind, format: WireFormat) -> Option<&ShapeDescriptor> {
        self.descriptors(format).find(|shape| shape.kind == kind)
    }

    fn is_raw_list_root(&self, root: &Node, format: WireFormat) -> bool {
        match format {
            WireFormat::Json => root.kind == NodeKind::Array,
            WireFormat::RestXml | WireFormat::ClassXml => self
                .raw_list_roots
                .iter()
                .any(|entry| entry.format == format && entry.root == root.tag),
        }
    }

    /// Matches `root` against the table without failing.
    pub fn detect(&self, root: &Node, format: WireFormat) -> Option<ShapeDescriptor> {
        if let Some(shape) = self.descriptors(format).find(|shape| shape.matches(root)) {
            return Some(shape.clone());
        }

        if self.is_raw_list_root(root, format) {
            let root_tag = format.is_xml().then(|| root.tag.clone());
            return Some(ShapeDescriptor::raw_list(format, root_tag));
        }

        None
    }

    /// Resolves the shape of `doc`, failing when it is neither a known kind nor a list.
    pub fn resolve(&self, doc: &ResponseDocument) -> Result<ShapeDescriptor> {
        self.detect(&doc.root, doc.format)
            .ok_or_else(|| unrecognized_shape(doc))
    }
}

pub(crate) fn unrecognized_shape(doc: &ResponseDocument) -> AggregationError {
    let described = match doc.root.kind {
        NodeKind::Object if doc.format == WireFormat::Json => {
            let keys: Vec<&str> = doc.root.children.iter().map(|c| c.tag.as_str()).collect();
            format!("json object with keys {keys:?}")
        }
        _ => format!("<{}>", doc.root.tag),
    };
    AggregationError::UnrecognizedShape(described)
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

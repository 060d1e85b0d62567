//! Format-neutral document model.
//!
//! REST-XML, JSON and class-qualified XML responses are all parsed into the same
//! [`Node`] tree so that merging, sorting and paging are written once. Adapters in
//! [`crate::formats`] only translate between raw text and this model.

use http::HeaderMap;
use http::header::CONTENT_TYPE;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Tag given to text segments of mixed XML content.
pub const TEXT_TAG: &str = "#text";

/// Header carrying the marshaller used by the backend for a request.
pub const KIE_CONTENT_TYPE_HEADER: &str = "x-kie-contenttype";

/// Serialization convention shared by every document of one aggregation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireFormat {
    RestXml,
    Json,
    ClassXml,
}

impl WireFormat {
    pub const fn as_str(&self) -> &'static str {
        match self {
            WireFormat::RestXml => "rest_xml",
            WireFormat::Json => "json",
            WireFormat::ClassXml => "class_xml",
        }
    }

    pub const fn content_type(&self) -> &'static str {
        match self {
            WireFormat::Json => "application/json",
            WireFormat::RestXml | WireFormat::ClassXml => "application/xml",
        }
    }

    pub const fn is_xml(&self) -> bool {
        matches!(self, WireFormat::RestXml | WireFormat::ClassXml)
    }

    /// How deep below an item the sort engine looks for a field.
    pub const fn field_search_depth(&self) -> usize {
        match self {
            WireFormat::RestXml | WireFormat::Json => 2,
            WireFormat::ClassXml => 1,
        }
    }

    /// Picks a format from a negotiated content type such as `application/json; charset=utf-8`.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if essence.ends_with("/json") || essence.ends_with("+json") {
            Some(WireFormat::Json)
        } else if essence.ends_with("/xml") || essence.ends_with("+xml") {
            Some(WireFormat::RestXml)
        } else {
            None
        }
    }

    /// Picks a format from response headers.
    ///
    /// The marshaller hint header wins over `Content-Type`, since class-qualified XML
    /// and REST-XML share the same content type.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let hint = headers
            .get(KIE_CONTENT_TYPE_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim().to_ascii_uppercase());

        match hint.as_deref() {
            Some("XSTREAM") => return Some(WireFormat::ClassXml),
            Some("JAXB") => return Some(WireFormat::RestXml),
            Some("JSON") => return Some(WireFormat::Json),
            _ => {}
        }

        headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(Self::from_content_type)
    }
}

/// Logical resource type of a list response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    ProcessDefinitions,
    ProcessInstances,
    TaskSummaries,
    Containers,
    RawList,
    Unknown,
}

impl ResponseKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ResponseKind::ProcessDefinitions => "process_definitions",
            ResponseKind::ProcessInstances => "process_instances",
            ResponseKind::TaskSummaries => "task_summaries",
            ResponseKind::Containers => "containers",
            ResponseKind::RawList => "raw_list",
            ResponseKind::Unknown => "unknown",
        }
    }
}

/// JSON type of a scalar, kept so numbers and booleans are not re-emitted as strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarType {
    Text,
    Number,
    Boolean,
    Null,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Object,
    Array,
    Scalar(ScalarType),
}

/// Universal tree element.
///
/// For XML, `tag` is the element name and `attributes` its attributes in document
/// order. For JSON, object members carry their key as `tag` and array members an
/// empty tag.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub tag: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Node>,
    pub text: Option<String>,
    pub kind: NodeKind,
}

impl Node {
    pub fn object(tag: impl Into<String>) -> Self {
        Node {
            tag: tag.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
            text: None,
            kind: NodeKind::Object,
        }
    }

    pub fn array(tag: impl Into<String>) -> Self {
        Node {
            kind: NodeKind::Array,
            ..Node::object(tag)
        }
    }

    pub fn scalar(
        tag: impl Into<String>,
        text: impl Into<String>,
        scalar_type: ScalarType,
    ) -> Self {
        Node {
            text: Some(text.into()),
            kind: NodeKind::Scalar(scalar_type),
            ..Node::object(tag)
        }
    }

    /// Leaf with textual content, the common case for XML fields.
    pub fn leaf(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Node::scalar(tag, text, ScalarType::Text)
    }

    pub fn null(tag: impl Into<String>) -> Self {
        Node {
            kind: NodeKind::Scalar(ScalarType::Null),
            ..Node::object(tag)
        }
    }

    /// Text segment of mixed XML content.
    pub fn text_segment(text: impl Into<String>) -> Self {
        Node::leaf(TEXT_TAG, text)
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.kind, NodeKind::Scalar(_))
    }

    pub fn is_text_segment(&self) -> bool {
        self.tag == TEXT_TAG && self.is_scalar()
    }

    /// True for a node with neither children nor text, such as `{}` or `<list/>`.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.text.is_none()
    }

    pub fn child(&self, tag: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.tag == tag)
    }

    pub fn child_mut(&mut self, tag: &str) -> Option<&mut Node> {
        self.children.iter_mut().find(|child| child.tag == tag)
    }

    /// Follows `path` through child tags, starting below `self`.
    pub fn find_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&Node> {
        path.iter()
            .try_fold(self, |node, segment| node.child(segment.as_ref()))
    }

    pub fn find_path_mut<S: AsRef<str>>(&mut self, path: &[S]) -> Option<&mut Node> {
        let mut node = self;
        for segment in path {
            node = node.child_mut(segment.as_ref())?;
        }
        Some(node)
    }

    /// Breadth-first lookup of the shallowest descendant tagged `tag`, at most
    /// `max_depth` levels below `self`.
    pub fn find_descendant(&self, tag: &str, max_depth: usize) -> Option<&Node> {
        let mut queue: VecDeque<(&Node, usize)> =
            self.children.iter().map(|child| (child, 1)).collect();

        while let Some((node, depth)) = queue.pop_front() {
            if node.tag == tag && !node.is_text_segment() {
                return Some(node);
            }
            if depth < max_depth {
                queue.extend(node.children.iter().map(|child| (child, depth + 1)));
            }
        }
        None
    }

    /// Textual value of the node: its own text, or the concatenated text segments of
    /// mixed content. Null scalars and pure containers yield an empty string.
    pub fn text_value(&self) -> String {
        match &self.text {
            Some(text) => text.clone(),
            None => self
                .children
                .iter()
                .filter(|child| child.is_text_segment())
                .filter_map(|child| child.text.as_deref())
                .collect(),
        }
    }
}

/// Prolog of an XML document, re-emitted on serialization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlDeclaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

impl Default for XmlDeclaration {
    fn default() -> Self {
        XmlDeclaration {
            version: "1.0".to_string(),
            encoding: Some("UTF-8".to_string()),
            standalone: None,
        }
    }
}

/// A parsed backend response, alive for the duration of one aggregation.
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseDocument {
    pub root: Node,
    pub kind: ResponseKind,
    pub format: WireFormat,
    pub declaration: Option<XmlDeclaration>,
}

impl ResponseDocument {
    pub fn new(root: Node, format: WireFormat) -> Self {
        ResponseDocument {
            root,
            kind: ResponseKind::Unknown,
            format,
            declaration: None,
        }
    }

    pub fn with_declaration(mut self, declaration: Option<XmlDeclaration>) -> Self {
        self.declaration = declaration;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn process(id: &str) -> Node {
        Node::object("processes")
            .with_child(Node::leaf("process-id", id))
            .with_child(
                Node::object("associated-entities").with_child(Node::leaf("owner", "john")),
            )
    }

    #[test]
    fn test_find_path() {
        let root = Node::object("response").with_child(Node::object("result").with_child(
            Node::object("kie-containers").with_child(Node::array("kie-container")),
        ));

        let found = root
            .find_path(&["result", "kie-containers", "kie-container"])
            .unwrap();
        assert_eq!(found.kind, NodeKind::Array);
        assert!(root.find_path(&["result", "missing"]).is_none());
        assert_eq!(root.find_path::<&str>(&[]).unwrap().tag, "response");
    }

    #[test]
    fn test_find_descendant_prefers_shallowest() {
        let item = process("evaluation")
            .with_child(Node::object("nested").with_child(Node::leaf("owner", "mary")));

        assert_eq!(item.find_descendant("process-id", 1).unwrap().text_value(), "evaluation");
        assert!(item.find_descendant("owner", 1).is_none());
        assert_eq!(item.find_descendant("owner", 2).unwrap().text_value(), "john");
    }

    #[test]
    fn test_text_value_of_mixed_content() {
        let node = Node::object("description")
            .with_child(Node::text_segment("hello "))
            .with_child(Node::object("b"))
            .with_child(Node::text_segment("world"));
        assert_eq!(node.text_value(), "hello world");
        assert_eq!(Node::null("x").text_value(), "");
    }

    #[test]
    fn test_is_empty() {
        assert!(Node::object("process-definitions").is_empty());
        assert!(!process("a").is_empty());
        assert!(!Node::leaf("a", "").is_empty());
    }

    #[test]
    fn test_format_from_content_type() {
        assert_eq!(
            WireFormat::from_content_type("application/json; charset=UTF-8"),
            Some(WireFormat::Json)
        );
        assert_eq!(
            WireFormat::from_content_type("application/xml"),
            Some(WireFormat::RestXml)
        );
        assert_eq!(WireFormat::from_content_type("text/plain"), None);
    }

    #[test]
    fn test_format_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/xml"));
        assert_eq!(WireFormat::from_headers(&headers), Some(WireFormat::RestXml));

        headers.insert(KIE_CONTENT_TYPE_HEADER, HeaderValue::from_static("xstream"));
        assert_eq!(WireFormat::from_headers(&headers), Some(WireFormat::ClassXml));

        let mut headers = HeaderMap::new();
        headers.insert(KIE_CONTENT_TYPE_HEADER, HeaderValue::from_static("JSON"));
        assert_eq!(WireFormat::from_headers(&headers), Some(WireFormat::Json));

        assert_eq!(WireFormat::from_headers(&HeaderMap::new()), None);
    }
}

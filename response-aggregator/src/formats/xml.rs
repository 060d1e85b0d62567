//! XML codec shared by the REST-XML and class-qualified XML adapters.
//!
//! Builds the node tree with quick-xml's streaming reader and emits it with the
//! indenting writer. Whitespace-only text between elements is dropped. Leaf text,
//! whitespace included, is kept as-is, and mixed content keeps its text segments
//! in order.

use std::borrow::Cow;
use std::io::Write;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::ParseError;
use crate::errors::{AggregationError, Result};
use crate::node::{Node, NodeKind, ScalarType, XmlDeclaration};

/// Translates element names between their wire and in-memory form.
pub(super) trait TagCodec {
    fn decode<'a>(&self, wire: &'a str) -> Result<Cow<'a, str>, ParseError>;
    fn encode<'a>(&self, tag: &'a str) -> Cow<'a, str>;
}

/// Element names are used verbatim.
pub(super) struct PlainTags;

impl TagCodec for PlainTags {
    fn decode<'a>(&self, wire: &'a str) -> Result<Cow<'a, str>, ParseError> {
        Ok(Cow::Borrowed(wire))
    }

    fn encode<'a>(&self, tag: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(tag)
    }
}

pub(super) struct ParsedXml {
    pub root: Node,
    pub declaration: Option<XmlDeclaration>,
}

pub(super) fn parse(raw: &str, tags: &impl TagCodec) -> Result<ParsedXml, ParseError> {
    let mut reader = Reader::from_str(raw);
    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;
    let mut declaration = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ParseError(format!("{e} at position {}", reader.error_position())))?;

        match event {
            Event::Decl(decl) => declaration = Some(read_declaration(&decl)?),
            Event::Start(start) => stack.push(read_element(&start, tags)?),
            Event::Empty(start) => {
                let node = read_element(&start, tags)?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| ParseError::new("unexpected closing tag"))?;
                attach(&mut stack, &mut root, finish_element(node))?;
            }
            Event::Text(text) => {
                let raw_text = std::str::from_utf8(&text).map_err(ParseError::new)?;
                let text = unescape(raw_text).map_err(ParseError::new)?;
                push_text(&mut stack, &text)?;
            }
            Event::CData(data) => {
                let text = std::str::from_utf8(&data).map_err(ParseError::new)?;
                push_text(&mut stack, text)?;
            }
            Event::GeneralRef(reference) => {
                let resolved = match reference.resolve_char_ref().map_err(ParseError::new)? {
                    Some(ch) => ch.to_string(),
                    None => {
                        let name = reference.decode().map_err(ParseError::new)?;
                        resolve_predefined_entity(&name)
                            .ok_or_else(|| ParseError(format!("unknown entity &{name};")))?
                            .to_string()
                    }
                };
                push_text(&mut stack, &resolved)?;
            }
            Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if let Some(open) = stack.last() {
        return Err(ParseError(format!("unclosed element <{}>", open.tag)));
    }

    let root = root.ok_or_else(|| ParseError::new("document has no root element"))?;
    Ok(ParsedXml { root, declaration })
}

fn read_declaration(decl: &BytesDecl<'_>) -> Result<XmlDeclaration, ParseError> {
    let version = decl.version().map_err(ParseError::new)?;
    let encoding = decl.encoding().transpose().map_err(ParseError::new)?;
    let standalone = decl.standalone().transpose().map_err(ParseError::new)?;

    Ok(XmlDeclaration {
        version: String::from_utf8_lossy(&version).into_owned(),
        encoding: encoding.map(|value| String::from_utf8_lossy(&value).into_owned()),
        standalone: standalone.map(|value| String::from_utf8_lossy(&value).into_owned()),
    })
}

fn read_element(start: &BytesStart<'_>, tags: &impl TagCodec) -> Result<Node, ParseError> {
    let qname = start.name();
    let name = std::str::from_utf8(qname.as_ref()).map_err(ParseError::new)?;
    let mut node = Node::object(tags.decode(name)?);

    for attribute in start.attributes() {
        let attribute = attribute.map_err(ParseError::new)?;
        let key = std::str::from_utf8(attribute.key.as_ref()).map_err(ParseError::new)?;
        let value = attribute.unescape_value().map_err(ParseError::new)?;
        node.attributes.insert(key.to_string(), value.into_owned());
    }

    Ok(node)
}

/// Appends text to the innermost open element, coalescing with a preceding segment.
fn push_text(stack: &mut [Node], text: &str) -> Result<(), ParseError> {
    let Some(parent) = stack.last_mut() else {
        if text.trim().is_empty() {
            return Ok(());
        }
        return Err(ParseError::new("text outside of the root element"));
    };

    match parent.children.last_mut() {
        Some(last) if last.is_text_segment() => {
            last.text.get_or_insert_with(String::new).push_str(text);
        }
        _ => parent.children.push(Node::text_segment(text)),
    }
    Ok(())
}

/// Collapses an element's text segments once its end tag is seen.
fn finish_element(mut node: Node) -> Node {
    let has_elements = node.children.iter().any(|child| !child.is_text_segment());

    if has_elements {
        node.children.retain(|child| {
            !child.is_text_segment() || child.text.as_deref().is_some_and(|t| !t.trim().is_empty())
        });
        return node;
    }

    let text: String = node
        .children
        .drain(..)
        .filter_map(|segment| segment.text)
        .collect();
    if !text.is_empty() {
        node.text = Some(text);
        node.kind = NodeKind::Scalar(ScalarType::Text);
    }
    node
}

fn attach(stack: &mut [Node], root: &mut Option<Node>, node: Node) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_none() => *root = Some(node),
        None => return Err(ParseError::new("multiple root elements")),
    }
    Ok(())
}

pub(super) fn write(
    root: &Node,
    declaration: Option<&XmlDeclaration>,
    tags: &impl TagCodec,
) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    if let Some(decl) = declaration {
        let event = BytesDecl::new(
            &decl.version,
            decl.encoding.as_deref(),
            decl.standalone.as_deref(),
        );
        writer
            .write_event(Event::Decl(event))
            .map_err(serialization_error)?;
    }

    write_node(&mut writer, root, tags)?;

    String::from_utf8(writer.into_inner()).map_err(serialization_error)
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &Node, tags: &impl TagCodec) -> Result<()> {
    if node.is_text_segment() {
        let text = node.text.as_deref().unwrap_or_default();
        return writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(serialization_error);
    }

    let name = tags.encode(&node.tag);
    let mut start = BytesStart::new(&*name);
    for (key, value) in &node.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if node.text.is_none() && node.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(serialization_error);
    }

    writer
        .write_event(Event::Start(start))
        .map_err(serialization_error)?;
    if let Some(text) = &node.text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(serialization_error)?;
    }
    for child in &node.children {
        write_node(writer, child, tags)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(&*name)))
        .map_err(serialization_error)
}

fn serialization_error(e: impl ToString) -> AggregationError {
    AggregationError::Serialization(e.to_string())
}

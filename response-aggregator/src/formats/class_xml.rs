use std::borrow::Cow;

use super::xml::{self, TagCodec};
use super::{FormatAdapter, ParseError};
use crate::errors::Result;
use crate::node::{ResponseDocument, WireFormat};

/// Class-qualified XML: element names are fully-qualified type names written with
/// the marshaller's name escaping, `$` as `_-` and `_` as `__`. An underscore that
/// starts neither pair cannot be written back unchanged and is rejected.
pub struct ClassXmlAdapter;

struct ClassNameTags;

impl TagCodec for ClassNameTags {
    fn decode<'a>(&self, wire: &'a str) -> Result<Cow<'a, str>, ParseError> {
        if !wire.contains('_') {
            return Ok(Cow::Borrowed(wire));
        }

        let mut decoded = String::with_capacity(wire.len());
        let mut chars = wire.chars();
        while let Some(c) = chars.next() {
            if c != '_' {
                decoded.push(c);
                continue;
            }
            // Every underscore on the wire starts an escape pair
            match chars.next() {
                Some('_') => decoded.push('_'),
                Some('-') => decoded.push('$'),
                _ => {
                    return Err(ParseError(format!(
                        "unescaped underscore in element name <{wire}>"
                    )));
                }
            }
        }
        Ok(Cow::Owned(decoded))
    }

    fn encode<'a>(&self, tag: &'a str) -> Cow<'a, str> {
        if !tag.contains(['_', '$']) {
            return Cow::Borrowed(tag);
        }

        let mut encoded = String::with_capacity(tag.len() + 4);
        for c in tag.chars() {
            match c {
                '_' => encoded.push_str("__"),
                '$' => encoded.push_str("_-"),
                _ => encoded.push(c),
            }
        }
        Cow::Owned(encoded)
    }
}

impl FormatAdapter for ClassXmlAdapter {
    fn format(&self) -> WireFormat {
        WireFormat::ClassXml
    }

    fn parse(&self, raw: &str) -> Result<ResponseDocument, ParseError> {
        let parsed = xml::parse(raw, &ClassNameTags)?;
        Ok(ResponseDocument::new(parsed.root, WireFormat::ClassXml)
            .with_declaration(parsed.declaration))
    }

    fn serialize(&self, doc: &ResponseDocument) -> Result<String> {
        xml::write(&doc.root, doc.declaration.as_ref(), &ClassNameTags)
    }
}

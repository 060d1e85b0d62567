use super::xml::{self, PlainTags};
use super::{FormatAdapter, ParseError};
use crate::errors::Result;
use crate::node::{ResponseDocument, WireFormat};

/// REST resource XML: resource-specific element names, namespaces and attributes
/// carried through unchanged.
pub struct RestXmlAdapter;

impl FormatAdapter for RestXmlAdapter {
    fn format(&self) -> WireFormat {
        WireFormat::RestXml
    }

    fn parse(&self, raw: &str) -> Result<ResponseDocument, ParseError> {
        let parsed = xml::parse(raw, &PlainTags)?;
        Ok(ResponseDocument::new(parsed.root, WireFormat::RestXml)
            .with_declaration(parsed.declaration))
    }

    fn serialize(&self, doc: &ResponseDocument) -> Result<String> {
        xml::write(&doc.root, doc.declaration.as_ref(), &PlainTags)
    }
}

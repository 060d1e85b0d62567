//! Format adapters: raw text to [`ResponseDocument`] and back.
//!
//! One adapter exists per wire convention. They only translate between text and the
//! neutral node model; merging, sorting and paging never look at the wire format
//! beyond what the shape descriptor tells them.

mod class_xml;
mod json;
mod rest_xml;
mod xml;

pub use class_xml::ClassXmlAdapter;
pub use json::JsonAdapter;
pub use rest_xml::RestXmlAdapter;

use crate::errors::Result;
use crate::node::{ResponseDocument, WireFormat};
use thiserror::Error;

/// A raw document that is not well-formed for the adapter's convention.
#[derive(Error, Debug, PartialEq)]
#[error("{0}")]
pub struct ParseError(pub String);

impl ParseError {
    pub(crate) fn new(reason: impl ToString) -> Self {
        ParseError(reason.to_string())
    }
}

pub trait FormatAdapter: Send + Sync {
    fn format(&self) -> WireFormat;

    /// Parses one raw response body.
    fn parse(&self, raw: &str) -> Result<ResponseDocument, ParseError>;

    /// Serializes a document. Deterministic for a given tree.
    fn serialize(&self, doc: &ResponseDocument) -> Result<String>;
}

static REST_XML: RestXmlAdapter = RestXmlAdapter;
static JSON: JsonAdapter = JsonAdapter;
static CLASS_XML: ClassXmlAdapter = ClassXmlAdapter;

/// Returns the adapter for `format`.
pub fn adapter_for(format: WireFormat) -> &'static dyn FormatAdapter {
    match format {
        WireFormat::RestXml => &REST_XML,
        WireFormat::Json => &JSON,
        WireFormat::ClassXml => &CLASS_XML,
    }
}

//! Aggregator facade.
//!
//! Orchestrates parse, shape resolution, merge, sort, paging and serialization for
//! one wire format. Every call is independent: the only state is the immutable shape
//! registry, so one [`Aggregator`] can be shared across request handlers.
//!
//! Failure is all-or-nothing. A single malformed document fails the whole call
//! rather than silently dropping one backend's results; callers that prefer partial
//! results must filter failing bodies before calling in.

use std::sync::Arc;
use std::time::Instant;

use crate::errors::{AggregationError, Result};
use crate::formats::adapter_for;
use crate::merge::merge;
use crate::metrics_defs::{
    AGGREGATION_DURATION, AGGREGATION_ERRORS, AGGREGATION_ITEMS, AGGREGATIONS, counter, histogram,
};
use crate::node::{ResponseDocument, ResponseKind, WireFormat};
use crate::paginate::{Page, paginate};
use crate::shape::{ShapeDescriptor, ShapeRegistry, unrecognized_shape};
use crate::sort::{SortSpec, sort};

/// Optional ordering and paging applied after the merge.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AggregateOptions {
    pub sort: Option<SortSpec>,
    pub page: Option<Page>,
}

struct Aggregated {
    body: String,
    kind: ResponseKind,
    merged_items: usize,
}

#[derive(Clone, Debug)]
pub struct Aggregator {
    format: WireFormat,
    registry: Arc<ShapeRegistry>,
}

impl Aggregator {
    /// Aggregator for `format` using the built-in shapes.
    pub fn new(format: WireFormat) -> Self {
        Self::with_registry(format, Arc::new(ShapeRegistry::builtin()))
    }

    pub fn with_registry(format: WireFormat, registry: Arc<ShapeRegistry>) -> Self {
        Aggregator { format, registry }
    }

    pub fn rest_xml() -> Self {
        Self::new(WireFormat::RestXml)
    }

    pub fn json() -> Self {
        Self::new(WireFormat::Json)
    }

    pub fn class_xml() -> Self {
        Self::new(WireFormat::ClassXml)
    }

    pub fn format(&self) -> WireFormat {
        self.format
    }

    /// Merges all documents without sorting or paging.
    pub fn aggregate<S: AsRef<str>>(&self, raw_docs: &[S]) -> Result<String> {
        self.aggregate_with_options(raw_docs, &AggregateOptions::default())
    }

    /// Merges all documents, sorts by `sort_field` when given, then keeps
    /// `limit` items starting at `offset`.
    pub fn aggregate_with<S: AsRef<str>>(
        &self,
        raw_docs: &[S],
        sort_field: Option<&str>,
        ascending: bool,
        offset: usize,
        limit: usize,
    ) -> Result<String> {
        let options = AggregateOptions {
            sort: sort_field.map(|field| SortSpec::new(field, ascending)),
            page: Some(Page::new(offset, limit)),
        };
        self.aggregate_with_options(raw_docs, &options)
    }

    pub fn aggregate_with_options<S: AsRef<str>>(
        &self,
        raw_docs: &[S],
        options: &AggregateOptions,
    ) -> Result<String> {
        let started = Instant::now();
        let format = self.format.as_str();
        let result = self.run(raw_docs, options);

        histogram!(AGGREGATION_DURATION, "format" => format)
            .record(started.elapsed().as_secs_f64());

        match result {
            Ok(aggregated) => {
                let kind = aggregated.kind.as_str();
                counter!(AGGREGATIONS, "format" => format, "kind" => kind).increment(1);
                histogram!(AGGREGATION_ITEMS, "format" => format, "kind" => kind)
                    .record(aggregated.merged_items as f64);
                Ok(aggregated.body)
            }
            Err(e) => {
                counter!(AGGREGATION_ERRORS, "format" => format, "error" => e.metric_label())
                    .increment(1);
                Err(e)
            }
        }
    }

    fn parse_all<S: AsRef<str>>(&self, raw_docs: &[S]) -> Result<Vec<(usize, ResponseDocument)>> {
        let adapter = adapter_for(self.format);
        let mut docs = Vec::with_capacity(raw_docs.len());

        for (index, raw) in raw_docs.iter().enumerate() {
            let raw = raw.as_ref();
            if raw.trim().is_empty() {
                tracing::warn!(index, format = self.format.as_str(), "Skipping blank document");
                continue;
            }
            let doc = adapter
                .parse(raw)
                .map_err(|e| AggregationError::malformed(index, e))?;
            docs.push((index, doc));
        }

        Ok(docs)
    }

    /// Resolves one shape for the whole call from the first detectable document.
    ///
    /// Undetectable documents are dropped when structurally empty and rejected
    /// otherwise. The first dropped document is kept for the case where nothing at
    /// all is detectable.
    fn resolve_shape(
        &self,
        docs: Vec<(usize, ResponseDocument)>,
    ) -> Result<(Option<ShapeDescriptor>, Vec<ResponseDocument>, Option<ResponseDocument>)> {
        let mut shape: Option<ShapeDescriptor> = None;
        let mut members = Vec::with_capacity(docs.len());
        let mut first_empty = None;

        for (index, mut doc) in docs {
            let Some(detected) = self.registry.detect(&doc.root, self.format) else {
                if !doc.root.is_empty() {
                    return Err(unrecognized_shape(&doc));
                }
                tracing::warn!(
                    index,
                    root = %doc.root.tag,
                    "Document has no recognizable envelope, treating as empty"
                );
                if first_empty.is_none() {
                    first_empty = Some(doc);
                }
                continue;
            };

            doc.kind = detected.kind;
            match &shape {
                None => shape = Some(detected),
                Some(expected) if expected.kind != detected.kind => {
                    return Err(AggregationError::ShapeMismatch {
                        index,
                        expected: expected.kind,
                        found: detected.kind,
                    });
                }
                Some(_) => {}
            }
            members.push(doc);
        }

        Ok((shape, members, first_empty))
    }

    fn run<S: AsRef<str>>(&self, raw_docs: &[S], options: &AggregateOptions) -> Result<Aggregated> {
        let adapter = adapter_for(self.format);
        let docs = self.parse_all(raw_docs)?;
        let (shape, members, first_empty) = self.resolve_shape(docs)?;

        let Some(shape) = shape else {
            // Nothing detectable: every document was blank or an empty root
            let body = match first_empty {
                Some(doc) => adapter.serialize(&doc)?,
                None => String::new(),
            };
            return Ok(Aggregated {
                body,
                kind: ResponseKind::Unknown,
                merged_items: 0,
            });
        };

        let Some(mut merged) = merge(members, &shape) else {
            return Err(AggregationError::UnrecognizedShape(
                "no document matched the resolved shape".to_string(),
            ));
        };
        let merged_items = merged.items.len();

        let mut items = std::mem::take(&mut merged.items);
        if let Some(spec) = &options.sort {
            items = sort(items, &spec.field, spec.ascending, &shape)?;
        }
        if let Some(page) = options.page {
            items = paginate(items, page.offset, page.limit);
        }
        merged.items = items;

        let doc = merged.into_document(&shape);
        let body = adapter.serialize(&doc)?;

        tracing::debug!(
            format = self.format.as_str(),
            kind = ?shape.kind,
            documents = raw_docs.len(),
            merged_items,
            "Aggregated responses"
        );

        Ok(Aggregated {
            body,
            kind: shape.kind,
            merged_items,
        })
    }
}

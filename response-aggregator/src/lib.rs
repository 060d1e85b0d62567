//! Response aggregation for a routing proxy that fans one list request out to
//! several backends.
//!
//! Each backend answers with a partial list serialized as REST-XML, JSON or
//! class-qualified XML. [`Aggregator`] merges those bodies into one body of the same
//! format, optionally sorted by a logical field and paged, keeping the envelope a
//! single backend would have produced.
//!
//! ```
//! use response_aggregator::Aggregator;
//!
//! let first = r#"{"processes": [{"process-id": "b"}]}"#;
//! let second = r#"{"processes": [{"process-id": "a"}]}"#;
//!
//! let merged = Aggregator::json()
//!     .aggregate_with(&[first, second], Some("ProcessId"), true, 0, 10)
//!     .unwrap();
//! assert!(merged.find("\"a\"").unwrap() < merged.find("\"b\"").unwrap());
//! ```

pub mod aggregator;
pub mod config;
pub mod errors;
pub mod formats;
pub mod merge;
pub mod metrics_defs;
pub mod node;
pub mod paginate;
pub mod shape;
pub mod sort;

#[cfg(test)]
mod testutils;

pub use aggregator::{AggregateOptions, Aggregator};
pub use config::AggregatorConfig;
pub use errors::{AggregationError, Result};
pub use formats::{FormatAdapter, adapter_for};
pub use node::{Node, NodeKind, ResponseDocument, ResponseKind, ScalarType, WireFormat};
pub use paginate::Page;
pub use shape::{FieldRef, ShapeDescriptor, ShapeRegistry};
pub use sort::SortSpec;

use crate::node::ResponseKind;
use http::StatusCode;
use thiserror::Error;

/// Result type alias for aggregation operations
pub type Result<T, E = AggregationError> = std::result::Result<T, E>;

/// Errors that can occur while aggregating backend responses
#[derive(Error, Debug)]
pub enum AggregationError {
    /// A raw input is not well-formed for the claimed wire format
    #[error("Malformed document at index {index}: {reason}")]
    MalformedDocument { index: usize, reason: String },

    /// None of the known response kinds match the document envelope
    #[error("Unrecognized response shape: {0}")]
    UnrecognizedShape(String),

    /// Two documents of the same call resolved to different kinds
    #[error("Document at index {index} is {found:?}, expected {expected:?}")]
    ShapeMismatch {
        index: usize,
        expected: ResponseKind,
        found: ResponseKind,
    },

    #[error("Unknown sort field {field:?} for {kind:?}")]
    UnknownSortField { field: String, kind: ResponseKind },

    #[error("Invalid page: {0}")]
    InvalidPage(String),

    #[error("Response serialization error: {0}")]
    Serialization(String),
}

impl AggregationError {
    pub(crate) fn malformed(index: usize, reason: impl ToString) -> Self {
        AggregationError::MalformedDocument {
            index,
            reason: reason.to_string(),
        }
    }

    /// Status the proxy layer should answer with when aggregation fails.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AggregationError::MalformedDocument { .. } => StatusCode::BAD_GATEWAY,
            AggregationError::UnrecognizedShape(_)
            | AggregationError::ShapeMismatch { .. }
            | AggregationError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AggregationError::UnknownSortField { .. } | AggregationError::InvalidPage(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    /// Short label used to tag error metrics.
    pub fn metric_label(&self) -> &'static str {
        match self {
            AggregationError::MalformedDocument { .. } => "malformed_document",
            AggregationError::UnrecognizedShape(_) => "unrecognized_shape",
            AggregationError::ShapeMismatch { .. } => "shape_mismatch",
            AggregationError::UnknownSortField { .. } => "unknown_sort_field",
            AggregationError::InvalidPage(_) => "invalid_page",
            AggregationError::Serialization(_) => "serialization",
        }
    }
}

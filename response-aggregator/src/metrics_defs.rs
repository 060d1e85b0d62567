//! Metrics emitted by the aggregation engine through the `metrics` facade.
//!
//! The embedding service installs the recorder; without one these are no-ops.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Histogram,
}

impl MetricType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MetricType::Counter => "Counter",
            MetricType::Histogram => "Histogram",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MetricDef {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub description: &'static str,
}

/// Records against a [`MetricDef`], forwarding labels to the `metrics` facade.
macro_rules! counter {
    ($def:expr $(, $key:expr => $value:expr)* $(,)?) => {
        metrics::counter!($def.name $(, $key => $value)*)
    };
}

macro_rules! histogram {
    ($def:expr $(, $key:expr => $value:expr)* $(,)?) => {
        metrics::histogram!($def.name $(, $key => $value)*)
    };
}

pub(crate) use counter;
pub(crate) use histogram;

pub const AGGREGATIONS: MetricDef = MetricDef {
    name: "aggregations",
    metric_type: MetricType::Counter,
    description: "Successful aggregations. Tagged with format, kind.",
};

pub const AGGREGATION_ERRORS: MetricDef = MetricDef {
    name: "aggregation.errors",
    metric_type: MetricType::Counter,
    description: "Failed aggregations. Tagged with format, error.",
};

pub const AGGREGATION_ITEMS: MetricDef = MetricDef {
    name: "aggregation.items",
    metric_type: MetricType::Histogram,
    description: "Number of items merged from all documents, before paging. Tagged with format, kind.",
};

pub const AGGREGATION_DURATION: MetricDef = MetricDef {
    name: "aggregation.duration",
    metric_type: MetricType::Histogram,
    description: "Aggregation duration in seconds. Tagged with format.",
};

pub const ALL_METRICS: &[MetricDef] = &[
    AGGREGATIONS,
    AGGREGATION_ERRORS,
    AGGREGATION_ITEMS,
    AGGREGATION_DURATION,
];

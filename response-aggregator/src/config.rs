use crate::node::WireFormat;
use crate::shape::{FieldRef, ShapeDescriptor};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(#[from] ValidationError),
}

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Empty item tag for {0:?} shape")]
    EmptyItemTag(String),

    #[error("Empty wrapper path segment for {0:?} shape")]
    EmptyWrapperSegment(String),

    #[error("Empty sort field name for {0:?} shape")]
    EmptySortField(String),

    #[error("JSON shape {0:?} cannot declare a root tag")]
    JsonRootTag(String),

    #[error("Duplicate shape for {0}")]
    DuplicateShape(String),

    #[error("Empty raw list root for {0}")]
    EmptyRawListRoot(String),
}

/// XML root tag that marks a bare list document.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct RawListRoot {
    pub format: WireFormat,
    pub root: String,
}

/// Aggregation engine configuration
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct AggregatorConfig {
    /// Include the built-in shape table
    #[serde(default = "default_true")]
    pub builtin_shapes: bool,
    /// Additional shapes. A shape for a (kind, format) pair that already has a
    /// built-in descriptor replaces it.
    #[serde(default)]
    pub shapes: Vec<ShapeDescriptor>,
    /// Additional XML roots recognized as bare lists
    #[serde(default)]
    pub raw_list_roots: Vec<RawListRoot>,
}

fn default_true() -> bool {
    true
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        AggregatorConfig {
            builtin_shapes: true,
            shapes: Vec::new(),
            raw_list_roots: Vec::new(),
        }
    }
}

impl AggregatorConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let config: AggregatorConfig = serde_yaml::from_reader(file)?;
        config.validate()?;

        Ok(config)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: AggregatorConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;

        Ok(config)
    }

    /// Validates the configured shapes
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();

        for shape in &self.shapes {
            let name = shape.kind.as_str().to_string();

            if !seen.insert((shape.kind, shape.format)) {
                return Err(ValidationError::DuplicateShape(format!(
                    "{}/{}",
                    shape.kind.as_str(),
                    shape.format.as_str()
                )));
            }

            if shape.format == WireFormat::Json && shape.root_tag.is_some() {
                return Err(ValidationError::JsonRootTag(name));
            }

            if shape.item_tag.as_deref().is_some_and(str::is_empty) {
                return Err(ValidationError::EmptyItemTag(name));
            }

            let segments = shape
                .wrapper_path
                .iter()
                .chain(shape.signature.iter().flatten());
            for segment in segments {
                if segment.is_empty() {
                    return Err(ValidationError::EmptyWrapperSegment(name));
                }
            }

            for (logical, field) in &shape.sort_fields {
                let target = match field {
                    FieldRef::Child(tag) => tag,
                    FieldRef::Attribute(attr) => attr,
                };
                if logical.is_empty() || target.is_empty() {
                    return Err(ValidationError::EmptySortField(name));
                }
            }
        }

        for entry in &self.raw_list_roots {
            if entry.root.is_empty() {
                return Err(ValidationError::EmptyRawListRoot(
                    entry.format.as_str().to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ResponseKind;
    use std::io::Write;

    fn write_tmp_file(s: &str) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        write!(tmp, "{}", s).expect("write yaml");

        tmp
    }

    #[test]
    fn test_parse_valid_config() {
        let yaml = r#"
shapes:
    - kind: task_summaries
      format: rest_xml
      root_tag: task-list
      item_tag: task
      sort_fields:
        TaskId:
          child: id
        Owner:
          attribute: owner
    - kind: containers
      format: json
      signature: [result, containers]
      wrapper_path: [result, containers, container]
raw_list_roots:
    - format: rest_xml
      root: values
"#;
        let tmp = write_tmp_file(yaml);
        let config = AggregatorConfig::from_file(tmp.path()).expect("load config");

        assert!(config.builtin_shapes);
        assert_eq!(config.shapes.len(), 2);

        let tasks = &config.shapes[0];
        assert_eq!(tasks.kind, ResponseKind::TaskSummaries);
        assert_eq!(tasks.root_tag.as_deref(), Some("task-list"));
        assert_eq!(tasks.sort_fields.get("TaskId"), Some(&FieldRef::child("id")));
        assert_eq!(
            tasks.sort_fields.get("Owner"),
            Some(&FieldRef::attribute("owner"))
        );

        let containers = &config.shapes[1];
        assert_eq!(containers.format, WireFormat::Json);
        assert_eq!(containers.signature_path(), ["result", "containers"]);
        assert!(containers.item_tag.is_none());

        assert_eq!(
            config.raw_list_roots,
            vec![RawListRoot {
                format: WireFormat::RestXml,
                root: "values".into()
            }]
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AggregatorConfig::from_yaml_str("{}").expect("parse config");
        assert_eq!(config, AggregatorConfig::default());
    }

    #[test]
    fn test_json_root_tag_rejected() {
        let yaml = r#"
shapes:
    - kind: process_definitions
      format: json
      root_tag: process-definitions
      wrapper_path: [processes]
"#;
        let err = AggregatorConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid(ValidationError::JsonRootTag(_))
        ));
    }

    #[test]
    fn test_duplicate_shape_rejected() {
        let shape = ShapeDescriptor::new(ResponseKind::Containers, WireFormat::RestXml)
            .root("response")
            .with_wrapper(&["kie-containers"])
            .item("kie-container");
        let config = AggregatorConfig {
            shapes: vec![shape.clone(), shape],
            ..AggregatorConfig::default()
        };

        assert_eq!(
            config.validate(),
            Err(ValidationError::DuplicateShape(
                "containers/rest_xml".to_string()
            ))
        );
    }

    #[test]
    fn test_empty_segments_rejected() {
        let config = AggregatorConfig {
            shapes: vec![
                ShapeDescriptor::new(ResponseKind::Containers, WireFormat::RestXml)
                    .root("response")
                    .with_wrapper(&["kie-containers", ""]),
            ],
            ..AggregatorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::EmptyWrapperSegment(_))
        ));

        let config = AggregatorConfig {
            shapes: vec![
                ShapeDescriptor::new(ResponseKind::Containers, WireFormat::RestXml)
                    .root("response")
                    .item(""),
            ],
            ..AggregatorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::EmptyItemTag(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = AggregatorConfig::from_file(Path::new("/nonexistent/aggregator.yaml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }
}

//! Cross-step injection resolution.
//!
//! An inject declaration names a resource that one step provisions and a
//! later step wants to look up:
//!
//! ```yaml
//! inject:
//!   vpc:
//!     source: network.aws_vpc.main
//! ```
//!
//! The reference splits into the producing module, the resource type, and
//! the resource name. The module segment is informational only: ordering is
//! always the declared step order.

use std::collections::BTreeMap;

use crate::config::InjectConfig;
use crate::error::{PipelineError, Result};

/// A resolved inject declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectSpec {
    /// Logical alias, also used as the data-source name in consuming steps.
    pub name: String,
    /// Producing step name.
    pub module: String,
    /// Resource type, e.g. `aws_vpc`.
    pub resource_type: String,
    /// Resource name within its module, e.g. `main`.
    pub resource_name: String,
}

impl InjectSpec {
    /// Parse a dotted `module.type.resource_name` reference.
    ///
    /// A surrounding `${...}` interpolation wrapper is accepted and stripped.
    pub fn parse(name: &str, reference: &str) -> Result<Self> {
        let trimmed = strip_interpolation(reference.trim());
        let segments: Vec<&str> = trimmed.split('.').collect();

        match segments.as_slice() {
            [module, resource_type, resource_name]
                if !module.is_empty() && !resource_type.is_empty() && !resource_name.is_empty() =>
            {
                Ok(Self {
                    name: name.to_string(),
                    module: module.to_string(),
                    resource_type: resource_type.to_string(),
                    resource_name: resource_name.to_string(),
                })
            }
            _ => Err(PipelineError::config(format!(
                "inject '{}' has source '{}'; expected module.type.resource_name",
                name, reference
            ))),
        }
    }

    /// Name of the output block the producing step declares for this inject.
    pub fn output_name(&self) -> String {
        format!("{}_id", self.resource_name)
    }
}

fn strip_interpolation(reference: &str) -> &str {
    reference
        .strip_prefix("${")
        .and_then(|r| r.strip_suffix('}'))
        .unwrap_or(reference)
}

/// Resolve every inject declaration, in config order.
///
/// Duplicate aliases are not rejected.
pub fn resolve_injects(declared: &BTreeMap<String, InjectConfig>) -> Result<Vec<InjectSpec>> {
    declared
        .iter()
        .map(|(name, inject)| InjectSpec::parse(name, &inject.source))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_three_segments() {
        let spec = InjectSpec::parse("vpc", "network.aws_vpc.main").unwrap();
        assert_eq!(spec.name, "vpc");
        assert_eq!(spec.module, "network");
        assert_eq!(spec.resource_type, "aws_vpc");
        assert_eq!(spec.resource_name, "main");
    }

    #[test]
    fn strips_interpolation_wrapper() {
        let spec = InjectSpec::parse("web", "${compute.aws_instance.web}").unwrap();
        assert_eq!(spec.module, "compute");
        assert_eq!(spec.resource_type, "aws_instance");
        assert_eq!(spec.resource_name, "web");
    }

    #[test]
    fn rejects_wrong_segment_counts() {
        for reference in ["", "network", "network.aws_vpc", "a.b.c.d", "a..c", ".b.c"] {
            let result = InjectSpec::parse("x", reference);
            assert!(
                matches!(result, Err(PipelineError::ConfigError { .. })),
                "expected ConfigError for {:?}",
                reference
            );
        }
    }

    #[test]
    fn output_name_derives_from_resource_name() {
        let spec = InjectSpec::parse("vpc", "network.aws_vpc.main").unwrap();
        assert_eq!(spec.output_name(), "main_id");
    }

    #[test]
    fn resolve_keeps_config_order() {
        let mut declared = BTreeMap::new();
        declared.insert(
            "b_subnet".to_string(),
            InjectConfig {
                source: "network.aws_subnet.private".to_string(),
            },
        );
        declared.insert(
            "a_vpc".to_string(),
            InjectConfig {
                source: "network.aws_vpc.main".to_string(),
            },
        );

        let specs = resolve_injects(&declared).unwrap();
        let names: Vec<_> = specs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a_vpc", "b_subnet"]);
    }

    #[test]
    fn resolve_fails_on_first_bad_reference() {
        let mut declared = BTreeMap::new();
        declared.insert(
            "bad".to_string(),
            InjectConfig {
                source: "network.aws_vpc".to_string(),
            },
        );
        assert!(resolve_injects(&declared).is_err());
    }
}

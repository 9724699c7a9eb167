//! Discovery of the resources a module declares.
//!
//! Only `resource` block headers are recognized. Labels may be quoted or
//! bare; anything else in the file is ignored.

use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use crate::error::Result;

static RESOURCE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*resource\s+"?([A-Za-z0-9_-]+)"?\s+"?([A-Za-z0-9_-]+)"?\s*\{"#)
        .expect("RESOURCE_HEADER must compile")
});

/// `(type, name)` pairs declared by a module.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeclaredResources {
    resources: BTreeSet<(String, String)>,
}

impl DeclaredResources {
    /// Scan module source text.
    pub fn from_source(source: &str) -> Self {
        let mut declared = Self::default();
        declared.scan(source);
        declared
    }

    fn scan(&mut self, source: &str) {
        for caps in RESOURCE_HEADER.captures_iter(source) {
            self.resources
                .insert((caps[1].to_string(), caps[2].to_string()));
        }
    }

    /// Whether the module declares a resource of this type and name.
    pub fn contains(&self, resource_type: &str, resource_name: &str) -> bool {
        self.resources
            .contains(&(resource_type.to_owned(), resource_name.to_owned()))
    }

    /// Number of declared resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether the module declares nothing.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Scan every `*.tf` file directly inside `dir`.
pub fn declared_resources(dir: &Path) -> Result<DeclaredResources> {
    let mut declared = DeclaredResources::default();

    let mut files: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "tf"))
        .collect();
    files.sort();

    for file in files {
        declared.scan(&fs::read_to_string(&file)?);
    }

    tracing::debug!(
        "Found {} declared resources in {}",
        declared.len(),
        dir.display()
    );
    Ok(declared)
}

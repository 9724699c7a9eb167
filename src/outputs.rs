//! Resolved outputs shared between steps of one apply run.

use crate::inject::InjectSpec;

/// The realized identifier of a resource after its owning step applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutput {
    /// Realized identifier reported by the provisioning engine.
    pub id: String,
    /// Resource type.
    pub resource_type: String,
    /// Inject alias; names the data source in consuming steps.
    pub name: String,
    /// Resource name within the producing module.
    pub resource_name: String,
}

impl ResolvedOutput {
    /// Bind an inject to the identifier the engine reported for it.
    pub fn from_inject(inject: &InjectSpec, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            resource_type: inject.resource_type.clone(),
            name: inject.name.clone(),
            resource_name: inject.resource_name.clone(),
        }
    }
}

/// Append-only store of outputs resolved so far in the current run.
///
/// Rebuilt from scratch every invocation; nothing is cached across runs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OutputStore {
    outputs: Vec<ResolvedOutput>,
}

impl OutputStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the outputs of a freshly applied step.
    pub fn extend(&mut self, outputs: impl IntoIterator<Item = ResolvedOutput>) {
        self.outputs.extend(outputs);
    }

    /// All outputs, in resolution order.
    pub fn all(&self) -> &[ResolvedOutput] {
        &self.outputs
    }

    /// Find an output by `(type, resource_name)`.
    ///
    /// When several outputs share the key, the most recent one wins.
    pub fn lookup(&self, resource_type: &str, resource_name: &str) -> Option<&ResolvedOutput> {
        self.outputs
            .iter()
            .rev()
            .find(|o| o.resource_type == resource_type && o.resource_name == resource_name)
    }

    /// Number of resolved outputs.
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Whether nothing has been resolved yet.
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{ResourceError, ResourceResult};
use crate::models::{Resource, ResourceKind};

/// The set of resource declarations proposed for one deployment
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResourceGraph {
    #[serde(default)]
    resources: Vec<Resource>,
}

impl ResourceGraph {
    pub fn new(resources: Vec<Resource>) -> Self {
        Self { resources }
    }

    /// Parse a graph document: `{ "resources": [ { "type", "name", "props" } ] }`
    pub fn from_json_str(json: &str) -> ResourceResult<Self> {
        let graph: ResourceGraph = serde_json::from_str(json)?;
        debug!(resources = graph.len(), "Parsed resource graph");
        Ok(graph)
    }

    /// Read a graph document from disk
    pub fn from_file(path: impl AsRef<Path>) -> ResourceResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ResourceError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let graph = Self::from_json_str(&json).map_err(|e| match e {
            ResourceError::Parse(source) => ResourceError::InvalidDocument {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })?;

        info!(
            path = %path.display(),
            resources = graph.len(),
            unknown = graph.of_kind(ResourceKind::Unknown).count(),
            "Loaded resource graph"
        );

        Ok(graph)
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// All resources of one kind, in declaration order
    pub fn of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &Resource> + '_ {
        self.resources.iter().filter(move |r| r.kind == kind)
    }

    /// Find the first sibling of `kind` whose reference name equals `name`
    pub fn find_named(&self, kind: ResourceKind, name: &str) -> Option<&Resource> {
        self.of_kind(kind).find(|r| r.reference_name() == name)
    }

    pub fn push(&mut self, resource: Resource) {
        self.resources.push(resource);
    }
}

impl FromIterator<Resource> for ResourceGraph {
    fn from_iter<I: IntoIterator<Item = Resource>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

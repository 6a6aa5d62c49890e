//! Pulumi package schema document
//!
//! Only the surface the translator needs is typed: package metadata, the
//! resource map, and the named types. Type entries stay raw JSON and are
//! shape-checked when a traversal reaches them.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::DocumentError;

/// Prefix of refs pointing into the document's `types` map
pub const TYPES_REF_PREFIX: &str = "#/types/";

/// Prefix of refs pointing into the document's `resources` map
pub const RESOURCES_REF_PREFIX: &str = "#/resources/";

/// A decoded Pulumi package schema
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Document {
    /// Package name (e.g., "aws-fargate")
    #[serde(default)]
    pub name: String,

    /// Package version (e.g., "1.4.0")
    #[serde(default)]
    pub version: String,

    /// Resources keyed by token
    #[serde(default)]
    pub resources: BTreeMap<String, Resource>,

    /// Named types keyed by token
    #[serde(default)]
    pub types: BTreeMap<String, Value>,
}

/// A resource entry
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Whether this resource is a component (selectable for translation)
    #[serde(default)]
    pub is_component: bool,

    /// Input properties keyed by name
    #[serde(default)]
    pub input_properties: Map<String, Value>,

    /// Names of required inputs, possibly unsorted and duplicated
    #[serde(default)]
    pub required_inputs: Vec<String>,
}

impl Resource {
    /// Required inputs deduplicated and sorted
    pub fn normalized_required(&self) -> Vec<String> {
        normalize_names(self.required_inputs.iter().cloned())
    }
}

impl Document {
    /// Decode a schema from raw JSON bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DocumentError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Decode a schema from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Look up a resource by token
    pub fn resource(&self, token: &str) -> Option<&Resource> {
        self.resources.get(token)
    }

    /// Look up a named type by token
    pub fn type_node(&self, token: &str) -> Option<&Value> {
        self.types.get(token)
    }
}

/// Where a `$ref` points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefTarget<'a> {
    /// `#/types/<token>`
    Type(&'a str),
    /// `#/resources/<token>`
    Resource(&'a str),
    /// Anything else (other documents, `pulumi.json#/Any`, URLs)
    External,
}

impl<'a> RefTarget<'a> {
    /// Classify a `$ref` string
    pub fn parse(reference: &'a str) -> Self {
        if let Some(token) = reference.strip_prefix(TYPES_REF_PREFIX) {
            Self::Type(token)
        } else if let Some(token) = reference.strip_prefix(RESOURCES_REF_PREFIX) {
            Self::Resource(token)
        } else {
            Self::External
        }
    }

    pub fn is_local(&self) -> bool {
        !matches!(self, Self::External)
    }
}

/// Deduplicate and sort a list of names
pub fn normalize_names<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut names: Vec<String> = names.into_iter().collect();
    names.sort();
    names.dedup();
    names
}

/// Entries of a JSON object in lexicographic key order
///
/// Traversals go through this instead of the map's own iteration order so
/// output never depends on how `serde_json` was compiled.
pub fn sorted_entries(map: &Map<String, Value>) -> Vec<(&String, &Value)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}

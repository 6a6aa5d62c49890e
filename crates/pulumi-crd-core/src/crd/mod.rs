//! CustomResourceDefinition rendering
//!
//! The envelope has a fixed layout; only the `spec` subtree under
//! `openAPIV3Schema.properties` comes from the translator, with its mapping
//! keys emitted in sorted order.

mod yaml;

use serde_json::Value;

use crate::error::EmitError;
use crate::identity::Identity;
use yaml::{MappingBuilder, Node};

/// API version of the emitted CRD object
pub const CRD_API_VERSION: &str = "apiextensions.k8s.io/v1";

/// Kind of the emitted CRD object
pub const CRD_KIND: &str = "CustomResourceDefinition";

/// Scope of every emitted CRD
pub const CRD_SCOPE: &str = "Namespaced";

/// Render the CRD YAML for `identity` with `spec_schema` under `spec`
pub fn render_crd(identity: &Identity, spec_schema: &Value) -> Result<String, EmitError> {
    if spec_schema.is_null() {
        return Err(EmitError::NullSchema);
    }

    let schema = MappingBuilder::new()
        .entry("type", Node::string("object")?)
        .entry(
            "properties",
            MappingBuilder::new()
                .entry("spec", Node::from_json(spec_schema)?)
                .build(),
        )
        .build();

    let version = MappingBuilder::new()
        .entry("name", Node::string(&identity.version)?)
        .entry("served", Node::bool(true))
        .entry("storage", Node::bool(true))
        .entry(
            "schema",
            MappingBuilder::new().entry("openAPIV3Schema", schema).build(),
        )
        .build();

    let names = MappingBuilder::new()
        .entry("kind", Node::string(&identity.kind)?)
        .entry("plural", Node::string(&identity.plural)?)
        .entry("singular", Node::string(&identity.singular)?)
        .build();

    let root = MappingBuilder::new()
        .entry("apiVersion", Node::string(CRD_API_VERSION)?)
        .entry("kind", Node::string(CRD_KIND)?)
        .entry(
            "metadata",
            MappingBuilder::new()
                .entry("name", Node::quoted(&identity.crd_name())?)
                .build(),
        )
        .entry(
            "spec",
            MappingBuilder::new()
                .entry("group", Node::string(&identity.group)?)
                .entry("names", names)
                .entry("scope", Node::string(CRD_SCOPE)?)
                .entry("versions", Node::Sequence(vec![version]))
                .build(),
        )
        .build();

    tracing::debug!(name = %identity.crd_name(), "rendered CRD");
    Ok(yaml::render_document(&root))
}

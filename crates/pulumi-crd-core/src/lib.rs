//! Pulumi CRD Core - Pulumi component schemas to Kubernetes CRDs
//!
//! This crate holds every in-memory stage of the translation pipeline:
//! - `Document`: The decoded Pulumi package schema
//! - `select_component`: Choosing the component to translate
//! - `preflight_component`: Structural validation of the reachable graph
//! - `Identity`: CRD group, version and names with overrides
//! - `translate_component`: OpenAPI v3 schema plus skipped paths
//! - `render_crd`: Byte-deterministic CRD YAML
//!
//! ## Example
//!
//! ```rust
//! use pulumi_crd_core::{
//!     Document, IdentityOverrides, preflight_component, render_crd, resolve_identity,
//!     select_component, translate_component,
//! };
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let doc = Document::from_json_str(r#"{
//!     "name": "demo",
//!     "resources": { "demo:index:Site": {
//!         "isComponent": true,
//!         "inputProperties": { "domain": { "type": "string" } },
//!         "requiredInputs": ["domain"]
//!     } }
//! }"#)?;
//!
//! let selected = select_component(&doc, "")?;
//! preflight_component(&doc, &selected)?;
//! let identity = resolve_identity(&doc, selected.token, &IdentityOverrides::default())?;
//! let translation = translate_component(&doc, &selected)?;
//! let yaml = render_crd(&identity, &translation.schema)?;
//! assert!(yaml.contains("name: \"sites.demo.components.platform\""));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod crd;
pub mod document;
pub mod error;
pub mod identity;
pub mod preflight;
pub mod select;
pub mod translate;

pub use crd::render_crd;
pub use document::{Document, RefTarget, Resource};
pub use error::{
    DocumentError, EmitError, IdentityError, IdentityField, PreflightError, Result, SelectError,
    Severity, TranslateError, UnsupportedError,
};
pub use identity::{Identity, IdentityOverrides, resolve_identity};
pub use preflight::{PreflightMode, preflight_component, preflight_document};
pub use select::{SelectedComponent, component_tokens, select_component};
pub use translate::{SkipIssue, Translation, fallback_schema, translate_component};

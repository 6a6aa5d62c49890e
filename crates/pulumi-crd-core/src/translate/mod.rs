//! Pulumi component schema to OpenAPI v3 translation
//!
//! The translator walks the selected component's inputs and produces the
//! structural schema placed under the CRD's `spec`. Constructs it cannot
//! express are classified by [`Severity`]:
//!
//! - **Skippable**: the property is dropped and recorded as a [`SkipIssue`]
//!   (unions, `const`, unknown `type` values, malformed annotations).
//! - **Hard**: translation stops (cyclic local refs, enum values that do not
//!   match the declared type).
//!
//! ```text
//!   inputProperties ──► translate_node ──► $ref ──► resolve ──► translate_node
//!                            │                                  (stack + ref)
//!                            ├─► type: scalar / array / object
//!                            └─► annotations (description, default, enum)
//! ```
//!
//! Every map is traversed in sorted key order and every `required` list is
//! sorted, deduplicated and filtered to the properties kept at its level.

mod annotations;
mod skip;

pub use skip::{SkipIssue, finalize_skips};

use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::BTreeSet;

use crate::document::{Document, RefTarget, normalize_names, sorted_entries};
use crate::error::{Result, Severity, TranslateError, UnsupportedError};
use crate::select::SelectedComponent;

/// Keywords rejected wherever they appear, including beside `$ref`
const UNSUPPORTED_KEYWORDS: [&str; 7] = [
    "oneOf",
    "anyOf",
    "allOf",
    "not",
    "discriminator",
    "patternProperties",
    "const",
];

const SCALAR_TYPES: [&str; 4] = ["string", "boolean", "integer", "number"];

/// Translated `spec` schema plus the paths that were skipped
#[derive(Debug, Clone)]
pub struct Translation {
    pub schema: Value,
    pub skipped: Vec<SkipIssue>,
}

impl Translation {
    /// Warning lines for every skipped path, in order
    pub fn warnings(&self) -> Vec<String> {
        self.skipped.iter().map(SkipIssue::warning).collect()
    }
}

/// Schema used for refs that cannot be resolved inside the document
pub fn fallback_schema() -> Map<String, Value> {
    let mut out = Map::new();
    out.insert("type".into(), Value::String("object".into()));
    out.insert("x-kubernetes-preserve-unknown-fields".into(), Value::Bool(true));
    out
}

/// Translate the selected component's inputs into an OpenAPI v3 object schema
pub fn translate_component(doc: &Document, selected: &SelectedComponent<'_>) -> Result<Translation> {
    let mut translator = Translator::new(doc, selected.token);
    let properties = translator.translate_properties(&selected.resource.input_properties, "spec")?;
    let skipped = finalize_skips(translator.skipped);

    if properties.is_empty() && !skipped.is_empty() {
        return Err(TranslateError::NothingTranslatable {
            component: selected.token.to_string(),
            skipped,
        });
    }

    let required = kept_required(selected.resource.normalized_required(), &properties);

    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("object".into()));
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".into(), string_array(required));
    }

    Ok(Translation {
        schema: Value::Object(schema),
        skipped,
    })
}

/// Why a node was rejected, before component and path are attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Rejection {
    pub(crate) summary: String,
    pub(crate) severity: Severity,
}

impl Rejection {
    pub(crate) fn skip(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            severity: Severity::Skippable,
        }
    }

    pub(crate) fn hard(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            severity: Severity::Hard,
        }
    }
}

struct Translator<'a> {
    doc: &'a Document,
    component: &'a str,
    /// Local refs currently being resolved on this branch
    stack: BTreeSet<String>,
    skipped: Vec<SkipIssue>,
}

impl<'a> Translator<'a> {
    fn new(doc: &'a Document, component: &'a str) -> Self {
        Self {
            doc,
            component,
            stack: BTreeSet::new(),
            skipped: Vec::new(),
        }
    }

    fn reject(&self, path: &str, rejection: Rejection) -> TranslateError {
        TranslateError::Unsupported(UnsupportedError {
            component: self.component.to_string(),
            path: path.to_string(),
            summary: rejection.summary,
            severity: rejection.severity,
        })
    }

    fn skip(&self, path: &str, summary: impl Into<String>) -> TranslateError {
        self.reject(path, Rejection::skip(summary))
    }

    fn malformed(&self, path: &str, cause: impl Into<String>) -> TranslateError {
        TranslateError::Schema {
            component: self.component.to_string(),
            path: path.to_string(),
            cause: cause.into(),
        }
    }

    /// Translate each property, recording and dropping skippable failures
    fn translate_properties(
        &mut self,
        properties: &Map<String, Value>,
        parent: &str,
    ) -> Result<Map<String, Value>> {
        let mut kept = Map::new();

        for (name, node) in sorted_entries(properties) {
            let path = format!("{parent}.{name}");
            match self.translate_node(node, &path) {
                Ok(schema) => {
                    kept.insert(name.clone(), Value::Object(schema));
                }
                Err(TranslateError::Unsupported(err)) if err.is_skippable() => {
                    tracing::debug!(
                        component = %err.component,
                        path = %err.path,
                        reason = %err.summary,
                        "skipping unsupported schema path"
                    );
                    self.skipped.push(err.into());
                }
                Err(err) => return Err(err),
            }
        }

        Ok(kept)
    }

    fn translate_node(&mut self, node: &Value, path: &str) -> Result<Map<String, Value>> {
        let Some(source) = node.as_object() else {
            return Err(self.malformed(path, "schema node must be a JSON object"));
        };

        if let Some(keyword) = UNSUPPORTED_KEYWORDS.iter().find(|k| source.contains_key(**k)) {
            return Err(self.skip(path, format!("keyword \"{keyword}\"")));
        }

        let mut out = if let Some(reference) = source.get("$ref") {
            let Some(reference) = reference.as_str() else {
                return Err(self.malformed(path, "$ref must be a string"));
            };
            self.translate_ref(reference, path)?
        } else if let Some(type_value) = source.get("type") {
            self.translate_typed(source, type_value, path)?
        } else if source.contains_key("enum") {
            return Err(self.skip(path, "enum without explicit type"));
        } else {
            return Err(self.skip(path, "missing supported shape (expected one of $ref or type)"));
        };

        annotations::apply(&mut out, source).map_err(|rejection| self.reject(path, rejection))?;
        Ok(out)
    }

    fn translate_ref(&mut self, reference: &str, path: &str) -> Result<Map<String, Value>> {
        let target = RefTarget::parse(reference);
        if !target.is_local() {
            tracing::debug!(component = self.component, path, reference, "non-local ref uses fallback schema");
            return Ok(fallback_schema());
        }

        if self.stack.contains(reference) {
            return Err(self.reject(path, Rejection::hard(format!("cyclic local ref \"{reference}\""))));
        }

        let doc = self.doc;
        let node: Cow<'a, Value> = match target {
            RefTarget::Type(token) => {
                let Some(node) = doc.type_node(token) else {
                    return Err(self.malformed(path, format!("unresolved local type ref \"{reference}\"")));
                };
                if !node.is_object() {
                    return Err(self.malformed(
                        path,
                        format!("local type ref \"{reference}\" does not resolve to a JSON object"),
                    ));
                }
                Cow::Borrowed(node)
            }
            RefTarget::Resource(token) => {
                let Some(resource) = doc.resource(token) else {
                    return Err(self.malformed(path, format!("unresolved local resource ref \"{reference}\"")));
                };
                Cow::Owned(resource_node(&resource.input_properties, resource.normalized_required()))
            }
            RefTarget::External => return Ok(fallback_schema()),
        };

        tracing::trace!(component = self.component, path, reference, "resolving local ref");
        self.stack.insert(reference.to_string());
        let translated = self.translate_node(&node, path);
        self.stack.remove(reference);
        translated
    }

    fn translate_typed(
        &mut self,
        source: &Map<String, Value>,
        type_value: &Value,
        path: &str,
    ) -> Result<Map<String, Value>> {
        let Some(type_name) = type_value.as_str() else {
            return Err(self.skip(path, "type must be a string"));
        };

        match type_name {
            t if SCALAR_TYPES.contains(&t) => {
                let mut out = Map::new();
                out.insert("type".into(), Value::String(t.to_string()));
                Ok(out)
            }
            "array" => {
                let Some(items) = source.get("items").filter(|items| items.is_object()) else {
                    return Err(self.skip(path, "array items must be an object schema"));
                };
                let items = self.translate_node(items, &format!("{path}[]"))?;
                let mut out = Map::new();
                out.insert("type".into(), Value::String("array".into()));
                out.insert("items".into(), Value::Object(items));
                Ok(out)
            }
            "object" => self.translate_object(source, path),
            other => Err(self.skip(path, format!("type \"{other}\""))),
        }
    }

    fn translate_object(&mut self, source: &Map<String, Value>, path: &str) -> Result<Map<String, Value>> {
        let required = match source.get("required") {
            Some(raw) => match string_list(raw) {
                Some(names) => normalize_names(names),
                None => return Err(self.skip(path, "required must be a list of strings")),
            },
            None => Vec::new(),
        };

        let mut out = Map::new();
        out.insert("type".into(), Value::String("object".into()));

        let mut kept = Map::new();
        if let Some(properties) = source.get("properties") {
            let Some(properties) = properties.as_object() else {
                return Err(self.malformed(path, "properties must be a JSON object"));
            };
            kept = self.translate_properties(properties, path)?;
        }

        if let Some(additional) = source.get("additionalProperties") {
            if !additional.is_object() {
                return Err(self.skip(path, "additionalProperties must be an object schema"));
            }
            let translated = self.translate_node(additional, &format!("{path}.*"))?;
            out.insert("additionalProperties".into(), Value::Object(translated));
        }

        let required = kept_required(required, &kept);
        if !required.is_empty() {
            out.insert("required".into(), string_array(required));
        }
        if source.contains_key("properties") {
            out.insert("properties".into(), Value::Object(kept));
        }

        Ok(out)
    }
}

/// Object node standing in for a `#/resources/<token>` ref
fn resource_node(input_properties: &Map<String, Value>, required: Vec<String>) -> Value {
    let mut node = Map::new();
    node.insert("type".into(), Value::String("object".into()));
    node.insert("properties".into(), Value::Object(input_properties.clone()));
    if !required.is_empty() {
        node.insert("required".into(), string_array(required));
    }
    Value::Object(node)
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

fn string_array(names: Vec<String>) -> Value {
    Value::Array(names.into_iter().map(Value::String).collect())
}

/// Normalized names that survived translation at this level
fn kept_required(normalized: Vec<String>, kept: &Map<String, Value>) -> Vec<String> {
    normalized
        .into_iter()
        .filter(|name| kept.contains_key(name))
        .collect()
}

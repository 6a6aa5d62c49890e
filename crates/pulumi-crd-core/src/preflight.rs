//! Structural validation ahead of translation
//!
//! Preflight walks every node reachable from the selected component through
//! `properties`, `items`, `additionalProperties` and `$ref`, and rejects
//! shapes the translator could not process consistently: non-object nodes,
//! non-string refs, and local refs that do not resolve to a JSON object.
//!
//! It deliberately ignores unsupported keywords (`oneOf`, unknown `type`
//! values, ...). Those are translation concerns and may end up skipped.
//! Cycles are not errors here either: a ref that is already being visited
//! counts as validated, because an unused cycle must not block valid input.

use serde_json::{Map, Value};
use std::collections::BTreeSet;

use crate::document::{Document, RefTarget, sorted_entries};
use crate::error::PreflightError;
use crate::select::SelectedComponent;

/// Which refs preflight accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreflightMode {
    /// Walk one selected component; non-local refs fall back during translation
    SelectedComponent,
    /// Walk every resource and type; only local refs are allowed
    WholeDocument,
}

/// Validate the graph reachable from the selected component
pub fn preflight_component(
    doc: &Document,
    selected: &SelectedComponent<'_>,
) -> Result<(), PreflightError> {
    let mut walker = Walker::new(doc, PreflightMode::SelectedComponent);
    walker.component = selected.token.to_string();
    walker.walk_inputs(&selected.resource.input_properties, "spec")
}

/// Validate every resource and type in the document
pub fn preflight_document(doc: &Document) -> Result<(), PreflightError> {
    let mut walker = Walker::new(doc, PreflightMode::WholeDocument);

    for (token, resource) in &doc.resources {
        walker.component = token.clone();
        walker.walk_inputs(&resource.input_properties, "spec")?;
    }

    for (token, node) in &doc.types {
        walker.component = token.clone();
        walker.walk_node(node, "spec")?;
    }

    Ok(())
}

struct Walker<'a> {
    doc: &'a Document,
    mode: PreflightMode,
    component: String,
    /// Refs currently on the traversal stack
    visiting: BTreeSet<String>,
    /// Refs whose targets were fully validated
    validated: BTreeSet<String>,
}

impl<'a> Walker<'a> {
    fn new(doc: &'a Document, mode: PreflightMode) -> Self {
        Self {
            doc,
            mode,
            component: String::new(),
            visiting: BTreeSet::new(),
            validated: BTreeSet::new(),
        }
    }

    fn fail(&self, path: &str, cause: impl Into<String>) -> PreflightError {
        PreflightError {
            component: self.component.clone(),
            path: path.to_string(),
            cause: cause.into(),
        }
    }

    fn walk_inputs(&mut self, inputs: &Map<String, Value>, parent: &str) -> Result<(), PreflightError> {
        for (name, node) in sorted_entries(inputs) {
            self.walk_node(node, &format!("{parent}.{name}"))?;
        }
        Ok(())
    }

    fn walk_node(&mut self, node: &Value, path: &str) -> Result<(), PreflightError> {
        tracing::trace!(component = %self.component, path, "preflight node");

        let Some(obj) = node.as_object() else {
            return Err(self.fail(path, "schema node must be a JSON object"));
        };

        if let Some(reference) = obj.get("$ref") {
            let Some(reference) = reference.as_str() else {
                return Err(self.fail(path, "$ref must be a string"));
            };
            self.walk_ref(reference, path)?;
        }

        if let Some(properties) = obj.get("properties") {
            let Some(properties) = properties.as_object() else {
                return Err(self.fail(path, "properties must be a JSON object"));
            };
            for (name, child) in sorted_entries(properties) {
                let child_path = format!("{path}.{name}");
                if !child.is_object() {
                    return Err(self.fail(&child_path, "property schema must be a JSON object"));
                }
                self.walk_node(child, &child_path)?;
            }
        }

        if let Some(items) = obj.get("items") {
            let items_path = format!("{path}[]");
            if !items.is_object() {
                return Err(self.fail(&items_path, "items must be a JSON object"));
            }
            self.walk_node(items, &items_path)?;
        }

        if let Some(additional) = obj.get("additionalProperties") {
            let additional_path = format!("{path}.*");
            if !additional.is_object() {
                return Err(self.fail(&additional_path, "additionalProperties must be a JSON object"));
            }
            self.walk_node(additional, &additional_path)?;
        }

        Ok(())
    }

    fn walk_ref(&mut self, reference: &str, path: &str) -> Result<(), PreflightError> {
        let target = RefTarget::parse(reference);
        if !target.is_local() {
            return match self.mode {
                PreflightMode::SelectedComponent => Ok(()),
                PreflightMode::WholeDocument => Err(self.fail(
                    path,
                    format!("non-local ref \"{reference}\" is not supported"),
                )),
            };
        }

        if self.validated.contains(reference) || self.visiting.contains(reference) {
            return Ok(());
        }

        let doc = self.doc;
        self.visiting.insert(reference.to_string());
        match target {
            RefTarget::Type(token) => {
                let Some(node) = doc.type_node(token) else {
                    return Err(self.fail(path, format!("unresolved local type ref \"{reference}\"")));
                };
                if !node.is_object() {
                    return Err(self.fail(
                        path,
                        format!("local type ref \"{reference}\" does not resolve to a JSON object"),
                    ));
                }
                self.walk_node(node, path)?;
            }
            RefTarget::Resource(token) => {
                let Some(resource) = doc.resource(token) else {
                    return Err(self.fail(
                        path,
                        format!("unresolved local resource ref \"{reference}\""),
                    ));
                };
                self.walk_inputs(&resource.input_properties, path)?;
            }
            RefTarget::External => {}
        }
        self.visiting.remove(reference);
        self.validated.insert(reference.to_string());

        Ok(())
    }
}

//! Error types for pulumi-crd-core
//!
//! Each pipeline stage has its own error type so callers can map failures
//! onto exit codes without inspecting message text.

use std::fmt;

use thiserror::Error;

use crate::translate::SkipIssue;

/// Failure to decode the raw schema bytes into a [`crate::Document`]
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("parse input schema as JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Component selection failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectError {
    #[error("no component resources found in schema")]
    NoComponents,

    #[error("component \"{requested}\" not found; available components: {}", available.join(", "))]
    NotFound {
        requested: String,
        available: Vec<String>,
    },

    #[error("multiple components found; provide --component from: {}", available.join(", "))]
    Ambiguous { available: Vec<String> },
}

/// A structural violation found before translation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("schema preflight component \"{component}\" path \"{path}\": {cause}")]
pub struct PreflightError {
    pub component: String,
    pub path: String,
    pub cause: String,
}

/// The identity field an [`IdentityError`] refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityField {
    Group,
    Version,
    Kind,
    Plural,
    Singular,
}

impl IdentityField {
    /// Name of the command-line flag that overrides this field
    pub fn flag(&self) -> &'static str {
        match self {
            Self::Group => "--group",
            Self::Version => "--version",
            Self::Kind => "--kind",
            Self::Plural => "--plural",
            Self::Singular => "--singular",
        }
    }
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag())
    }
}

/// An identity field that fails Kubernetes naming rules
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid {field}: {rule}")]
pub struct IdentityError {
    pub field: IdentityField,
    pub rule: &'static str,
}

/// How the translator reacts to an unsupported construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The offending path is dropped and reported as a warning
    Skippable,
    /// Translation stops
    Hard,
}

/// A schema construct the translator cannot express in OpenAPI v3
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported schema component \"{component}\" path \"{path}\": {summary}")]
pub struct UnsupportedError {
    pub component: String,
    pub path: String,
    pub summary: String,
    pub severity: Severity,
}

impl UnsupportedError {
    pub fn skippable(
        component: impl Into<String>,
        path: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            component: component.into(),
            path: path.into(),
            summary: summary.into(),
            severity: Severity::Skippable,
        }
    }

    pub fn hard(
        component: impl Into<String>,
        path: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            component: component.into(),
            path: path.into(),
            summary: summary.into(),
            severity: Severity::Hard,
        }
    }

    pub fn is_skippable(&self) -> bool {
        self.severity == Severity::Skippable
    }
}

/// Translation failures
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error(transparent)]
    Unsupported(#[from] UnsupportedError),

    /// Malformed input reached during translation (unresolved or ill-shaped ref)
    #[error("schema component \"{component}\" path \"{path}\": {cause}")]
    Schema {
        component: String,
        path: String,
        cause: String,
    },

    #[error(
        "no translatable spec fields remain after skipping unsupported schema paths for component \"{component}\""
    )]
    NothingTranslatable {
        component: String,
        skipped: Vec<SkipIssue>,
    },
}

impl TranslateError {
    /// Skip issues accumulated before the failure, if the error carries any
    pub fn skipped(&self) -> &[SkipIssue] {
        match self {
            Self::NothingTranslatable { skipped, .. } => skipped,
            _ => &[],
        }
    }
}

/// CRD serialization failures
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("serialize CRD: translated spec schema is null")]
    NullSchema,

    #[error("serialize CRD: {0}")]
    Scalar(#[from] serde_json::Error),
}

pub type Result<T, E = TranslateError> = std::result::Result<T, E>;

//! CRD identity derivation
//!
//! The identity is the `(group, version, kind, plural, singular)` tuple that
//! names the generated CustomResourceDefinition. Each field is derived from
//! the package metadata and the selected token, falls back to a fixed default
//! when the derived value breaks Kubernetes naming rules, and can be replaced
//! by an explicit override.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::Document;
use crate::error::{IdentityError, IdentityField};

pub const DEFAULT_GROUP: &str = "components.platform";
pub const DEFAULT_VERSION: &str = "v1alpha1";
pub const DEFAULT_KIND: &str = "Component";
pub const DEFAULT_PLURAL: &str = "components";
pub const DEFAULT_SINGULAR: &str = "component";

/// Suffix appended to the sanitized package name to form the group
pub const GROUP_SUFFIX: &str = ".components.platform";

const MAX_LABEL_LEN: usize = 63;
const MAX_SUBDOMAIN_LEN: usize = 253;

static KIND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]*$").expect("valid kind regex"));

static DNS_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("valid label regex"));

/// Names of the generated CRD
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub group: String,
    pub version: String,
    pub kind: String,
    pub plural: String,
    pub singular: String,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            group: DEFAULT_GROUP.to_string(),
            version: DEFAULT_VERSION.to_string(),
            kind: DEFAULT_KIND.to_string(),
            plural: DEFAULT_PLURAL.to_string(),
            singular: DEFAULT_SINGULAR.to_string(),
        }
    }
}

/// User-supplied replacements for derived identity fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityOverrides {
    pub group: Option<String>,
    pub version: Option<String>,
    pub kind: Option<String>,
    pub plural: Option<String>,
    pub singular: Option<String>,
}

impl Identity {
    /// Derive defaults from the package metadata and the selected token
    pub fn derive(package_name: &str, package_version: &str, token: &str) -> Self {
        let kind = token
            .split(':')
            .nth(2)
            .filter(|segment| is_valid_kind(segment))
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_KIND.to_string());

        let singular = Some(kebab_case(&kind))
            .filter(|s| is_dns_label(s))
            .unwrap_or_else(|| DEFAULT_SINGULAR.to_string());

        let plural = Some(pluralize(&singular))
            .filter(|p| is_dns_label(p))
            .unwrap_or_else(|| DEFAULT_PLURAL.to_string());

        Self {
            group: derive_group(package_name, token),
            version: derive_version(package_version),
            kind,
            plural,
            singular,
        }
    }

    /// Replace every field the overrides set
    pub fn with_overrides(mut self, overrides: &IdentityOverrides) -> Self {
        let pairs = [
            (&mut self.group, &overrides.group),
            (&mut self.version, &overrides.version),
            (&mut self.kind, &overrides.kind),
            (&mut self.plural, &overrides.plural),
            (&mut self.singular, &overrides.singular),
        ];
        for (field, replacement) in pairs {
            if let Some(value) = replacement {
                *field = value.clone();
            }
        }
        self
    }

    /// Check every field against Kubernetes naming rules
    pub fn validate(&self) -> Result<(), IdentityError> {
        if !is_dns_subdomain(&self.group) {
            return Err(IdentityError {
                field: IdentityField::Group,
                rule: "must be a DNS subdomain-like name",
            });
        }
        if !is_dns_label(&self.version) {
            return Err(IdentityError {
                field: IdentityField::Version,
                rule: "must be a DNS label-like name",
            });
        }
        if !is_valid_kind(&self.kind) {
            return Err(IdentityError {
                field: IdentityField::Kind,
                rule: "must match ^[A-Za-z][A-Za-z0-9]*$",
            });
        }
        if !is_dns_label(&self.plural) {
            return Err(IdentityError {
                field: IdentityField::Plural,
                rule: "must be a DNS label-like name",
            });
        }
        if !is_dns_label(&self.singular) {
            return Err(IdentityError {
                field: IdentityField::Singular,
                rule: "must be a DNS label-like name",
            });
        }
        Ok(())
    }

    /// CRD object name (`<plural>.<group>`)
    pub fn crd_name(&self) -> String {
        format!("{}.{}", self.plural, self.group)
    }
}

/// Derive, override, and validate the identity for a selected component
pub fn resolve_identity(
    doc: &Document,
    token: &str,
    overrides: &IdentityOverrides,
) -> Result<Identity, IdentityError> {
    let identity = Identity::derive(&doc.name, &doc.version, token).with_overrides(overrides);
    identity.validate()?;
    tracing::debug!(
        group = %identity.group,
        version = %identity.version,
        kind = %identity.kind,
        "resolved CRD identity"
    );
    Ok(identity)
}

fn derive_group(package_name: &str, token: &str) -> String {
    let mut key = sanitize_group_key(package_name);
    if key.is_empty() {
        key = sanitize_group_key(token.split(':').next().unwrap_or_default());
    }
    if key.is_empty() {
        return DEFAULT_GROUP.to_string();
    }

    let group = format!("{key}{GROUP_SUFFIX}");
    if is_dns_subdomain(&group) {
        group
    } else {
        DEFAULT_GROUP.to_string()
    }
}

fn derive_version(package_version: &str) -> String {
    let trimmed = package_version
        .strip_prefix(['v', 'V'])
        .unwrap_or(package_version);
    let digits: String = trimmed.chars().take_while(char::is_ascii_digit).collect();

    match digits.parse::<u64>() {
        Ok(major) if major > 0 => format!("v{major}"),
        _ => DEFAULT_VERSION.to_string(),
    }
}

/// Lowercase, collapse runs of non-alphanumerics into `-`, trim dashes
pub fn sanitize_group_key(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_dash = false;

    for c in raw.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else {
            pending_dash = true;
        }
    }

    out
}

/// Convert a PascalCase kind into a kebab-case name
///
/// `FargateService` → `fargate-service`, `HTTPServer` → `http-server`,
/// `S3Bucket` → `s3-bucket`.
pub fn kebab_case(kind: &str) -> String {
    let chars: Vec<char> = kind.chars().collect();
    let mut out = String::with_capacity(kind.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            let after_lower_or_digit = prev.is_lowercase() || prev.is_ascii_digit();
            let acronym_end = prev.is_uppercase() && next.is_some_and(char::is_lowercase);
            if after_lower_or_digit || acronym_end {
                out.push('-');
            }
        }
        out.extend(c.to_lowercase());
    }

    out
}

fn pluralize(singular: &str) -> String {
    if singular.ends_with('s') {
        format!("{singular}es")
    } else {
        format!("{singular}s")
    }
}

pub fn is_valid_kind(kind: &str) -> bool {
    KIND_RE.is_match(kind)
}

pub fn is_dns_label(name: &str) -> bool {
    name.len() <= MAX_LABEL_LEN && DNS_LABEL_RE.is_match(name)
}

pub fn is_dns_subdomain(name: &str) -> bool {
    name.len() <= MAX_SUBDOMAIN_LEN && name.split('.').all(is_dns_label)
}

//! Minimal block-style YAML writer
//!
//! Output is a pure function of the [`Node`] tree: two-space indentation,
//! sequences indented under their key, `{}` / `[]` for empty collections.
//! Strings are written plain only when no YAML 1.1 or 1.2 parser could read
//! them as anything but a string; everything else is double-quoted.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::document::sorted_entries;
use crate::error::EmitError;

static PLAIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_./-]*$").expect("valid plain scalar regex"));

/// Words YAML 1.1 resolves to booleans or null
const RESERVED: [&str; 11] = [
    "true", "false", "yes", "no", "on", "off", "null", "y", "n", "nan", "inf",
];

/// Keys whose string values are always double-quoted
const QUOTED_KEYS: [&str; 1] = ["description"];

/// A YAML node with scalars already rendered
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Scalar(String),
    Mapping(Vec<(String, Node)>),
    Sequence(Vec<Node>),
}

impl Node {
    /// A string scalar, plain when unambiguous
    pub(crate) fn string(value: &str) -> Result<Self, EmitError> {
        Ok(Self::Scalar(render_str(value)?))
    }

    /// A string scalar that is always double-quoted
    pub(crate) fn quoted(value: &str) -> Result<Self, EmitError> {
        Ok(Self::Scalar(double_quoted(value)?))
    }

    pub(crate) fn bool(value: bool) -> Self {
        Self::Scalar(value.to_string())
    }

    /// Convert a JSON value, ordering mapping keys
    pub(crate) fn from_json(value: &Value) -> Result<Self, EmitError> {
        Self::from_json_under(value, None)
    }

    fn from_json_under(value: &Value, key: Option<&str>) -> Result<Self, EmitError> {
        Ok(match value {
            Value::Null => Self::Scalar("null".into()),
            Value::Bool(b) => Self::bool(*b),
            Value::Number(n) => Self::Scalar(n.to_string()),
            Value::String(s) if key.is_some_and(|k| QUOTED_KEYS.contains(&k)) => Self::quoted(s)?,
            Value::String(s) => Self::string(s)?,
            Value::Array(items) => Self::Sequence(
                items
                    .iter()
                    .map(|item| Self::from_json_under(item, None))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(map) => {
                let mut entries = Vec::with_capacity(map.len());
                for (k, v) in sorted_entries(map) {
                    entries.push((render_str(k)?, Self::from_json_under(v, Some(k.as_str()))?));
                }
                Self::Mapping(entries)
            }
        })
    }
}

/// Mapping entries built in a fixed order
#[derive(Debug, Default)]
pub(crate) struct MappingBuilder {
    entries: Vec<(String, Node)>,
}

impl MappingBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append an entry; `key` must be a plain scalar
    pub(crate) fn entry(mut self, key: &str, value: Node) -> Self {
        self.entries.push((key.to_string(), value));
        self
    }

    pub(crate) fn build(self) -> Node {
        Node::Mapping(self.entries)
    }
}

fn render_str(value: &str) -> Result<String, EmitError> {
    if is_plain(value) {
        Ok(value.to_string())
    } else {
        double_quoted(value)
    }
}

/// JSON string escaping, then `\xNN` / `\uNNNN` for characters YAML
/// rejects inside quoted scalars, such as DEL or the byte order mark
fn double_quoted(value: &str) -> Result<String, EmitError> {
    let json = serde_json::to_string(value)?;
    if json.chars().all(is_yaml_printable) {
        return Ok(json);
    }

    let mut out = String::with_capacity(json.len() + 8);
    for ch in json.chars() {
        match u32::from(ch) {
            _ if is_yaml_printable(ch) => out.push(ch),
            code @ 0..=0xFF => out.push_str(&format!("\\x{code:02X}")),
            code => out.push_str(&format!("\\u{code:04X}")),
        }
    }
    Ok(out)
}

/// YAML 1.2 `c-printable`, minus NEL and the byte order mark
fn is_yaml_printable(ch: char) -> bool {
    matches!(
        u32::from(ch),
        0x09 | 0x0A | 0x0D | 0x20..=0x7E | 0xA0..=0xD7FF | 0xE000..=0xFEFE | 0xFF00..=0xFFFD | 0x10000..
    )
}

fn is_plain(value: &str) -> bool {
    PLAIN_RE.is_match(value) && !RESERVED.iter().any(|word| word.eq_ignore_ascii_case(value))
}

/// Render a document whose root is a mapping
pub(crate) fn render_document(root: &Node) -> String {
    let mut out = String::new();
    match root {
        Node::Mapping(entries) if !entries.is_empty() => write_entries(&mut out, entries, 0, false),
        other => {
            out.push_str(&inline(other).unwrap_or_default());
            out.push('\n');
        }
    }
    out
}

fn inline(node: &Node) -> Option<String> {
    match node {
        Node::Scalar(text) => Some(text.clone()),
        Node::Mapping(entries) if entries.is_empty() => Some("{}".into()),
        Node::Sequence(items) if items.is_empty() => Some("[]".into()),
        _ => None,
    }
}

fn pad(out: &mut String, indent: usize) {
    out.extend(std::iter::repeat_n(' ', indent));
}

fn write_entries(out: &mut String, entries: &[(String, Node)], indent: usize, first_inline: bool) {
    for (i, (key, value)) in entries.iter().enumerate() {
        if i > 0 || !first_inline {
            pad(out, indent);
        }
        out.push_str(key);
        out.push(':');
        write_after_key(out, value, indent);
    }
}

fn write_after_key(out: &mut String, value: &Node, indent: usize) {
    if let Some(text) = inline(value) {
        out.push(' ');
        out.push_str(&text);
        out.push('\n');
        return;
    }
    out.push('\n');
    match value {
        Node::Mapping(entries) => write_entries(out, entries, indent + 2, false),
        Node::Sequence(items) => write_items(out, items, indent + 2),
        Node::Scalar(_) => unreachable!("scalars render inline"),
    }
}

fn write_items(out: &mut String, items: &[Node], indent: usize) {
    for item in items {
        pad(out, indent);
        out.push('-');
        if let Some(text) = inline(item) {
            out.push(' ');
            out.push_str(&text);
            out.push('\n');
            continue;
        }
        match item {
            Node::Mapping(entries) => {
                out.push(' ');
                write_entries(out, entries, indent + 2, true);
            }
            Node::Sequence(nested) => {
                out.push('\n');
                write_items(out, nested, indent + 2);
            }
            Node::Scalar(_) => unreachable!("scalars render inline"),
        }
    }
}

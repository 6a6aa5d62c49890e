//! Component selection

use crate::document::{Document, Resource};
use crate::error::SelectError;

/// The component chosen for translation
#[derive(Debug, Clone, Copy)]
pub struct SelectedComponent<'a> {
    pub token: &'a str,
    pub resource: &'a Resource,
}

/// Tokens of every component resource, in lexicographic order
pub fn component_tokens(doc: &Document) -> Vec<&str> {
    let mut tokens: Vec<&str> = doc
        .resources
        .iter()
        .filter(|(_, resource)| resource.is_component)
        .map(|(token, _)| token.as_str())
        .collect();
    tokens.sort_unstable();
    tokens
}

/// Pick the component to translate
///
/// An empty `requested` token auto-selects when exactly one component exists.
pub fn select_component<'a>(
    doc: &'a Document,
    requested: &str,
) -> Result<SelectedComponent<'a>, SelectError> {
    let tokens = component_tokens(doc);
    if tokens.is_empty() {
        return Err(SelectError::NoComponents);
    }

    let owned = || tokens.iter().map(|t| t.to_string()).collect::<Vec<_>>();

    if !requested.is_empty() {
        return match doc.resources.get_key_value(requested) {
            Some((token, resource)) if resource.is_component => Ok(SelectedComponent {
                token: token.as_str(),
                resource,
            }),
            _ => Err(SelectError::NotFound {
                requested: requested.to_string(),
                available: owned(),
            }),
        };
    }

    match tokens.as_slice() {
        [only] => {
            let (token, resource) = doc
                .resources
                .get_key_value(*only)
                .ok_or(SelectError::NoComponents)?;
            Ok(SelectedComponent {
                token: token.as_str(),
                resource,
            })
        }
        _ => Err(SelectError::Ambiguous { available: owned() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(json: &str) -> Document {
        Document::from_json_str(json).unwrap()
    }

    #[test]
    fn test_no_components() {
        let doc = doc(r#"{ "resources": { "pkg:index:Bucket": { "isComponent": false } } }"#);
        assert_eq!(
            select_component(&doc, "").unwrap_err(),
            SelectError::NoComponents
        );
        assert_eq!(
            select_component(&doc, "pkg:index:Bucket")
                .unwrap_err()
                .to_string(),
            "no component resources found in schema"
        );
    }

    #[test]
    fn test_single_component_auto_selected() {
        let doc = doc(
            r#"{ "resources": {
                "pkg:index:Bucket": {},
                "pkg:index:Thing": { "isComponent": true }
            } }"#,
        );
        let selected = select_component(&doc, "").unwrap();
        assert_eq!(selected.token, "pkg:index:Thing");
    }

    #[test]
    fn test_multiple_components_require_choice() {
        let doc = doc(
            r#"{ "resources": {
                "pkg:index:Zulu": { "isComponent": true },
                "pkg:index:Alpha": { "isComponent": true }
            } }"#,
        );
        assert_eq!(
            select_component(&doc, "").unwrap_err().to_string(),
            "multiple components found; provide --component from: pkg:index:Alpha, pkg:index:Zulu"
        );
        assert_eq!(
            select_component(&doc, "pkg:index:Zulu").unwrap().token,
            "pkg:index:Zulu"
        );
    }

    #[test]
    fn test_requested_must_be_component() {
        let doc = doc(
            r#"{ "resources": {
                "pkg:index:Alpha": { "isComponent": true },
                "pkg:index:Bucket": { "isComponent": false }
            } }"#,
        );
        assert_eq!(
            select_component(&doc, "pkg:index:Bucket")
                .unwrap_err()
                .to_string(),
            "component \"pkg:index:Bucket\" not found; available components: pkg:index:Alpha"
        );
        assert!(matches!(
            select_component(&doc, "pkg:index:Missing"),
            Err(SelectError::NotFound { .. })
        ));
    }

    #[test]
    fn test_component_tokens_sorted() {
        let doc = doc(
            r#"{ "resources": {
                "b:index:B": { "isComponent": true },
                "a:index:A": { "isComponent": true },
                "c:index:C": {}
            } }"#,
        );
        assert_eq!(component_tokens(&doc), vec!["a:index:A", "b:index:B"]);
    }
}

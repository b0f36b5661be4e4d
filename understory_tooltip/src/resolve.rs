// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Option resolution: layering defaults, declarative attributes and explicit
//! options into the [`Props`] of one instance.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde_json::Value;

use crate::dom::{Document, NodeId};
use crate::props::{Content, ContentValue, PartialProps, Props};
use crate::warning::Warning;

/// Attribute holding declarative options or content.
pub const DECLARATIVE_ATTRIBUTE: &str = "data-tippy";

/// Output of [`resolve`].
#[derive(Debug)]
pub(crate) struct Resolution {
    pub(crate) props: Props,
    pub(crate) content: ContentValue,
    pub(crate) warnings: Vec<Warning>,
}

/// Resolve the options of a new instance on `reference`.
///
/// Later layers win: `defaults`, then the `data-tippy` attribute, then `explicit`.
/// Warnings cover the attribute layer and content; `explicit` is validated once
/// per call by the caller, not once per reference.
pub(crate) fn resolve(
    doc: &Document,
    reference: NodeId,
    explicit: &PartialProps,
    defaults: &Props,
    user_agent: &str,
) -> Resolution {
    let mut warnings = Vec::new();
    let ignore_attributes = explicit
        .ignore_attributes
        .unwrap_or(defaults.ignore_attributes);

    let mut layered = PartialProps::default();
    if !ignore_attributes
        && let Some(declared) = declarative_options(doc, reference, &mut warnings)
    {
        warnings.extend(validation_warnings(&declared));
        layered = declared;
    }
    layered.merge(explicit);

    let mut props = defaults.clone();
    props.apply(&layered);
    apply_conflicts(&mut props, user_agent);

    let content = evaluate_content(doc, reference, &props.content, &mut warnings);
    Resolution {
        props,
        content,
        warnings,
    }
}

/// Read the `data-tippy` attribute of `reference`.
fn declarative_options(
    doc: &Document,
    reference: NodeId,
    warnings: &mut Vec<Warning>,
) -> Option<PartialProps> {
    let raw = doc.attribute(reference, DECLARATIVE_ATTRIBUTE)?;
    let trimmed = raw.trim();
    if !trimmed.starts_with('{') {
        return Some(PartialProps::default().content(raw));
    }
    let parsed = serde_json::from_str::<Value>(trimmed)
        .map_err(|e| e.to_string())
        .and_then(|v| PartialProps::from_json(&v).ok_or_else(|| String::from("not an object")));
    match parsed {
        Ok(partial) => Some(partial),
        Err(reason) => {
            warnings.push(Warning::MalformedAttribute { reference, reason });
            None
        }
    }
}

/// Warnings for keys a partial could not apply.
pub(crate) fn validation_warnings(partial: &PartialProps) -> Vec<Warning> {
    let unknown = partial.unrecognized().iter().map(|key| {
        if key == "target" {
            Warning::RemovedTarget
        } else {
            Warning::UnknownOption { key: key.clone() }
        }
    });
    let invalid = partial
        .invalid()
        .iter()
        .map(|key| Warning::InvalidValue { key: key.clone() });
    unknown.chain(invalid).collect()
}

/// Options that cannot be combined. An arrow, or a UC Browser user agent,
/// rules out the fill backdrop.
pub(crate) fn apply_conflicts(props: &mut Props, user_agent: &str) {
    if props.arrow || user_agent.contains("UCBrowser/") {
        props.animate_fill = false;
    }
}

/// Turn the `content` option into a renderable value.
pub(crate) fn evaluate_content(
    doc: &Document,
    reference: NodeId,
    content: &Content,
    warnings: &mut Vec<Warning>,
) -> ContentValue {
    let value = match content {
        Content::Text(text) => Some(ContentValue::Text(text.clone())),
        Content::Node(node) => Some(ContentValue::Node(*node)),
        Content::Producer(producer) => producer.produce(doc, reference),
    };
    match value {
        Some(ContentValue::Node(node)) if !doc.is_alive(node) => {
            warnings.push(Warning::ContentNotRenderable { reference });
            ContentValue::Text(String::new())
        }
        Some(value) => value,
        None => {
            warnings.push(Warning::ContentNotRenderable { reference });
            ContentValue::Text(String::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> ContentValue {
        ContentValue::Text(String::from(s))
    }

    fn fixture(attr: Option<&str>) -> (Document, NodeId) {
        let mut doc = Document::new();
        let button = doc.create_element("button");
        doc.append_child(doc.body(), button);
        if let Some(attr) = attr {
            doc.set_attribute(button, DECLARATIVE_ATTRIBUTE, attr);
        }
        (doc, button)
    }

    #[test]
    fn layers_in_order() {
        let (doc, button) = fixture(Some(r#"{"distance": 20, "offset": 5, "content": "attr"}"#));
        let mut defaults = Props::default();
        defaults.distance = 15.0;
        defaults.interactive = true;
        let explicit = PartialProps::default().offset(7.0);
        let r = resolve(&doc, button, &explicit, &defaults, "");
        assert!(r.props.interactive);
        assert_eq!(r.props.distance, 20.0);
        assert_eq!(r.props.offset, 7.0);
        assert_eq!(r.content, text("attr"));
        assert!(r.warnings.is_empty());
    }

    #[test]
    fn plain_attribute_is_content() {
        let (doc, button) = fixture(Some("  Hello there "));
        let r = resolve(&doc, button, &PartialProps::default(), &Props::default(), "");
        assert_eq!(r.content, text("  Hello there "));
    }

    #[test]
    fn ignore_attributes_skips_declarative_layer() {
        let (doc, button) = fixture(Some("Hello"));
        let explicit = PartialProps::default().ignore_attributes(true);
        let r = resolve(&doc, button, &explicit, &Props::default(), "");
        assert_eq!(r.content, text(""));
    }

    #[test]
    fn malformed_attribute_degrades() {
        let (doc, button) = fixture(Some("{ not json"));
        let r = resolve(&doc, button, &PartialProps::default(), &Props::default(), "");
        assert_eq!(r.content, text(""));
        assert!(matches!(r.warnings[..], [Warning::MalformedAttribute { .. }]));
    }

    #[test]
    fn unknown_and_removed_keys_warn() {
        let (doc, button) = fixture(Some(r#"{"foo": true, "target": ".x", "arrow": 3}"#));
        let r = resolve(&doc, button, &PartialProps::default(), &Props::default(), "");
        assert_eq!(r.warnings.len(), 3);
        assert!(r.warnings.contains(&Warning::UnknownOption { key: String::from("foo") }));
        assert!(r.warnings.contains(&Warning::RemovedTarget));
        assert!(r.warnings.contains(&Warning::InvalidValue { key: String::from("arrow") }));
        assert!(r.props.arrow);
    }

    #[test]
    fn arrow_or_uc_browser_disables_fill() {
        let (doc, button) = fixture(None);
        let r = resolve(&doc, button, &PartialProps::default(), &Props::default(), "");
        assert!(!r.props.animate_fill);

        let no_arrow = PartialProps::default().arrow(false);
        let r = resolve(&doc, button, &no_arrow, &Props::default(), "Mozilla/5.0");
        assert!(r.props.animate_fill);
        let r = resolve(&doc, button, &no_arrow, &Props::default(), "Mozilla/5.0 UCBrowser/12.1");
        assert!(!r.props.animate_fill);
    }

    #[test]
    fn producer_content_and_failures() {
        let (mut doc, button) = fixture(None);
        doc.set_attribute(button, "title", "from title");
        let producer = Content::producer(|doc, reference| {
            doc.attribute(reference, "title").map(|t| ContentValue::Text(String::from(t)))
        });
        let mut warnings = Vec::new();
        assert_eq!(
            evaluate_content(&doc, button, &producer, &mut warnings),
            text("from title")
        );
        doc.remove_attribute(button, "title");
        assert_eq!(evaluate_content(&doc, button, &producer, &mut warnings), text(""));

        let gone = doc.create_element("b");
        doc.remove(gone);
        evaluate_content(&doc, button, &Content::Node(gone), &mut warnings);
        assert_eq!(warnings.len(), 2);
    }
}

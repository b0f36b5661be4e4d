// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal selector matching for resolving tooltip targets.
//!
//! Grammar: a comma-separated list of complex selectors; each complex selector
//! is a whitespace-separated (descendant) chain of compounds; a compound is an
//! optional type or `*` followed by any number of `#id`, `.class`, `[attr]`,
//! `[attr=value]` or `[attr="value"]` parts.

use alloc::string::String;
use alloc::vec::Vec;

use crate::dom::{Document, NodeData, NodeId};

/// Failure to parse a selector string.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    /// The selector (or one of its groups) was empty.
    #[error("empty selector")]
    Empty,
    /// A character that cannot start or continue a selector part.
    #[error("unexpected `{found}` at offset {offset}")]
    Unexpected {
        /// The offending character.
        found: char,
        /// Byte offset in the input.
        offset: usize,
    },
    /// The input ended inside an attribute selector or after a prefix.
    #[error("unexpected end of selector")]
    UnexpectedEnd,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

/// A parsed selector list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Selector {
    /// Each group is a descendant chain, outermost compound first.
    groups: Vec<Vec<Compound>>,
}

impl Selector {
    pub(crate) fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut groups = Vec::new();
        let mut offset = 0;
        for group in input.split(',') {
            groups.push(parse_chain(group, offset)?);
            offset += group.len() + 1;
        }
        Ok(Self { groups })
    }

    pub(crate) fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.groups.iter().any(|chain| matches_chain(doc, node, chain))
    }
}

fn matches_chain(doc: &Document, node: NodeId, chain: &[Compound]) -> bool {
    let Some((last, ancestors)) = chain.split_last() else {
        return false;
    };
    if !matches_compound(doc, node, last) {
        return false;
    }
    // Descendant-only chains can be matched greedily from the right.
    let mut cur = doc.parent_of(node);
    for compound in ancestors.iter().rev() {
        loop {
            let Some(id) = cur else {
                return false;
            };
            cur = doc.parent_of(id);
            if matches_compound(doc, id, compound) {
                break;
            }
        }
    }
    true
}

fn matches_compound(doc: &Document, node: NodeId, c: &Compound) -> bool {
    let Some(NodeData::Element(tag)) = doc.data(node) else {
        return false;
    };
    if c.tag.as_ref().is_some_and(|t| t != tag) {
        return false;
    }
    if c.id.as_ref().is_some_and(|id| doc.attribute(node, "id") != Some(id.as_str())) {
        return false;
    }
    if !c.classes.iter().all(|class| doc.has_class(node, class)) {
        return false;
    }
    c.attributes.iter().all(|(name, value)| {
        match (doc.attribute(node, name), value) {
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == expected.as_str(),
            (None, _) => false,
        }
    })
}

fn parse_chain(group: &str, base: usize) -> Result<Vec<Compound>, SelectorError> {
    let mut chain = Vec::new();
    let mut chars = group.char_indices().peekable();
    loop {
        while chars.next_if(|(_, c)| c.is_ascii_whitespace()).is_some() {}
        if chars.peek().is_none() {
            break;
        }
        let mut compound = Compound::default();
        let mut empty = true;
        while let Some(&(i, c)) = chars.peek() {
            if c.is_ascii_whitespace() {
                break;
            }
            match c {
                '*' => {
                    chars.next();
                    if !empty {
                        return Err(SelectorError::Unexpected {
                            found: c,
                            offset: base + i,
                        });
                    }
                }
                '#' => {
                    chars.next();
                    compound.id = Some(ident(&mut chars, base)?);
                }
                '.' => {
                    chars.next();
                    compound.classes.push(ident(&mut chars, base)?);
                }
                '[' => {
                    chars.next();
                    compound.attributes.push(attribute(&mut chars, base)?);
                }
                c if is_ident_char(c) && empty => {
                    compound.tag = Some(ident(&mut chars, base)?.to_ascii_lowercase());
                }
                _ => {
                    return Err(SelectorError::Unexpected {
                        found: c,
                        offset: base + i,
                    });
                }
            }
            empty = false;
        }
        chain.push(compound);
    }
    if chain.is_empty() {
        return Err(SelectorError::Empty);
    }
    Ok(chain)
}

type Chars<'a> = core::iter::Peekable<core::str::CharIndices<'a>>;

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn ident(chars: &mut Chars<'_>, base: usize) -> Result<String, SelectorError> {
    let mut out = String::new();
    while let Some((_, c)) = chars.next_if(|(_, c)| is_ident_char(*c)) {
        out.push(c);
    }
    if out.is_empty() {
        return Err(match chars.peek() {
            Some(&(i, found)) => SelectorError::Unexpected {
                found,
                offset: base + i,
            },
            None => SelectorError::UnexpectedEnd,
        });
    }
    Ok(out)
}

fn attribute(
    chars: &mut Chars<'_>,
    base: usize,
) -> Result<(String, Option<String>), SelectorError> {
    let name = ident(chars, base)?;
    match chars.next() {
        Some((_, ']')) => Ok((name, None)),
        Some((_, '=')) => {
            let value = match chars.peek() {
                Some(&(_, quote @ ('"' | '\''))) => {
                    chars.next();
                    let mut value = String::new();
                    loop {
                        match chars.next() {
                            Some((_, c)) if c == quote => break,
                            Some((_, c)) => value.push(c),
                            None => return Err(SelectorError::UnexpectedEnd),
                        }
                    }
                    value
                }
                _ => ident(chars, base)?,
            };
            match chars.next() {
                Some((_, ']')) => Ok((name, Some(value))),
                Some((i, found)) => Err(SelectorError::Unexpected {
                    found,
                    offset: base + i,
                }),
                None => Err(SelectorError::UnexpectedEnd),
            }
        }
        Some((i, found)) => Err(SelectorError::Unexpected {
            found,
            offset: base + i,
        }),
        None => Err(SelectorError::UnexpectedEnd),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn fixture() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let nav = doc.create_element("nav");
        doc.set_attribute(nav, "id", "main");
        let button = doc.create_element("button");
        doc.add_class(button, "btn");
        doc.add_class(button, "primary");
        doc.set_attribute(button, "data-tippy", "Hello");
        let span = doc.create_element("span");
        doc.add_class(span, "btn");
        doc.append_child(doc.body(), nav);
        doc.append_child(nav, button);
        doc.append_child(doc.body(), span);
        (doc, nav, button, span)
    }

    #[test]
    fn type_class_and_id() {
        let (doc, nav, button, span) = fixture();
        assert_eq!(doc.query_selector_all("button").unwrap(), vec![button]);
        assert_eq!(doc.query_selector_all(".btn").unwrap(), vec![button, span]);
        assert_eq!(doc.query_selector_all("#main").unwrap(), vec![nav]);
        assert_eq!(doc.query_selector_all("*.primary").unwrap(), vec![button]);
    }

    #[test]
    fn attribute_presence_and_value() {
        let (doc, _, button, _) = fixture();
        assert_eq!(doc.query_selector_all("[data-tippy]").unwrap(), vec![button]);
        assert_eq!(
            doc.query_selector_all("[data-tippy=\"Hello\"]").unwrap(),
            vec![button]
        );
        assert!(doc.query_selector_all("[data-tippy=Bye]").unwrap().is_empty());
    }

    #[test]
    fn descendant_and_groups() {
        let (doc, nav, button, span) = fixture();
        assert_eq!(doc.query_selector_all("#main .btn").unwrap(), vec![button]);
        assert_eq!(doc.query_selector_all("body nav button").unwrap(), vec![button]);
        assert_eq!(
            doc.query_selector_all("span, #main").unwrap(),
            vec![nav, span]
        );
    }

    #[test]
    fn missing_matches_are_empty() {
        let (doc, ..) = fixture();
        assert!(doc.query_selector_all(".missing-class").unwrap().is_empty());
    }

    #[test]
    fn malformed_selectors_error() {
        let doc = Document::new();
        assert_eq!(doc.query_selector_all(""), Err(SelectorError::Empty));
        assert_eq!(doc.query_selector_all("a,"), Err(SelectorError::Empty));
        assert_eq!(doc.query_selector_all("[data"), Err(SelectorError::UnexpectedEnd));
        assert!(matches!(
            doc.query_selector_all("div > p"),
            Err(SelectorError::Unexpected { found: '>', .. })
        ));
        assert!(doc.query_selector_all("..x").is_err());
    }
}

//! Read-only queries for the rendering layer: how a node should be styled
//! and what clicking it means.

use serde::Serialize;

use super::reconcile::reference_target;
use crate::editing::host::TreeHost;
use crate::models::{EntityKind, InlineNode, NodeKey, Role};

/// Styling information for one node. Plain text has neither field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub kind: Option<EntityKind>,
    pub display_class: Option<&'static str>,
}

pub fn classify(node: &InlineNode) -> Classification {
    let display_class = match node {
        InlineNode::PlainText { .. } => None,
        InlineNode::EntityPunctuation {
            kind: EntityKind::WikiLink,
            ..
        } => Some("wikilink-punctuation"),
        InlineNode::EntityContent {
            kind: EntityKind::WikiLink,
            ..
        } => Some("wikilink-content"),
        InlineNode::EntityContent { kind, .. } | InlineNode::EntityPunctuation { kind, .. } => {
            Some(kind.name())
        }
        InlineNode::ReferencePlaceholder { .. } => Some("transclusion"),
    };
    Classification {
        kind: node.entity_kind(),
        display_class,
    }
}

/// What activating (clicking) an entity asks the host to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Activation {
    /// A cross-reference: `token` is the literal text, `target_id` the id.
    Reference { token: String, target_id: String },
    /// A wikilink to another page.
    Page { title: String, slug: String },
    /// Anything else is opened externally.
    External { url: String },
}

/// Dispatches on recognized entity text: reference sigil or external link.
pub fn activate_text(text: &str, sigils: &[char]) -> Activation {
    if let Some(first) = text.chars().next()
        && sigils.contains(&first)
    {
        return Activation::Reference {
            token: text.to_string(),
            target_id: text[first.len_utf8()..].to_string(),
        };
    }
    Activation::External {
        url: external_url(text),
    }
}

fn external_url(text: &str) -> String {
    if text.starts_with("www.") {
        format!("https://{text}")
    } else if !text.contains("://") && !text.starts_with("mailto:") && text.contains('@') {
        format!("mailto:{text}")
    } else {
        text.to_string()
    }
}

/// Lowercased title with whitespace runs collapsed to `-`.
pub fn page_slug(title: &str) -> String {
    title
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Activation for the node at `key`: wikilinks open pages, links are
/// references or external. Other nodes do nothing.
pub fn activate(host: &impl TreeHost, key: NodeKey, sigils: &[char]) -> Option<Activation> {
    let node = host.node(key)?;
    match node {
        InlineNode::EntityContent {
            kind: EntityKind::WikiLink,
            content,
            ..
        } => Some(Activation::Page {
            title: content.clone(),
            slug: page_slug(content),
        }),
        InlineNode::EntityPunctuation {
            kind: EntityKind::WikiLink,
            role,
            ..
        } => {
            let content = match role {
                Role::Opening => host.next_sibling(key)?,
                Role::Closing => host.previous_sibling(key)?,
            };
            activate(host, content, sigils).filter(|a| matches!(a, Activation::Page { .. }))
        }
        InlineNode::EntityContent {
            kind: EntityKind::Link,
            content,
            ..
        } => Some(match reference_target(node, sigils) {
            Some(target) => Activation::Reference {
                token: content.clone(),
                target_id: target.to_string(),
            },
            None => activate_text(content, sigils),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Document;
    use crate::models::{Format, PlaceholderContent};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const SIGILS: [char; 2] = ['/', '@'];

    fn content(kind: EntityKind, text: &str) -> InlineNode {
        InlineNode::EntityContent {
            kind,
            content: text.into(),
            format: Format::PLAIN,
        }
    }

    #[rstest]
    #[case(InlineNode::plain("x"), None)]
    #[case(content(EntityKind::Heading, "# A"), Some("heading"))]
    #[case(content(EntityKind::InlineCode, "`a`"), Some("inline-code"))]
    #[case(content(EntityKind::WikiLink, "A"), Some("wikilink-content"))]
    #[case(content(EntityKind::Bold, "*a*"), Some("bold"))]
    #[case(content(EntityKind::Link, "/a"), Some("link"))]
    #[case(content(EntityKind::Hashtag, "#a"), Some("hashtag"))]
    #[case(InlineNode::placeholder("a", PlaceholderContent::Pending), Some("transclusion"))]
    fn display_classes(#[case] node: InlineNode, #[case] expected: Option<&str>) {
        assert_eq!(classify(&node).display_class, expected);
    }

    #[test]
    fn punctuation_has_its_own_class() {
        let node = InlineNode::EntityPunctuation {
            kind: EntityKind::WikiLink,
            role: Role::Opening,
            text: "[[".into(),
            format: Format::PLAIN,
        };
        assert_eq!(
            classify(&node),
            Classification {
                kind: Some(EntityKind::WikiLink),
                display_class: Some("wikilink-punctuation"),
            }
        );
    }

    #[rstest]
    #[case("/my-favorite-beach", Activation::Reference { token: "/my-favorite-beach".into(), target_id: "my-favorite-beach".into() })]
    #[case("@gordon/notes", Activation::Reference { token: "@gordon/notes".into(), target_id: "gordon/notes".into() })]
    #[case("www.example.com", Activation::External { url: "https://www.example.com".into() })]
    #[case("https://example.com/a", Activation::External { url: "https://example.com/a".into() })]
    #[case("ben@example.com", Activation::External { url: "mailto:ben@example.com".into() })]
    fn activation_dispatch(#[case] text: &str, #[case] expected: Activation) {
        assert_eq!(activate_text(text, &SIGILS), expected);
    }

    #[test]
    fn slugs_collapse_whitespace() {
        assert_eq!(page_slug("Ben  Follington\tNotes"), "ben-follington-notes");
    }

    #[test]
    fn wikilink_punctuation_activates_its_page() {
        let doc = Document::from_blocks(vec![vec![
            InlineNode::EntityPunctuation {
                kind: EntityKind::WikiLink,
                role: Role::Opening,
                text: "[[".into(),
                format: Format::PLAIN,
            },
            content(EntityKind::WikiLink, "Ben Follington"),
            InlineNode::plain(" x"),
        ]]);
        let open = doc.children(doc.blocks()[0])[0];
        let plain = doc.children(doc.blocks()[0])[2];

        assert_eq!(
            activate(&doc, open, &SIGILS),
            Some(Activation::Page {
                title: "Ben Follington".into(),
                slug: "ben-follington".into(),
            })
        );
        assert_eq!(activate(&doc, plain, &SIGILS), None);
    }
}

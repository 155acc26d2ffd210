//! Structural checks every settled tree must pass.

use crate::editing::host::TreeHost;
use crate::engine::Engine;
use crate::engine::guard::is_valid;
use crate::engine::pass::match_context;
use crate::engine::reconcile::{references, trailing_placeholders};
use crate::models::{BlockId, EntityKind, InlineNode};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("block {block}: placeholder is followed by {text:?}")]
    PlaceholderNotTrailing { block: BlockId, text: String },
    #[error("block {block}: placeholders {found:?} do not mirror references {expected:?}")]
    PlaceholderMismatch {
        block: BlockId,
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("block {block}: typed node {text:?} is no longer valid")]
    InvalidEntity { block: BlockId, text: String },
    #[error("block {block}: plain text {text:?} still contains a {kind} match")]
    UnrecognizedMatch {
        block: BlockId,
        text: String,
        kind: EntityKind,
    },
    #[error("block {block}: adjacent plain nodes {left:?} and {right:?}")]
    UnmergedPlain {
        block: BlockId,
        left: String,
        right: String,
    },
}

/// Every violation in the tree; empty for a settled tree.
pub fn check<R>(host: &impl TreeHost, engine: &Engine<R>) -> Result<(), Vec<Violation>> {
    let mut violations = Vec::new();
    for block in host.blocks() {
        check_block(host, engine, block, &mut violations);
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

fn check_block<R>(host: &impl TreeHost, engine: &Engine<R>, block: BlockId, violations: &mut Vec<Violation>) {
    let children = host.children(block);
    let mut seen_placeholder = false;
    let mut previous: Option<&InlineNode> = None;

    for key in &children {
        let Some(node) = host.node(*key) else {
            continue;
        };
        if node.is_placeholder() {
            seen_placeholder = true;
        } else if seen_placeholder {
            violations.push(Violation::PlaceholderNotTrailing {
                block,
                text: node.text().to_string(),
            });
        }

        if node.is_entity() && !is_valid(host, engine.grammars(), *key) {
            violations.push(Violation::InvalidEntity {
                block,
                text: node.text().to_string(),
            });
        }

        if node.is_plain() {
            let context = match_context(host, *key, true);
            if let Some(found) = engine.grammars().first_match(node.text(), &context) {
                violations.push(Violation::UnrecognizedMatch {
                    block,
                    text: node.text().to_string(),
                    kind: found.grammar.kind(),
                });
            }
            if let Some(left) = previous
                && left.is_plain()
                && left.format() == node.format()
            {
                violations.push(Violation::UnmergedPlain {
                    block,
                    left: left.text().to_string(),
                    right: node.text().to_string(),
                });
            }
        }
        previous = Some(node);
    }

    if host.capabilities().placeholders {
        let expected = references(host, block, engine.reference_sigils());
        let found: Vec<String> = trailing_placeholders(host, block)
            .into_iter()
            .map(|(_, id)| id)
            .collect();
        if expected != found {
            violations.push(Violation::PlaceholderMismatch {
                block,
                expected,
                found,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Document;
    use crate::models::{Format, PlaceholderContent, Role};
    use crate::references::NoReferences;
    use pretty_assertions::assert_eq;

    fn engine() -> Engine<NoReferences> {
        Engine::standard(NoReferences).unwrap()
    }

    #[test]
    fn settled_documents_pass() {
        let engine = engine();
        let mut doc = Document::from_text("Visit [[Ben]] and /beach\n# Title #tag");
        let dirty = doc.all_dirty();
        engine.settle(&mut doc, &dirty);
        assert_eq!(check(&doc, &engine), Ok(()));
    }

    #[test]
    fn missing_placeholders_are_reported() {
        let engine = engine();
        let doc = Document::from_blocks(vec![vec![InlineNode::EntityContent {
            kind: EntityKind::Link,
            content: "/beach".into(),
            format: Format::PLAIN,
        }]]);
        let block = doc.blocks()[0];
        assert_eq!(
            check(&doc, &engine),
            Err(vec![Violation::PlaceholderMismatch {
                block,
                expected: vec!["beach".into()],
                found: vec![],
            }])
        );
    }

    #[test]
    fn unsettled_documents_fail() {
        let engine = engine();
        let doc = Document::from_blocks(vec![vec![
            InlineNode::plain("see /beach"),
            InlineNode::plain(" later"),
            InlineNode::EntityPunctuation {
                kind: EntityKind::WikiLink,
                role: Role::Opening,
                text: "[[".into(),
                format: Format::PLAIN,
            },
            InlineNode::placeholder("x", PlaceholderContent::Pending),
            InlineNode::plain("tail"),
        ]]);

        let violations = check(&doc, &engine).unwrap_err();
        let block = doc.blocks()[0];

        assert_eq!(
            violations,
            vec![
                Violation::UnrecognizedMatch {
                    block,
                    text: "see /beach".into(),
                    kind: EntityKind::Link,
                },
                Violation::UnmergedPlain {
                    block,
                    left: "see /beach".into(),
                    right: " later".into(),
                },
                Violation::InvalidEntity {
                    block,
                    text: "[[".into(),
                },
                Violation::PlaceholderNotTrailing {
                    block,
                    text: "tail".into(),
                },
            ]
        );
    }
}

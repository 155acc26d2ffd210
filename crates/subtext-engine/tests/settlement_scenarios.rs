use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use rstest::rstest;
use subtext_engine::parsing::{Anchor, Grammar, GrammarError, GrammarSet};
use subtext_engine::snapshot::{invariants, render_block, render_document};
use subtext_engine::{
    Activation, Cmd, Document, Editor, Engine, EntityKind, HostCapabilities, InMemoryResolver,
    InlineNode, NodeKey, Point, ReferenceResolver, Resolution, Selection, SetupError, TreeHost,
};

fn resolver() -> InMemoryResolver {
    InMemoryResolver::new()
        .with("my-favorite-beach", "Sand and sea.")
        .with("counterintuitive-ideas", "Less is more.")
        .with("guide-to-gardening-ideas", "Water daily.")
}

fn editor(text: &str) -> Editor<InMemoryResolver> {
    let engine = Engine::standard(resolver()).unwrap();
    Editor::new(Document::from_text(text), engine).unwrap()
}

fn first_block<R: ReferenceResolver>(editor: &Editor<R>) -> String {
    let doc = editor.document();
    render_block(doc, doc.blocks()[0])
}

fn child<R: ReferenceResolver>(editor: &Editor<R>, index: usize) -> NodeKey {
    let doc = editor.document();
    doc.children(doc.blocks()[0])[index]
}

fn assert_settled<R: ReferenceResolver>(editor: &Editor<R>) {
    if let Err(violations) = invariants::check(editor.document(), editor.engine()) {
        panic!(
            "unsettled tree:\n{}\n{violations:#?}",
            render_document(editor.document())
        );
    }
}

/// Deletes the whole text of one node.
fn clear<R: ReferenceResolver>(editor: &mut Editor<R>, key: NodeKey) {
    let len = editor.document().node(key).unwrap().char_len();
    editor
        .apply(Cmd::DeleteRange {
            from: Point::new(key, 0),
            to: Point::new(key, len),
        })
        .unwrap();
}

#[test]
fn wikilink_settles_into_a_triplet() {
    let editor = editor("Visit [[Ben Follington]] today");

    insta::assert_snapshot!(first_block(&editor), @r#"
    text "Visit "
    wikilink:open "[["
    wikilink "Ben Follington"
    wikilink:close "]]"
    text " today"
    "#);
    assert_settled(&editor);
}

#[test]
fn deleting_the_closer_demotes_and_merges() {
    let mut editor = editor("Visit [[Ben Follington]] today");
    let closer = child(&editor, 3);

    let patch = editor
        .apply(Cmd::DeleteRange {
            from: Point::new(closer, 0),
            to: Point::new(closer, 2),
        })
        .unwrap();

    assert_eq!(patch.demoted, 3);
    insta::assert_snapshot!(first_block(&editor), @r#"text "Visit [[Ben Follington today""#);
    let merged = child(&editor, 0);
    assert_eq!(patch.selection, Some(Selection::caret(Point::new(merged, 22))));
    assert_settled(&editor);
}

#[test]
fn deleting_all_wikilink_content_demotes_the_group() {
    let mut editor = editor("a [[b]] c");
    let content = child(&editor, 2);

    clear(&mut editor, content);

    insta::assert_snapshot!(first_block(&editor), @r#"text "a [[]] c""#);
    assert_settled(&editor);
}

#[test]
fn references_get_trailing_placeholders() {
    let editor = editor("See /my-favorite-beach and /counterintuitive-ideas");

    insta::assert_snapshot!(first_block(&editor), @r#"
    text "See "
    link "/my-favorite-beach"
    text " and "
    link "/counterintuitive-ideas"
    ref "my-favorite-beach" ready "Sand and sea."
    ref "counterintuitive-ideas" ready "Less is more."
    "#);
    assert_settled(&editor);
}

#[test]
fn removing_a_reference_removes_exactly_its_placeholder() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&calls);
    let counting = move |id: &str| {
        log.borrow_mut().push(id.to_string());
        resolver().resolve(id)
    };
    let engine = Engine::standard(counting).unwrap();
    let mut editor = Editor::new(
        Document::from_text("See /my-favorite-beach and /counterintuitive-ideas"),
        engine,
    )
    .unwrap();
    let survivor = child(&editor, 5);
    assert_eq!(calls.borrow().len(), 2);

    let first_reference = child(&editor, 1);
    clear(&mut editor, first_reference);

    let doc = editor.document();
    let children = doc.children(doc.blocks()[0]);
    assert_eq!(children.last(), Some(&survivor));
    assert_eq!(
        doc.node(survivor),
        Some(&InlineNode::placeholder(
            "counterintuitive-ideas",
            Resolution::Ready("Less is more.".into()).into()
        ))
    );
    assert_eq!(calls.borrow().len(), 2, "survivor was resolved again");
    insta::assert_snapshot!(first_block(&editor), @r#"
    text "See  and "
    link "/counterintuitive-ideas"
    ref "counterintuitive-ideas" ready "Less is more."
    "#);
    assert_settled(&editor);
}

#[test]
fn removing_a_reference_reports_one_removal() {
    let mut editor = editor("See /my-favorite-beach and /counterintuitive-ideas");
    let first_reference = child(&editor, 1);
    let len = editor.document().node(first_reference).unwrap().char_len();

    let patch = editor
        .apply(Cmd::DeleteRange {
            from: Point::new(first_reference, 0),
            to: Point::new(first_reference, len),
        })
        .unwrap();

    assert_eq!(patch.placeholders_removed, 1);
    assert_eq!(patch.placeholders_added, 0);
}

#[test]
fn retyping_a_deleted_bracket_restores_the_same_shape() {
    let mut typed = editor("");
    typed.type_text("[[Example]]").unwrap();
    let expected = first_block(&typed);

    let mut repaired = editor("");
    repaired.type_text("[[Example]]").unwrap();
    let closer = child(&repaired, 2);
    repaired
        .apply(Cmd::DeleteRange {
            from: Point::new(closer, 1),
            to: Point::new(closer, 2),
        })
        .unwrap();
    insta::assert_snapshot!(first_block(&repaired), @r#"text "[[Example]""#);
    repaired.type_text("]").unwrap();

    assert_eq!(first_block(&repaired), expected);
    assert_settled(&repaired);
}

#[test]
fn settling_twice_changes_nothing() {
    let mut editor = editor("# Heading\nVisit [[Ben]] and /my-favorite-beach #tag\n*bold* `code` www.example.com");
    editor.type_text(" more").unwrap();
    let before = render_document(editor.document());

    let mut doc = editor.document().clone();
    let dirty = doc.all_dirty();
    let patch = editor.engine().settle(&mut doc, &dirty);

    assert!(patch.is_noop(), "{patch:?}");
    assert_eq!(render_document(&doc), before);
}

#[test]
fn one_edit_recognizes_every_entity_on_the_line() {
    let mut editor = editor("");
    let at = editor.document().caret().unwrap();

    let patch = editor
        .apply(Cmd::InsertText {
            at,
            text: "[[a]][[b]] and #tag `x` /my-favorite-beach".into(),
        })
        .unwrap();

    assert_eq!(patch.recognized, 5);
    assert_eq!(patch.placeholders_added, 1);
    assert_settled(&editor);
}

#[test]
fn offsets_are_characters_not_bytes() {
    let editor = editor("Café ☕ #thé [[Crème brûlée]]");

    insta::assert_snapshot!(first_block(&editor), @r##"
    text "Café ☕ "
    hashtag "#thé"
    text " "
    wikilink:open "[["
    wikilink "Crème brûlée"
    wikilink:close "]]"
    "##);
}

#[test]
fn earlier_grammars_claim_their_spans() {
    let editor = editor("# Title with #tag\n`[[not a link]]` and [[a link]]");
    insta::assert_snapshot!(render_document(editor.document()), @r##"
    heading "# Title with #tag"
    --
    inline-code "`[[not a link]]`"
    text " and "
    wikilink:open "[["
    wikilink "a link"
    wikilink:close "]]"
    "##);
}

#[rstest]
#[case("Notes on [[Gardening]] with *care*")]
#[case("see /guide-to-gardening-ideas and ben@example.com then #garden")]
#[case("`code` *bold* #tag www.example.com @gordon/notes")]
#[case("[[a]][[b]] [[c")]
fn every_keystroke_leaves_a_settled_tree(#[case] text: &str) {
    let mut editor = editor("");
    for c in text.chars() {
        editor.type_text(&c.to_string()).unwrap();
        assert_settled(&editor);
    }
    assert_eq!(editor.document().to_text(), text);
}

#[rstest]
#[case("Visit [[Ben Follington]] today", 0, 10)]
#[case("Visit [[Ben Follington]] today", 7, 8)]
#[case("Visit [[Ben Follington]] today", 20, 30)]
#[case("*bold* and #tag", 3, 12)]
#[case("See /my-favorite-beach and /counterintuitive-ideas", 8, 30)]
fn every_deletion_leaves_a_settled_tree(#[case] text: &str, #[case] start: usize, #[case] end: usize) {
    let mut editor = editor(text);
    let doc = editor.document();
    let block = doc.blocks()[0];

    // Find the nodes holding the block offsets `start` and `end`.
    let locate = |offset: usize| {
        let mut seen = 0;
        for key in doc.children(block) {
            let len = doc.node(key).unwrap().char_len();
            if offset <= seen + len && !doc.node(key).unwrap().is_placeholder() {
                return Point::new(key, offset - seen);
            }
            seen += len;
        }
        panic!("offset {offset} outside block");
    };
    let from = locate(start);
    let to = locate(end);

    editor.apply(Cmd::DeleteRange { from, to }).unwrap();

    let mut expected: Vec<char> = text.chars().collect();
    expected.drain(start..end);
    assert_eq!(editor.document().to_text(), expected.into_iter().collect::<String>());
    assert_settled(&editor);
}

#[test]
fn splitting_a_block_reconciles_both_halves() {
    let mut editor = editor("See /my-favorite-beach and /counterintuitive-ideas");
    let middle = child(&editor, 2);

    editor
        .apply(Cmd::SplitBlock {
            at: Point::new(middle, 1),
        })
        .unwrap();

    insta::assert_snapshot!(render_document(editor.document()), @r#"
    text "See "
    link "/my-favorite-beach"
    text " "
    ref "my-favorite-beach" ready "Sand and sea."
    --
    text "and "
    link "/counterintuitive-ideas"
    ref "counterintuitive-ideas" ready "Less is more."
    "#);
    assert_settled(&editor);
}

/// Presses Enter at `at` and checks the caret opens the new line.
fn press_enter<R: ReferenceResolver>(editor: &mut Editor<R>, at: Point) {
    editor.apply(Cmd::Select(Selection::caret(at))).unwrap();
    let patch = editor.type_text("\n").unwrap();

    let doc = editor.document();
    let second = doc.blocks()[1];
    let opening = doc.children(second)[0];
    assert_eq!(patch.selection, Some(Selection::caret(Point::new(opening, 0))));
    assert_eq!(doc.caret(), Some(Point::new(opening, 0)));
    assert_settled(editor);
}

#[test]
fn enter_after_a_reference_keeps_its_placeholder() {
    let mut editor = editor("see /my-favorite-beach");
    let link = child(&editor, 1);
    let placeholder = child(&editor, 2);

    press_enter(&mut editor, Point::new(link, 18));

    insta::assert_snapshot!(render_document(editor.document()), @r#"
    text "see "
    link "/my-favorite-beach"
    ref "my-favorite-beach" ready "Sand and sea."
    --
    text ""
    "#);
    assert_eq!(child(&editor, 2), placeholder);

    let patch = editor.type_text("x").unwrap();
    assert_eq!(patch.placeholders_added, 0);
    let doc = editor.document();
    insta::assert_snapshot!(render_block(doc, doc.blocks()[1]), @r#"text "x""#);
    assert_settled(&editor);
}

#[test]
fn enter_inside_a_wikilink_demotes_both_halves() {
    let mut editor = editor("Visit [[Ben]] today");
    let content = child(&editor, 2);

    press_enter(&mut editor, Point::new(content, 1));

    insta::assert_snapshot!(render_document(editor.document()), @r#"
    text "Visit [[B"
    --
    text "en]] today"
    "#);
}

#[test]
fn enter_inside_a_heading_leaves_plain_text_below() {
    let mut editor = editor("# Title here");
    let heading = child(&editor, 0);

    press_enter(&mut editor, Point::new(heading, 7));

    insta::assert_snapshot!(render_document(editor.document()), @r##"
    heading "# Title"
    --
    text " here"
    "##);
}

#[test]
fn pending_references_complete_later() {
    let mut pending = resolver();
    pending.mark_pending("later");
    let engine = Engine::standard(pending).unwrap();
    let mut editor = Editor::new(Document::from_text("read /later\nand /my-favorite-beach"), engine).unwrap();
    insta::assert_snapshot!(first_block(&editor), @r#"
    text "read "
    link "/later"
    ref "later" pending
    "#);

    editor.resolver_mut().insert("later", "Arrived.");
    let patch = editor.complete_reference("later");

    assert_eq!(patch.placeholders_resolved, 1);
    assert_eq!(patch.changed_blocks, vec![editor.document().blocks()[0]]);
    insta::assert_snapshot!(first_block(&editor), @r#"
    text "read "
    link "/later"
    ref "later" ready "Arrived."
    "#);
}

#[test]
fn unknown_references_get_a_sentinel() {
    let editor = editor("see /nowhere");
    insta::assert_snapshot!(first_block(&editor), @r#"
    text "see "
    link "/nowhere"
    ref "nowhere" unavailable
    "#);
}

#[test]
fn activation_follows_entity_text() {
    let editor = editor("[[Ben Follington]] /my-favorite-beach www.example.com");

    assert_eq!(
        editor.activate(child(&editor, 0)),
        Some(Activation::Page {
            title: "Ben Follington".into(),
            slug: "ben-follington".into(),
        })
    );
    assert_eq!(
        editor.activate(child(&editor, 4)),
        Some(Activation::Reference {
            token: "/my-favorite-beach".into(),
            target_id: "my-favorite-beach".into(),
        })
    );
    assert_eq!(
        editor.activate(child(&editor, 6)),
        Some(Activation::External {
            url: "https://www.example.com".into(),
        })
    );
    assert_eq!(editor.activate(child(&editor, 3)), None);
    assert_eq!(
        editor.classify(child(&editor, 6)).and_then(|c| c.display_class),
        Some("link")
    );
}

#[test]
fn hosts_missing_node_types_are_refused() {
    let doc = Document::from_text("x").with_capabilities(HostCapabilities::default());
    let err = Editor::new(doc, Engine::standard(resolver()).unwrap()).unwrap_err();
    assert!(matches!(err, SetupError::UnregisteredKind(EntityKind::Heading)));
    assert_eq!(err.to_string(), "the host has no node type registered for heading");
}

#[test]
fn ambiguous_delimiters_are_refused_at_registration() {
    let mut grammars = GrammarSet::with_kinds(&[EntityKind::WikiLink]).unwrap();
    let rival = Grammar::single(EntityKind::Bold, "double-bracket", r"\[\[[^\]]+", Anchor::Anywhere)
        .unwrap()
        .claiming("[[", "");

    let err = grammars.register(rival).unwrap_err();

    assert!(matches!(
        err,
        GrammarError::DelimiterConflict {
            first: EntityKind::WikiLink,
            second: EntityKind::Bold,
            ..
        }
    ));
    assert!(matches!(SetupError::from(err), SetupError::Grammar(_)));
}

#[test]
fn configured_grammars_limit_recognition() {
    let grammars = GrammarSet::with_kinds(&[EntityKind::WikiLink, EntityKind::Hashtag]).unwrap();
    let doc = Document::from_text("*bold* [[page]] #tag /ref").with_capabilities(HostCapabilities {
        entity_kinds: [EntityKind::WikiLink, EntityKind::Hashtag].into_iter().collect(),
        placeholders: false,
    });
    let editor = Editor::new(doc, Engine::new(grammars, resolver())).unwrap();

    insta::assert_snapshot!(first_block(&editor), @r##"
    text "*bold* "
    wikilink:open "[["
    wikilink "page"
    wikilink:close "]]"
    text " "
    hashtag "#tag"
    text " /ref"
    "##);
}

//! Engine-level checks: one call, one outcome, one completion node,
//! with context metadata that survives serialization.

use javelin_assist::{CompletionStatus, complete};
use javelin_common::options::LanguageOptions;
use javelin_parser::CompletionKind;
use javelin_parser::ast::ModifierFlags;

const SOURCES: &[&str] = &[
    "class A { int x = compute(1, 2); }",
    "class B { void m(String s) { if (s != null) { s.length(); } } }",
];

#[test]
fn every_cursor_yields_one_node_and_context() {
    for source in SOURCES {
        for cursor in -1..source.len() as i32 {
            let outcome = complete(source, cursor, &LanguageOptions::default());
            assert_eq!(
                outcome.status,
                CompletionStatus::Completed,
                "cursor {cursor} in {source:?}"
            );
            assert!(outcome.node.is_some());

            let reachable = outcome.arena.reachable_completion_nodes(outcome.root);
            assert_eq!(
                reachable,
                vec![outcome.node],
                "cursor {cursor} in {source:?}"
            );

            let context = outcome.context.expect("context for a valid cursor");
            let insertion = (cursor + 1) as u32;
            assert!(
                context.replace_range.start <= insertion
                    && insertion <= context.replace_range.end,
                "replace range {:?} does not bracket cursor {cursor} in {source:?}",
                context.replace_range
            );
            assert!(context.replace_range.end <= source.len() as u32);
        }
    }
}

#[test]
fn repeated_calls_agree() {
    let source = "class A { void m() { this.fo; } }";
    let cursor = source.find(';').map(|i| i as i32 - 1).unwrap();
    let first = complete(source, cursor, &LanguageOptions::default());
    let second = complete(source, cursor, &LanguageOptions::default());
    assert_eq!(first.status, second.status);
    assert_eq!(first.context, second.context);
    assert_eq!(first.diagnostics, second.diagnostics);
}

#[test]
fn member_access_context_carries_receiver_and_modifiers() {
    let source = "class A { private void m() { this.fo; } }";
    let cursor = source.find(';').map(|i| i as i32 - 1).unwrap();
    let outcome = complete(source, cursor, &LanguageOptions::default());
    let context = outcome.context.expect("context");

    assert_eq!(context.kind, CompletionKind::MemberAccess);
    assert_eq!(context.prefix, "fo");
    assert_eq!(context.receiver_text.as_deref(), Some("this"));
    let receiver_range = context.receiver_range.expect("receiver range");
    assert_eq!(
        &source[receiver_range.start as usize..receiver_range.end as usize],
        "this"
    );
    let word = context.replace_range;
    assert_eq!(&source[word.start as usize..word.end as usize], "fo");
    assert_eq!(context.enclosing_modifiers, ModifierFlags::PRIVATE);
    assert_eq!(context.enclosing_modifiers.names(), vec!["private"]);
}

#[test]
fn cursor_inside_multibyte_identifier_char_degrades() {
    // Insertion offset 7 lands between the two bytes of `Ä`.
    let source = "class \u{c4}x {}";
    let outcome = complete(source, 6, &LanguageOptions::default());
    assert_eq!(outcome.status, CompletionStatus::Completed);
    assert!(outcome.node.is_some());
    let context = outcome.context.expect("context");
    assert_eq!(context.prefix, "");
    assert!(context.replace_range.start <= 7 && 7 <= context.replace_range.end);
}

#[test]
fn open_call_reports_sibling_arguments() {
    let source = "class A { void m() { obj.call(x, ";
    let outcome = complete(source, source.len() as i32 - 1, &LanguageOptions::default());
    let context = outcome.context.expect("context");
    assert_eq!(context.kind, CompletionKind::MessageSend);
    assert_eq!(context.receiver_text.as_deref(), Some("obj"));
    assert_eq!(context.argument_count, Some(1));
}

#[test]
fn keyword_position_spells_candidates() {
    let source = "class X { ";
    let outcome = complete(source, source.len() as i32 - 1, &LanguageOptions::default());
    let context = outcome.context.expect("context");
    assert_eq!(context.kind, CompletionKind::Keyword);
    for expected in ["class", "private", "static", "void"] {
        assert!(
            context.keywords.iter().any(|k| k == expected),
            "missing {expected:?} in {:?}",
            context.keywords
        );
    }
}

#[test]
fn context_round_trips_through_json() {
    let source = "class A { private void m() { this.fo; } }";
    let cursor = source.find(';').map(|i| i as i32 - 1).unwrap();
    let outcome = complete(source, cursor, &LanguageOptions::default());
    let context = outcome.context.clone().expect("context");

    let json = serde_json::to_string(&context).expect("serialize context");
    let back: javelin_assist::CompletionContext =
        serde_json::from_str(&json).expect("deserialize context");
    assert_eq!(back, context);

    // The whole outcome (tree included) is serializable for transport.
    serde_json::to_value(&outcome).expect("serialize outcome");
}

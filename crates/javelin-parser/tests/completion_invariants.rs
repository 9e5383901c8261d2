//! Whole-input sweeps: drop the cursor at every byte offset of sources
//! built from nested blocks, ifs, try/catch, switch, generics and
//! annotations, and check the invariants that must hold for every
//! completion parse regardless of position.

use javelin_common::options::LanguageOptions;
use javelin_parser::{CompletionKind, CoordinatorState, Node, ParserState};

const SOURCES: &[&str] = &[
    "class A { int x = 1; }",
    "class B { void m(int a, String b) { if (a > 0) { m(a - 1, b); } else { return; } } }",
    "class C { void m() { try { int[] v = new int[3]; v[0] = 1; } \
     catch (RuntimeException | Error e) { throw e; } finally { done(); } } }",
    "class D { void m(int k) { switch (k) { case 1: break; default: k++; } \
     while (k < 10) { k += 2; } } }",
    "@Anno(value = 1) class E<T extends Comparable<T>> { @Anno java.util.List<T> xs; \
     E() { super(); } void each() { for (T t : xs) { t.hashCode(); } \
     outer: do { continue outer; } while (false); } }",
    "class F { String s = \"a b\"; char c = 'x'; double d = 1.5e3; }",
    "import java.util.List; class G { List<String> g() { return null; } }",
];

#[test]
fn every_offset_yields_exactly_one_attached_node() {
    for source in SOURCES {
        for insertion in 0..=source.len() as u32 {
            let mut state =
                ParserState::for_completion(source, insertion, LanguageOptions::default());
            state.parse();

            let node = state.completion_node();
            assert!(
                node.is_some(),
                "no completion node at {insertion} in {source:?}"
            );
            let reachable = state.arena.reachable_completion_nodes(state.root);
            assert_eq!(
                reachable,
                vec![node],
                "completion node not singular at {insertion} in {source:?}"
            );

            let Some(Node::Completion(data)) = state.arena.get(node) else {
                panic!("node index does not hold a completion node");
            };
            assert!(
                !data.orphan,
                "completion node left unattached at {insertion} in {source:?}"
            );
        }
    }
}

#[test]
fn completion_range_brackets_the_insertion_point() {
    for source in SOURCES {
        for insertion in 0..=source.len() as u32 {
            let mut state =
                ParserState::for_completion(source, insertion, LanguageOptions::default());
            state.parse();

            let node = state.completion_node();
            let Some(Node::Completion(data)) = state.arena.get(node) else {
                panic!("no completion node at {insertion} in {source:?}");
            };
            let range = data.base.range();
            assert!(
                range.start <= insertion && insertion <= range.end,
                "range {range:?} does not bracket insertion {insertion} in {source:?}"
            );
            assert!(
                range.end <= source.len() as u32,
                "range {range:?} exceeds the source in {source:?}"
            );
            assert_eq!(
                data.prefix.len() as u32,
                insertion - range.start,
                "prefix {:?} does not cover the span before the cursor",
                data.prefix
            );
        }
    }
}

#[test]
fn marker_stack_balances_on_every_parse() {
    for source in SOURCES {
        for insertion in 0..=source.len() as u32 {
            let mut state =
                ParserState::for_completion(source, insertion, LanguageOptions::default());
            state.parse();

            let session = state.completion_session().expect("completion session");
            assert_eq!(
                session.markers.pushes(),
                session.markers.pops(),
                "marker pushes != pops at {insertion} in {source:?}"
            );
            assert_eq!(
                session.markers.depth(),
                0,
                "markers left on the stack at {insertion} in {source:?}"
            );
            assert_eq!(session.coordinator.state(), CoordinatorState::Done);
        }
    }
}

#[test]
fn non_completion_parse_of_sweep_sources_is_clean() {
    // The sweep sources are all well-formed; the base parser must agree.
    for source in SOURCES {
        let mut state = ParserState::new(source, LanguageOptions::default());
        state.parse();
        assert!(
            state.diagnostics.is_empty(),
            "diagnostics {:?} for {source:?}",
            state.diagnostics
        );
        assert!(state.completion_session().is_none());
        assert!(state.completion_node().is_none());
    }
}

#[test]
fn casts_and_static_initializers_parse_cleanly() {
    let source = "class H { static { counter = 0; } \
         int f(Object o) { int v = (int) o; return v; } }";
    let mut state = ParserState::new(source, LanguageOptions::default());
    state.parse();
    assert!(
        state.diagnostics.is_empty(),
        "diagnostics {:?}",
        state.diagnostics
    );
}

#[test]
fn keyword_candidates_are_spellable() {
    // Any keyword the synthesizer offers must have a surface spelling.
    for source in SOURCES {
        for insertion in 0..=source.len() as u32 {
            let mut state =
                ParserState::for_completion(source, insertion, LanguageOptions::default());
            state.parse();
            let node = state.completion_node();
            let Some(Node::Completion(data)) = state.arena.get(node) else {
                continue;
            };
            for &keyword in &data.keywords {
                assert!(
                    javelin_scanner::keyword_to_text(keyword).is_some(),
                    "unspellable keyword candidate {keyword:?} ({:?})",
                    data.kind
                );
            }
            if data.kind == CompletionKind::ClassLiteralAccess {
                assert_eq!(data.keywords, vec![javelin_scanner::SyntaxKind::ClassKeyword]);
            }
        }
    }
}

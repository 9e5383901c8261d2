//! End-to-end completion parses over cursor positions that exercise
//! each recognizer of the synthesizer chain, plus round-trip checks
//! that a proposal substituted over the completion range reparses
//! cleanly.

use javelin_common::options::LanguageOptions;
use javelin_common::span::TextRange;
use javelin_parser::completion::CompletionData;
use javelin_parser::{CompletionKind, Node, NodeIndex, ParserState};
use javelin_scanner::SyntaxKind;

/// Completion parse with the caret after the last character.
fn complete_at_end(source: &str) -> (ParserState, NodeIndex) {
    complete_at(source, source.len() as u32)
}

/// Completion parse with text insertion at `insertion`.
fn complete_at(source: &str, insertion: u32) -> (ParserState, NodeIndex) {
    let mut state = ParserState::for_completion(source, insertion, LanguageOptions::default());
    state.parse();
    let node = state.completion_node();
    assert!(node.is_some(), "no completion node for {source:?}");
    (state, node)
}

fn completion_data(state: &ParserState, node: NodeIndex) -> &CompletionData {
    match state.arena.get(node) {
        Some(Node::Completion(data)) => data,
        other => panic!("expected a completion node, found {other:?}"),
    }
}

fn find_node(state: &ParserState, predicate: impl Fn(&Node) -> bool) -> Option<NodeIndex> {
    (0..state.arena.len())
        .map(|i| NodeIndex(i as u32))
        .find(|&index| state.arena.get(index).is_some_and(&predicate))
}

fn assert_exactly_one(state: &ParserState, node: NodeIndex) {
    let reachable = state.arena.reachable_completion_nodes(state.root);
    assert_eq!(reachable, vec![node], "completion node not singular");
}

/// Substitute `proposal` over `range`, reparse without a cursor, and
/// require that no diagnostic lands inside the substituted text.
fn assert_clean_reparse(source: &str, range: TextRange, proposal: &str) {
    let mut patched = String::with_capacity(source.len() + proposal.len());
    patched.push_str(&source[..range.start as usize]);
    patched.push_str(proposal);
    patched.push_str(&source[range.end as usize..]);

    let mut state = ParserState::new(&patched, LanguageOptions::default());
    state.parse();

    let start = range.start;
    let end = range.start + proposal.len() as u32;
    for diagnostic in &state.diagnostics {
        let diag_end = diagnostic.start + diagnostic.length;
        assert!(
            diag_end <= start || diagnostic.start >= end,
            "diagnostic {diagnostic:?} overlaps the substituted proposal in {patched:?}"
        );
    }
}

#[test]
fn instanceof_keyword_after_condition_expression() {
    let source = "class X { void foo() { if (a ins";
    let (state, node) = complete_at_end(source);
    let data = completion_data(&state, node);
    assert_eq!(data.kind, CompletionKind::Keyword);
    assert_eq!(data.prefix, "ins");
    assert_eq!(data.keywords, vec![SyntaxKind::InstanceofKeyword]);
    assert_exactly_one(&state, node);

    // The enclosing if statement survives with its condition intact.
    let if_statement = find_node(&state, |n| matches!(n, Node::IfStatement(_)))
        .expect("if statement recovered");
    let Some(Node::IfStatement(if_data)) = state.arena.get(if_statement) else {
        unreachable!();
    };
    assert_eq!(state.arena.identifier_text(if_data.condition), Some("a"));
}

#[test]
fn member_access_on_this_receiver() {
    let source = "class X { void foo() { this.ba";
    let (state, node) = complete_at_end(source);
    let data = completion_data(&state, node);
    assert_eq!(data.kind, CompletionKind::MemberAccess);
    assert_eq!(data.prefix, "ba");
    assert!(matches!(state.arena.get(data.receiver), Some(Node::This(_))));

    let receiver_range = state.arena.range(data.receiver).expect("receiver range");
    assert_eq!(
        &source[receiver_range.start as usize..receiver_range.end as usize],
        "this"
    );
    assert_exactly_one(&state, node);
}

#[test]
fn exception_reference_in_catch_parameter() {
    let source = "class X { void foo() { try { foo(); } catch (Except";
    let (state, node) = complete_at_end(source);
    let data = completion_data(&state, node);
    assert_eq!(data.kind, CompletionKind::ExceptionReference);
    assert_eq!(data.prefix, "Except");
    assert_exactly_one(&state, node);

    // The try statement carries one catch clause whose parameter type
    // names the completion node.
    let try_statement = find_node(&state, |n| matches!(n, Node::TryStatement(_)))
        .expect("try statement recovered");
    let Some(Node::TryStatement(try_data)) = state.arena.get(try_statement) else {
        unreachable!();
    };
    assert_eq!(try_data.catch_clauses.len(), 1);

    let clause = find_node(&state, |n| matches!(n, Node::CatchClause(_))).expect("catch clause");
    let Some(Node::CatchClause(clause_data)) = state.arena.get(clause) else {
        unreachable!();
    };
    let Some(Node::Parameter(parameter)) = state.arena.get(clause_data.parameter) else {
        panic!("catch clause is missing its typed parameter");
    };
    let Some(Node::NamedType(type_data)) = state.arena.get(parameter.type_ref) else {
        panic!("catch parameter type is not a named type");
    };
    assert_eq!(type_data.name, node);
}

#[test]
fn member_keywords_at_empty_type_body() {
    let source = "class X { ";
    let (state, node) = complete_at_end(source);
    let data = completion_data(&state, node);
    assert_eq!(data.kind, CompletionKind::Keyword);
    assert!(data.prefix.is_empty());
    assert_eq!(data.base.range(), TextRange::new(10, 10));
    for expected in [
        SyntaxKind::ClassKeyword,
        SyntaxKind::InterfaceKeyword,
        SyntaxKind::PrivateKeyword,
        SyntaxKind::StaticKeyword,
        SyntaxKind::VoidKeyword,
        SyntaxKind::IntKeyword,
    ] {
        assert!(
            data.keywords.contains(&expected),
            "missing {expected:?} in {:?}",
            data.keywords
        );
    }
    assert_exactly_one(&state, node);
}

#[test]
fn proposal_substitution_reparses_cleanly() {
    for (source, proposal) in [
        ("class X { void foo() { if (a ins", "instanceof"),
        ("class X { void foo() { this.ba", "bar"),
        ("class X { ", "private"),
    ] {
        let (state, node) = complete_at_end(source);
        let data = completion_data(&state, node);
        assert_clean_reparse(source, data.base.range(), proposal);
    }
}

#[test]
fn unit_header_keyword_prefix() {
    let (state, node) = complete_at_end("cla");
    let data = completion_data(&state, node);
    assert_eq!(data.kind, CompletionKind::Keyword);
    assert_eq!(data.prefix, "cla");
    assert_eq!(data.keywords, vec![SyntaxKind::ClassKeyword]);
    assert_exactly_one(&state, node);
}

#[test]
fn allocation_type_after_new() {
    let source = "class X { void m() { Object o = new Has";
    let (state, node) = complete_at_end(source);
    let data = completion_data(&state, node);
    assert_eq!(data.kind, CompletionKind::AllocationExpression);
    assert_eq!(data.prefix, "Has");
    assert_exactly_one(&state, node);
}

#[test]
fn message_send_argument_with_qualified_receiver() {
    let source = "class X { void m() { obj.send(a, ";
    let (state, node) = complete_at_end(source);
    let data = completion_data(&state, node);
    assert_eq!(data.kind, CompletionKind::MessageSend);
    assert!(data.prefix.is_empty());
    assert_eq!(state.arena.identifier_text(data.receiver), Some("obj"));
    assert_eq!(data.arguments.as_ref().map(|a| a.len()), Some(1));
    assert_exactly_one(&state, node);
}

#[test]
fn member_access_on_call_receiver() {
    let source = "class X { void m() { foo().ba";
    let (state, node) = complete_at_end(source);
    let data = completion_data(&state, node);
    assert_eq!(data.kind, CompletionKind::MemberAccess);
    assert_eq!(data.prefix, "ba");
    assert!(matches!(
        state.arena.get(data.receiver),
        Some(Node::MethodInvocation(_))
    ));
    assert_exactly_one(&state, node);
}

#[test]
fn annotation_name_after_at() {
    let source = "class X { @De";
    let (state, node) = complete_at_end(source);
    let data = completion_data(&state, node);
    assert_eq!(data.kind, CompletionKind::AnnotationName);
    assert_eq!(data.prefix, "De");
    assert_exactly_one(&state, node);
}

#[test]
fn member_value_name_in_annotation_arguments() {
    let source = "class X { @A(va";
    let (state, node) = complete_at_end(source);
    let data = completion_data(&state, node);
    assert_eq!(data.kind, CompletionKind::MemberValueName);
    assert_eq!(data.prefix, "va");
    assert_exactly_one(&state, node);
}

#[test]
fn break_label_position() {
    let source = "class X { void m() { while (true) { break lo";
    let (state, node) = complete_at_end(source);
    let data = completion_data(&state, node);
    assert_eq!(data.kind, CompletionKind::BreakLabel);
    assert_eq!(data.prefix, "lo");
    assert_exactly_one(&state, node);
}

#[test]
fn class_literal_on_primitive_receiver() {
    let source = "class X { void m() { Object c = int.cla";
    let (state, node) = complete_at_end(source);
    let data = completion_data(&state, node);
    assert_eq!(data.kind, CompletionKind::ClassLiteralAccess);
    assert_eq!(data.prefix, "cla");
    assert_eq!(data.keywords, vec![SyntaxKind::ClassKeyword]);
    assert!(matches!(
        state.arena.get(data.receiver),
        Some(Node::PrimitiveType(_))
    ));
    assert_exactly_one(&state, node);
}

#[test]
fn qualified_name_inside_import() {
    let source = "import java.ut";
    let (state, node) = complete_at_end(source);
    let data = completion_data(&state, node);
    assert_eq!(data.kind, CompletionKind::QualifiedNameReference);
    assert_eq!(data.prefix, "ut");
    assert_eq!(state.arena.identifier_text(data.receiver), Some("java"));
    assert_exactly_one(&state, node);
}

#[test]
fn statement_keywords_filtered_by_prefix() {
    let source = "class X { void m() { ret";
    let (state, node) = complete_at_end(source);
    let data = completion_data(&state, node);
    assert_eq!(data.kind, CompletionKind::NameReference);
    assert_eq!(data.prefix, "ret");
    assert_eq!(data.keywords, vec![SyntaxKind::ReturnKeyword]);
    assert_exactly_one(&state, node);
}

#[test]
fn exception_reference_in_throws_clause() {
    let source = "class X { void m() throws IO";
    let (state, node) = complete_at_end(source);
    let data = completion_data(&state, node);
    assert_eq!(data.kind, CompletionKind::ExceptionReference);
    assert_eq!(data.prefix, "IO");
    assert_exactly_one(&state, node);
}

#[test]
fn type_reference_after_instanceof() {
    let source = "class X { void m() { if (a instanceof Str";
    let (state, node) = complete_at_end(source);
    let data = completion_data(&state, node);
    assert_eq!(data.kind, CompletionKind::TypeReference);
    assert_eq!(data.prefix, "Str");
    assert_exactly_one(&state, node);
}

#[test]
fn return_type_after_method_type_parameters() {
    let source = "class X { <T> Ty";
    let (state, node) = complete_at_end(source);
    let data = completion_data(&state, node);
    assert_eq!(data.kind, CompletionKind::MethodReturnType);
    assert_eq!(data.prefix, "Ty");
    assert_exactly_one(&state, node);
}

#[test]
fn parameter_name_after_parameter_type() {
    let source = "class X { void m(int ";
    let (state, node) = complete_at_end(source);
    let data = completion_data(&state, node);
    assert_eq!(data.kind, CompletionKind::ArgumentName);
    assert!(data.prefix.is_empty());
    assert_exactly_one(&state, node);
}

#[test]
fn second_exception_type_in_union_catch() {
    let source = "class X { void m() { try { } catch (IOException | Ex";
    let (state, node) = complete_at_end(source);
    let data = completion_data(&state, node);
    assert_eq!(data.kind, CompletionKind::ExceptionReference);
    assert_eq!(data.prefix, "Ex");
    assert_exactly_one(&state, node);
}

#[test]
fn cursor_inside_nested_type_argument() {
    // `>>` after `Integer` must still read as two closers.
    let source = "class X { Map<String, List<Integer>> items; }";
    let insertion = source.find("Integer").map(|p| p + 4).unwrap() as u32;
    let (state, node) = complete_at(source, insertion);
    let data = completion_data(&state, node);
    assert_eq!(data.kind, CompletionKind::FieldType);
    assert_eq!(data.prefix, "Inte");
    assert_exactly_one(&state, node);
    assert!(
        state.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        state.diagnostics
    );

    let field = find_node(&state, |n| matches!(n, Node::FieldDeclaration(_)))
        .expect("field declaration");
    let Some(Node::FieldDeclaration(field_data)) = state.arena.get(field) else {
        unreachable!();
    };
    assert_eq!(field_data.declarators.len(), 1);
}

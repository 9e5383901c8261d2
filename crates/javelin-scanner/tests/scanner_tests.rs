//! Tests for the scanner, including completion-sentinel behavior.

use javelin_scanner::{Scanner, SyntaxKind, TokenFlags};

fn scan_all(source: &str) -> Vec<SyntaxKind> {
    let mut scanner = Scanner::new(source.to_string());
    let mut kinds = Vec::new();
    loop {
        let kind = scanner.scan();
        if kind == SyntaxKind::EndOfFileToken {
            break;
        }
        kinds.push(kind);
    }
    kinds
}

#[test]
fn scans_class_declaration_tokens() {
    let kinds = scan_all("public class X { }");
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::PublicKeyword,
            SyntaxKind::ClassKeyword,
            SyntaxKind::Identifier,
            SyntaxKind::OpenBraceToken,
            SyntaxKind::CloseBraceToken,
        ]
    );
}

#[test]
fn scans_operators_with_maximal_munch() {
    let kinds = scan_all("a >>>= b >>> c >> d >= e > f");
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken,
            SyntaxKind::Identifier,
            SyntaxKind::GreaterThanGreaterThanGreaterThanToken,
            SyntaxKind::Identifier,
            SyntaxKind::GreaterThanGreaterThanToken,
            SyntaxKind::Identifier,
            SyntaxKind::GreaterThanEqualsToken,
            SyntaxKind::Identifier,
            SyntaxKind::GreaterThanToken,
            SyntaxKind::Identifier,
        ]
    );
}

#[test]
fn scans_literals_and_comments() {
    let kinds = scan_all("1 0x1F 1.5e-3 'c' \"str\" /* block */ // line\n2L");
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::NumericLiteral,
            SyntaxKind::NumericLiteral,
            SyntaxKind::NumericLiteral,
            SyntaxKind::CharLiteral,
            SyntaxKind::StringLiteral,
            SyntaxKind::NumericLiteral,
        ]
    );
}

#[test]
fn unterminated_string_reports_diagnostic() {
    let mut scanner = Scanner::new("\"abc\nx".to_string());
    let kind = scanner.scan();
    assert_eq!(kind, SyntaxKind::StringLiteral);
    assert!(scanner.token_flags().contains(TokenFlags::UNTERMINATED));
    assert!(!scanner.diagnostics().is_empty());
}

#[test]
fn line_break_flag_is_set_once() {
    let mut scanner = Scanner::new("a\nb c".to_string());
    scanner.scan();
    assert!(!scanner.has_preceding_line_break());
    scanner.scan();
    assert!(scanner.has_preceding_line_break());
    scanner.scan();
    assert!(!scanner.has_preceding_line_break());
}

// =============================================================================
// Completion sentinel
// =============================================================================

#[test]
fn completion_identifier_mid_word_keeps_full_span_and_prefix_value() {
    // this.ba|  (cursor after the 'a')
    let source = "this.bar";
    let mut scanner = Scanner::new(source.to_string());
    scanner.set_completion_pos(7); // after "this.ba"

    assert_eq!(scanner.scan(), SyntaxKind::ThisKeyword);
    assert_eq!(scanner.scan(), SyntaxKind::DotToken);
    let kind = scanner.scan();
    assert_eq!(kind, SyntaxKind::Identifier);
    assert!(scanner.is_completion_identifier());
    assert_eq!(scanner.token_value(), "ba");
    // The span still covers the whole word so accepting a proposal
    // replaces "bar" entirely.
    assert_eq!(scanner.token_start(), 5);
    assert_eq!(scanner.token_end(), 8);
}

#[test]
fn completion_identifier_inside_keyword_word() {
    // "a ins|" - the word is a prefix of `instanceof` but scans as an
    // identifier once the cursor lands inside it.
    let mut scanner = Scanner::new("a ins".to_string());
    scanner.set_completion_pos(5);
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    let kind = scanner.scan();
    assert_eq!(kind, SyntaxKind::Identifier);
    assert!(scanner.is_completion_identifier());
    assert_eq!(scanner.token_value(), "ins");
}

#[test]
fn full_keyword_under_cursor_becomes_completion_identifier() {
    let mut scanner = Scanner::new("if".to_string());
    scanner.set_completion_pos(2);
    let kind = scanner.scan();
    assert_eq!(kind, SyntaxKind::Identifier);
    assert!(scanner.is_completion_identifier());
    assert_eq!(scanner.token_value(), "if");
}

#[test]
fn empty_completion_identifier_fabricated_between_tokens() {
    // "this.|" - empty prefix right after the dot.
    let mut scanner = Scanner::new("this.".to_string());
    scanner.set_completion_pos(5);
    assert_eq!(scanner.scan(), SyntaxKind::ThisKeyword);
    assert_eq!(scanner.scan(), SyntaxKind::DotToken);
    let kind = scanner.scan();
    assert_eq!(kind, SyntaxKind::Identifier);
    assert!(scanner.is_completion_identifier());
    assert_eq!(scanner.token_value(), "");
    assert_eq!(scanner.token_start(), 5);
    assert_eq!(scanner.token_end(), 5);
    assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
}

#[test]
fn empty_completion_identifier_fabricated_before_following_token() {
    // "foo(|)" - fabricated at the insertion point, the `)` still follows.
    let mut scanner = Scanner::new("foo()".to_string());
    scanner.set_completion_pos(4);
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.scan(), SyntaxKind::OpenParenToken);
    let kind = scanner.scan();
    assert!(scanner.is_completion_identifier());
    assert_eq!(kind, SyntaxKind::Identifier);
    assert_eq!(scanner.scan(), SyntaxKind::CloseParenToken);
}

#[test]
fn completion_identifier_is_emitted_exactly_once() {
    let mut scanner = Scanner::new("a b c".to_string());
    scanner.set_completion_pos(3);
    let mut flagged = 0;
    loop {
        let kind = scanner.scan();
        if kind == SyntaxKind::EndOfFileToken {
            break;
        }
        if scanner.is_completion_identifier() {
            flagged += 1;
        }
    }
    assert_eq!(flagged, 1);
}

#[test]
fn clearing_sentinel_restores_plain_scanning() {
    let mut scanner = Scanner::new("if".to_string());
    scanner.set_completion_pos(2);
    scanner.scan();
    assert!(scanner.is_completion_identifier());

    let mut scanner = Scanner::new("if".to_string());
    scanner.set_completion_pos(2);
    scanner.clear_completion_pos();
    assert_eq!(scanner.completion_pos(), u32::MAX);
    assert_eq!(scanner.scan(), SyntaxKind::IfKeyword);
    assert!(!scanner.is_completion_identifier());
}

#[test]
fn completion_cut_inside_multibyte_char_stays_on_boundary() {
    // "Äbc" with the insertion offset between the two bytes of `Ä`.
    let mut scanner = Scanner::new("\u{c4}bc".to_string());
    scanner.set_completion_pos(1);
    let kind = scanner.scan();
    assert_eq!(kind, SyntaxKind::Identifier);
    assert!(scanner.is_completion_identifier());
    assert_eq!(scanner.token_value(), "");
    assert_eq!(scanner.token_start(), 0);
    assert_eq!(scanner.token_end(), 4);
}

#[test]
fn scanner_reused_after_sentinel_reset_scans_plainly() {
    let mut scanner = Scanner::new("foo bar".to_string());
    scanner.set_completion_pos(2);
    let snapshot = scanner.save_state();
    let kind = scanner.scan();
    assert_eq!(kind, SyntaxKind::Identifier);
    assert!(scanner.is_completion_identifier());
    assert_eq!(scanner.token_value(), "fo");

    // Same instance, sentinel reset: the next pass over the input sees
    // ordinary tokens and no flagged identifier.
    scanner.restore_state(snapshot);
    scanner.clear_completion_pos();
    let kind = scanner.scan();
    assert_eq!(kind, SyntaxKind::Identifier);
    assert!(!scanner.is_completion_identifier());
    assert_eq!(scanner.token_value(), "foo");
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.token_value(), "bar");
}

#[test]
fn save_restore_round_trips_completion_state() {
    let mut scanner = Scanner::new("a.b".to_string());
    scanner.set_completion_pos(3);
    scanner.scan(); // a
    let snapshot = scanner.save_state();
    scanner.scan(); // .
    scanner.scan(); // completion ident "b"
    assert!(scanner.is_completion_identifier());
    scanner.restore_state(snapshot);
    assert_eq!(scanner.token(), SyntaxKind::Identifier);
    assert_eq!(scanner.scan(), SyntaxKind::DotToken);
    let kind = scanner.scan();
    assert_eq!(kind, SyntaxKind::Identifier);
    assert!(scanner.is_completion_identifier());
}

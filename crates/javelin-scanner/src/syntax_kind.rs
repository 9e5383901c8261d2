//! Token kinds and classification helpers.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// All token kinds produced by the scanner.
///
/// Node kinds are a separate concern (the parser has its own `Node` enum);
/// this enum covers only what the tokenizer can emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum SyntaxKind {
    Unknown,
    EndOfFileToken,

    // Identifiers and literals
    Identifier,
    NumericLiteral,
    StringLiteral,
    CharLiteral,

    // Punctuation
    OpenBraceToken,
    CloseBraceToken,
    OpenParenToken,
    CloseParenToken,
    OpenBracketToken,
    CloseBracketToken,
    SemicolonToken,
    CommaToken,
    DotToken,
    EllipsisToken,
    AtToken,
    QuestionToken,
    ColonToken,

    // Operators
    EqualsToken,
    PlusEqualsToken,
    MinusEqualsToken,
    AsteriskEqualsToken,
    SlashEqualsToken,
    PercentEqualsToken,
    AmpersandEqualsToken,
    BarEqualsToken,
    CaretEqualsToken,
    LessThanLessThanEqualsToken,
    GreaterThanGreaterThanEqualsToken,
    GreaterThanGreaterThanGreaterThanEqualsToken,
    PlusToken,
    MinusToken,
    AsteriskToken,
    SlashToken,
    PercentToken,
    PlusPlusToken,
    MinusMinusToken,
    BangToken,
    TildeToken,
    AmpersandAmpersandToken,
    BarBarToken,
    AmpersandToken,
    BarToken,
    CaretToken,
    LessThanToken,
    GreaterThanToken,
    LessThanEqualsToken,
    GreaterThanEqualsToken,
    EqualsEqualsToken,
    BangEqualsToken,
    LessThanLessThanToken,
    GreaterThanGreaterThanToken,
    GreaterThanGreaterThanGreaterThanToken,

    // Keywords
    AbstractKeyword,
    AssertKeyword,
    BooleanKeyword,
    BreakKeyword,
    ByteKeyword,
    CaseKeyword,
    CatchKeyword,
    CharKeyword,
    ClassKeyword,
    ConstKeyword,
    ContinueKeyword,
    DefaultKeyword,
    DoKeyword,
    DoubleKeyword,
    ElseKeyword,
    EnumKeyword,
    ExtendsKeyword,
    FalseKeyword,
    FinalKeyword,
    FinallyKeyword,
    FloatKeyword,
    ForKeyword,
    GotoKeyword,
    IfKeyword,
    ImplementsKeyword,
    ImportKeyword,
    InstanceofKeyword,
    IntKeyword,
    InterfaceKeyword,
    LongKeyword,
    NativeKeyword,
    NewKeyword,
    NullKeyword,
    PackageKeyword,
    PrivateKeyword,
    ProtectedKeyword,
    PublicKeyword,
    ReturnKeyword,
    ShortKeyword,
    StaticKeyword,
    StrictfpKeyword,
    SuperKeyword,
    SwitchKeyword,
    SynchronizedKeyword,
    ThisKeyword,
    ThrowKeyword,
    ThrowsKeyword,
    TransientKeyword,
    TrueKeyword,
    TryKeyword,
    VoidKeyword,
    VolatileKeyword,
    WhileKeyword,
}

pub fn token_is_keyword(kind: SyntaxKind) -> bool {
    (kind as u16) >= (SyntaxKind::AbstractKeyword as u16)
}

pub fn token_is_identifier_or_keyword(kind: SyntaxKind) -> bool {
    kind == SyntaxKind::Identifier || token_is_keyword(kind)
}

pub fn token_is_punctuation(kind: SyntaxKind) -> bool {
    let k = kind as u16;
    k >= SyntaxKind::OpenBraceToken as u16
        && k <= SyntaxKind::GreaterThanGreaterThanGreaterThanToken as u16
}

pub fn token_is_assignment_operator(kind: SyntaxKind) -> bool {
    let k = kind as u16;
    k >= SyntaxKind::EqualsToken as u16
        && k <= SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken as u16
}

/// Modifier keywords accepted on type and member declarations.
pub fn token_is_modifier(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::AbstractKeyword
            | SyntaxKind::FinalKeyword
            | SyntaxKind::NativeKeyword
            | SyntaxKind::PrivateKeyword
            | SyntaxKind::ProtectedKeyword
            | SyntaxKind::PublicKeyword
            | SyntaxKind::StaticKeyword
            | SyntaxKind::StrictfpKeyword
            | SyntaxKind::SynchronizedKeyword
            | SyntaxKind::TransientKeyword
            | SyntaxKind::VolatileKeyword
    )
}

pub fn token_is_primitive_type(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::BooleanKeyword
            | SyntaxKind::ByteKeyword
            | SyntaxKind::CharKeyword
            | SyntaxKind::DoubleKeyword
            | SyntaxKind::FloatKeyword
            | SyntaxKind::IntKeyword
            | SyntaxKind::LongKeyword
            | SyntaxKind::ShortKeyword
            | SyntaxKind::VoidKeyword
    )
}

const KEYWORDS: &[(&str, SyntaxKind)] = &[
    ("abstract", SyntaxKind::AbstractKeyword),
    ("assert", SyntaxKind::AssertKeyword),
    ("boolean", SyntaxKind::BooleanKeyword),
    ("break", SyntaxKind::BreakKeyword),
    ("byte", SyntaxKind::ByteKeyword),
    ("case", SyntaxKind::CaseKeyword),
    ("catch", SyntaxKind::CatchKeyword),
    ("char", SyntaxKind::CharKeyword),
    ("class", SyntaxKind::ClassKeyword),
    ("const", SyntaxKind::ConstKeyword),
    ("continue", SyntaxKind::ContinueKeyword),
    ("default", SyntaxKind::DefaultKeyword),
    ("do", SyntaxKind::DoKeyword),
    ("double", SyntaxKind::DoubleKeyword),
    ("else", SyntaxKind::ElseKeyword),
    ("enum", SyntaxKind::EnumKeyword),
    ("extends", SyntaxKind::ExtendsKeyword),
    ("false", SyntaxKind::FalseKeyword),
    ("final", SyntaxKind::FinalKeyword),
    ("finally", SyntaxKind::FinallyKeyword),
    ("float", SyntaxKind::FloatKeyword),
    ("for", SyntaxKind::ForKeyword),
    ("goto", SyntaxKind::GotoKeyword),
    ("if", SyntaxKind::IfKeyword),
    ("implements", SyntaxKind::ImplementsKeyword),
    ("import", SyntaxKind::ImportKeyword),
    ("instanceof", SyntaxKind::InstanceofKeyword),
    ("int", SyntaxKind::IntKeyword),
    ("interface", SyntaxKind::InterfaceKeyword),
    ("long", SyntaxKind::LongKeyword),
    ("native", SyntaxKind::NativeKeyword),
    ("new", SyntaxKind::NewKeyword),
    ("null", SyntaxKind::NullKeyword),
    ("package", SyntaxKind::PackageKeyword),
    ("private", SyntaxKind::PrivateKeyword),
    ("protected", SyntaxKind::ProtectedKeyword),
    ("public", SyntaxKind::PublicKeyword),
    ("return", SyntaxKind::ReturnKeyword),
    ("short", SyntaxKind::ShortKeyword),
    ("static", SyntaxKind::StaticKeyword),
    ("strictfp", SyntaxKind::StrictfpKeyword),
    ("super", SyntaxKind::SuperKeyword),
    ("switch", SyntaxKind::SwitchKeyword),
    ("synchronized", SyntaxKind::SynchronizedKeyword),
    ("this", SyntaxKind::ThisKeyword),
    ("throw", SyntaxKind::ThrowKeyword),
    ("throws", SyntaxKind::ThrowsKeyword),
    ("transient", SyntaxKind::TransientKeyword),
    ("true", SyntaxKind::TrueKeyword),
    ("try", SyntaxKind::TryKeyword),
    ("void", SyntaxKind::VoidKeyword),
    ("volatile", SyntaxKind::VolatileKeyword),
    ("while", SyntaxKind::WhileKeyword),
];

static KEYWORD_MAP: LazyLock<FxHashMap<&'static str, SyntaxKind>> =
    LazyLock::new(|| KEYWORDS.iter().copied().collect());

/// Look up the keyword kind for `text`, if it is a keyword.
pub fn keyword_from_text(text: &str) -> Option<SyntaxKind> {
    KEYWORD_MAP.get(text).copied()
}

/// The source text of a keyword kind.
pub fn keyword_to_text(kind: SyntaxKind) -> Option<&'static str> {
    if !token_is_keyword(kind) {
        return None;
    }
    KEYWORDS
        .iter()
        .find(|(_, k)| *k == kind)
        .map(|(text, _)| *text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_classification() {
        assert!(token_is_keyword(SyntaxKind::BreakKeyword));
        assert!(token_is_keyword(SyntaxKind::InstanceofKeyword));
        assert!(!token_is_keyword(SyntaxKind::Identifier));
        assert!(!token_is_keyword(SyntaxKind::OpenBraceToken));
    }

    #[test]
    fn identifier_or_keyword() {
        assert!(token_is_identifier_or_keyword(SyntaxKind::Identifier));
        assert!(token_is_identifier_or_keyword(SyntaxKind::BreakKeyword));
        assert!(!token_is_identifier_or_keyword(SyntaxKind::SemicolonToken));
    }

    #[test]
    fn assignment_operators() {
        assert!(token_is_assignment_operator(SyntaxKind::EqualsToken));
        assert!(token_is_assignment_operator(SyntaxKind::PlusEqualsToken));
        assert!(token_is_assignment_operator(
            SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken
        ));
        assert!(!token_is_assignment_operator(SyntaxKind::PlusToken));
        assert!(!token_is_assignment_operator(SyntaxKind::EqualsEqualsToken));
    }

    #[test]
    fn keyword_round_trip() {
        for (text, kind) in KEYWORDS {
            assert_eq!(keyword_from_text(text), Some(*kind));
            assert_eq!(keyword_to_text(*kind), Some(*text));
        }
        assert_eq!(keyword_from_text("foo"), None);
        assert_eq!(keyword_to_text(SyntaxKind::Identifier), None);
    }
}

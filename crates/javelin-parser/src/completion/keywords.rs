//! Candidate-keyword tables for keyword completion positions.

use javelin_common::options::LanguageOptions;
use javelin_scanner::SyntaxKind;

/// Keywords that may start a top-level or nested type declaration.
pub fn type_declaration_keywords(options: &LanguageOptions) -> Vec<SyntaxKind> {
    let mut keywords = vec![
        SyntaxKind::ClassKeyword,
        SyntaxKind::InterfaceKeyword,
        SyntaxKind::AbstractKeyword,
        SyntaxKind::FinalKeyword,
        SyntaxKind::PublicKeyword,
    ];
    if options.source_level >= 5 {
        keywords.push(SyntaxKind::EnumKeyword);
    }
    keywords
}

/// Keywords that may start a member declaration inside a type body.
pub fn member_declaration_keywords(options: &LanguageOptions) -> Vec<SyntaxKind> {
    let mut keywords = vec![
        SyntaxKind::ClassKeyword,
        SyntaxKind::InterfaceKeyword,
        SyntaxKind::AbstractKeyword,
        SyntaxKind::FinalKeyword,
        SyntaxKind::NativeKeyword,
        SyntaxKind::PrivateKeyword,
        SyntaxKind::ProtectedKeyword,
        SyntaxKind::PublicKeyword,
        SyntaxKind::StaticKeyword,
        SyntaxKind::StrictfpKeyword,
        SyntaxKind::SynchronizedKeyword,
        SyntaxKind::TransientKeyword,
        SyntaxKind::VoidKeyword,
        SyntaxKind::VolatileKeyword,
    ];
    keywords.extend(primitive_type_keywords());
    if options.source_level >= 5 {
        keywords.push(SyntaxKind::EnumKeyword);
    }
    keywords
}

/// Keywords legal at the start of a statement.
pub fn statement_keywords(options: &LanguageOptions) -> Vec<SyntaxKind> {
    let mut keywords = vec![
        SyntaxKind::BreakKeyword,
        SyntaxKind::ContinueKeyword,
        SyntaxKind::DoKeyword,
        SyntaxKind::FinalKeyword,
        SyntaxKind::ForKeyword,
        SyntaxKind::IfKeyword,
        SyntaxKind::NewKeyword,
        SyntaxKind::ReturnKeyword,
        SyntaxKind::SuperKeyword,
        SyntaxKind::SwitchKeyword,
        SyntaxKind::SynchronizedKeyword,
        SyntaxKind::ThisKeyword,
        SyntaxKind::ThrowKeyword,
        SyntaxKind::TryKeyword,
        SyntaxKind::WhileKeyword,
    ];
    keywords.extend(primitive_type_keywords());
    if options.assert_is_keyword {
        keywords.push(SyntaxKind::AssertKeyword);
    }
    keywords
}

/// Keywords legal at the start of a compilation unit, before any type.
pub fn unit_header_keywords(options: &LanguageOptions) -> Vec<SyntaxKind> {
    let mut keywords = vec![SyntaxKind::PackageKeyword, SyntaxKind::ImportKeyword];
    keywords.extend(type_declaration_keywords(options));
    keywords
}

pub fn primitive_type_keywords() -> Vec<SyntaxKind> {
    vec![
        SyntaxKind::BooleanKeyword,
        SyntaxKind::ByteKeyword,
        SyntaxKind::CharKeyword,
        SyntaxKind::DoubleKeyword,
        SyntaxKind::FloatKeyword,
        SyntaxKind::IntKeyword,
        SyntaxKind::LongKeyword,
        SyntaxKind::ShortKeyword,
    ]
}

/// The sole candidate after a complete expression followed by a prefix
/// of `instanceof`.
pub fn after_expression_keywords() -> Vec<SyntaxKind> {
    vec![SyntaxKind::InstanceofKeyword]
}

/// Whether `prefix` is a prefix of the keyword's spelling. Empty
/// prefixes match everything.
pub fn matches_prefix(keyword: SyntaxKind, prefix: &str) -> bool {
    javelin_scanner::keyword_to_text(keyword).is_some_and(|text| text.starts_with(prefix))
}

/// Candidates from `pool` whose spelling starts with `prefix`.
pub fn filter_by_prefix(pool: Vec<SyntaxKind>, prefix: &str) -> Vec<SyntaxKind> {
    if prefix.is_empty() {
        return pool;
    }
    pool.into_iter()
        .filter(|k| matches_prefix(*k, prefix))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_filtering() {
        let pool = statement_keywords(&LanguageOptions::default());
        let filtered = filter_by_prefix(pool, "th");
        assert_eq!(
            filtered,
            vec![SyntaxKind::ThisKeyword, SyntaxKind::ThrowKeyword]
        );
    }

    #[test]
    fn instanceof_matches_partial_spelling() {
        assert!(matches_prefix(SyntaxKind::InstanceofKeyword, "ins"));
        assert!(matches_prefix(SyntaxKind::InstanceofKeyword, ""));
        assert!(!matches_prefix(SyntaxKind::InstanceofKeyword, "int"));
    }

    #[test]
    fn source_level_gates_enum() {
        let mut options = LanguageOptions::default();
        options.source_level = 4;
        assert!(!type_declaration_keywords(&options).contains(&SyntaxKind::EnumKeyword));
        options.source_level = 5;
        assert!(type_declaration_keywords(&options).contains(&SyntaxKind::EnumKeyword));
    }

    #[test]
    fn assert_option_gates_assert() {
        let mut options = LanguageOptions::default();
        options.assert_is_keyword = false;
        assert!(!statement_keywords(&options).contains(&SyntaxKind::AssertKeyword));
    }
}

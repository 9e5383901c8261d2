//! Parse diagnostics.
//!
//! Syntax problems are reported as diagnostics collected during parsing,
//! never as `Result` errors: the parser is total over malformed input and
//! completion requests must survive arbitrary breakage elsewhere in the
//! file.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Message,
}

/// A single parse diagnostic, positioned by byte offset and length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
}

impl Diagnostic {
    pub fn error(start: u32, length: u32, message: impl Into<String>, code: u32) -> Self {
        Diagnostic {
            category: DiagnosticCategory::Error,
            code,
            start,
            length,
            message_text: message.into(),
        }
    }
}

/// Diagnostic codes emitted by the javelin parser and scanner.
///
/// Codes are stable identifiers, not messages; the message text carried on
/// the diagnostic is already formatted.
pub mod diagnostic_codes {
    /// A token other than the expected one was found.
    pub const UNEXPECTED_TOKEN: u32 = 1001;
    /// An expression was expected.
    pub const EXPRESSION_EXPECTED: u32 = 1002;
    /// A type was expected.
    pub const TYPE_EXPECTED: u32 = 1003;
    /// An identifier was expected.
    pub const IDENTIFIER_EXPECTED: u32 = 1004;
    /// Premature end of file.
    pub const UNEXPECTED_EOF: u32 = 1005;
    /// Unterminated string or character literal.
    pub const UNTERMINATED_LITERAL: u32 = 1010;
    /// Unterminated block comment.
    pub const UNTERMINATED_COMMENT: u32 = 1011;
    /// Invalid character in input.
    pub const INVALID_CHARACTER: u32 = 1012;
    /// A statement was found where a declaration was required.
    pub const DECLARATION_EXPECTED: u32 = 1020;
    /// `}` expected to close an open construct.
    pub const RBRACE_EXPECTED: u32 = 1021;
}

//! Tokenizer state machine.

use crate::syntax_kind::{SyntaxKind, keyword_from_text};
use javelin_common::diagnostics::{Diagnostic, diagnostic_codes};

bitflags::bitflags! {
    /// Per-token flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct TokenFlags: u8 {
        /// A line break occurred between the previous token and this one.
        const PRECEDING_LINE_BREAK = 1 << 0;
        /// This token is the completion identifier: the (possibly empty)
        /// identifier overlapping the installed cursor position.
        const COMPLETION_IDENTIFIER = 1 << 1;
        /// The literal was not terminated before end of line/file.
        const UNTERMINATED = 1 << 2;
    }
}

/// Saved scanner state for speculative look-ahead.
#[derive(Clone, Debug)]
pub struct ScannerSnapshot {
    pos: usize,
    token: SyntaxKind,
    token_start: u32,
    token_end: u32,
    token_value: String,
    token_flags: TokenFlags,
    completion_emitted: bool,
}

/// The javelin tokenizer.
///
/// One scanner instance serves one parse. For completion parses a cursor
/// sentinel is installed with [`Scanner::set_completion_pos`]; the scanner
/// then emits exactly one token flagged [`TokenFlags::COMPLETION_IDENTIFIER`]:
/// either the identifier/keyword word containing the insertion point
/// (with `token_value` truncated to the prefix before the cursor), or a
/// fabricated empty identifier at the insertion point when the scan is
/// about to cross it inside trivia or at token boundaries.
///
/// The sentinel must be cleared with [`Scanner::clear_completion_pos`] on
/// every exit path before an instance can be reused; the cleared value is
/// `u32::MAX`, which no token can reach.
pub struct Scanner {
    source: String,
    pos: usize,
    token: SyntaxKind,
    token_start: u32,
    token_end: u32,
    token_value: String,
    token_flags: TokenFlags,
    completion_pos: u32,
    completion_emitted: bool,
    diagnostics: Vec<Diagnostic>,
}

impl Scanner {
    pub fn new(source: String) -> Scanner {
        Scanner {
            source,
            pos: 0,
            token: SyntaxKind::Unknown,
            token_start: 0,
            token_end: 0,
            token_value: String::new(),
            token_flags: TokenFlags::empty(),
            completion_pos: u32::MAX,
            completion_emitted: false,
            diagnostics: Vec::new(),
        }
    }

    // =========================================================================
    // Token accessors
    // =========================================================================

    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    pub fn token_start(&self) -> u32 {
        self.token_start
    }

    pub fn token_end(&self) -> u32 {
        self.token_end
    }

    /// Identifier or literal text of the current token. For the completion
    /// identifier this is the prefix before the cursor, not the whole word.
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    pub fn token_flags(&self) -> TokenFlags {
        self.token_flags
    }

    pub fn is_completion_identifier(&self) -> bool {
        self.token_flags
            .contains(TokenFlags::COMPLETION_IDENTIFIER)
    }

    pub fn has_preceding_line_break(&self) -> bool {
        self.token_flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }

    pub fn source_text(&self) -> &str {
        &self.source
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    // =========================================================================
    // Completion sentinel
    // =========================================================================

    /// Install the cursor sentinel. `insertion` is the byte index text
    /// would be inserted at (cursor offset + 1).
    pub fn set_completion_pos(&mut self, insertion: u32) {
        self.completion_pos = insertion;
        self.completion_emitted = false;
    }

    /// Reset to non-completion mode. Required on every exit path before
    /// instance reuse.
    pub fn clear_completion_pos(&mut self) {
        self.completion_pos = u32::MAX;
        self.completion_emitted = false;
    }

    pub fn completion_pos(&self) -> u32 {
        self.completion_pos
    }

    fn completion_pending(&self) -> bool {
        self.completion_pos != u32::MAX && !self.completion_emitted
    }

    // =========================================================================
    // Look-ahead support
    // =========================================================================

    pub fn save_state(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            pos: self.pos,
            token: self.token,
            token_start: self.token_start,
            token_end: self.token_end,
            token_value: self.token_value.clone(),
            token_flags: self.token_flags,
            completion_emitted: self.completion_emitted,
        }
    }

    pub fn restore_state(&mut self, snapshot: ScannerSnapshot) {
        self.pos = snapshot.pos;
        self.token = snapshot.token;
        self.token_start = snapshot.token_start;
        self.token_end = snapshot.token_end;
        self.token_value = snapshot.token_value;
        self.token_flags = snapshot.token_flags;
        self.completion_emitted = snapshot.completion_emitted;
    }

    // =========================================================================
    // Scanning
    // =========================================================================

    /// Scan the next token and make it current.
    pub fn scan(&mut self) -> SyntaxKind {
        self.token_flags = TokenFlags::empty();
        self.token_value.clear();

        self.skip_trivia();
        let start = self.pos as u32;
        self.token_start = start;

        // Fabricate the empty completion identifier the moment the scan is
        // about to cross the insertion point without having produced one
        // inside an identifier. The real token at `start` is re-scanned on
        // the next call.
        if self.completion_pending() && start >= self.completion_pos {
            let at = self.completion_pos.min(self.source.len() as u32);
            self.token_start = at;
            self.token_end = at;
            self.token = SyntaxKind::Identifier;
            self.token_flags |= TokenFlags::COMPLETION_IDENTIFIER;
            self.completion_emitted = true;
            return self.token;
        }

        let Some(ch) = self.peek_byte() else {
            self.token = SyntaxKind::EndOfFileToken;
            self.token_end = start;
            return self.token;
        };

        let kind = match ch {
            b'{' => self.single(SyntaxKind::OpenBraceToken),
            b'}' => self.single(SyntaxKind::CloseBraceToken),
            b'(' => self.single(SyntaxKind::OpenParenToken),
            b')' => self.single(SyntaxKind::CloseParenToken),
            b'[' => self.single(SyntaxKind::OpenBracketToken),
            b']' => self.single(SyntaxKind::CloseBracketToken),
            b';' => self.single(SyntaxKind::SemicolonToken),
            b',' => self.single(SyntaxKind::CommaToken),
            b'@' => self.single(SyntaxKind::AtToken),
            b'?' => self.single(SyntaxKind::QuestionToken),
            b':' => self.single(SyntaxKind::ColonToken),
            b'~' => self.single(SyntaxKind::TildeToken),
            b'.' => {
                if self.source.as_bytes().get(self.pos + 1) == Some(&b'.')
                    && self.source.as_bytes().get(self.pos + 2) == Some(&b'.')
                {
                    self.pos += 3;
                    SyntaxKind::EllipsisToken
                } else if self
                    .source
                    .as_bytes()
                    .get(self.pos + 1)
                    .is_some_and(|b| b.is_ascii_digit())
                {
                    self.scan_number()
                } else {
                    self.single(SyntaxKind::DotToken)
                }
            }
            b'+' => self.operator(&[
                ("+=", SyntaxKind::PlusEqualsToken),
                ("++", SyntaxKind::PlusPlusToken),
                ("+", SyntaxKind::PlusToken),
            ]),
            b'-' => self.operator(&[
                ("-=", SyntaxKind::MinusEqualsToken),
                ("--", SyntaxKind::MinusMinusToken),
                ("-", SyntaxKind::MinusToken),
            ]),
            b'*' => self.operator(&[
                ("*=", SyntaxKind::AsteriskEqualsToken),
                ("*", SyntaxKind::AsteriskToken),
            ]),
            b'/' => self.operator(&[
                ("/=", SyntaxKind::SlashEqualsToken),
                ("/", SyntaxKind::SlashToken),
            ]),
            b'%' => self.operator(&[
                ("%=", SyntaxKind::PercentEqualsToken),
                ("%", SyntaxKind::PercentToken),
            ]),
            b'&' => self.operator(&[
                ("&=", SyntaxKind::AmpersandEqualsToken),
                ("&&", SyntaxKind::AmpersandAmpersandToken),
                ("&", SyntaxKind::AmpersandToken),
            ]),
            b'|' => self.operator(&[
                ("|=", SyntaxKind::BarEqualsToken),
                ("||", SyntaxKind::BarBarToken),
                ("|", SyntaxKind::BarToken),
            ]),
            b'^' => self.operator(&[
                ("^=", SyntaxKind::CaretEqualsToken),
                ("^", SyntaxKind::CaretToken),
            ]),
            b'!' => self.operator(&[
                ("!=", SyntaxKind::BangEqualsToken),
                ("!", SyntaxKind::BangToken),
            ]),
            b'=' => self.operator(&[
                ("==", SyntaxKind::EqualsEqualsToken),
                ("=", SyntaxKind::EqualsToken),
            ]),
            b'<' => self.operator(&[
                ("<<=", SyntaxKind::LessThanLessThanEqualsToken),
                ("<<", SyntaxKind::LessThanLessThanToken),
                ("<=", SyntaxKind::LessThanEqualsToken),
                ("<", SyntaxKind::LessThanToken),
            ]),
            b'>' => self.operator(&[
                (">>>=", SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken),
                (">>>", SyntaxKind::GreaterThanGreaterThanGreaterThanToken),
                (">>=", SyntaxKind::GreaterThanGreaterThanEqualsToken),
                (">>", SyntaxKind::GreaterThanGreaterThanToken),
                (">=", SyntaxKind::GreaterThanEqualsToken),
                (">", SyntaxKind::GreaterThanToken),
            ]),
            b'"' => self.scan_string(b'"', SyntaxKind::StringLiteral),
            b'\'' => self.scan_string(b'\'', SyntaxKind::CharLiteral),
            b'0'..=b'9' => self.scan_number(),
            c if is_identifier_start(c) => self.scan_identifier_or_keyword(),
            _ => {
                self.diagnostics.push(Diagnostic::error(
                    start,
                    1,
                    format!("invalid character `{}`", ch as char),
                    diagnostic_codes::INVALID_CHARACTER,
                ));
                self.pos += 1;
                SyntaxKind::Unknown
            }
        };

        self.token = kind;
        self.token_end = self.pos as u32;
        self.token
    }

    fn peek_byte(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos).copied()
    }

    fn single(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.pos += 1;
        kind
    }

    /// Maximal-munch operator matching; candidates must be ordered longest
    /// first.
    fn operator(&mut self, candidates: &[(&str, SyntaxKind)]) -> SyntaxKind {
        for (text, kind) in candidates {
            if self.source[self.pos..].starts_with(text) {
                self.pos += text.len();
                return *kind;
            }
        }
        unreachable!("operator table misses its own first byte")
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek_byte() {
                Some(b' ' | b'\t' | b'\r') => self.pos += 1,
                Some(b'\n') => {
                    self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                    self.pos += 1;
                }
                Some(b'/') if self.source.as_bytes().get(self.pos + 1) == Some(&b'/') => {
                    while let Some(b) = self.peek_byte() {
                        if b == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                Some(b'/') if self.source.as_bytes().get(self.pos + 1) == Some(&b'*') => {
                    let comment_start = self.pos as u32;
                    self.pos += 2;
                    let mut terminated = false;
                    while self.pos < self.source.len() {
                        if self.source[self.pos..].starts_with("*/") {
                            self.pos += 2;
                            terminated = true;
                            break;
                        }
                        if self.source.as_bytes()[self.pos] == b'\n' {
                            self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                        }
                        self.pos += 1;
                    }
                    if !terminated {
                        self.diagnostics.push(Diagnostic::error(
                            comment_start,
                            self.pos as u32 - comment_start,
                            "unterminated block comment",
                            diagnostic_codes::UNTERMINATED_COMMENT,
                        ));
                    }
                }
                _ => break,
            }
        }
    }

    fn scan_identifier_or_keyword(&mut self) -> SyntaxKind {
        let start = self.pos;
        while self.peek_byte().is_some_and(is_identifier_part) {
            self.pos += 1;
        }
        let text = &self.source[start..self.pos];

        // A word containing the insertion point becomes the completion
        // identifier, keyword or not; the value is the prefix before the
        // cursor while the span still covers the whole word.
        if self.completion_pending()
            && (start as u32) < self.completion_pos
            && self.completion_pos <= self.pos as u32
        {
            // The insertion offset can land between the bytes of a
            // multi-byte identifier character; back the prefix cut up to
            // the previous boundary instead of slicing mid-char.
            let mut cut = (self.completion_pos as usize).min(self.pos);
            while cut > start && !self.source.is_char_boundary(cut) {
                cut -= 1;
            }
            self.token_value.push_str(&self.source[start..cut]);
            self.token_flags |= TokenFlags::COMPLETION_IDENTIFIER;
            self.completion_emitted = true;
            return SyntaxKind::Identifier;
        }

        if let Some(kind) = keyword_from_text(text) {
            return kind;
        }
        self.token_value.push_str(text);
        SyntaxKind::Identifier
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;
        if self.source[self.pos..].starts_with("0x") || self.source[self.pos..].starts_with("0X") {
            self.pos += 2;
            while self
                .peek_byte()
                .is_some_and(|b| b.is_ascii_hexdigit() || b == b'_')
            {
                self.pos += 1;
            }
        } else {
            while self
                .peek_byte()
                .is_some_and(|b| b.is_ascii_digit() || b == b'_' || b == b'.')
            {
                self.pos += 1;
            }
            // Exponent part
            if self.peek_byte().is_some_and(|b| b == b'e' || b == b'E') {
                self.pos += 1;
                if self.peek_byte().is_some_and(|b| b == b'+' || b == b'-') {
                    self.pos += 1;
                }
                while self.peek_byte().is_some_and(|b| b.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
        }
        // Suffix (L, f, d, ...)
        if self
            .peek_byte()
            .is_some_and(|b| matches!(b, b'l' | b'L' | b'f' | b'F' | b'd' | b'D'))
        {
            self.pos += 1;
        }
        self.token_value.push_str(&self.source[start..self.pos]);
        SyntaxKind::NumericLiteral
    }

    fn scan_string(&mut self, quote: u8, kind: SyntaxKind) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        loop {
            match self.peek_byte() {
                None | Some(b'\n') => {
                    self.token_flags |= TokenFlags::UNTERMINATED;
                    self.diagnostics.push(Diagnostic::error(
                        start as u32,
                        (self.pos - start) as u32,
                        "unterminated literal",
                        diagnostic_codes::UNTERMINATED_LITERAL,
                    ));
                    break;
                }
                Some(b'\\') => {
                    self.pos += 1;
                    if self.peek_byte().is_some() {
                        self.pos += 1;
                    }
                }
                Some(b) if b == quote => {
                    self.pos += 1;
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }
        self.token_value.push_str(&self.source[start..self.pos]);
        kind
    }
}

fn is_identifier_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b >= 0x80
}

fn is_identifier_part(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

//! Per-request language options.

use serde::{Deserialize, Serialize};

/// Language-level options for a single parse/completion request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageOptions {
    /// Source level as a single integer (e.g. 8 for 1.8). Affects which
    /// keywords are candidates in keyword completion.
    pub source_level: u32,
    /// Whether `assert` is a keyword (source level >= 1.4).
    pub assert_is_keyword: bool,
    /// Whether the enhanced `for (T x : expr)` form is accepted.
    pub enhanced_for: bool,
}

impl Default for LanguageOptions {
    fn default() -> Self {
        LanguageOptions {
            source_level: 8,
            assert_is_keyword: true,
            enhanced_for: true,
        }
    }
}

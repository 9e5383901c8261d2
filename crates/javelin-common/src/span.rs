//! Source spans and line lookup.

use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, end)` in the source text.
///
/// Positions are byte offsets into the original source. `start == end`
/// describes an empty range, which is how the completion layer represents
/// an empty prefix at the cursor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRange {
    pub start: u32,
    pub end: u32,
}

impl TextRange {
    pub fn new(start: u32, end: u32) -> TextRange {
        debug_assert!(start <= end, "inverted range {start}..{end}");
        TextRange { start, end }
    }

    /// An empty range anchored at `pos`.
    pub fn empty(pos: u32) -> TextRange {
        TextRange {
            start: pos,
            end: pos,
        }
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }

    /// The smallest range covering both `self` and `other`.
    pub fn cover(&self, other: TextRange) -> TextRange {
        TextRange {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Precomputed line-start table for O(log n) offset-to-line lookups.
///
/// Lines are 0-based. Only `\n` terminates a line; `\r\n` sequences are
/// handled because the `\n` is still present.
#[derive(Clone, Debug, Default)]
pub struct LineMap {
    line_starts: Vec<u32>,
}

impl LineMap {
    pub fn new(text: &str) -> LineMap {
        let mut line_starts = vec![0u32];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i as u32 + 1);
            }
        }
        LineMap { line_starts }
    }

    /// 0-based line containing `offset`. Offsets past the last line start
    /// clamp to the last line.
    pub fn line_of(&self, offset: u32) -> u32 {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line as u32,
            Err(next) => (next - 1) as u32,
        }
    }

    /// Byte offset of the first character of `line` (0-based).
    pub fn line_start(&self, line: u32) -> Option<u32> {
        self.line_starts.get(line as usize).copied()
    }

    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_cover_and_contains() {
        let a = TextRange::new(2, 5);
        let b = TextRange::new(4, 9);
        assert_eq!(a.cover(b), TextRange::new(2, 9));
        assert!(a.contains(2));
        assert!(!a.contains(5));
        assert!(TextRange::empty(3).is_empty());
    }

    #[test]
    fn line_map_basic() {
        let map = LineMap::new("ab\ncd\n\nef");
        assert_eq!(map.line_count(), 4);
        assert_eq!(map.line_of(0), 0);
        assert_eq!(map.line_of(2), 0);
        assert_eq!(map.line_of(3), 1);
        assert_eq!(map.line_of(6), 2);
        assert_eq!(map.line_of(8), 3);
        assert_eq!(map.line_start(1), Some(3));
        assert_eq!(map.line_start(9), None);
    }
}

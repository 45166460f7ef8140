//! Grapheme splitting for layout.
//!
//! Graphemes (extended grapheme clusters) are the atomic unit of measuring,
//! wrapping and styling. Combining sequences, surrogate pairs and ZWJ emoji
//! always stay in one unit.

use unicode_segmentation::UnicodeSegmentation;

/// A run of graphemes: one logical or visual line of text.
pub type GraphemeRun = Vec<String>;

/// Grapheme emitted between logical lines in flattened text.
pub const NEWLINE: &str = "\n";

/// Iterator over grapheme clusters in a string.
pub struct GraphemeIterator<'a> {
    inner: unicode_segmentation::Graphemes<'a>,
}

impl<'a> Iterator for GraphemeIterator<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// Iterate over grapheme clusters in a string.
#[must_use]
pub fn graphemes(s: &str) -> GraphemeIterator<'_> {
    GraphemeIterator {
        inner: s.graphemes(true),
    }
}

/// Split a string into owned graphemes. Empty input gives an empty run.
#[must_use]
pub fn split_graphemes(s: &str) -> GraphemeRun {
    graphemes(s).map(str::to_owned).collect()
}

/// Split text on hard newlines (`\n` or `\r\n`) into grapheme runs.
///
/// Always returns at least one line; empty text is one empty line.
#[must_use]
pub fn split_lines(text: &str) -> Vec<GraphemeRun> {
    text.split('\n')
        .map(|line| split_graphemes(line.strip_suffix('\r').unwrap_or(line)))
        .collect()
}

/// Flatten logical lines into one grapheme sequence with [`NEWLINE`]
/// entries between lines.
#[must_use]
pub fn flatten_lines(lines: &[GraphemeRun]) -> Vec<String> {
    let total = lines.iter().map(Vec::len).sum::<usize>() + lines.len();
    let mut flat = Vec::with_capacity(total);
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            flat.push(NEWLINE.to_string());
        }
        flat.extend(line.iter().cloned());
    }
    flat
}

/// Join a grapheme run back into a string.
#[must_use]
pub fn join_run(run: &[String]) -> String {
    run.concat()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphemes_ascii() {
        let g: Vec<_> = graphemes("hello").collect();
        assert_eq!(g, vec!["h", "e", "l", "l", "o"]);
    }

    #[test]
    fn test_graphemes_emoji() {
        // Family emoji (ZWJ sequence)
        assert_eq!(split_graphemes("👨‍👩‍👧").len(), 1);
    }

    #[test]
    fn test_graphemes_combining() {
        // e + combining acute accent
        assert_eq!(split_graphemes("e\u{0301}x"), vec!["e\u{0301}", "x"]);
    }

    #[test]
    fn test_split_empty() {
        assert!(split_graphemes("").is_empty());
        assert_eq!(split_lines(""), vec![Vec::<String>::new()]);
    }

    #[test]
    fn test_split_lines_crlf() {
        let lines = split_lines("ab\r\ncd\n\nef");
        assert_eq!(lines.len(), 4);
        assert_eq!(join_run(&lines[0]), "ab");
        assert_eq!(join_run(&lines[1]), "cd");
        assert!(lines[2].is_empty());
        assert_eq!(join_run(&lines[3]), "ef");
    }

    #[test]
    fn test_flatten_lines() {
        let flat = flatten_lines(&split_lines("ab\nc"));
        assert_eq!(flat, vec!["a", "b", "\n", "c"]);
    }
}

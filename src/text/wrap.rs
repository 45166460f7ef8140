//! Greedy line wrapping of logical lines into visual lines.
//!
//! Words are never split: a word wider than the box gets a visual line of
//! its own, and the widest word raises the dynamic minimum width, which the
//! layout pass uses to grow the box.

use crate::error::Result;
use crate::text::measure::{TextMeasurer, WordMeasurer};
use crate::unicode::GraphemeRun;

/// Separator inserted between words of the same visual line in word mode.
pub const INFIX: &str = " ";

/// Default word joiners: space, tab and carriage return.
pub const DEFAULT_JOINERS: [char; 3] = [' ', '\t', '\r'];

/// Immutable wrapping configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct WrapConfig {
    /// Break between any two graphemes instead of at joiners. Meant for
    /// scripts without whitespace between words.
    pub split_by_grapheme: bool,
    /// Characters that separate words in word mode.
    pub joiners: Vec<char>,
    /// Width removed from the desired width before wrapping.
    pub reserved_space: f64,
}

impl Default for WrapConfig {
    fn default() -> Self {
        Self {
            split_by_grapheme: false,
            joiners: DEFAULT_JOINERS.to_vec(),
            reserved_space: 0.0,
        }
    }
}

impl WrapConfig {
    /// Word-boundary wrapping with the default joiners.
    #[must_use]
    pub fn words() -> Self {
        Self::default()
    }

    /// Grapheme-boundary wrapping.
    #[must_use]
    pub fn graphemes() -> Self {
        Self {
            split_by_grapheme: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_reserved_space(mut self, reserved: f64) -> Self {
        self.reserved_space = reserved;
        self
    }

    #[must_use]
    pub fn with_joiners(mut self, joiners: impl IntoIterator<Item = char>) -> Self {
        self.joiners = joiners.into_iter().collect();
        self
    }

    /// Whether a grapheme is a single joiner character.
    #[must_use]
    pub fn is_joiner(&self, grapheme: &str) -> bool {
        let mut chars = grapheme.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.joiners.contains(&c),
            _ => false,
        }
    }
}

/// Wraps logical lines to a target width.
#[derive(Clone, Debug, Default)]
pub struct LineWrapper {
    config: WrapConfig,
}

impl LineWrapper {
    #[must_use]
    pub fn new(config: WrapConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &WrapConfig {
        &self.config
    }

    /// Split a logical line into words.
    ///
    /// Grapheme mode gives one word per grapheme; word mode splits on joiners
    /// so consecutive joiners yield empty words. Always returns at least one
    /// (possibly empty) word.
    #[must_use]
    pub fn split_words<'l>(&self, line: &'l [String]) -> Vec<&'l [String]> {
        let words: Vec<&[String]> = if self.config.split_by_grapheme {
            line.chunks(1).collect()
        } else {
            line.split(|g| self.config.is_joiner(g)).collect()
        };
        if words.is_empty() {
            vec![&line[..0]]
        } else {
            words
        }
    }

    /// Wrap every logical line at `desired_width`.
    ///
    /// Hard newlines are never merged across. `dynamic_min_width` is read as
    /// the current floor and raised to the widest word seen.
    pub fn wrap<M: TextMeasurer + ?Sized>(
        &self,
        lines: &[GraphemeRun],
        desired_width: f64,
        dynamic_min_width: &mut f64,
        measurer: &mut WordMeasurer<'_, M>,
    ) -> Result<Vec<GraphemeRun>> {
        let mut wrapped = Vec::with_capacity(lines.len());
        for (line_index, line) in lines.iter().enumerate() {
            wrapped.extend(self.wrap_line(
                line,
                line_index,
                desired_width,
                dynamic_min_width,
                measurer,
            )?);
        }
        Ok(wrapped)
    }

    /// Wrap one logical line. An empty line gives one empty visual line.
    pub fn wrap_line<M: TextMeasurer + ?Sized>(
        &self,
        line: &[String],
        line_index: usize,
        desired_width: f64,
        dynamic_min_width: &mut f64,
        measurer: &mut WordMeasurer<'_, M>,
    ) -> Result<Vec<GraphemeRun>> {
        let by_grapheme = self.config.split_by_grapheme;
        let reserved = self.config.reserved_space;
        let additional_space = measurer.char_spacing();
        let words = self.split_words(line);
        let separator = usize::from(!by_grapheme);

        let mut offset = 0;
        let mut largest_word_width = 0.0_f64;
        let mut widths = Vec::with_capacity(words.len());
        for word in &words {
            let width = measurer.measure_word(word, line_index, offset)?;
            largest_word_width = largest_word_width.max(width);
            offset += word.len() + separator;
            widths.push(width);
        }

        let max_width = (desired_width - reserved)
            .max(largest_word_width)
            .max(*dynamic_min_width);

        let infix = [INFIX.to_string()];
        let mut visual_lines = Vec::new();
        let mut current: GraphemeRun = Vec::new();
        let mut line_width = 0.0;
        let mut infix_width = 0.0;
        let mut line_just_started = true;
        offset = 0;

        for (word, &word_width) in words.iter().zip(&widths) {
            offset += word.len();

            line_width += infix_width + word_width - additional_space;
            if line_width > max_width && !line_just_started {
                visual_lines.push(std::mem::take(&mut current));
                line_width = word_width;
                line_just_started = true;
            } else {
                line_width += additional_space;
            }

            if !line_just_started && !by_grapheme {
                current.push(INFIX.to_string());
            }
            current.extend(word.iter().cloned());

            infix_width = if by_grapheme {
                0.0
            } else {
                measurer.measure_word(&infix, line_index, offset)?
            };
            offset += separator;
            line_just_started = false;
        }
        visual_lines.push(current);

        if largest_word_width + reserved > *dynamic_min_width {
            *dynamic_min_width = largest_word_width - additional_space + reserved;
        }
        Ok(visual_lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::ResolvedStyle;
    use crate::text::measure::{CellMeasurer, GlyphCache};
    use crate::text::styles::StyleTable;
    use crate::unicode::{join_run, split_graphemes, split_lines};

    // 10px font, 0.5em cells: every ASCII grapheme is 5px wide.
    fn wrap_text(text: &str, config: WrapConfig, width: f64) -> (Vec<String>, f64) {
        let measurer = CellMeasurer::new(0.5);
        let styles = StyleTable::new();
        let base = ResolvedStyle {
            font_size: 10.0,
            ..ResolvedStyle::default()
        };
        let mut cache = GlyphCache::new();
        let mut words = WordMeasurer::new(&measurer, &styles, &base, &mut cache, 0.0);
        let mut dynamic_min_width = 0.0;
        let lines = LineWrapper::new(config)
            .wrap(&split_lines(text), width, &mut dynamic_min_width, &mut words)
            .unwrap();
        (lines.iter().map(|l| join_run(l)).collect(), dynamic_min_width)
    }

    #[test]
    fn test_is_joiner() {
        let config = WrapConfig::default();
        assert!(config.is_joiner(" "));
        assert!(config.is_joiner("\t"));
        assert!(!config.is_joiner("a"));
        assert!(!config.is_joiner("  "));
        assert!(!config.is_joiner(""));
    }

    #[test]
    fn test_split_words() {
        let wrapper = LineWrapper::new(WrapConfig::words());
        let line = split_graphemes("ab  c");
        let words = wrapper.split_words(&line);
        assert_eq!(words.len(), 3);
        assert!(words[1].is_empty());

        let empty: Vec<String> = Vec::new();
        assert_eq!(wrapper.split_words(&empty).len(), 1);
        let by_grapheme = LineWrapper::new(WrapConfig::graphemes());
        assert_eq!(by_grapheme.split_words(&empty).len(), 1);
        assert_eq!(by_grapheme.split_words(&line).len(), 5);
    }

    #[test]
    fn test_word_wrap_two_per_line() {
        // "the quick" = 9 graphemes = 45px
        let (lines, dmw) = wrap_text("the quick brown fox", WrapConfig::words(), 45.0);
        assert_eq!(lines, vec!["the quick", "brown fox"]);
        assert!((dmw - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_exact_fit_stays_on_line() {
        let (lines, _) = wrap_text("ab cd", WrapConfig::words(), 25.0);
        assert_eq!(lines, vec!["ab cd"]);
        let (lines, _) = wrap_text("ab cd", WrapConfig::words(), 24.9);
        assert_eq!(lines, vec!["ab", "cd"]);
    }

    #[test]
    fn test_long_word_grows_line() {
        let (lines, dmw) = wrap_text("a extraordinary b", WrapConfig::words(), 20.0);
        assert_eq!(lines, vec!["a", "extraordinary", "b"]);
        assert!((dmw - 65.0).abs() < 1e-9);
    }

    #[test]
    fn test_hard_newlines_not_merged() {
        let (lines, _) = wrap_text("a\nb", WrapConfig::words(), 1000.0);
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_lines_kept() {
        let (lines, dmw) = wrap_text("", WrapConfig::words(), 100.0);
        assert_eq!(lines, vec![""]);
        assert!(dmw.abs() < 1e-9);
        let (lines, _) = wrap_text("a\n\nb", WrapConfig::graphemes(), 100.0);
        assert_eq!(lines, vec!["a", "", "b"]);
    }

    #[test]
    fn test_tabs_become_spaces() {
        let (lines, _) = wrap_text("a\tb", WrapConfig::words(), 1000.0);
        assert_eq!(lines, vec!["a b"]);
    }

    #[test]
    fn test_grapheme_wrap() {
        let (lines, dmw) = wrap_text("abcdefg", WrapConfig::graphemes(), 15.0);
        assert_eq!(lines, vec!["abc", "def", "g"]);
        assert!((dmw - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_reserved_space() {
        let config = WrapConfig::words().with_reserved_space(10.0);
        let (lines, dmw) = wrap_text("ab cd", config, 25.0);
        assert_eq!(lines, vec!["ab", "cd"]);
        assert!((dmw - 20.0).abs() < 1e-9);
    }
}

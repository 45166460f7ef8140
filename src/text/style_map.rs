//! Visual-to-logical line mapping.
//!
//! Styles are stored per logical line, while rendering and editing address
//! wrapped visual lines. A [`StyleMap`] records, for every visual line, the
//! logical line it belongs to and the grapheme offset within that logical
//! line where it starts. It is rebuilt from scratch on every layout pass.

use crate::error::{Error, Result};
use crate::text::wrap::WrapConfig;
use crate::unicode::{GraphemeRun, NEWLINE, flatten_lines};
use serde::ser::{Serialize, Serializer};
use std::collections::BTreeSet;

/// Logical position where a visual line starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize)]
pub struct LineMapping {
    /// Logical line index.
    pub line: usize,
    /// Grapheme offset within the logical line.
    pub offset: usize,
}

/// Mapping from visual line index to [`LineMapping`].
///
/// Holds exactly one entry per visual line; `line` never decreases.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleMap {
    entries: Vec<LineMapping>,
    split_by_grapheme: bool,
}

impl StyleMap {
    /// Build the map for `visual_lines` wrapped from `logical_lines`.
    #[must_use]
    pub fn build(
        logical_lines: &[GraphemeRun],
        visual_lines: &[GraphemeRun],
        config: &WrapConfig,
    ) -> Self {
        Self::from_flattened(&flatten_lines(logical_lines), visual_lines, config)
    }

    /// Build the map from the flattened logical text (graphemes with
    /// newline entries between logical lines).
    #[must_use]
    pub fn from_flattened(
        grapheme_text: &[String],
        visual_lines: &[GraphemeRun],
        config: &WrapConfig,
    ) -> Self {
        let mut real_line = 0;
        let mut real_char = 0;
        let mut char_count = 0;
        let mut entries = Vec::with_capacity(visual_lines.len());

        for (i, visual) in visual_lines.iter().enumerate() {
            let next = grapheme_text.get(char_count).map(String::as_str);
            if i > 0 && next == Some(NEWLINE) {
                real_char = 0;
                char_count += 1;
                real_line += 1;
            } else if i > 0 && !config.split_by_grapheme && next.is_some_and(|g| config.is_joiner(g))
            {
                // joiner dropped at the wrap point
                real_char += 1;
                char_count += 1;
            }

            entries.push(LineMapping {
                line: real_line,
                offset: real_char,
            });

            char_count += visual.len();
            real_char += visual.len();
        }

        Self {
            entries,
            split_by_grapheme: config.split_by_grapheme,
        }
    }

    /// Number of visual lines mapped.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the map was built for grapheme-boundary wrapping.
    #[must_use]
    pub const fn split_by_grapheme(&self) -> bool {
        self.split_by_grapheme
    }

    /// All entries in visual line order.
    #[must_use]
    pub fn entries(&self) -> &[LineMapping] {
        &self.entries
    }

    /// Iterate over `(visual_line, mapping)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, LineMapping)> + '_ {
        self.entries.iter().copied().enumerate()
    }

    /// Mapping of a visual line.
    pub fn get(&self, visual_line: usize) -> Result<LineMapping> {
        self.entries
            .get(visual_line)
            .copied()
            .ok_or(Error::LineOutOfRange {
                line: visual_line,
                line_count: self.entries.len(),
            })
    }

    /// Translate a visual `(line, char)` into logical `(line, char)`.
    pub fn to_logical(&self, visual_line: usize, char_index: usize) -> Result<(usize, usize)> {
        let mapping = self.get(visual_line)?;
        Ok((mapping.line, mapping.offset + char_index))
    }

    /// Whether a visual line is the last one of its logical line.
    pub fn is_end_of_wrapping(&self, visual_line: usize) -> Result<bool> {
        let current = self.get(visual_line)?;
        Ok(self
            .entries
            .get(visual_line + 1)
            .is_none_or(|next| next.line != current.line))
    }

    /// Graphemes of the logical text skipped after a visual line.
    ///
    /// In word mode every break drops either a newline or a joiner, so this
    /// is always 1. In grapheme mode only hard newlines are dropped.
    pub fn missing_newline_offset(&self, visual_line: usize) -> Result<usize> {
        if self.split_by_grapheme {
            Ok(usize::from(self.is_end_of_wrapping(visual_line)?))
        } else {
            self.get(visual_line).map(|_| 1)
        }
    }

    /// Visual lines belonging to a logical line.
    pub fn visual_lines_of(&self, logical_line: usize) -> impl Iterator<Item = usize> + '_ {
        self.iter()
            .filter(move |(_, m)| m.line == logical_line)
            .map(|(i, _)| i)
    }

    /// Set of logical lines that have at least one visual line.
    #[must_use]
    pub fn logical_lines(&self) -> BTreeSet<usize> {
        self.entries.iter().map(|m| m.line).collect()
    }
}

impl Serialize for StyleMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().enumerate())
    }
}

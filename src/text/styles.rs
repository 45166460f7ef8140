//! Sparse per-character style storage in logical coordinates.
//!
//! Styles are keyed by logical line (hard newlines only) and grapheme index
//! within that line. Wrapped (visual) coordinates must be translated through
//! a [`StyleMap`](super::StyleMap) before touching this table.

use crate::style::{StyleDeclaration, StyleProperty};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

/// Declarations of one logical line, keyed by grapheme index.
pub type LineStyles = BTreeMap<usize, StyleDeclaration>;

/// Style table: logical line → grapheme index → declaration.
///
/// A line may be present with no declarations; that marks the line style as
/// initialized without styling any character.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleTable {
    lines: BTreeMap<usize, LineStyles>,
}

impl StyleTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if no character carries a non-empty declaration.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines
            .values()
            .all(|chars| chars.values().all(StyleDeclaration::is_empty))
    }

    /// Number of declarations stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.values().map(BTreeMap::len).sum()
    }

    /// Get the declaration of a character.
    #[must_use]
    pub fn get(&self, line: usize, char_index: usize) -> Option<&StyleDeclaration> {
        self.lines.get(&line)?.get(&char_index)
    }

    /// Set the declaration of a character, replacing any previous one.
    pub fn set(&mut self, line: usize, char_index: usize, style: StyleDeclaration) {
        self.lines.entry(line).or_default().insert(char_index, style);
    }

    /// Remove the declaration of a character.
    pub fn remove(&mut self, line: usize, char_index: usize) -> Option<StyleDeclaration> {
        self.lines.get_mut(&line)?.remove(&char_index)
    }

    /// Declarations of a logical line.
    #[must_use]
    pub fn line(&self, line: usize) -> Option<&LineStyles> {
        self.lines.get(&line)
    }

    /// Check whether a logical line has an entry (possibly empty).
    #[must_use]
    pub fn has_line(&self, line: usize) -> bool {
        self.lines.contains_key(&line)
    }

    /// Make sure a logical line has an entry, without styling any character.
    pub fn init_line(&mut self, line: usize) {
        self.lines.entry(line).or_default();
    }

    /// Iterate over `(line, declarations)` pairs in line order.
    pub fn lines(&self) -> impl Iterator<Item = (usize, &LineStyles)> {
        self.lines.iter().map(|(&line, chars)| (line, chars))
    }

    /// Merge `style` into every character of `range` on `line`.
    pub fn apply_range(&mut self, line: usize, range: Range<usize>, style: &StyleDeclaration) {
        let chars = self.lines.entry(line).or_default();
        for char_index in range {
            let merged = chars
                .get(&char_index)
                .map_or_else(|| style.clone(), |existing| existing.merge(style));
            chars.insert(char_index, merged);
        }
    }

    /// Whether any declaration on `line` (or on any line when `None`) sets
    /// `property`.
    #[must_use]
    pub fn has_property(&self, property: StyleProperty, line: Option<usize>) -> bool {
        match line {
            Some(line) => self
                .lines
                .get(&line)
                .is_some_and(|chars| chars.values().any(|s| s.has(property))),
            None => self
                .lines
                .values()
                .any(|chars| chars.values().any(|s| s.has(property))),
        }
    }

    /// Whether any non-empty declaration exists on `line` at grapheme
    /// indices `from..until` (`until = None` means to the end of the line).
    #[must_use]
    pub fn has_styles_in(&self, line: usize, from: usize, until: Option<usize>) -> bool {
        let Some(chars) = self.lines.get(&line) else {
            return false;
        };
        chars
            .range(from..)
            .take_while(|(idx, _)| until.is_none_or(|end| **idx < end))
            .any(|(_, style)| !style.is_empty())
    }

    /// Shift declarations at or after `char_index` right by `count`, then
    /// apply `style` to the inserted characters when given.
    pub fn insert_chars(
        &mut self,
        line: usize,
        char_index: usize,
        count: usize,
        style: Option<&StyleDeclaration>,
    ) {
        if count == 0 {
            return;
        }
        if let Some(chars) = self.lines.get_mut(&line) {
            let tail = chars.split_off(&char_index);
            chars.extend(tail.into_iter().map(|(idx, s)| (idx + count, s)));
        }
        if let Some(style) = style.filter(|s| !s.is_empty()) {
            let chars = self.lines.entry(line).or_default();
            for idx in char_index..char_index + count {
                chars.insert(idx, style.clone());
            }
        }
    }

    /// Remove declarations in `range` on `line` and shift later ones left.
    pub fn remove_chars(&mut self, line: usize, range: Range<usize>) {
        let removed = range.end.saturating_sub(range.start);
        if removed == 0 {
            return;
        }
        let Some(chars) = self.lines.get_mut(&line) else {
            return;
        };
        let tail = chars.split_off(&range.start);
        chars.extend(
            tail.into_iter()
                .filter(|(idx, _)| *idx >= range.end)
                .map(|(idx, s)| (idx - removed, s)),
        );
    }

    /// Split `line` at `char_index`: later declarations move to a new line
    /// inserted after it, and all following lines shift down by one.
    pub fn split_line(&mut self, line: usize, char_index: usize) {
        let following = self.lines.split_off(&(line + 1));
        self.lines
            .extend(following.into_iter().map(|(idx, chars)| (idx + 1, chars)));

        let moved = self
            .lines
            .get_mut(&line)
            .map(|chars| chars.split_off(&char_index));
        if let Some(moved) = moved.filter(|m| !m.is_empty()) {
            self.lines.insert(
                line + 1,
                moved
                    .into_iter()
                    .map(|(idx, s)| (idx - char_index, s))
                    .collect(),
            );
        }
    }

    /// Join `line + 1` onto `line`, whose length before the join is
    /// `line_len`. All lines after the joined one shift up by one.
    pub fn join_lines(&mut self, line: usize, line_len: usize) {
        let mut following = self.lines.split_off(&(line + 1));
        if let Some(next) = following.remove(&(line + 1)) {
            if !next.is_empty() {
                let chars = self.lines.entry(line).or_default();
                chars.extend(next.into_iter().map(|(idx, s)| (idx + line_len, s)));
            }
        }
        self.lines
            .extend(following.into_iter().map(|(idx, chars)| (idx - 1, chars)));
    }

    /// Drop every line not contained in `keep`.
    pub fn retain_lines(&mut self, keep: &BTreeSet<usize>) {
        self.lines.retain(|line, _| keep.contains(line));
    }

    /// Drop declarations past the end of their line and lines past
    /// `line_lengths.len()`.
    pub fn truncate_to(&mut self, line_lengths: &[usize]) {
        self.lines.retain(|line, chars| {
            line_lengths.get(*line).is_some_and(|&len| {
                chars.retain(|idx, _| *idx < len);
                true
            })
        });
    }
}

//! The note text box.
//!
//! [`TextEntity`] owns the logical content (lines and styles), the box
//! properties, a [`LayoutController`] and a measurer. Every mutation marks the
//! layout dirty; queries that need geometry run a pass first.
//!
//! Two coordinate systems are in use:
//! - logical `(line, char)`: lines split on hard newlines only, used by the
//!   editing methods and by [`StyleTable`];
//! - visual `(line, char)`: wrapped lines, used by geometry and the `*_at`
//!   style methods, translated through the [`StyleMap`].

use crate::error::{Error, Result};
use crate::style::{ResolvedStyle, StyleDeclaration, StyleProperty, TextAlign};
use crate::text::layout::{LayoutController, TextLayout};
use crate::text::measure::{CacheStats, CellMeasurer, TextMeasurer};
use crate::text::props::{TextProps, check_non_negative, check_positive};
use crate::text::style_map::StyleMap;
use crate::text::styles::StyleTable;
use crate::unicode::{GraphemeRun, join_run, split_lines};
use serde_json::{Map, Value};

/// Number of emoji vote slots on a note.
pub const EMOJI_SLOTS: usize = 5;

/// A caret position in visual coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CursorLocation {
    pub line_index: usize,
    pub char_index: usize,
}

/// A styled, wrapping text box.
#[derive(Debug)]
pub struct TextEntity<M: TextMeasurer = CellMeasurer> {
    lines: Vec<GraphemeRun>,
    styles: StyleTable,
    props: TextProps,
    controller: LayoutController,
    measurer: M,
    metadata: Map<String, Value>,
}

impl TextEntity<CellMeasurer> {
    /// Create a note measured with the default [`CellMeasurer`].
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self::new(text, CellMeasurer::default())
    }
}

impl<M: TextMeasurer> TextEntity<M> {
    /// Create a note with default properties and no styles.
    pub fn new(text: &str, measurer: M) -> Self {
        let props = TextProps::default();
        Self {
            lines: split_lines(text),
            styles: StyleTable::new(),
            controller: LayoutController::new(props.wrap_config()),
            props,
            measurer,
            metadata: Map::new(),
        }
    }

    /// Replace the box properties.
    pub fn with_props(mut self, props: TextProps) -> Result<Self> {
        props.validate()?;
        self.controller.set_wrap_config(props.wrap_config());
        self.props = props;
        self.controller.invalidate();
        Ok(self)
    }

    /// Replace the style table.
    #[must_use]
    pub fn with_styles(mut self, styles: StyleTable) -> Self {
        self.styles = styles;
        self.controller.invalidate();
        self
    }

    /// Replace the passthrough metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Text with logical lines joined by `\n`.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|line| join_run(line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[must_use]
    pub fn logical_lines(&self) -> &[GraphemeRun] {
        &self.lines
    }

    #[must_use]
    pub const fn styles(&self) -> &StyleTable {
        &self.styles
    }

    #[must_use]
    pub const fn props(&self) -> &TextProps {
        &self.props
    }

    #[must_use]
    pub const fn measurer(&self) -> &M {
        &self.measurer
    }

    #[must_use]
    pub const fn controller(&self) -> &LayoutController {
        &self.controller
    }

    #[must_use]
    pub const fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    /// Mutable access to the passthrough metadata. Layout never reads it.
    pub fn metadata_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.metadata
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.controller.cache_stats()
    }

    /// Replace the whole text. Styles past the new line ends are dropped.
    pub fn set_text(&mut self, text: &str) {
        self.lines = split_lines(text);
        let lengths: Vec<usize> = self.lines.iter().map(Vec::len).collect();
        self.styles.truncate_to(&lengths);
        self.controller.invalidate();
    }

    /// Merge `style` into graphemes `start..end` of a logical line.
    pub fn set_style_range(
        &mut self,
        line: usize,
        start: usize,
        end: usize,
        style: &StyleDeclaration,
    ) -> Result<()> {
        let len = self.logical_len(line)?;
        if start > end || end > len {
            return Err(Error::CharOutOfRange {
                line,
                char_index: start.max(end),
                len,
            });
        }
        self.styles.apply_range(line, start..end, style);
        self.controller.invalidate();
        Ok(())
    }

    pub fn set_width(&mut self, width: f64) -> Result<()> {
        check_non_negative("width", width)?;
        self.props.width = width;
        self.controller.invalidate();
        Ok(())
    }

    pub fn set_font_size(&mut self, font_size: f64) -> Result<()> {
        check_positive("fontSize", font_size)?;
        self.props.font_size = font_size;
        self.controller.invalidate();
        Ok(())
    }

    pub fn set_max_height(&mut self, max_height: f64) -> Result<()> {
        check_non_negative("maxHeight", max_height)?;
        self.props.max_height = max_height;
        self.controller.invalidate();
        Ok(())
    }

    /// Set the lower bound used by [`resize`](Self::resize).
    pub fn set_min_width(&mut self, min_width: f64) -> Result<()> {
        check_non_negative("minWidth", min_width)?;
        self.props.min_width = min_width;
        Ok(())
    }

    pub fn set_line_height(&mut self, line_height: f64) -> Result<()> {
        check_positive("lineHeight", line_height)?;
        self.props.line_height = line_height;
        self.controller.invalidate();
        Ok(())
    }

    /// Set char spacing in thousandths of an em.
    pub fn set_char_spacing(&mut self, char_spacing: f64) -> Result<()> {
        if !char_spacing.is_finite() {
            return Err(Error::InvalidValue {
                name: "charSpacing",
                value: char_spacing,
            });
        }
        self.props.char_spacing = char_spacing;
        self.controller.invalidate();
        Ok(())
    }

    pub fn set_text_align(&mut self, align: TextAlign) {
        if self.props.text_align != align {
            self.props.text_align = align;
            self.controller.invalidate();
        }
    }

    /// Switch between word and grapheme wrapping.
    pub fn set_split_by_grapheme(&mut self, split: bool) {
        self.props.split_by_grapheme = split;
        self.controller.set_wrap_config(self.props.wrap_config());
    }

    /// Control-driven resize: the width never goes below
    /// [`get_min_width`](Self::get_min_width). Returns the applied width.
    pub fn resize(&mut self, width: f64) -> Result<f64> {
        check_non_negative("width", width)?;
        let applied = width.max(self.get_min_width());
        self.set_width(applied)?;
        Ok(applied)
    }

    /// Force the next query to run a layout pass.
    pub fn invalidate(&mut self) {
        self.controller.invalidate();
    }

    /// Insert `text` before grapheme `char_index` of a logical line.
    ///
    /// Newlines in `text` split the line. Inserted graphemes copy the style
    /// of the grapheme before the insertion point, if any.
    pub fn insert_chars(&mut self, line: usize, char_index: usize, text: &str) -> Result<()> {
        self.check_position(line, char_index)?;
        let style = char_index
            .checked_sub(1)
            .and_then(|prev| self.styles.get(line, prev))
            .cloned();

        let (mut line, mut char_index) = (line, char_index);
        for (i, piece) in split_lines(text).into_iter().enumerate() {
            if i > 0 {
                self.split_at(line, char_index);
                line += 1;
                char_index = 0;
            }
            let count = piece.len();
            self.styles
                .insert_chars(line, char_index, count, style.as_ref());
            self.lines[line].splice(char_index..char_index, piece);
            char_index += count;
        }
        self.controller.invalidate();
        Ok(())
    }

    /// Remove graphemes `start..end` of a logical line.
    pub fn remove_chars(&mut self, line: usize, start: usize, end: usize) -> Result<()> {
        let len = self.logical_len(line)?;
        if start > end || end > len {
            return Err(Error::CharOutOfRange {
                line,
                char_index: start.max(end),
                len,
            });
        }
        self.lines[line].drain(start..end);
        self.styles.remove_chars(line, start..end);
        self.controller.invalidate();
        Ok(())
    }

    /// Split a logical line in two before grapheme `char_index`.
    pub fn insert_newline(&mut self, line: usize, char_index: usize) -> Result<()> {
        self.check_position(line, char_index)?;
        self.split_at(line, char_index);
        self.controller.invalidate();
        Ok(())
    }

    /// Join logical line `line + 1` onto `line`.
    pub fn remove_newline(&mut self, line: usize) -> Result<()> {
        let len = self.logical_len(line)?;
        if line + 1 >= self.lines.len() {
            return Err(Error::LineOutOfRange {
                line: line + 1,
                line_count: self.lines.len(),
            });
        }
        let next = self.lines.remove(line + 1);
        self.lines[line].extend(next);
        self.styles.join_lines(line, len);
        self.controller.invalidate();
        Ok(())
    }

    fn split_at(&mut self, line: usize, char_index: usize) {
        let tail = self.lines[line].split_off(char_index);
        self.lines.insert(line + 1, tail);
        self.styles.split_line(line, char_index);
    }

    fn logical_len(&self, line: usize) -> Result<usize> {
        self.lines
            .get(line)
            .map(Vec::len)
            .ok_or(Error::LineOutOfRange {
                line,
                line_count: self.lines.len(),
            })
    }

    fn check_position(&self, line: usize, char_index: usize) -> Result<()> {
        let len = self.logical_len(line)?;
        if char_index > len {
            return Err(Error::CharOutOfRange {
                line,
                char_index,
                len,
            });
        }
        Ok(())
    }

    /// Run a layout pass if needed and return the current layout.
    pub fn ensure_layout(&mut self) -> Result<&TextLayout> {
        self.controller
            .ensure_layout(&self.lines, &self.styles, &mut self.props, &self.measurer)
    }

    /// Current layout, if no mutation happened since the last pass.
    #[must_use]
    pub fn layout(&self) -> Option<&TextLayout> {
        self.controller.layout()
    }

    pub fn visual_lines(&mut self) -> Result<&[GraphemeRun]> {
        Ok(self.ensure_layout()?.visual_lines())
    }

    pub fn style_map(&mut self) -> Result<&StyleMap> {
        Ok(self.ensure_layout()?.style_map())
    }

    pub fn get_visual_line_count(&mut self) -> Result<usize> {
        Ok(self.ensure_layout()?.visual_line_count())
    }

    pub fn get_line_height(&mut self, visual_line: usize) -> Result<f64> {
        self.ensure_layout()?.line_height(visual_line)
    }

    pub fn get_line_width(&mut self, visual_line: usize) -> Result<f64> {
        self.ensure_layout()?.line_width(visual_line)
    }

    /// `max(min_width, dynamic_min_width)` as of the last pass.
    #[must_use]
    pub fn get_min_width(&self) -> f64 {
        self.props.min_width.max(self.controller.dynamic_min_width())
    }

    /// Top offset that centers the text inside a rectangle of `rect_height`.
    pub fn centered_top(&mut self, rect_height: f64) -> Result<f64> {
        let height = self.ensure_layout()?.height();
        Ok((rect_height - height) / 2.0)
    }

    /// Visual caret location of a flat selection offset.
    ///
    /// Offsets past the end clamp to the end of the last visual line.
    pub fn cursor_location(&mut self, selection_start: usize) -> Result<CursorLocation> {
        let layout = self.ensure_layout()?;
        let map = layout.style_map();
        let lines = layout.visual_lines();
        let mut remaining = selection_start;
        for (i, line) in lines.iter().enumerate() {
            if remaining <= line.len() {
                return Ok(CursorLocation {
                    line_index: i,
                    char_index: remaining,
                });
            }
            remaining = remaining.saturating_sub(line.len() + map.missing_newline_offset(i)?);
        }
        let last = lines.len().saturating_sub(1);
        Ok(CursorLocation {
            line_index: last,
            char_index: lines.get(last).map_or(0, |l| l.len().min(remaining)),
        })
    }

    /// Flat selection offset of a visual caret location.
    pub fn selection_offset(&mut self, location: CursorLocation) -> Result<usize> {
        let layout = self.ensure_layout()?;
        let map = layout.style_map();
        let lines = layout.visual_lines();
        let line = lines.get(location.line_index).ok_or(Error::LineOutOfRange {
            line: location.line_index,
            line_count: lines.len(),
        })?;
        if location.char_index > line.len() {
            return Err(Error::CharOutOfRange {
                line: location.line_index,
                char_index: location.char_index,
                len: line.len(),
            });
        }
        let mut offset = location.char_index;
        for (i, previous) in lines[..location.line_index].iter().enumerate() {
            offset += previous.len() + map.missing_newline_offset(i)?;
        }
        Ok(offset)
    }

    /// Declaration of the grapheme at a visual position.
    pub fn style_at(
        &mut self,
        visual_line: usize,
        char_index: usize,
    ) -> Result<Option<&StyleDeclaration>> {
        let (line, ch) = self.to_logical(visual_line, char_index)?;
        Ok(self.styles.get(line, ch))
    }

    /// Full style of the grapheme at a visual position.
    pub fn resolved_style_at(
        &mut self,
        visual_line: usize,
        char_index: usize,
    ) -> Result<ResolvedStyle> {
        let (line, ch) = self.to_logical(visual_line, char_index)?;
        let base = self.props.base_style();
        Ok(self
            .styles
            .get(line, ch)
            .map_or_else(|| base.clone(), |decl| base.apply(decl)))
    }

    /// Replace the declaration of the grapheme at a visual position.
    pub fn set_style_at(
        &mut self,
        visual_line: usize,
        char_index: usize,
        style: StyleDeclaration,
    ) -> Result<()> {
        let (line, ch) = self.to_logical(visual_line, char_index)?;
        self.styles.set(line, ch, style);
        self.controller.invalidate();
        Ok(())
    }

    /// Remove the declaration of the grapheme at a visual position.
    pub fn delete_style_at(
        &mut self,
        visual_line: usize,
        char_index: usize,
    ) -> Result<Option<StyleDeclaration>> {
        let (line, ch) = self.to_logical(visual_line, char_index)?;
        let removed = self.styles.remove(line, ch);
        if removed.is_some() {
            self.controller.invalidate();
        }
        Ok(removed)
    }

    /// Whether `property` is set anywhere, or on the logical line owning a
    /// visual line.
    pub fn style_has(&mut self, property: StyleProperty, visual_line: Option<usize>) -> Result<bool> {
        let line = match visual_line {
            Some(vl) => Some(self.ensure_layout()?.style_map().get(vl)?.line),
            None => None,
        };
        Ok(self.styles.has_property(property, line))
    }

    /// Whether the box has no styling at all, or none on the graphemes of
    /// one visual line.
    pub fn is_empty_styles(&mut self, visual_line: Option<usize>) -> Result<bool> {
        let Some(vl) = visual_line else {
            return Ok(self.styles.is_empty());
        };
        let map = self.ensure_layout()?.style_map();
        let current = map.get(vl)?;
        let until = map
            .get(vl + 1)
            .ok()
            .filter(|next| next.line == current.line)
            .map(|next| next.offset);
        Ok(!self.styles.has_styles_in(current.line, current.offset, until))
    }

    /// Whether the logical line owning a visual line has a style entry.
    pub fn line_has_styles(&mut self, visual_line: usize) -> Result<bool> {
        let line = self.ensure_layout()?.style_map().get(visual_line)?.line;
        Ok(self.styles.has_line(line))
    }

    /// Create an empty style entry for the logical line owning a visual line.
    pub fn init_line_style(&mut self, visual_line: usize) -> Result<()> {
        let line = self.ensure_layout()?.style_map().get(visual_line)?.line;
        self.styles.init_line(line);
        Ok(())
    }

    /// Drop style entries of logical lines that have no visual line.
    pub fn remove_extraneous_styles(&mut self) -> Result<()> {
        let keep = self.ensure_layout()?.style_map().logical_lines();
        self.styles.retain_lines(&keep);
        Ok(())
    }

    /// Logical position of the grapheme at a visual position. The index must
    /// name a grapheme of that visual line.
    fn to_logical(&mut self, visual_line: usize, char_index: usize) -> Result<(usize, usize)> {
        let layout = self.ensure_layout()?;
        let len = layout
            .visual_lines()
            .get(visual_line)
            .map_or(0, Vec::len);
        let position = layout.style_map().to_logical(visual_line, char_index)?;
        if char_index >= len {
            return Err(Error::CharOutOfRange {
                line: visual_line,
                char_index,
                len,
            });
        }
        Ok(position)
    }

    /// Persisted object id.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.metadata.get("_id").and_then(Value::as_str)
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.metadata
            .get("locked")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Vote counts per emoji slot. Missing or malformed entries count as 0.
    #[must_use]
    pub fn emoji_votes(&self) -> [u64; EMOJI_SLOTS] {
        let mut votes = [0; EMOJI_SLOTS];
        if let Some(values) = self.metadata.get("emoji").and_then(Value::as_array) {
            for (slot, value) in votes.iter_mut().zip(values) {
                *slot = value.as_u64().unwrap_or(0);
            }
        }
        votes
    }
}

impl<M: TextMeasurer + Default> Default for TextEntity<M> {
    fn default() -> Self {
        Self::new("", M::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::layout::LayoutState;

    fn note(text: &str, width: f64) -> TextEntity {
        TextEntity::from_text(text)
            .with_props(TextProps {
                width,
                split_by_grapheme: false,
                text_align: TextAlign::Left,
                max_height: 1000.0,
                ..TextProps::default()
            })
            .unwrap()
    }

    #[test]
    fn test_text_roundtrip_and_dirty_on_mutation() {
        let mut entity = note("ab\ncd", 200.0);
        assert_eq!(entity.text(), "ab\ncd");
        entity.ensure_layout().unwrap();
        assert_eq!(entity.controller().state(), LayoutState::Clean);

        entity.set_width(100.0).unwrap();
        assert_eq!(entity.controller().state(), LayoutState::Dirty);
        entity.ensure_layout().unwrap();
        entity.set_text("xyz");
        assert!(entity.layout().is_none());
        assert_eq!(entity.get_visual_line_count().unwrap(), 1);
    }

    #[test]
    fn test_setters_reject_invalid_values() {
        let mut entity = note("a", 100.0);
        assert!(entity.set_width(-1.0).is_err());
        assert!(entity.set_font_size(0.0).is_err());
        assert!(entity.set_line_height(f64::NAN).is_err());
        assert!(entity.set_char_spacing(f64::INFINITY).is_err());
        assert!((entity.props().width - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_insert_chars_copies_previous_style() {
        let mut entity = note("ac", 200.0);
        entity
            .set_style_range(0, 0, 1, &StyleDeclaration::fill("red"))
            .unwrap();
        entity.insert_chars(0, 1, "b").unwrap();
        assert_eq!(entity.text(), "abc");
        assert_eq!(entity.styles().get(0, 1), Some(&StyleDeclaration::fill("red")));
        assert!(entity.styles().get(0, 2).is_none());
    }

    #[test]
    fn test_insert_chars_with_newline_splits_line() {
        let mut entity = note("ad", 200.0);
        entity
            .set_style_range(0, 1, 2, &StyleDeclaration::fill("blue"))
            .unwrap();
        entity.insert_chars(0, 1, "b\nc").unwrap();
        assert_eq!(entity.text(), "ab\ncd");
        assert_eq!(entity.logical_lines().len(), 2);
        // the styled "d" moved to line 1, after "c"
        assert_eq!(entity.styles().get(1, 1), Some(&StyleDeclaration::fill("blue")));
    }

    #[test]
    fn test_remove_chars_and_newlines() {
        let mut entity = note("abc\ndef", 200.0);
        entity.remove_chars(0, 1, 2).unwrap();
        assert_eq!(entity.text(), "ac\ndef");
        entity.remove_newline(0).unwrap();
        assert_eq!(entity.text(), "acdef");
        entity.insert_newline(0, 2).unwrap();
        assert_eq!(entity.text(), "ac\ndef");

        assert!(matches!(
            entity.remove_chars(0, 1, 5),
            Err(Error::CharOutOfRange { .. })
        ));
        assert!(matches!(
            entity.remove_newline(1),
            Err(Error::LineOutOfRange { .. })
        ));
        assert!(entity.insert_chars(4, 0, "x").is_err());
    }

    #[test]
    fn test_style_at_translates_visual_coordinates() {
        // 8px graphemes: "the quick" is 72px
        let mut entity = note("the quick brown fox", 72.0);
        entity
            .set_style_range(0, 10, 15, &StyleDeclaration::fill("green"))
            .unwrap();
        assert_eq!(entity.get_visual_line_count().unwrap(), 2);
        assert_eq!(
            entity.style_at(1, 0).unwrap(),
            Some(&StyleDeclaration::fill("green"))
        );
        assert!(entity.style_at(0, 0).unwrap().is_none());
        assert_eq!(entity.resolved_style_at(1, 4).unwrap().fill, "green");
        assert_eq!(entity.resolved_style_at(1, 6).unwrap().fill, "#000000");
        assert!(matches!(
            entity.style_at(2, 0),
            Err(Error::LineOutOfRange { line: 2, .. })
        ));
    }

    #[test]
    fn test_set_and_delete_style_at() {
        let mut entity = note("ab cd", 16.0);
        assert_eq!(entity.get_visual_line_count().unwrap(), 2);
        entity
            .set_style_at(1, 1, StyleDeclaration::font_size(20.0))
            .unwrap();
        assert!(entity.styles().get(0, 4).is_some());
        assert!(entity.style_has(StyleProperty::FontSize, Some(1)).unwrap());
        assert!(!entity.style_has(StyleProperty::Fill, None).unwrap());

        let removed = entity.delete_style_at(1, 1).unwrap();
        assert!(removed.is_some());
        assert!(entity.styles().get(0, 4).is_none());
    }

    #[test]
    fn test_visual_style_ops_reject_index_past_line_end() {
        let mut entity = note("ab cd", 16.0);
        assert_eq!(entity.ensure_layout().unwrap().lines(), ["ab", "cd"]);

        // index 3 of visual line 0 would alias "c" on visual line 1
        assert!(matches!(
            entity.set_style_at(0, 3, StyleDeclaration::fill("red")),
            Err(Error::CharOutOfRange {
                line: 0,
                char_index: 3,
                len: 2
            })
        ));
        assert!(matches!(
            entity.set_style_at(0, 99, StyleDeclaration::fill("red")),
            Err(Error::CharOutOfRange { char_index: 99, .. })
        ));
        assert!(entity.style_at(1, 0).unwrap().is_none());
        assert!(entity.styles().is_empty());

        assert!(entity.style_at(0, 2).is_err());
        assert!(entity.resolved_style_at(1, 2).is_err());
        assert!(entity.delete_style_at(1, 5).is_err());
        assert!(entity.style_at(1, 1).unwrap().is_none());
    }

    #[test]
    fn test_is_empty_styles_limits_to_visual_line() {
        let mut entity = note("ab cd", 16.0);
        entity
            .set_style_range(0, 3, 4, &StyleDeclaration::fill("red"))
            .unwrap();
        assert!(!entity.is_empty_styles(None).unwrap());
        assert!(entity.is_empty_styles(Some(0)).unwrap());
        assert!(!entity.is_empty_styles(Some(1)).unwrap());
    }

    #[test]
    fn test_line_style_entries() {
        let mut entity = note("ab\ncd", 200.0);
        assert!(!entity.line_has_styles(1).unwrap());
        entity.init_line_style(1).unwrap();
        assert!(entity.line_has_styles(1).unwrap());
        assert!(entity.is_empty_styles(None).unwrap());
    }

    #[test]
    fn test_remove_extraneous_styles() {
        let mut styles = StyleTable::new();
        styles.set(0, 0, StyleDeclaration::fill("red"));
        styles.set(7, 0, StyleDeclaration::fill("red"));
        let mut entity = note("ab", 200.0).with_styles(styles);
        entity.remove_extraneous_styles().unwrap();
        assert!(entity.styles().has_line(0));
        assert!(!entity.styles().has_line(7));
    }

    #[test]
    fn test_cursor_location_word_mode() {
        let mut entity = note("ab cd\nef", 16.0);
        // visual lines: "ab", "cd", "ef"
        assert_eq!(
            entity.cursor_location(2).unwrap(),
            CursorLocation {
                line_index: 0,
                char_index: 2
            }
        );
        assert_eq!(
            entity.cursor_location(4).unwrap(),
            CursorLocation {
                line_index: 1,
                char_index: 1
            }
        );
        assert_eq!(
            entity.cursor_location(6).unwrap(),
            CursorLocation {
                line_index: 2,
                char_index: 0
            }
        );
        assert_eq!(
            entity.cursor_location(99).unwrap(),
            CursorLocation {
                line_index: 2,
                char_index: 2
            }
        );
        for offset in 0..=8 {
            let location = entity.cursor_location(offset).unwrap();
            assert_eq!(entity.selection_offset(location).unwrap(), offset);
        }
    }

    #[test]
    fn test_resize_respects_min_width() {
        let mut entity = note("extraordinary", 200.0);
        assert!((entity.get_min_width() - 20.0).abs() < f64::EPSILON);
        entity.ensure_layout().unwrap();
        // 13 graphemes * 8px
        assert!((entity.get_min_width() - 104.0).abs() < 1e-9);
        let applied = entity.resize(50.0).unwrap();
        assert!((applied - 104.0).abs() < 1e-9);
        assert!((entity.resize(150.0).unwrap() - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_centered_top() {
        let mut entity = note("a", 200.0);
        let line = 16.0 * 1.16 * 1.13;
        let top = entity.centered_top(100.0).unwrap();
        assert!((top - (100.0 - line) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_metadata_helpers() {
        let mut entity = note("a", 100.0);
        assert_eq!(entity.emoji_votes(), [0; EMOJI_SLOTS]);
        assert!(!entity.is_locked());
        entity
            .metadata_mut()
            .insert("_id".into(), Value::from("n1"));
        entity.metadata_mut().insert("locked".into(), Value::from(true));
        entity
            .metadata_mut()
            .insert("emoji".into(), serde_json::json!([1, 0, 3]));
        assert_eq!(entity.id(), Some("n1"));
        assert!(entity.is_locked());
        assert_eq!(entity.emoji_votes(), [1, 0, 3, 0, 0]);
    }
}

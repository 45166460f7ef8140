//! Grapheme and word measurement.
//!
//! Measurement is delegated to a [`TextMeasurer`] (the rendering surface).
//! [`WordMeasurer`] resolves each grapheme's style from the [`StyleTable`],
//! adds box-level char spacing and caches results per entity in a
//! [`GlyphCache`] keyed by logical `(line, char)` position.

use crate::error::{Error, Result};
use crate::style::ResolvedStyle;
use crate::text::styles::StyleTable;
use crate::unicode::{WidthMethod, display_width_with_method};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

/// Width of a grapheme as reported by a measurer.
///
/// `kerned_width` is the advance once pair kerning against the previous
/// grapheme is applied; it equals `width` when there is no previous grapheme.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GraphemeMetrics {
    pub width: f64,
    pub kerned_width: f64,
}

/// Bounding box of one grapheme on a visual line.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GraphemeBox {
    /// Offset from the start of the visual line.
    pub left: f64,
    pub width: f64,
    pub kerned_width: f64,
    /// Font size of the grapheme.
    pub height: f64,
    pub delta_y: f64,
}

/// Measuring capability of a rendering surface.
pub trait TextMeasurer {
    /// Measure `grapheme` drawn with `style`, kerned against `previous`.
    ///
    /// Must be deterministic: the same inputs always give the same metrics.
    fn measure_grapheme(
        &self,
        grapheme: &str,
        style: &ResolvedStyle,
        previous: Option<(&str, &ResolvedStyle)>,
    ) -> Result<GraphemeMetrics>;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure_grapheme(
        &self,
        grapheme: &str,
        style: &ResolvedStyle,
        previous: Option<(&str, &ResolvedStyle)>,
    ) -> Result<GraphemeMetrics> {
        (**self).measure_grapheme(grapheme, style, previous)
    }
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for Box<T> {
    fn measure_grapheme(
        &self,
        grapheme: &str,
        style: &ResolvedStyle,
        previous: Option<(&str, &ResolvedStyle)>,
    ) -> Result<GraphemeMetrics> {
        (**self).measure_grapheme(grapheme, style, previous)
    }
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for Rc<T> {
    fn measure_grapheme(
        &self,
        grapheme: &str,
        style: &ResolvedStyle,
        previous: Option<(&str, &ResolvedStyle)>,
    ) -> Result<GraphemeMetrics> {
        (**self).measure_grapheme(grapheme, style, previous)
    }
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for Arc<T> {
    fn measure_grapheme(
        &self,
        grapheme: &str,
        style: &ResolvedStyle,
        previous: Option<(&str, &ResolvedStyle)>,
    ) -> Result<GraphemeMetrics> {
        (**self).measure_grapheme(grapheme, style, previous)
    }
}

/// Measurer that sizes graphemes from their Unicode display width.
///
/// Each cell advances `advance * font_size`. Tabs count as one cell and other
/// control characters as zero. Optional kerning pairs (in em units) adjust
/// `kerned_width`.
#[derive(Clone, Debug)]
pub struct CellMeasurer {
    advance: f64,
    method: WidthMethod,
    kerning: HashMap<(String, String), f64>,
}

impl Default for CellMeasurer {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl CellMeasurer {
    /// Create a measurer where one cell is `advance` em wide.
    #[must_use]
    pub fn new(advance: f64) -> Self {
        Self {
            advance,
            method: WidthMethod::WcWidth,
            kerning: HashMap::new(),
        }
    }

    /// Use a different width method for ambiguous-width characters.
    #[must_use]
    pub fn with_width_method(mut self, method: WidthMethod) -> Self {
        self.method = method;
        self
    }

    /// Add a kerning adjustment (in em) applied when `right` follows `left`.
    #[must_use]
    pub fn with_kerning(mut self, left: &str, right: &str, em: f64) -> Self {
        self.kerning.insert((left.to_string(), right.to_string()), em);
        self
    }

    /// Number of cells a grapheme occupies.
    #[must_use]
    pub fn cells(&self, grapheme: &str) -> usize {
        if grapheme == "\t" {
            return 1;
        }
        if grapheme.chars().all(char::is_control) {
            return 0;
        }
        display_width_with_method(grapheme, self.method)
    }
}

impl TextMeasurer for CellMeasurer {
    fn measure_grapheme(
        &self,
        grapheme: &str,
        style: &ResolvedStyle,
        previous: Option<(&str, &ResolvedStyle)>,
    ) -> Result<GraphemeMetrics> {
        if !style.font_size.is_finite() || style.font_size < 0.0 {
            return Err(Error::measure(
                grapheme,
                format!("unusable font size {}", style.font_size),
            ));
        }
        let width = self.cells(grapheme) as f64 * self.advance * style.font_size;
        let kern = previous
            .and_then(|(prev, _)| {
                self.kerning
                    .get(&(prev.to_string(), grapheme.to_string()))
                    .copied()
            })
            .unwrap_or(0.0);
        Ok(GraphemeMetrics {
            width,
            kerned_width: width + kern * style.font_size,
        })
    }
}

#[derive(Clone, Debug)]
struct CachedGlyph {
    grapheme: String,
    previous: Option<String>,
    style: ResolvedStyle,
    metrics: GraphemeMetrics,
}

/// Statistics about glyph cache usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
}

/// Per-entity cache of grapheme metrics keyed by logical `(line, char)`.
///
/// An entry is only reused when grapheme, previous grapheme and style all
/// match; otherwise it is replaced.
#[derive(Clone, Debug, Default)]
pub struct GlyphCache {
    entries: HashMap<(usize, usize), CachedGlyph>,
    hits: u64,
    misses: u64,
}

impl GlyphCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry. Hit/miss counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop the entries of one logical line.
    pub fn invalidate_line(&mut self, line: usize) {
        self.entries.retain(|&(l, _), _| l != line);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.entries.len(),
        }
    }

    fn lookup(
        &mut self,
        key: (usize, usize),
        grapheme: &str,
        previous: Option<&str>,
        style: &ResolvedStyle,
    ) -> Option<GraphemeMetrics> {
        let hit = self.entries.get(&key).and_then(|cached| {
            (cached.grapheme == grapheme
                && cached.previous.as_deref() == previous
                && cached.style == *style)
                .then_some(cached.metrics)
        });
        if hit.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        hit
    }

    fn store(
        &mut self,
        key: (usize, usize),
        grapheme: &str,
        previous: Option<&str>,
        style: ResolvedStyle,
        metrics: GraphemeMetrics,
    ) {
        self.entries.insert(
            key,
            CachedGlyph {
                grapheme: grapheme.to_string(),
                previous: previous.map(str::to_string),
                style,
                metrics,
            },
        );
    }
}

/// Measures words of a logical line under the styles in effect.
pub struct WordMeasurer<'a, M: TextMeasurer + ?Sized> {
    measurer: &'a M,
    styles: &'a StyleTable,
    base: &'a ResolvedStyle,
    cache: &'a mut GlyphCache,
    char_spacing: f64,
}

impl<'a, M: TextMeasurer + ?Sized> WordMeasurer<'a, M> {
    /// `char_spacing` is the absolute extra advance added to every grapheme.
    pub fn new(
        measurer: &'a M,
        styles: &'a StyleTable,
        base: &'a ResolvedStyle,
        cache: &'a mut GlyphCache,
        char_spacing: f64,
    ) -> Self {
        Self {
            measurer,
            styles,
            base,
            cache,
            char_spacing,
        }
    }

    /// Absolute char spacing added to every grapheme.
    #[must_use]
    pub const fn char_spacing(&self) -> f64 {
        self.char_spacing
    }

    /// Resolved style of the grapheme at a logical position.
    #[must_use]
    pub fn style_at(&self, line: usize, char_index: usize) -> ResolvedStyle {
        self.styles
            .get(line, char_index)
            .map_or_else(|| self.base.clone(), |decl| self.base.apply(decl))
    }

    /// Metrics of one grapheme at a logical position, char spacing included.
    pub fn grapheme_metrics(
        &mut self,
        grapheme: &str,
        line: usize,
        char_index: usize,
        previous: Option<&str>,
    ) -> Result<GraphemeMetrics> {
        let style = self.style_at(line, char_index);
        let key = (line, char_index);
        if let Some(metrics) = self.cache.lookup(key, grapheme, previous, &style) {
            return Ok(metrics);
        }

        let prev_style = previous.map(|_| self.style_at(line, char_index.saturating_sub(1)));
        let mut metrics = self.measurer.measure_grapheme(
            grapheme,
            &style,
            previous.zip(prev_style.as_ref()),
        )?;
        if self.char_spacing != 0.0 {
            metrics.width += self.char_spacing;
            metrics.kerned_width += self.char_spacing;
        }
        self.cache.store(key, grapheme, previous, style, metrics);
        Ok(metrics)
    }

    /// Sum of kerned widths of `word`, whose first grapheme sits at
    /// `char_offset` on logical `line`. The first grapheme is not kerned.
    pub fn measure_word(&mut self, word: &[String], line: usize, char_offset: usize) -> Result<f64> {
        let mut width = 0.0;
        let mut previous: Option<&str> = None;
        for (i, grapheme) in word.iter().enumerate() {
            width += self
                .grapheme_metrics(grapheme, line, char_offset + i, previous)?
                .kerned_width;
            previous = Some(grapheme.as_str());
        }
        Ok(width)
    }
}

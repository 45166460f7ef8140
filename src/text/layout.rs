//! Layout pass orchestration.
//!
//! [`LayoutController`] owns the layout state machine
//! (`Clean → Dirty → Relayouting → Clean`), the line wrapper and the glyph
//! cache. A pass always recomputes everything from the logical lines and
//! publishes an immutable [`TextLayout`] snapshot that replaces the previous
//! one.
//!
//! # Pass steps
//!
//! 1. Clear the glyph cache.
//! 2. Reset the dynamic minimum width.
//! 3. Wrap logical lines at the box width.
//! 4. Grow the box to the dynamic minimum width if needed. Lines are not
//!    wrapped again after growing.
//! 5. Map visual lines back to logical lines, measure grapheme boxes and
//!    justify when the alignment asks for it.
//! 6. Sum line heights; while the text is taller than `max_height` and the
//!    font is above the floor, shrink the font and start over.
//! 7. Clamp the box height and publish the snapshot.

use crate::error::{Error, Result};
use crate::event::{LayoutCompleted, LogLevel, emit_layout_complete, emit_log};
use crate::style::TextAlign;
use crate::text::measure::{CacheStats, GlyphCache, GraphemeBox, TextMeasurer, WordMeasurer};
use crate::text::props::TextProps;
use crate::text::style_map::StyleMap;
use crate::text::styles::StyleTable;
use crate::text::wrap::{LineWrapper, WrapConfig};
use crate::unicode::{GraphemeRun, flatten_lines, join_run};

/// Layout state of a text box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutState {
    /// The published layout matches the content.
    Clean,
    /// Content or properties changed since the last pass.
    #[default]
    Dirty,
    /// A pass is running.
    Relayouting,
}

/// Limits of the font shrink-to-fit loop and line height metrics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutLimits {
    /// The font is never shrunk below this size.
    pub font_size_floor: f64,
    /// Amount removed from the font size per shrink step.
    pub font_size_step: f64,
    /// Ratio between font size and glyph box height.
    pub font_size_mult: f64,
}

impl Default for LayoutLimits {
    fn default() -> Self {
        Self {
            font_size_floor: 6.0,
            font_size_step: 2.0,
            font_size_mult: 1.13,
        }
    }
}

impl LayoutLimits {
    /// Check that every limit is finite and positive, so each shrink step
    /// strictly lowers the font size.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("fontSizeFloor", self.font_size_floor),
            ("fontSizeStep", self.font_size_step),
            ("fontSizeMult", self.font_size_mult),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidValue { name, value });
            }
        }
        Ok(())
    }
}

/// Result of a layout pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextLayout {
    visual_lines: Vec<GraphemeRun>,
    lines: Vec<String>,
    grapheme_text: Vec<String>,
    style_map: StyleMap,
    char_bounds: Vec<Vec<GraphemeBox>>,
    line_widths: Vec<f64>,
    line_heights: Vec<f64>,
    text_height: f64,
    dynamic_min_width: f64,
    width: f64,
    height: f64,
    font_size: f64,
}

impl TextLayout {
    /// Wrapped lines as graphemes.
    #[must_use]
    pub fn visual_lines(&self) -> &[GraphemeRun] {
        &self.visual_lines
    }

    /// Wrapped lines as strings.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Logical text flattened into graphemes, with newline entries.
    #[must_use]
    pub fn grapheme_text(&self) -> &[String] {
        &self.grapheme_text
    }

    #[must_use]
    pub const fn style_map(&self) -> &StyleMap {
        &self.style_map
    }

    #[must_use]
    pub fn visual_line_count(&self) -> usize {
        self.visual_lines.len()
    }

    /// Grapheme boxes of a visual line, plus one trailing zero-width box
    /// marking the caret position after the last grapheme.
    pub fn char_bounds(&self, visual_line: usize) -> Result<&[GraphemeBox]> {
        self.char_bounds
            .get(visual_line)
            .map(Vec::as_slice)
            .ok_or_else(|| self.out_of_range(visual_line))
    }

    /// Height of a visual line.
    pub fn line_height(&self, visual_line: usize) -> Result<f64> {
        self.line_heights
            .get(visual_line)
            .copied()
            .ok_or_else(|| self.out_of_range(visual_line))
    }

    /// Width of the graphemes on a visual line.
    pub fn line_width(&self, visual_line: usize) -> Result<f64> {
        self.line_widths
            .get(visual_line)
            .copied()
            .ok_or_else(|| self.out_of_range(visual_line))
    }

    /// Sum of all line heights.
    #[must_use]
    pub const fn text_height(&self) -> f64 {
        self.text_height
    }

    /// Width of the widest unbreakable word found by this pass.
    #[must_use]
    pub const fn dynamic_min_width(&self) -> f64 {
        self.dynamic_min_width
    }

    /// Box width after the pass.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Box height after the pass (text height clamped to `max_height`).
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Box font size after the pass.
    #[must_use]
    pub const fn font_size(&self) -> f64 {
        self.font_size
    }

    /// Geometry reported by the completion event.
    #[must_use]
    pub fn completed(&self) -> LayoutCompleted {
        LayoutCompleted {
            visual_lines: self.visual_lines.len(),
            width: self.width,
            height: self.height,
            font_size: self.font_size,
        }
    }

    fn out_of_range(&self, line: usize) -> Error {
        Error::LineOutOfRange {
            line,
            line_count: self.visual_lines.len(),
        }
    }
}

/// Drives layout passes for one text box.
#[derive(Clone, Debug)]
pub struct LayoutController {
    state: LayoutState,
    wrapper: LineWrapper,
    limits: LayoutLimits,
    cache: GlyphCache,
    // last published snapshot, current only while `state` is Clean
    layout: TextLayout,
    dynamic_min_width: f64,
    passes: u64,
}

impl Default for LayoutController {
    fn default() -> Self {
        Self::new(WrapConfig::default())
    }
}

impl LayoutController {
    /// Create a dirty controller wrapping with `config`.
    #[must_use]
    pub fn new(config: WrapConfig) -> Self {
        Self {
            state: LayoutState::Dirty,
            wrapper: LineWrapper::new(config),
            limits: LayoutLimits::default(),
            cache: GlyphCache::new(),
            layout: TextLayout::default(),
            // keeps an empty box selectable before the first pass
            dynamic_min_width: 2.0,
            passes: 0,
        }
    }

    /// Replace the shrink-to-fit limits.
    pub fn with_limits(mut self, limits: LayoutLimits) -> Result<Self> {
        limits.validate()?;
        self.limits = limits;
        self.invalidate();
        Ok(self)
    }

    #[must_use]
    pub const fn state(&self) -> LayoutState {
        self.state
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.state != LayoutState::Clean
    }

    #[must_use]
    pub const fn limits(&self) -> &LayoutLimits {
        &self.limits
    }

    #[must_use]
    pub const fn wrap_config(&self) -> &WrapConfig {
        self.wrapper.config()
    }

    /// Replace the wrapping configuration.
    pub fn set_wrap_config(&mut self, config: WrapConfig) {
        if *self.wrapper.config() != config {
            self.wrapper = LineWrapper::new(config);
            self.invalidate();
        }
    }

    /// Mark the layout out of date.
    pub fn invalidate(&mut self) {
        if self.state == LayoutState::Clean {
            self.state = LayoutState::Dirty;
        }
    }

    /// Published layout, if it is up to date.
    #[must_use]
    pub fn layout(&self) -> Option<&TextLayout> {
        (self.state == LayoutState::Clean).then_some(&self.layout)
    }

    /// Dynamic minimum width of the last pass (2 before any pass).
    #[must_use]
    pub const fn dynamic_min_width(&self) -> f64 {
        self.dynamic_min_width
    }

    /// Number of completed passes.
    #[must_use]
    pub const fn passes(&self) -> u64 {
        self.passes
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Run a pass if the layout is dirty and return the current layout.
    pub fn ensure_layout<M: TextMeasurer + ?Sized>(
        &mut self,
        lines: &[GraphemeRun],
        styles: &StyleTable,
        props: &mut TextProps,
        measurer: &M,
    ) -> Result<&TextLayout> {
        if self.state == LayoutState::Clean {
            return Ok(&self.layout);
        }
        self.relayout(lines, styles, props, measurer)
    }

    /// Run a pass unconditionally.
    ///
    /// May change `props.width` (growth to fit the widest word),
    /// `props.font_size` (shrink to fit) and `props.height`.
    pub fn relayout<M: TextMeasurer + ?Sized>(
        &mut self,
        lines: &[GraphemeRun],
        styles: &StyleTable,
        props: &mut TextProps,
        measurer: &M,
    ) -> Result<&TextLayout> {
        if self.state == LayoutState::Relayouting {
            return Err(Error::LayoutInProgress);
        }

        let result = {
            let _pass = PassGuard::enter(&mut self.state);
            run_pass(
                &self.wrapper,
                &self.limits,
                &mut self.cache,
                lines,
                styles,
                props,
                measurer,
            )
        };

        match result {
            Ok(layout) => {
                self.dynamic_min_width = layout.dynamic_min_width;
                self.passes += 1;
                self.state = LayoutState::Clean;
                emit_layout_complete(&layout.completed());
                self.layout = layout;
                Ok(&self.layout)
            }
            Err(err) => {
                emit_log(LogLevel::Error, &format!("layout pass failed: {err}"));
                Err(err)
            }
        }
    }
}

/// Holds the state at `Relayouting` for the duration of a pass and puts it
/// back to `Dirty` when dropped, including on unwind.
struct PassGuard<'a> {
    state: &'a mut LayoutState,
}

impl<'a> PassGuard<'a> {
    fn enter(state: &'a mut LayoutState) -> Self {
        *state = LayoutState::Relayouting;
        Self { state }
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        *self.state = LayoutState::Dirty;
    }
}

fn run_pass<M: TextMeasurer + ?Sized>(
    wrapper: &LineWrapper,
    limits: &LayoutLimits,
    cache: &mut GlyphCache,
    lines: &[GraphemeRun],
    styles: &StyleTable,
    props: &mut TextProps,
    measurer: &M,
) -> Result<TextLayout> {
    let _span = tracing::debug_span!("layout_pass", logical_lines = lines.len()).entered();
    let grapheme_text = flatten_lines(lines);

    loop {
        cache.clear();
        let mut dynamic_min_width = 0.0;

        let base = props.base_style();
        let mut words =
            WordMeasurer::new(measurer, styles, &base, cache, props.char_spacing_width());
        let visual_lines = wrapper.wrap(lines, props.width, &mut dynamic_min_width, &mut words)?;

        if dynamic_min_width > props.width {
            emit_log(
                LogLevel::Debug,
                &format!(
                    "growing width {} to dynamic min width {dynamic_min_width}",
                    props.width
                ),
            );
            props.width = dynamic_min_width;
        }

        let style_map = StyleMap::from_flattened(&grapheme_text, &visual_lines, wrapper.config());
        let mut char_bounds = measure_lines(&visual_lines, &style_map, &mut words)?;
        if props.text_align.is_justified() {
            justify(
                &visual_lines,
                &style_map,
                &mut char_bounds,
                props.width,
                props.text_align,
                wrapper.config(),
            )?;
        }
        let line_widths: Vec<f64> = char_bounds.iter().map(|b| bounds_width(b)).collect();

        let line_heights = visual_lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let mapping = style_map.get(i)?;
                let max_font = (0..line.len().max(1))
                    .map(|j| words.style_at(mapping.line, mapping.offset + j).font_size)
                    .fold(0.0_f64, f64::max);
                Ok(max_font * props.line_height * limits.font_size_mult)
            })
            .collect::<Result<Vec<f64>>>()?;
        let text_height: f64 = line_heights.iter().sum();

        if text_height > props.max_height && props.font_size > limits.font_size_floor {
            let next = (props.font_size - limits.font_size_step).max(limits.font_size_floor);
            if next < props.font_size {
                emit_log(
                    LogLevel::Debug,
                    &format!(
                        "text height {text_height} exceeds {}; font size {} -> {next}",
                        props.max_height, props.font_size
                    ),
                );
                props.font_size = next;
                continue;
            }
        }
        if text_height > props.max_height {
            emit_log(
                LogLevel::Debug,
                &format!(
                    "accepting overflow: text height {text_height} at font size {}",
                    props.font_size
                ),
            );
        }

        props.height = text_height.min(props.max_height);
        let lines_str = visual_lines.iter().map(|l| join_run(l)).collect();
        return Ok(TextLayout {
            visual_lines,
            lines: lines_str,
            grapheme_text,
            style_map,
            char_bounds,
            line_widths,
            line_heights,
            text_height,
            dynamic_min_width,
            width: props.width,
            height: props.height,
            font_size: props.font_size,
        });
    }
}

fn bounds_width(bounds: &[GraphemeBox]) -> f64 {
    bounds.iter().map(|b| b.kerned_width).sum()
}

/// Measure grapheme boxes of every visual line, with a trailing caret box.
fn measure_lines<M: TextMeasurer + ?Sized>(
    visual_lines: &[GraphemeRun],
    style_map: &StyleMap,
    words: &mut WordMeasurer<'_, M>,
) -> Result<Vec<Vec<GraphemeBox>>> {
    let mut all = Vec::with_capacity(visual_lines.len());
    for (i, line) in visual_lines.iter().enumerate() {
        let mapping = style_map.get(i)?;
        let mut bounds: Vec<GraphemeBox> = Vec::with_capacity(line.len() + 1);
        let mut previous: Option<&str> = None;
        for (j, grapheme) in line.iter().enumerate() {
            let char_index = mapping.offset + j;
            let metrics = words.grapheme_metrics(grapheme, mapping.line, char_index, previous)?;
            let style = words.style_at(mapping.line, char_index);
            let left = bounds.last().map_or(0.0, |prev| {
                prev.left + prev.width + metrics.kerned_width - metrics.width
            });
            bounds.push(GraphemeBox {
                left,
                width: metrics.width,
                kerned_width: metrics.kerned_width,
                height: style.font_size,
                delta_y: style.delta_y,
            });
            previous = Some(grapheme.as_str());
        }
        let caret_left = bounds.last().map_or(0.0, |b| b.left + b.width);
        let caret_height = words.style_at(mapping.line, mapping.offset).font_size;
        bounds.push(GraphemeBox {
            left: caret_left,
            height: caret_height,
            ..GraphemeBox::default()
        });
        all.push(bounds);
    }
    Ok(all)
}

/// Widen joiners so justified lines fill `width`.
///
/// [`TextAlign::Justify`] stretches every line; the other justify modes leave
/// the last line of each paragraph alone.
fn justify(
    visual_lines: &[GraphemeRun],
    style_map: &StyleMap,
    char_bounds: &mut [Vec<GraphemeBox>],
    width: f64,
    align: TextAlign,
    config: &WrapConfig,
) -> Result<()> {
    let last = visual_lines.len().saturating_sub(1);
    for (i, (line, bounds)) in visual_lines.iter().zip(char_bounds.iter_mut()).enumerate() {
        if align != TextAlign::Justify && (i == last || style_map.is_end_of_wrapping(i)?) {
            continue;
        }
        let line_width = bounds_width(bounds);
        let spaces = line.iter().filter(|g| config.is_joiner(g)).count();
        if line_width >= width || spaces == 0 {
            continue;
        }
        let diff = (width - line_width) / spaces as f64;
        let mut accumulated = 0.0;
        for (j, bound) in bounds.iter_mut().enumerate() {
            bound.left += accumulated;
            if line.get(j).is_some_and(|g| config.is_joiner(g)) {
                bound.width += diff;
                bound.kerned_width += diff;
                accumulated += diff;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StyleDeclaration;
    use crate::text::measure::CellMeasurer;
    use crate::unicode::split_lines;

    // 0.5em cells: a 16px font makes every ASCII grapheme 8px wide.
    fn props(width: f64, split_by_grapheme: bool) -> TextProps {
        TextProps {
            width,
            split_by_grapheme,
            text_align: TextAlign::Left,
            max_height: 1000.0,
            ..TextProps::default()
        }
    }

    fn controller(props: &TextProps) -> LayoutController {
        LayoutController::new(props.wrap_config())
    }

    #[test]
    fn test_state_machine() {
        let lines = split_lines("hello");
        let styles = StyleTable::new();
        let mut props = props(200.0, false);
        let mut ctl = controller(&props);
        assert_eq!(ctl.state(), LayoutState::Dirty);
        assert!(ctl.layout().is_none());

        ctl.ensure_layout(&lines, &styles, &mut props, &CellMeasurer::default())
            .unwrap();
        assert_eq!(ctl.state(), LayoutState::Clean);
        assert_eq!(ctl.passes(), 1);

        ctl.ensure_layout(&lines, &styles, &mut props, &CellMeasurer::default())
            .unwrap();
        assert_eq!(ctl.passes(), 1, "clean layout is reused");

        ctl.invalidate();
        assert_eq!(ctl.state(), LayoutState::Dirty);
        assert!(ctl.layout().is_none());
        ctl.ensure_layout(&lines, &styles, &mut props, &CellMeasurer::default())
            .unwrap();
        assert_eq!(ctl.passes(), 2);
    }

    #[test]
    fn test_width_grows_without_rewrap() {
        let lines = split_lines("ab abcdefghij");
        let styles = StyleTable::new();
        let mut props = props(40.0, false);
        let mut ctl = controller(&props);
        let layout = ctl
            .ensure_layout(&lines, &styles, &mut props, &CellMeasurer::default())
            .unwrap();
        // "abcdefghij" is 80px: the box grows, but lines were wrapped at 80.
        assert!((layout.width() - 80.0).abs() < 1e-9);
        assert!((props.width - 80.0).abs() < 1e-9);
        assert_eq!(layout.lines(), ["ab", "abcdefghij"]);
        assert!((ctl.dynamic_min_width() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_char_bounds_and_caret() {
        let lines = split_lines("abc");
        let styles = StyleTable::new();
        let mut props = props(200.0, false);
        let mut ctl = controller(&props);
        let layout = ctl
            .ensure_layout(&lines, &styles, &mut props, &CellMeasurer::default())
            .unwrap();
        let bounds = layout.char_bounds(0).unwrap();
        assert_eq!(bounds.len(), 4);
        assert!((bounds[2].left - 16.0).abs() < 1e-9);
        assert!((bounds[3].left - 24.0).abs() < 1e-9);
        assert!(bounds[3].width.abs() < 1e-9);
        assert!((layout.line_width(0).unwrap() - 24.0).abs() < 1e-9);
        assert!(layout.char_bounds(1).is_err());
    }

    #[test]
    fn test_line_height_uses_largest_font() {
        let lines = split_lines("ab\ncd");
        let mut styles = StyleTable::new();
        styles.set(1, 1, StyleDeclaration::font_size(32.0));
        let mut props = props(200.0, false);
        let mut ctl = controller(&props);
        let layout = ctl
            .ensure_layout(&lines, &styles, &mut props, &CellMeasurer::default())
            .unwrap();
        let h0 = layout.line_height(0).unwrap();
        let h1 = layout.line_height(1).unwrap();
        assert!((h0 - 16.0 * 1.16 * 1.13).abs() < 1e-9);
        assert!((h1 - 32.0 * 1.16 * 1.13).abs() < 1e-9);
        assert!((layout.text_height() - (h0 + h1)).abs() < 1e-9);
        assert!(layout.line_height(2).is_err());
    }

    #[test]
    fn test_justify_stretches_joiners() {
        let lines = split_lines("aa b cc dd");
        let styles = StyleTable::new();
        let mut props = TextProps {
            text_align: TextAlign::JustifyLeft,
            ..props(72.0, false)
        };
        let mut ctl = controller(&props);
        let layout = ctl
            .ensure_layout(&lines, &styles, &mut props, &CellMeasurer::default())
            .unwrap();
        // "aa b cc" = 56px, two spaces share the 16px left over.
        assert_eq!(layout.lines(), ["aa b cc", "dd"]);
        assert!((layout.line_width(0).unwrap() - 72.0).abs() < 1e-9);
        let bounds = layout.char_bounds(0).unwrap();
        assert!((bounds[2].width - 16.0).abs() < 1e-9);
        assert!((bounds[3].left - 32.0).abs() < 1e-9);
        assert!((bounds[7].left - 72.0).abs() < 1e-9);
        // last line of the paragraph is left alone
        assert!((layout.line_width(1).unwrap() - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_shrink_to_fit() {
        let lines = split_lines("a\nb\nc\nd\ne");
        let styles = StyleTable::new();
        let mut props = TextProps {
            max_height: 60.0,
            ..props(200.0, true)
        };
        let mut ctl = controller(&props);
        let layout = ctl
            .ensure_layout(&lines, &styles, &mut props, &CellMeasurer::default())
            .unwrap();
        // 16 -> 14 -> 12 -> 10 all overflow; 5 lines at 8px are 52.4 high
        assert!((layout.font_size() - 8.0).abs() < 1e-9);
        assert!(layout.text_height() <= 60.0);
        assert!((layout.height() - layout.text_height()).abs() < 1e-9);
    }

    #[test]
    fn test_overflow_accepted_at_floor() {
        let lines = split_lines(&"x\n".repeat(30));
        let styles = StyleTable::new();
        let mut props = TextProps {
            max_height: 50.0,
            ..props(200.0, true)
        };
        let mut ctl = controller(&props);
        let layout = ctl
            .ensure_layout(&lines, &styles, &mut props, &CellMeasurer::default())
            .unwrap();
        assert!((layout.font_size() - 6.0).abs() < 1e-9);
        assert!(layout.text_height() > 50.0);
        assert!((layout.height() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_failed_pass_returns_to_dirty() {
        let lines = split_lines("abc");
        let styles = StyleTable::new();
        let mut props = TextProps {
            font_size: f64::NAN,
            ..props(200.0, false)
        };
        let mut ctl = controller(&props);
        let err = ctl
            .ensure_layout(&lines, &styles, &mut props, &CellMeasurer::default())
            .unwrap_err();
        assert!(matches!(err, Error::Measure { .. }));
        assert_eq!(ctl.state(), LayoutState::Dirty);
        assert_eq!(ctl.passes(), 0);
    }

    #[test]
    fn test_limits_reject_non_shrinking_values() {
        let ctl = || LayoutController::new(WrapConfig::graphemes());
        for limits in [
            LayoutLimits {
                font_size_step: 0.0,
                ..LayoutLimits::default()
            },
            LayoutLimits {
                font_size_step: -2.0,
                ..LayoutLimits::default()
            },
            LayoutLimits {
                font_size_floor: f64::NAN,
                ..LayoutLimits::default()
            },
            LayoutLimits {
                font_size_mult: f64::INFINITY,
                ..LayoutLimits::default()
            },
        ] {
            assert!(matches!(
                ctl().with_limits(limits),
                Err(Error::InvalidValue { .. })
            ));
        }

        let limits = LayoutLimits {
            font_size_floor: 10.0,
            ..LayoutLimits::default()
        };
        assert_eq!(ctl().with_limits(limits).unwrap().limits(), &limits);
    }

    #[test]
    fn test_shrink_stops_when_step_cannot_lower_font() {
        let lines = split_lines(&"x\n".repeat(40));
        let styles = StyleTable::new();
        let mut props = TextProps {
            max_height: 50.0,
            ..props(200.0, true)
        };
        // the step vanishes against a 16px font: 16 - 1e-20 == 16
        let mut ctl = controller(&props)
            .with_limits(LayoutLimits {
                font_size_step: 1e-20,
                ..LayoutLimits::default()
            })
            .unwrap();
        let layout = ctl
            .ensure_layout(&lines, &styles, &mut props, &CellMeasurer::default())
            .unwrap();
        assert!((layout.font_size() - 16.0).abs() < 1e-9);
        assert!(layout.text_height() > 50.0);
        assert!((layout.height() - 50.0).abs() < 1e-9);
    }

    struct Panicking;

    impl TextMeasurer for Panicking {
        fn measure_grapheme(
            &self,
            _grapheme: &str,
            _style: &crate::style::ResolvedStyle,
            _previous: Option<(&str, &crate::style::ResolvedStyle)>,
        ) -> Result<crate::text::measure::GraphemeMetrics> {
            panic!("measurer crashed");
        }
    }

    #[test]
    fn test_panicking_pass_leaves_layout_dirty() {
        let lines = split_lines("abc");
        let styles = StyleTable::new();
        let mut props = props(200.0, false);
        let mut ctl = controller(&props);

        let unwound = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = ctl.relayout(&lines, &styles, &mut props, &Panicking);
        }));
        assert!(unwound.is_err());
        assert_eq!(ctl.state(), LayoutState::Dirty);
        assert!(ctl.layout().is_none());

        let layout = ctl
            .ensure_layout(&lines, &styles, &mut props, &CellMeasurer::default())
            .unwrap();
        assert_eq!(layout.lines(), ["abc"]);
        assert_eq!(ctl.state(), LayoutState::Clean);
        assert_eq!(ctl.passes(), 1);
    }

    #[test]
    fn test_set_wrap_config_invalidates() {
        let lines = split_lines("ab cd");
        let styles = StyleTable::new();
        let mut props = props(200.0, false);
        let mut ctl = controller(&props);
        ctl.ensure_layout(&lines, &styles, &mut props, &CellMeasurer::default())
            .unwrap();
        ctl.set_wrap_config(WrapConfig::words());
        assert_eq!(ctl.state(), LayoutState::Clean);
        ctl.set_wrap_config(WrapConfig::graphemes());
        assert_eq!(ctl.state(), LayoutState::Dirty);
    }
}

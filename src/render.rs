//! Painting notes through an opaque renderer.
//!
//! The crate never rasterizes anything itself. A [`Renderer`] supplies
//! drawing primitives in a coordinate system centered on the note, and
//! [`Drawable`] walks the current layout and issues draw calls:
//!
//! 1. background rectangle (when `background_color` is set)
//! 2. per-run text backgrounds, glyph runs and decorations, line by line
//! 3. the emoji vote badge in the bottom right corner

use crate::error::Result;
use crate::style::{ResolvedStyle, TextDecoration};
use crate::text::{EMOJI_SLOTS, GraphemeBox, TextEntity, TextMeasurer};
use crate::unicode::GraphemeRun;

/// Image names of the emoji vote slots, in slot order.
pub const EMOJI_IMAGES: [&str; EMOJI_SLOTS] = [
    "emoji_thumb",
    "emoji_love",
    "emoji_smile",
    "emoji_shock",
    "emoji_question",
];

/// Width of one emoji slot in the vote badge.
const EMOJI_SLOT_WIDTH: f64 = 26.6;
/// Horizontal step between drawn emoji.
const EMOJI_STEP: f64 = 23.6;
const EMOJI_SIZE: f64 = 10.0;
const BADGE_HEIGHT: f64 = 15.0;
const BADGE_FILL: &str = "rgba(255, 255, 255, 1)";

// Decoration placement as fractions of the font size, measured from the
// baseline (negative is up).
const UNDERLINE_OFFSET: f64 = 0.10;
const LINETHROUGH_OFFSET: f64 = -0.315;
const OVERLINE_OFFSET: f64 = -0.88;
const DECORATION_THICKNESS: f64 = 1.0 / 15.0;

/// Drawing surface. Also a measurer so notes can be laid out with the same
/// font metrics they are painted with.
pub trait Renderer: TextMeasurer {
    /// Push the drawing state.
    fn save(&mut self);
    /// Pop the drawing state.
    fn restore(&mut self);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str);
    /// Draw `text` with its left edge at `x` and its baseline at `y`.
    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &ResolvedStyle);
    fn draw_image(&mut self, name: &str, x: f64, y: f64, width: f64, height: f64);
}

/// Something that can paint itself.
pub trait Drawable {
    /// Paint centered on the origin. Runs a layout pass first if needed.
    fn render(&mut self, renderer: &mut dyn Renderer) -> Result<()>;
}

/// A maximal sequence of graphemes drawn with one style.
#[derive(Clone, Debug, PartialEq)]
struct Run {
    text: String,
    left: f64,
    width: f64,
    style: ResolvedStyle,
}

impl<M: TextMeasurer> Drawable for TextEntity<M> {
    fn render(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        self.ensure_layout()?;
        renderer.save();
        render_background(self, renderer);
        render_text(self, renderer)?;
        render_emoji(self, renderer);
        renderer.restore();
        Ok(())
    }
}

fn render_background<M: TextMeasurer>(entity: &TextEntity<M>, renderer: &mut dyn Renderer) {
    let props = entity.props();
    if let Some(color) = &props.background_color {
        renderer.fill_rect(
            -props.width / 2.0,
            -props.height / 2.0,
            props.width,
            props.height,
            color,
        );
    }
}

fn render_text<M: TextMeasurer>(entity: &TextEntity<M>, renderer: &mut dyn Renderer) -> Result<()> {
    let props = entity.props();
    let base = props.base_style();
    let Some(layout) = entity.layout() else {
        return Ok(());
    };

    let left = -props.width / 2.0;
    let mut top = -layout.text_height() / 2.0;
    for (i, line) in layout.visual_lines().iter().enumerate() {
        let line_height = layout.line_height(i)?;
        let max_height = line_height / props.line_height;
        let baseline = top + max_height;
        let offset = props
            .text_align
            .line_offset(props.width, layout.line_width(i)?);
        let mapping = layout.style_map().get(i)?;
        let style_of = |j: usize| {
            entity
                .styles()
                .get(mapping.line, mapping.offset + j)
                .map_or_else(|| base.clone(), |decl| base.apply(decl))
        };
        let runs = collect_runs(
            line,
            layout.char_bounds(i)?,
            style_of,
            props.text_align.is_justified(),
        );

        for run in &runs {
            let x = left + offset + run.left;
            if let Some(color) = &run.style.text_background_color {
                renderer.fill_rect(x, top, run.width, line_height, color);
            }
            renderer.fill_text(&run.text, x, baseline + run.style.delta_y, &run.style);
            render_decorations(renderer, run, x, baseline);
        }
        top += line_height;
    }
    Ok(())
}

/// Group the graphemes of a visual line into runs of equal style. Justified
/// lines draw every whitespace grapheme as its own run.
fn collect_runs(
    line: &GraphemeRun,
    bounds: &[GraphemeBox],
    style_of: impl Fn(usize) -> ResolvedStyle,
    break_on_space: bool,
) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    let mut after_space = false;
    for (j, (grapheme, bound)) in line.iter().zip(bounds).enumerate() {
        let style = style_of(j);
        let is_space = break_on_space && grapheme.trim().is_empty();
        match runs.last_mut() {
            Some(run) if run.style == style && !is_space && !after_space => {
                run.text.push_str(grapheme);
                run.width = bound.left + bound.kerned_width - run.left;
            }
            _ => runs.push(Run {
                text: grapheme.clone(),
                left: bound.left,
                width: bound.kerned_width,
                style,
            }),
        }
        after_space = is_space;
    }
    runs
}

fn render_decorations(renderer: &mut dyn Renderer, run: &Run, x: f64, baseline: f64) {
    let size = run.style.font_size;
    let thickness = size * DECORATION_THICKNESS;
    let color = run.style.fill.as_str();
    let y = baseline + run.style.delta_y;
    for (flag, offset) in [
        (TextDecoration::UNDERLINE, UNDERLINE_OFFSET),
        (TextDecoration::LINETHROUGH, LINETHROUGH_OFFSET),
        (TextDecoration::OVERLINE, OVERLINE_OFFSET),
    ] {
        if run.style.decoration.contains(flag) {
            renderer.fill_rect(x, y + size * offset, run.width, thickness, color);
        }
    }
}

fn render_emoji<M: TextMeasurer>(entity: &TextEntity<M>, renderer: &mut dyn Renderer) {
    let votes = entity.emoji_votes();
    let voted: Vec<(usize, u64)> = votes
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, count)| *count != 0)
        .collect();
    if voted.is_empty() {
        return;
    }

    let props = entity.props();
    let (half_w, half_h) = (props.width / 2.0, props.height / 2.0);
    let badge_width = EMOJI_SLOT_WIDTH * voted.len() as f64;
    let y = half_h - 18.0;
    renderer.fill_rect(half_w - badge_width - 10.0, y, badge_width, BADGE_HEIGHT, BADGE_FILL);

    let label = ResolvedStyle {
        font_size: 10.0,
        fill: "#000".to_string(),
        ..ResolvedStyle::default()
    };
    let mut modifier = 0.0;
    for (slot, count) in voted {
        renderer.draw_image(
            EMOJI_IMAGES[slot],
            half_w - 33.6 + modifier + 2.0,
            half_h - 15.0,
            EMOJI_SIZE,
            EMOJI_SIZE,
        );
        renderer.fill_text(
            &count.to_string(),
            half_w - 20.6 + modifier + 1.0,
            y + 12.0,
            &label,
        );
        modifier -= EMOJI_STEP;
    }
}

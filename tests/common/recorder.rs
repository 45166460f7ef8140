//! Renderer that records draw calls instead of painting.

#![allow(dead_code)] // Shared test helper; not every integration test uses every call kind

use notebox::text::GraphemeMetrics;
use notebox::{CellMeasurer, Renderer, ResolvedStyle, Result, TextMeasurer};

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Save,
    Restore,
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: String,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        fill: String,
        font_size: f64,
    },
    Image {
        name: String,
        x: f64,
        y: f64,
    },
}

/// A [`Renderer`] that measures like [`CellMeasurer`] and keeps every call.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    measurer: CellMeasurer,
    pub calls: Vec<DrawCall>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of every `fill_text` call, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn rects(&self) -> Vec<&DrawCall> {
        self.calls
            .iter()
            .filter(|call| matches!(call, DrawCall::Rect { .. }))
            .collect()
    }

    pub fn images(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Image { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl TextMeasurer for RecordingRenderer {
    fn measure_grapheme(
        &self,
        grapheme: &str,
        style: &ResolvedStyle,
        previous: Option<(&str, &ResolvedStyle)>,
    ) -> Result<GraphemeMetrics> {
        self.measurer.measure_grapheme(grapheme, style, previous)
    }
}

impl Renderer for RecordingRenderer {
    fn save(&mut self) {
        self.calls.push(DrawCall::Save);
    }

    fn restore(&mut self) {
        self.calls.push(DrawCall::Restore);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str) {
        self.calls.push(DrawCall::Rect {
            x,
            y,
            width,
            height,
            color: color.to_string(),
        });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &ResolvedStyle) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            x,
            y,
            fill: style.fill.clone(),
            font_size: style.font_size,
        });
    }

    fn draw_image(&mut self, name: &str, x: f64, y: f64, _width: f64, _height: f64) {
        self.calls.push(DrawCall::Image {
            name: name.to_string(),
            x,
            y,
        });
    }
}

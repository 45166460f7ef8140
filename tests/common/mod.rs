#![allow(clippy::nursery)] // Test infra prioritizes clarity over pedantry
#![allow(clippy::pedantic)] // Test infra prioritizes clarity over pedantry
#![allow(dead_code)] // Shared test helper; not every integration test uses every helper

pub mod recorder;

use notebox::{TextAlign, TextEntity, TextProps};

/// Width of one ASCII grapheme at the default 16px font with the default
/// `CellMeasurer` (half an em per cell).
pub const CELL: f64 = 8.0;

/// Height of one line at `font_size` with the default line height.
pub fn line_height(font_size: f64) -> f64 {
    font_size * 1.16 * 1.13
}

/// Left-aligned note with room for any number of lines.
pub fn note(text: &str, width: f64, split_by_grapheme: bool) -> TextEntity {
    TextEntity::from_text(text)
        .with_props(TextProps {
            width,
            split_by_grapheme,
            text_align: TextAlign::Left,
            max_height: 10_000.0,
            ..TextProps::default()
        })
        .expect("valid props")
}

/// Visual lines of a note as strings.
pub fn lines_of(entity: &mut TextEntity) -> Vec<String> {
    entity.ensure_layout().expect("layout").lines().to_vec()
}

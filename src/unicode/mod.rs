//! Unicode utilities for grapheme handling and display width.

mod grapheme;
mod width;

pub use grapheme::{
    GraphemeIterator, GraphemeRun, NEWLINE, flatten_lines, graphemes, join_run, split_graphemes,
    split_lines,
};
pub use width::{WidthMethod, display_width, display_width_with_method};

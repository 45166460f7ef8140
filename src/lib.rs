//! `notebox` - text layout engine for whiteboard sticky notes
//!
//! Lays out styled, multi-line, grapheme-aware text inside a bounded note:
//! greedy wrapping at word or grapheme boundaries, a visual-to-logical style
//! map, growth to fit unbreakable words and font shrinking to fit a maximum
//! height.
//!
//! # Examples
//!
//! ```
//! use notebox::{TextEntity, TextProps};
//!
//! let mut note = TextEntity::from_text("hello\nworld");
//! assert_eq!(note.get_visual_line_count().unwrap(), 2);
//! assert!(note.props().height <= TextProps::default().max_height);
//! ```

// Crate-level lint configuration
#![forbid(unsafe_code)]
#![allow(clippy::cast_precision_loss)] // Grapheme counts to f64 widths
#![allow(clippy::module_name_repetitions)] // Allow TextLayout in text etc
#![allow(clippy::missing_errors_doc)] // Docs WIP
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::float_cmp)] // Exact zero checks on char spacing
#![allow(clippy::suboptimal_flops)] // Standard math notation is clearer than mul_add
#![allow(clippy::similar_names)] // line/lines, props/prop
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::redundant_clone)] // Clones in tests for clarity are fine

pub mod error;
pub mod event;
pub mod render;
pub mod style;
pub mod text;
pub mod unicode;

// Re-export core types at crate root
pub use error::{Error, Result};
pub use event::{
    LAYOUT_COMPLETE, LayoutCompleted, LogLevel, clear_event_callback, clear_log_callback,
    emit_event, emit_layout_complete, emit_log, set_event_callback, set_log_callback,
};
pub use render::{Drawable, Renderer};
pub use style::{ResolvedStyle, StyleDeclaration, StyleProperty, TextAlign, TextDecoration};
pub use text::{
    CellMeasurer, CursorLocation, LayoutController, LayoutState, PersistableObject, StyleMap,
    StyleTable, TextEntity, TextLayout, TextMeasurer, TextProps, WrapConfig,
};
pub use unicode::{GraphemeRun, WidthMethod, split_graphemes, split_lines};

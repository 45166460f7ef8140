//! Styled, wrapping text boxes.
//!
//! Key types:
//!
//! - [`TextEntity`]: a note text box with editing, styles and geometry queries
//! - [`LayoutController`]: layout state machine and pass
//! - [`LineWrapper`]: greedy wrapping of logical lines into visual lines
//! - [`StyleMap`]: visual line → logical `{line, offset}` mapping
//! - [`StyleTable`]: sparse per-character styles in logical coordinates
//!
//! # Examples
//!
//! ```
//! use notebox::text::{TextEntity, TextProps};
//! use notebox::style::TextAlign;
//!
//! let mut note = TextEntity::from_text("the quick brown fox")
//!     .with_props(TextProps {
//!         width: 72.0,
//!         split_by_grapheme: false,
//!         text_align: TextAlign::Left,
//!         ..TextProps::default()
//!     })
//!     .unwrap();
//!
//! let lines: Vec<String> = note.ensure_layout().unwrap().lines().to_vec();
//! assert_eq!(lines, ["the quick", "brown fox"]);
//!
//! // Visual line 1 starts at grapheme 10 of logical line 0.
//! let mapping = note.style_map().unwrap().get(1).unwrap();
//! assert_eq!((mapping.line, mapping.offset), (0, 10));
//! ```

mod entity;
mod layout;
mod measure;
mod persist;
mod props;
mod style_map;
mod styles;
mod wrap;

pub use entity::{CursorLocation, EMOJI_SLOTS, TextEntity};
pub use layout::{LayoutController, LayoutLimits, LayoutState, TextLayout};
pub use measure::{
    CacheStats, CellMeasurer, GlyphCache, GraphemeBox, GraphemeMetrics, TextMeasurer,
    WordMeasurer,
};
pub use persist::{EXTENDED_PROPERTIES, NOTE_TYPE, NoteRecord, PersistableObject};
pub use props::TextProps;
pub use style_map::{LineMapping, StyleMap};
pub use styles::{LineStyles, StyleTable};
pub use wrap::{DEFAULT_JOINERS, INFIX, LineWrapper, WrapConfig};

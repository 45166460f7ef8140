//! Fuzz target for wrapping and the style map.
//!
//! Lays out arbitrary text at arbitrary widths and checks the invariants the
//! editing layer relies on.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use notebox::{TextAlign, TextEntity, TextProps};

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    text: &'a str,
    width: u16,
    split_by_grapheme: bool,
    justify: bool,
    cursor: u16,
}

fuzz_target!(|input: Input<'_>| {
    let props = TextProps {
        width: f64::from(input.width),
        split_by_grapheme: input.split_by_grapheme,
        text_align: if input.justify {
            TextAlign::Justify
        } else {
            TextAlign::Left
        },
        ..TextProps::default()
    };
    let Ok(mut entity) = TextEntity::from_text(input.text).with_props(props) else {
        return;
    };
    let Ok(layout) = entity.ensure_layout() else {
        return;
    };

    let map = layout.style_map();
    assert_eq!(map.len(), layout.visual_line_count());
    for i in 1..map.len() {
        assert!(map.entries()[i].line >= map.entries()[i - 1].line);
    }
    assert!(layout.height() <= layout.text_height());

    let location = entity.cursor_location(usize::from(input.cursor));
    assert!(location.is_ok());
});

//! Fuzz target for note records.
//!
//! Tests that loading arbitrary JSON never panics and that accepted records
//! survive a store/load cycle.

#![no_main]

use libfuzzer_sys::fuzz_target;
use notebox::{PersistableObject, TextEntity};

fuzz_target!(|data: &str| {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(data) else {
        return;
    };
    let Ok(entity) = TextEntity::<notebox::CellMeasurer>::from_object(&value) else {
        return;
    };
    let stored = entity.to_object(&[]).expect("store accepted record");
    let restored =
        TextEntity::<notebox::CellMeasurer>::from_object(&stored).expect("reload stored record");
    assert_eq!(restored.text(), entity.text());
});

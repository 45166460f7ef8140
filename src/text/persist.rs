//! JSON persistence of notes.
//!
//! A note persists as a flat JSON object: its type tag, text, style table and
//! box properties, plus whitelisted passthrough metadata (ids, owner, lock
//! state, emoji votes, connections). Unknown keys read by
//! [`PersistableObject::from_object`] are kept as metadata so nothing is lost
//! on a load/store cycle.

use crate::error::{Error, Result};
use crate::text::entity::TextEntity;
use crate::text::measure::TextMeasurer;
use crate::text::props::TextProps;
use crate::text::styles::StyleTable;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Type tag written to every note record.
pub const NOTE_TYPE: &str = "RectNotes";

/// Metadata keys always written by [`PersistableObject::to_object`].
pub const EXTENDED_PROPERTIES: &[&str] = &[
    "obj_type",
    "whiteboardId",
    "userId",
    "timestamp",
    "zIndex",
    "locked",
    "verticalAlign",
    "lines",
    "_id",
    "relationship",
    "emoj",
    "userEmoji",
    "emoji",
];

/// Conversion to and from a JSON record.
pub trait PersistableObject: Sized {
    /// Serialize to a JSON object. Metadata keys listed in `extra_keys` are
    /// written in addition to the standard ones.
    fn to_object(&self, extra_keys: &[&str]) -> Result<Value>;

    /// Rebuild from a JSON object.
    fn from_object(record: &Value) -> Result<Self>;
}

/// On-disk shape of a note.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoteRecord {
    #[serde(rename = "type", default = "note_type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub styles: StyleTable,
    #[serde(flatten)]
    pub props: TextProps,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

fn note_type() -> String {
    NOTE_TYPE.to_string()
}

impl NoteRecord {
    /// Parse a record, rejecting foreign type tags.
    pub fn from_value(record: &Value) -> Result<Self> {
        let parsed = Self::deserialize(record)?;
        if parsed.kind != NOTE_TYPE {
            return Err(Error::Serialization(serde::de::Error::custom(format!(
                "expected type {NOTE_TYPE:?}, found {:?}",
                parsed.kind
            ))));
        }
        parsed.props.validate()?;
        Ok(parsed)
    }
}

impl<M: TextMeasurer> TextEntity<M> {
    /// Snapshot this note as a record.
    pub fn to_record(&self, extra_keys: &[&str]) -> NoteRecord {
        let metadata = self
            .metadata()
            .iter()
            .filter(|(key, _)| {
                EXTENDED_PROPERTIES.contains(&key.as_str()) || extra_keys.contains(&key.as_str())
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        NoteRecord {
            kind: note_type(),
            text: self.text(),
            styles: self.styles().clone(),
            props: self.props().clone(),
            metadata,
        }
    }

    /// Rebuild a note from a record, measuring with `measurer`.
    pub fn from_record(record: NoteRecord, measurer: M) -> Result<Self> {
        Ok(Self::new(&record.text, measurer)
            .with_props(record.props)?
            .with_styles(record.styles)
            .with_metadata(record.metadata))
    }

    /// Rebuild a note from a JSON object, measuring with `measurer`.
    pub fn from_object_with(record: &Value, measurer: M) -> Result<Self> {
        Self::from_record(NoteRecord::from_value(record)?, measurer)
    }
}

impl<M: TextMeasurer + Default> PersistableObject for TextEntity<M> {
    fn to_object(&self, extra_keys: &[&str]) -> Result<Value> {
        Ok(serde_json::to_value(self.to_record(extra_keys))?)
    }

    fn from_object(record: &Value) -> Result<Self> {
        Self::from_object_with(record, M::default())
    }
}

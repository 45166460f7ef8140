//! Character styles for note text.
//!
//! This module provides types for styling individual graphemes:
//!
//! - [`TextDecoration`]: Bitflags for underline, overline and line-through
//! - [`StyleDeclaration`]: Sparse per-character overrides stored in a
//!   [`StyleTable`](crate::text::StyleTable)
//! - [`ResolvedStyle`]: Box defaults with a declaration applied, as seen by
//!   measurers and renderers
//! - [`StyleBuilder`]: Fluent builder for declarations
//! - [`TextAlign`]: Horizontal alignment, including justification modes
//!
//! # Examples
//!
//! ```
//! use notebox::{ResolvedStyle, StyleDeclaration, TextDecoration};
//!
//! let bold_red = StyleDeclaration::builder()
//!     .font_weight("bold")
//!     .fill("#ff0000")
//!     .decoration(TextDecoration::UNDERLINE)
//!     .build();
//!
//! let base = ResolvedStyle::default();
//! let resolved = base.apply(&bold_red);
//! assert_eq!(resolved.font_weight, "bold");
//! assert_eq!(resolved.font_size, base.font_size);
//! ```

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Text decoration lines.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct TextDecoration: u8 {
        /// Line below the baseline.
        const UNDERLINE   = 0x01;
        /// Line above the ascender.
        const OVERLINE    = 0x02;
        /// Line through the middle of the glyphs.
        const LINETHROUGH = 0x04;
    }
}

/// A single property of a [`StyleDeclaration`], used by presence queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleProperty {
    FontSize,
    FontFamily,
    FontWeight,
    FontStyle,
    Fill,
    TextBackgroundColor,
    Decoration,
    DeltaY,
}

/// Horizontal text alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    /// Justify every line, including the last line of each paragraph.
    Justify,
    JustifyLeft,
    JustifyCenter,
    JustifyRight,
}

impl TextAlign {
    /// Whether extra width is distributed between words.
    #[must_use]
    pub const fn is_justified(self) -> bool {
        matches!(
            self,
            Self::Justify | Self::JustifyLeft | Self::JustifyCenter | Self::JustifyRight
        )
    }

    /// Horizontal offset of a line of `line_width` inside a box of `box_width`.
    #[must_use]
    pub fn line_offset(self, box_width: f64, line_width: f64) -> f64 {
        let slack = box_width - line_width;
        match self {
            Self::Left | Self::Justify | Self::JustifyLeft => 0.0,
            Self::Center | Self::JustifyCenter => slack / 2.0,
            Self::Right | Self::JustifyRight => slack,
        }
    }
}

/// Sparse style overrides for one character.
///
/// Unset fields inherit the box-level defaults. Declarations serialize in
/// camelCase with unset fields omitted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDeclaration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_background_color: Option<String>,
    #[serde(
        default,
        with = "decoration_bits",
        skip_serializing_if = "Option::is_none"
    )]
    pub decoration: Option<TextDecoration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta_y: Option<f64>,
}

impl StyleDeclaration {
    /// Empty declaration (inherits everything).
    pub const NONE: Self = Self {
        font_size: None,
        font_family: None,
        font_weight: None,
        font_style: None,
        fill: None,
        text_background_color: None,
        decoration: None,
        delta_y: None,
    };

    /// Create a new style builder.
    #[must_use]
    pub fn builder() -> StyleBuilder {
        StyleBuilder::default()
    }

    /// Create a declaration that only sets the font size.
    #[must_use]
    pub fn font_size(size: f64) -> Self {
        Self {
            font_size: Some(size),
            ..Self::NONE
        }
    }

    /// Create a declaration that only sets the fill color.
    #[must_use]
    pub fn fill(color: impl Into<String>) -> Self {
        Self {
            fill: Some(color.into()),
            ..Self::NONE
        }
    }

    /// Check if no property is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }

    /// Check if a single property is set.
    #[must_use]
    pub const fn has(&self, property: StyleProperty) -> bool {
        match property {
            StyleProperty::FontSize => self.font_size.is_some(),
            StyleProperty::FontFamily => self.font_family.is_some(),
            StyleProperty::FontWeight => self.font_weight.is_some(),
            StyleProperty::FontStyle => self.font_style.is_some(),
            StyleProperty::Fill => self.fill.is_some(),
            StyleProperty::TextBackgroundColor => self.text_background_color.is_some(),
            StyleProperty::Decoration => self.decoration.is_some(),
            StyleProperty::DeltaY => self.delta_y.is_some(),
        }
    }

    /// Merge two declarations, with `other` taking precedence for set values.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            font_size: other.font_size.or(self.font_size),
            font_family: other.font_family.clone().or_else(|| self.font_family.clone()),
            font_weight: other.font_weight.clone().or_else(|| self.font_weight.clone()),
            font_style: other.font_style.clone().or_else(|| self.font_style.clone()),
            fill: other.fill.clone().or_else(|| self.fill.clone()),
            text_background_color: other
                .text_background_color
                .clone()
                .or_else(|| self.text_background_color.clone()),
            decoration: other.decoration.or(self.decoration),
            delta_y: other.delta_y.or(self.delta_y),
        }
    }
}

/// Builder for creating declarations fluently.
#[derive(Clone, Debug, Default)]
pub struct StyleBuilder {
    style: StyleDeclaration,
}

impl StyleBuilder {
    /// Set font size.
    #[must_use]
    pub fn font_size(mut self, size: f64) -> Self {
        self.style.font_size = Some(size);
        self
    }

    /// Set font family.
    #[must_use]
    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.style.font_family = Some(family.into());
        self
    }

    /// Set font weight (`"bold"`, `"400"`, ...).
    #[must_use]
    pub fn font_weight(mut self, weight: impl Into<String>) -> Self {
        self.style.font_weight = Some(weight.into());
        self
    }

    /// Set font style (`"italic"`, ...).
    #[must_use]
    pub fn font_style(mut self, style: impl Into<String>) -> Self {
        self.style.font_style = Some(style.into());
        self
    }

    /// Set fill color.
    #[must_use]
    pub fn fill(mut self, color: impl Into<String>) -> Self {
        self.style.fill = Some(color.into());
        self
    }

    /// Set the background painted behind the glyph.
    #[must_use]
    pub fn text_background_color(mut self, color: impl Into<String>) -> Self {
        self.style.text_background_color = Some(color.into());
        self
    }

    /// Set decoration lines.
    #[must_use]
    pub fn decoration(mut self, decoration: TextDecoration) -> Self {
        self.style.decoration = Some(decoration);
        self
    }

    /// Set vertical baseline shift.
    #[must_use]
    pub fn delta_y(mut self, delta: f64) -> Self {
        self.style.delta_y = Some(delta);
        self
    }

    /// Build the final declaration.
    #[must_use]
    pub fn build(self) -> StyleDeclaration {
        self.style
    }
}

/// Fully resolved style of one grapheme.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedStyle {
    pub font_size: f64,
    pub font_family: String,
    pub font_weight: String,
    pub font_style: String,
    pub fill: String,
    pub text_background_color: Option<String>,
    pub decoration: TextDecoration,
    pub delta_y: f64,
}

impl Default for ResolvedStyle {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            font_family: "Inter".to_string(),
            font_weight: "normal".to_string(),
            font_style: "normal".to_string(),
            fill: "#000000".to_string(),
            text_background_color: None,
            decoration: TextDecoration::empty(),
            delta_y: 0.0,
        }
    }
}

impl ResolvedStyle {
    /// Apply a declaration on top of this style.
    #[must_use]
    pub fn apply(&self, decl: &StyleDeclaration) -> Self {
        Self {
            font_size: decl.font_size.unwrap_or(self.font_size),
            font_family: decl
                .font_family
                .clone()
                .unwrap_or_else(|| self.font_family.clone()),
            font_weight: decl
                .font_weight
                .clone()
                .unwrap_or_else(|| self.font_weight.clone()),
            font_style: decl
                .font_style
                .clone()
                .unwrap_or_else(|| self.font_style.clone()),
            fill: decl.fill.clone().unwrap_or_else(|| self.fill.clone()),
            text_background_color: decl
                .text_background_color
                .clone()
                .or_else(|| self.text_background_color.clone()),
            decoration: decl.decoration.unwrap_or(self.decoration),
            delta_y: decl.delta_y.unwrap_or(self.delta_y),
        }
    }

    /// CSS-like font shorthand (`"italic bold 16px Inter"`).
    #[must_use]
    pub fn font_shorthand(&self) -> String {
        format!(
            "{} {} {}px {}",
            self.font_style, self.font_weight, self.font_size, self.font_family
        )
    }
}

mod decoration_bits {
    use super::TextDecoration;
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<TextDecoration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(decoration) => serializer.serialize_some(&decoration.bits()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<TextDecoration>, D::Error> {
        Ok(Option::<u8>::deserialize(deserializer)?.map(TextDecoration::from_bits_truncate))
    }
}

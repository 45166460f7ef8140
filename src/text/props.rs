//! Box-level properties of a note text box.

use crate::error::{Error, Result};
use crate::style::{ResolvedStyle, TextAlign};
use crate::text::wrap::WrapConfig;
use serde::{Deserialize, Serialize};

/// Geometry and default text style of a note.
///
/// Defaults describe the square whiteboard sticky note: 138×138, 16px text
/// wrapped per grapheme.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextProps {
    pub width: f64,
    pub height: f64,
    /// Lower bound for control-driven resizes.
    pub min_width: f64,
    /// Height the text is shrunk to fit into.
    pub max_height: f64,
    pub font_size: f64,
    pub font_family: String,
    pub font_weight: String,
    pub font_style: String,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
    /// Extra advance per grapheme, in thousandths of an em.
    pub char_spacing: f64,
    pub text_align: TextAlign,
    pub fill: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    pub split_by_grapheme: bool,
}

impl Default for TextProps {
    fn default() -> Self {
        Self {
            width: 138.0,
            height: 138.0,
            min_width: 20.0,
            max_height: 138.0,
            font_size: 16.0,
            font_family: "Inter".to_string(),
            font_weight: "normal".to_string(),
            font_style: "normal".to_string(),
            line_height: 1.16,
            char_spacing: 0.0,
            text_align: TextAlign::Center,
            fill: "#000000".to_string(),
            background_color: None,
            split_by_grapheme: true,
        }
    }
}

impl TextProps {
    /// Style of a grapheme without any declaration.
    #[must_use]
    pub fn base_style(&self) -> ResolvedStyle {
        ResolvedStyle {
            font_size: self.font_size,
            font_family: self.font_family.clone(),
            font_weight: self.font_weight.clone(),
            font_style: self.font_style.clone(),
            fill: self.fill.clone(),
            ..ResolvedStyle::default()
        }
    }

    /// Absolute width added to every grapheme by `char_spacing`.
    #[must_use]
    pub fn char_spacing_width(&self) -> f64 {
        if self.char_spacing == 0.0 {
            0.0
        } else {
            self.font_size * self.char_spacing / 1000.0
        }
    }

    /// Wrapping configuration derived from these properties.
    #[must_use]
    pub fn wrap_config(&self) -> WrapConfig {
        if self.split_by_grapheme {
            WrapConfig::graphemes()
        } else {
            WrapConfig::words()
        }
    }

    /// Check every numeric property.
    pub fn validate(&self) -> Result<()> {
        check_non_negative("width", self.width)?;
        check_non_negative("height", self.height)?;
        check_non_negative("minWidth", self.min_width)?;
        check_non_negative("maxHeight", self.max_height)?;
        check_positive("fontSize", self.font_size)?;
        check_positive("lineHeight", self.line_height)?;
        if !self.char_spacing.is_finite() {
            return Err(Error::InvalidValue {
                name: "charSpacing",
                value: self.char_spacing,
            });
        }
        Ok(())
    }
}

pub(crate) fn check_non_negative(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidValue { name, value })
    }
}

pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidValue { name, value })
    }
}

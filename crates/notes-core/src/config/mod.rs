//! Presentation settings for the category list screen.
//!
//! Front-ends load a `PresenterConfig` from JSON (or use the defaults) and
//! hand it to [`crate::presenter::CategoryListPresenter`].

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Highlight for the category the note is filed under ("bitter sweet")
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#FE6F5E";
/// Color for every other row
pub const DEFAULT_PLAIN_COLOR: &str = "#000000";
pub const DEFAULT_TITLE: &str = "Categories";
pub const DEFAULT_EMPTY_MESSAGE: &str = "You don't have any categories yet";

/// Longest part of a rejected color echoed back in the error
const MAX_ECHOED_COLOR_LEN: usize = 16;

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid regex"));

/// Text and colors used by the category list screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PresenterConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_empty_message")]
    pub empty_message: String,
    #[serde(default = "default_highlight_color")]
    pub highlight_color: String,
    #[serde(default = "default_plain_color")]
    pub plain_color: String,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            empty_message: default_empty_message(),
            highlight_color: default_highlight_color(),
            plain_color: default_plain_color(),
        }
    }
}

impl PresenterConfig {
    /// Parse and validate a config from a raw JSON payload.
    pub fn from_json(payload: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(payload)?;
        config.validated()
    }

    /// Check every field, returning the normalized config.
    ///
    /// Text fields are trimmed and must not be empty; colors must be `#RRGGBB`
    /// and are upper-cased.
    pub fn validated(self) -> Result<Self> {
        let normalized = Self {
            title: required_text(&self.title, "title")?,
            empty_message: required_text(&self.empty_message, "empty_message")?,
            highlight_color: normalize_hex_color(&self.highlight_color, "highlight_color")?,
            plain_color: normalize_hex_color(&self.plain_color, "plain_color")?,
        };

        if normalized.highlight_color == normalized.plain_color {
            return Err(Error::InvalidInput(
                "highlight_color must differ from plain_color".to_string(),
            ));
        }

        Ok(normalized)
    }

    /// Color for a row, depending on whether it is the note's category.
    pub fn row_color(&self, highlighted: bool) -> &str {
        if highlighted {
            &self.highlight_color
        } else {
            &self.plain_color
        }
    }
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_empty_message() -> String {
    DEFAULT_EMPTY_MESSAGE.to_string()
}

fn default_highlight_color() -> String {
    DEFAULT_HIGHLIGHT_COLOR.to_string()
}

fn default_plain_color() -> String {
    DEFAULT_PLAIN_COLOR.to_string()
}

fn required_text(raw: &str, field: &str) -> Result<String> {
    let value = raw.trim();
    if value.is_empty() {
        Err(Error::InvalidInput(format!("config field '{field}' is required")))
    } else {
        Ok(value.to_string())
    }
}

fn normalize_hex_color(raw: &str, field: &str) -> Result<String> {
    let value = raw.trim();
    if HEX_COLOR.is_match(value) {
        Ok(value.to_ascii_uppercase())
    } else {
        let echoed = value.chars().take(MAX_ECHOED_COLOR_LEN).collect::<String>();
        Err(Error::InvalidInput(format!(
            "config field '{field}' must be a #RRGGBB color, got '{echoed}'"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = PresenterConfig::from_json("{}").unwrap();
        assert_eq!(config, PresenterConfig::default());
        assert_eq!(config.title, "Categories");
        assert_eq!(config.empty_message, "You don't have any categories yet");
    }

    #[test]
    fn colors_are_normalized() {
        let config =
            PresenterConfig::from_json(r##"{ "highlight_color": " #ff8800 " }"##).unwrap();
        assert_eq!(config.highlight_color, "#FF8800");
        assert_eq!(config.row_color(true), "#FF8800");
        assert_eq!(config.row_color(false), DEFAULT_PLAIN_COLOR);
    }

    #[test]
    fn rejects_unknown_fields() {
        let error = PresenterConfig::from_json(r#"{ "font": "mono" }"#).unwrap_err();
        assert!(error.to_string().contains("unknown field"));
    }

    #[test]
    fn rejects_bad_color() {
        let error = PresenterConfig::from_json(r#"{ "plain_color": "black" }"#).unwrap_err();
        assert!(error.to_string().contains("plain_color"));
    }

    #[test]
    fn rejects_blank_title() {
        let error = PresenterConfig::from_json(r#"{ "title": "  " }"#).unwrap_err();
        assert!(matches!(error, Error::InvalidInput(_)));
        assert!(error.to_string().contains("'title'"));
    }

    #[test]
    fn text_fields_are_trimmed() {
        let config = PresenterConfig::from_json(
            r#"{ "title": "  Folders ", "empty_message": " Nothing here\n" }"#,
        )
        .unwrap();
        assert_eq!(config.title, "Folders");
        assert_eq!(config.empty_message, "Nothing here");
    }

    #[test]
    fn long_bad_color_is_cut_short_in_error() {
        let payload = format!(r#"{{ "plain_color": "{}" }}"#, "z".repeat(200));
        let error = PresenterConfig::from_json(&payload).unwrap_err();
        let message = error.to_string();
        assert!(message.contains(&"z".repeat(MAX_ECHOED_COLOR_LEN)));
        assert!(!message.contains(&"z".repeat(MAX_ECHOED_COLOR_LEN + 1)));
    }

    #[test]
    fn rejects_indistinguishable_colors() {
        let error = PresenterConfig::from_json(
            r##"{ "highlight_color": "#000000", "plain_color": "#000000" }"##,
        )
        .unwrap_err();
        assert!(error.to_string().contains("differ"));
    }
}

//! Immutable render input delivered by the host.
//!
//! Field names on the wire follow the preview webview protocol (`offset`, `cursor`,
//! `position`, `fontsize`, `fontfamily`); the long names are accepted as aliases,
//! and [`Snapshot::from_payload`] prefers the wire name when a payload sends both.
//! Every field is lenient: a missing or mistyped value falls back to its default
//! instead of rejecting the whole snapshot.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::core::cursor::DEFAULT_CURSOR_GLYPH;

pub const DEFAULT_FONT_SIZE_PX: f64 = 14.0;
pub const DEFAULT_FONT_FAMILY: &str = "serif";

const PX_PER_PT: f64 = 4.0 / 3.0;
const PX_PER_EM: f64 = 16.0;

/// How the horizontal scroll offset follows the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportPolicy {
    /// Never follow the cursor; remember the user's own scroll position instead.
    None,
    /// Scroll only as far as needed to bring the cursor back into view.
    #[default]
    Inner,
    Left,
    Center,
    Right,
}

impl ViewportPolicy {
    /// Parse a policy name. Unknown names behave like `inner`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "none" => Self::None,
            "left" => Self::Left,
            "center" => Self::Center,
            "right" => Self::Right,
            _ => Self::Inner,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Inner => "inner",
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }

    /// Whether this policy reads and writes the persisted scroll offset.
    pub fn persists_scroll(self) -> bool {
        matches!(self, Self::None)
    }
}

impl<'de> Deserialize<'de> for ViewportPolicy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().map_or(Self::Inner, Self::parse))
    }
}

/// One immutable bundle of text, cursor offset and render options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    #[serde(deserialize_with = "lenient_text")]
    pub text: String,
    #[serde(
        rename = "offset",
        alias = "cursorOffset",
        deserialize_with = "lenient_offset"
    )]
    pub cursor_offset: i64,
    #[serde(
        rename = "cursor",
        alias = "cursorGlyph",
        deserialize_with = "lenient_glyph"
    )]
    pub cursor_glyph: String,
    #[serde(rename = "position", alias = "viewportPolicy")]
    pub viewport_policy: ViewportPolicy,
    #[serde(
        rename = "fontsize",
        alias = "fontSize",
        deserialize_with = "lenient_text"
    )]
    pub font_size: String,
    #[serde(
        rename = "fontfamily",
        alias = "fontFamily",
        deserialize_with = "lenient_text"
    )]
    pub font_family: String,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            text: String::new(),
            cursor_offset: 0,
            cursor_glyph: DEFAULT_CURSOR_GLYPH.to_string(),
            viewport_policy: ViewportPolicy::default(),
            font_size: String::new(),
            font_family: String::new(),
        }
    }
}

/// Wire names and the long names accepted in their place.
const FIELD_ALIASES: [(&str, &str); 5] = [
    ("offset", "cursorOffset"),
    ("cursor", "cursorGlyph"),
    ("position", "viewportPolicy"),
    ("fontsize", "fontSize"),
    ("fontfamily", "fontFamily"),
];

impl Snapshot {
    /// Decode a payload object. When a field arrives under both its wire name and
    /// its long name, the wire name wins. Non-objects yield `None`.
    pub fn from_payload(payload: Value) -> Option<Self> {
        let Value::Object(mut fields) = payload else {
            return None;
        };
        for (wire, long) in FIELD_ALIASES {
            if fields.contains_key(wire) {
                fields.remove(long);
            }
        }
        serde_json::from_value(Value::Object(fields)).ok()
    }

    pub fn new(text: impl Into<String>, cursor_offset: i64) -> Self {
        Self {
            text: text.into(),
            cursor_offset,
            ..Self::default()
        }
    }

    pub fn with_glyph(mut self, glyph: impl Into<String>) -> Self {
        self.cursor_glyph = glyph.into();
        self
    }

    pub fn with_policy(mut self, policy: ViewportPolicy) -> Self {
        self.viewport_policy = policy;
        self
    }

    pub fn with_font(mut self, size: impl Into<String>, family: impl Into<String>) -> Self {
        self.font_size = size.into();
        self.font_family = family.into();
        self
    }

    /// Resolved font styling for this snapshot.
    pub fn font_style(&self) -> FontStyle {
        FontStyle::resolve(&self.font_size, &self.font_family)
    }
}

/// Font styling applied to every paragraph on each render.
#[derive(Debug, Clone, PartialEq)]
pub struct FontStyle {
    size_px: f64,
    family: Option<String>,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            size_px: DEFAULT_FONT_SIZE_PX,
            family: None,
        }
    }
}

impl FontStyle {
    /// Resolve raw snapshot values. Unparseable sizes fall back to 14px, an empty
    /// family falls back to [`DEFAULT_FONT_FAMILY`].
    pub fn resolve(size: &str, family: &str) -> Self {
        let family = family.trim();
        Self {
            size_px: parse_font_size(size).unwrap_or(DEFAULT_FONT_SIZE_PX),
            family: (!family.is_empty()).then(|| family.to_string()),
        }
    }

    pub fn size_px(&self) -> f64 {
        self.size_px
    }

    /// Effective family, including the fallback.
    pub fn family(&self) -> &str {
        self.family.as_deref().unwrap_or(DEFAULT_FONT_FAMILY)
    }

    /// Inline style declaration for HTML backends. Without an explicit family the
    /// declaration is omitted so the page stylesheet applies.
    pub fn css(&self) -> String {
        match self.family.as_deref() {
            Some(family) => format!(
                "font-size: {}px; font-family: \"{}\"",
                self.size_px,
                family.replace('"', "")
            ),
            None => format!("font-size: {}px", self.size_px),
        }
    }
}

/// Parse a CSS-ish font size (`20px`, `12pt`, `1.5em`, `18`) into pixels.
pub fn parse_font_size(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let split = raw
        .char_indices()
        .find(|(index, ch)| !(ch.is_ascii_digit() || *ch == '.' || (*index == 0 && *ch == '+')))
        .map_or(raw.len(), |(index, _)| index);
    let (number, unit) = raw.split_at(split);
    let value: f64 = number.parse().ok()?;
    let px = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "px" => value,
        "pt" => value * PX_PER_PT,
        "em" | "rem" => value * PX_PER_EM,
        _ => return None,
    };
    (px.is_finite() && px > 0.0).then_some(px)
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(string_or(Value::deserialize(deserializer)?, ""))
}

fn lenient_glyph<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(string_or(
        Value::deserialize(deserializer)?,
        DEFAULT_CURSOR_GLYPH,
    ))
}

fn lenient_offset<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|n| n.is_finite()).map(|n| n.trunc() as i64))
            .unwrap_or(0),
        Value::String(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map_or(0, |n| n.trunc() as i64),
        _ => 0,
    })
}

fn string_or(value: Value, fallback: &str) -> String {
    match value {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{parse_font_size, FontStyle, Snapshot, ViewportPolicy};

    #[test]
    fn wire_names_and_aliases_both_decode() {
        let wire: Snapshot = serde_json::from_value(json!({
            "text": "本文",
            "offset": 1,
            "cursor": "▍",
            "position": "center",
            "fontsize": "20px",
            "fontfamily": "Noto Serif JP",
        }))
        .unwrap();
        let long: Snapshot = serde_json::from_value(json!({
            "text": "本文",
            "cursorOffset": 1,
            "cursorGlyph": "▍",
            "viewportPolicy": "center",
            "fontSize": "20px",
            "fontFamily": "Noto Serif JP",
        }))
        .unwrap();

        assert_eq!(wire, long);
        assert_eq!(wire.viewport_policy, ViewportPolicy::Center);
        assert_eq!(wire.cursor_offset, 1);
    }

    #[test]
    fn wire_name_wins_when_both_names_are_sent() {
        let snapshot = Snapshot::from_payload(json!({
            "text": "本文",
            "offset": 2,
            "cursorOffset": 0,
            "position": "left",
            "viewportPolicy": "right",
            "fontSize": "18px",
        }))
        .expect("payload should decode");

        assert_eq!(snapshot.cursor_offset, 2);
        assert_eq!(snapshot.viewport_policy, ViewportPolicy::Left);
        assert_eq!(snapshot.font_style().size_px(), 18.0);
        assert_eq!(Snapshot::from_payload(json!("text")), None);
    }

    #[test]
    fn malformed_fields_fall_back_to_defaults() {
        let snapshot: Snapshot = serde_json::from_value(json!({
            "text": null,
            "offset": "12.9",
            "cursor": null,
            "position": 7,
            "fontsize": {"px": 3},
        }))
        .unwrap();

        assert_eq!(snapshot.text, "");
        assert_eq!(snapshot.cursor_offset, 12);
        assert_eq!(snapshot.cursor_glyph, "|");
        assert_eq!(snapshot.viewport_policy, ViewportPolicy::Inner);
        assert_eq!(snapshot.font_style().size_px(), 14.0);
    }

    #[test]
    fn fractional_and_negative_offsets_truncate() {
        let snapshot: Snapshot =
            serde_json::from_value(json!({ "text": "abc", "offset": -2.7 })).unwrap();
        assert_eq!(snapshot.cursor_offset, -2);
    }

    #[test]
    fn unknown_policy_behaves_like_inner() {
        assert_eq!(ViewportPolicy::parse("sideways"), ViewportPolicy::Inner);
        assert_eq!(ViewportPolicy::parse(" RIGHT "), ViewportPolicy::Right);
        assert!(ViewportPolicy::None.persists_scroll());
        assert!(!ViewportPolicy::Inner.persists_scroll());
    }

    #[test]
    fn font_sizes_accept_common_units() {
        assert_eq!(parse_font_size("20px"), Some(20.0));
        assert_eq!(parse_font_size(" 18 "), Some(18.0));
        assert_eq!(parse_font_size("12pt"), Some(16.0));
        assert_eq!(parse_font_size("1.5em"), Some(24.0));
        assert_eq!(parse_font_size("large"), None);
        assert_eq!(parse_font_size("0px"), None);
        assert_eq!(parse_font_size("-4px"), None);
        assert_eq!(parse_font_size(""), None);
    }

    #[test]
    fn empty_family_uses_default_and_omits_css() {
        let font = FontStyle::resolve("", "  ");
        assert_eq!(font.size_px(), 14.0);
        assert_eq!(font.family(), "serif");
        assert_eq!(font.css(), "font-size: 14px");

        let font = FontStyle::resolve("22px", "Klee One");
        assert_eq!(font.css(), "font-size: 22px; font-family: \"Klee One\"");
    }
}

//! Host-side preview settings.
//!
//! The host owns user configuration. It clamps the font size, defaults the glyph and
//! policy, and folds them with the document text into one update message per change.

use serde_json::Value;

use crate::core::cursor::DEFAULT_CURSOR_GLYPH;
use crate::core::protocol::HostMessage;
use crate::core::snapshot::{Snapshot, ViewportPolicy};
use crate::error::PreviewError;

pub const MIN_FONT_SIZE: f64 = 8.0;
pub const MAX_FONT_SIZE: f64 = 72.0;
pub const DEFAULT_FONT_SIZE: f64 = 20.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewSettings {
    pub font_size: f64,
    pub font_family: String,
    pub cursor_glyph: String,
    pub viewport_policy: ViewportPolicy,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            font_family: String::new(),
            cursor_glyph: DEFAULT_CURSOR_GLYPH.to_string(),
            viewport_policy: ViewportPolicy::Inner,
        }
    }
}

/// Clamp to `[MIN_FONT_SIZE, MAX_FONT_SIZE]`; NaN clamps to the minimum.
pub fn clamp_font_size(size: f64) -> f64 {
    if size.is_nan() {
        return MIN_FONT_SIZE;
    }
    size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

impl PreviewSettings {
    /// Read settings from a host configuration object with the keys `fontSize`,
    /// `fontFamily`, `cursor` and `position`. Missing keys take defaults; a
    /// `fontSize` that is present but not a number clamps to the minimum.
    pub fn from_config(config: &Value) -> Self {
        let defaults = Self::default();
        let font_size = match config.get("fontSize") {
            None | Some(Value::Null) => defaults.font_size,
            Some(value) => clamp_font_size(value.as_f64().unwrap_or(f64::NAN)),
        };
        let font_family = config
            .get("fontFamily")
            .and_then(Value::as_str)
            .map_or(defaults.font_family, str::to_string);
        let cursor_glyph = config
            .get("cursor")
            .and_then(Value::as_str)
            .map_or(defaults.cursor_glyph, str::to_string);
        let viewport_policy = config
            .get("position")
            .and_then(Value::as_str)
            .map_or(defaults.viewport_policy, ViewportPolicy::parse);

        Self {
            font_size,
            font_family,
            cursor_glyph,
            viewport_policy,
        }
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = clamp_font_size(size);
        self
    }

    /// CSS size string sent on the wire, e.g. `20px`.
    pub fn font_size_css(&self) -> String {
        format!("{}px", clamp_font_size(self.font_size))
    }

    pub fn snapshot(&self, text: impl Into<String>, cursor_offset: i64) -> Snapshot {
        Snapshot::new(text, cursor_offset)
            .with_glyph(self.cursor_glyph.clone())
            .with_policy(self.viewport_policy)
            .with_font(self.font_size_css(), self.font_family.clone())
    }

    /// Serialized `{"type":"update","payload":...}` message for the engine.
    pub fn update_message(
        &self,
        text: impl Into<String>,
        cursor_offset: i64,
    ) -> Result<String, PreviewError> {
        HostMessage::Update(self.snapshot(text, cursor_offset)).to_json()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{clamp_font_size, PreviewSettings, MAX_FONT_SIZE, MIN_FONT_SIZE};
    use crate::core::protocol::{decode_inbound, Inbound};
    use crate::core::snapshot::ViewportPolicy;

    #[test]
    fn font_size_is_clamped() {
        assert_eq!(clamp_font_size(4.0), MIN_FONT_SIZE);
        assert_eq!(clamp_font_size(100.0), MAX_FONT_SIZE);
        assert_eq!(clamp_font_size(f64::NAN), MIN_FONT_SIZE);
        assert_eq!(clamp_font_size(18.5), 18.5);
    }

    #[test]
    fn config_defaults_and_coercion() {
        assert_eq!(PreviewSettings::from_config(&json!({})), PreviewSettings::default());

        let settings = PreviewSettings::from_config(&json!({
            "fontSize": "big",
            "fontFamily": "Noto Serif JP",
            "cursor": "▮",
            "position": "center",
        }));
        assert_eq!(settings.font_size, MIN_FONT_SIZE);
        assert_eq!(settings.font_family, "Noto Serif JP");
        assert_eq!(settings.cursor_glyph, "▮");
        assert_eq!(settings.viewport_policy, ViewportPolicy::Center);

        let settings = PreviewSettings::from_config(&json!({ "fontSize": 300 }));
        assert_eq!(settings.font_size, MAX_FONT_SIZE);
    }

    #[test]
    fn update_message_decodes_back_into_the_same_snapshot() {
        let settings = PreviewSettings::default().with_font_size(24.0);
        let raw = settings
            .update_message("縦書き", 2)
            .expect("message should encode");

        let Inbound::Update(snapshot) = decode_inbound(&raw).expect("valid json") else {
            panic!("expected an update");
        };
        assert_eq!(snapshot, settings.snapshot("縦書き", 2));
        assert_eq!(snapshot.font_size, "24px");
        assert_eq!(snapshot.font_style().size_px(), 24.0);
    }
}

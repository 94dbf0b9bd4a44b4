//! In-process message contract between the host and the preview engine.
//!
//! Inbound: `{"type": "update", "payload": Snapshot}`. Any other `type`, or a message
//! that is not an object, is ignored.
//! Outbound: `{"command": "alert", "text": "..."}` for user-facing error text.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::snapshot::Snapshot;
use crate::error::PreviewError;

pub const UPDATE_MESSAGE_TYPE: &str = "update";

/// Result of decoding one inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Update(Snapshot),
    /// Unrecognized or payload-less message; `kind` is its `type` when it had one.
    Ignored { kind: Option<String> },
}

/// Decode a raw JSON message. Only invalid JSON is an error.
pub fn decode_inbound(raw: &str) -> Result<Inbound, PreviewError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|source| PreviewError::MalformedMessage { source })?;
    Ok(decode_inbound_value(value))
}

/// Decode an already-parsed message.
pub fn decode_inbound_value(value: Value) -> Inbound {
    let Value::Object(mut fields) = value else {
        return Inbound::Ignored { kind: None };
    };

    let kind = fields
        .get("type")
        .and_then(Value::as_str)
        .map(str::to_string);
    if kind.as_deref() != Some(UPDATE_MESSAGE_TYPE) {
        return Inbound::Ignored { kind };
    }

    match fields.remove("payload").and_then(Snapshot::from_payload) {
        Some(snapshot) => Inbound::Update(snapshot),
        None => Inbound::Ignored { kind },
    }
}

/// Host-to-engine message, for hosts that build messages in Rust.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum HostMessage {
    Update(Snapshot),
}

impl HostMessage {
    pub fn to_json(&self) -> Result<String, PreviewError> {
        serde_json::to_string(self).map_err(|source| PreviewError::encode("host message", source))
    }
}

/// Engine-to-host message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum OutboundMessage {
    Alert { text: String },
}

impl OutboundMessage {
    pub fn alert(text: impl Into<String>) -> Self {
        Self::Alert { text: text.into() }
    }

    pub fn to_json(&self) -> Result<String, PreviewError> {
        serde_json::to_string(self)
            .map_err(|source| PreviewError::encode("outbound message", source))
    }

    /// Host-side decode. Unknown commands yield `None`.
    pub fn decode(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

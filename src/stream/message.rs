use serde::Deserialize;

use crate::snapshot::{AppointmentId, Interview, UpdateEvent};

/// Inbound push messages this client understands. Anything else fails to
/// decode and is ignored by the caller.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum InboundMessage {
    #[serde(rename = "SET_INTERVIEW")]
    SetInterview {
        id: AppointmentId,
        #[serde(default)]
        interview: Option<Interview>,
    },
}

/// Decodes one text frame into an update event.
///
/// Returns None for non-JSON payloads, JSON that is not an object, and
/// objects whose `type` is not `SET_INTERVIEW`.
pub fn decode_message(text: &str) -> Option<UpdateEvent> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    // serde accepts sequences for tagged enums too; only objects are messages
    if !value.is_object() {
        return None;
    }

    match serde_json::from_value::<InboundMessage>(value).ok()? {
        InboundMessage::SetInterview { id, interview } => Some(UpdateEvent { id, interview }),
    }
}

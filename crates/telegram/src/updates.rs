//! Bot API update envelopes and their mapping onto core inbound events.

use serde::Deserialize;

use traty_core::{InboundEvent, SessionId};

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdatesResponse {
    pub ok: bool,
    #[serde(default)]
    pub result: Vec<Update>,
}

/// Splits an update into its session identity and the core event. Updates
/// without a message (edits, channel posts) and messages without text
/// (stickers, photos) are `Unsupported`; the machine drops them without a
/// state change.
pub fn inbound_from_update(update: &Update) -> Option<(SessionId, InboundEvent)> {
    let message = update.message.as_ref()?;
    let session_id = SessionId(message.chat.id);

    let Some(text) = message.text.as_deref() else {
        return Some((session_id, InboundEvent::Unsupported));
    };

    let event = match text.trim() {
        "/start" => InboundEvent::Start,
        "/cancel" => InboundEvent::Cancel,
        trimmed if trimmed.starts_with('/') => InboundEvent::Unsupported,
        trimmed => InboundEvent::Text(trimmed.to_string()),
    };

    Some((session_id, event))
}

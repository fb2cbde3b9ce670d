//! JSON frame codec.

use super::message::Message;
use crate::core::ProtocolError;

/// Encode a message as one JSON text frame.
pub fn encode(message: &Message) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(message)?)
}

/// Decode one JSON text frame. Unknown `type` tags are errors.
pub fn decode(frame: &str) -> Result<Message, ProtocolError> {
    Ok(serde_json::from_str(frame)?)
}

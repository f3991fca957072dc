//! Codec trait and implementations for serializing messages.
//!
//! The gateway doesn't care how actions and events become bytes — it goes
//! through the [`Codec`] trait, so a binary codec can be swapped in later
//! without touching routing code.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes Rust values to bytes and decodes bytes back.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// A [`Codec`] that uses JSON via `serde_json`.
///
/// Human-readable, inspectable in browser DevTools, and what the reference
/// client speaks. Behind the `json` feature flag (enabled by default).
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::ClientAction;

    #[test]
    fn test_json_codec_round_trip() {
        let codec = JsonCodec;
        let action = ClientAction::ChatMessage {
            room_code: "AB12".into(),
            message: "gg".into(),
        };
        let bytes = codec.encode(&action).unwrap();
        let decoded: ClientAction = codec.decode(&bytes).unwrap();
        assert_eq!(action, decoded);
    }

    #[test]
    fn test_json_codec_decode_garbage_returns_error() {
        let codec = JsonCodec;
        let result: Result<ClientAction, _> = codec.decode(b"not json at all");
        assert!(result.is_err());
    }
}

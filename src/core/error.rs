//! Error types.
//!
//! - `GameError`: a local action was rejected. Never sent to peers.
//! - `TransportError`: a connection could not carry a message.
//! - `ProtocolError`: a frame could not be encoded or decoded.
//!
//! Desynchronization between peers is not an error: it is never detected.

use super::player::PlayerId;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Game has not started yet!")]
    NotStarted,

    #[error("Game already started")]
    AlreadyStarted,

    #[error("Not your turn!")]
    NotYourTurn,

    #[error("Only the host can perform this action: {0}")]
    HostOnly(&'static str),

    #[error("Selected card not found in hand: {0}")]
    CardNotInHand(String),

    #[error("Selected card not found in played cards: {0}")]
    CardNotInPlayed(String),

    #[error("No cards left in the deck!")]
    DeckEmpty,

    #[error("No other players to take from!")]
    NoOpponents,

    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("Not connected to a host")]
    NotConnected,
}

#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("Connection to {0} is closed")]
    Closed(String),

    #[error("Peer unreachable: {0}")]
    Unreachable(String),

    #[error("Invalid game code: {0}")]
    InvalidCode(String),

    #[error(transparent)]
    Codec(#[from] ProtocolError),
}

#[derive(thiserror::Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed frame: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_error_messages() {
        assert_eq!(GameError::NotYourTurn.to_string(), "Not your turn!");
        assert_eq!(GameError::DeckEmpty.to_string(), "No cards left in the deck!");
        assert_eq!(
            GameError::HostOnly("start game").to_string(),
            "Only the host can perform this action: start game"
        );
        assert_eq!(
            GameError::UnknownPlayer(PlayerId::new("x")).to_string(),
            "Unknown player: x"
        );
    }

    #[test]
    fn test_protocol_error_converts_into_transport_error() {
        let err: ProtocolError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        let transport: TransportError = err.into();
        assert!(matches!(transport, TransportError::Codec(_)));
    }
}

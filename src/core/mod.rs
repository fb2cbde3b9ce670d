//! Core types: players, RNG, configuration, errors.

pub mod player;
pub mod rng;
pub mod config;
pub mod error;

pub use player::{ConnectedPlayer, PlayerId, PlayerRoster};
pub use rng::GameRng;
pub use config::{SessionConfig, TakeCardPolicy};
pub use error::{GameError, ProtocolError, TransportError};

//! Peer transport abstraction.
//!
//! The peer-to-peer library is external. Sessions only need to open a
//! connection to a game code, send messages on it, and receive its
//! `open` / `data` / `close` / `error` events.

use super::game_code::GameCode;
use crate::core::{PlayerId, TransportError};
use crate::protocol::Message;

/// One bidirectional channel to a remote player.
///
/// The remote's peer id doubles as its player id.
pub trait PeerConnection {
    /// Opaque id of the remote peer, assigned by the transport.
    fn peer_id(&self) -> &PlayerId;

    /// Fire-and-forget send. `Ok` means the transport accepted the frame,
    /// not that the peer received it.
    fn send(&mut self, message: &Message) -> Result<(), TransportError>;

    fn is_open(&self) -> bool;

    fn close(&mut self);
}

/// Opens connections to a host by game code.
pub trait Connector {
    type Connection: PeerConnection + 'static;

    fn connect(&mut self, code: &GameCode) -> Result<Self::Connection, TransportError>;
}

/// Events a connection delivers to its session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectionEvent {
    Open,
    Data(Message),
    Close,
    Error(String),
}

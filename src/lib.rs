//! # peer-cards
//!
//! Game core for a small peer-to-peer card game played over direct
//! browser connections.
//!
//! ## Design Principles
//!
//! 1. **Host-Authoritative**: One participant owns the decks and the turn
//!    order. Everyone else holds a replicated, advisory view.
//!
//! 2. **Full-Replace Updates**: Hands, the special area and the turn order
//!    are overwritten wholesale, never patched.
//!
//! 3. **Best-Effort Delivery**: Messages are sent once with no ack or
//!    retry. A lost update leaves that peer diverged until the next
//!    update of the same slice.
//!
//! ## Architecture
//!
//! - **Transport-Agnostic**: Sessions talk to `PeerConnection` /
//!   `Connector` traits. The browser transport lives outside this crate;
//!   `net::memory` provides an in-process one.
//!
//! - **Event-Driven**: The embedding layer feeds connection events and UI
//!   actions into a session one at a time. Nothing blocks.
//!
//! ## Modules
//!
//! - `core`: Player ids, roster, RNG, configuration, errors
//! - `cards`: Cards, decks and the standard deck builders
//! - `protocol`: The `Message` union and its JSON codec
//! - `net`: Transport traits, game codes, fan-out, in-memory transport
//! - `session`: Host and client sessions, turn order, win check

pub mod core;
pub mod cards;
pub mod protocol;
pub mod net;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    ConnectedPlayer, PlayerId, PlayerRoster,
    GameRng,
    SessionConfig, TakeCardPolicy,
    GameError, ProtocolError, TransportError,
};

pub use crate::cards::{Card, CardId, CardKind, Deck, create_main_deck, create_special_deck};

pub use crate::protocol::{Message, SpecialCards, PROTOCOL_VERSION};

pub use crate::net::{
    ConnectionEvent, Connector, PeerConnection,
    GameCode, Fanout, BroadcastReport,
    MemoryNetwork, MemoryEndpoint, MemoryEvent, MemoryConnection,
};

pub use crate::session::{
    HostSession, ClientSession,
    DeckAuthority, InitialDeal,
    TurnOrder, TurnPhase, Removal,
    Seat, Victory,
    Notice, NoticeLevel,
};

//! Networking: transport traits, game codes, fan-out, in-memory transport.

pub mod transport;
pub mod game_code;
pub mod broadcast;
pub mod memory;

pub use transport::{ConnectionEvent, Connector, PeerConnection};
pub use game_code::GameCode;
pub use broadcast::{BroadcastReport, Fanout};
pub use memory::{MemoryConnection, MemoryEndpoint, MemoryEvent, MemoryNetwork};

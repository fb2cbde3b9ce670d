//! Host and client sessions.
//!
//! ## Key Types
//!
//! - `HostSession`: Owns the decks and the turn order, relays announcements
//! - `ClientSession`: Replicated view of one remote participant
//! - `DeckAuthority`: Host-only deck state and the opening deal
//! - `TurnOrder` / `TurnPhase`: Whose turn it is
//! - `Seat`: The local player's hand, played area and discard pile
//! - `Notices`: Outbox of user-visible messages

pub mod authority;
pub mod client;
pub mod host;
pub mod notice;
pub mod outcome;
pub mod seat;
pub mod turn;

pub use authority::{DeckAuthority, InitialDeal};
pub use client::ClientSession;
pub use host::HostSession;
pub use notice::{Notice, NoticeLevel, Notices};
pub use outcome::{check_for_winner, Victory};
pub use seat::Seat;
pub use turn::{Removal, TurnOrder, TurnPhase};

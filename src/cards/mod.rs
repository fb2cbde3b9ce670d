//! Cards and decks.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier unique within a deck
//! - `CardKind`: Main or special deck
//! - `Card`: Immutable card value
//! - `Deck`: Ordered card sequence with random draws

pub mod card;
pub mod deck;

pub use card::{Card, CardId, CardKind};
pub use deck::{create_main_deck, create_special_deck, Deck};

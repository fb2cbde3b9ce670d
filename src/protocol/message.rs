//! Wire messages.
//!
//! Every message is a JSON object tagged by `type`, with camelCase payload
//! fields. The set of kinds is closed; dispatch sites match exhaustively.
//!
//! ## Delivery
//!
//! At-most-once, unordered across connections, no acknowledgement and no
//! retry. A lost update is never recovered: the receiver stays diverged
//! until a later full-replace update of the same slice happens to arrive.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::{Card, CardId};
use crate::core::PlayerId;

/// Revision of the message set carried in `welcome`.
///
/// Revision 1 is the best-effort protocol plus `card_discarded`,
/// `draw_request`, `card_dealt` and host relaying.
pub const PROTOCOL_VERSION: u32 = 1;

/// Face-up special cards on the table, by slot.
pub type SpecialCards = SmallVec<[Card; 3]>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Message {
    /// Host greets a freshly opened connection.
    Welcome {
        host_name: String,
        #[serde(default)]
        protocol_version: u32,
    },

    /// Client introduces itself to the host.
    PlayerInfo { name: String, color: String },

    /// Host starts the game; `player_cards` is the receiver's hand.
    GameStart {
        player_cards: Vec<Card>,
        special_cards: SpecialCards,
        turn_order: Vec<PlayerId>,
        current_turn: PlayerId,
    },

    /// Full replacement of the receiver's hand.
    HandUpdate { cards: Vec<Card> },

    /// Full replacement of the special area.
    SpecialCardsUpdate { cards: SpecialCards },

    /// Full replacement of turn order and current turn.
    TurnOrderUpdate {
        turn_order: Vec<PlayerId>,
        current_turn: PlayerId,
    },

    TurnUpdate { current_turn: PlayerId },

    /// A player moved a card from hand to their played area.
    CardPlayed {
        player_id: PlayerId,
        card_id: CardId,
        #[serde(default)]
        hand_size: usize,
        #[serde(default)]
        played_cards: Vec<Card>,
    },

    CardDrawn {
        player_id: PlayerId,
        #[serde(default)]
        hand_size: usize,
    },

    /// Broadcast; only the peer named by `target_player_id` acts on it.
    TakeCardRequest {
        target_player_id: PlayerId,
        card_id: CardId,
        requester_id: PlayerId,
    },

    /// The surrendered card, addressed to the requester.
    CardReceived {
        card: Card,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        recipient_id: Option<PlayerId>,
    },

    /// Public notice that `player_id` took a card from `target_player_id`.
    CardTaken {
        player_id: PlayerId,
        target_player_id: PlayerId,
    },

    CardDiscarded { player_id: PlayerId, card_id: CardId },

    /// Client asks the host to draw a main card on its behalf.
    DrawRequest { player_id: PlayerId },

    /// Host answers a draw request with the drawn card.
    CardDealt { card: Card },
}

impl Message {
    /// Wire tag of this message.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Welcome { .. } => "welcome",
            Message::PlayerInfo { .. } => "player_info",
            Message::GameStart { .. } => "game_start",
            Message::HandUpdate { .. } => "hand_update",
            Message::SpecialCardsUpdate { .. } => "special_cards_update",
            Message::TurnOrderUpdate { .. } => "turn_order_update",
            Message::TurnUpdate { .. } => "turn_update",
            Message::CardPlayed { .. } => "card_played",
            Message::CardDrawn { .. } => "card_drawn",
            Message::TakeCardRequest { .. } => "take_card_request",
            Message::CardReceived { .. } => "card_received",
            Message::CardTaken { .. } => "card_taken",
            Message::CardDiscarded { .. } => "card_discarded",
            Message::DrawRequest { .. } => "draw_request",
            Message::CardDealt { .. } => "card_dealt",
        }
    }

    /// Public announcements the host forwards from one client to the rest.
    #[must_use]
    pub fn is_relayed_announcement(&self) -> bool {
        matches!(
            self,
            Message::CardPlayed { .. }
                | Message::CardDrawn { .. }
                | Message::CardTaken { .. }
                | Message::CardDiscarded { .. }
        )
    }

    /// Actions that end the sender's turn when the sender holds it.
    #[must_use]
    pub fn ends_turn(&self) -> bool {
        matches!(
            self,
            Message::CardPlayed { .. }
                | Message::CardDiscarded { .. }
                | Message::TakeCardRequest { .. }
                | Message::DrawRequest { .. }
        )
    }
}

//! The local participant's cards.
//!
//! Host and client both keep a hand, a public played area, a discard pile
//! and a view of the special area. Only the local session mutates them,
//! except for full-replace updates pushed by the host.

use crate::cards::{Card, CardId};
use crate::core::{GameError, PlayerId, TakeCardPolicy};
use crate::protocol::SpecialCards;

#[derive(Clone, Debug)]
pub struct Seat {
    pub identity: PlayerId,
    pub name: String,
    pub color: String,
    hand: Vec<Card>,
    played: Vec<Card>,
    discard: Vec<Card>,
    special: SpecialCards,
}

impl Seat {
    #[must_use]
    pub fn new(identity: PlayerId, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            identity,
            name: name.into(),
            color: color.into(),
            hand: Vec::new(),
            played: Vec::new(),
            discard: Vec::new(),
            special: SpecialCards::new(),
        }
    }

    #[must_use]
    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    #[must_use]
    pub fn played_cards(&self) -> &[Card] {
        &self.played
    }

    #[must_use]
    pub fn discard_pile(&self) -> &[Card] {
        &self.discard
    }

    #[must_use]
    pub fn special_cards(&self) -> &[Card] {
        &self.special
    }

    pub fn add_to_hand(&mut self, card: Card) {
        self.hand.push(card);
    }

    /// Overwrite the hand wholesale.
    pub fn replace_hand(&mut self, cards: Vec<Card>) {
        self.hand = cards;
    }

    /// Overwrite the special area wholesale.
    pub fn replace_special(&mut self, cards: SpecialCards) {
        self.special = cards;
    }

    /// Move a card from the hand to the played area.
    pub fn play(&mut self, card_id: &CardId) -> Result<Card, GameError> {
        let card = take_by_id(&mut self.hand, card_id)
            .ok_or_else(|| GameError::CardNotInHand(card_id.to_string()))?;
        self.played.push(card.clone());
        Ok(card)
    }

    /// Move a card from the played area to the discard pile.
    pub fn discard(&mut self, card_id: &CardId) -> Result<Card, GameError> {
        let card = take_by_id(&mut self.played, card_id)
            .ok_or_else(|| GameError::CardNotInPlayed(card_id.to_string()))?;
        self.discard.push(card.clone());
        Ok(card)
    }

    /// A card taken from another player lands in the played area.
    pub fn receive(&mut self, card: Card) {
        self.played.push(card);
    }

    /// Give up a played card to a take request.
    ///
    /// Returns the card to send, or `None` when the policy refuses.
    pub fn surrender(
        &mut self,
        card_id: &CardId,
        policy: TakeCardPolicy,
        image_root: &str,
    ) -> Option<Card> {
        let held = take_by_id(&mut self.played, card_id);
        match policy {
            TakeCardPolicy::Validate => held,
            TakeCardPolicy::Placeholder => Some(Card::placeholder(card_id.clone(), image_root)),
        }
    }

    /// Empty every collection.
    pub fn clear(&mut self) {
        self.hand.clear();
        self.played.clear();
        self.discard.clear();
        self.special.clear();
    }
}

fn take_by_id(cards: &mut Vec<Card>, card_id: &CardId) -> Option<Card> {
    let pos = cards.iter().position(|c| &c.id == card_id)?;
    Some(cards.remove(pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardKind;

    fn card(id: &str, value: u32) -> Card {
        Card::new(id, CardKind::Main, "x.png", value, format!("Card {value}"))
    }

    fn seat() -> Seat {
        Seat::new(PlayerId::new("me"), "Me", "#000000")
    }

    #[test]
    fn test_play_moves_card() {
        let mut seat = seat();
        seat.replace_hand(vec![card("a", 1), card("b", 2)]);

        let played = seat.play(&CardId::new("a")).unwrap();

        assert_eq!(played.id.as_str(), "a");
        assert_eq!(seat.hand().len(), 1);
        assert_eq!(seat.played_cards(), &[card("a", 1)]);
        assert_eq!(
            seat.play(&CardId::new("a")),
            Err(GameError::CardNotInHand("a".into()))
        );
    }

    #[test]
    fn test_discard_moves_card() {
        let mut seat = seat();
        seat.receive(card("a", 1));

        seat.discard(&CardId::new("a")).unwrap();

        assert!(seat.played_cards().is_empty());
        assert_eq!(seat.discard_pile().len(), 1);
        assert_eq!(
            seat.discard(&CardId::new("a")),
            Err(GameError::CardNotInPlayed("a".into()))
        );
    }

    #[test]
    fn test_replace_hand_with_empty() {
        let mut seat = seat();
        seat.replace_hand(vec![card("a", 1)]);
        seat.replace_hand(Vec::new());
        assert!(seat.hand().is_empty());
    }

    #[test]
    fn test_surrender_validate() {
        let mut seat = seat();
        seat.receive(card("a", 3));

        assert_eq!(seat.surrender(&CardId::new("zzz"), TakeCardPolicy::Validate, ""), None);
        let given = seat.surrender(&CardId::new("a"), TakeCardPolicy::Validate, "").unwrap();
        assert_eq!(given, card("a", 3));
        assert!(seat.played_cards().is_empty());
    }

    #[test]
    fn test_surrender_placeholder() {
        let mut seat = seat();
        seat.receive(card("a", 3));

        let given = seat
            .surrender(&CardId::new("a"), TakeCardPolicy::Placeholder, "img/")
            .unwrap();
        assert_eq!(given.name, "Taken Card");
        assert_eq!(given.value, 1);
        assert!(seat.played_cards().is_empty());

        let fabricated = seat
            .surrender(&CardId::new("never-held"), TakeCardPolicy::Placeholder, "img/")
            .unwrap();
        assert_eq!(fabricated.id.as_str(), "never-held");
    }
}

//! Host-only deck authority.
//!
//! Owns the main and special decks and deals from them. Dealing is a
//! sequential extraction without replacement: each draw mutates the deck
//! before the next one, so when cards run out the players dealt last get
//! short or empty hands without any error.

use crate::cards::{create_main_deck, create_special_deck, Card, Deck};
use crate::core::{GameRng, PlayerId, SessionConfig};
use crate::protocol::SpecialCards;

/// Cards produced by the opening deal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InitialDeal {
    pub host_hand: Vec<Card>,
    pub special_cards: SpecialCards,
    /// One hand per client, in the order the clients were given.
    pub client_hands: Vec<(PlayerId, Vec<Card>)>,
}

impl InitialDeal {
    /// The hand dealt to `client`, empty if it was not dealt in.
    #[must_use]
    pub fn hand_for(&self, client: &PlayerId) -> &[Card] {
        self.client_hands
            .iter()
            .find(|(id, _)| id == client)
            .map(|(_, hand)| hand.as_slice())
            .unwrap_or(&[])
    }
}

pub struct DeckAuthority {
    main: Deck,
    special: Deck,
    rng: GameRng,
}

impl DeckAuthority {
    /// Build and shuffle the standard decks described by `config`.
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        let mut rng = GameRng::from_seed_option(config.seed);
        let mut main = create_main_deck(config);
        let mut special = create_special_deck(config);
        main.shuffle(&mut rng);
        special.shuffle(&mut rng);
        tracing::info!(
            "[host] Decks ready: {} main, {} special",
            main.len(),
            special.len()
        );
        Self::with_decks(main, special, rng)
    }

    /// Use prepared decks as they are.
    #[must_use]
    pub fn with_decks(main: Deck, special: Deck, rng: GameRng) -> Self {
        Self { main, special, rng }
    }

    /// Remove one uniformly random card from the chosen deck.
    ///
    /// Returns `None` when that deck is empty.
    pub fn draw(&mut self, from_special: bool) -> Option<Card> {
        let deck = if from_special { &mut self.special } else { &mut self.main };
        let card = deck.draw_random(&mut self.rng);
        if card.is_none() {
            tracing::warn!(
                "[host] {} deck is empty",
                if from_special { "Special" } else { "Main" }
            );
        }
        card
    }

    /// Deal the opening hands: the host first, then the special area,
    /// then each client in order.
    pub fn deal_initial_hands(
        &mut self,
        clients: &[PlayerId],
        hand_size: usize,
        special_slots: usize,
    ) -> InitialDeal {
        let host_hand = self.draw_many(false, hand_size);
        let special_cards = (0..special_slots).filter_map(|_| self.draw(true)).collect();
        let client_hands = clients
            .iter()
            .map(|client| (client.clone(), self.draw_many(false, hand_size)))
            .collect();

        InitialDeal {
            host_hand,
            special_cards,
            client_hands,
        }
    }

    #[must_use]
    pub fn main_remaining(&self) -> usize {
        self.main.len()
    }

    #[must_use]
    pub fn special_remaining(&self) -> usize {
        self.special.len()
    }

    fn draw_many(&mut self, from_special: bool, count: usize) -> Vec<Card> {
        (0..count).filter_map(|_| self.draw(from_special)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardKind;

    fn main_deck(count: u32) -> Deck {
        (0..count)
            .map(|i| Card::new(format!("main-1-{i}"), CardKind::Main, "x.png", 1, "Card 1"))
            .collect()
    }

    #[test]
    fn test_new_uses_config() {
        let config = SessionConfig::default().with_seed(1);
        let authority = DeckAuthority::new(&config);

        assert_eq!(authority.main_remaining(), 25);
        assert_eq!(authority.special_remaining(), 5);
    }

    #[test]
    fn test_draw_from_each_deck() {
        let mut authority = DeckAuthority::new(&SessionConfig::default().with_seed(2));

        let main = authority.draw(false).unwrap();
        let special = authority.draw(true).unwrap();

        assert_eq!(main.kind, CardKind::Main);
        assert_eq!(special.kind, CardKind::Special);
        assert_eq!(authority.main_remaining(), 24);
        assert_eq!(authority.special_remaining(), 4);
    }

    #[test]
    fn test_draw_empty() {
        let mut authority = DeckAuthority::with_decks(Deck::empty(), Deck::empty(), GameRng::new(0));
        assert!(authority.draw(false).is_none());
        assert!(authority.draw(true).is_none());
    }

    #[test]
    fn test_standard_deal() {
        let mut authority = DeckAuthority::new(&SessionConfig::default().with_seed(3));
        let clients = vec![PlayerId::new("a"), PlayerId::new("b")];

        let deal = authority.deal_initial_hands(&clients, 5, 3);

        assert_eq!(deal.host_hand.len(), 5);
        assert_eq!(deal.special_cards.len(), 3);
        assert_eq!(deal.hand_for(&PlayerId::new("a")).len(), 5);
        assert_eq!(deal.hand_for(&PlayerId::new("b")).len(), 5);
        assert!(deal.hand_for(&PlayerId::new("c")).is_empty());
        assert_eq!(authority.main_remaining(), 10);
        assert_eq!(authority.special_remaining(), 2);
    }

    #[test]
    fn test_deal_exhausts_sequentially() {
        let mut authority = DeckAuthority::with_decks(main_deck(5), Deck::empty(), GameRng::new(4));
        let clients = vec![PlayerId::new("a"), PlayerId::new("b")];

        let deal = authority.deal_initial_hands(&clients, 5, 3);

        assert_eq!(deal.host_hand.len(), 5);
        assert!(deal.special_cards.is_empty());
        assert!(deal.hand_for(&PlayerId::new("a")).is_empty());
        assert!(deal.hand_for(&PlayerId::new("b")).is_empty());
    }

    #[test]
    fn test_deal_partial_hand() {
        let mut authority = DeckAuthority::with_decks(main_deck(7), Deck::empty(), GameRng::new(4));
        let clients = vec![PlayerId::new("a"), PlayerId::new("b")];

        let deal = authority.deal_initial_hands(&clients, 5, 0);

        assert_eq!(deal.host_hand.len(), 5);
        assert_eq!(deal.hand_for(&PlayerId::new("a")).len(), 2);
        assert!(deal.hand_for(&PlayerId::new("b")).is_empty());
    }
}

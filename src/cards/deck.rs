//! Decks and the standard deck builders.
//!
//! Drawing removes a uniformly random card, so the order left behind by a
//! shuffle has no effect on what gets drawn.

use serde::{Deserialize, Serialize};

use super::card::{Card, CardKind};
use crate::core::{GameRng, SessionConfig};

/// Ordered sequence of cards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Remove and return a uniformly random card.
    ///
    /// Returns `None` when the deck is empty.
    pub fn draw_random(&mut self, rng: &mut GameRng) -> Option<Card> {
        let index = rng.index(self.cards.len())?;
        Some(self.cards.remove(index))
    }

    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.cards);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

impl From<Vec<Card>> for Deck {
    fn from(cards: Vec<Card>) -> Self {
        Self { cards }
    }
}

impl FromIterator<Card> for Deck {
    fn from_iter<T: IntoIterator<Item = Card>>(iter: T) -> Self {
        iter.into_iter().collect::<Vec<_>>().into()
    }
}

/// Build the main deck: `main_card_types` values with
/// `main_copies_per_type` copies each.
#[must_use]
pub fn create_main_deck(config: &SessionConfig) -> Deck {
    (1..=config.main_card_types)
        .flat_map(|value| {
            (0..config.main_copies_per_type).map(move |copy| {
                Card::new(
                    format!("main-{value}-{copy}"),
                    CardKind::Main,
                    format!("{}card_{value}.png", config.main_image_root),
                    value,
                    format!("Card {value}"),
                )
                .with_description(format!("This is card type {value}"))
            })
        })
        .collect()
}

/// Build the special deck: one card per index, worth twice its index.
#[must_use]
pub fn create_special_deck(config: &SessionConfig) -> Deck {
    (1..=config.special_card_count)
        .map(|n| {
            Card::new(
                format!("special-{n}"),
                CardKind::Special,
                format!("{}special_{n}.png", config.special_image_root),
                n * 2,
                format!("Special Card {n}"),
            )
            .with_description(format!("This is special card {n}"))
        })
        .collect()
}

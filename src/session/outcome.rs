//! Win check.
//!
//! A player wins by collecting enough played cards. Nothing evaluates this
//! automatically: sessions expose it as a poll, and a win that is never
//! polled goes unnoticed.

use serde::{Deserialize, Serialize};

use super::seat::Seat;
use crate::core::{PlayerId, PlayerRoster};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Victory {
    pub winner: PlayerId,
    pub name: String,
    pub played_cards: usize,
}

impl Victory {
    #[must_use]
    pub fn is_winner(&self, player: &PlayerId) -> bool {
        &self.winner == player
    }
}

/// The local player is checked first, then the others in join order
/// using their last-known played cards.
#[must_use]
pub fn check_for_winner(seat: &Seat, others: &PlayerRoster, threshold: usize) -> Option<Victory> {
    if seat.played_cards().len() >= threshold {
        return Some(Victory {
            winner: seat.identity.clone(),
            name: seat.name.clone(),
            played_cards: seat.played_cards().len(),
        });
    }

    others
        .iter()
        .find(|p| p.played_cards.len() >= threshold)
        .map(|p| Victory {
            winner: p.id.clone(),
            name: p.name.clone(),
            played_cards: p.played_cards.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, CardKind};
    use crate::core::ConnectedPlayer;

    fn cards(n: usize) -> Vec<Card> {
        (0..n)
            .map(|i| Card::new(format!("main-1-{i}"), CardKind::Main, "x.png", 1, "Card 1"))
            .collect()
    }

    #[test]
    fn test_no_winner() {
        let seat = Seat::new(PlayerId::new("me"), "Me", "#000000");
        assert_eq!(check_for_winner(&seat, &PlayerRoster::new(), 10), None);
    }

    #[test]
    fn test_local_winner() {
        let mut seat = Seat::new(PlayerId::new("me"), "Me", "#000000");
        for card in cards(3) {
            seat.receive(card);
        }

        let victory = check_for_winner(&seat, &PlayerRoster::new(), 3).unwrap();
        assert!(victory.is_winner(&PlayerId::new("me")));
        assert_eq!(victory.played_cards, 3);
    }

    #[test]
    fn test_opponent_winner() {
        let seat = Seat::new(PlayerId::new("me"), "Me", "#000000");
        let mut roster = PlayerRoster::new();
        roster.add(ConnectedPlayer::new("a".into(), "Alice", "#000000"));
        let mut bob = ConnectedPlayer::new("b".into(), "Bob", "#000000");
        bob.played_cards = cards(10);
        roster.add(bob);

        let victory = check_for_winner(&seat, &roster, 10).unwrap();
        assert_eq!(victory.winner, PlayerId::new("b"));
        assert_eq!(victory.name, "Bob");
    }
}

//! Property tests for deck draws and turn rotation.

use peer_cards::{Card, CardKind, Deck, GameRng, PlayerId, Removal, TurnOrder};
use proptest::prelude::*;
use rustc_hash::FxHashSet;

fn deck_of(size: usize) -> Deck {
    (0..size)
        .map(|i| Card::new(format!("main-1-{i}"), CardKind::Main, "x.png", 1, "Card 1"))
        .collect()
}

fn order_of(len: usize) -> Vec<PlayerId> {
    (0..len).map(|i| PlayerId::new(format!("p{i}"))).collect()
}

proptest! {
    /// N draws from a deck of N give N distinct cards, then nothing.
    #[test]
    fn prop_draws_exhaust_deck(size in 0usize..60, seed in any::<u64>()) {
        let mut deck = deck_of(size);
        let mut rng = GameRng::new(seed);

        let drawn: FxHashSet<_> = (0..size)
            .map(|_| deck.draw_random(&mut rng).map(|c| c.id))
            .collect::<Option<_>>()
            .unwrap();

        prop_assert_eq!(drawn.len(), size);
        prop_assert!(deck.is_empty());
        prop_assert!(deck.draw_random(&mut rng).is_none());
    }

    /// Advancing always lands on a member and wraps from last to first.
    #[test]
    fn prop_advance_wraps(len in 1usize..8, steps in 0usize..40) {
        let order = order_of(len);
        let mut turn = TurnOrder::new(order.clone());

        for step in 1..=steps {
            let current = turn.advance().cloned().unwrap();
            prop_assert!(turn.contains(&current));
            prop_assert_eq!(&current, &order[step % len]);
        }
    }

    /// Removing anyone but the current player leaves the turn alone.
    #[test]
    fn prop_remove_non_current(len in 2usize..8, start in 0usize..8, victim in 0usize..8) {
        let order = order_of(len);
        let start = start % len;
        let victim = victim % len;
        prop_assume!(start != victim);

        let mut turn = TurnOrder::from_parts(order.clone(), order[start].clone());
        prop_assert_eq!(turn.remove(&order[victim]), Removal::Removed);
        prop_assert_eq!(turn.current(), Some(&order[start]));
        prop_assert_eq!(turn.len(), len - 1);
    }

    /// Removing the current player restarts the turn at the first remaining player.
    #[test]
    fn prop_remove_current(len in 2usize..8, start in 0usize..8) {
        let order = order_of(len);
        let start = start % len;

        let mut turn = TurnOrder::from_parts(order.clone(), order[start].clone());
        prop_assert_eq!(turn.remove(&order[start]), Removal::RemovedCurrent);
        let first = if start == 0 { &order[1] } else { &order[0] };
        prop_assert_eq!(turn.current(), Some(first));
        prop_assert!(!turn.contains(&order[start]));
    }
}

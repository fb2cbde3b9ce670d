//! Turn order and the per-participant turn state machine.
//!
//! ## TurnOrder
//!
//! Ordered player ids plus the current turn. Uses an `im` vector so the
//! order can be cloned into outgoing messages and views cheaply.
//!
//! ## TurnPhase
//!
//! `NotStarted -> WaitingForTurn | MyTurn` when the game starts or the
//! order is replaced, then `WaitingForTurn <-> MyTurn` as `turn_update`s
//! arrive. There is no terminal phase.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// What happened when a player was removed from the order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Removal {
    NotPresent,
    /// Removed; the current turn is unchanged.
    Removed,
    /// Removed the current player; the turn advanced once beforehand.
    RemovedCurrent,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOrder {
    order: Vector<PlayerId>,
    current: Option<PlayerId>,
}

impl TurnOrder {
    /// Start a new order; the first player holds the turn.
    #[must_use]
    pub fn new(order: impl IntoIterator<Item = PlayerId>) -> Self {
        let order: Vector<PlayerId> = order.into_iter().collect();
        let current = order.front().cloned();
        Self { order, current }
    }

    /// Rebuild an order as received from the host, without validation.
    #[must_use]
    pub fn from_parts(order: impl IntoIterator<Item = PlayerId>, current: PlayerId) -> Self {
        Self {
            order: order.into_iter().collect(),
            current: Some(current),
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&PlayerId> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn is_current(&self, player: &PlayerId) -> bool {
        self.current.as_ref() == Some(player)
    }

    /// Overwrite the current turn as announced by the host.
    pub fn set_current(&mut self, player: PlayerId) {
        self.current = Some(player);
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerId> {
        self.order.iter()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<PlayerId> {
        self.order.iter().cloned().collect()
    }

    #[must_use]
    pub fn contains(&self, player: &PlayerId) -> bool {
        self.order.contains(player)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Move the turn to the next player, wrapping around.
    ///
    /// A current turn missing from the order restarts at the first player.
    pub fn advance(&mut self) -> Option<&PlayerId> {
        if self.order.is_empty() {
            self.current = None;
            return None;
        }
        let next = self
            .current
            .as_ref()
            .and_then(|c| self.order.index_of(c))
            .map_or(0, |i| (i + 1) % self.order.len());
        self.current = self.order.get(next).cloned();
        self.current.as_ref()
    }

    /// Remove a player. If they held the turn, it advances once from the
    /// now-missing id, which restarts at the first player (the host).
    pub fn remove(&mut self, player: &PlayerId) -> Removal {
        let Some(index) = self.order.index_of(player) else {
            return Removal::NotPresent;
        };
        self.order.remove(index);

        if !self.is_current(player) {
            return Removal::Removed;
        }
        self.advance();
        Removal::RemovedCurrent
    }
}

/// Where a participant stands in the turn cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    NotStarted,
    WaitingForTurn,
    MyTurn,
}

impl TurnPhase {
    /// Phase of `me` given the game flag and replicated turn order.
    #[must_use]
    pub fn of(started: bool, turn: &TurnOrder, me: &PlayerId) -> Self {
        if !started {
            TurnPhase::NotStarted
        } else if turn.is_current(me) {
            TurnPhase::MyTurn
        } else {
            TurnPhase::WaitingForTurn
        }
    }
}

//! Player identification and the host's roster of connected players.
//!
//! ## PlayerId
//!
//! Opaque string identifier. Peer ids are assigned by the transport, and
//! the host's id is its game code, so the engine never interprets them.
//!
//! ## PlayerRoster
//!
//! Join-ordered list of `ConnectedPlayer` records. Everything stored here
//! besides the id is advisory: it is only as fresh as the last broadcast.

use serde::{Deserialize, Serialize};

use crate::cards::Card;

/// Opaque player identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PlayerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A remote participant as seen from the local session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedPlayer {
    pub id: PlayerId,
    pub name: String,
    /// Display color, `#RRGGBB`.
    pub color: String,
    /// Last-known hand size. Not ground truth.
    pub hand_size: usize,
    /// Last-known played cards, replaced on each `card_played`.
    pub played_cards: Vec<Card>,
}

impl ConnectedPlayer {
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            hand_size: 0,
            played_cards: Vec::new(),
        }
    }
}

/// Join-ordered collection of connected players.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerRoster {
    players: Vec<ConnectedPlayer>,
}

impl PlayerRoster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a player unless one with the same id is already present.
    ///
    /// Returns true if the player was added.
    pub fn add(&mut self, player: ConnectedPlayer) -> bool {
        if self.contains(&player.id) {
            return false;
        }
        self.players.push(player);
        true
    }

    /// Remove a player, returning its record.
    pub fn remove(&mut self, id: &PlayerId) -> Option<ConnectedPlayer> {
        let pos = self.players.iter().position(|p| &p.id == id)?;
        Some(self.players.remove(pos))
    }

    #[must_use]
    pub fn contains(&self, id: &PlayerId) -> bool {
        self.players.iter().any(|p| &p.id == id)
    }

    #[must_use]
    pub fn get(&self, id: &PlayerId) -> Option<&ConnectedPlayer> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn get_mut(&mut self, id: &PlayerId) -> Option<&mut ConnectedPlayer> {
        self.players.iter_mut().find(|p| &p.id == id)
    }

    /// Get a player, adding one built by `make` if absent.
    pub fn get_or_insert_with(
        &mut self,
        id: &PlayerId,
        make: impl FnOnce() -> ConnectedPlayer,
    ) -> &mut ConnectedPlayer {
        let pos = match self.players.iter().position(|p| &p.id == id) {
            Some(pos) => pos,
            None => {
                self.players.push(make());
                self.players.len() - 1
            }
        };
        &mut self.players[pos]
    }

    /// Keep only players matching `keep`.
    pub fn retain(&mut self, keep: impl FnMut(&ConnectedPlayer) -> bool) {
        self.players.retain(keep);
    }

    /// Display name for a player, or `"Unknown Player"`.
    #[must_use]
    pub fn name_of(&self, id: &PlayerId) -> &str {
        self.get(id).map_or("Unknown Player", |p| p.name.as_str())
    }

    /// Record a new advisory hand size. Unknown players are ignored.
    pub fn set_hand_size(&mut self, id: &PlayerId, size: usize) {
        if let Some(player) = self.get_mut(id) {
            player.hand_size = size;
        }
    }

    /// Iterate in join order.
    pub fn iter(&self) -> impl Iterator<Item = &ConnectedPlayer> {
        self.players.iter()
    }

    /// Player ids in join order.
    pub fn ids(&self) -> impl Iterator<Item = &PlayerId> {
        self.players.iter().map(|p| &p.id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_basics() {
        let id = PlayerId::new("player_42");
        assert_eq!(id.as_str(), "player_42");
        assert_eq!(format!("{}", id), "player_42");
        assert_eq!(PlayerId::from("player_42"), id);
    }

    #[test]
    fn test_player_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&PlayerId::new("123")).unwrap();
        assert_eq!(json, "\"123\"");
    }

    #[test]
    fn test_roster_rejects_duplicates() {
        let mut roster = PlayerRoster::new();
        assert!(roster.add(ConnectedPlayer::new("a".into(), "Alice", "#ff0000")));
        assert!(!roster.add(ConnectedPlayer::new("a".into(), "Alias", "#00ff00")));

        assert_eq!(roster.len(), 1);
        assert_eq!(roster.name_of(&"a".into()), "Alice");
    }

    #[test]
    fn test_roster_keeps_join_order() {
        let mut roster = PlayerRoster::new();
        roster.add(ConnectedPlayer::new("b".into(), "Bob", "#000000"));
        roster.add(ConnectedPlayer::new("a".into(), "Alice", "#000000"));
        roster.add(ConnectedPlayer::new("c".into(), "Carol", "#000000"));

        let ids: Vec<_> = roster.ids().map(PlayerId::as_str).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);

        let removed = roster.remove(&"a".into()).unwrap();
        assert_eq!(removed.name, "Alice");
        let ids: Vec<_> = roster.ids().map(PlayerId::as_str).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_roster_get_or_insert() {
        let mut roster = PlayerRoster::new();
        roster.get_or_insert_with(&"a".into(), || ConnectedPlayer::new("a".into(), "a", "#000000"))
            .hand_size = 3;
        roster.get_or_insert_with(&"a".into(), || ConnectedPlayer::new("a".into(), "dup", "#000000"))
            .hand_size += 1;

        assert_eq!(roster.len(), 1);
        assert_eq!(roster.get(&"a".into()).unwrap().hand_size, 4);
        assert_eq!(roster.name_of(&"a".into()), "a");
    }

    #[test]
    fn test_roster_hand_size_is_advisory() {
        let mut roster = PlayerRoster::new();
        roster.add(ConnectedPlayer::new("a".into(), "Alice", "#000000"));

        roster.set_hand_size(&"a".into(), 4);
        roster.set_hand_size(&"ghost".into(), 9);

        assert_eq!(roster.get(&"a".into()).unwrap().hand_size, 4);
        assert_eq!(roster.name_of(&"ghost".into()), "Unknown Player");
    }
}

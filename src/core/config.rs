//! Session configuration.
//!
//! Hosts configure decks, deal sizes and the win threshold at startup.
//! All fields have defaults matching the standard game, so a partial JSON
//! document is a valid configuration.

use serde::{Deserialize, Serialize};

use super::error::ProtocolError;

/// How a targeted player answers a `take_card_request`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TakeCardPolicy {
    /// Only surrender a card actually present in the played area.
    #[default]
    Validate,
    /// Fabricate a stand-in card with the requested id, whether or not the
    /// target holds it.
    Placeholder,
}

/// Complete session configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Main cards dealt to each player at game start.
    pub hand_size: usize,

    /// Special cards dealt face up to the shared area.
    pub special_slots: usize,

    /// Played cards needed to win.
    pub win_played_cards: usize,

    /// Distinct main card types (values 1..=n).
    pub main_card_types: u32,

    /// Copies of each main card type.
    pub main_copies_per_type: u32,

    /// Cards in the special deck.
    pub special_card_count: u32,

    /// Image directory for main cards, with trailing slash.
    pub main_image_root: String,

    /// Image directory for special cards, with trailing slash.
    pub special_image_root: String,

    pub take_card_policy: TakeCardPolicy,

    /// Fixed RNG seed. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            hand_size: 5,
            special_slots: 3,
            win_played_cards: 10,
            main_card_types: 5,
            main_copies_per_type: 5,
            special_card_count: 5,
            main_image_root: "images/main_cards/".to_string(),
            special_image_root: "images/special_cards/".to_string(),
            take_card_policy: TakeCardPolicy::default(),
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_hand_size(mut self, size: usize) -> Self {
        self.hand_size = size;
        self
    }

    #[must_use]
    pub fn with_special_slots(mut self, slots: usize) -> Self {
        self.special_slots = slots;
        self
    }

    #[must_use]
    pub fn with_win_played_cards(mut self, count: usize) -> Self {
        self.win_played_cards = count;
        self
    }

    /// Set the main deck shape: `types` values with `copies` each.
    #[must_use]
    pub fn with_main_deck(mut self, types: u32, copies: u32) -> Self {
        self.main_card_types = types;
        self.main_copies_per_type = copies;
        self
    }

    #[must_use]
    pub fn with_special_card_count(mut self, count: u32) -> Self {
        self.special_card_count = count;
        self
    }

    #[must_use]
    pub fn with_take_card_policy(mut self, policy: TakeCardPolicy) -> Self {
        self.take_card_policy = policy;
        self
    }

    /// Fix the RNG seed for reproducible sessions.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Size of the main deck this configuration builds.
    #[must_use]
    pub fn main_deck_size(&self) -> usize {
        self.main_card_types as usize * self.main_copies_per_type as usize
    }
}

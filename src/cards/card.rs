//! Card values.
//!
//! A `Card` is immutable once created and travels over the wire in full,
//! including to players who should not see it.

use serde::{Deserialize, Serialize};

/// Card identifier, unique within its deck (e.g. `main-3-1`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    /// Create a new card ID.
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

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Which deck a card belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    Main,
    Special,
}

/// A single card.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,

    #[serde(rename = "type")]
    pub kind: CardKind,

    /// Image path, resolved by the UI layer.
    pub image_url: String,

    pub value: u32,

    pub name: String,

    pub description: String,
}

impl Card {
    /// Create a card with an empty description.
    #[must_use]
    pub fn new(
        id: impl Into<CardId>,
        kind: CardKind,
        image_url: impl Into<String>,
        value: u32,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            image_url: image_url.into(),
            value,
            name: name.into(),
            description: String::new(),
        }
    }

    /// Set the description (builder pattern).
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn is_special(&self) -> bool {
        self.kind == CardKind::Special
    }

    /// Stand-in card answered to a take request under
    /// [`TakeCardPolicy::Placeholder`](crate::core::TakeCardPolicy).
    #[must_use]
    pub fn placeholder(id: CardId, image_root: &str) -> Self {
        Self {
            id,
            kind: CardKind::Main,
            image_url: format!("{image_root}card_1.png"),
            value: 1,
            name: "Taken Card".to_string(),
            description: "This card was taken from another player".to_string(),
        }
    }
}

impl From<String> for CardId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

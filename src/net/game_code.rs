//! Game codes.
//!
//! A game code is a 3-digit number chosen by the host and used as the
//! host's peer id, so joining a game means connecting to that id.
//! Collisions between hosts are not handled.

use serde::{Deserialize, Serialize};

use crate::core::{GameRng, PlayerId, TransportError};

const MIN_CODE: u32 = 100;
const MAX_CODE: u32 = 999;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameCode(String);

impl GameCode {
    /// Pick a random code in `100..=999`.
    pub fn generate(rng: &mut GameRng) -> Self {
        Self(rng.gen_range(MIN_CODE..=MAX_CODE).to_string())
    }

    /// Validate user input. Surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Result<Self, TransportError> {
        let trimmed = input.trim();
        let valid = trimmed.len() == 3
            && trimmed.bytes().all(|b| b.is_ascii_digit())
            && !trimmed.starts_with('0');
        if valid {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(TransportError::InvalidCode(input.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The peer id the host registers under.
    #[must_use]
    pub fn peer_id(&self) -> PlayerId {
        PlayerId::new(self.0.clone())
    }
}

impl std::fmt::Display for GameCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

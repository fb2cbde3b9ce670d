//! Message protocol between host and clients.
//!
//! - `message`: The closed `Message` union
//! - `codec`: JSON text frames

pub mod message;
pub mod codec;

pub use message::{Message, SpecialCards, PROTOCOL_VERSION};
pub use codec::{decode, encode};

//! Match data model.
//!
//! A [`Game`] owns its [`Player`]s, each player owns up to two [`Hybrid`]s,
//! and each hybrid owns copies of the catalog [`Entity`] records it was fused
//! from. The engine mutates these values in place; the runtime persists the
//! whole aggregate.
pub mod entity;
pub mod game;
pub mod hybrid;
pub mod player;

pub use entity::{Entity, EntityId};
pub use game::{Game, GameId, GameStatus, Phase};
pub use hybrid::{CombatStats, Hybrid, RoundModifiers};
pub use player::{PendingAction, Player};

//! In-memory repository implementations.
mod entity;
mod game;
mod stats;

pub use entity::InMemoryEntityRepo;
pub use game::{Claim, InMemoryGameRepo};
pub use stats::InMemoryStatsRepo;

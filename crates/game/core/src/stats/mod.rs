//! Effective stat computation.
//!
//! Live stats on a [`Hybrid`](crate::state::Hybrid) are the post-fatigue,
//! post-damage values. The functions here layer the round's timed modifiers
//! on top without mutating anything.
pub mod modifiers;

pub use modifiers::{effective_agility, effective_attack, effective_defense, scale_down, scale_up};

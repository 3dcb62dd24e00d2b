//! Damage resolution.
//!
//! Pure arithmetic shared by every strike variant; the engine supplies the
//! effective attack and defense and applies the result.
pub mod damage;

pub use damage::{DamageOutcome, DamageRoll, apply_damage, calculate_damage};

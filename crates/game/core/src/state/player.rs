use strum::{AsRefStr, Display, EnumString};

use super::entity::EntityId;
use super::hybrid::Hybrid;

/// Action a player has queued for the current round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PendingAction {
    #[default]
    None,
    BasicAttack,
    Defend,
    Ability,
    Rest,
    Skip,
}

/// Seat at a game table, identified by email.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    pub email: String,
    pub display_name: String,
    pub hybrids: Vec<Hybrid>,
    pub has_created: bool,
    pub has_submitted_action: bool,
    pub pending_action: PendingAction,
    pub pending_entity: Option<EntityId>,
}

impl Player {
    pub fn new(email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            display_name: display_name.into(),
            ..Self::default()
        }
    }

    /// Index of the hybrid currently fighting.
    pub fn active_index(&self) -> Option<usize> {
        self.hybrids.iter().position(Hybrid::is_fighting)
    }

    pub fn active_hybrid(&self) -> Option<&Hybrid> {
        self.hybrids.iter().find(|h| h.is_fighting())
    }

    pub fn active_hybrid_mut(&mut self) -> Option<&mut Hybrid> {
        self.hybrids.iter_mut().find(|h| h.is_fighting())
    }

    /// True once the player owns hybrids and every one of them is defeated.
    pub fn is_wiped_out(&self) -> bool {
        !self.hybrids.is_empty() && self.hybrids.iter().all(|h| h.is_defeated)
    }

    pub fn submit(&mut self, action: PendingAction, entity: Option<EntityId>) {
        self.pending_action = action;
        self.pending_entity = entity;
        self.has_submitted_action = true;
    }

    pub fn clear_submission(&mut self) {
        self.has_submitted_action = false;
        self.pending_action = PendingAction::None;
        self.pending_entity = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn pending_action_names_are_snake_case() {
        assert_eq!(PendingAction::BasicAttack.as_ref(), "basic_attack");
        assert_eq!(PendingAction::from_str("rest").ok(), Some(PendingAction::Rest));
        assert!(PendingAction::from_str("dance").is_err());
    }

    #[test]
    fn wiped_out_requires_hybrids() {
        let mut player = Player::new("a@example.com", "A");
        assert!(!player.is_wiped_out());
        player.hybrids.push(Hybrid {
            is_defeated: true,
            ..Hybrid::default()
        });
        assert!(player.is_wiped_out());
    }
}

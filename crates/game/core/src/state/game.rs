use chrono::{DateTime, Utc};
use strum::{AsRefStr, Display, EnumString};

use super::player::Player;

/// Storage-assigned game identifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct GameId(pub u64);

impl core::fmt::Display for GameId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GameStatus {
    #[default]
    WaitingForPlayers,
    /// Names and images are being generated.
    Starting,
    InProgress,
    Finished,
    /// Match start failed; terminal.
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Phase {
    Planning,
    Resolving,
    Resolved,
}

/// Match aggregate. Storage replaces it wholesale on every update.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Game {
    pub id: GameId,
    pub name: String,
    pub join_code: String,
    pub status: GameStatus,
    pub phase: Option<Phase>,
    pub round_count: u32,
    pub turn_number: u32,
    /// Display name of the winner; `None` for no-contest endings.
    pub winner: Option<String>,
    pub message: String,
    pub last_round_summary: String,
    pub action_deadline: Option<DateTime<Utc>>,
    /// Set once lifetime stats reflect this game.
    pub stats_counted: bool,
    pub players: Vec<Player>,
}

impl Game {
    pub fn new(name: impl Into<String>, join_code: impl Into<String>, host: Player) -> Self {
        Self {
            name: name.into(),
            join_code: join_code.into(),
            message: "Waiting for an opponent.".to_owned(),
            players: vec![host],
            ..Self::default()
        }
    }

    pub fn player_index(&self, email: &str) -> Option<usize> {
        self.players.iter().position(|p| p.email == email)
    }

    pub fn player(&self, email: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.email == email)
    }

    pub fn player_mut(&mut self, email: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.email == email)
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == GameStatus::InProgress
    }

    pub fn is_planning(&self) -> bool {
        self.phase == Some(Phase::Planning)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, GameStatus::Finished | GameStatus::Error)
    }

    pub fn both_submitted(&self) -> bool {
        self.players.len() == 2 && self.players.iter().all(|p| p.has_submitted_action)
    }

    pub fn clear_submissions(&mut self) {
        for player in &mut self.players {
            player.clear_submission();
        }
    }

    /// True when a deadline is armed and `now` has passed it.
    pub fn deadline_elapsed(&self, now: DateTime<Utc>) -> bool {
        self.action_deadline.is_some_and(|deadline| deadline < now)
    }
}

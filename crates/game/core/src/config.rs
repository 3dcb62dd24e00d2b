/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Vigor granted to every hybrid whose base vigor is unset when a match begins.
    pub starting_vigor: i32,
}

impl GameConfig {
    // ===== compile-time constants =====
    /// Players seated at a table.
    pub const PLAYERS_PER_GAME: usize = 2;
    /// Hybrids each player assembles before the match.
    pub const HYBRIDS_PER_PLAYER: usize = 2;
    pub const MIN_ENTITIES_PER_HYBRID: usize = 2;
    pub const MAX_ENTITIES_PER_HYBRID: usize = 3;
    /// Hybrid energy is clamped into this range at creation.
    pub const MIN_HYBRID_ENERGY: i32 = 1;
    pub const MAX_HYBRID_ENERGY: i32 = 3;

    pub const REST_VIGOR_GAIN: i32 = 2;
    pub const REST_ENERGY_GAIN: i32 = 2;
    /// Energy every active hybrid regains at the start of a round.
    pub const ROUND_ENERGY_GAIN: i32 = 1;

    /// Damage never drops below this after attack minus defense.
    pub const MIN_DAMAGE: i32 = 1;
    /// Defend stance multiplies defense by 3/2.
    pub const DEFEND_NUMERATOR: i32 = 3;
    pub const DEFEND_DENOMINATOR: i32 = 2;
    /// Vulnerable targets take 5/4 damage, rounded up.
    pub const VULNERABLE_NUMERATOR: i32 = 5;
    pub const VULNERABLE_DENOMINATOR: i32 = 4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_STARTING_VIGOR: i32 = 3;

    pub fn new() -> Self {
        Self {
            starting_vigor: Self::DEFAULT_STARTING_VIGOR,
        }
    }

    pub fn with_starting_vigor(starting_vigor: i32) -> Self {
        Self { starting_vigor }
    }

    /// Defense lost to fatigue at the start of `round`.
    ///
    /// Rounds 1-2 are free, round 3 costs 1, round 4 costs 2, and every later
    /// round costs 3.
    pub const fn fatigue_penalty(round: u32) -> i32 {
        match round {
            0..=2 => 0,
            3 => 1,
            4 => 2,
            _ => 3,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

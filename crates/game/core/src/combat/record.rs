//! Round-by-round match records and the derived summary.

use std::ops::{Index, IndexMut};

use strum::{Display, IntoStaticStr};

/// The two sides of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub const fn other(self) -> Self {
        match self {
            Self::Player => Self::Opponent,
            Self::Opponent => Self::Player,
        }
    }
}

/// One value per side.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerSide<T> {
    pub player: T,
    pub opponent: T,
}

impl<T> PerSide<T> {
    pub const fn new(player: T, opponent: T) -> Self {
        Self { player, opponent }
    }

    /// Mutable access to `side` and its opponent at once.
    pub fn pair_mut(&mut self, side: Side) -> (&mut T, &mut T) {
        match side {
            Side::Player => (&mut self.player, &mut self.opponent),
            Side::Opponent => (&mut self.opponent, &mut self.player),
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> PerSide<U> {
        PerSide {
            player: f(self.player),
            opponent: f(self.opponent),
        }
    }
}

impl<T> Index<Side> for PerSide<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }
}

impl<T> IndexMut<Side> for PerSide<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Player => &mut self.player,
            Side::Opponent => &mut self.opponent,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoundPhase {
    Normal,
    SuddenDeath,
}

/// One attack resolution inside an action.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubHitRecord {
    pub hit: bool,
    pub crit: bool,
    pub blocked: bool,
    /// HP damage dealt, flat elemental included.
    pub damage: f64,
    pub ward_absorbed: f64,
}

/// What one side did in a round.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionRecord {
    /// Skill name, "Basic Attack" or "Stunned".
    pub label: String,
    pub hit: bool,
    pub crit: bool,
    pub blocked: bool,
    pub damage: f64,
    pub ward_absorbed: f64,
    pub sub_hits: Vec<SubHitRecord>,
}

impl ActionRecord {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn push(&mut self, sub_hit: SubHitRecord) {
        self.hit |= sub_hit.hit;
        self.crit |= sub_hit.crit;
        self.blocked |= sub_hit.blocked;
        self.damage += sub_hit.damage;
        self.ward_absorbed += sub_hit.ward_absorbed;
        self.sub_hits.push(sub_hit);
    }
}

/// Immutable record of one round.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundRecord {
    pub round: u32,
    pub phase: RoundPhase,
    pub actions: PerSide<Option<ActionRecord>>,
    /// DOT damage taken.
    pub dot_damage: PerSide<f64>,
    pub sudden_death_damage: PerSide<f64>,
    /// HP remaining after the round.
    pub hp: PerSide<f64>,
    pub events: Vec<String>,
}

impl RoundRecord {
    pub fn new(round: u32, phase: RoundPhase) -> Self {
        Self {
            round,
            phase,
            actions: PerSide::default(),
            dot_damage: PerSide::default(),
            sudden_death_damage: PerSide::default(),
            hp: PerSide::default(),
            events: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MatchOutcome {
    PlayerVictory,
    OpponentVictory,
    DoubleKnockout,
    Timeout,
}

/// Result of a completed match.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchResult {
    pub outcome: MatchOutcome,
    /// The player won.
    pub victory: bool,
    pub total_rounds: u32,
    pub was_sudden_death: bool,
    /// Escalation stacks reached in the last sudden death round.
    pub sudden_death_stacks: u32,
    pub rounds: Vec<RoundRecord>,
}

impl MatchResult {
    /// Per-side totals, derived from the round records.
    pub fn summary(&self) -> MatchSummary {
        let mut summary = MatchSummary::default();
        for round in &self.rounds {
            for side in [Side::Player, Side::Opponent] {
                summary[side].dot_damage_taken += round.dot_damage[side];
                summary[side].sudden_death_damage_taken += round.sudden_death_damage[side];

                let Some(action) = &round.actions[side] else {
                    continue;
                };
                summary[side].damage_dealt += action.damage;
                for sub_hit in &action.sub_hits {
                    let own = &mut summary[side];
                    if sub_hit.hit {
                        own.hits += 1;
                    } else {
                        own.misses += 1;
                    }
                    if sub_hit.crit {
                        own.crits += 1;
                    }
                    let defender = &mut summary[side.other()];
                    if sub_hit.blocked {
                        defender.blocks += 1;
                    }
                    defender.ward_absorbed += sub_hit.ward_absorbed;
                }
            }
        }
        summary
    }

    /// SHA-256 over the bincode-encoded rounds, for replay verification.
    #[cfg(feature = "serde")]
    pub fn digest(&self) -> [u8; 32] {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        for round in &self.rounds {
            let bytes = bincode::serialize(round).expect("round record serialization should not fail");
            hasher.update(&bytes);
        }
        hasher.finalize().into()
    }
}

/// Totals for one side.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SideSummary {
    /// Action damage dealt to HP.
    pub damage_dealt: f64,
    pub crits: u32,
    pub hits: u32,
    pub misses: u32,
    /// Incoming hits this side blocked.
    pub blocks: u32,
    /// Incoming hit damage this side's ward absorbed.
    pub ward_absorbed: f64,
    pub dot_damage_taken: f64,
    pub sudden_death_damage_taken: f64,
}

pub type MatchSummary = PerSide<SideSummary>;

#[cfg(test)]
mod tests {
    use super::*;

    fn round(n: u32, player_damage: f64, crit: bool) -> RoundRecord {
        let mut record = RoundRecord::new(n, RoundPhase::Normal);
        let mut action = ActionRecord::new("Basic Attack");
        action.push(SubHitRecord {
            hit: true,
            crit,
            damage: player_damage,
            ..SubHitRecord::default()
        });
        record.actions.player = Some(action);
        let mut missed = ActionRecord::new("Basic Attack");
        missed.push(SubHitRecord::default());
        record.actions.opponent = Some(missed);
        record.dot_damage.opponent = 1.5;
        record
    }

    #[test]
    fn summary_sums_rounds() {
        let result = MatchResult {
            outcome: MatchOutcome::PlayerVictory,
            victory: true,
            total_rounds: 2,
            was_sudden_death: false,
            sudden_death_stacks: 0,
            rounds: vec![round(1, 10.0, true), round(2, 12.5, false)],
        };
        let summary = result.summary();
        assert_eq!(summary.player.damage_dealt, 22.5);
        assert_eq!(summary.player.hits, 2);
        assert_eq!(summary.player.crits, 1);
        assert_eq!(summary.opponent.misses, 2);
        assert_eq!(summary.opponent.dot_damage_taken, 3.0);
        assert_eq!(summary[Side::Opponent].damage_dealt, 0.0);
    }
}

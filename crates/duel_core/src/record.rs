//! Battle records for deterministic replay.
//!
//! A record stores the catalog, the player creation rules, both combatants'
//! starting stats, and the stream of turn commands. Because resolution is
//! deterministic, replaying the commands against rebuilt units reproduces the
//! battle exactly. The player is rebuilt through the roster, so a record whose
//! player breaks its rules fails to replay. Skills learned outside the catalog
//! loadouts are not captured.
//!
//! The stored outcome hash comes from [`BattleField::state_hash`], which uses
//! the standard library's `DefaultHasher`. Its algorithm is not guaranteed
//! across Rust releases, so records are only portable between builds made
//! with the same toolchain.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::battlefield::{BattleField, Side};
use crate::catalog::SkillCatalog;
use crate::error::{BattleError, Result};
use crate::roster::{self, CreationRules};
use crate::unit::{Unit, UnitSpec};

/// Record format version for compatibility.
pub const RECORD_VERSION: u32 = 2;

/// Starting stats of one combatant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedUnit {
    /// Unit name.
    pub name: String,
    /// Maximum health.
    pub max_hp: u32,
    /// Maximum mana, if any.
    pub max_mp: Option<u32>,
}

impl RecordedUnit {
    /// Capture a unit's maxima.
    #[must_use]
    pub fn capture(unit: &Unit) -> Self {
        let status = unit.status();
        Self {
            name: status.name,
            max_hp: status.max_hp,
            max_mp: status.max_mp,
        }
    }

    fn spec(&self) -> UnitSpec {
        UnitSpec {
            name: self.name.clone(),
            hp: self.max_hp.into(),
            mp: self.max_mp.map(Into::into),
        }
    }
}

/// Skills chosen by both sides for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnCommand {
    /// Skill the player used.
    pub player_skill: String,
    /// Skill the enemy was told to use.
    pub enemy_skill: String,
}

/// How the recorded battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedOutcome {
    /// Winner, if the battle was decided.
    pub winner: Option<Side>,
    /// Turn counter at the end.
    pub final_turn: u32,
    /// Final state hash for verification.
    pub final_hash: u64,
}

/// Complete battle record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleRecord {
    /// Record format version.
    pub version: u32,
    /// Catalog the units were built from.
    pub catalog: SkillCatalog,
    /// Rules the player was created under.
    pub rules: CreationRules,
    /// Player at battle start.
    pub player: RecordedUnit,
    /// Enemy at battle start.
    pub enemy: RecordedUnit,
    /// Commands in turn order.
    pub turns: Vec<TurnCommand>,
    /// Set by [`BattleRecord::finalize`].
    pub outcome: Option<RecordedOutcome>,
}

impl BattleRecord {
    /// Start a record for two freshly built units, assuming the default
    /// creation rules.
    #[must_use]
    pub fn new(catalog: &SkillCatalog, player: &Unit, enemy: &Unit) -> Self {
        Self {
            version: RECORD_VERSION,
            catalog: catalog.clone(),
            rules: CreationRules::default(),
            player: RecordedUnit::capture(player),
            enemy: RecordedUnit::capture(enemy),
            turns: Vec::new(),
            outcome: None,
        }
    }

    /// Replace the creation rules the player is rebuilt under.
    #[must_use]
    pub fn with_rules(mut self, rules: CreationRules) -> Self {
        self.rules = rules;
        self
    }

    /// Append a turn that was processed successfully.
    pub fn record_turn(&mut self, player_skill: impl Into<String>, enemy_skill: impl Into<String>) {
        self.turns.push(TurnCommand {
            player_skill: player_skill.into(),
            enemy_skill: enemy_skill.into(),
        });
    }

    /// Store the end state of `field`.
    pub fn finalize(&mut self, field: &BattleField) {
        self.outcome = Some(RecordedOutcome {
            winner: field.winner_side(),
            final_turn: field.turn(),
            final_hash: field.state_hash(),
        });
    }

    /// Encode with bincode.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| BattleError::InvalidState(format!("Failed to serialize record: {e}")))
    }

    /// Decode from bincode, checking the format version.
    ///
    /// # Errors
    /// Returns an error if deserialization fails or the version differs.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let record: Self = bincode::deserialize(bytes)
            .map_err(|e| BattleError::InvalidState(format!("Failed to deserialize record: {e}")))?;

        if record.version != RECORD_VERSION {
            return Err(BattleError::InvalidState(format!(
                "Record version mismatch: expected {}, got {}",
                RECORD_VERSION, record.version
            )));
        }
        Ok(record)
    }

    /// Save the record to a file.
    ///
    /// # Errors
    /// Returns an error if serialization or file writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path.as_ref(), bytes)
            .map_err(|e| BattleError::InvalidState(format!("Failed to write record file: {e}")))
    }

    /// Load a record from a file.
    ///
    /// # Errors
    /// Returns an error if file reading or decoding fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())
            .map_err(|e| BattleError::InvalidState(format!("Failed to read record file: {e}")))?;
        Self::from_bytes(&bytes)
    }

    /// Rebuild the units and run every recorded turn.
    ///
    /// # Errors
    /// Returns a roster error if the recorded player breaks `rules`, any
    /// error raised while replaying, or
    /// [`BattleError::InvalidState`] if the result differs from the stored
    /// outcome.
    pub fn replay(&self) -> Result<BattleField> {
        let player = roster::player_with(&self.rules, &self.catalog, self.player.spec())?;
        let enemy = roster::monster_with(&self.catalog, self.enemy.spec())?;

        let mut field = BattleField::new(player)?;
        field.set_enemy(enemy)?;
        for command in &self.turns {
            field.process_turn(&command.player_skill, &command.enemy_skill)?;
        }

        if let Some(expected) = self.outcome {
            let actual_hash = field.state_hash();
            if field.winner_side() != expected.winner
                || field.turn() != expected.final_turn
                || actual_hash != expected.final_hash
            {
                return Err(BattleError::InvalidState(format!(
                    "Replay diverged: expected {:?} at turn {} (hash {}), got {:?} at turn {} (hash {})",
                    expected.winner,
                    expected.final_turn,
                    expected.final_hash,
                    field.winner_side(),
                    field.turn(),
                    actual_hash
                )));
            }
        }

        tracing::debug!(turns = self.turns.len(), "Replay verified");
        Ok(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BASIC_ATTACK, MAGIC_ATTACK};
    use crate::roster;

    fn played_record() -> (BattleRecord, BattleField) {
        let catalog = SkillCatalog::builtin();
        let player = roster::player("용사", 120, 80).unwrap();
        let enemy = roster::monster("슬라임", 50).unwrap();
        let mut record = BattleRecord::new(&catalog, &player, &enemy);

        let mut field = BattleField::new(player).unwrap();
        field.set_enemy(enemy).unwrap();
        for (p, e) in [
            (MAGIC_ATTACK, BASIC_ATTACK),
            (BASIC_ATTACK, BASIC_ATTACK),
            (BASIC_ATTACK, BASIC_ATTACK),
        ] {
            field.process_turn(p, e).unwrap();
            record.record_turn(p, e);
        }
        record.finalize(&field);
        (record, field)
    }

    #[test]
    fn test_replay_reproduces_battle() {
        let (record, field) = played_record();
        assert_eq!(field.winner_side(), Some(Side::Player));

        let replayed = record.replay().unwrap();
        assert_eq!(replayed.state_hash(), field.state_hash());
    }

    #[test]
    fn test_bytes_survive_encoding() {
        let (record, _) = played_record();
        let decoded = BattleRecord::from_bytes(&record.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let (mut record, _) = played_record();
        record.version = RECORD_VERSION + 1;
        let bytes = record.to_bytes().unwrap();
        assert!(matches!(
            BattleRecord::from_bytes(&bytes),
            Err(BattleError::InvalidState(_))
        ));
    }

    #[test]
    fn test_replay_applies_recorded_rules() {
        let rules = CreationRules {
            max_name_len: 12,
            total_hp_mp: 300,
            ..CreationRules::default()
        };
        let catalog = SkillCatalog::builtin();
        let player =
            roster::player_with(&rules, &catalog, UnitSpec::new("Sir Galahad", 200, 100)).unwrap();
        let enemy = roster::monster("슬라임", 30).unwrap();
        let mut record = BattleRecord::new(&catalog, &player, &enemy).with_rules(rules);

        let mut field = BattleField::new(player).unwrap();
        field.set_enemy(enemy).unwrap();
        field.process_turn(MAGIC_ATTACK, BASIC_ATTACK).unwrap();
        record.record_turn(MAGIC_ATTACK, BASIC_ATTACK);
        record.finalize(&field);

        assert_eq!(record.replay().unwrap().state_hash(), field.state_hash());

        record.rules = CreationRules::default();
        assert!(matches!(
            record.replay(),
            Err(BattleError::NameLengthOutOfRange { .. })
        ));
    }

    #[test]
    fn test_rule_breaking_player_does_not_replay() {
        let (mut record, _) = played_record();
        record.player.max_hp = 5000;
        assert_eq!(
            record.replay().unwrap_err(),
            BattleError::InvalidStatTotal {
                expected: 200,
                actual: 5080,
            }
        );
    }

    #[test]
    fn test_tampered_record_diverges() {
        let (mut record, _) = played_record();
        record.turns.pop();
        assert!(matches!(record.replay(), Err(BattleError::InvalidState(_))));
    }
}

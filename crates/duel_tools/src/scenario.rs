//! Scenario loading and execution.
//!
//! Scenarios describe both combatants and a scripted list of skill choices.
//! Running one produces the final battlefield, a report per turn, and a
//! replayable [`BattleRecord`].
//!
//! # Example RON
//!
//! ```ron
//! Scenario(
//!     name: "Slime Duel",
//!     player: (name: "용사", hp: 120, mp: Some(80)),
//!     monster: (name: "슬라임", hp: 100),
//!     turns: [("마법 공격", "물리 공격")],
//! )
//! ```

use std::path::Path;

use duel_core::battlefield::{BattleField, TurnReport};
use duel_core::catalog::SkillCatalog;
use duel_core::error::BattleError;
use duel_core::record::BattleRecord;
use duel_core::roster::{self, CreationRules};
use duel_core::unit::UnitSpec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for scenario operations.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// File not found.
    #[error("Scenario file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("Failed to read scenario file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse RON.
    #[error("Failed to parse scenario: {0}")]
    ParseError(#[from] ron::error::SpannedError),
    /// Combatants could not be created.
    #[error("Invalid combatant: {0}")]
    Battle(#[from] BattleError),
}

/// A complete scenario configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Player creation rules.
    #[serde(default)]
    pub rules: CreationRules,
    /// The player's character.
    pub player: UnitSpec,
    /// The opponent. Any mana is ignored.
    pub monster: UnitSpec,
    /// `(player_skill, enemy_skill)` per turn.
    #[serde(default)]
    pub turns: Vec<(String, String)>,
}

/// Result of running a scenario.
#[derive(Debug)]
pub struct ScenarioOutcome {
    /// Battlefield after the last processed turn.
    pub field: BattleField,
    /// One report per processed turn.
    pub reports: Vec<TurnReport>,
    /// Replayable record of the processed turns.
    pub record: BattleRecord,
    /// Error that stopped the script early, if any.
    pub stopped_by: Option<BattleError>,
}

impl Scenario {
    /// Load a scenario from a RON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, or malformed.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        let scenario: Scenario = ron::from_str(&contents)?;
        Ok(scenario)
    }

    /// Parse a scenario from a RON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the RON is malformed.
    pub fn from_ron(ron: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = ron::from_str(ron)?;
        Ok(scenario)
    }

    /// Build both combatants and play the scripted turns.
    ///
    /// The script stops at the first rejected turn (including turns after
    /// the battle ended); that error is reported in the outcome rather than
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns an error only if a combatant cannot be created.
    pub fn run(&self, catalog: &SkillCatalog) -> Result<ScenarioOutcome, ScenarioError> {
        let player = roster::player_with(&self.rules, catalog, self.player.clone())?;
        let monster = roster::monster_with(catalog, self.monster.clone())?;
        let mut record = BattleRecord::new(catalog, &player, &monster).with_rules(self.rules);

        let mut field = BattleField::new(player)?;
        field.set_enemy(monster)?;

        tracing::info!(scenario = %self.name, turns = self.turns.len(), "Running scenario");

        let mut reports = Vec::with_capacity(self.turns.len());
        let mut stopped_by = None;
        for (player_skill, enemy_skill) in &self.turns {
            match field.process_turn(player_skill, enemy_skill) {
                Ok(report) => {
                    record.record_turn(player_skill.as_str(), enemy_skill.as_str());
                    reports.push(report);
                }
                Err(err) => {
                    tracing::warn!(%err, turn = field.turn(), "Scenario stopped");
                    stopped_by = Some(err);
                    break;
                }
            }
        }
        record.finalize(&field);

        Ok(ScenarioOutcome {
            field,
            reports,
            record,
            stopped_by,
        })
    }
}

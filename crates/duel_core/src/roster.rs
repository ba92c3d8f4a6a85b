//! Factories for the two combatants of a battle.
//!
//! Player creation has rules beyond stat validity (name length, a fixed
//! HP + MP budget). Monsters only need a name and health.

use serde::{Deserialize, Serialize};

use crate::catalog::SkillCatalog;
use crate::error::{BattleError, Result};
use crate::status::{validate_stat, StatField, StatInput};
use crate::unit::{Role, Unit, UnitSpec};

/// Shortest allowed player name, in characters.
pub const MIN_NAME_LENGTH: usize = 1;

/// Longest allowed player name, in characters.
pub const MAX_NAME_LENGTH: usize = 5;

/// HP + MP every player must distribute.
pub const TOTAL_HP_MP: i64 = 200;

/// Rules applied when creating a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationRules {
    /// Shortest allowed name.
    #[serde(default = "default_min_name_len")]
    pub min_name_len: usize,
    /// Longest allowed name.
    #[serde(default = "default_max_name_len")]
    pub max_name_len: usize,
    /// Required HP + MP.
    #[serde(default = "default_total_hp_mp")]
    pub total_hp_mp: i64,
}

const fn default_min_name_len() -> usize {
    MIN_NAME_LENGTH
}

const fn default_max_name_len() -> usize {
    MAX_NAME_LENGTH
}

const fn default_total_hp_mp() -> i64 {
    TOTAL_HP_MP
}

impl Default for CreationRules {
    fn default() -> Self {
        Self {
            min_name_len: MIN_NAME_LENGTH,
            max_name_len: MAX_NAME_LENGTH,
            total_hp_mp: TOTAL_HP_MP,
        }
    }
}

impl CreationRules {
    /// Check the name length in characters.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::NameLengthOutOfRange`] when outside the bounds.
    pub fn validate_name(&self, name: &str) -> Result<()> {
        let actual = name.chars().count();
        if actual < self.min_name_len || actual > self.max_name_len {
            return Err(BattleError::NameLengthOutOfRange {
                min: self.min_name_len,
                max: self.max_name_len,
                actual,
            });
        }
        Ok(())
    }

    /// Check that validated HP and MP add up to the budget.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidStatTotal`] on mismatch.
    pub fn validate_total(&self, hp: u32, mp: u32) -> Result<()> {
        let actual = i64::from(hp) + i64::from(mp);
        if actual != self.total_hp_mp {
            return Err(BattleError::InvalidStatTotal {
                expected: self.total_hp_mp,
                actual,
            });
        }
        Ok(())
    }
}

/// Create a player with the default rules and built-in catalog.
///
/// # Errors
///
/// Returns a name, stat or total validation error.
pub fn player(
    name: impl Into<String>,
    hp: impl Into<StatInput>,
    mp: impl Into<StatInput>,
) -> Result<Unit> {
    player_with(
        &CreationRules::default(),
        &SkillCatalog::builtin(),
        UnitSpec::new(name, hp, mp),
    )
}

/// Create a player under explicit rules and catalog.
///
/// Checks run name, then HP and MP validity, then the HP + MP total.
///
/// # Errors
///
/// Returns the first failing check.
pub fn player_with(rules: &CreationRules, catalog: &SkillCatalog, spec: UnitSpec) -> Result<Unit> {
    rules.validate_name(&spec.name)?;

    let hp = validate_stat(StatField::Hp, &spec.hp)?;
    let mp = match &spec.mp {
        Some(mp) => validate_stat(StatField::Mp, mp)?,
        None => return Err(BattleError::NotANumber(StatField::Mp)),
    };
    rules.validate_total(hp, mp)?;

    Unit::build(Role::Player, spec, catalog)
}

/// Create a monster with the built-in catalog. Monsters have no mana pool.
///
/// # Errors
///
/// Returns an HP validation error.
pub fn monster(name: impl Into<String>, hp: impl Into<StatInput>) -> Result<Unit> {
    monster_with(&SkillCatalog::builtin(), UnitSpec::without_mana(name, hp))
}

/// Create a monster from `catalog`. Any MP in the spec is ignored.
///
/// # Errors
///
/// Returns an HP validation error.
pub fn monster_with(catalog: &SkillCatalog, spec: UnitSpec) -> Result<Unit> {
    let spec = UnitSpec { mp: None, ..spec };
    Unit::build(Role::Monster, spec, catalog)
}

//! Units: a resource record plus a registry of learned skills.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::SkillCatalog;
use crate::error::{BattleError, Result};
use crate::skill::{Skill, SkillOutcome};
use crate::status::{validate_stat, StatField, StatInput, UnitStatus, Vitals};

/// What kind of combatant a unit is.
///
/// The role decides the starting loadout and which battlefield slot the unit
/// may occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    /// Plain unit with no starting skills.
    #[default]
    Neutral,
    /// The player's character.
    Player,
    /// An opponent.
    Monster,
}

/// Unvalidated construction input for a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSpec {
    /// Display name.
    pub name: String,
    /// Maximum health.
    pub hp: StatInput,
    /// Maximum mana; `None` for units without a mana pool.
    #[serde(default)]
    pub mp: Option<StatInput>,
}

impl UnitSpec {
    /// Spec for a unit with health and mana.
    pub fn new(name: impl Into<String>, hp: impl Into<StatInput>, mp: impl Into<StatInput>) -> Self {
        Self {
            name: name.into(),
            hp: hp.into(),
            mp: Some(mp.into()),
        }
    }

    /// Spec for a unit without a mana pool.
    pub fn without_mana(name: impl Into<String>, hp: impl Into<StatInput>) -> Self {
        Self {
            name: name.into(),
            hp: hp.into(),
            mp: None,
        }
    }
}

/// A combatant.
#[derive(Debug, Clone)]
pub struct Unit {
    role: Role,
    vitals: Vitals,
    skills: BTreeMap<String, Skill>,
    winner: bool,
}

impl Unit {
    /// Validate `spec` and build a unit that knows its role's starting skills
    /// from the built-in catalog.
    ///
    /// Players are created through [`crate::roster::player`], which also
    /// enforces the creation rules.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidPlayer`] for [`Role::Player`], otherwise
    /// a stat validation error tagged with the failing field.
    pub fn new(role: Role, spec: UnitSpec) -> Result<Self> {
        Self::with_catalog(role, spec, &SkillCatalog::builtin())
    }

    /// Like [`Unit::new`], drawing the starting loadout from `catalog`.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidPlayer`] for [`Role::Player`], a stat
    /// validation error, or a catalog error if the loadout is inconsistent.
    pub fn with_catalog(role: Role, spec: UnitSpec, catalog: &SkillCatalog) -> Result<Self> {
        if role == Role::Player {
            return Err(BattleError::InvalidPlayer);
        }
        Self::build(role, spec, catalog)
    }

    /// Build a unit of any role. The roster applies its own rules first.
    pub(crate) fn build(role: Role, spec: UnitSpec, catalog: &SkillCatalog) -> Result<Self> {
        let max_hp = validate_stat(StatField::Hp, &spec.hp)?;
        let max_mp = spec
            .mp
            .as_ref()
            .map(|mp| validate_stat(StatField::Mp, mp))
            .transpose()?;

        let mut unit = Self {
            role,
            vitals: Vitals::new(spec.name, max_hp, max_mp),
            skills: BTreeMap::new(),
            winner: false,
        };
        for skill in catalog.starting_skills(role)? {
            unit.learn_skill(skill)?;
        }
        Ok(unit)
    }

    /// Combatant kind.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.vitals.name()
    }

    /// Snapshot of the unit's resources.
    #[must_use]
    pub fn status(&self) -> UnitStatus {
        self.vitals.snapshot()
    }

    /// Health has reached zero.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.vitals.is_dead()
    }

    /// Whether this unit won its battle.
    #[must_use]
    pub const fn is_winner(&self) -> bool {
        self.winner
    }

    /// Record that this unit won its battle.
    pub fn set_winner(&mut self) {
        self.winner = true;
    }

    /// Restore health up to the maximum. Returns the amount restored.
    pub fn increase_hp(&mut self, amount: u32) -> u32 {
        self.vitals.increase_hp(amount)
    }

    /// Remove health down to zero. Returns the amount removed.
    pub fn decrease_hp(&mut self, amount: u32) -> u32 {
        self.vitals.decrease_hp(amount)
    }

    /// Restore mana up to the maximum. No-op without a mana pool.
    pub fn increase_mp(&mut self, amount: u32) -> u32 {
        self.vitals.increase_mp(amount)
    }

    /// Remove mana down to zero. No-op without a mana pool.
    pub fn decrease_mp(&mut self, amount: u32) -> u32 {
        self.vitals.decrease_mp(amount)
    }

    /// Ids of learned skills, in sorted order.
    pub fn skill_ids(&self) -> impl Iterator<Item = &str> {
        self.skills.keys().map(String::as_str)
    }

    /// Number of learned skills.
    #[must_use]
    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    /// Look up a learned skill.
    #[must_use]
    pub fn skill(&self, id: &str) -> Option<&Skill> {
        self.skills.get(id)
    }

    /// Register a skill under its id.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::SkillAlreadyKnown`] if the id is taken.
    pub fn learn_skill(&mut self, skill: Skill) -> Result<()> {
        if self.skills.contains_key(skill.id()) {
            return Err(BattleError::SkillAlreadyKnown(skill.id().to_string()));
        }
        self.skills.insert(skill.id().to_string(), skill);
        Ok(())
    }

    /// Use a learned skill on `target`.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::SkillNotLearned`] for unknown ids and
    /// [`BattleError::InsufficientMana`] when the cost cannot be paid. Neither
    /// path mutates either unit.
    pub fn use_skill(&mut self, id: &str, target: &mut Unit) -> Result<SkillOutcome> {
        let skill = self
            .skills
            .get(id)
            .ok_or_else(|| BattleError::SkillNotLearned(id.to_string()))?;
        skill.resolve(&mut self.vitals, &mut target.vitals)
    }
}

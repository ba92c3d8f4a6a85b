//! Skill resolution.
//!
//! Every skill follows the same template:
//!
//! ```text
//! 1. Affordability  caster mana >= require_mp (skipped when require_mp == 0)
//! 2. Cost           caster mana -= require_mp
//! 3. Effect         target hp   -= damage      (clamped at 0)
//! 4. Bonus          kind-specific caster-side effect
//! ```
//!
//! Step 1 is the only failure point and runs before anything is mutated.
//! Variants differ only in their numbers and in the bonus step.

use serde::{Deserialize, Serialize};

use crate::error::{BattleError, Result};
use crate::status::Vitals;

/// Closed set of skill behaviours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillKind {
    /// Weapon strike. Restores `mp_recovery` mana to casters that have a mana pool.
    Physical {
        /// Mana returned to the caster after the hit.
        mp_recovery: u32,
    },
    /// Spell. No bonus effect.
    Magic,
}

/// A combat action owned by exactly one unit.
///
/// The caster binding is ownership: a skill lives in its caster's registry and
/// is resolved against that caster's resources.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Skill {
    id: String,
    kind: SkillKind,
    damage: u32,
    #[serde(default)]
    require_mp: u32,
}

/// What one skill resolution changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillOutcome {
    /// Skill id that was resolved.
    pub skill: String,
    /// Mana taken from the caster.
    pub mana_spent: u32,
    /// Health actually removed from the target.
    pub damage_dealt: u32,
    /// Mana returned to the caster by the bonus effect.
    pub mana_recovered: u32,
    /// Target health after the effect.
    pub target_hp: u32,
}

impl Skill {
    /// Create a skill from its configuration.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: SkillKind, damage: u32, require_mp: u32) -> Self {
        Self {
            id: id.into(),
            kind,
            damage,
            require_mp,
        }
    }

    /// Free physical attack with a mana-recovery bonus.
    #[must_use]
    pub fn physical(id: impl Into<String>, damage: u32, mp_recovery: u32) -> Self {
        Self::new(id, SkillKind::Physical { mp_recovery }, damage, 0)
    }

    /// Mana-costed magic attack.
    #[must_use]
    pub fn magic(id: impl Into<String>, damage: u32, require_mp: u32) -> Self {
        Self::new(id, SkillKind::Magic, damage, require_mp)
    }

    /// Registry key.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Behaviour variant.
    #[must_use]
    pub const fn kind(&self) -> SkillKind {
        self.kind
    }

    /// Health removed from the target.
    #[must_use]
    pub const fn damage(&self) -> u32 {
        self.damage
    }

    /// Mana cost.
    #[must_use]
    pub const fn require_mp(&self) -> u32 {
        self.require_mp
    }

    /// Fail if the caster cannot pay for this skill.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InsufficientMana`] when the caster's current
    /// mana is below the cost. Units without a mana pool count as having none.
    pub fn check_affordable(&self, caster: &Vitals) -> Result<()> {
        if self.require_mp > 0 && caster.mp() < self.require_mp {
            return Err(BattleError::InsufficientMana {
                skill: self.id.clone(),
                required: self.require_mp,
                available: caster.mp(),
            });
        }
        Ok(())
    }

    fn apply_effect(&self, target: &mut Vitals) -> u32 {
        target.decrease_hp(self.damage)
    }

    fn bonus_effect(&self, caster: &mut Vitals) -> u32 {
        match self.kind {
            SkillKind::Physical { mp_recovery } if caster.has_mana_pool() => {
                caster.increase_mp(mp_recovery)
            }
            SkillKind::Physical { .. } | SkillKind::Magic => 0,
        }
    }

    /// Run the full cost, effect, bonus sequence.
    pub(crate) fn resolve(&self, caster: &mut Vitals, target: &mut Vitals) -> Result<SkillOutcome> {
        self.check_affordable(caster)?;

        let mana_spent = caster.decrease_mp(self.require_mp);
        let damage_dealt = self.apply_effect(target);
        let mana_recovered = self.bonus_effect(caster);

        tracing::debug!(
            caster = caster.name(),
            target = target.name(),
            skill = %self.id,
            mana_spent,
            damage_dealt,
            mana_recovered,
            target_hp = target.hp(),
            "Skill resolved"
        );

        Ok(SkillOutcome {
            skill: self.id.clone(),
            mana_spent,
            damage_dealt,
            mana_recovered,
            target_hp: target.hp(),
        })
    }
}

//! Data-driven skill catalog and per-role starting loadouts.
//!
//! Catalogs are plain data and can be loaded from RON:
//!
//! ```ron
//! SkillCatalog(
//!     skills: [
//!         (id: "물리 공격", kind: Physical(mp_recovery: 10), damage: 10),
//!         (id: "마법 공격", kind: Magic, damage: 30, require_mp: 30),
//!     ],
//!     loadouts: (
//!         player: ["물리 공격", "마법 공격"],
//!         monster: ["물리 공격"],
//!     ),
//! )
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BattleError, Result};
use crate::skill::{Skill, SkillKind};
use crate::unit::Role;

/// Id of the basic physical attack.
pub const BASIC_ATTACK: &str = "물리 공격";

/// Id of the magic attack.
pub const MAGIC_ATTACK: &str = "마법 공격";

/// Damage of the basic physical attack.
pub const BASIC_ATTACK_DAMAGE: u32 = 10;

/// Mana restored by the basic physical attack.
pub const BASIC_ATTACK_MP_RECOVERY: u32 = 10;

/// Damage of the magic attack.
pub const MAGIC_ATTACK_DAMAGE: u32 = 30;

/// Mana cost of the magic attack.
pub const MAGIC_ATTACK_COST: u32 = 30;

/// Basic physical attack.
#[must_use]
pub fn basic_attack() -> Skill {
    Skill::physical(BASIC_ATTACK, BASIC_ATTACK_DAMAGE, BASIC_ATTACK_MP_RECOVERY)
}

/// Magic attack.
#[must_use]
pub fn magic_attack() -> Skill {
    Skill::magic(MAGIC_ATTACK, MAGIC_ATTACK_DAMAGE, MAGIC_ATTACK_COST)
}

/// Skill ids each role learns at construction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Loadouts {
    /// Starting skills of player units.
    #[serde(default)]
    pub player: Vec<String>,
    /// Starting skills of monster units.
    #[serde(default)]
    pub monster: Vec<String>,
}

/// Every skill available to units, plus which ones each role starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCatalog {
    /// Skill definitions.
    pub skills: Vec<Skill>,
    /// Starting loadouts.
    #[serde(default)]
    pub loadouts: Loadouts,
}

impl Default for SkillCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SkillCatalog {
    /// Catalog with the basic and magic attacks.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            skills: vec![basic_attack(), magic_attack()],
            loadouts: Loadouts {
                player: vec![BASIC_ATTACK.to_string(), MAGIC_ATTACK.to_string()],
                monster: vec![BASIC_ATTACK.to_string()],
            },
        }
    }

    /// Parse a catalog from RON text and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::DataParse`] on syntax or validation failure.
    pub fn from_ron_str(source: &str) -> Result<Self> {
        Self::parse(source, "<inline>")
    }

    /// Load a catalog from a RON file and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::DataParse`] if the file cannot be read, parsed
    /// or fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| BattleError::DataParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&contents, &path.display().to_string())
    }

    fn parse(source: &str, path: &str) -> Result<Self> {
        let catalog: Self = ron::from_str(source).map_err(|e| BattleError::DataParse {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        let errors = catalog.validate();
        if !errors.is_empty() {
            return Err(BattleError::DataParse {
                path: path.to_string(),
                message: errors.join("; "),
            });
        }

        tracing::info!(
            "Loaded skill catalog '{}' with {} skills",
            path,
            catalog.skills.len()
        );
        Ok(catalog)
    }

    /// Check catalog integrity, returning every problem found.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for skill in &self.skills {
            if skill.id().trim().is_empty() {
                errors.push("Skill with empty id".to_string());
            }
            if !seen.insert(skill.id()) {
                errors.push(format!("Duplicate skill id '{}'", skill.id()));
            }
            if skill.kind() == SkillKind::Magic && skill.require_mp() == 0 {
                errors.push(format!("Magic skill '{}' must cost mana", skill.id()));
            }
        }

        for (role, ids) in [
            ("player", &self.loadouts.player),
            ("monster", &self.loadouts.monster),
        ] {
            let mut in_loadout = HashSet::new();
            for id in ids {
                if !seen.contains(id.as_str()) {
                    errors.push(format!("Unknown skill '{id}' in {role} loadout"));
                }
                if !in_loadout.insert(id.as_str()) {
                    errors.push(format!("Skill '{id}' listed twice in {role} loadout"));
                }
            }
        }

        errors
    }

    /// Look up a skill definition.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Skill> {
        self.skills.iter().find(|skill| skill.id() == id)
    }

    /// Skill ids a role starts with.
    #[must_use]
    pub fn loadout(&self, role: Role) -> &[String] {
        match role {
            Role::Neutral => &[],
            Role::Player => &self.loadouts.player,
            Role::Monster => &self.loadouts.monster,
        }
    }

    /// Fresh skill instances for a role's starting loadout.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidState`] if the loadout names a skill the
    /// catalog does not define.
    pub fn starting_skills(&self, role: Role) -> Result<Vec<Skill>> {
        self.loadout(role)
            .iter()
            .map(|id| {
                self.get(id).cloned().ok_or_else(|| {
                    BattleError::InvalidState(format!("Loadout references unknown skill '{id}'"))
                })
            })
            .collect()
    }
}

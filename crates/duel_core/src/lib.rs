//! # Duel Core
//!
//! Turn-based combat core for a one-on-one battle between a player and a
//! monster.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering or input handling
//! - No randomness
//! - No floating-point math during resolution
//!
//! Same units and same skill choices always produce the same battle, which
//! is what makes [`record`] replays possible.
//!
//! ## Crate Structure
//!
//! - [`status`] - Health/mana pools, stat validation, status snapshots
//! - [`unit`] - Units and their skill registries
//! - [`skill`] - Skill definitions and the cost/effect/bonus resolution
//! - [`catalog`] - Data-driven skill catalog and starting loadouts
//! - [`roster`] - Player and monster factories
//! - [`battlefield`] - Turn state machine and win detection
//! - [`record`] - Battle recording and replay
//!
//! ## Example
//!
//! ```
//! use duel_core::prelude::*;
//!
//! let mut field = BattleField::new(roster::player("용사", 120, 80)?)?;
//! field.set_enemy(roster::monster("슬라임", 100)?)?;
//!
//! field.process_turn(BASIC_ATTACK, BASIC_ATTACK)?;
//! assert_eq!(field.turn(), 2);
//! assert_eq!(field.enemy().unwrap().status().hp, 90);
//! # Ok::<(), BattleError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod battlefield;
pub mod catalog;
pub mod error;
pub mod record;
pub mod roster;
pub mod skill;
pub mod status;
pub mod unit;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::battlefield::{BattleField, BattlePhase, Side, SkillEvent, TurnReport};
    pub use crate::catalog::{SkillCatalog, BASIC_ATTACK, MAGIC_ATTACK};
    pub use crate::error::{BattleError, Result};
    pub use crate::record::BattleRecord;
    pub use crate::roster::{self, CreationRules};
    pub use crate::skill::{Skill, SkillKind, SkillOutcome};
    pub use crate::status::{StatField, StatInput, UnitStatus};
    pub use crate::unit::{Role, Unit, UnitSpec};
}

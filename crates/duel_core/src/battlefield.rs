//! Turn state machine for a one-on-one battle.
//!
//! ```text
//! Unattached ──set_player──▶ AwaitingEnemy ──set_enemy──▶ Active ──winner──▶ Ended
//!      ▲                                                                      │
//!      └──────────────────────────────── init() ──────────────────────────────┘
//! ```
//!
//! A turn is the player's action followed by the enemy's. The win check runs
//! after each action and always looks at the player first, so a player at
//! zero health loses even if the enemy is also down. Once a winner exists the
//! field rejects turns until [`BattleField::init`] is called.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::{BattleError, Result};
use crate::skill::SkillOutcome;
use crate::unit::{Role, Unit};

/// Battlefield slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The player's unit.
    Player,
    /// The opposing unit.
    Enemy,
}

/// Coarse state of the battlefield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattlePhase {
    /// No player attached (only reachable through `init`).
    Unattached,
    /// Player attached, waiting for an opponent.
    AwaitingEnemy,
    /// Both sides attached and no winner yet.
    Active,
    /// A winner has been declared.
    Ended,
}

/// One skill use inside a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEvent {
    /// Who acted.
    pub side: Side,
    /// What the skill did.
    pub outcome: SkillOutcome,
}

/// Everything that happened in one `process_turn` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    /// Turn number the actions were taken in.
    pub turn: u32,
    /// Actions in resolution order.
    pub events: Vec<SkillEvent>,
    /// Winner, if this turn decided the battle.
    pub winner: Option<Side>,
}

/// A one-on-one battle between a player and a monster.
#[derive(Debug, Clone)]
pub struct BattleField {
    turn: u32,
    player: Option<Unit>,
    enemy: Option<Unit>,
    winner: Option<Side>,
    ended: bool,
}

impl BattleField {
    /// Open a battlefield for `player`.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::InvalidPlayer`] if the unit is not a player.
    pub fn new(player: Unit) -> Result<Self> {
        Self::validate_player(&player)?;
        Ok(Self {
            turn: 1,
            player: Some(player),
            enemy: None,
            winner: None,
            ended: false,
        })
    }

    fn validate_player(player: &Unit) -> Result<()> {
        if player.role() != Role::Player {
            return Err(BattleError::InvalidPlayer);
        }
        Ok(())
    }

    fn validate_enemy(enemy: &Unit) -> Result<()> {
        if enemy.role() != Role::Monster {
            return Err(BattleError::InvalidEnemy);
        }
        Ok(())
    }

    /// Current turn number, starting at 1.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// The player's unit.
    #[must_use]
    pub fn player(&self) -> Option<&Unit> {
        self.player.as_ref()
    }

    /// The opposing unit.
    #[must_use]
    pub fn enemy(&self) -> Option<&Unit> {
        self.enemy.as_ref()
    }

    /// Side that won, if decided.
    #[must_use]
    pub const fn winner_side(&self) -> Option<Side> {
        self.winner
    }

    /// Unit that won, if decided.
    #[must_use]
    pub fn winner(&self) -> Option<&Unit> {
        match self.winner? {
            Side::Player => self.player(),
            Side::Enemy => self.enemy(),
        }
    }

    /// Whether turns are rejected.
    #[must_use]
    pub const fn is_ended(&self) -> bool {
        self.ended
    }

    /// Current state-machine phase.
    #[must_use]
    pub fn phase(&self) -> BattlePhase {
        if self.ended {
            BattlePhase::Ended
        } else if self.player.is_none() {
            BattlePhase::Unattached
        } else if self.enemy.is_none() {
            BattlePhase::AwaitingEnemy
        } else {
            BattlePhase::Active
        }
    }

    /// Reset to a blank field: turn 1, no units, no winner, accepting turns.
    pub fn init(&mut self) {
        self.turn = 1;
        self.player = None;
        self.enemy = None;
        self.winner = None;
        self.ended = false;
        tracing::debug!("Battlefield reset");
    }

    /// Attach a player, replacing any current one.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::GameEnded`] once a winner exists and
    /// [`BattleError::InvalidPlayer`] if the unit is not a player.
    pub fn set_player(&mut self, player: Unit) -> Result<()> {
        if self.ended {
            return Err(BattleError::GameEnded);
        }
        Self::validate_player(&player)?;
        self.player = Some(player);
        Ok(())
    }

    /// Attach the opponent, replacing any current one.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::GameEnded`] once a winner exists and
    /// [`BattleError::InvalidEnemy`] if the unit is not a monster.
    pub fn set_enemy(&mut self, enemy: Unit) -> Result<()> {
        if self.ended {
            return Err(BattleError::GameEnded);
        }
        Self::validate_enemy(&enemy)?;
        self.enemy = Some(enemy);
        Ok(())
    }

    /// Advance the turn counter.
    pub fn increase_turn(&mut self, by: u32) {
        self.turn = self.turn.saturating_add(by);
        tracing::debug!(turn = self.turn, "Turn advanced");
    }

    fn sides_mut(&mut self) -> Result<(&mut Unit, &mut Unit)> {
        match (self.player.as_mut(), self.enemy.as_mut()) {
            (Some(player), Some(enemy)) => Ok((player, enemy)),
            _ => Err(BattleError::UnitsNotAttached),
        }
    }

    /// The player uses `skill` on the enemy.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::UnitsNotAttached`] or any skill error.
    pub fn player_use_skill(&mut self, skill: &str) -> Result<SkillOutcome> {
        let (player, enemy) = self.sides_mut()?;
        player.use_skill(skill, enemy)
    }

    /// The enemy uses `skill` on the player.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::UnitsNotAttached`] or any skill error.
    pub fn enemy_use_skill(&mut self, skill: &str) -> Result<SkillOutcome> {
        let (player, enemy) = self.sides_mut()?;
        enemy.use_skill(skill, player)
    }

    /// Resolve one full turn.
    ///
    /// The enemy does not act if the player's action ended the battle, and
    /// the turn counter only advances when nobody has won.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::GameEnded`] once a winner exists,
    /// [`BattleError::UnitsNotAttached`] if a side is missing, or the first
    /// skill error. A failing enemy action leaves the player's action applied.
    pub fn process_turn(&mut self, player_skill: &str, enemy_skill: &str) -> Result<TurnReport> {
        if self.ended {
            return Err(BattleError::GameEnded);
        }
        self.sides_mut()?;

        let mut report = TurnReport {
            turn: self.turn,
            events: Vec::with_capacity(2),
            winner: None,
        };

        let outcome = self.player_use_skill(player_skill)?;
        report.events.push(SkillEvent {
            side: Side::Player,
            outcome,
        });
        report.winner = self.check_winner();
        if report.winner.is_some() {
            return Ok(report);
        }

        let outcome = self.enemy_use_skill(enemy_skill)?;
        report.events.push(SkillEvent {
            side: Side::Enemy,
            outcome,
        });
        report.winner = self.check_winner();
        if report.winner.is_some() {
            return Ok(report);
        }

        self.increase_turn(1);
        Ok(report)
    }

    /// Declare a winner if a side is down. The player is checked first.
    pub fn check_winner(&mut self) -> Option<Side> {
        let (player_dead, enemy_dead) = match (&self.player, &self.enemy) {
            (Some(player), Some(enemy)) => (player.is_dead(), enemy.is_dead()),
            _ => return None,
        };

        if player_dead {
            self.set_winner(Side::Enemy);
        } else if enemy_dead {
            self.set_winner(Side::Player);
        }
        self.winner
    }

    /// Declare `side` the winner and close the battle.
    ///
    /// Ignored when no unit occupies `side`.
    pub fn set_winner(&mut self, side: Side) {
        let unit = match side {
            Side::Player => self.player.as_mut(),
            Side::Enemy => self.enemy.as_mut(),
        };
        let Some(unit) = unit else {
            tracing::debug!(?side, "No unit to declare winner");
            return;
        };
        unit.set_winner();
        tracing::info!(winner = unit.name(), turn = self.turn, "Battle ended");
        self.winner = Some(side);
        self.ended = true;
    }

    /// Hash of the observable battle state, for determinism checks.
    ///
    /// Uses `DefaultHasher`, so values are only comparable between builds of
    /// the same toolchain.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.turn.hash(&mut hasher);
        self.winner.hash(&mut hasher);
        self.ended.hash(&mut hasher);
        for unit in [&self.player, &self.enemy] {
            unit.as_ref().map(Unit::status).hash(&mut hasher);
        }
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BASIC_ATTACK, MAGIC_ATTACK};
    use crate::roster;
    use crate::skill::Skill;
    use crate::unit::UnitSpec;

    fn active_field(enemy_hp: i64) -> BattleField {
        let mut field = BattleField::new(roster::player("용사", 120, 80).unwrap()).unwrap();
        field
            .set_enemy(roster::monster("슬라임", enemy_hp).unwrap())
            .unwrap();
        field
    }

    #[test]
    fn test_new_field_awaits_enemy() {
        let field = BattleField::new(roster::player("용사", 120, 80).unwrap()).unwrap();
        assert_eq!(field.turn(), 1);
        assert_eq!(field.phase(), BattlePhase::AwaitingEnemy);
        assert!(field.winner().is_none());
    }

    #[test]
    fn test_role_checks() {
        let monster = roster::monster("슬라임", 100).unwrap();
        assert_eq!(
            BattleField::new(monster.clone()).unwrap_err(),
            BattleError::InvalidPlayer
        );

        let mut field = BattleField::new(roster::player("용사", 120, 80).unwrap()).unwrap();
        let other_player = roster::player("마왕", 100, 100).unwrap();
        assert_eq!(field.set_enemy(other_player), Err(BattleError::InvalidEnemy));
        let neutral = Unit::new(Role::Neutral, UnitSpec::without_mana("rock", 5)).unwrap();
        assert_eq!(field.set_enemy(neutral), Err(BattleError::InvalidEnemy));
        assert_eq!(field.phase(), BattlePhase::AwaitingEnemy);

        field.set_enemy(monster).unwrap();
        assert_eq!(field.phase(), BattlePhase::Active);
    }

    #[test]
    fn test_turn_without_enemy_fails() {
        let mut field = BattleField::new(roster::player("용사", 120, 80).unwrap()).unwrap();
        assert_eq!(
            field.process_turn(BASIC_ATTACK, BASIC_ATTACK),
            Err(BattleError::UnitsNotAttached)
        );
        assert_eq!(field.turn(), 1);
    }

    #[test]
    fn test_basic_exchange() {
        let mut field = active_field(100);
        let report = field.process_turn(BASIC_ATTACK, BASIC_ATTACK).unwrap();

        assert_eq!(report.turn, 1);
        assert_eq!(report.events.len(), 2);
        assert_eq!(report.winner, None);
        assert_eq!(field.enemy().unwrap().status().hp, 90);
        assert_eq!(field.player().unwrap().status().hp, 110);
        assert_eq!(field.turn(), 2);
        assert!(field.winner().is_none());
    }

    #[test]
    fn test_lethal_magic_ends_battle() {
        let mut field = active_field(10);
        let report = field.process_turn(MAGIC_ATTACK, BASIC_ATTACK).unwrap();

        assert_eq!(report.winner, Some(Side::Player));
        assert_eq!(report.events.len(), 1);
        let enemy = field.enemy().unwrap().status();
        assert_eq!(enemy.hp, 0);
        assert!(enemy.is_dead);
        assert_eq!(field.winner().unwrap().name(), "용사");
        assert!(field.player().unwrap().is_winner());
        assert_eq!(field.turn(), 1);
        assert_eq!(field.phase(), BattlePhase::Ended);

        assert_eq!(
            field.process_turn(BASIC_ATTACK, BASIC_ATTACK),
            Err(BattleError::GameEnded)
        );
    }

    #[test]
    fn test_enemy_does_not_retaliate_after_death() {
        let mut field = active_field(10);
        field.process_turn(BASIC_ATTACK, BASIC_ATTACK).unwrap();

        assert_eq!(field.player().unwrap().status().hp, 120);
        assert_eq!(field.winner_side(), Some(Side::Player));
    }

    #[test]
    fn test_enemy_can_win() {
        let mut field = BattleField::new(roster::player("용사", 10, 190).unwrap()).unwrap();
        field.set_enemy(roster::monster("드래곤", 500).unwrap()).unwrap();

        let report = field.process_turn(BASIC_ATTACK, BASIC_ATTACK).unwrap();

        assert_eq!(report.winner, Some(Side::Enemy));
        assert!(field.enemy().unwrap().is_winner());
        assert!(!field.player().unwrap().is_winner());
        assert_eq!(field.enemy().unwrap().status().hp, 490);
    }

    #[test]
    fn test_player_death_checked_first() {
        let mut field = active_field(100);
        if let Some(player) = field.player.as_mut() {
            player.decrease_hp(120);
        }
        if let Some(enemy) = field.enemy.as_mut() {
            enemy.decrease_hp(100);
        }

        assert_eq!(field.check_winner(), Some(Side::Enemy));
    }

    #[test]
    fn test_failed_player_action_keeps_state() {
        let mut field = active_field(100);
        let before = field.state_hash();
        assert!(field.process_turn("fireball", BASIC_ATTACK).is_err());
        assert_eq!(field.state_hash(), before);
        assert_eq!(field.turn(), 1);
    }

    #[test]
    fn test_custom_skill_through_field() {
        let mut player = roster::player("용사", 120, 80).unwrap();
        player.learn_skill(Skill::magic("메테오", 200, 80)).unwrap();
        let mut field = BattleField::new(player).unwrap();
        field.set_enemy(roster::monster("슬라임", 150).unwrap()).unwrap();

        let report = field.process_turn("메테오", BASIC_ATTACK).unwrap();
        assert_eq!(report.winner, Some(Side::Player));
        assert_eq!(report.events[0].outcome.mana_spent, 80);
    }

    #[test]
    fn test_init_reopens_the_field() {
        let mut field = active_field(10);
        field.process_turn(MAGIC_ATTACK, BASIC_ATTACK).unwrap();
        field.increase_turn(3);

        field.init();
        assert_eq!(field.turn(), 1);
        assert!(field.player().is_none());
        assert!(field.enemy().is_none());
        assert!(field.winner().is_none());
        assert_eq!(field.phase(), BattlePhase::Unattached);
        assert_eq!(
            field.process_turn(BASIC_ATTACK, BASIC_ATTACK),
            Err(BattleError::UnitsNotAttached)
        );

        field.set_player(roster::player("용사", 120, 80).unwrap()).unwrap();
        field.set_enemy(roster::monster("슬라임", 100).unwrap()).unwrap();
        assert!(field.process_turn(BASIC_ATTACK, BASIC_ATTACK).is_ok());
    }

    #[test]
    fn test_ended_field_rejects_new_units() {
        let mut field = active_field(10);
        field.process_turn(MAGIC_ATTACK, BASIC_ATTACK).unwrap();

        assert_eq!(
            field.set_player(roster::player("마왕", 100, 100).unwrap()),
            Err(BattleError::GameEnded)
        );
        assert_eq!(
            field.set_enemy(roster::monster("드래곤", 500).unwrap()),
            Err(BattleError::GameEnded)
        );

        let winner = field.winner().unwrap();
        assert_eq!(winner.name(), "용사");
        assert!(winner.is_winner());
        assert_eq!(field.enemy().unwrap().name(), "슬라임");
    }

    #[test]
    fn test_reset_field_still_checks_roles() {
        let mut field = active_field(100);
        field.init();

        assert_eq!(
            field.set_player(roster::monster("슬라임", 100).unwrap()),
            Err(BattleError::InvalidPlayer)
        );
        assert_eq!(
            field.set_enemy(roster::player("용사", 120, 80).unwrap()),
            Err(BattleError::InvalidEnemy)
        );
        assert_eq!(field.phase(), BattlePhase::Unattached);
    }

    #[test]
    fn test_set_winner_needs_an_occupied_side() {
        let mut field = BattleField::new(roster::player("용사", 120, 80).unwrap()).unwrap();
        field.set_winner(Side::Enemy);

        assert_eq!(field.winner_side(), None);
        assert!(!field.is_ended());
        assert_eq!(field.phase(), BattlePhase::AwaitingEnemy);

        field.set_winner(Side::Player);
        assert_eq!(field.winner().unwrap().name(), "용사");
        assert!(field.is_ended());
    }

    #[test]
    fn test_forged_player_is_not_accepted() {
        let forged = Unit::new(Role::Player, UnitSpec::without_mana("이름이아주아주긴플레이어", 5000));
        assert_eq!(forged.unwrap_err(), BattleError::InvalidPlayer);
    }

    #[test]
    fn test_increase_turn_by_amount() {
        let mut field = active_field(100);
        field.increase_turn(5);
        assert_eq!(field.turn(), 6);
    }
}

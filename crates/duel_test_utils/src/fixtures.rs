//! Test fixtures and helpers.
//!
//! Ready-made combatants and battlefields for consistent testing.

use duel_core::battlefield::BattleField;
use duel_core::roster;
use duel_core::unit::Unit;

/// Name used for the fixture player.
pub const HERO_NAME: &str = "용사";

/// Name used for the fixture monster.
pub const SLIME_NAME: &str = "슬라임";

/// Player with 120 HP and 80 MP.
///
/// # Panics
///
/// Panics if the built-in roster rules reject the fixture stats.
#[must_use]
pub fn hero() -> Unit {
    roster::player(HERO_NAME, 120, 80).expect("fixture player is valid")
}

/// Monster without mana and the given HP.
///
/// # Panics
///
/// Panics if `hp` is zero.
#[must_use]
pub fn slime(hp: u32) -> Unit {
    roster::monster(SLIME_NAME, hp).expect("fixture monster is valid")
}

/// Active battlefield: [`hero`] against a [`slime`] with `enemy_hp`.
///
/// # Panics
///
/// Panics if `enemy_hp` is zero.
#[must_use]
pub fn duel(enemy_hp: u32) -> BattleField {
    let mut field = BattleField::new(hero()).expect("fixture player is a player");
    field
        .set_enemy(slime(enemy_hp))
        .expect("fixture monster is a monster");
    field
}

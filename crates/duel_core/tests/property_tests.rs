//! Property tests for the resource model and unit construction.

use duel_core::prelude::*;
use duel_test_utils::determinism::strategies::{
    arb_amount, arb_player_stats, arb_stat_input, arb_valid_stat,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn constructed_unit_starts_full(hp in arb_valid_stat(), mp in arb_valid_stat()) {
        let unit = Unit::new(Role::Neutral, UnitSpec::new("unit", hp, mp)).unwrap();
        let status = unit.status();
        prop_assert_eq!(status.hp, hp);
        prop_assert_eq!(status.max_hp, hp);
        prop_assert_eq!(status.mp, Some(mp));
        prop_assert_eq!(status.max_mp, Some(mp));
    }

    #[test]
    fn pools_stay_in_bounds(
        hp in arb_valid_stat(),
        mp in arb_valid_stat(),
        ops in proptest::collection::vec((0u8..4, arb_amount()), 0..40),
    ) {
        let mut unit = Unit::new(Role::Neutral, UnitSpec::new("unit", hp, mp)).unwrap();
        for (op, amount) in ops {
            match op {
                0 => { unit.increase_hp(amount); }
                1 => { unit.decrease_hp(amount); }
                2 => { unit.increase_mp(amount); }
                _ => { unit.decrease_mp(amount); }
            }
            let status = unit.status();
            prop_assert!(status.hp <= status.max_hp);
            prop_assert!(status.mp <= status.max_mp);
            prop_assert_eq!(status.is_dead, status.hp == 0);
        }
    }

    #[test]
    fn construction_either_succeeds_or_names_the_field(hp in arb_stat_input()) {
        match Unit::new(Role::Neutral, UnitSpec { name: "unit".to_string(), hp, mp: None }) {
            Ok(unit) => prop_assert!(unit.status().max_hp > 0),
            Err(
                BattleError::NotANumber(field)
                | BattleError::NonInteger(field)
                | BattleError::NonPositive(field)
                | BattleError::StatOverflow(field),
            ) => prop_assert_eq!(field, StatField::Hp),
            Err(other) => prop_assert!(false, "unexpected error {other}"),
        }
    }

    #[test]
    fn any_budget_split_makes_a_player((hp, mp) in arb_player_stats()) {
        let player = roster::player("용사", hp, mp).unwrap();
        prop_assert_eq!(player.skill_count(), 2);
    }

    #[test]
    fn turns_advance_until_someone_wins(enemy_hp in arb_valid_stat()) {
        let mut field = duel_test_utils::fixtures::duel(enemy_hp);
        let mut expected_turn = 1;
        while !field.is_ended() {
            prop_assert_eq!(field.turn(), expected_turn);
            let report = field.process_turn(BASIC_ATTACK, BASIC_ATTACK).unwrap();
            if report.winner.is_none() {
                expected_turn += 1;
            }
        }
        prop_assert!(field.winner().is_some());
        prop_assert_eq!(field.turn(), expected_turn);
    }
}
